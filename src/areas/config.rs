//! Repository configuration file
//!
//! `.git/config` is an INI-ish subset: bracketed sections, `key = value`
//! lines, `;`/`#` comments, surrounding whitespace ignored. Section names
//! compare case-insensitively. The only semantically significant key is
//! `[core] repositoryformatversion`.

use anyhow::Context;
use std::path::Path;

/// Ordered sections of ordered key/value pairs.
#[derive(Debug, Clone, Default)]
pub struct GitConfig {
    sections: Vec<(String, Vec<(String, String)>)>,
}

impl GitConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {:?}", path))?;

        Ok(Self::parse(&text))
    }

    /// Parse config text. Lines that are neither sections, comments, nor
    /// `key = value` pairs are skipped.
    pub fn parse(text: &str) -> Self {
        let mut config = GitConfig::new();
        let mut current_section = String::new();

        for line in text.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_section = line[1..line.len() - 1].to_ascii_lowercase();
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                config.set(&current_section, key.trim(), value.trim());
            }
        }

        config
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let section = section.to_ascii_lowercase();

        self.sections
            .iter()
            .find(|(name, _)| *name == section)
            .and_then(|(_, entries)| {
                entries
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.as_str())
            })
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let section = section.to_ascii_lowercase();

        let entries = match self.sections.iter_mut().find(|(name, _)| *name == section) {
            Some((_, entries)) => entries,
            None => {
                self.sections.push((section, Vec::new()));
                &mut self
                    .sections
                    .last_mut()
                    .expect("section was just pushed")
                    .1
            }
        };

        match entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();

        for (section, entries) in &self.sections {
            out.push_str(&format!("[{}]\n", section));
            for (key, value) in entries {
                out.push_str(&format!("\t{} = {}\n", key, value));
            }
        }

        out
    }
}
