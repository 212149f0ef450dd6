//! Git references (branches, HEAD, tags)
//!
//! References are human-readable names pointing to objects. A ref file
//! contains either:
//! - a 40-character SHA-1 followed by a newline (direct reference), or
//! - `ref: <path>` naming another reference (symbolic reference).
//!
//! Resolution follows symbolic references transitively; the ref graph is
//! assumed acyclic.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Reference manager rooted at the gitdir.
#[derive(Debug, new)]
pub struct Refs {
    path: Box<Path>,
}

impl Refs {
    /// Resolve a reference name to an object id.
    ///
    /// Returns `None` when the ref file does not exist. Symbolic references
    /// are followed recursively; the result of a resolution is therefore its
    /// own resolution (idempotence).
    pub fn resolve(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let ref_path = self.path.join(name);
        if !ref_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&ref_path)
            .with_context(|| format!("failed to read ref file at {:?}", ref_path))?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        match symref_match {
            Some(symref_match) => self.resolve(&symref_match[1]),
            None => Ok(Some(ObjectId::try_parse(content.to_string())?)),
        }
    }

    /// List every ref under `.git/refs` (or an explicit start directory),
    /// keyed by its gitdir-relative slash path in sorted order.
    ///
    /// Refs that fail to resolve (dangling symrefs) are skipped.
    pub fn list(&self, start: Option<&Path>) -> anyhow::Result<BTreeMap<String, ObjectId>> {
        let root = match start {
            Some(path) => path.to_path_buf(),
            None => self.path.join("refs"),
        };

        let mut refs = BTreeMap::new();
        if !root.is_dir() {
            return Ok(refs);
        }

        for entry in WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
        {
            if !entry.path().is_file() {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(self.path.as_ref())
                .with_context(|| format!("ref outside the gitdir: {:?}", entry.path()))?;
            let name = relative_path
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if let Some(oid) = self.resolve(&name)? {
                refs.insert(name, oid);
            }
        }

        Ok(refs)
    }

    /// Write `oid` under `.git/<name>`, creating intermediate directories.
    pub fn create(&self, name: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let ref_path = self.path.join(name);

        std::fs::create_dir_all(ref_path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                ref_path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&ref_path)
            .with_context(|| format!("failed to open ref file at {:?}", ref_path))?;
        ref_file.write_all(format!("{}\n", oid).as_bytes())?;

        Ok(())
    }
}
