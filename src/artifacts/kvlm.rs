//! Key-value list with message
//!
//! The line-oriented format shared by commit and tag payloads:
//!
//! ```text
//! tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147
//! parent 206941306e8a8af65b66eaaaea388a7ae24d49a0
//! author Carlton Egremont III <carlton@example.com> 1527025023 +0200
//!
//! Create first draft
//! ```
//!
//! A field is `key SP value LF`; a value may span lines when each embedded
//! LF is followed by a single continuation space. Repeated keys accumulate
//! into an ordered list. The free-form message lives under the empty key,
//! separated from the fields by one blank line, and always serializes last.

use crate::errors::SiltError;
use bytes::Bytes;

/// A field value: one string, or an ordered list when the key repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvlmValue {
    Single(String),
    Multiple(Vec<String>),
}

impl KvlmValue {
    fn push(&mut self, value: String) {
        match self {
            KvlmValue::Single(existing) => {
                *self = KvlmValue::Multiple(vec![std::mem::take(existing), value]);
            }
            KvlmValue::Multiple(values) => values.push(value),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            KvlmValue::Single(value) => std::slice::from_ref(value).iter(),
            KvlmValue::Multiple(values) => values.iter(),
        }
        .map(String::as_str)
    }
}

/// Insertion-ordered fields plus the trailing message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kvlm {
    entries: Vec<(String, KvlmValue)>,
    message: String,
}

impl Kvlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a commit/tag payload.
    ///
    /// Continuation spaces are stripped from field values; the message is
    /// taken verbatim. A payload with no fields and no blank line is all
    /// message.
    pub fn parse(data: &[u8]) -> Result<Self, SiltError> {
        let text = std::str::from_utf8(data)
            .map_err(|_| SiltError::BadKvlm("payload is not valid UTF-8".to_string()))?;
        let bytes = text.as_bytes();

        let mut kvlm = Kvlm::new();
        let mut pos = 0;

        while pos < bytes.len() {
            if bytes[pos] == b'\n' {
                // blank line: the rest is the message
                kvlm.message = text[pos + 1..].to_string();
                break;
            }
            if bytes[pos] == b' ' {
                return Err(SiltError::BadKvlm(
                    "continuation line before any field".to_string(),
                ));
            }

            let space = text[pos..].find(' ').map(|i| pos + i);
            let newline = text[pos..].find('\n').map(|i| pos + i);
            let keyless = match (space, newline) {
                (None, _) => true,
                (Some(sp), Some(nl)) => nl < sp,
                (Some(_), None) => false,
            };

            if keyless {
                if kvlm.entries.is_empty() && !text[pos..].contains("\n\n") {
                    kvlm.message = text[pos..].to_string();
                    break;
                }
                return Err(SiltError::BadKvlm(
                    "line without a key before the message separator".to_string(),
                ));
            }

            let space = space.expect("keyless lines are handled above");
            let key = text[pos..space].to_string();

            // the value ends at the first LF not followed by a continuation space
            let mut end = space;
            loop {
                match text[end + 1..].find('\n') {
                    Some(i) => {
                        end = end + 1 + i;
                        if end + 1 >= bytes.len() || bytes[end + 1] != b' ' {
                            break;
                        }
                    }
                    None => {
                        end = bytes.len();
                        break;
                    }
                }
            }

            let value = text[space + 1..end].replace("\n ", "\n");
            kvlm.push(key, value);
            pos = end + 1;
        }

        Ok(kvlm)
    }

    /// Encode back to the wire form: fields in insertion order, each embedded
    /// LF re-armed with its continuation space, then one blank line and the
    /// message.
    pub fn serialize(&self) -> Bytes {
        let mut out = String::new();

        for (key, value) in &self.entries {
            for v in value.iter() {
                out.push_str(key);
                out.push(' ');
                out.push_str(&v.replace('\n', "\n "));
                out.push('\n');
            }
        }

        out.push('\n');
        out.push_str(&self.message);

        Bytes::from(out)
    }

    /// Append a field value, promoting the key to a list when it repeats.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.push(value.into()),
            None => self.entries.push((key, KvlmValue::Single(value.into()))),
        }
    }

    /// First value under `key`, if any.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.iter().next())
    }

    /// Every value under `key`, in insertion order.
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.iter().collect())
            .unwrap_or_default()
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }
}
