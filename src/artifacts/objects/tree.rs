//! Git tree object
//!
//! Trees represent directory snapshots. Each entry (leaf) binds a mode and a
//! path to the id of a blob or of a nested tree.
//!
//! ## Format
//!
//! Payload: concatenated binary entries `<mode> <path>\0<20-byte-sha1>`.
//! Modes read from disk may be 5 digits (`40000`); they are normalized to
//! 6 digits in memory and emitted verbatim on serialization.
//!
//! ## Canonical order
//!
//! Entries sort by path, with directories compared as if their name carried
//! a trailing `/`. Serialization always re-establishes this order.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::SiltError;
use bytes::Bytes;
use derive_new::new;

const RAW_SHA_LENGTH: usize = 20;

/// A single tree entry: `(mode, path, sha)`.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeLeaf {
    mode: String,
    path: String,
    sha: ObjectId,
}

impl TreeLeaf {
    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn sha(&self) -> &ObjectId {
        &self.sha
    }

    /// Whether this leaf names a subtree (`04` mode prefix).
    pub fn is_subtree(&self) -> bool {
        self.mode.starts_with("04")
    }

    /// The object kind the mode prefix announces: `04` subtree, `10` regular
    /// file, `12` symlink (stored as a blob), `16` submodule (a commit
    /// pointer).
    pub fn object_type(&self) -> Result<ObjectType, SiltError> {
        match &self.mode[..2] {
            "04" => Ok(ObjectType::Tree),
            "10" | "12" => Ok(ObjectType::Blob),
            "16" => Ok(ObjectType::Commit),
            prefix => Err(SiltError::BadObject(format!(
                "unknown tree leaf mode {} (prefix {})",
                self.mode, prefix
            ))),
        }
    }

    /// The key leaves sort by: directories compare with a trailing slash.
    fn sort_key(&self) -> String {
        if self.is_subtree() {
            format!("{}/", self.path)
        } else {
            self.path.clone()
        }
    }
}

/// An ordered sequence of tree leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    leaves: Vec<TreeLeaf>,
}

impl Tree {
    pub fn new(leaves: Vec<TreeLeaf>) -> Self {
        Tree { leaves }
    }

    pub fn leaves(&self) -> &[TreeLeaf] {
        &self.leaves
    }

    /// Parse one binary entry starting at `start`; returns the leaf and the
    /// offset of the next entry.
    fn parse_one(raw: &[u8], start: usize) -> Result<(TreeLeaf, usize), SiltError> {
        let space = raw[start..]
            .iter()
            .position(|&b| b == b' ')
            .map(|i| start + i)
            .ok_or_else(|| SiltError::BadObject("tree entry without a mode".to_string()))?;

        let mode = std::str::from_utf8(&raw[start..space])
            .map_err(|_| SiltError::BadObject("tree entry mode is not ASCII".to_string()))?;
        if !(5..=6).contains(&mode.len()) || !mode.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SiltError::BadObject(format!(
                "invalid tree entry mode: {mode}"
            )));
        }
        // 5-digit modes read from disk gain a leading zero
        let mode = if mode.len() == 5 {
            format!("0{mode}")
        } else {
            mode.to_string()
        };

        let null = raw[space..]
            .iter()
            .position(|&b| b == b'\0')
            .map(|i| space + i)
            .ok_or_else(|| {
                SiltError::BadObject("tree entry without a path terminator".to_string())
            })?;

        let path = std::str::from_utf8(&raw[space + 1..null])
            .map_err(|_| SiltError::BadObject("tree entry path is not valid UTF-8".to_string()))?
            .to_string();

        let next = null + 1 + RAW_SHA_LENGTH;
        if next > raw.len() {
            return Err(SiltError::BadObject(
                "tree entry truncated inside the object id".to_string(),
            ));
        }
        let sha = ObjectId::from_raw(&raw[null + 1..next])
            .map_err(|e| SiltError::BadObject(e.to_string()))?;

        Ok((TreeLeaf::new(mode, path, sha), next))
    }

    /// Parse a whole tree payload. An empty payload is an empty tree.
    pub fn parse(raw: &[u8]) -> Result<Self, SiltError> {
        let mut offset = 0;
        let mut leaves = Vec::new();

        while offset < raw.len() {
            let (leaf, next) = Self::parse_one(raw, offset)?;
            leaves.push(leaf);
            offset = next;
        }

        Ok(Tree { leaves })
    }

    /// Serialize in canonical order. Modes are emitted verbatim, so a tree
    /// parsed from canonical bytes reproduces them exactly.
    pub fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut leaves = self.leaves.clone();
        leaves.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        let mut out = Vec::new();
        for leaf in &leaves {
            out.extend_from_slice(leaf.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(leaf.path.as_bytes());
            out.push(0);
            leaf.sha.write_raw_to(&mut out)?;
        }

        Ok(Bytes::from(out))
    }
}
