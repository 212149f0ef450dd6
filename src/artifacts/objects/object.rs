//! The tagged object variant
//!
//! Every object the store handles is one of four kinds, distinguished by the
//! `fmt` tag of its frame. Serialization dispatches to the payload codec of
//! the variant; deserialization is the inverse, keyed by the fmt string read
//! from the frame.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, Tag};
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::SiltError;
use bytes::Bytes;

/// A typed object: blob, commit, tag, or tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitObject {
    Blob(Blob),
    Commit(Commit),
    Tag(Tag),
    Tree(Tree),
}

impl GitObject {
    pub fn object_type(&self) -> ObjectType {
        match self {
            GitObject::Blob(_) => ObjectType::Blob,
            GitObject::Commit(_) => ObjectType::Commit,
            GitObject::Tag(_) => ObjectType::Tag,
            GitObject::Tree(_) => ObjectType::Tree,
        }
    }

    /// Serialize the payload (frame excluded; framing is the codec's job).
    pub fn serialize(&self) -> anyhow::Result<Bytes> {
        match self {
            GitObject::Blob(blob) => Ok(blob.serialize()),
            GitObject::Commit(commit) => Ok(commit.serialize()),
            GitObject::Tag(tag) => Ok(tag.serialize()),
            GitObject::Tree(tree) => tree.serialize(),
        }
    }

    /// Parse a payload into the variant named by `object_type`.
    pub fn deserialize(object_type: ObjectType, payload: Bytes) -> Result<Self, SiltError> {
        match object_type {
            ObjectType::Blob => Ok(GitObject::Blob(Blob::new(payload))),
            ObjectType::Commit => Ok(GitObject::Commit(Commit::parse(&payload)?)),
            ObjectType::Tag => Ok(GitObject::Tag(Tag::parse(&payload)?)),
            ObjectType::Tree => Ok(GitObject::Tree(Tree::parse(&payload)?)),
        }
    }
}
