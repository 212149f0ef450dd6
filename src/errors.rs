//! Error taxonomy for the object store and reference layer
//!
//! Parser and codec failures propagate to the caller unchanged; the ref and
//! name layers convert "no such file" into a structural `None` instead of an
//! error. Command bodies turn any of these into a one-line message and a
//! nonzero exit code.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiltError {
    /// The gitdir is missing, or the upward walk hit the filesystem root.
    #[error("not a silt repository (or any of the parent directories): {0}")]
    NotARepository(PathBuf),

    /// Config file missing or an unsupported repositoryformatversion.
    #[error("bad configuration: {0}")]
    BadConfig(String),

    /// A path expected to be a directory is something else.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Framing, size, zlib, or structural parse failure.
    #[error("bad object: {0}")]
    BadObject(String),

    /// Framed fmt tag outside {blob, commit, tag, tree}.
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    /// Malformed key-value-list-with-message payload.
    #[error("malformed commit or tag payload: {0}")]
    BadKvlm(String),

    /// The name layer resolved zero candidates.
    #[error("no such reference: {0}")]
    NoSuchReference(String),

    /// The name layer resolved more than one candidate.
    #[error("ambiguous reference {name}: candidates are\n{}", .candidates.join("\n"))]
    AmbiguousReference {
        name: String,
        candidates: Vec<String>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
