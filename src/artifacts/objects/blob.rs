//! Git blob object
//!
//! Blobs store file content. They carry only the raw bytes; names and modes
//! live in the trees that reference them.

use bytes::Bytes;
use derive_new::new;

/// An opaque byte string, the fundamental unit of file storage.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    pub fn serialize(&self) -> Bytes {
        self.content.clone()
    }
}
