//! Git data structures and algorithms
//!
//! This module contains the core types and parsers:
//!
//! - `kvlm`: the key-value-list-with-message format behind commits and tags
//! - `objects`: the typed object variants (blob, commit, tag, tree)
//! - `revision`: name resolution (short hashes, refs, type following)

pub mod kvlm;
pub mod objects;
pub mod revision;
