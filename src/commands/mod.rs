//! Command implementations
//!
//! Organized into two categories following Git's architecture:
//!
//! - `plumbing`: low-level object manipulation (cat-file, hash-object,
//!   ls-tree, rev-parse, show-ref)
//! - `porcelain`: user-facing workflows (init, log, checkout, tag)
//!
//! Every command is a method on `Repository` writing through its attached
//! writer; the binary maps failures to a one-line stderr message.

pub mod plumbing;
pub mod porcelain;
