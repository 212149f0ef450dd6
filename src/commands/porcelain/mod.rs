//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: initialize a new repository
//! - `log`: show commit history
//! - `checkout`: instantiate a commit's tree in an empty directory
//! - `tag`: list tags, or create lightweight and annotated tags

pub mod checkout;
pub mod init;
pub mod log;
pub mod tag;
