//! Plumbing commands (low-level operations)
//!
//! Plumbing commands provide direct access to the internal data structures.
//! They are primarily scripting building blocks.
//!
//! ## Commands
//!
//! - `cat-file`: print an object's payload
//! - `hash-object`: compute an object id and optionally store the object
//! - `ls-tree`: list the contents of a tree object
//! - `rev-parse`: resolve a name to a full object id
//! - `show-ref`: list references and their targets

pub mod cat_file;
pub mod hash_object;
pub mod ls_tree;
pub mod rev_parse;
pub mod show_ref;
