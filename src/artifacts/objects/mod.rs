//! Typed object variants and their identities

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a hex-encoded object id.
pub const OBJECT_ID_LENGTH: usize = 40;
