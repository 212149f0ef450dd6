//! Object database (the codec)
//!
//! All objects are stored content-addressed: the frame
//! `<fmt> <size>\0<payload>` is hashed with SHA-1 to produce the identity,
//! then zlib-deflated and written to `.git/objects/<first-2>/<rest>`.
//!
//! ## Crash safety
//!
//! The deflate stream is written to a temporary name in the fan-out
//! directory, flushed to disk, and only then renamed onto the id-derived
//! path. An object discoverable by id is therefore always complete: either
//! not present, or byte-correct.

use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::SiltError;
use anyhow::Context;
use bytes::Bytes;
use rand;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use sha1::{Digest, Sha1};
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Content-addressed object store rooted at `.git/objects`.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Build the frame the identity is computed over.
    fn frame(payload: &[u8], object_type: &ObjectType) -> Bytes {
        let mut frame = Vec::with_capacity(payload.len() + 16);
        frame.extend_from_slice(object_type.as_str().as_bytes());
        frame.push(b' ');
        frame.extend_from_slice(payload.len().to_string().as_bytes());
        frame.push(0);
        frame.extend_from_slice(payload);

        Bytes::from(frame)
    }

    fn digest(frame: &[u8]) -> anyhow::Result<ObjectId> {
        let mut hasher = Sha1::new();
        hasher.update(frame);

        ObjectId::try_parse(format!("{:x}", hasher.finalize()))
    }

    /// SHA-1 of the framed payload, as a lower-hex id.
    pub fn hash(payload: &[u8], object_type: &ObjectType) -> anyhow::Result<ObjectId> {
        Self::digest(&Self::frame(payload, object_type))
    }

    /// The id an object would be stored under, without touching disk.
    pub fn hash_object(object: &GitObject) -> anyhow::Result<ObjectId> {
        let payload = object.serialize()?;
        Self::hash(&payload, &object.object_type())
    }

    /// Serialize, frame, hash and write an object.
    ///
    /// Objects are immutable: a write whose target file already exists is a
    /// no-op.
    pub fn store(&self, object: &GitObject) -> anyhow::Result<ObjectId> {
        let payload = object.serialize()?;
        let frame = Self::frame(&payload, &object.object_type());
        let oid = Self::digest(&frame)?;

        let object_path = self.path.join(oid.to_path());
        if object_path.exists() {
            return Ok(oid);
        }

        let fan_out = object_path
            .parent()
            .with_context(|| format!("object path {} has no parent", object_path.display()))?;
        std::fs::create_dir_all(fan_out)
            .with_context(|| format!("failed to create fan-out directory {}", fan_out.display()))?;

        self.write_object(&object_path, &frame)?;

        Ok(oid)
    }

    /// Deflate `frame` into the fan-out directory under a temporary name,
    /// flush it, then rename onto the final path.
    fn write_object(&self, object_path: &Path, frame: &[u8]) -> anyhow::Result<()> {
        let fan_out = object_path
            .parent()
            .with_context(|| format!("object path {} has no parent", object_path.display()))?;
        let staging_path = fan_out.join(format!("incoming-{:08x}", rand::random::<u32>()));

        let staging = std::fs::File::create(&staging_path)
            .with_context(|| format!("failed to stage object at {}", staging_path.display()))?;

        let mut encoder = ZlibEncoder::new(staging, flate2::Compression::default());
        encoder
            .write_all(frame)
            .with_context(|| format!("failed to deflate object into {}", staging_path.display()))?;
        let staging = encoder
            .finish()
            .with_context(|| format!("failed to finish deflating {}", staging_path.display()))?;

        // durable before discoverable
        staging
            .sync_all()
            .with_context(|| format!("failed to flush staged object {}", staging_path.display()))?;
        std::fs::rename(&staging_path, object_path).with_context(|| {
            format!(
                "failed to move staged object into place at {}",
                object_path.display()
            )
        })?;

        Ok(())
    }

    /// Read an object back by id; `None` when the file is absent.
    ///
    /// Fails with a bad-object error on any framing inconsistency: missing
    /// space or NUL, a size that does not match the payload, or a zlib
    /// failure. An unknown fmt tag is its own error.
    pub fn load(&self, oid: &ObjectId) -> anyhow::Result<Option<GitObject>> {
        let object_path = self.path.join(oid.to_path());
        if !object_path.is_file() {
            return Ok(None);
        }

        let file = std::fs::File::open(&object_path)
            .with_context(|| format!("failed to open object file {}", object_path.display()))?;

        let mut frame = Vec::new();
        ZlibDecoder::new(BufReader::new(file))
            .read_to_end(&mut frame)
            .map_err(|_| SiltError::BadObject(format!("{oid}: zlib inflation failed")))?;
        let frame = Bytes::from(frame);

        let space = frame
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| SiltError::BadObject(format!("{oid}: missing space in header")))?;
        let null = frame[space..]
            .iter()
            .position(|&b| b == b'\0')
            .map(|i| space + i)
            .ok_or_else(|| SiltError::BadObject(format!("{oid}: missing NUL in header")))?;

        let fmt = std::str::from_utf8(&frame[..space])
            .map_err(|_| SiltError::BadObject(format!("{oid}: non-ASCII fmt tag")))?;
        let object_type = ObjectType::try_from(fmt)?;

        let size: usize = std::str::from_utf8(&frame[space + 1..null])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| SiltError::BadObject(format!("{oid}: unreadable size in header")))?;

        let payload = frame.slice(null + 1..);
        if payload.len() != size {
            return Err(SiltError::BadObject(format!(
                "{oid}: declared size {size} but payload is {} bytes",
                payload.len()
            ))
            .into());
        }

        Ok(Some(GitObject::deserialize(object_type, payload)?))
    }

    /// List every stored id that starts with a hex prefix, in sorted order.
    ///
    /// The first two prefix characters select the fan-out directories to
    /// scan; shorter prefixes widen the scan to every matching directory.
    pub fn find_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let (fan_outs, file_prefix) = if let Some(fan_out) = prefix.get(..2) {
            (vec![fan_out.to_string()], &prefix[2..])
        } else {
            let matching = (0..=255u8)
                .map(|byte| format!("{byte:02x}"))
                .filter(|fan_out| fan_out.starts_with(prefix))
                .collect::<Vec<_>>();
            (matching, "")
        };

        let mut matches = Vec::new();
        for fan_out in fan_outs {
            let entries = match std::fs::read_dir(self.path.join(&fan_out)) {
                Ok(entries) => entries,
                // a fan-out directory that was never created holds nothing
                Err(_) => continue,
            };

            for entry in entries {
                let file_name = entry?.file_name();
                let Some(file_name) = file_name.to_str() else {
                    continue;
                };

                if file_name.starts_with(file_prefix) {
                    if let Ok(oid) = ObjectId::try_parse(format!("{fan_out}{file_name}")) {
                        matches.push(oid);
                    }
                }
            }
        }

        matches.sort();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;

    /// Plant an arbitrary (possibly malformed) frame at an id's path.
    fn plant_frame(database: &Database, oid: &ObjectId, frame: &[u8]) {
        let path = database.objects_path().join(oid.to_path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = ZlibEncoder::new(file, flate2::Compression::default());
        encoder.write_all(frame).unwrap();
        encoder.finish().unwrap();
    }

    #[test]
    fn test_hash_matches_known_blob_id() {
        // git hash-object for "hello world" (no trailing newline)
        let oid = Database::hash(b"hello world", &ObjectType::Blob).unwrap();
        assert_eq!(oid.as_ref(), "95d09f2b10159347eece71399a7e2e907ea3df4f");
    }

    #[test]
    fn test_frame_layout() {
        let frame = Database::frame(b"hello world", &ObjectType::Blob);
        assert_eq!(&frame[..], b"blob 11\0hello world");
    }

    #[test]
    fn test_store_load_round_trip() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        let object = GitObject::Blob(Blob::new(Bytes::from_static(b"hello world")));
        let oid = database.store(&object).unwrap();

        assert_eq!(oid.as_ref(), "95d09f2b10159347eece71399a7e2e907ea3df4f");
        let loaded = database.load(&oid).unwrap().unwrap();
        assert_eq!(loaded, object);
    }

    #[test]
    fn test_load_missing_object_is_none() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        let oid =
            ObjectId::try_parse("95d09f2b10159347eece71399a7e2e907ea3df4f".to_string()).unwrap();
        assert!(database.load(&oid).unwrap().is_none());
    }

    #[test]
    fn test_repeated_store_is_a_noop() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        let object = GitObject::Blob(Blob::new(Bytes::from_static(b"same bytes")));
        let first = database.store(&object).unwrap();
        let second = database.store(&object).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_load_rejects_a_lying_size() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        let oid = Database::hash(b"xyz", &ObjectType::Blob).unwrap();
        plant_frame(&database, &oid, b"blob 99\0xyz");

        let err = database.load(&oid).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SiltError>(),
            Some(SiltError::BadObject(_))
        ));
    }

    #[test]
    fn test_load_rejects_garbage_compression() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        // raw bytes that were never deflated
        let oid = Database::hash(b"xyz", &ObjectType::Blob).unwrap();
        let path = database.objects_path().join(oid.to_path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"not a zlib stream").unwrap();

        let err = database.load(&oid).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SiltError>(),
            Some(SiltError::BadObject(_))
        ));
    }

    #[test]
    fn test_load_rejects_unknown_fmt() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        let oid = Database::hash(b"xyz", &ObjectType::Blob).unwrap();
        plant_frame(&database, &oid, b"gadget 3\0xyz");

        let err = database.load(&oid).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SiltError>(),
            Some(SiltError::UnknownObjectType(_))
        ));
    }

    #[test]
    fn test_find_by_prefix_lists_matches() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        let first = database
            .store(&GitObject::Blob(Blob::new(Bytes::from_static(b"one"))))
            .unwrap();
        database
            .store(&GitObject::Blob(Blob::new(Bytes::from_static(b"two"))))
            .unwrap();

        let matches = database.find_by_prefix(&first.as_ref()[..6]).unwrap();
        assert_eq!(matches, vec![first]);
    }

    #[test]
    fn test_find_by_prefix_on_an_empty_store_is_empty() {
        let dir = assert_fs::TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        assert!(database.find_by_prefix("abcd").unwrap().is_empty());
    }
}
