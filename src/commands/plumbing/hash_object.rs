use crate::areas::database::Database;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Hash a file as an object of the given type, optionally storing it.
    pub fn hash_object(&self, file: &Path, object_type: &str, write: bool) -> anyhow::Result<()> {
        let object_type = ObjectType::try_from(object_type)?;
        let data = std::fs::read(file)
            .with_context(|| format!("failed to read file {}", file.display()))?;

        let object = GitObject::deserialize(object_type, Bytes::from(data))?;

        let oid = if write {
            self.database().store(&object)?
        } else {
            Database::hash_object(&object)?
        };

        writeln!(self.writer(), "{}", oid)?;

        Ok(())
    }
}
