use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::object_find;
use crate::errors::SiltError;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// Print the raw payload of the object `name` resolves to, coerced to
    /// the requested type.
    pub fn cat_file(&self, object_type: &str, name: &str) -> anyhow::Result<()> {
        let want = ObjectType::try_from(object_type)?;
        let oid = object_find(self, name, Some(want), true)?
            .ok_or_else(|| anyhow::anyhow!("{name} does not resolve to a {want} object"))?;

        let object = self
            .database()
            .load(&oid)?
            .ok_or_else(|| SiltError::BadObject(format!("{oid} is missing from the store")))?;
        let payload = object.serialize()?;

        self.writer()
            .write_all(&payload)
            .context("failed to write object payload")?;

        Ok(())
    }
}
