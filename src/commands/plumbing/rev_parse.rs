use crate::areas::repository::Repository;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::object_find;
use std::io::Write;

impl Repository {
    /// Resolve `name` to a full object id, optionally coercing it to a
    /// wanted type first.
    pub fn rev_parse(&self, name: &str, object_type: Option<&str>) -> anyhow::Result<()> {
        let want = object_type.map(ObjectType::try_from).transpose()?;
        let oid = object_find(self, name, want, true)?
            .ok_or_else(|| anyhow::anyhow!("{name} does not resolve to the requested type"))?;

        writeln!(self.writer(), "{}", oid)?;

        Ok(())
    }
}
