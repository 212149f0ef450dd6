use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// List every ref under `.git/refs` with the id it resolves to.
    pub fn show_ref(&self) -> anyhow::Result<()> {
        for (name, oid) in self.refs().list(None)? {
            writeln!(self.writer(), "{} {}", oid, name)?;
        }

        Ok(())
    }
}
