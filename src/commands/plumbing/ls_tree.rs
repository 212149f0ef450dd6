use crate::areas::repository::Repository;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::object_find;
use crate::errors::SiltError;
use std::io::Write;
use std::path::{Path, PathBuf};

impl Repository {
    /// List the contents of the tree `name` resolves to (a commit resolves
    /// to its tree). With `recursive`, subtrees are expanded in place.
    pub fn ls_tree(&self, name: &str, recursive: bool) -> anyhow::Result<()> {
        let oid = object_find(self, name, Some(ObjectType::Tree), true)?
            .ok_or_else(|| anyhow::anyhow!("{name} does not resolve to a tree"))?;

        self.print_tree(&oid, None, recursive)
    }

    fn print_tree(
        &self,
        oid: &ObjectId,
        prefix: Option<&Path>,
        recursive: bool,
    ) -> anyhow::Result<()> {
        let object = self
            .database()
            .load(oid)?
            .ok_or_else(|| SiltError::BadObject(format!("{oid} is missing from the store")))?;

        let GitObject::Tree(tree) = object else {
            return Err(SiltError::BadObject(format!("{oid} is not a tree")).into());
        };

        for leaf in tree.leaves() {
            let path = match prefix {
                Some(prefix) => prefix.join(leaf.path()),
                None => PathBuf::from(leaf.path()),
            };

            if recursive && leaf.is_subtree() {
                self.print_tree(leaf.sha(), Some(&path), recursive)?;
            } else {
                writeln!(
                    self.writer(),
                    "{} {} {}\t{}",
                    leaf.mode(),
                    leaf.object_type()?,
                    leaf.sha(),
                    path.display()
                )?;
            }
        }

        Ok(())
    }
}
