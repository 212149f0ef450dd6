use crate::areas::repository::Repository;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::object_find;
use crate::errors::SiltError;
use anyhow::Context;
use std::path::Path;

impl Repository {
    /// Instantiate the tree `name` resolves to (a commit resolves to its
    /// tree) inside `target`, which must be an empty directory. It is
    /// created when missing.
    pub fn checkout(&self, name: &str, target: &Path) -> anyhow::Result<()> {
        let tree_oid = object_find(self, name, Some(ObjectType::Tree), true)?
            .ok_or_else(|| anyhow::anyhow!("{name} does not resolve to a tree"))?;

        if target.exists() {
            if !target.is_dir() {
                return Err(SiltError::NotADirectory(target.to_path_buf()).into());
            }
            if target.read_dir()?.next().is_some() {
                anyhow::bail!("directory {} is not empty", target.display());
            }
        } else {
            std::fs::create_dir_all(target)
                .with_context(|| format!("failed to create directory {}", target.display()))?;
        }

        self.instantiate_tree(&tree_oid, target)
    }

    fn instantiate_tree(&self, oid: &ObjectId, target: &Path) -> anyhow::Result<()> {
        let object = self
            .database()
            .load(oid)?
            .ok_or_else(|| SiltError::BadObject(format!("{oid} is missing from the store")))?;

        let GitObject::Tree(tree) = object else {
            return Err(SiltError::BadObject(format!("{oid} is not a tree")).into());
        };

        for leaf in tree.leaves() {
            let destination = target.join(leaf.path());

            if leaf.is_subtree() {
                std::fs::create_dir(&destination).with_context(|| {
                    format!("failed to create directory {}", destination.display())
                })?;
                self.instantiate_tree(leaf.sha(), &destination)?;
            } else {
                let blob = self.database().load(leaf.sha())?.ok_or_else(|| {
                    SiltError::BadObject(format!("{} is missing from the store", leaf.sha()))
                })?;
                let GitObject::Blob(blob) = blob else {
                    return Err(
                        SiltError::BadObject(format!("{} is not a blob", leaf.sha())).into(),
                    );
                };

                std::fs::write(&destination, blob.content())
                    .with_context(|| format!("failed to write file {}", destination.display()))?;
            }
        }

        Ok(())
    }
}
