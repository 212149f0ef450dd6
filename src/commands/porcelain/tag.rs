use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Tag};
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::revision::object_find;
use crate::errors::SiltError;
use std::io::Write;

const TAGS_NAMESPACE: &str = "refs/tags";

impl Repository {
    /// Without a name, list existing tags. With one, point `refs/tags/<name>`
    /// at the object `target` resolves to; `annotate` stores a full tag
    /// object first and references that instead.
    pub fn tag(&self, name: Option<&str>, target: &str, annotate: bool) -> anyhow::Result<()> {
        let Some(name) = name else {
            return self.list_tags();
        };

        let target_oid = object_find(self, target, None, true)?
            .ok_or_else(|| anyhow::anyhow!("{target} does not resolve to an object"))?;

        let ref_target = if annotate {
            let target_type = self
                .database()
                .load(&target_oid)?
                .ok_or_else(|| {
                    SiltError::BadObject(format!("{target_oid} is missing from the store"))
                })?
                .object_type();

            let tagger = Author::from_env_or_default();
            let tag = Tag::annotated(
                &target_oid,
                target_type.as_str(),
                name,
                &tagger,
                &format!("tag {name}\n"),
            );

            self.database().store(&GitObject::Tag(tag))?
        } else {
            target_oid
        };

        self.refs()
            .create(&format!("{TAGS_NAMESPACE}/{name}"), &ref_target)
    }

    fn list_tags(&self) -> anyhow::Result<()> {
        let prefix = format!("{TAGS_NAMESPACE}/");

        for name in self.refs().list(None)?.keys() {
            if let Some(short_name) = name.strip_prefix(&prefix) {
                writeln!(self.writer(), "{}", short_name)?;
            }
        }

        Ok(())
    }
}
