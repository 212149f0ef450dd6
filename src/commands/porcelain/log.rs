use crate::areas::repository::Repository;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::revision::object_find;
use crate::errors::SiltError;
use colored::Colorize;
use std::collections::HashSet;
use std::io::Write;

impl Repository {
    /// Print the history reachable from `name` (default HEAD), parents
    /// first-to-last, each commit visited once.
    pub fn log(&self, name: &str) -> anyhow::Result<()> {
        let start = object_find(self, name, Some(ObjectType::Commit), true)?
            .ok_or_else(|| anyhow::anyhow!("{name} does not resolve to a commit"))?;

        let mut visited = HashSet::new();
        let mut pending = vec![start];

        while let Some(oid) = pending.pop() {
            if !visited.insert(oid.clone()) {
                continue;
            }

            let object = self
                .database()
                .load(&oid)?
                .ok_or_else(|| SiltError::BadObject(format!("{oid} is missing from the store")))?;
            let GitObject::Commit(commit) = object else {
                return Err(SiltError::BadObject(format!("{oid} is not a commit")).into());
            };

            writeln!(self.writer(), "{}", format!("commit {}", oid).yellow())?;
            let author = commit.author()?;
            writeln!(self.writer(), "Author: {}", author.display_name())?;
            writeln!(self.writer(), "Date:   {}", author.readable_timestamp())?;
            writeln!(self.writer())?;
            for line in commit.message().lines() {
                writeln!(self.writer(), "    {}", line)?;
            }
            writeln!(self.writer())?;

            // push in reverse so the first parent is walked first
            for parent in commit.parents()?.into_iter().rev() {
                if !visited.contains(&parent) {
                    pending.push(parent);
                }
            }
        }

        Ok(())
    }
}
