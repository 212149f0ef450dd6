//! Git commit and tag objects
//!
//! Both payloads are KVLM under the hood. A commit records a `tree`, zero or
//! more `parent`s, `author`/`committer` identities and a message; an
//! annotated tag records `object`, `type`, `tag` and `tagger`. The two are
//! kept as distinct types so the wire fmt is never confused even though the
//! payload grammars coincide.

use crate::artifacts::kvlm::Kvlm;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::SiltError;
use anyhow::Context;
use bytes::Bytes;

/// Author or committer identity with timestamp and timezone.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    /// Read the identity from GIT_AUTHOR_NAME / GIT_AUTHOR_EMAIL, falling
    /// back to a fixed placeholder when unset.
    pub fn from_env_or_default() -> Self {
        let name = std::env::var("GIT_AUTHOR_NAME").unwrap_or_else(|_| "Silt".to_string());
        let email =
            std::env::var("GIT_AUTHOR_EMAIL").unwrap_or_else(|_| "silt@localhost".to_string());

        Author::new(name, email)
    }

    /// The on-disk form: `Name <email> timestamp timezone`.
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// `Mon Jan 1 12:34:56 2024 +0000`, the log date format.
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> timestamp timezone"; split from the right so
        // names may contain spaces
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(anyhow::anyhow!("Invalid author format"));
        }

        let timezone = parts[0];
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
        let name_email_part = parts[2];

        let email_start = name_email_part
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '<'"))?;
        let email_end = name_email_part
            .find('>')
            .ok_or_else(|| anyhow::anyhow!("Invalid author format: missing '>'"))?;

        let name = name_email_part[..email_start].trim().to_string();
        let email = name_email_part[email_start + 1..email_end].to_string();

        let datetime = chrono::DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?;
        let datetime = chrono::DateTime::parse_from_str(
            &format!("{} {}", datetime.format("%Y-%m-%d %H:%M:%S"), timezone),
            "%Y-%m-%d %H:%M:%S %z",
        )
        .map_err(|_| anyhow::anyhow!("Invalid timezone"))?;

        Ok(Author {
            name,
            email,
            timestamp: datetime,
        })
    }
}

/// A commit payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    kvlm: Kvlm,
}

impl Commit {
    pub fn new(kvlm: Kvlm) -> Self {
        Commit { kvlm }
    }

    pub fn parse(payload: &[u8]) -> Result<Self, SiltError> {
        Ok(Commit {
            kvlm: Kvlm::parse(payload)?,
        })
    }

    pub fn serialize(&self) -> Bytes {
        self.kvlm.serialize()
    }

    pub fn tree_oid(&self) -> anyhow::Result<ObjectId> {
        let tree = self
            .kvlm
            .value("tree")
            .context("commit object has no tree field")?;

        ObjectId::try_parse(tree.to_string())
    }

    /// Parent ids in recorded order; empty for an initial commit.
    pub fn parents(&self) -> anyhow::Result<Vec<ObjectId>> {
        self.kvlm
            .values("parent")
            .into_iter()
            .map(|parent| ObjectId::try_parse(parent.to_string()))
            .collect()
    }

    pub fn author(&self) -> anyhow::Result<Author> {
        let author = self
            .kvlm
            .value("author")
            .context("commit object has no author field")?;

        Author::try_from(author)
    }

    pub fn message(&self) -> &str {
        self.kvlm.message()
    }

    pub fn short_message(&self) -> String {
        self.message().lines().next().unwrap_or("").to_string()
    }
}

/// An annotated tag payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    kvlm: Kvlm,
}

impl Tag {
    pub fn new(kvlm: Kvlm) -> Self {
        Tag { kvlm }
    }

    /// Build a fresh annotated tag pointing at `target`.
    pub fn annotated(
        target: &ObjectId,
        target_type: &str,
        name: &str,
        tagger: &Author,
        message: &str,
    ) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.push("object", target.as_ref());
        kvlm.push("type", target_type);
        kvlm.push("tag", name);
        kvlm.push("tagger", tagger.display());
        kvlm.set_message(message);

        Tag { kvlm }
    }

    pub fn parse(payload: &[u8]) -> Result<Self, SiltError> {
        Ok(Tag {
            kvlm: Kvlm::parse(payload)?,
        })
    }

    pub fn serialize(&self) -> Bytes {
        self.kvlm.serialize()
    }

    /// The id of the object this tag points at.
    pub fn target(&self) -> anyhow::Result<ObjectId> {
        let object = self
            .kvlm
            .value("object")
            .context("tag object has no object field")?;

        ObjectId::try_parse(object.to_string())
    }

    pub fn name(&self) -> Option<&str> {
        self.kvlm.value("tag")
    }

    pub fn message(&self) -> &str {
        self.kvlm.message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_round_trip_through_display() {
        let raw = "Carlton Egremont III <carlton@example.com> 1527025023 +0200";
        let author = Author::try_from(raw).unwrap();

        assert_eq!(
            author.display_name(),
            "Carlton Egremont III <carlton@example.com>"
        );
        assert_eq!(author.display(), raw);
    }

    #[test]
    fn test_author_rejects_missing_email() {
        assert!(Author::try_from("nobody 1527025023 +0200").is_err());
    }

    #[test]
    fn test_commit_accessors() {
        let raw = "tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\n\
                   parent 206941306e8a8af65b66eaaaea388a7ae24d49a0\n\
                   author A U Thor <thor@example.com> 1527025023 +0200\n\
                   \n\
                   Subject line\n\
                   \n\
                   Body.";
        let commit = Commit::parse(raw.as_bytes()).unwrap();

        assert_eq!(
            commit.tree_oid().unwrap().as_ref(),
            "29ff16c9c14e2652b22f8b78bb08a5a07930c147"
        );
        assert_eq!(commit.parents().unwrap().len(), 1);
        assert_eq!(commit.short_message(), "Subject line");
    }

    #[test]
    fn test_initial_commit_has_no_parents() {
        let raw = "tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\n\
                   author A U Thor <thor@example.com> 1527025023 +0200\n\
                   \n\
                   root";
        let commit = Commit::parse(raw.as_bytes()).unwrap();

        assert!(commit.parents().unwrap().is_empty());
    }

    #[test]
    fn test_annotated_tag_serializes_expected_fields() {
        let target =
            ObjectId::try_parse("206941306e8a8af65b66eaaaea388a7ae24d49a0".to_string()).unwrap();
        let tagger = Author::new("Tagger".to_string(), "tagger@example.com".to_string());
        let tag = Tag::annotated(&target, "commit", "v1.0", &tagger, "release");

        let wire = tag.serialize();
        let reparsed = Tag::parse(&wire).unwrap();

        assert_eq!(reparsed.target().unwrap(), target);
        assert_eq!(reparsed.name(), Some("v1.0"));
        assert_eq!(reparsed.message(), "release");
    }
}
