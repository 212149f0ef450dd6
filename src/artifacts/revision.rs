//! Name resolution
//!
//! Turns a user-supplied string ("HEAD", a short hex prefix, a tag, a
//! branch) into a unique object id, optionally following type indirection
//! (tag → commit → tree).
//!
//! ## Resolution rules, applied in order and unioned
//!
//! 1. the empty name yields nothing
//! 2. `HEAD` is resolved through the ref layer alone
//! 3. a 4-40 character hex string matches ids by prefix in the object store
//! 4. `refs/tags/<name>`
//! 5. `refs/heads/<name>`
//! 6. `refs/remotes/<name>`

use crate::areas::repository::Repository;
use crate::artifacts::objects::object::GitObject;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::SiltError;
use anyhow::Context;

/// Regex pattern for a short or full hex id
const SHORT_HASH_REGEX: &str = r"^[0-9A-Fa-f]{4,40}$";

/// Reference namespaces searched for a bare name, in order.
const REF_NAMESPACES: [&str; 3] = ["refs/tags", "refs/heads", "refs/remotes"];

/// Collect every candidate id the name may denote.
pub fn object_resolve(repository: &Repository, name: &str) -> anyhow::Result<Vec<ObjectId>> {
    let mut candidates = Vec::new();

    if name.is_empty() {
        return Ok(candidates);
    }

    // HEAD short-circuits the remaining rules
    if name == "HEAD" {
        if let Some(oid) = repository.refs().resolve(name)? {
            candidates.push(oid);
        }
        return Ok(candidates);
    }

    let short_hash = regex::Regex::new(SHORT_HASH_REGEX)
        .with_context(|| format!("invalid short hash regex: {SHORT_HASH_REGEX}"))?;
    if short_hash.is_match(name) {
        let prefix = name.to_ascii_lowercase();
        candidates.extend(repository.database().find_by_prefix(&prefix)?);
    }

    for namespace in REF_NAMESPACES {
        if let Some(oid) = repository.refs().resolve(&format!("{namespace}/{name}"))? {
            candidates.push(oid);
        }
    }

    Ok(candidates)
}

/// Resolve a name to exactly one id, optionally coercing it to a wanted
/// object type.
///
/// Zero candidates and multiple candidates are errors. With `want=None` the
/// unique candidate is returned unchecked. Otherwise the type indirection
/// chain is followed one step at a time: a tag advances to its target, a
/// commit advances to its tree when a tree is wanted. Any other mismatch
/// yields `None`, as does every mismatch when `follow` is off; callers turn
/// that absence into their own diagnostic.
pub fn object_find(
    repository: &Repository,
    name: &str,
    want: Option<ObjectType>,
    follow: bool,
) -> anyhow::Result<Option<ObjectId>> {
    let candidates = object_resolve(repository, name)?;

    let mut oid = match candidates.as_slice() {
        [] => return Err(SiltError::NoSuchReference(name.to_string()).into()),
        [only] => only.clone(),
        _ => {
            return Err(SiltError::AmbiguousReference {
                name: name.to_string(),
                candidates: candidates
                    .iter()
                    .map(|candidate| candidate.as_ref().to_string())
                    .collect(),
            }
            .into())
        }
    };

    let Some(want) = want else {
        return Ok(Some(oid));
    };

    loop {
        let object = repository
            .database()
            .load(&oid)?
            .ok_or_else(|| SiltError::BadObject(format!("{oid} is missing from the store")))?;

        if object.object_type() == want {
            return Ok(Some(oid));
        }

        if !follow {
            return Ok(None);
        }

        // one step of type indirection; the tag → commit → tree chain
        // strictly shortens, so this terminates
        oid = match (&object, want) {
            (GitObject::Tag(tag), _) => tag.target()?,
            (GitObject::Commit(commit), ObjectType::Tree) => commit.tree_oid()?,
            _ => return Ok(None),
        };
    }
}
