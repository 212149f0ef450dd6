//! Repository abstraction and coordination
//!
//! The `Repository` type locates the on-disk layout, gates it behind the
//! config format check, and hands the lower-level components (database,
//! refs) to the command implementations.
//!
//! ## Layout
//!
//! `.git/` contains at least `HEAD`, `config`, `description`, `branches/`,
//! `objects/`, `refs/heads/` and `refs/tags/`. Objects live under
//! `objects/<first-2-hex>/<remaining-38-hex>`.

use crate::areas::config::GitConfig;
use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::errors::SiltError;
use anyhow::Context;
use std::cell::RefCell;
use std::cell::RefMut;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Git directory name
const GIT_DIR: &str = ".git";

/// Object database directory name
const DATABASE_DIR: &str = "objects";

const DEFAULT_DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

const DEFAULT_HEAD: &str = "ref: refs/heads/master\n";

/// An opened repository
///
/// Holds the worktree and gitdir paths plus the object database and ref
/// manager. This is the entry point all commands operate through; command
/// output is routed through the attached writer so the core itself never
/// touches the standard streams.
pub struct Repository {
    /// Working tree root
    worktree: Box<Path>,
    /// The `.git` directory
    gitdir: Box<Path>,
    /// Output writer (stdout in the binary, a buffer in tests)
    writer: RefCell<Box<dyn Write>>,
    /// Object database
    database: Database,
    /// Reference manager
    refs: Refs,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("worktree", &self.worktree)
            .field("gitdir", &self.gitdir)
            .field("database", &self.database)
            .field("refs", &self.refs)
            .finish()
    }
}

impl Repository {
    /// Open the repository whose worktree is `path`.
    ///
    /// With `force=false` the gitdir must be a directory, the config file
    /// must exist, and `[core] repositoryformatversion` must be 0. The
    /// initializer passes `force=true` to suppress every check.
    pub fn open(path: &Path, force: bool, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        let worktree = path.to_path_buf();
        let gitdir = worktree.join(GIT_DIR);

        if !force && !gitdir.is_dir() {
            return Err(SiltError::NotARepository(worktree).into());
        }

        let config_path = gitdir.join("config");
        if config_path.is_file() {
            let config = GitConfig::read(&config_path)?;

            if !force {
                let version = config.get("core", "repositoryformatversion").unwrap_or("0");
                let version: i64 = version.parse().map_err(|_| {
                    SiltError::BadConfig(format!(
                        "repositoryformatversion is not an integer: {version}"
                    ))
                })?;
                if version != 0 {
                    return Err(SiltError::BadConfig(format!(
                        "unsupported repositoryformatversion: {version}"
                    ))
                    .into());
                }
            }
        } else if !force {
            return Err(SiltError::BadConfig("configuration file missing".to_string()).into());
        }

        let database = Database::new(gitdir.join(DATABASE_DIR).into_boxed_path());
        let refs = Refs::new(gitdir.clone().into_boxed_path());

        Ok(Repository {
            worktree: worktree.into_boxed_path(),
            gitdir: gitdir.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            refs,
        })
    }

    /// Initialize a new repository at `path`.
    ///
    /// The worktree is created when absent; it must not already contain a
    /// `.git/`.
    pub fn create(path: &Path, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        if path.exists() {
            if !path.is_dir() {
                return Err(SiltError::NotADirectory(path.to_path_buf()).into());
            }
            if path.join(GIT_DIR).exists() {
                anyhow::bail!("{} is already a silt repository", path.display());
            }
        } else {
            std::fs::create_dir_all(path)
                .with_context(|| format!("failed to create worktree at {:?}", path))?;
        }

        let repo = Self::open(path, true, writer)?;

        repo.git_dir(&["branches"], true)?;
        repo.git_dir(&[DATABASE_DIR], true)?;
        repo.git_dir(&["refs", "heads"], true)?;
        repo.git_dir(&["refs", "tags"], true)?;

        std::fs::write(repo.git_file(&["description"])?, DEFAULT_DESCRIPTION)
            .context("failed to write description file")?;
        std::fs::write(repo.git_file(&["HEAD"])?, DEFAULT_HEAD)
            .context("failed to write HEAD file")?;

        let mut config = GitConfig::new();
        config.set("core", "repositoryformatversion", "0");
        config.set("core", "filemode", "false");
        config.set("core", "bare", "false");
        std::fs::write(repo.git_file(&["config"])?, config.serialize())
            .context("failed to write config file")?;

        Ok(repo)
    }

    /// Walk upward from `start` until a directory containing `.git/` is
    /// found. `required=false` turns the miss into `None`.
    pub fn find(
        start: &Path,
        required: bool,
        writer: Box<dyn Write>,
    ) -> anyhow::Result<Option<Self>> {
        let start = start
            .canonicalize()
            .with_context(|| format!("failed to canonicalize {:?}", start))?;

        let mut current = start.as_path();
        loop {
            if current.join(GIT_DIR).is_dir() {
                return Ok(Some(Self::open(current, false, writer)?));
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => {
                    return if required {
                        Err(SiltError::NotARepository(start.clone()).into())
                    } else {
                        Ok(None)
                    };
                }
            }
        }
    }

    /// Pure join of the gitdir with path segments.
    pub fn git_path(&self, segments: &[&str]) -> PathBuf {
        segments
            .iter()
            .fold(self.gitdir.to_path_buf(), |path, segment| {
                path.join(segment)
            })
    }

    /// As `git_path`, ensuring the parent directory exists on disk.
    pub fn git_file(&self, segments: &[&str]) -> anyhow::Result<PathBuf> {
        let path = self.git_path(segments);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create parent directories for {:?}", path))?;
        }

        Ok(path)
    }

    /// As `git_path` for a directory: an existing directory is returned, an
    /// existing non-directory fails, a missing one is created on demand.
    pub fn git_dir(&self, segments: &[&str], create: bool) -> anyhow::Result<Option<PathBuf>> {
        let path = self.git_path(segments);

        if path.exists() {
            if path.is_dir() {
                return Ok(Some(path));
            }
            return Err(SiltError::NotADirectory(path).into());
        }

        if create {
            std::fs::create_dir_all(&path)
                .with_context(|| format!("failed to create directory {:?}", path))?;
            return Ok(Some(path));
        }

        Ok(None)
    }

    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    pub fn gitdir(&self) -> &Path {
        &self.gitdir
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }
}
