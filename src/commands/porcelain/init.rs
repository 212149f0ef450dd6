use crate::areas::repository::Repository;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Initialize a repository at `path` and report where it landed.
    pub fn init(path: &Path, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        let repo = Repository::create(path, writer)?;

        writeln!(
            repo.writer(),
            "Initialized empty Silt repository in {}",
            repo.gitdir().display()
        )?;

        Ok(repo)
    }
}
