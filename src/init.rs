use std::path::Path;

use anyhow::Result;

use crate::msg;
use crate::repo::Repo;

/// Initialize a new repository in the current directory.
///
/// Creates the `.vcs` metadata root with an empty staging area, an empty
/// commits area, and a `main` branch with no commits.
pub fn run() -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root)
}

pub fn run_in(root: &Path) -> Result<()> {
    Repo::init(root)?;
    msg::success("Initialized empty vcs repository");
    Ok(())
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
