use std::path::Path;

use anyhow::{Result, bail};

use crate::msg;
use crate::repo::Repo;

/// Record the staging area as a new commit on the current branch.
///
/// The new commit's parent is the current branch tip (none for the first
/// commit on a fresh repository). On success the staging area is drained
/// and recreated empty.
pub fn run(message: String) -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root, &message)
}

pub fn run_in(root: &Path, message: &str) -> Result<()> {
    let mut repo = Repo::open(root)?;
    if message.is_empty() {
        bail!("Commit message cannot be empty");
    }

    let branch = repo.branches.current().to_string();
    let tip = repo.branches.current_tip();
    let parents = if tip.is_empty() { Vec::new() } else { vec![tip] };

    let id = repo.store.create_commit(message, &branch, parents)?;
    repo.branches.update_tip(&id)?;
    repo.clear_staging()?;

    msg::success(&format!("Created commit {}", id));
    Ok(())
}

#[cfg(test)]
#[path = "commit_test.rs"]
mod tests;
