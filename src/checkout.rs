use std::path::Path;

use anyhow::{Result, bail};

use crate::msg;
use crate::repo::Repo;

/// Switch to a branch and rewrite the working directory from its tip.
///
/// Every working tree entry except the metadata root is deleted, then the
/// target branch's tip snapshot is restored. A branch with no commits
/// leaves the working directory cleared.
pub fn run(name: String) -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root, &name)
}

pub fn run_in(root: &Path, name: &str) -> Result<()> {
    let mut repo = Repo::open(root)?;
    if !repo.branches.exists(name) {
        bail!("Branch '{}' does not exist", name);
    }
    repo.branches.switch(name)?;

    repo.clear_worktree()?;
    let tip = repo.branches.current_tip();
    if !tip.is_empty() {
        repo.store.restore(&tip, &repo.root)?;
    }

    msg::success(&format!("Switched to branch '{}'", name));
    Ok(())
}

#[cfg(test)]
#[path = "checkout_test.rs"]
mod tests;
