use std::path::Path;

use anyhow::{Result, bail};

use crate::msg;
use crate::repo::Repo;

/// Create a commit that restores the state of an earlier commit.
///
/// Accepts `HEAD` or a literal commit id. The new commit's parent is the
/// current branch tip; its snapshot and file hashes are copied from the
/// target commit, and the working directory is rewritten to match.
pub fn run(commit: String) -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root, &commit)
}

pub fn run_in(root: &Path, commit: &str) -> Result<()> {
    let mut repo = Repo::open(root)?;
    let target_id = if commit == "HEAD" {
        repo.branches.current_tip()
    } else {
        commit.to_string()
    };
    if !repo.store.exists(&target_id) {
        bail!("Commit '{}' does not exist", commit);
    }

    let branch = repo.branches.current().to_string();
    let parent = repo.branches.current_tip();
    let message = format!("Revert to {}", target_id);
    let id = repo
        .store
        .create_revert_commit(&message, &branch, &parent, &target_id)?;
    repo.branches.update_tip(&id)?;

    repo.clear_worktree()?;
    repo.store.restore(&target_id, &repo.root)?;

    msg::success(&format!("Reverted to commit {}", target_id));
    Ok(())
}

#[cfg(test)]
#[path = "revert_test.rs"]
mod tests;
