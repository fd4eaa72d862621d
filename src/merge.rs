use std::path::Path;

use anyhow::{Result, bail};

use crate::msg;
use crate::repo::Repo;

/// Merge a branch into the current branch.
///
/// Builds a three-way merge commit with the current tip as the first parent
/// and the source tip as the second, advances the current branch, and
/// rewrites the working directory from the merged snapshot. Conflicting
/// paths end up as conflict-marker files in both.
pub fn run(source: String) -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root, &source)
}

pub fn run_in(root: &Path, source: &str) -> Result<()> {
    let mut repo = Repo::open(root)?;
    let current = repo.branches.current().to_string();
    if source == current {
        bail!("Cannot merge a branch into itself");
    }
    if !repo.branches.exists(source) {
        bail!("Branch '{}' does not exist", source);
    }

    let source_tip = repo.branches.get_tip(source);
    if source_tip.is_empty() {
        bail!("Branch '{}' has no commits to merge", source);
    }
    let target_tip = repo.branches.current_tip();
    if target_tip.is_empty() {
        bail!("Current branch '{}' has no commits", current);
    }

    let message = format!("Merge branch '{}'", source);
    let id = repo
        .store
        .create_merge_commit(&message, &current, &source_tip, &target_tip, source)?;
    repo.branches.update_tip(&id)?;

    repo.clear_worktree()?;
    repo.store.restore(&id, &repo.root)?;

    msg::success(&format!("Merged branch '{}' into '{}'", source, current));
    Ok(())
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
