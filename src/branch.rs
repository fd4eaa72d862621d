use std::path::Path;

use anyhow::{Result, bail};
use colored::Colorize;

use crate::msg;
use crate::repo::Repo;

/// List branches, or create a new branch starting at the current commit.
///
/// Without a name, prints every branch and marks the current one with `*`.
/// With a name, creates the branch pointing at the current branch's tip.
pub fn run(name: Option<String>) -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root, name.as_deref())
}

pub fn run_in(root: &Path, name: Option<&str>) -> Result<()> {
    let mut repo = Repo::open(root)?;
    match name {
        None => {
            for branch in repo.branches.list() {
                if branch == repo.branches.current() {
                    println!("{}", format!("* {}", branch).green());
                } else {
                    println!("  {}", branch);
                }
            }
            Ok(())
        }
        Some(name) => {
            let name = name.trim();
            if name.is_empty() {
                bail!("Branch name cannot be empty");
            }
            let tip = repo.branches.current_tip();
            if !repo.branches.create(name, &tip)? {
                bail!("Branch '{}' already exists", name);
            }
            msg::success(&format!("Created branch '{}'", name));
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "branch_test.rs"]
mod tests;
