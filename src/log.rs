use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::repo::Repo;

/// Show the commit history of the current branch, newest first, following
/// first parents.
pub fn run() -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root)
}

pub fn run_in(root: &Path) -> Result<()> {
    let repo = Repo::open(root)?;
    print!("{}", render(&repo));
    Ok(())
}

fn render(repo: &Repo) -> String {
    let tip = repo.branches.current_tip();
    let history = if tip.is_empty() {
        Vec::new()
    } else {
        repo.store.history(&tip)
    };
    if history.is_empty() {
        return "No commits yet\n".to_string();
    }

    let mut out = String::new();
    for id in &history {
        let Some(commit) = repo.store.get(id) else {
            continue;
        };
        let _ = writeln!(out, "{}", format!("commit {}", commit.id).yellow());
        if let [target, source] = commit.parent_ids.as_slice() {
            let _ = writeln!(out, "Merge: {} {}", short(target), short(source));
        }
        let _ = writeln!(out, "Author: {}", commit.author);
        let _ = writeln!(out, "Date:   {}", commit.timestamp);
        let _ = writeln!(out, "\n    {}\n", commit.message);
    }
    out
}

fn short(id: &str) -> &str {
    &id[..id.len().min(8)]
}

#[cfg(test)]
#[path = "log_test.rs"]
mod tests;
