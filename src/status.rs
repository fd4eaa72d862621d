use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use crate::repo::{FileStatus, Repo};

/// Show the working tree status: staged files, files modified since they
/// were staged or committed, and untracked files.
pub fn run() -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root)
}

pub fn run_in(root: &Path) -> Result<()> {
    let repo = Repo::open(root)?;
    let statuses = collect(&repo)?;
    print!("{}", render(repo.branches.current(), &statuses));
    Ok(())
}

/// Status records for every working tree file, in listing order.
fn collect(repo: &Repo) -> Result<Vec<(String, FileStatus)>> {
    let mut statuses = Vec::new();
    for rel in repo.worktree_files()? {
        let status = repo.file_status(&rel)?;
        statuses.push((rel, status));
    }
    Ok(statuses)
}

fn render(branch: &str, statuses: &[(String, FileStatus)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "On branch {}\n", branch);

    let _ = writeln!(out, "{}", "Changes to be committed:".green());
    let mut any = false;
    for (path, status) in statuses {
        if status.is_staged {
            let _ = writeln!(out, "{}", format!("\tmodified: {}", path).green());
            any = true;
        }
    }
    if !any {
        let _ = writeln!(out, "\t(no changes staged for commit)");
    }

    let _ = writeln!(out, "\n{}", "Changes not staged for commit:".red());
    any = false;
    for (path, status) in statuses {
        if status.is_modified && !status.is_untracked {
            let _ = writeln!(out, "{}", format!("\tmodified: {}", path).red());
            any = true;
        }
    }
    if !any {
        let _ = writeln!(out, "\t(no modified files)");
    }

    let _ = writeln!(out, "\n{}", "Untracked files:".yellow());
    any = false;
    for (path, status) in statuses {
        if status.is_untracked {
            let _ = writeln!(out, "{}", format!("\t{}", path).yellow());
            any = true;
        }
    }
    if !any {
        let _ = writeln!(out, "\t(no untracked files)");
    }

    out
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
