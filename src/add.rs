use std::path::Path;

use anyhow::{Result, bail};

use crate::fsutil;
use crate::msg;
use crate::repo::{self, Repo};

/// Copy files into the staging area.
///
/// `.` stages every top-level entry of the working directory except the
/// metadata root; an explicit path stages that file or directory under its
/// same relative path. Staging is cumulative until the next commit drains it.
pub fn run(paths: Vec<String>) -> Result<()> {
    let root = std::env::current_dir()?;
    run_in(&root, &paths)
}

pub fn run_in(root: &Path, paths: &[String]) -> Result<()> {
    let repo = Repo::open(root)?;
    for path in paths {
        if path == "." {
            add_all(&repo)?;
        } else {
            add_path(&repo, path)?;
        }
    }
    Ok(())
}

/// Stage every top-level working directory entry except the metadata root.
fn add_all(repo: &Repo) -> Result<()> {
    for entry in fsutil::list_dir(&repo.root)? {
        if entry == repo::META_DIR {
            continue;
        }
        let src = repo.root.join(&entry);
        let dest = repo.staging_dir().join(&entry);
        if src.is_dir() {
            fsutil::copy_tree(&src, &dest)?;
        } else {
            fsutil::copy_file(&src, &dest)?;
        }
    }
    msg::success("Added all files to staging area");
    Ok(())
}

/// Stage a single file or directory under its relative path.
fn add_path(repo: &Repo, path: &str) -> Result<()> {
    let rel = fsutil::make_relative(Path::new(path), &repo.root);
    if rel.is_absolute() {
        bail!("Path is outside the repository: {}", path);
    }
    let src = repo.root.join(&rel);
    if !src.exists() {
        bail!("Path does not exist: {}", path);
    }

    let dest = repo.staging_dir().join(&rel);
    if src.is_dir() {
        fsutil::copy_tree(&src, &dest)?;
    } else {
        fsutil::copy_file(&src, &dest)?;
    }
    msg::success(&format!("Added '{}' to staging area", path));
    Ok(())
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
