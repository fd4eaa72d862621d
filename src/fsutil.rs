use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// List the entry names of a directory, non-recursive.
///
/// Returns plain file/directory names, not paths. A missing directory
/// yields an empty list rather than an error.
pub fn list_dir(path: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    if !path.is_dir() {
        return Ok(names);
    }
    for entry in
        fs::read_dir(path).with_context(|| format!("Failed to read directory '{}'", path.display()))?
    {
        let entry = entry.with_context(|| format!("Failed to read directory '{}'", path.display()))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// List every file under `root`, recursively, as forward-slash paths
/// relative to `root`. Directories themselves are not listed. A missing
/// root yields an empty list.
pub fn list_recursive(root: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    if !root.is_dir() {
        return Ok(files);
    }
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk directory '{}'", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("Failed to walk directory '{}'", root.display()))?;
        files.push(to_unix_path(rel));
    }
    Ok(files)
}

/// Copy a single file, creating the destination's parent directories.
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    fs::copy(src, dest).with_context(|| {
        format!(
            "Failed to copy '{}' to '{}'",
            src.display(),
            dest.display()
        )
    })?;
    Ok(())
}

/// Copy a directory tree, preserving structure.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<()> {
    for rel in list_recursive(src)? {
        copy_file(&src.join(&rel), &dest.join(&rel))?;
    }
    Ok(())
}

/// Remove a single file.
pub fn remove_file(path: &Path) -> Result<()> {
    fs::remove_file(path)
        .with_context(|| format!("Failed to remove file '{}'", path.display()))
}

/// Remove a directory tree. Does nothing if the directory is absent.
pub fn remove_tree(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    fs::remove_dir_all(path)
        .with_context(|| format!("Failed to remove directory '{}'", path.display()))
}

/// Read a file's bytes.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read file '{}'", path.display()))
}

/// Write bytes to a file, creating parent directories as needed.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write file '{}'", path.display()))
}

/// Strip `base` (and any leading separator) from `path`, returning `path`
/// unchanged when `base` is not a prefix of it.
pub fn make_relative(path: &Path, base: &Path) -> PathBuf {
    match path.strip_prefix(base) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}

/// Render a path with forward-slash separators regardless of platform.
pub fn to_unix_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
#[path = "fsutil_test.rs"]
mod tests;
