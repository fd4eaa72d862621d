/// Shared test utilities for repository testing.
///
/// Provides a clean API for creating and manipulating test repositories,
/// reducing boilerplate in test code.
use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::repo::Repo;

/// A test repository rooted in a temporary directory. Commands are driven
/// through the same `run_in` entry points `main` dispatches to.
pub struct TestRepo {
    pub root: PathBuf,
    _dir: TempDir,
}

impl TestRepo {
    /// Create an empty directory without an initialized repository.
    pub fn new_empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        TestRepo { root, _dir: dir }
    }

    /// Create an initialized repository.
    pub fn new() -> Self {
        let test_repo = Self::new_empty();
        crate::init::run_in(&test_repo.root).unwrap();
        test_repo
    }

    /// Open the repository's engine state.
    pub fn open(&self) -> Repo {
        Repo::open(&self.root).unwrap()
    }

    /// Write content to a file in the working directory, creating parent
    /// directories as needed.
    pub fn write_file(&self, rel: &str, content: &str) {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Read content from a file in the working directory.
    pub fn read_file(&self, rel: &str) -> String {
        fs::read_to_string(self.root.join(rel)).unwrap()
    }

    pub fn file_exists(&self, rel: &str) -> bool {
        self.root.join(rel).exists()
    }

    /// Stage everything and commit, returning the new tip id.
    pub fn commit_all(&self, message: &str) -> String {
        crate::add::run_in(&self.root, &[".".to_string()]).unwrap();
        crate::commit::run_in(&self.root, message).unwrap();
        self.open().branches.current_tip()
    }

    pub fn current_branch(&self) -> String {
        self.open().branches.current().to_string()
    }

    /// Tip id of the current branch; empty when it has no commits.
    pub fn tip(&self) -> String {
        self.open().branches.current_tip()
    }
}
