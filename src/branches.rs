use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A named, mutable pointer into the commit graph, plus the append-only
/// history of tips it has held.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub name: String,
    /// Tip commit id; empty for a freshly created, never-committed branch.
    pub current_commit_id: String,
    pub commit_history: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct BranchIndex {
    current_branch: String,
    branches: HashMap<String, Branch>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BranchIndexOut<'a> {
    current_branch: &'a str,
    branches: &'a HashMap<String, Branch>,
}

/// The set of named branches and the current-branch selector, persisted to
/// `branches.json` after every mutation.
pub struct BranchRegistry {
    branches: HashMap<String, Branch>,
    current: String,
    index_path: PathBuf,
}

impl BranchRegistry {
    /// Load the registry from the metadata root. An unreadable or missing
    /// index degrades to empty state.
    pub fn load(meta_dir: &Path) -> Self {
        let index_path = meta_dir.join("branches.json");
        let index: BranchIndex = fs::read_to_string(&index_path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        BranchRegistry {
            branches: index.branches,
            current: index.current_branch,
            index_path,
        }
    }

    fn save(&self) -> Result<()> {
        let out = BranchIndexOut {
            current_branch: &self.current,
            branches: &self.branches,
        };
        let text = serde_json::to_string_pretty(&out).context("Failed to encode branch index")?;
        fs::write(&self.index_path, text).with_context(|| {
            format!("Failed to write '{}'", self.index_path.display())
        })
    }

    /// Create a branch pointing at `start_commit` (may be empty). Returns
    /// false when the name is taken. The first branch ever created becomes
    /// the current branch.
    pub fn create(&mut self, name: &str, start_commit: &str) -> Result<bool> {
        if self.branches.contains_key(name) {
            return Ok(false);
        }
        let commit_history = if start_commit.is_empty() {
            Vec::new()
        } else {
            vec![start_commit.to_string()]
        };
        self.branches.insert(
            name.to_string(),
            Branch {
                name: name.to_string(),
                current_commit_id: start_commit.to_string(),
                commit_history,
            },
        );
        if self.branches.len() == 1 {
            self.current = name.to_string();
        }
        self.save()?;
        Ok(true)
    }

    /// Make `name` the current branch. Returns false when unknown.
    pub fn switch(&mut self, name: &str) -> Result<bool> {
        if !self.branches.contains_key(name) {
            return Ok(false);
        }
        self.current = name.to_string();
        self.save()?;
        Ok(true)
    }

    /// Advance the current branch's tip and append it to the branch history.
    pub fn update_tip(&mut self, commit_id: &str) -> Result<()> {
        if let Some(branch) = self.branches.get_mut(&self.current) {
            branch.current_commit_id = commit_id.to_string();
            branch.commit_history.push(commit_id.to_string());
            self.save()?;
        }
        Ok(())
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Tip of the current branch; empty when the branch has no commits.
    pub fn current_tip(&self) -> String {
        self.get_tip(&self.current)
    }

    pub fn get_tip(&self, name: &str) -> String {
        self.branches
            .get(name)
            .map(|branch| branch.current_commit_id.clone())
            .unwrap_or_default()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.branches.contains_key(name)
    }

    /// All branch names, sorted for stable output.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.branches.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
#[path = "branches_test.rs"]
mod tests;
