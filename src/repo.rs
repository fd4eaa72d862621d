use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::branches::BranchRegistry;
use crate::fsutil;
use crate::store::{self, CommitStore};

/// Name of the repository metadata root.
pub const META_DIR: &str = ".vcs";
/// Shadow tree of files scheduled for the next commit, under the metadata root.
pub const STAGING_DIR: &str = "staging_area";

/// The commit store and branch registry bound to a working-directory root.
/// All engine state lives here; commands orchestrate through this struct and
/// never touch `.vcs` paths directly.
pub struct Repo {
    pub root: PathBuf,
    pub store: CommitStore,
    pub branches: BranchRegistry,
}

/// Status of one working tree file relative to staging and the current
/// branch tip.
pub struct FileStatus {
    pub is_staged: bool,
    pub is_modified: bool,
    pub is_untracked: bool,
    pub hash: String,
}

impl Repo {
    /// Create the metadata root, the staging and commit areas, and the
    /// `main` branch. Fails when the repository already exists.
    pub fn init(root: &Path) -> Result<Repo> {
        let meta = root.join(META_DIR);
        if meta.exists() {
            bail!("Repository already initialized");
        }
        fs::create_dir_all(meta.join(STAGING_DIR))
            .with_context(|| format!("Failed to create '{}'", meta.display()))?;
        fs::create_dir_all(meta.join("commits"))
            .with_context(|| format!("Failed to create '{}'", meta.display()))?;

        let store = CommitStore::load(&meta);
        let mut branches = BranchRegistry::load(&meta);
        branches.create("main", "")?;
        Ok(Repo {
            root: root.to_path_buf(),
            store,
            branches,
        })
    }

    /// Open an existing repository. Fails when the metadata root is absent.
    pub fn open(root: &Path) -> Result<Repo> {
        let meta = root.join(META_DIR);
        if !meta.is_dir() {
            bail!("Not a vcs repository (run `vcs init` first)");
        }
        Ok(Repo {
            root: root.to_path_buf(),
            store: CommitStore::load(&meta),
            branches: BranchRegistry::load(&meta),
        })
    }

    pub fn meta_dir(&self) -> PathBuf {
        self.root.join(META_DIR)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.meta_dir().join(STAGING_DIR)
    }

    /// Drain and recreate the staging area.
    pub fn clear_staging(&self) -> Result<()> {
        let staging = self.staging_dir();
        fsutil::remove_tree(&staging)?;
        fs::create_dir_all(&staging)
            .with_context(|| format!("Failed to create '{}'", staging.display()))
    }

    /// Delete every top-level working tree entry except the metadata root.
    pub fn clear_worktree(&self) -> Result<()> {
        for entry in fsutil::list_dir(&self.root)? {
            if entry == META_DIR {
                continue;
            }
            let path = self.root.join(&entry);
            if path.is_dir() {
                fsutil::remove_tree(&path)?;
            } else {
                fsutil::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Every file in the working tree as a relative forward-slash path,
    /// metadata root excluded.
    pub fn worktree_files(&self) -> Result<Vec<String>> {
        let prefix = format!("{META_DIR}/");
        Ok(fsutil::list_recursive(&self.root)?
            .into_iter()
            .filter(|rel| !rel.starts_with(&prefix))
            .collect())
    }

    /// Compute the status record for one working tree file. Tracked-ness is
    /// judged against the tip commit's recorded hashes, so it holds for
    /// compressed and raw snapshot layouts alike.
    pub fn file_status(&self, rel: &str) -> Result<FileStatus> {
        let work_bytes = fsutil::read_bytes(&self.root.join(rel))?;
        let hash = store::hash_bytes(&work_bytes);

        let staged_path = self.staging_dir().join(rel);
        let is_staged = staged_path.is_file();
        let tip_hash = self.tip_file_hash(rel);
        let is_untracked = !is_staged && tip_hash.is_none();

        let is_modified = if is_staged {
            store::hash_bytes(&fsutil::read_bytes(&staged_path)?) != hash
        } else if let Some(tip_hash) = &tip_hash {
            *tip_hash != hash
        } else {
            false
        };

        Ok(FileStatus {
            is_staged,
            is_modified,
            is_untracked,
            hash,
        })
    }

    /// Hash recorded for `rel` in the current branch tip's commit, if any.
    fn tip_file_hash(&self, rel: &str) -> Option<String> {
        let tip = self.branches.current_tip();
        if tip.is_empty() {
            return None;
        }
        self.store.get(&tip)?.file_hashes.get(rel).cloned()
    }
}
