use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::fsutil;
use crate::huffman;
use crate::repo::STAGING_DIR;

/// Author recorded on every commit.
const AUTHOR: &str = "system";

/// Suffix of compressed snapshot entries.
const HUFF_SUFFIX: &str = ".huff";

/// An immutable node in the commit graph: metadata, 0-2 parent ids, and the
/// hash of every tracked file's uncompressed bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: String,
    pub message: String,
    pub author: String,
    pub timestamp: String,
    /// Branch the commit was created on.
    pub branch: String,
    /// 0 parents for an initial commit, 1 for an ordinary commit, 2 for a
    /// merge in the order (target-tip, source-tip).
    pub parent_ids: Vec<String>,
    /// Repository-relative path (forward slashes) -> hex SHA-256.
    pub file_hashes: BTreeMap<String, String>,
}

#[derive(Deserialize, Default)]
struct CommitIndex {
    head: String,
    commits: HashMap<String, Commit>,
}

#[derive(Serialize)]
struct CommitIndexOut<'a> {
    head: &'a str,
    commits: &'a HashMap<String, Commit>,
}

/// The commit graph and its on-disk snapshot area. Snapshots of ordinary
/// commits are Huffman-compressed per file (`<rel>.huff`); merge commits
/// store the merged tree raw. `restore` handles both layouts.
pub struct CommitStore {
    commits: HashMap<String, Commit>,
    head: String,
    meta_dir: PathBuf,
}

impl CommitStore {
    /// Load the store from the metadata root. An unreadable or missing
    /// index degrades to empty state.
    pub fn load(meta_dir: &Path) -> Self {
        let index: CommitIndex = fs::read_to_string(meta_dir.join("commits.json"))
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();
        CommitStore {
            commits: index.commits,
            head: index.head,
            meta_dir: meta_dir.to_path_buf(),
        }
    }

    fn save(&self) -> Result<()> {
        let out = CommitIndexOut {
            head: &self.head,
            commits: &self.commits,
        };
        let path = self.meta_dir.join("commits.json");
        let text = serde_json::to_string_pretty(&out).context("Failed to encode commit index")?;
        fs::write(&path, text).with_context(|| format!("Failed to write '{}'", path.display()))
    }

    fn data_dir(&self, id: &str) -> PathBuf {
        self.meta_dir.join("commits").join(id).join("data")
    }

    /// Create a commit from the staging area: hash every staged file,
    /// compress it into the snapshot, advance HEAD, persist.
    pub fn create_commit(
        &mut self,
        message: &str,
        branch: &str,
        parents: Vec<String>,
    ) -> Result<String> {
        if message.is_empty() {
            bail!("Commit message cannot be empty");
        }
        let id = generate_id();
        let staging = self.meta_dir.join(STAGING_DIR);
        let data_dir = self.data_dir(&id);
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create directory '{}'", data_dir.display()))?;

        let mut file_hashes = BTreeMap::new();
        for rel in fsutil::list_recursive(&staging)? {
            let bytes = fsutil::read_bytes(&staging.join(&rel))?;
            file_hashes.insert(rel.clone(), hash_bytes(&bytes));
            let blob = huffman::compress(&bytes);
            fsutil::write_bytes(&data_dir.join(format!("{rel}{HUFF_SUFFIX}")), &blob)?;
        }

        let commit = Commit {
            id: id.clone(),
            message: message.to_string(),
            author: AUTHOR.to_string(),
            timestamp: now_timestamp(),
            branch: branch.to_string(),
            parent_ids: parents,
            file_hashes,
        };
        self.commits.insert(id.clone(), commit);
        self.head = id.clone();
        self.save()?;
        Ok(id)
    }

    /// Create a merge commit of `source_tip` into `target_tip`: find the
    /// merge base, three-way merge into a scratch tree, store the merged
    /// tree raw as the snapshot. Parents are ordered (target, source).
    pub fn create_merge_commit(
        &mut self,
        message: &str,
        branch: &str,
        source_tip: &str,
        target_tip: &str,
        source_branch: &str,
    ) -> Result<String> {
        let base = self.find_merge_base(source_tip, target_tip);

        let temp = self.meta_dir.join("merge_temp");
        fsutil::remove_tree(&temp)?;
        let base_dir = temp.join("base");
        let source_dir = temp.join("source");
        let target_dir = temp.join("target");
        let merged_dir = temp.join("merged");
        // Merge over decompressed trees so comparisons and conflict bodies
        // see the real file bytes, not compressed blobs.
        if !base.is_empty() {
            self.restore(&base, &base_dir)?;
        }
        self.restore(source_tip, &source_dir)?;
        self.restore(target_tip, &target_dir)?;
        fs::create_dir_all(&merged_dir)
            .with_context(|| format!("Failed to create directory '{}'", merged_dir.display()))?;
        merge_trees(&base_dir, &source_dir, &target_dir, &merged_dir, source_branch)?;

        let id = generate_id();
        let data_dir = self.data_dir(&id);
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create directory '{}'", data_dir.display()))?;
        let mut file_hashes = BTreeMap::new();
        for rel in fsutil::list_recursive(&merged_dir)? {
            let bytes = fsutil::read_bytes(&merged_dir.join(&rel))?;
            file_hashes.insert(rel.clone(), hash_bytes(&bytes));
            fsutil::write_bytes(&data_dir.join(&rel), &bytes)?;
        }
        fsutil::remove_tree(&temp)?;

        let commit = Commit {
            id: id.clone(),
            message: message.to_string(),
            author: AUTHOR.to_string(),
            timestamp: now_timestamp(),
            branch: branch.to_string(),
            parent_ids: vec![target_tip.to_string(), source_tip.to_string()],
            file_hashes,
        };
        self.commits.insert(id.clone(), commit);
        self.head = id.clone();
        self.save()?;
        Ok(id)
    }

    /// Create a commit whose snapshot and file hashes are copied verbatim
    /// from `target_id`. Used by revert, where the new commit's content must
    /// equal the reverted-to commit's content.
    pub fn create_revert_commit(
        &mut self,
        message: &str,
        branch: &str,
        parent: &str,
        target_id: &str,
    ) -> Result<String> {
        let target = self
            .commits
            .get(target_id)
            .with_context(|| format!("Commit '{}' does not exist", target_id))?
            .clone();

        let id = generate_id();
        let data_dir = self.data_dir(&id);
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create directory '{}'", data_dir.display()))?;
        fsutil::copy_tree(&self.data_dir(target_id), &data_dir)?;

        let parents = if parent.is_empty() {
            Vec::new()
        } else {
            vec![parent.to_string()]
        };
        let commit = Commit {
            id: id.clone(),
            message: message.to_string(),
            author: AUTHOR.to_string(),
            timestamp: now_timestamp(),
            branch: branch.to_string(),
            parent_ids: parents,
            file_hashes: target.file_hashes,
        };
        self.commits.insert(id.clone(), commit);
        self.head = id.clone();
        self.save()?;
        Ok(id)
    }

    pub fn exists(&self, id: &str) -> bool {
        self.commits.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Commit> {
        self.commits.get(id)
    }

    pub fn head(&self) -> &str {
        &self.head
    }

    /// First-parent walk from `start` (or HEAD when empty), newest first.
    pub fn history(&self, start: &str) -> Vec<String> {
        let mut history = Vec::new();
        let mut current = if start.is_empty() {
            self.head.clone()
        } else {
            start.to_string()
        };
        while !current.is_empty() {
            history.push(current.clone());
            match self.commits.get(&current) {
                Some(commit) if !commit.parent_ids.is_empty() => {
                    current = commit.parent_ids[0].clone();
                }
                _ => break,
            }
        }
        history
    }

    /// Copy a commit's snapshot into `dest`, decompressing `.huff` entries
    /// (dropping the suffix) and copying raw entries as-is. Returns false
    /// when the commit is unknown.
    pub fn restore(&self, id: &str, dest: &Path) -> Result<bool> {
        if !self.commits.contains_key(id) {
            return Ok(false);
        }
        let data_dir = self.data_dir(id);
        for rel in fsutil::list_recursive(&data_dir)? {
            let src = data_dir.join(&rel);
            match rel.strip_suffix(HUFF_SUFFIX) {
                Some(stem) => {
                    let blob = fsutil::read_bytes(&src)?;
                    let bytes = huffman::decompress(&blob)
                        .with_context(|| format!("Failed to decompress '{}'", src.display()))?;
                    fsutil::write_bytes(&dest.join(stem), &bytes)?;
                }
                None => fsutil::copy_file(&src, &dest.join(&rel))?,
            }
        }
        Ok(true)
    }

    /// First commit reachable from both tips along first-parent walks.
    /// Either tip empty, or no intersection, yields the empty string.
    fn find_merge_base(&self, a: &str, b: &str) -> String {
        if a.is_empty() || b.is_empty() {
            return String::new();
        }
        let mut ancestors = HashSet::new();
        let mut current = a.to_string();
        while !current.is_empty() {
            ancestors.insert(current.clone());
            match self.commits.get(&current) {
                Some(commit) if !commit.parent_ids.is_empty() => {
                    current = commit.parent_ids[0].clone();
                }
                _ => break,
            }
        }
        let mut current = b.to_string();
        while !current.is_empty() {
            if ancestors.contains(&current) {
                return current;
            }
            match self.commits.get(&current) {
                Some(commit) if !commit.parent_ids.is_empty() => {
                    current = commit.parent_ids[0].clone();
                }
                _ => break,
            }
        }
        String::new()
    }
}

/// Three-way merge of the `source` and `target` trees against `base` into
/// `out`. Per path: a side that dropped the file loses it unless the other
/// side still has it; identical contents pass through; a side unchanged
/// since base yields the other side; anything else is a conflict file.
fn merge_trees(
    base: &Path,
    source: &Path,
    target: &Path,
    out: &Path,
    source_branch: &str,
) -> Result<()> {
    let mut paths = BTreeSet::new();
    paths.extend(fsutil::list_recursive(base)?);
    paths.extend(fsutil::list_recursive(source)?);
    paths.extend(fsutil::list_recursive(target)?);

    for rel in paths {
        let source_file = source.join(&rel);
        let target_file = target.join(&rel);
        let out_file = out.join(&rel);
        let in_source = source_file.is_file();
        let in_target = target_file.is_file();

        if !in_source && !in_target {
            continue;
        }
        if in_source && !in_target {
            fsutil::copy_file(&source_file, &out_file)?;
            continue;
        }
        if !in_source && in_target {
            fsutil::copy_file(&target_file, &out_file)?;
            continue;
        }

        let source_bytes = fsutil::read_bytes(&source_file)?;
        let target_bytes = fsutil::read_bytes(&target_file)?;
        if hash_bytes(&source_bytes) == hash_bytes(&target_bytes) {
            fsutil::copy_file(&source_file, &out_file)?;
            continue;
        }

        let base_file = base.join(&rel);
        if base_file.is_file() {
            let base_hash = hash_bytes(&fsutil::read_bytes(&base_file)?);
            if hash_bytes(&source_bytes) == base_hash {
                fsutil::copy_file(&target_file, &out_file)?;
                continue;
            }
            if hash_bytes(&target_bytes) == base_hash {
                fsutil::copy_file(&source_file, &out_file)?;
                continue;
            }
        }
        write_conflict_file(&out_file, &target_bytes, &source_bytes, source_branch)?;
    }
    Ok(())
}

/// Write a conflict marker file. When one side is empty and the other is
/// not, the non-empty side is written verbatim. Sides not ending in a
/// newline get one appended before the separator or terminator.
fn write_conflict_file(
    path: &Path,
    target_bytes: &[u8],
    source_bytes: &[u8],
    source_branch: &str,
) -> Result<()> {
    if source_bytes.is_empty() && !target_bytes.is_empty() {
        return fsutil::write_bytes(path, target_bytes);
    }
    if !source_bytes.is_empty() && target_bytes.is_empty() {
        return fsutil::write_bytes(path, source_bytes);
    }

    let mut out = Vec::new();
    out.extend_from_slice(b"<<<<<<< HEAD\n");
    out.extend_from_slice(target_bytes);
    if !target_bytes.ends_with(b"\n") {
        out.push(b'\n');
    }
    out.extend_from_slice(b"=======\n");
    out.extend_from_slice(source_bytes);
    if !source_bytes.ends_with(b"\n") {
        out.push(b'\n');
    }
    out.extend_from_slice(format!(">>>>>>> {}\n", source_branch).as_bytes());
    fsutil::write_bytes(path, &out)
}

/// Hex SHA-256 of a byte slice.
pub fn hash_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Fresh 32-byte random id, hex-encoded. Ids are not content-derived; two
/// identical snapshots still get distinct ids.
fn generate_id() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn now_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S %z").to_string()
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
