//! The simulated repository: working tree, index, commit DAG, branches,
//! merge state, stash, and remote bookkeeping.
//!
//! Everything lives in memory. Commits own their file snapshots by value;
//! branches and HEAD refer to commits by hash only, so there are no
//! cross-references to keep alive. One command mutates the repo at a time.

mod dag;
mod fs;
pub mod ids;
pub mod merge3;
pub mod types;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::CommandError;
use crate::paths;
use self::types::{
    BranchMeta, ChangeKind, Commit, IndexEntry, LastEvent, MergeState, Snapshot, StashEntry,
    StatusSummary, Upstream,
};

/// Color wheel for branch draw metadata, cycled by lane index.
const BRANCH_COLORS: [&str; 6] = [
    "#4a90d9", "#e06c50", "#8f6fc0", "#4aa564", "#d9a14a", "#50b8c8",
];

/// Default branch name; always exists once the repo is initialized.
pub const DEFAULT_BRANCH: &str = "main";

/// In-memory model of one Git repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repo {
    pub initialized: bool,
    pub cwd: String,
    /// Working tree: path -> content.
    pub working_files: Snapshot,
    /// Directories created explicitly; directories implied by file paths
    /// are derived on demand.
    pub dirs: BTreeSet<String>,
    /// Staging area: the next commit's delta against HEAD.
    pub index: BTreeMap<String, IndexEntry>,
    pub commits: BTreeMap<String, Commit>,
    /// Creation order; stable iteration and the transfer order to remotes.
    pub commit_order: Vec<String>,
    /// Branch name -> head id. A just-created branch on an empty repo has
    /// no head yet.
    pub branches: BTreeMap<String, Option<String>>,
    pub branch_meta: BTreeMap<String, BranchMeta>,
    pub current_branch: String,
    pub merge_state: Option<MergeState>,
    /// Newest entry first.
    pub stash: Vec<StashEntry>,
    pub remotes: BTreeMap<String, String>,
    pub upstreams: BTreeMap<String, Upstream>,
    pub last_event: Option<LastEvent>,
    /// Monotonic commit counter, folded into commit ids.
    seq: u64,
}

impl Default for Repo {
    fn default() -> Self {
        Self::new()
    }
}

impl Repo {
    pub fn new() -> Self {
        Repo {
            initialized: false,
            cwd: "/".to_string(),
            working_files: Snapshot::new(),
            dirs: BTreeSet::new(),
            index: BTreeMap::new(),
            commits: BTreeMap::new(),
            commit_order: Vec::new(),
            branches: BTreeMap::new(),
            branch_meta: BTreeMap::new(),
            current_branch: DEFAULT_BRANCH.to_string(),
            merge_state: None,
            stash: Vec::new(),
            remotes: BTreeMap::new(),
            upstreams: BTreeMap::new(),
            last_event: None,
            seq: 0,
        }
    }

    /// Head id of the current branch, if the branch has one.
    pub fn head_id(&self) -> Option<String> {
        self.branches.get(&self.current_branch).cloned().flatten()
    }

    pub fn head_commit(&self) -> Option<&Commit> {
        self.head_id().and_then(|id| self.commits.get(&id))
    }

    /// Snapshot at HEAD; empty for an unborn branch.
    pub fn head_snapshot(&self) -> Snapshot {
        self.head_commit().map(|c| c.files.clone()).unwrap_or_default()
    }

    /// Snapshot of an arbitrary branch head; empty when the head is null.
    pub fn snapshot_of(&self, head: Option<&str>) -> Snapshot {
        head.and_then(|id| self.commits.get(id))
            .map(|c| c.files.clone())
            .unwrap_or_default()
    }

    /// Allocate draw metadata the first time a branch name appears.
    pub fn ensure_branch_meta(&mut self, name: &str) {
        if !self.branch_meta.contains_key(name) {
            let lane = self.branch_meta.len() as u32;
            let color = BRANCH_COLORS[lane as usize % BRANCH_COLORS.len()].to_string();
            self.branch_meta.insert(name.to_string(), BranchMeta { lane, color });
        }
    }

    /// Resolve a hash prefix through the whole commit store. Ambiguous
    /// prefixes fail rather than guessing.
    pub fn resolve_prefix(&self, prefix: &str) -> Result<String, CommandError> {
        let matches: Vec<&String> = self
            .commit_order
            .iter()
            .filter(|id| id.starts_with(prefix))
            .collect();
        match matches.len() {
            0 => Err(CommandError::NotFound(format!(
                "fatal: unknown revision '{prefix}' (simulated)"
            ))),
            1 => Ok(matches[0].clone()),
            _ => Err(CommandError::AmbiguousHash(prefix.to_string())),
        }
    }

    /// Derive the three disjoint status sets plus conflicts.
    pub fn status(&self) -> StatusSummary {
        let head = self.head_snapshot();
        let conflicts: BTreeSet<String> = self
            .merge_state
            .as_ref()
            .map(|m| m.conflicts.iter().cloned().collect())
            .unwrap_or_default();

        let mut summary = StatusSummary {
            conflicts: conflicts.iter().cloned().collect(),
            ..StatusSummary::default()
        };

        // Staged: index vs HEAD.
        for (path, entry) in &self.index {
            if conflicts.contains(path) {
                continue;
            }
            match entry {
                IndexEntry::Add(content) => match head.get(path) {
                    None => summary.staged.push((path.clone(), ChangeKind::New)),
                    Some(old) if old != content => {
                        summary.staged.push((path.clone(), ChangeKind::Modified))
                    }
                    Some(_) => {}
                },
                IndexEntry::Delete => {
                    if head.contains_key(path) {
                        summary.staged.push((path.clone(), ChangeKind::Deleted));
                    }
                }
            }
        }

        // Unstaged: working tree vs the index baseline (index entry if
        // present, HEAD content otherwise).
        for (path, content) in &self.working_files {
            if conflicts.contains(path) {
                continue;
            }
            let baseline = match self.index.get(path) {
                Some(IndexEntry::Add(staged)) => Some(staged),
                Some(IndexEntry::Delete) => None,
                None => head.get(path),
            };
            match baseline {
                Some(base) if base != content => {
                    summary.unstaged.push((path.clone(), ChangeKind::Modified))
                }
                Some(_) => {}
                None => {
                    if !head.contains_key(path) && !self.index.contains_key(path) {
                        summary.untracked.push(path.clone());
                    }
                }
            }
        }

        // Unstaged deletions: tracked or staged paths missing from the
        // working tree.
        let mut baseline_paths: BTreeSet<&String> = head.keys().collect();
        for (path, entry) in &self.index {
            match entry {
                IndexEntry::Add(_) => {
                    baseline_paths.insert(path);
                }
                IndexEntry::Delete => {
                    baseline_paths.remove(path);
                }
            }
        }
        for path in baseline_paths {
            if !self.working_files.contains_key(path) && !conflicts.contains(path) {
                summary.unstaged.push((path.clone(), ChangeKind::Deleted));
            }
        }
        summary.unstaged.sort();

        summary
    }

    pub fn is_dirty(&self) -> bool {
        self.status().is_dirty()
    }

    /// Create a commit from HEAD overlaid with the index, advance the
    /// current branch, and clear the index and merge state. The working
    /// tree absorbs the staged changes so it matches the new HEAD.
    pub fn create_commit(&mut self, message: &str, extra_parent: Option<String>) -> String {
        let mut files = self.head_snapshot();
        for (path, entry) in &self.index {
            match entry {
                IndexEntry::Add(content) => {
                    files.insert(path.clone(), content.clone());
                }
                IndexEntry::Delete => {
                    files.remove(path);
                }
            }
        }

        let mut parents = Vec::new();
        if let Some(head) = self.head_id() {
            parents.push(head);
        }
        if let Some(theirs) = extra_parent {
            if !parents.contains(&theirs) {
                parents.push(theirs);
            }
        }

        let timestamp = now();
        let seq = self.seq;
        self.seq += 1;
        let id = ids::commit_id(message, &parents, timestamp, seq);

        self.ensure_branch_meta(&self.current_branch.clone());
        let lane = self.branch_meta[&self.current_branch].lane;
        let commit = Commit {
            id: id.clone(),
            message: message.to_string(),
            parents,
            timestamp,
            files,
            lane,
            branch: self.current_branch.clone(),
        };
        self.commits.insert(id.clone(), commit);
        self.commit_order.push(id.clone());
        self.branches.insert(self.current_branch.clone(), Some(id.clone()));

        for (path, entry) in std::mem::take(&mut self.index) {
            match entry {
                IndexEntry::Add(content) => {
                    self.working_files.insert(path, content);
                }
                IndexEntry::Delete => {
                    self.working_files.remove(&path);
                }
            }
        }
        self.merge_state = None;
        id
    }

    /// Replace the working tree with a snapshot and record its implied
    /// directories as known.
    pub fn sync_working_to(&mut self, snapshot: Snapshot) {
        self.working_files = snapshot;
        self.seed_dirs_from_working();
    }

    /// Record every ancestor directory of the working files as known.
    pub fn seed_dirs_from_working(&mut self) {
        let mut found = Vec::new();
        for path in self.working_files.keys() {
            let mut dir = paths::dirname(path);
            while dir != "/" {
                found.push(dir.clone());
                dir = paths::dirname(&dir);
            }
        }
        self.dirs.extend(found);
    }

    /// External-editor write: one working-tree entry changes and the UI
    /// reports it as an edit event. Part of the command interface, not a
    /// private shortcut.
    pub fn edit_file(&mut self, path: &str, content: &str) {
        let abs = paths::join(&self.cwd, path);
        self.working_files.insert(abs.clone(), content.to_string());
        self.last_event = Some(LastEvent::FsEdit { path: abs });
    }

    /// Serializable snapshot handed to the rendering layer.
    pub fn render(&self) -> RepoView {
        RepoView {
            initialized: self.initialized,
            current_branch: self.current_branch.clone(),
            cwd: self.cwd.clone(),
            staged_files: self.index.clone(),
            working_files: self.working_files.clone(),
            commits: self.commits.clone(),
            commit_order: self.commit_order.clone(),
            branches: self.branches.clone(),
            branch_meta: self.branch_meta.clone(),
            merge_state: self.merge_state.clone(),
            remotes: self.remotes.clone(),
            last_event: self.last_event.clone(),
        }
    }
}

/// Everything the graph/terminal UI needs after a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoView {
    pub initialized: bool,
    pub current_branch: String,
    pub cwd: String,
    pub staged_files: BTreeMap<String, IndexEntry>,
    pub working_files: Snapshot,
    pub commits: BTreeMap<String, Commit>,
    pub commit_order: Vec<String>,
    pub branches: BTreeMap<String, Option<String>>,
    pub branch_meta: BTreeMap<String, BranchMeta>,
    pub merge_state: Option<MergeState>,
    pub remotes: BTreeMap<String, String>,
    pub last_event: Option<LastEvent>,
}

/// Unix seconds.
pub fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::types::*;
    use super::*;

    fn committed_repo() -> Repo {
        let mut repo = Repo::new();
        repo.initialized = true;
        repo.branches.insert(DEFAULT_BRANCH.into(), None);
        repo.ensure_branch_meta(DEFAULT_BRANCH);
        repo.working_files.insert("/a.txt".into(), "one".into());
        repo.index.insert("/a.txt".into(), IndexEntry::Add("one".into()));
        repo.create_commit("first", None);
        repo
    }

    #[test]
    fn commit_overlays_index_and_clears_it() {
        let repo = committed_repo();
        assert_eq!(repo.commit_order.len(), 1);
        assert!(repo.index.is_empty());
        assert!(repo.merge_state.is_none());
        let head = repo.head_commit().unwrap();
        assert_eq!(head.files.get("/a.txt").unwrap(), "one");
        assert!(head.parents.is_empty());
    }

    #[test]
    fn commit_applies_staged_deletions() {
        let mut repo = committed_repo();
        repo.working_files.remove("/a.txt");
        repo.index.insert("/a.txt".into(), IndexEntry::Delete);
        repo.create_commit("drop", None);
        let head = repo.head_commit().unwrap();
        assert!(head.files.is_empty());
        assert!(!repo.working_files.contains_key("/a.txt"));
    }

    #[test]
    fn status_sets_are_disjoint() {
        let mut repo = committed_repo();
        // a.txt modified in working only; b.txt staged new; c.txt untracked
        repo.working_files.insert("/a.txt".into(), "changed".into());
        repo.working_files.insert("/b.txt".into(), "two".into());
        repo.index.insert("/b.txt".into(), IndexEntry::Add("two".into()));
        repo.working_files.insert("/c.txt".into(), "three".into());

        let status = repo.status();
        assert_eq!(status.staged, vec![("/b.txt".to_string(), ChangeKind::New)]);
        assert_eq!(status.unstaged, vec![("/a.txt".to_string(), ChangeKind::Modified)]);
        assert_eq!(status.untracked, vec!["/c.txt".to_string()]);
        assert!(status.conflicts.is_empty());
        assert!(status.is_dirty());
    }

    #[test]
    fn status_reports_unstaged_deletion() {
        let mut repo = committed_repo();
        repo.working_files.remove("/a.txt");
        let status = repo.status();
        assert_eq!(status.unstaged, vec![("/a.txt".to_string(), ChangeKind::Deleted)]);
    }

    #[test]
    fn conflict_paths_are_excluded_from_other_sets() {
        let mut repo = committed_repo();
        repo.working_files.insert("/a.txt".into(), "<<<<<<< HEAD\n...".into());
        repo.merge_state = Some(MergeState {
            branch: "feat".into(),
            their_head: "0".repeat(40),
            conflicts: vec!["/a.txt".into()],
        });
        let status = repo.status();
        assert!(status.staged.is_empty());
        assert!(status.unstaged.is_empty());
        assert!(status.untracked.is_empty());
        assert_eq!(status.conflicts, vec!["/a.txt".to_string()]);
        assert!(status.is_dirty());
    }

    #[test]
    fn clean_repo_is_not_dirty() {
        let repo = committed_repo();
        assert!(!repo.is_dirty());
    }

    #[test]
    fn prefix_resolution_rejects_ambiguity() {
        let mut repo = committed_repo();
        repo.working_files.insert("/b.txt".into(), "x".into());
        repo.index.insert("/b.txt".into(), IndexEntry::Add("x".into()));
        repo.create_commit("second", None);

        let first = repo.commit_order[0].clone();
        assert_eq!(repo.resolve_prefix(&first[..7]).unwrap(), first);
        assert!(matches!(
            repo.resolve_prefix("zzzz"),
            Err(crate::error::CommandError::NotFound(_))
        ));
        // The empty prefix matches everything.
        assert!(matches!(
            repo.resolve_prefix(""),
            Err(crate::error::CommandError::AmbiguousHash(_))
        ));
    }

    #[test]
    fn ancestor_checks_walk_all_parents() {
        let mut repo = committed_repo();
        let first = repo.head_id().unwrap();
        repo.working_files.insert("/b.txt".into(), "x".into());
        repo.index.insert("/b.txt".into(), IndexEntry::Add("x".into()));
        let second = repo.create_commit("second", None);

        assert!(repo.is_ancestor(&first, &second));
        assert!(!repo.is_ancestor(&second, &first));
        assert!(repo.is_ancestor(&second, &second));
    }

    #[test]
    fn merge_base_prefers_nearest_ancestor() {
        // base -> left, base -> right; merge_base(left, right) == base
        let mut repo = committed_repo();
        let base = repo.head_id().unwrap();

        repo.working_files.insert("/l.txt".into(), "l".into());
        repo.index.insert("/l.txt".into(), IndexEntry::Add("l".into()));
        let left = repo.create_commit("left", None);

        // Move the branch back to base and commit the other side.
        repo.branches.insert(DEFAULT_BRANCH.into(), Some(base.clone()));
        repo.sync_working_to(repo.snapshot_of(Some(&base)));
        repo.working_files.insert("/r.txt".into(), "r".into());
        repo.index.insert("/r.txt".into(), IndexEntry::Add("r".into()));
        let right = repo.create_commit("right", None);

        assert_eq!(repo.merge_base(&left, &right), Some(base));
        assert_eq!(repo.merge_base(&left, &left), Some(left.clone()));
    }
}
