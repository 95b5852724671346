//! Core state records for the simulated repository.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CommandError;

/// Complete path -> content snapshot, as stored inside a commit.
pub type Snapshot = BTreeMap<String, String>;

/// An immutable commit. Never mutated after creation; unreachable commits
/// stay in storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// 40-char hex id; displays use the first seven characters.
    pub id: String,
    pub message: String,
    /// 0 parents for a root commit, 2 for a merge commit, 1 otherwise.
    pub parents: Vec<String>,
    /// Unix seconds at creation.
    pub timestamp: u64,
    /// Full snapshot of the tracked tree.
    pub files: Snapshot,
    /// Horizontal lane used when drawing the DAG.
    pub lane: u32,
    /// Branch that was checked out when the commit was created.
    pub branch: String,
}

impl Commit {
    pub fn short_id(&self) -> &str {
        short(&self.id)
    }
}

/// First seven characters of a commit id.
pub fn short(id: &str) -> &str {
    if id.len() >= 7 {
        &id[..7]
    } else {
        id
    }
}

/// One staged change: the next commit's delta against HEAD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexEntry {
    Add(String),
    Delete,
}

/// An in-progress merge that has not been committed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeState {
    /// Name of the incoming branch (may be a temporary pull name).
    pub branch: String,
    /// Head of the incoming branch at merge time.
    pub their_head: String,
    /// Paths still carrying conflict markers.
    pub conflicts: Vec<String>,
}

/// A `git stash` entry: full working tree and index at stash time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashEntry {
    pub working_files: Snapshot,
    pub staged_files: BTreeMap<String, IndexEntry>,
    pub message: String,
    pub timestamp: u64,
}

/// Draw metadata allocated when a branch first appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchMeta {
    pub lane: u32,
    pub color: String,
}

/// Recorded default push/pull target for a local branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upstream {
    pub remote: String,
    pub branch: String,
}

/// What the last successful command did. Achievement logic and the UI
/// pattern-match on this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LastEvent {
    Init,
    Add { count: usize },
    Commit { id: String, message: String, merge: bool },
    Branch { name: String },
    Checkout { branch: String, created: bool },
    Merge { branch: String, conflicts: usize },
    RemoteAdd { name: String },
    Push { remote: String, branch: String, sent: usize },
    Pull { remote: String, branch: String, fast_forward: bool },
    Clone { url: String },
    Stash,
    StashPop,
    ResetHard { id: String },
    Revert { id: String },
    FsWrite { path: String },
    FsTouch { path: String },
    FsRm { path: String },
    FsMkdir { path: String },
    FsEdit { path: String },
}

/// Structured outcome of a single command line.
///
/// `stdout`/`stderr` are line arrays; no entry embeds a newline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdResult {
    pub ok: bool,
    pub exit_code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl CmdResult {
    pub fn ok(stdout: Vec<String>) -> Self {
        CmdResult { ok: true, exit_code: 0, stdout, stderr: Vec::new() }
    }

    pub fn ok_empty() -> Self {
        CmdResult::ok(Vec::new())
    }

    pub fn ok_line(line: impl Into<String>) -> Self {
        CmdResult::ok(vec![line.into()])
    }
}

impl From<CommandError> for CmdResult {
    fn from(err: CommandError) -> Self {
        CmdResult {
            ok: false,
            exit_code: err.exit_code(),
            stdout: Vec::new(),
            stderr: err.stderr_lines(),
        }
    }
}

/// How a path differs between two trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    New,
    Modified,
    Deleted,
}

/// The three disjoint status sets plus the current conflict list.
///
/// Conflicted paths are excluded from the other three sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub staged: Vec<(String, ChangeKind)>,
    pub unstaged: Vec<(String, ChangeKind)>,
    pub untracked: Vec<String>,
    pub conflicts: Vec<String>,
}

impl StatusSummary {
    /// Any staged, unstaged, untracked, or conflicting entry counts.
    pub fn is_dirty(&self) -> bool {
        !self.staged.is_empty()
            || !self.unstaged.is_empty()
            || !self.untracked.is_empty()
            || !self.conflicts.is_empty()
    }
}
