//! Process-wide remote store.
//!
//! Remotes are plain data keyed by URL: the same commit DAG and branch
//! map a local repo has, minus working tree and index. Commits are deep
//! copied on every transfer so local and remote never alias.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::repo::types::{Commit, Snapshot};
use crate::repo::{ids, now, DEFAULT_BRANCH};

/// URL every clone-based lesson points at.
pub const SEED_REMOTE_URL: &str = "https://git-tutor.example/sample-project.git";

/// One simulated remote repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteRepo {
    pub commits: BTreeMap<String, Commit>,
    pub commit_order: Vec<String>,
    pub branches: BTreeMap<String, Option<String>>,
}

impl RemoteRepo {
    fn empty() -> Self {
        let mut branches = BTreeMap::new();
        branches.insert(DEFAULT_BRANCH.to_string(), None);
        RemoteRepo { commits: BTreeMap::new(), commit_order: Vec::new(), branches }
    }

    pub fn head_of(&self, branch: &str) -> Option<String> {
        self.branches.get(branch).cloned().flatten()
    }

    /// Snapshot at a branch head; empty when the branch is unborn.
    pub fn snapshot_of(&self, branch: &str) -> Snapshot {
        self.head_of(branch)
            .and_then(|id| self.commits.get(&id))
            .map(|c| c.files.clone())
            .unwrap_or_default()
    }

    /// Append a commit on top of a branch, as a simulated teammate would.
    /// `changes` is overlaid on the branch head's snapshot.
    pub fn append_commit(&mut self, branch: &str, message: &str, changes: &[(&str, &str)]) -> String {
        let mut files = self.snapshot_of(branch);
        for (path, content) in changes {
            files.insert(path.to_string(), content.to_string());
        }
        let parents: Vec<String> = self.head_of(branch).into_iter().collect();
        let timestamp = now();
        let id = ids::commit_id(message, &parents, timestamp, self.commit_order.len() as u64);
        self.commits.insert(
            id.clone(),
            Commit {
                id: id.clone(),
                message: message.to_string(),
                parents,
                timestamp,
                files,
                lane: 0,
                branch: branch.to_string(),
            },
        );
        self.commit_order.push(id.clone());
        self.branches.insert(branch.to_string(), Some(id.clone()));
        id
    }
}

/// All known remotes, keyed by URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteStore {
    pub repos: BTreeMap<String, RemoteRepo>,
}

impl RemoteStore {
    pub fn new() -> Self {
        RemoteStore::default()
    }

    /// Get or create the remote at `url`. A fresh remote has an unborn
    /// `main` and nothing else.
    pub fn ensure_repo(&mut self, url: &str) -> &mut RemoteRepo {
        self.repos.entry(url.to_string()).or_insert_with(RemoteRepo::empty)
    }

    pub fn repo(&self, url: &str) -> Option<&RemoteRepo> {
        self.repos.get(url)
    }

    pub fn repo_mut(&mut self, url: &str) -> Option<&mut RemoteRepo> {
        self.repos.get_mut(url)
    }

    /// Pre-populate the seed remote used by the clone lessons: a README
    /// commit followed by a contributing guide. Idempotent.
    pub fn seed(&mut self) {
        if self.repos.get(SEED_REMOTE_URL).is_some_and(|r| !r.commit_order.is_empty()) {
            return;
        }
        let repo = self.ensure_repo(SEED_REMOTE_URL);
        repo.append_commit(
            DEFAULT_BRANCH,
            "Initial commit",
            &[(
                "/README.md",
                "# Sample Project\n\nA small repository used by the Git Tutor lessons.\n",
            )],
        );
        repo.append_commit(
            DEFAULT_BRANCH,
            "Add contributing guide",
            &[(
                "/CONTRIBUTING.md",
                "# Contributing\n\nOpen a branch, commit your change, push it for review.\n",
            )],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_repo_starts_with_unborn_main() {
        let mut store = RemoteStore::new();
        let repo = store.ensure_repo("https://example.test/a.git");
        assert_eq!(repo.branches.get(DEFAULT_BRANCH), Some(&None));
        assert!(repo.commit_order.is_empty());
    }

    #[test]
    fn seed_creates_two_commits_once() {
        let mut store = RemoteStore::new();
        store.seed();
        store.seed();
        let repo = store.repo(SEED_REMOTE_URL).unwrap();
        assert_eq!(repo.commit_order.len(), 2);
        let head = repo.head_of(DEFAULT_BRANCH).unwrap();
        let snapshot = repo.snapshot_of(DEFAULT_BRANCH);
        assert!(snapshot.contains_key("/README.md"));
        assert!(snapshot.contains_key("/CONTRIBUTING.md"));
        assert_eq!(repo.commits[&head].message, "Add contributing guide");
    }

    #[test]
    fn append_commit_chains_parents() {
        let mut store = RemoteStore::new();
        let repo = store.ensure_repo("u");
        let first = repo.append_commit(DEFAULT_BRANCH, "one", &[("/a", "1")]);
        let second = repo.append_commit(DEFAULT_BRANCH, "two", &[("/b", "2")]);
        assert_eq!(repo.commits[&second].parents, vec![first]);
        assert_eq!(repo.snapshot_of(DEFAULT_BRANCH).len(), 2);
    }
}
