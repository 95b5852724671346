//! `git clone` - replace this repo with a copy of a remote.

use crate::error::CommandError;
use crate::remote::RemoteStore;
use crate::repo::types::{CmdResult, LastEvent, Upstream};
use crate::repo::{Repo, DEFAULT_BRANCH};

pub fn run(
    repo: &mut Repo,
    store: &mut RemoteStore,
    args: &[String],
) -> Result<CmdResult, CommandError> {
    let url = match args.first() {
        Some(u) => u.clone(),
        None => return Err(CommandError::Usage("git clone <url>".to_string())),
    };
    let remote_repo = match store.repo(&url) {
        Some(r) => r.clone(),
        None => {
            return Err(CommandError::NotFound(format!(
                "fatal: repository '{url}' not found (simulated)"
            )))
        }
    };

    // Start over: clone replaces whatever was here.
    *repo = Repo::new();
    repo.initialized = true;
    repo.commits = remote_repo.commits.clone();
    repo.commit_order = remote_repo.commit_order.clone();
    repo.branches = remote_repo.branches.clone();
    for name in remote_repo.branches.keys() {
        repo.ensure_branch_meta(name);
    }
    if !repo.branches.contains_key(DEFAULT_BRANCH) {
        repo.branches.insert(DEFAULT_BRANCH.to_string(), None);
        repo.ensure_branch_meta(DEFAULT_BRANCH);
    }
    repo.current_branch = DEFAULT_BRANCH.to_string();

    repo.remotes.insert("origin".to_string(), url.clone());
    repo.upstreams.insert(
        DEFAULT_BRANCH.to_string(),
        Upstream { remote: "origin".to_string(), branch: DEFAULT_BRANCH.to_string() },
    );

    let head = repo.head_id();
    let snapshot = repo.snapshot_of(head.as_deref());
    repo.sync_working_to(snapshot);

    repo.last_event = Some(LastEvent::Clone { url: url.clone() });
    Ok(CmdResult::ok(vec![
        format!("Cloning into '{}' (simulated)...", project_name(&url)),
        "done.".to_string(),
    ]))
}

/// Last URL segment without a `.git` suffix.
fn project_name(url: &str) -> &str {
    let tail = url.trim_end_matches('/').rsplit('/').next().unwrap_or(url);
    tail.strip_suffix(".git").unwrap_or(tail)
}
