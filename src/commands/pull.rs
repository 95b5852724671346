//! `git pull` - import remote commits, then fast-forward or merge.

use super::{merge, push};
use crate::error::CommandError;
use crate::remote::RemoteStore;
use crate::repo::types::{short, CmdResult, LastEvent};
use crate::repo::Repo;

pub fn run(
    repo: &mut Repo,
    store: &mut RemoteStore,
    args: &[String],
) -> Result<CmdResult, CommandError> {
    if repo.is_dirty() {
        return Err(CommandError::DirtyWorkingTree);
    }

    let (remote, branch) = match args {
        [] => (push::default_remote(repo), repo.current_branch.clone()),
        [remote] => (remote.clone(), repo.current_branch.clone()),
        [remote, branch, ..] => (remote.clone(), branch.clone()),
    };

    let url = match repo.remotes.get(&remote) {
        Some(url) => url.clone(),
        None => {
            return Err(CommandError::NotFound(format!(
                "fatal: '{remote}' does not appear to be a git repository (simulated)"
            )))
        }
    };
    let remote_repo = match store.repo(&url) {
        Some(r) => r.clone(),
        None => {
            return Err(CommandError::NotFound(format!(
                "fatal: '{remote}' does not appear to be a git repository (simulated)"
            )))
        }
    };
    let remote_head = match remote_repo.head_of(&branch) {
        Some(head) => head,
        None => {
            return Err(CommandError::NotFound(format!(
                "fatal: couldn't find remote ref {branch} (simulated)"
            )))
        }
    };

    // Import every commit the remote knows and we do not, in its order.
    for id in &remote_repo.commit_order {
        if !repo.commits.contains_key(id) {
            repo.commits.insert(id.clone(), remote_repo.commits[id].clone());
            repo.commit_order.push(id.clone());
        }
    }

    let local_head = repo.head_id();
    let result = match &local_head {
        Some(local) if repo.is_ancestor(&remote_head, local) => {
            Ok(CmdResult::ok_line("Already up to date."))
        }
        Some(local) if !repo.is_ancestor(local, &remote_head) => {
            // Diverged: merge through a temporary branch carrying the
            // remote-tracking name, removed again afterwards.
            let temp = format!("{remote}/{branch}");
            repo.branches.insert(temp.clone(), Some(remote_head.clone()));
            let merge_result = merge::merge_branch(repo, &temp);
            repo.branches.remove(&temp);
            repo.branch_meta.remove(&temp);
            // Conflicts propagate as-is; the merge event stands.
            merge_result
        }
        _ => {
            // Unborn local branch or plain fast-forward.
            let old = local_head.clone();
            repo.branches.insert(repo.current_branch.clone(), Some(remote_head.clone()));
            let snapshot = repo.snapshot_of(Some(&remote_head));
            repo.sync_working_to(snapshot);
            repo.index.clear();
            let span = match old {
                Some(o) => format!("Updating {}..{}", short(&o), short(&remote_head)),
                None => format!("Updating to {}", short(&remote_head)),
            };
            Ok(CmdResult::ok(vec![span, "Fast-forward (simulated)".to_string()]))
        }
    };

    let result = result?;
    if result.ok {
        let fast_forward = result.stdout.iter().any(|l| l.contains("Fast-forward"));
        repo.last_event = Some(LastEvent::Pull { remote, branch, fast_forward });
    }
    Ok(result)
}
