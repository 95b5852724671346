//! `git push [-u]` - transfer missing commits and advance the remote ref.

use crate::error::CommandError;
use crate::remote::RemoteStore;
use crate::repo::types::{short, CmdResult, LastEvent, Upstream};
use crate::repo::Repo;

pub fn run(
    repo: &mut Repo,
    store: &mut RemoteStore,
    args: &[String],
) -> Result<CmdResult, CommandError> {
    let set_upstream = args.iter().any(|a| a == "-u");
    let positional: Vec<&String> = args.iter().filter(|a| *a != "-u").collect();

    let (remote, branch) = match positional.as_slice() {
        [] => (default_remote(repo), repo.current_branch.clone()),
        [remote] => ((*remote).clone(), repo.current_branch.clone()),
        [remote, branch, ..] => ((*remote).clone(), (*branch).clone()),
    };

    let local_head = match repo.branches.get(&branch).cloned().flatten() {
        Some(head) => head,
        None => {
            return Err(CommandError::NotFound(format!(
                "error: src refspec {branch} does not match any (simulated)"
            )))
        }
    };
    let url = match repo.remotes.get(&remote) {
        Some(url) => url.clone(),
        None => {
            return Err(CommandError::NotFound(format!(
                "fatal: '{remote}' does not appear to be a git repository (simulated)"
            )))
        }
    };

    let remote_repo = store.ensure_repo(&url);
    let old_head = remote_repo.head_of(&branch);

    // Transfer commits the remote has not seen, in creation order; deep
    // copies keep the two DAGs independent.
    let mut sent = 0usize;
    for id in &repo.commit_order {
        if !remote_repo.commits.contains_key(id) {
            remote_repo.commits.insert(id.clone(), repo.commits[id].clone());
            remote_repo.commit_order.push(id.clone());
            sent += 1;
        }
    }
    remote_repo.branches.insert(branch.clone(), Some(local_head.clone()));

    let mut lines = vec![format!("To {url}")];
    match &old_head {
        Some(old) if *old == local_head => {
            lines = vec!["Everything up-to-date".to_string()];
        }
        Some(old) => {
            lines.push(format!("   {}..{}  {branch} -> {branch}", short(old), short(&local_head)));
        }
        None => {
            lines.push(format!(" * [new branch]      {branch} -> {branch}"));
        }
    }

    if set_upstream {
        repo.upstreams.insert(
            branch.clone(),
            Upstream { remote: remote.clone(), branch: branch.clone() },
        );
        lines.push(format!(
            "branch '{branch}' set up to track '{remote}/{branch}' (simulated)."
        ));
    }

    repo.last_event = Some(LastEvent::Push { remote, branch, sent });
    Ok(CmdResult::ok(lines))
}

/// Upstream remote of the current branch, falling back to `origin`.
pub(crate) fn default_remote(repo: &Repo) -> String {
    repo.upstreams
        .get(&repo.current_branch)
        .map(|u| u.remote.clone())
        .unwrap_or_else(|| "origin".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::types::IndexEntry;

    fn repo_with_commit() -> (Repo, RemoteStore) {
        let mut repo = Repo::new();
        repo.initialized = true;
        repo.branches.insert("main".into(), None);
        repo.ensure_branch_meta("main");
        repo.working_files.insert("/a".into(), "1".into());
        repo.index.insert("/a".into(), IndexEntry::Add("1".into()));
        repo.create_commit("first", None);
        repo.remotes.insert("origin".into(), "u://r".into());
        let mut store = RemoteStore::new();
        store.ensure_repo("u://r");
        (repo, store)
    }

    #[test]
    fn push_copies_commits_and_sets_ref() {
        let (mut repo, mut store) = repo_with_commit();
        let result = run(&mut repo, &mut store, &["origin".into(), "main".into()]).unwrap();
        let remote = store.repo("u://r").unwrap();
        assert_eq!(remote.head_of("main"), repo.head_id());
        assert_eq!(remote.commit_order, repo.commit_order);
        assert!(result.stdout[1].contains("[new branch]"));
    }

    #[test]
    fn push_is_incremental() {
        let (mut repo, mut store) = repo_with_commit();
        run(&mut repo, &mut store, &[]).unwrap();

        repo.working_files.insert("/b".into(), "2".into());
        repo.index.insert("/b".into(), IndexEntry::Add("2".into()));
        repo.create_commit("second", None);
        run(&mut repo, &mut store, &[]).unwrap();

        let remote = store.repo("u://r").unwrap();
        assert_eq!(remote.commit_order.len(), 2);
        assert!(matches!(
            repo.last_event,
            Some(LastEvent::Push { sent: 1, .. })
        ));
    }

    #[test]
    fn push_u_records_upstream() {
        let (mut repo, mut store) = repo_with_commit();
        run(&mut repo, &mut store, &["-u".into(), "origin".into(), "main".into()]).unwrap();
        assert_eq!(
            repo.upstreams["main"],
            Upstream { remote: "origin".into(), branch: "main".into() }
        );
    }

    #[test]
    fn push_unborn_branch_fails() {
        let mut repo = Repo::new();
        repo.initialized = true;
        repo.branches.insert("main".into(), None);
        repo.remotes.insert("origin".into(), "u://r".into());
        let mut store = RemoteStore::new();
        assert!(run(&mut repo, &mut store, &[]).is_err());
    }

    #[test]
    fn push_unknown_remote_fails() {
        let (mut repo, mut store) = repo_with_commit();
        assert!(run(&mut repo, &mut store, &["nowhere".into(), "main".into()]).is_err());
    }

    #[test]
    fn push_same_head_reports_up_to_date() {
        let (mut repo, mut store) = repo_with_commit();
        run(&mut repo, &mut store, &[]).unwrap();
        let result = run(&mut repo, &mut store, &[]).unwrap();
        assert_eq!(result.stdout, vec!["Everything up-to-date"]);
    }
}
