//! `git merge` - fast-forward when possible, otherwise a three-way merge
//! against the lowest-cost common ancestor.
//!
//! A conflicting merge is the one operation that intentionally leaves
//! partial state behind: marker-filled working files plus the pending
//! merge record, for the user to resolve and commit.

use crate::error::CommandError;
use crate::paths;
use crate::repo::merge3;
use crate::repo::types::{CmdResult, IndexEntry, LastEvent, MergeState};
use crate::repo::Repo;

pub fn run(repo: &mut Repo, args: &[String]) -> Result<CmdResult, CommandError> {
    let name = match args.first() {
        Some(n) => n.clone(),
        None => return Err(CommandError::Usage("git merge <branch>".to_string())),
    };
    merge_branch(repo, &name)
}

/// Merge `name` into the current branch. Shared with `pull`, which merges
/// through a temporary branch name.
pub(crate) fn merge_branch(repo: &mut Repo, name: &str) -> Result<CmdResult, CommandError> {
    let theirs = match repo.branches.get(name) {
        Some(head) => head.clone(),
        None => {
            return Err(CommandError::NotFound(format!(
                "merge: {name} - not something we can merge"
            )))
        }
    };
    if repo.is_dirty() {
        return Err(CommandError::DirtyWorkingTree);
    }

    let ours = repo.head_id();
    let up_to_date = |repo: &mut Repo| {
        repo.last_event = Some(LastEvent::Merge { branch: name.to_string(), conflicts: 0 });
        Ok(CmdResult::ok_line("Already up to date."))
    };

    let their_head = match theirs {
        // Nothing on their side to bring in.
        None => return up_to_date(repo),
        Some(id) => id,
    };
    let our_head = match ours {
        None => return fast_forward(repo, name, &their_head),
        Some(id) => id,
    };
    if repo.is_ancestor(&their_head, &our_head) {
        return up_to_date(repo);
    }
    if repo.is_ancestor(&our_head, &their_head) {
        return fast_forward(repo, name, &their_head);
    }

    // True divergence: three-way merge against the common ancestor.
    let base = repo
        .merge_base(&our_head, &their_head)
        .map(|id| repo.snapshot_of(Some(&id)))
        .unwrap_or_default();
    let our_snapshot = repo.snapshot_of(Some(&our_head));
    let their_snapshot = repo.snapshot_of(Some(&their_head));
    let outcome = merge3::three_way(&base, &our_snapshot, &their_snapshot, name);

    // Stage every non-conflicting delta so the concluding commit carries
    // the merged tree; deletions included.
    for (path, content) in &outcome.files {
        if outcome.conflicts.contains(path) {
            continue;
        }
        if our_snapshot.get(path) != Some(content) {
            repo.index.insert(path.clone(), IndexEntry::Add(content.clone()));
        }
    }
    for path in our_snapshot.keys() {
        if !outcome.files.contains_key(path) {
            repo.index.insert(path.clone(), IndexEntry::Delete);
        }
    }
    repo.sync_working_to(outcome.files.clone());

    if outcome.is_clean() {
        let message = format!("Merge branch '{name}'");
        repo.create_commit(&message, Some(their_head));
        repo.last_event = Some(LastEvent::Merge { branch: name.to_string(), conflicts: 0 });
        return Ok(CmdResult::ok_line(
            "Merge made by the three-way strategy (simulated).",
        ));
    }

    let conflicts = outcome.conflicts;
    repo.merge_state = Some(MergeState {
        branch: name.to_string(),
        their_head,
        conflicts: conflicts.clone(),
    });
    repo.last_event = Some(LastEvent::Merge {
        branch: name.to_string(),
        conflicts: conflicts.len(),
    });

    let mut stderr: Vec<String> = conflicts
        .iter()
        .map(|p| format!("CONFLICT (content): Merge conflict in {}", paths::display(p)))
        .collect();
    stderr.push("Automatic merge failed; fix conflicts and then commit the result.".to_string());
    Ok(CmdResult { ok: false, exit_code: 1, stdout: Vec::new(), stderr })
}

/// Move the current branch to `their_head` and mirror its snapshot.
fn fast_forward(repo: &mut Repo, name: &str, their_head: &str) -> Result<CmdResult, CommandError> {
    repo.branches.insert(repo.current_branch.clone(), Some(their_head.to_string()));
    let snapshot = repo.snapshot_of(Some(their_head));
    repo.sync_working_to(snapshot);
    repo.index.clear();
    repo.merge_state = None;
    repo.last_event = Some(LastEvent::Merge { branch: name.to_string(), conflicts: 0 });
    Ok(CmdResult::ok(vec![
        format!("Updating to {}", &their_head[..7.min(their_head.len())]),
        "Fast-forward (simulated)".to_string(),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::types::IndexEntry;

    fn stage(repo: &mut Repo, path: &str, content: &str) {
        repo.working_files.insert(path.into(), content.into());
        repo.index.insert(path.into(), IndexEntry::Add(content.into()));
    }

    fn base_repo() -> Repo {
        let mut repo = Repo::new();
        repo.initialized = true;
        repo.branches.insert("main".into(), None);
        repo.ensure_branch_meta("main");
        stage(&mut repo, "/f", "1");
        repo.create_commit("base", None);
        repo
    }

    fn switch(repo: &mut Repo, name: &str) {
        if !repo.branches.contains_key(name) {
            let head = repo.head_id();
            repo.branches.insert(name.into(), head);
            repo.ensure_branch_meta(name);
        }
        repo.current_branch = name.into();
        let head = repo.branches[name].clone();
        let snapshot = repo.snapshot_of(head.as_deref());
        repo.sync_working_to(snapshot);
        repo.index.clear();
    }

    #[test]
    fn merging_an_ancestor_is_up_to_date() {
        let mut repo = base_repo();
        switch(&mut repo, "feat");
        switch(&mut repo, "main");
        stage(&mut repo, "/g", "2");
        repo.create_commit("ahead", None);

        let result = run(&mut repo, &["feat".into()]).unwrap();
        assert_eq!(result.stdout[0], "Already up to date.");
    }

    #[test]
    fn fast_forward_moves_head_and_tree() {
        let mut repo = base_repo();
        switch(&mut repo, "feat");
        stage(&mut repo, "/f", "2");
        repo.create_commit("feat work", None);
        let feat_head = repo.head_id().unwrap();

        switch(&mut repo, "main");
        let result = run(&mut repo, &["feat".into()]).unwrap();
        assert!(result.stdout.iter().any(|l| l.contains("Fast-forward")));
        assert_eq!(repo.branches["main"], Some(feat_head));
        assert_eq!(repo.working_files["/f"], "2");
    }

    #[test]
    fn divergent_merge_without_overlap_commits() {
        let mut repo = base_repo();
        switch(&mut repo, "feat");
        stage(&mut repo, "/f", "2");
        repo.create_commit("feat edit", None);

        switch(&mut repo, "main");
        stage(&mut repo, "/g", "3");
        repo.create_commit("main add", None);

        run(&mut repo, &["feat".into()]).unwrap();
        let head = repo.head_commit().unwrap();
        assert_eq!(head.parents.len(), 2);
        assert_eq!(repo.working_files["/f"], "2");
        assert_eq!(repo.working_files["/g"], "3");
        assert!(repo.index.is_empty());
        assert!(repo.merge_state.is_none());
    }

    #[test]
    fn conflicting_merge_leaves_markers_and_state() {
        let mut repo = base_repo();
        stage(&mut repo, "/config", "blue");
        repo.create_commit("add config", None);

        switch(&mut repo, "feat");
        stage(&mut repo, "/config", "green");
        repo.create_commit("feat color", None);

        switch(&mut repo, "main");
        stage(&mut repo, "/config", "red");
        repo.create_commit("main color", None);

        let result = run(&mut repo, &["feat".into()]).unwrap();
        assert!(!result.ok);
        assert_eq!(result.exit_code, 1);
        assert!(result.stderr[0].contains("Merge conflict in config"));

        let merge = repo.merge_state.as_ref().unwrap();
        assert_eq!(merge.conflicts, vec!["/config".to_string()]);
        let buffer = &repo.working_files["/config"];
        assert!(buffer.contains("<<<<<<< HEAD"));
        assert!(buffer.contains("red"));
        assert!(buffer.contains("green"));
        assert!(buffer.contains(">>>>>>> feat"));
    }

    #[test]
    fn dirty_tree_blocks_merge() {
        let mut repo = base_repo();
        switch(&mut repo, "feat");
        switch(&mut repo, "main");
        repo.working_files.insert("/loose".into(), "x".into());
        assert_eq!(run(&mut repo, &["feat".into()]), Err(CommandError::DirtyWorkingTree));
    }

    #[test]
    fn unknown_branch_is_not_mergeable() {
        let mut repo = base_repo();
        assert!(matches!(
            run(&mut repo, &["ghost".into()]),
            Err(CommandError::NotFound(_))
        ));
    }
}
