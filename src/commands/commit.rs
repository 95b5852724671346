//! `git commit` - turn the index into a new commit.

use crate::error::CommandError;
use crate::repo::types::{short, CmdResult, LastEvent};
use crate::repo::Repo;

pub fn run(repo: &mut Repo, args: &[String]) -> Result<CmdResult, CommandError> {
    if let Some(merge) = &repo.merge_state {
        if !merge.conflicts.is_empty() {
            return Err(CommandError::UnresolvedMerge);
        }
    }
    if repo.index.is_empty() {
        return Err(CommandError::EmptyCommit);
    }

    let message = match parse_message(args)? {
        Some(m) => m,
        None => match &repo.merge_state {
            Some(merge) => format!("Merge branch '{}'", merge.branch),
            None => "Commit".to_string(),
        },
    };

    let concluding = repo.merge_state.clone();
    let extra_parent = concluding.as_ref().map(|m| m.their_head.clone());
    let id = repo.create_commit(&message, extra_parent);

    repo.last_event = Some(LastEvent::Commit {
        id: id.clone(),
        message: message.clone(),
        merge: concluding.is_some(),
    });
    Ok(CmdResult::ok_line(format!(
        "[{} {}] {}",
        repo.current_branch,
        short(&id),
        message
    )))
}

/// Extract `-m <msg>`; `None` means no message flag was given.
fn parse_message(args: &[String]) -> Result<Option<String>, CommandError> {
    match args.iter().position(|a| a == "-m") {
        Some(idx) => match args.get(idx + 1) {
            Some(msg) => Ok(Some(msg.clone())),
            None => Err(CommandError::Usage("git commit -m <message>".to_string())),
        },
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::types::{IndexEntry, MergeState};

    fn staged_repo() -> Repo {
        let mut repo = Repo::new();
        repo.initialized = true;
        repo.branches.insert("main".into(), None);
        repo.working_files.insert("/a.txt".into(), "one".into());
        repo.index.insert("/a.txt".into(), IndexEntry::Add("one".into()));
        repo
    }

    #[test]
    fn commit_requires_staged_changes() {
        let mut repo = Repo::new();
        repo.initialized = true;
        assert_eq!(run(&mut repo, &[]), Err(CommandError::EmptyCommit));
    }

    #[test]
    fn commit_refuses_while_conflicts_remain() {
        let mut repo = staged_repo();
        repo.merge_state = Some(MergeState {
            branch: "feat".into(),
            their_head: "0".repeat(40),
            conflicts: vec!["/a.txt".into()],
        });
        assert_eq!(
            run(&mut repo, &["-m".into(), "x".into()]),
            Err(CommandError::UnresolvedMerge)
        );
    }

    #[test]
    fn commit_reports_branch_and_short_hash() {
        let mut repo = staged_repo();
        let result = run(&mut repo, &["-m".into(), "first".into()]).unwrap();
        let head = repo.head_id().unwrap();
        assert_eq!(result.stdout[0], format!("[main {}] first", &head[..7]));
    }

    #[test]
    fn default_message_is_commit() {
        let mut repo = staged_repo();
        run(&mut repo, &[]).unwrap();
        assert_eq!(repo.head_commit().unwrap().message, "Commit");
    }

    #[test]
    fn concluding_merge_adds_second_parent_and_default_message() {
        let mut repo = staged_repo();
        run(&mut repo, &["-m".into(), "base".into()]).unwrap();
        let base = repo.head_id().unwrap();

        // A divergent commit on feat acts as "theirs".
        repo.branches.insert("feat".into(), Some(base.clone()));
        repo.current_branch = "feat".into();
        repo.working_files.insert("/theirs.txt".into(), "t".into());
        repo.index.insert("/theirs.txt".into(), IndexEntry::Add("t".into()));
        let their = repo.create_commit("their change", None);

        repo.current_branch = "main".into();
        repo.working_files.insert("/b.txt".into(), "two".into());
        repo.index.insert("/b.txt".into(), IndexEntry::Add("two".into()));
        repo.merge_state = Some(MergeState {
            branch: "feat".into(),
            their_head: their.clone(),
            conflicts: vec![],
        });

        run(&mut repo, &[]).unwrap();
        let head = repo.head_commit().unwrap();
        assert_eq!(head.message, "Merge branch 'feat'");
        assert_eq!(head.parents, vec![base, their]);
        assert!(repo.merge_state.is_none());
    }
}
