//! `git branch` - list branches or create one at the current HEAD.

use crate::error::CommandError;
use crate::repo::types::{CmdResult, LastEvent};
use crate::repo::Repo;

pub fn run(repo: &mut Repo, args: &[String]) -> Result<CmdResult, CommandError> {
    match args.first() {
        None => {
            let lines = repo
                .branches
                .keys()
                .map(|name| {
                    if *name == repo.current_branch {
                        format!("* {name}")
                    } else {
                        format!("  {name}")
                    }
                })
                .collect();
            Ok(CmdResult::ok(lines))
        }
        Some(name) => {
            if repo.branches.contains_key(name) {
                return Err(CommandError::AlreadyExists(format!(
                    "fatal: a branch named '{name}' already exists"
                )));
            }
            let head = repo.head_id();
            repo.branches.insert(name.clone(), head);
            repo.ensure_branch_meta(name);
            repo.last_event = Some(LastEvent::Branch { name: name.clone() });
            Ok(CmdResult::ok_empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::types::IndexEntry;

    fn repo() -> Repo {
        let mut repo = Repo::new();
        repo.initialized = true;
        repo.branches.insert("main".into(), None);
        repo.ensure_branch_meta("main");
        repo
    }

    #[test]
    fn listing_marks_current_branch() {
        let mut repo = repo();
        run(&mut repo, &["feat".into()]).unwrap();
        let result = run(&mut repo, &[]).unwrap();
        assert_eq!(result.stdout, vec!["  feat", "* main"]);
    }

    #[test]
    fn create_points_at_current_head() {
        let mut repo = repo();
        repo.working_files.insert("/a".into(), "x".into());
        repo.index.insert("/a".into(), IndexEntry::Add("x".into()));
        let head = repo.create_commit("first", None);

        run(&mut repo, &["feat".into()]).unwrap();
        assert_eq!(repo.branches["feat"], Some(head));
        assert!(repo.branch_meta.contains_key("feat"));
        // Creating does not switch.
        assert_eq!(repo.current_branch, "main");
    }

    #[test]
    fn duplicate_name_fails() {
        let mut repo = repo();
        run(&mut repo, &["feat".into()]).unwrap();
        assert!(matches!(
            run(&mut repo, &["feat".into()]),
            Err(CommandError::AlreadyExists(_))
        ));
    }
}
