//! `git checkout [-b]` - switch branches, optionally creating one.
//!
//! The dirty check is deliberately coarse: any staged, unstaged,
//! untracked, or conflicting entry blocks the switch, even when the dirty
//! paths would not collide with it.

use crate::error::CommandError;
use crate::repo::types::{CmdResult, LastEvent};
use crate::repo::Repo;

pub fn run(repo: &mut Repo, args: &[String]) -> Result<CmdResult, CommandError> {
    let create = args.first().is_some_and(|a| a == "-b");
    let name = match args.get(if create { 1 } else { 0 }) {
        Some(n) => n.clone(),
        None => return Err(CommandError::Usage("git checkout [-b] <branch>".to_string())),
    };

    if !create && name == repo.current_branch {
        return Ok(CmdResult::ok_line(format!("Already on '{name}'")));
    }
    if repo.is_dirty() {
        return Err(CommandError::DirtyWorkingTree);
    }

    if create {
        if repo.branches.contains_key(&name) {
            return Err(CommandError::AlreadyExists(format!(
                "fatal: a branch named '{name}' already exists"
            )));
        }
        let head = repo.head_id();
        repo.branches.insert(name.clone(), head);
        repo.ensure_branch_meta(&name);
    } else if !repo.branches.contains_key(&name) {
        return Err(CommandError::NotFound(format!(
            "error: pathspec '{name}' did not match any file(s) known to git"
        )));
    }

    let target_head = repo.branches[&name].clone();
    repo.current_branch = name.clone();
    let snapshot = repo.snapshot_of(target_head.as_deref());
    repo.sync_working_to(snapshot);
    repo.index.clear();
    repo.merge_state = None;

    repo.last_event = Some(LastEvent::Checkout { branch: name.clone(), created: create });
    let line = if create {
        format!("Switched to a new branch '{name}'")
    } else {
        format!("Switched to branch '{name}'")
    };
    Ok(CmdResult::ok_line(line))
}
