//! `git stash` / `git stash pop` - park and restore uncommitted work.

use crate::error::CommandError;
use crate::repo::types::{CmdResult, LastEvent, StashEntry};
use crate::repo::{now, Repo};

pub fn run(repo: &mut Repo, args: &[String]) -> Result<CmdResult, CommandError> {
    match args.first().map(String::as_str) {
        None => push(repo),
        Some("pop") => pop(repo),
        Some(other) => Err(CommandError::Usage(format!("git stash [pop] (got '{other}')"))),
    }
}

fn push(repo: &mut Repo) -> Result<CmdResult, CommandError> {
    if !repo.is_dirty() {
        return Err(CommandError::NothingToDo(
            "No local changes to save (simulated)".to_string(),
        ));
    }

    let message = match repo.head_commit() {
        Some(head) => format!("WIP on {}: {} {}", repo.current_branch, head.short_id(), head.message),
        None => format!("WIP on {}", repo.current_branch),
    };
    let entry = StashEntry {
        working_files: repo.working_files.clone(),
        staged_files: repo.index.clone(),
        message: message.clone(),
        timestamp: now(),
    };
    // Newest first.
    repo.stash.insert(0, entry);

    let head_snapshot = repo.head_snapshot();
    repo.sync_working_to(head_snapshot);
    repo.index.clear();

    repo.last_event = Some(LastEvent::Stash);
    Ok(CmdResult::ok_line(format!(
        "Saved working directory and index state {message}"
    )))
}

fn pop(repo: &mut Repo) -> Result<CmdResult, CommandError> {
    if repo.stash.is_empty() {
        return Err(CommandError::NothingToDo("No stash entries found.".to_string()));
    }
    let entry = repo.stash.remove(0);
    repo.working_files = entry.working_files;
    repo.index = entry.staged_files;
    repo.seed_dirs_from_working();

    repo.last_event = Some(LastEvent::StashPop);
    Ok(CmdResult::ok_line("Dropped stash entry (simulated)"))
}
