//! `git reset --hard` - move HEAD and rewrite the working tree.
//!
//! Commits left behind stay in storage; only the branch pointer moves.

use crate::error::CommandError;
use crate::repo::types::{CmdResult, LastEvent};
use crate::repo::Repo;

pub fn run(repo: &mut Repo, args: &[String]) -> Result<CmdResult, CommandError> {
    if args.first().map(String::as_str) != Some("--hard") {
        return Err(CommandError::Usage("git reset --hard [<target>]".to_string()));
    }
    let target = args.get(1).map(String::as_str).unwrap_or("HEAD");
    let id = resolve_target(repo, target)?;

    repo.branches.insert(repo.current_branch.clone(), Some(id.clone()));
    let snapshot = repo.snapshot_of(Some(&id));
    repo.sync_working_to(snapshot);
    repo.index.clear();
    repo.merge_state = None;

    let commit = &repo.commits[&id];
    let line = format!("HEAD is now at {} {}", commit.short_id(), commit.message);
    repo.last_event = Some(LastEvent::ResetHard { id });
    Ok(CmdResult::ok_line(line))
}

/// `HEAD`, `HEAD~N`, or an unambiguous hash prefix.
fn resolve_target(repo: &Repo, target: &str) -> Result<String, CommandError> {
    if target == "HEAD" || target.starts_with("HEAD~") {
        let head = repo.head_id().ok_or_else(|| {
            CommandError::NotFound(format!(
                "fatal: ambiguous argument '{target}': unknown revision (simulated)"
            ))
        })?;
        let steps = match target.strip_prefix("HEAD~") {
            None => 0,
            Some(n) => n.parse::<usize>().map_err(|_| {
                CommandError::NotFound(format!(
                    "fatal: ambiguous argument '{target}': unknown revision (simulated)"
                ))
            })?,
        };
        return repo.nth_first_parent(&head, steps).ok_or_else(|| {
            CommandError::NotFound(format!(
                "fatal: ambiguous argument '{target}': unknown revision (simulated)"
            ))
        });
    }
    repo.resolve_prefix(target)
}
