//! `git revert` - commit the inverse patch of an earlier commit.
//!
//! The whole post-revert tree is staged, not just the inverse patch; the
//! resulting snapshot is identical either way.

use crate::error::CommandError;
use crate::repo::types::{short, CmdResult, IndexEntry, LastEvent};
use crate::repo::Repo;

pub fn run(repo: &mut Repo, args: &[String]) -> Result<CmdResult, CommandError> {
    let prefix = match args.first() {
        Some(p) => p,
        None => return Err(CommandError::Usage("git revert <commit>".to_string())),
    };
    let target_id = repo.resolve_prefix(prefix)?;
    let target = repo.commits[&target_id].clone();
    let parent_files = target
        .parents
        .first()
        .and_then(|p| repo.commits.get(p))
        .map(|c| c.files.clone())
        .unwrap_or_default();

    // Inverse patch of the target against its first parent, applied on
    // top of the current HEAD snapshot.
    let mut result = repo.head_snapshot();
    for (path, content) in &target.files {
        match parent_files.get(path) {
            Some(before) if before != content => {
                result.insert(path.clone(), before.clone());
            }
            None => {
                result.remove(path);
            }
            Some(_) => {}
        }
    }
    for (path, before) in &parent_files {
        if !target.files.contains_key(path) {
            result.insert(path.clone(), before.clone());
        }
    }

    let head_files = repo.head_snapshot();
    repo.index = result
        .iter()
        .map(|(path, content)| (path.clone(), IndexEntry::Add(content.clone())))
        .collect();
    for path in head_files.keys() {
        if !result.contains_key(path) {
            repo.index.insert(path.clone(), IndexEntry::Delete);
        }
    }

    let message = format!("Revert \"{}\"", target.message);
    let id = repo.create_commit(&message, None);
    repo.last_event = Some(LastEvent::Revert { id: target_id });
    Ok(CmdResult::ok_line(format!(
        "[{} {}] {message}",
        repo.current_branch,
        short(&id)
    )))
}
