//! `git add` - stage working-tree content or tracked-file deletions.

use std::collections::BTreeSet;

use crate::error::CommandError;
use crate::paths;
use crate::repo::types::{CmdResult, IndexEntry, LastEvent};
use crate::repo::Repo;

pub fn run(repo: &mut Repo, args: &[String]) -> Result<CmdResult, CommandError> {
    if args.is_empty() {
        return Err(CommandError::Usage("git add <path>... | . | -A".to_string()));
    }

    let head = repo.head_snapshot();
    let targets: Vec<String> = if args.iter().any(|a| a == "." || a == "-A") {
        // Everything tracked plus everything in the working tree.
        let mut all: BTreeSet<String> = head.keys().cloned().collect();
        all.extend(repo.working_files.keys().cloned());
        all.into_iter().collect()
    } else {
        // Validate every pathspec before touching the index so a bad one
        // leaves the repo untouched.
        let mut resolved = Vec::new();
        for arg in args {
            let path = paths::join(&repo.cwd, arg);
            if !repo.working_files.contains_key(&path) && !head.contains_key(&path) {
                return Err(CommandError::NotFound(format!(
                    "fatal: pathspec '{arg}' did not match any files"
                )));
            }
            resolved.push(path);
        }
        resolved
    };

    let count = targets.len();
    for path in targets {
        match repo.working_files.get(&path) {
            Some(content) => {
                repo.index.insert(path.clone(), IndexEntry::Add(content.clone()));
            }
            None => {
                repo.index.insert(path.clone(), IndexEntry::Delete);
            }
        }
        // Staging a conflicted path marks it resolved.
        if let Some(merge) = repo.merge_state.as_mut() {
            merge.conflicts.retain(|c| c != &path);
        }
    }

    repo.last_event = Some(LastEvent::Add { count });
    Ok(CmdResult::ok_empty())
}
