//! `git remote` - list or register remotes.

use crate::error::CommandError;
use crate::remote::RemoteStore;
use crate::repo::types::{CmdResult, LastEvent};
use crate::repo::Repo;

pub fn run(
    repo: &mut Repo,
    store: &mut RemoteStore,
    args: &[String],
) -> Result<CmdResult, CommandError> {
    match args.first().map(String::as_str) {
        None => Ok(CmdResult::ok(repo.remotes.keys().cloned().collect())),
        Some("-v") => {
            let mut lines = Vec::new();
            for (name, url) in &repo.remotes {
                lines.push(format!("{name}\t{url} (fetch)"));
                lines.push(format!("{name}\t{url} (push)"));
            }
            Ok(CmdResult::ok(lines))
        }
        Some("add") => {
            let (name, url) = match (args.get(1), args.get(2)) {
                (Some(n), Some(u)) => (n.clone(), u.clone()),
                _ => return Err(CommandError::Usage("git remote add <name> <url>".to_string())),
            };
            if repo.remotes.contains_key(&name) {
                return Err(CommandError::AlreadyExists(format!(
                    "error: remote {name} already exists."
                )));
            }
            store.ensure_repo(&url);
            repo.remotes.insert(name.clone(), url);
            repo.last_event = Some(LastEvent::RemoteAdd { name });
            Ok(CmdResult::ok_empty())
        }
        Some(other) => Err(CommandError::Usage(format!(
            "git remote [-v | add <name> <url>] (got '{other}')"
        ))),
    }
}
