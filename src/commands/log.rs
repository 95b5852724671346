//! `git log` - walk the first-parent chain from HEAD.

use chrono::{DateTime, Utc};

use crate::error::CommandError;
use crate::repo::types::{short, CmdResult};
use crate::repo::Repo;

pub fn run(repo: &Repo, args: &[String]) -> Result<CmdResult, CommandError> {
    let history = repo.history();
    if history.is_empty() {
        return Err(CommandError::NotFound(format!(
            "fatal: your current branch '{}' does not have any commits yet",
            repo.current_branch
        )));
    }

    let oneline = args.iter().any(|a| a == "--oneline");
    let mut lines = Vec::new();
    for commit in history {
        if oneline {
            lines.push(format!("{} {}", commit.short_id(), commit.message));
        } else {
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("commit {}", commit.id));
            if commit.parents.len() > 1 {
                let parents: Vec<&str> = commit.parents.iter().map(|p| short(p)).collect();
                lines.push(format!("Merge: {}", parents.join(" ")));
            }
            lines.push(format!("Date:   {}", format_date(commit.timestamp)));
            lines.push(String::new());
            lines.push(format!("    {}", commit.message));
        }
    }
    Ok(CmdResult::ok(lines))
}

fn format_date(timestamp: u64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.format("%a %b %e %H:%M:%S %Y +0000").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
