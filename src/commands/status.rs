//! `git status` - report the staged/unstaged/untracked sets.

use crate::error::CommandError;
use crate::paths;
use crate::repo::types::{ChangeKind, CmdResult};
use crate::repo::Repo;

pub fn run(repo: &Repo) -> Result<CmdResult, CommandError> {
    let status = repo.status();
    let mut lines = vec![format!("On branch {}", repo.current_branch)];

    if let Some(merge) = &repo.merge_state {
        if status.conflicts.is_empty() {
            lines.push(format!(
                "All conflicts fixed but you are still merging branch '{}'.",
                merge.branch
            ));
            lines.push("  (use \"git commit\" to conclude merge)".to_string());
        } else {
            lines.push("You have unmerged paths.".to_string());
            lines.push("  (fix conflicts and run \"git commit\")".to_string());
        }
    }

    if !status.staged.is_empty() {
        lines.push(String::new());
        lines.push("Changes to be committed:".to_string());
        for (path, kind) in &status.staged {
            lines.push(format!("  {}   {}", label(*kind), paths::display(path)));
        }
    }

    if !status.conflicts.is_empty() {
        lines.push(String::new());
        lines.push("Unmerged paths:".to_string());
        for path in &status.conflicts {
            lines.push(format!("  both modified:   {}", paths::display(path)));
        }
    }

    if !status.unstaged.is_empty() {
        lines.push(String::new());
        lines.push("Changes not staged for commit:".to_string());
        for (path, kind) in &status.unstaged {
            lines.push(format!("  {}   {}", label(*kind), paths::display(path)));
        }
    }

    if !status.untracked.is_empty() {
        lines.push(String::new());
        lines.push("Untracked files:".to_string());
        for path in &status.untracked {
            lines.push(format!("  {}", paths::display(path)));
        }
    }

    if !status.is_dirty() {
        lines.push("nothing to commit, working tree clean".to_string());
    }

    Ok(CmdResult::ok(lines))
}

fn label(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::New => "new file:",
        ChangeKind::Modified => "modified:",
        ChangeKind::Deleted => "deleted: ",
    }
}
