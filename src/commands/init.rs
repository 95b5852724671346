//! `git init` - idempotent repository initialization.

use crate::error::CommandError;
use crate::repo::types::{CmdResult, LastEvent};
use crate::repo::{Repo, DEFAULT_BRANCH};

pub fn run(repo: &mut Repo) -> Result<CmdResult, CommandError> {
    let reinit = repo.initialized;
    repo.initialized = true;
    repo.branches.entry(DEFAULT_BRANCH.to_string()).or_insert(None);
    repo.current_branch = DEFAULT_BRANCH.to_string();
    repo.ensure_branch_meta(DEFAULT_BRANCH);
    repo.last_event = Some(LastEvent::Init);

    if reinit {
        Ok(CmdResult::ok_line("Reinitialized existing Git repository (simulated)"))
    } else {
        Ok(CmdResult::ok_line("Initialized empty Git repository (simulated)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_unborn_main() {
        let mut repo = Repo::new();
        let result = run(&mut repo).unwrap();
        assert!(repo.initialized);
        assert_eq!(repo.branches.get(DEFAULT_BRANCH), Some(&None));
        assert_eq!(repo.current_branch, DEFAULT_BRANCH);
        assert!(result.stdout[0].starts_with("Initialized"));
    }

    #[test]
    fn init_is_idempotent() {
        let mut repo = Repo::new();
        run(&mut repo).unwrap();
        let result = run(&mut repo).unwrap();
        assert!(result.stdout[0].starts_with("Reinitialized"));
        assert_eq!(repo.branches.len(), 1);
    }
}
