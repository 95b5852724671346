//! Command failure kinds.
//!
//! Failures are values, not panics: every command line produces a
//! structured result, and these variants carry the exit code and stderr
//! text for the failing cases. Messages mirror familiar Git phrasing,
//! with "(simulated)" appended where the engine deliberately simplifies.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("fatal: not a git repository (simulated) - run 'git init' first")]
    Uninitialized,

    #[error("usage: {0}")]
    Usage(String),

    #[error("{0}")]
    NotFound(String),

    #[error("error: short hash '{0}' is ambiguous (simulated)")]
    AmbiguousHash(String),

    #[error("error: your local changes would be overwritten (simulated)\nhint: commit or stash them before you switch branches")]
    DirtyWorkingTree,

    #[error("nothing to commit, working tree clean")]
    EmptyCommit,

    #[error("error: committing is not possible because you have unmerged files\nhint: fix them up in the work tree, then use 'git add' to mark resolution")]
    UnresolvedMerge,

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    NothingToDo(String),

    #[error("git: '{0}' is not implemented in this tutorial")]
    Unimplemented(String),

    #[error("{0}: command not found")]
    UnknownCommand(String),
}

impl CommandError {
    /// Shell-style exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CommandError::UnknownCommand(_) => 127,
            _ => 1,
        }
    }

    /// Render the message as stderr lines.
    pub fn stderr_lines(&self) -> Vec<String> {
        self.to_string().lines().map(str::to_string).collect()
    }
}
