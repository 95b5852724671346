//! Git Tutor: a simulated Git engine with guided lessons.
//!
//! The crate models a complete Git repository in memory - working tree,
//! index, commit DAG, branches, merges, stash - plus a process-wide
//! remote store for simulated push/pull/clone, a command interpreter for
//! a git and shell subset, and a lesson engine that validates each step
//! against repository state. Nothing here touches a real Git repository
//! or the network; behavior aims to be teachably correct, not
//! byte-compatible.

pub mod app;
pub mod badges;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod lessons;
pub mod paths;
pub mod persist;
pub mod remote;
pub mod repo;
pub mod shellwords;

pub use app::{App, CommandOutcome};
pub use dispatch::dispatch;
pub use error::CommandError;
pub use repo::types::CmdResult;
pub use repo::{Repo, RepoView};
