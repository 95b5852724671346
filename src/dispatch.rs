//! Command dispatcher: one raw line in, one structured result out.
//!
//! A leading `git ` routes to the subcommand switch; everything else is
//! the shell subset. No failure escapes as a panic or error - every line
//! produces a `CmdResult`.

use crate::commands;
use crate::error::CommandError;
use crate::remote::RemoteStore;
use crate::repo::types::CmdResult;
use crate::repo::Repo;
use crate::shellwords;

/// Commands the interpreter understands, for `help` and autocompletion.
pub const GIT_COMMANDS: &[&str] = &[
    "init", "status", "add", "commit", "log", "branch", "checkout", "merge", "remote", "push",
    "pull", "clone", "stash", "reset", "revert",
];
pub const SHELL_COMMANDS: &[&str] =
    &["pwd", "ls", "cd", "mkdir", "touch", "rm", "cat", "echo", "clear", "help", "edit"];

pub fn dispatch(repo: &mut Repo, store: &mut RemoteStore, line: &str) -> CmdResult {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return CmdResult::ok_empty();
    }
    tracing::debug!(command = trimmed, "dispatching");

    // `echo … > file` short-circuits the general shell path.
    if let Some(redirect) = shellwords::parse_echo_redirect(trimmed) {
        return repo.sh_echo_write(&redirect).unwrap_or_else(Into::into);
    }

    let tokens = shellwords::tokenize(trimmed);
    let Some(first) = tokens.first() else {
        return CmdResult::ok_empty();
    };

    let result = match first.as_str() {
        "git" => git_command(repo, store, &tokens[1..]),
        "pwd" => repo.sh_pwd(),
        "ls" => repo.sh_ls(tokens.get(1).map(String::as_str)),
        "cd" => repo.sh_cd(tokens.get(1).map(String::as_str)),
        "mkdir" => with_arg(&tokens, "mkdir <path>").and_then(|arg| repo.sh_mkdir(arg)),
        "touch" => with_arg(&tokens, "touch <path>").and_then(|arg| repo.sh_touch(arg)),
        "rm" => with_arg(&tokens, "rm <path>").and_then(|arg| repo.sh_rm(arg)),
        "cat" => with_arg(&tokens, "cat <path>").and_then(|arg| repo.sh_cat(arg)),
        "echo" => repo.sh_echo(&tokens[1..]),
        "clear" => Ok(CmdResult::ok_empty()),
        "help" => Ok(help()),
        "edit" => Err(CommandError::Usage(
            "edit <file> (opens the editor; interactive sessions only)".to_string(),
        )),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    };
    result.unwrap_or_else(Into::into)
}

fn git_command(
    repo: &mut Repo,
    store: &mut RemoteStore,
    args: &[String],
) -> Result<CmdResult, CommandError> {
    let Some(sub) = args.first() else {
        return Err(CommandError::Usage("git <command> [<args>]".to_string()));
    };
    let rest = &args[1..];

    // Only `init` and `clone` make sense before initialization.
    if !repo.initialized && !matches!(sub.as_str(), "init" | "clone") {
        return Err(CommandError::Uninitialized);
    }

    match sub.as_str() {
        "init" => commands::init::run(repo),
        "status" => commands::status::run(repo),
        "add" => commands::add::run(repo, rest),
        "commit" => commands::commit::run(repo, rest),
        "log" => commands::log::run(repo, rest),
        "branch" => commands::branch::run(repo, rest),
        "checkout" => commands::checkout::run(repo, rest),
        "merge" => commands::merge::run(repo, rest),
        "remote" => commands::remote::run(repo, store, rest),
        "push" => commands::push::run(repo, store, rest),
        "pull" => commands::pull::run(repo, store, rest),
        "clone" => commands::clone::run(repo, store, rest),
        "stash" => commands::stash::run(repo, rest),
        "reset" => commands::reset::run(repo, rest),
        "revert" => commands::revert::run(repo, rest),
        other => Err(CommandError::Unimplemented(other.to_string())),
    }
}

fn with_arg<'a>(tokens: &'a [String], usage: &str) -> Result<&'a str, CommandError> {
    tokens
        .get(1)
        .map(String::as_str)
        .ok_or_else(|| CommandError::Usage(usage.to_string()))
}

fn help() -> CmdResult {
    let mut lines = vec!["Shell commands:".to_string()];
    lines.push(format!("  {}", SHELL_COMMANDS.join(", ")));
    lines.push("Git commands:".to_string());
    lines.push(format!("  git {}", GIT_COMMANDS.join(", git ")));
    CmdResult::ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> (Repo, RemoteStore) {
        (Repo::new(), RemoteStore::new())
    }

    #[test]
    fn unknown_command_exits_127() {
        let (mut repo, mut store) = fresh();
        let result = dispatch(&mut repo, &mut store, "gti status");
        assert_eq!(result.exit_code, 127);
        assert!(!result.ok);
    }

    #[test]
    fn git_before_init_fails() {
        let (mut repo, mut store) = fresh();
        let result = dispatch(&mut repo, &mut store, "git status");
        assert_eq!(result.exit_code, 1);
        assert!(result.stderr[0].contains("not a git repository"));
    }

    #[test]
    fn unimplemented_subcommand_says_so() {
        let (mut repo, mut store) = fresh();
        dispatch(&mut repo, &mut store, "git init");
        let result = dispatch(&mut repo, &mut store, "git rebase main");
        assert_eq!(result.exit_code, 1);
        assert!(result.stderr[0].contains("not implemented in this tutorial"));
    }

    #[test]
    fn echo_redirect_routes_to_write() {
        let (mut repo, mut store) = fresh();
        let result = dispatch(&mut repo, &mut store, r##"echo "# Title" > README.md"##);
        assert!(result.ok);
        assert_eq!(repo.working_files["/README.md"], "# Title");
    }

    #[test]
    fn plain_echo_prints() {
        let (mut repo, mut store) = fresh();
        let result = dispatch(&mut repo, &mut store, "echo hello world");
        assert_eq!(result.stdout, vec!["hello world"]);
    }

    #[test]
    fn empty_line_is_a_quiet_success() {
        let (mut repo, mut store) = fresh();
        let result = dispatch(&mut repo, &mut store, "   ");
        assert!(result.ok);
        assert!(result.stdout.is_empty());
    }

    #[test]
    fn full_first_commit_flow() {
        let (mut repo, mut store) = fresh();
        for line in [
            "git init",
            r##"echo "# X" > R"##,
            "git add R",
            r#"git commit -m "a""#,
        ] {
            let result = dispatch(&mut repo, &mut store, line);
            assert!(result.ok, "{line} failed: {:?}", result.stderr);
        }
        assert_eq!(repo.commit_order.len(), 1);
        let log = dispatch(&mut repo, &mut store, "git log --oneline");
        assert_eq!(log.stdout.len(), 1);
        assert!(log.stdout[0].ends_with(" a"));
    }
}
