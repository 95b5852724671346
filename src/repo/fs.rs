//! Shell subset over the virtual filesystem.
//!
//! A directory is known if it was created with `mkdir` or any file lives
//! under it. All mutating commands record a filesystem event.

use std::collections::BTreeSet;

use crate::error::CommandError;
use crate::paths;
use crate::shellwords::Redirect;

use super::types::{CmdResult, LastEvent};
use super::Repo;

impl Repo {
    pub fn sh_pwd(&self) -> Result<CmdResult, CommandError> {
        Ok(CmdResult::ok_line(self.cwd.clone()))
    }

    /// List immediate children: directories (with a `/` suffix) first,
    /// then files, each alphabetically.
    pub fn sh_ls(&self, arg: Option<&str>) -> Result<CmdResult, CommandError> {
        let target = match arg {
            Some(a) => paths::join(&self.cwd, a),
            None => self.cwd.clone(),
        };
        if !self.dir_exists(&target) {
            return Err(CommandError::NotFound(format!(
                "ls: cannot access '{}': No such file or directory",
                paths::display(&target)
            )));
        }

        let mut subdirs = BTreeSet::new();
        let mut files = BTreeSet::new();
        let prefix = child_prefix(&target);
        for dir in &self.dirs {
            if let Some(rest) = dir.strip_prefix(&prefix) {
                let first = rest.split('/').next().unwrap_or(rest);
                subdirs.insert(first.to_string());
            }
        }
        for path in self.working_files.keys() {
            if let Some(rest) = path.strip_prefix(&prefix) {
                match rest.split_once('/') {
                    Some((first, _)) => {
                        subdirs.insert(first.to_string());
                    }
                    None => {
                        files.insert(rest.to_string());
                    }
                }
            }
        }

        let mut lines: Vec<String> = subdirs.into_iter().map(|d| format!("{d}/")).collect();
        lines.extend(files);
        Ok(CmdResult::ok(lines))
    }

    pub fn sh_cd(&mut self, arg: Option<&str>) -> Result<CmdResult, CommandError> {
        let target = match arg {
            Some(a) => paths::join(&self.cwd, a),
            None => "/".to_string(),
        };
        if !self.dir_exists(&target) {
            return Err(CommandError::NotFound(format!(
                "cd: {}: No such file or directory",
                paths::display(&target)
            )));
        }
        self.cwd = target;
        Ok(CmdResult::ok_empty())
    }

    /// Record a directory. Creating an existing directory is not an error.
    pub fn sh_mkdir(&mut self, arg: &str) -> Result<CmdResult, CommandError> {
        let target = paths::join(&self.cwd, arg);
        if target != "/" {
            self.dirs.insert(target.clone());
        }
        self.last_event = Some(LastEvent::FsMkdir { path: target });
        Ok(CmdResult::ok_empty())
    }

    /// Ensure an empty file exists; existing content is left alone.
    pub fn sh_touch(&mut self, arg: &str) -> Result<CmdResult, CommandError> {
        let target = paths::join(&self.cwd, arg);
        self.working_files.entry(target.clone()).or_default();
        self.last_event = Some(LastEvent::FsTouch { path: target });
        Ok(CmdResult::ok_empty())
    }

    /// Remove a working-tree file. Removal is not staged.
    pub fn sh_rm(&mut self, arg: &str) -> Result<CmdResult, CommandError> {
        let target = paths::join(&self.cwd, arg);
        if self.working_files.remove(&target).is_none() {
            return Err(CommandError::NotFound(format!(
                "rm: cannot remove '{}': No such file or directory",
                paths::display(&target)
            )));
        }
        self.last_event = Some(LastEvent::FsRm { path: target });
        Ok(CmdResult::ok_empty())
    }

    pub fn sh_cat(&self, arg: &str) -> Result<CmdResult, CommandError> {
        let target = paths::join(&self.cwd, arg);
        match self.working_files.get(&target) {
            Some(content) => Ok(CmdResult::ok(content.lines().map(str::to_string).collect())),
            None => Err(CommandError::NotFound(format!(
                "cat: {}: No such file or directory",
                paths::display(&target)
            ))),
        }
    }

    /// `echo "text" > file`: write the file, creating parent directories
    /// implicitly.
    pub fn sh_echo_write(&mut self, redirect: &Redirect) -> Result<CmdResult, CommandError> {
        let target = paths::join(&self.cwd, &redirect.target);
        self.working_files.insert(target.clone(), redirect.text.clone());
        self.last_event = Some(LastEvent::FsWrite { path: target });
        Ok(CmdResult::ok_empty())
    }

    /// Plain `echo` without redirection just prints its arguments.
    pub fn sh_echo(&self, args: &[String]) -> Result<CmdResult, CommandError> {
        Ok(CmdResult::ok_line(args.join(" ")))
    }

    fn dir_exists(&self, path: &str) -> bool {
        if path == "/" || self.dirs.contains(path) {
            return true;
        }
        let prefix = child_prefix(path);
        self.dirs.iter().any(|d| d.starts_with(&prefix))
            || self.working_files.keys().any(|f| f.starts_with(&prefix))
    }
}

fn child_prefix(dir: &str) -> String {
    if dir == "/" {
        "/".to_string()
    } else {
        format!("{dir}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_with_files() -> Repo {
        let mut repo = Repo::new();
        repo.working_files.insert("/README.md".into(), "# hi".into());
        repo.working_files.insert("/src/main.rs".into(), "fn main() {}".into());
        repo.dirs.insert("/docs".into());
        repo
    }

    #[test]
    fn ls_lists_dirs_before_files() {
        let repo = repo_with_files();
        let result = repo.sh_ls(None).unwrap();
        assert_eq!(result.stdout, vec!["docs/", "src/", "README.md"]);
    }

    #[test]
    fn ls_of_missing_directory_fails() {
        let repo = repo_with_files();
        assert!(repo.sh_ls(Some("nope")).is_err());
    }

    #[test]
    fn cd_into_implicit_directory() {
        let mut repo = repo_with_files();
        repo.sh_cd(Some("src")).unwrap();
        assert_eq!(repo.cwd, "/src");
        let result = repo.sh_ls(None).unwrap();
        assert_eq!(result.stdout, vec!["main.rs"]);
    }

    #[test]
    fn cd_rejects_unknown_directory() {
        let mut repo = repo_with_files();
        assert!(repo.sh_cd(Some("missing")).is_err());
        assert_eq!(repo.cwd, "/");
    }

    #[test]
    fn touch_never_overwrites() {
        let mut repo = repo_with_files();
        repo.sh_touch("README.md").unwrap();
        assert_eq!(repo.working_files["/README.md"], "# hi");
        repo.sh_touch("empty.txt").unwrap();
        assert_eq!(repo.working_files["/empty.txt"], "");
        assert!(matches!(repo.last_event, Some(LastEvent::FsTouch { .. })));
    }

    #[test]
    fn rm_missing_file_fails() {
        let mut repo = repo_with_files();
        assert!(repo.sh_rm("ghost.txt").is_err());
        repo.sh_rm("README.md").unwrap();
        assert!(!repo.working_files.contains_key("/README.md"));
    }

    #[test]
    fn cat_prints_lines() {
        let mut repo = repo_with_files();
        repo.working_files.insert("/multi".into(), "a\nb\n".into());
        let result = repo.sh_cat("multi").unwrap();
        assert_eq!(result.stdout, vec!["a", "b"]);
    }

    #[test]
    fn echo_write_creates_parents_implicitly() {
        let mut repo = Repo::new();
        let redirect = Redirect { text: "x".into(), target: "deep/nested/file.txt".into() };
        repo.sh_echo_write(&redirect).unwrap();
        assert_eq!(repo.working_files["/deep/nested/file.txt"], "x");
        // The implied directories are now visible to ls and cd.
        assert_eq!(repo.sh_ls(None).unwrap().stdout, vec!["deep/"]);
        repo.sh_cd(Some("deep/nested")).unwrap();
        assert_eq!(repo.cwd, "/deep/nested");
    }
}
