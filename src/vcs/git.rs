use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::{VcsError, VersionControl};

/// `VersionControl` implemented by shelling out to the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Run `git -C <repo_dir> <args>` and return stdout on success.
    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let command = args.join(" ");
        debug!(repo = %self.repo_dir.display(), command = %command, "running git");

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_dir)
            .args(args)
            .output()
            .map_err(|source| VcsError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(VcsError::Failed { command, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControl for GitCli {
    fn current_branch(&self) -> Result<String, VcsError> {
        let branch = self.run(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let branch = branch.trim();
        if branch.is_empty() || branch == "HEAD" {
            return Err(VcsError::DetachedHead);
        }
        Ok(branch.to_string())
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        let refspec = format!("+refs/heads/{branch}:refs/remotes/{remote}/{branch}");
        self.run(&["fetch", remote, refspec.as_str()]).map(|_| ())
    }

    fn checkout(&self, branch: &str) -> Result<(), VcsError> {
        // Trailing `--` keeps git from reading the name as a path.
        self.run(&["checkout", branch, "--"]).map(|_| ())
    }

    fn reset_hard(&self, reference: &str) -> Result<(), VcsError> {
        self.run(&["reset", "--hard", reference]).map(|_| ())
    }

    fn diff_names(
        &self,
        base: &str,
        head: &str,
        pathspecs: &[String],
    ) -> Result<Vec<String>, VcsError> {
        // Unquoted, NUL-separated output keeps non-ASCII and space-padded paths intact.
        let mut args = vec![
            "-c",
            "core.quotePath=false",
            "diff",
            "--name-only",
            "-z",
            base,
            head,
        ];
        if !pathspecs.is_empty() {
            args.push("--");
            args.extend(pathspecs.iter().map(String::as_str));
        }

        let stdout = self.run(&args)?;
        Ok(stdout
            .split('\0')
            .filter(|path| !path.is_empty())
            .map(str::to_string)
            .collect())
    }
}
