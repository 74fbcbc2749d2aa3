pub mod git;

pub use git::GitCli;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Failed to run git {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} failed: {stderr}")]
    Failed { command: String, stderr: String },

    #[error("HEAD is detached; cannot determine the build branch")]
    DetachedHead,
}

/// The working-copy operations the resolver needs.
///
/// Every method acts on a single checkout and mutates it in place;
/// callers must treat the working copy as expendable.
pub trait VersionControl: Send + Sync {
    /// Name of the branch currently checked out.
    fn current_branch(&self) -> Result<String, VcsError>;

    /// Update `{remote}/{branch}` from the remote.
    fn fetch(&self, remote: &str, branch: &str) -> Result<(), VcsError>;

    fn checkout(&self, branch: &str) -> Result<(), VcsError>;

    /// Hard-reset the checked-out branch to `reference`, discarding local divergence.
    fn reset_hard(&self, reference: &str) -> Result<(), VcsError>;

    /// Paths that differ between `base` and `head`, limited to `pathspecs`
    /// when any are given, in git's output order.
    fn diff_names(
        &self,
        base: &str,
        head: &str,
        pathspecs: &[String],
    ) -> Result<Vec<String>, VcsError>;
}
