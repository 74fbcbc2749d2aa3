pub mod types;

pub use types::{BuildContext, Outcome};

use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::pr::{self, HttpClient, PrError, PullRef};
use crate::vcs::{VcsError, VersionControl};

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Build context is incomplete: {0} is not set")]
    MissingContext(&'static str),

    #[error(transparent)]
    PullRequest(#[from] PrError),

    #[error("Version control failure: {0}")]
    VersionControl(#[from] VcsError),
}

/// Work out which files the pull request behind `ctx` changes against its
/// target branch.
///
/// Leaves the working copy checked out on the build branch. The local
/// target branch is hard-reset to its remote-tracking branch on the way.
#[instrument(skip_all, fields(pr = ctx.pull_request.as_deref().unwrap_or("")))]
pub async fn resolve(
    ctx: &BuildContext,
    config: &Config,
    http: &dyn HttpClient,
    vcs: &dyn VersionControl,
) -> Result<Outcome, ScopeError> {
    let Some(identifier) = ctx.pull_request.as_deref() else {
        info!("build is not for a pull request");
        return Ok(Outcome::NotAPullRequest);
    };

    let number = pr::parse_pr_number(identifier)?;
    let pull = PullRef {
        owner: ctx
            .owner
            .clone()
            .ok_or(ScopeError::MissingContext(types::OWNER_VAR))?,
        repo: ctx
            .repo
            .clone()
            .ok_or(ScopeError::MissingContext(types::REPO_VAR))?,
        number,
    };
    let branch = match &ctx.branch {
        Some(branch) => branch.clone(),
        None => {
            let branch = vcs.current_branch()?;
            debug!(branch = %branch, "{} unset, using checked-out branch", types::BRANCH_VAR);
            branch
        }
    };
    info!(owner = %pull.owner, repo = %pull.repo, pr = pull.number, branch = %branch, "resolving pull request scope");

    let token = config.github_token(ctx.token.as_deref());
    let target = pr::fetch_target_branch(http, &config.github.api_url, &pull, token).await?;

    sync_target_branch(vcs, &config.scope.remote, &target, &branch, config.scope.fetch)?;

    let extensions = config.scope.normalized_extensions();
    let changed = vcs.diff_names(&target, &branch, &config.scope.pathspecs())?;
    debug!(reported = changed.len(), "git diff complete");
    let files = filter_by_extension(changed, &extensions);

    if files.is_empty() {
        info!(target = %target, "no matching files changed");
        return Ok(Outcome::NoChangedFiles { target });
    }

    info!(target = %target, files = files.len(), "changed files found");
    Ok(Outcome::Changed { target, files })
}

/// Bring the local target branch in line with `{remote}/{target}`, then
/// return to `branch`.
///
/// Once the target is checked out, `branch` is restored even if the reset
/// fails; the reset error is reported after the restore.
#[instrument(skip(vcs))]
pub fn sync_target_branch(
    vcs: &dyn VersionControl,
    remote: &str,
    target: &str,
    branch: &str,
    fetch: bool,
) -> Result<(), VcsError> {
    if fetch {
        vcs.fetch(remote, target)?;
    }

    vcs.checkout(target)?;
    let reset = vcs.reset_hard(&format!("{remote}/{target}"));
    let restore = vcs.checkout(branch);
    reset?;
    restore?;

    debug!("target branch synchronized");
    Ok(())
}

/// Keep the paths ending in `.{ext}` for one of `extensions`, preserving
/// order. Multi-dot extensions such as `blade.php` match whole suffixes.
/// An empty `extensions` keeps everything.
pub fn filter_by_extension(files: Vec<String>, extensions: &[String]) -> Vec<String> {
    if extensions.is_empty() {
        return files;
    }
    let suffixes: Vec<String> = extensions.iter().map(|ext| format!(".{ext}")).collect();
    files
        .into_iter()
        .filter(|file| suffixes.iter().any(|suffix| file.ends_with(suffix.as_str())))
        .collect()
}
