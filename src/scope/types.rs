pub const PULL_REQUEST_VAR: &str = "CIRCLE_PULL_REQUEST";
pub const BRANCH_VAR: &str = "CIRCLE_BRANCH";
pub const OWNER_VAR: &str = "CIRCLE_PROJECT_USERNAME";
pub const REPO_VAR: &str = "CIRCLE_PROJECT_REPONAME";
pub const TOKEN_VAR: &str = "GITHUB_TOKEN";

/// What the CI environment tells us about the current build.
/// Built once at startup and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildContext {
    /// Pull request URL or identifier; absent for plain branch builds.
    pub pull_request: Option<String>,
    /// Branch being built.
    pub branch: Option<String>,
    /// Repository owner (user or organisation).
    pub owner: Option<String>,
    /// Repository name.
    pub repo: Option<String>,
    /// API access token.
    pub token: Option<String>,
}

impl BuildContext {
    /// Read the CircleCI build variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Self {
            pull_request: get(PULL_REQUEST_VAR),
            branch: get(BRANCH_VAR),
            owner: get(OWNER_VAR),
            repo: get(REPO_VAR),
            token: get(TOKEN_VAR),
        }
    }
}

/// Result of a resolver run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The build is not for a pull request; nothing to check.
    NotAPullRequest,
    /// The pull request touches no matching files.
    NoChangedFiles { target: String },
    /// Matching files that differ from the target branch, in git's order.
    Changed { target: String, files: Vec<String> },
}

impl Outcome {
    pub fn files(&self) -> &[String] {
        match self {
            Outcome::Changed { files, .. } => files,
            _ => &[],
        }
    }
}
