pub mod types;

pub use types::PullRef;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument};

use types::PullResponse;

static TRAILING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)$").expect("trailing number pattern is valid"));

#[derive(Debug, Error)]
pub enum PrError {
    #[error("Could not extract a pull request number from {0:?}")]
    IdentifierParse(String),

    #[error("Invalid GitHub API URL: {0}")]
    InvalidApiUrl(String),

    #[error("GitHub API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub API returned HTTP {status} for {path}")]
    Status { status: u16, path: String },

    #[error("Malformed pull request response: {0}")]
    MalformedResponse(String),
}

/// Minimal HTTP seam: the resolver only ever issues a single GET.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch `url` and return the response body. Non-2xx responses are errors.
    async fn get(&self, url: &Url) -> Result<String, PrError>;
}

/// `HttpClient` backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(timeout: Duration) -> Result<Self, PrError> {
        let client = reqwest::Client::builder()
            .user_agent("pr-scope")
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url) -> Result<String, PrError> {
        // The query string carries the token, so errors are stripped of the URL.
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| PrError::Request(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrError::Status {
                status: status.as_u16(),
                path: url.path().to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| PrError::Request(e.without_url()))
    }
}

/// Extract the pull request number from a CI identifier such as
/// `https://github.com/org/repo/pull/482`.
///
/// The identifier must end in a run of digits; a trailing slash or
/// whitespace is tolerated.
pub fn parse_pr_number(identifier: &str) -> Result<u64, PrError> {
    let trimmed = identifier.trim().trim_end_matches('/');
    TRAILING_NUMBER
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<u64>().ok())
        .ok_or_else(|| PrError::IdentifierParse(identifier.to_string()))
}

/// Build `{api_url}/repos/{owner}/{repo}/pulls/{number}`, with the token as
/// the `access_token` query parameter when one is available.
pub fn pull_request_url(
    api_url: &str,
    pull: &PullRef,
    token: Option<&str>,
) -> Result<Url, PrError> {
    let mut url = Url::parse(api_url).map_err(|_| PrError::InvalidApiUrl(api_url.to_string()))?;
    let number = pull.number.to_string();

    url.path_segments_mut()
        .map_err(|()| PrError::InvalidApiUrl(api_url.to_string()))?
        .pop_if_empty()
        .extend(["repos", pull.owner.as_str(), pull.repo.as_str(), "pulls", number.as_str()]);

    if let Some(token) = token {
        url.query_pairs_mut().append_pair("access_token", token);
    }

    Ok(url)
}

/// Pull the target branch name out of a pull request payload.
/// Surrounding quotes and whitespace are stripped.
pub fn parse_target_branch(body: &str) -> Result<String, PrError> {
    let response: PullResponse =
        serde_json::from_str(body).map_err(|e| PrError::MalformedResponse(e.to_string()))?;

    let name = response.base.name.trim().trim_matches('"').trim();
    if name.is_empty() {
        return Err(PrError::MalformedResponse("base.ref is empty".to_string()));
    }

    Ok(name.to_string())
}

/// Ask the GitHub API which branch the pull request merges into.
#[instrument(skip(http, token), fields(owner = %pull.owner, repo = %pull.repo, pr = pull.number))]
pub async fn fetch_target_branch(
    http: &dyn HttpClient,
    api_url: &str,
    pull: &PullRef,
    token: Option<&str>,
) -> Result<String, PrError> {
    let url = pull_request_url(api_url, pull, token)?;
    debug!(path = %url.path(), authenticated = token.is_some(), "requesting pull request");

    let body = http.get(&url).await?;
    debug!(body_bytes = body.len(), "received pull request payload");

    let target = parse_target_branch(&body)?;
    info!(target = %target, "resolved target branch");
    Ok(target)
}
