//! In-memory stand-ins for the HTTP and git seams, shared by unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Url;

use crate::pr::{HttpClient, PrError};
use crate::vcs::{VcsError, VersionControl};

/// Returns a canned body (or HTTP status failure) and records every URL requested.
pub struct FakeHttp {
    body: Result<String, u16>,
    requests: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn responding(body: &str) -> Self {
        Self {
            body: Ok(body.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            body: Err(status),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn get(&self, url: &Url) -> Result<String, PrError> {
        self.requests.lock().unwrap().push(url.to_string());
        match &self.body {
            Ok(body) => Ok(body.clone()),
            Err(status) => Err(PrError::Status {
                status: *status,
                path: url.path().to_string(),
            }),
        }
    }
}

#[derive(Debug, Default)]
struct FakeGitState {
    current: String,
    ops: Vec<String>,
}

/// Tracks the checked-out branch and logs each operation as a short string
/// such as `checkout main` or `reset origin/main`.
pub struct FakeGit {
    state: Mutex<FakeGitState>,
    changed: Vec<String>,
    fail_on: Option<&'static str>,
}

impl FakeGit {
    pub fn on_branch(branch: &str) -> Self {
        Self {
            state: Mutex::new(FakeGitState {
                current: branch.to_string(),
                ops: Vec::new(),
            }),
            changed: Vec::new(),
            fail_on: None,
        }
    }

    /// Paths `diff_names` reports, regardless of pathspec.
    pub fn with_changes(mut self, files: &[&str]) -> Self {
        self.changed = files.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Make the named operation (`fetch`, `checkout`, `reset`, `diff`, `current`) fail.
    pub fn failing_on(mut self, op: &'static str) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn ops(&self) -> Vec<String> {
        self.state.lock().unwrap().ops.clone()
    }

    pub fn current(&self) -> String {
        self.state.lock().unwrap().current.clone()
    }

    fn record(&self, op: &'static str, detail: String) -> Result<(), VcsError> {
        self.state
            .lock()
            .unwrap()
            .ops
            .push(format!("{op} {detail}").trim_end().to_string());
        if self.fail_on == Some(op) {
            return Err(VcsError::Failed {
                command: op.to_string(),
                stderr: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl VersionControl for FakeGit {
    fn current_branch(&self) -> Result<String, VcsError> {
        self.record("current", String::new())?;
        Ok(self.current())
    }

    fn fetch(&self, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.record("fetch", format!("{remote} {branch}"))
    }

    fn checkout(&self, branch: &str) -> Result<(), VcsError> {
        self.record("checkout", branch.to_string())?;
        self.state.lock().unwrap().current = branch.to_string();
        Ok(())
    }

    fn reset_hard(&self, reference: &str) -> Result<(), VcsError> {
        self.record("reset", reference.to_string())
    }

    fn diff_names(
        &self,
        base: &str,
        head: &str,
        _pathspecs: &[String],
    ) -> Result<Vec<String>, VcsError> {
        self.record("diff", format!("{base} {head}"))?;
        Ok(self.changed.clone())
    }
}
