use serde::Deserialize;

/// Coordinates of a pull request on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

/// The slice of the GitHub pull request payload we care about.
#[derive(Debug, Deserialize)]
pub struct PullResponse {
    pub base: BaseRef,
}

/// The branch a pull request merges into.
#[derive(Debug, Deserialize)]
pub struct BaseRef {
    #[serde(rename = "ref")]
    pub name: String,
}
