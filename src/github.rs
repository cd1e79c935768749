use serde::{Deserialize, Serialize};

/// A release's asset. Does not contain all fields.
///
/// `url` is the API endpoint of the asset, which serves the raw file when asked for
/// `application/octet-stream`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub url: String,
}

/// A github release. Does not contain all fields.
///
/// See the github [docs](https://docs.github.com/en/rest/releases/releases?apiVersion=2022-11-28#list-releases) for more information
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    pub id: u64,
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub html_url: String,
}

/// The authenticated user behind a token.
#[derive(Debug, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitStatus {
    pub context: String,
    pub target_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommitDetails {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CompareCommit {
    pub sha: String,
    pub commit: CommitDetails,
}

/// Result of comparing two refs. Does not contain all fields.
#[derive(Debug, Deserialize)]
pub struct Comparison {
    pub commits: Vec<CompareCommit>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub user: User,
}

/// Body of the release update request.
#[derive(Debug, Serialize)]
pub struct ReleaseUpdate<'a> {
    pub tag_name: &'a str,
    pub name: &'a str,
    pub body: &'a str,
}
