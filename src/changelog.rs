use std::sync::LazyLock;

use anyhow::Context;
use log::{debug, info, warn};
use regex::Regex;

use crate::{client::GitHub, github::PullRequest};

/// What the pull request merge button writes into the merge commit.
pub const MERGE_COMMIT_PATTERN: &str = r"Merge pull request #(\d+) ";

static MERGE_COMMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MERGE_COMMIT_PATTERN).expect("merge commit pattern is valid"));

/// Pull request numbers referenced by merge commits, in the order of `messages`.
///
/// Repeated numbers are kept.
pub fn pull_request_ids<'a>(messages: impl IntoIterator<Item = &'a str>) -> Vec<u64> {
    messages
        .into_iter()
        .filter_map(|message| MERGE_COMMIT.captures(message))
        .filter_map(|captures| {
            let digits = &captures[1];
            match digits.parse::<u64>() {
                Ok(id) => Some(id),
                Err(err) => {
                    warn!("⚠️ Skipping merge commit for pull request #{digits}: {err}");
                    None
                }
            }
        })
        .collect()
}

pub fn format_entry(pull_request: &PullRequest) -> String {
    format!(
        " - {} - #{} via @{}",
        pull_request.title, pull_request.number, pull_request.user.login
    )
}

/// One line per pull request merged between the latest published release and `head`.
pub async fn build_changelog(client: &GitHub, head: &str) -> anyhow::Result<Vec<String>> {
    let latest = client.latest_release().await?;
    info!(
        "✅ Comparing '{}' against latest published release '{}'",
        head, latest.tag_name
    );

    let comparison = client.compare(&latest.tag_name, head).await?;
    debug!("{} commits since {}", comparison.commits.len(), latest.tag_name);

    let ids = pull_request_ids(comparison.commits.iter().map(|c| c.commit.message.as_str()));

    let mut entries = Vec::with_capacity(ids.len());
    for id in ids {
        let pull_request = client
            .pull_request(id)
            .await
            .with_context(|| format!("building changelog entry for #{id}"))?;
        entries.push(format_entry(&pull_request));
    }

    Ok(entries)
}
