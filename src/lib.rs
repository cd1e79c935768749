use log::{info, warn};
use semver::Version;

pub mod build_status;
pub mod changelog;
pub mod checksum;
pub mod client;
pub mod config;
pub mod error;
pub mod github;
pub mod notes;

pub use client::GitHub;
pub use config::{Args, Settings};
pub use error::Error;

use crate::{
    build_status::report_build_status,
    changelog::build_changelog,
    checksum::collect_checksums,
    config::TOKEN_ENV_VAR,
    github::ReleaseUpdate,
    notes::{release_body, release_title, version_from_tag},
};

/// Grants everything `public_repo` does and more.
const FULL_REPO_SCOPE: &str = "repo";

pub fn get_error_chain(err: &anyhow::Error) -> String {
    err.chain()
        .rev()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" => ")
}

/// Whether a comma separated `x-oauth-scopes` list grants `required`.
pub fn has_scope(scopes: &str, required: &str) -> bool {
    scopes
        .split(',')
        .map(str::trim)
        .any(|s| s == required || s == FULL_REPO_SCOPE)
}

/// How a run ended, when it did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    MissingToken,
    MissingScope,
    NoReleases,
    NotDraft { tag_name: String },
    Incomplete { found: usize, expected: usize },
    DryRun { title: String, body: String },
    Updated { html_url: String },
}

/// Checks that the newest draft release is complete and writes its release notes.
///
/// Unmet preconditions are logged and reported through [`Outcome`]; only failures talking
/// to the tracker are returned as errors.
pub async fn run(settings: &Settings) -> anyhow::Result<Outcome> {
    let Some(token) = settings.token.as_deref() else {
        info!("🔴 No {TOKEN_ENV_VAR} environment variable set");
        return Ok(Outcome::MissingToken);
    };

    let client = GitHub::new(
        &settings.api_url,
        &settings.owner,
        &settings.repo,
        token,
        &settings.user_agent,
    )?;

    let (user, scopes) = client.current_user().await?;
    info!("✅ Token found for {}", user.login);

    // fine-grained tokens don't report scopes at all
    if let Some(scopes) = scopes.as_deref() {
        if !has_scope(scopes, &settings.required_scope) {
            info!(
                "🔴 Found {TOKEN_ENV_VAR} does not have required scope '{}' which is required to read draft releases on {}/{}",
                settings.required_scope, settings.owner, settings.repo
            );
            return Ok(Outcome::MissingScope);
        }
    }
    info!(
        "✅ Token has '{}' scope to make changes to releases",
        settings.required_scope
    );

    let Some(release) = client.newest_release().await? else {
        info!("🔴 {}/{} has no releases", settings.owner, settings.repo);
        return Ok(Outcome::NoReleases);
    };
    let tag_name = release.tag_name.as_str();

    if !release.draft {
        info!("🔴 Latest published release '{tag_name}' is not a draft");
        return Ok(Outcome::NotDraft {
            tag_name: release.tag_name.clone(),
        });
    }
    info!("✅ Newest release '{tag_name}' is a draft");

    let assets = client.release_assets(release.id).await?;
    if assets.len() != settings.expected_assets {
        info!(
            "🔴 Draft has {} assets, expecting {}. This means the build agents are probably still going...",
            assets.len(),
            settings.expected_assets
        );
        report_build_status(
            &client,
            tag_name,
            &settings.ci_context,
            &settings.project_url(),
        )
        .await;
        return Ok(Outcome::Incomplete {
            found: assets.len(),
            expected: settings.expected_assets,
        });
    }
    info!("✅ All agents have finished and uploaded artefacts");

    let checksums = collect_checksums(&client, &assets).await?;
    let changelog = build_changelog(&client, tag_name).await?;

    let body = release_body(&changelog, &checksums);
    let title = release_title(&settings.product_label, tag_name);
    if Version::parse(version_from_tag(tag_name)).is_err() {
        warn!("⚠️ '{tag_name}' is not a semantic version, the title will be '{title}'");
    }

    if settings.dry_run {
        info!("✅ Would update draft '{tag_name}' with title '{title}' and body:\n{body}");
        return Ok(Outcome::DryRun { title, body });
    }

    let updated = client
        .update_release(
            release.id,
            &ReleaseUpdate {
                tag_name,
                name: &title,
                body: &body,
            },
        )
        .await?;

    info!("✅ Draft for release {tag_name} updated with changelog and artifacts");
    info!("");
    info!(
        "💚 Please review draft release and publish: {}",
        updated.html_url
    );

    Ok(Outcome::Updated {
        html_url: updated.html_url,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("public_repo", true)]
    #[case("read:org, public_repo, gist", true)]
    #[case("repo, workflow", true)]
    #[case("", false)]
    #[case("read:org, gist", false)]
    #[case("public_repo_extra", false)]
    fn scopes(#[case] scope_list: &str, #[case] granted: bool) {
        assert_eq!(has_scope(scope_list, "public_repo"), granted);
    }

    #[test]
    fn error_chain_reads_outermost_last() {
        let err = anyhow::anyhow!("connection reset").context("listing releases");
        assert_eq!(get_error_chain(&err), "connection reset => listing releases");
    }
}
