use log::{info, warn};

use crate::{client::GitHub, get_error_chain};

/// Points the operator at the CI build for `git_ref`, if one can be found.
///
/// Never fails: this only runs to explain why a draft is not ready yet.
pub async fn report_build_status(
    client: &GitHub,
    git_ref: &str,
    ci_context: &str,
    project_url: &str,
) {
    let statuses = match client.commit_statuses(git_ref).await {
        Ok(statuses) => statuses,
        Err(err) => {
            let err = anyhow::Error::from(err);
            warn!(
                "👀 Could not look up the build for '{git_ref}': {}",
                get_error_chain(&err)
            );
            return;
        }
    };

    match statuses.iter().find(|s| s.context == ci_context) {
        Some(status) => info!(
            "👀 Follow along with the build here: {}",
            status.target_url.as_deref().unwrap_or("<no target url>")
        ),
        None => {
            let contexts = statuses.iter().map(|s| &s.context).collect::<Vec<_>>();
            let contexts =
                serde_json::to_string(&contexts).unwrap_or_else(|_| format!("{contexts:?}"));
            info!(
                "👀 Uh-oh, I couldn't find the right commit status. Found these contexts: {contexts}"
            );
            info!("Please open an issue against {project_url} so it can be fixed!");
        }
    }
}
