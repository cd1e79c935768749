use clap::Parser;

pub const TOKEN_ENV_VAR: &str = "GITHUB_ACCESS_TOKEN";

// four targeted OS/arch combinations, two files for each, plus a checksum for every file
pub const SUCCESSFUL_RELEASE_FILE_COUNT: usize = 4 * 2 * 2;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_CI_CONTEXT: &str = "continuous-integration/travis-ci/push";

/// Fills in the changelog and checksums of the newest draft release once every build has uploaded its artifacts.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Access token. Needs the `public_repo` scope to see draft releases.
    #[arg(long, env = TOKEN_ENV_VAR, hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, default_value = "desktop")]
    pub owner: String,

    #[arg(long, default_value = "dugite-native")]
    pub repo: String,

    /// Base url of the release tracker's API.
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Number of assets a finished draft carries.
    #[arg(long, default_value_t = SUCCESSFUL_RELEASE_FILE_COUNT)]
    pub expected_assets: usize,

    #[arg(long, default_value = "public_repo")]
    pub required_scope: String,

    /// Commit status context of the build that uploads the artifacts.
    #[arg(long, default_value = DEFAULT_CI_CONTEXT)]
    pub ci_context: String,

    /// Prefix of the release title, followed by the version.
    #[arg(long, default_value = "Git")]
    pub product_label: String,

    #[arg(long, default_value = "dugite-native")]
    pub user_agent: String,

    /// Print the release notes instead of updating the draft.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Enable debug logging.
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

/// Everything a run needs, independent of where it came from.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token: Option<String>,
    pub owner: String,
    pub repo: String,
    pub api_url: String,
    pub expected_assets: usize,
    pub required_scope: String,
    pub ci_context: String,
    pub product_label: String,
    pub user_agent: String,
    pub dry_run: bool,
}

impl Settings {
    /// Where operators should report problems with the build.
    pub fn project_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.repo)
    }
}

impl From<Args> for Settings {
    fn from(args: Args) -> Self {
        Self {
            // an empty variable is as good as none
            token: args.token.filter(|t| !t.trim().is_empty()),
            owner: args.owner,
            repo: args.repo,
            api_url: args.api_url,
            expected_assets: args.expected_assets,
            required_scope: args.required_scope,
            ci_context: args.ci_context,
            product_label: args.product_label,
            user_agent: args.user_agent,
            dry_run: args.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["draft-release-notes", "--token", "abc"]).unwrap();
        let settings = Settings::from(args);

        assert_eq!(settings.token.as_deref(), Some("abc"));
        assert_eq!(settings.expected_assets, 16);
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.project_url(), "https://github.com/desktop/dugite-native");
        assert!(!settings.dry_run);
    }

    #[test]
    fn reports_its_own_version() {
        let version = Args::command().render_version();
        assert_eq!(version, "draft-release-notes 0.1.0\n");
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let args = Args::try_parse_from(["draft-release-notes", "--token", "  "]).unwrap();
        assert_eq!(Settings::from(args).token, None);
    }
}
