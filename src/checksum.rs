use log::debug;

use crate::{client::GitHub, error::Result, github::ReleaseAsset};

pub const CHECKSUM_SUFFIX: &str = ".sha256";

/// A release artifact and the SHA-256 published next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumEntry {
    pub file_name: String,
    pub checksum: String,
}

/// Name of the artifact a checksum asset describes, or `None` if `name` is not a checksum file.
pub fn checksum_target(name: &str) -> Option<&str> {
    name.strip_suffix(CHECKSUM_SUFFIX)
}

/// Downloads every checksum asset, keeping the order of `assets`.
///
/// The first failed download aborts the whole collection.
pub async fn collect_checksums(
    client: &GitHub,
    assets: &[ReleaseAsset],
) -> Result<Vec<ChecksumEntry>> {
    let mut entries = Vec::new();

    for asset in assets {
        let Some(file_name) = checksum_target(&asset.name) else {
            continue;
        };

        debug!("fetching checksum for {file_name}");
        let checksum = client.download_text(&asset.url).await?;
        entries.push(ChecksumEntry {
            file_name: file_name.to_string(),
            checksum,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use mockito::Server;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("git-2.30.0.tar.gz.sha256", Some("git-2.30.0.tar.gz"))]
    #[case("git-2.30.0-arm.lzma.sha256", Some("git-2.30.0-arm.lzma"))]
    #[case(".sha256", Some(""))]
    #[case("git-2.30.0.tar.gz", None)]
    #[case("git.sha256.tar.gz", None)]
    #[case("git.SHA256", None)]
    fn checksum_targets(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(checksum_target(name), expected);
    }

    #[tokio::test]
    async fn only_checksum_assets_are_downloaded_in_order() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/assets/2")
            .with_body("abc123\n")
            .create_async()
            .await;
        let second = server
            .mock("GET", "/assets/4")
            .with_body("def456\n")
            .create_async()
            .await;
        let untouched = server
            .mock("GET", "/assets/1")
            .expect(0)
            .create_async()
            .await;

        let asset = |id: u32, name: &str| ReleaseAsset {
            name: name.to_string(),
            url: format!("{}/assets/{id}", server.url()),
        };
        let assets = vec![
            asset(1, "git-2.30.0.tar.gz"),
            asset(2, "git-2.30.0.tar.gz.sha256"),
            asset(3, "git-2.30.0-arm.tar.gz"),
            asset(4, "git-2.30.0-arm.tar.gz.sha256"),
        ];

        let client = GitHub::new(&server.url(), "o", "r", "t", "ua").unwrap();
        let entries = collect_checksums(&client, &assets).await.unwrap();

        assert_eq!(
            entries,
            vec![
                ChecksumEntry {
                    file_name: "git-2.30.0.tar.gz".to_string(),
                    checksum: "abc123".to_string(),
                },
                ChecksumEntry {
                    file_name: "git-2.30.0-arm.tar.gz".to_string(),
                    checksum: "def456".to_string(),
                },
            ]
        );
        first.assert_async().await;
        second.assert_async().await;
        untouched.assert_async().await;
    }
}
