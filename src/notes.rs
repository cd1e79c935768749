use crate::checksum::ChecksumEntry;

/// The tag without a single leading `v`/`V`.
pub fn version_from_tag(tag: &str) -> &str {
    tag.strip_prefix(&['v', 'V'][..]).unwrap_or(tag)
}

pub fn release_title(product_label: &str, tag: &str) -> String {
    format!("{product_label} {}", version_from_tag(tag))
}

/// Renders the draft body: the changelog followed by the checksum of every artifact.
pub fn release_body(changelog: &[String], checksums: &[ChecksumEntry]) -> String {
    let changelog_text = changelog.join("\n");
    let file_list_text = checksums
        .iter()
        .map(|e| format!("**{}**\n{}\n", e.file_name, e.checksum))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{changelog_text}\n\n## SHA-256 hashes:\n\n{file_list_text}")
}
