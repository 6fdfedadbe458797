use packup_core::{UpgradeError, VersionToken};

use crate::manifest::{newest_version, parse_maven_metadata};
use crate::HttpFetcher;

/// Resolves the version an upgrade should target.
///
/// An explicit token is returned verbatim without contacting `metadata_url`; only
/// `latest` fetches and parses the manifest.
pub fn resolve_version(
    fetcher: &dyn HttpFetcher,
    requested: &VersionToken,
    metadata_url: &str,
) -> Result<String, UpgradeError> {
    let VersionToken::Explicit(version) = requested else {
        return resolve_latest(fetcher, metadata_url);
    };
    Ok(version.clone())
}

fn resolve_latest(fetcher: &dyn HttpFetcher, metadata_url: &str) -> Result<String, UpgradeError> {
    tracing::debug!(metadata_url, "resolving latest version");
    let body = fetcher
        .get(metadata_url)
        .map_err(|err| UpgradeError::ManifestUnreachable {
            url: metadata_url.to_string(),
            reason: format!("{err:#}"),
        })?;

    let malformed = |err: anyhow::Error| UpgradeError::ManifestMalformed {
        url: metadata_url.to_string(),
        reason: format!("{err:#}"),
    };
    let metadata = parse_maven_metadata(&body).map_err(malformed)?;
    let version = newest_version(&metadata).map_err(malformed)?;

    tracing::debug!(metadata_url, %version, "resolved latest version");
    Ok(version)
}
