use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    /// Listing package ConfigMaps failed; fatal for the whole run.
    #[error("failed to load packages in namespace {namespace}: {reason}")]
    CatalogUnreachable { namespace: String, reason: String },

    #[error("cannot load version manifest at {url}: {reason}")]
    ManifestUnreachable { url: String, reason: String },

    #[error("version manifest at {url} is malformed: {reason}")]
    ManifestMalformed { url: String, reason: String },

    #[error("cannot load YAML package at {url}: {reason}")]
    DownloadError { url: String, reason: String },

    #[error("failed to apply package {package}: {reason}")]
    ApplyError { package: String, reason: String },
}

impl UpgradeError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CatalogUnreachable { .. })
    }
}
