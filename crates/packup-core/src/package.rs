use crate::SkipReason;

/// Label selector identifying package ConfigMaps.
pub const PACKAGE_SELECTOR: &str = "provider=fabric8.io,kind=package";
pub const METADATA_URL_KEY: &str = "metadata-url";
pub const PACKAGE_URL_PREFIX_KEY: &str = "package-url-prefix";
pub const VERSION_LABEL: &str = "version";

/// Snapshot of one package ConfigMap, taken once per command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub metadata_url: String,
    pub template_url_pattern: String,
    pub installed_version: Option<String>,
}

impl PackageRecord {
    pub fn new(
        name: impl Into<String>,
        metadata_url: impl Into<String>,
        template_url_pattern: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            metadata_url: metadata_url.into(),
            template_url_pattern: template_url_pattern.into(),
            installed_version: None,
        }
    }

    pub fn with_installed_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.installed_version = if version.is_empty() {
            None
        } else {
            Some(version)
        };
        self
    }

    /// Returns the reason this record cannot be upgraded, if any.
    ///
    /// The manifest URL is checked before the template prefix so the reported key is stable.
    pub fn missing_metadata(&self) -> Option<SkipReason> {
        if self.metadata_url.trim().is_empty() {
            return Some(SkipReason::MissingMetadata {
                key: METADATA_URL_KEY,
            });
        }
        if self.template_url_pattern.trim().is_empty() {
            return Some(SkipReason::MissingMetadata {
                key: PACKAGE_URL_PREFIX_KEY,
            });
        }
        None
    }

    /// Plain string equality; an absent label never matches.
    pub fn is_installed_at(&self, version: &str) -> bool {
        self.installed_version.as_deref() == Some(version)
    }
}
