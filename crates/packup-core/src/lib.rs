mod error;
mod known;
mod outcome;
mod package;
mod request;
mod template_url;

pub use error::UpgradeError;
pub use known::{known_package, KnownPackage, DEFAULT_REPOSITORY_BASE, KNOWN_PACKAGES};
pub use outcome::{PackageOutcome, PlanEntry, SkipReason, UpgradeOutcome};
pub use package::{
    PackageRecord, METADATA_URL_KEY, PACKAGE_SELECTOR, PACKAGE_URL_PREFIX_KEY, VERSION_LABEL,
};
pub use request::{Platform, UpgradeRequest, UpgradeScope, VersionToken};
pub use template_url::{build_template_url, url_join};
