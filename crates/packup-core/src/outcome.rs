use std::fmt;

use crate::UpgradeError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingMetadata { key: &'static str },
    UnknownPackage,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMetadata { key } => write!(f, "missing the `{key}` data"),
            Self::UnknownPackage => f.write_str("unknown package name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeOutcome {
    AlreadyCurrent { version: String },
    Upgraded { from: Option<String>, to: String },
    Skipped(SkipReason),
    Failed(UpgradeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutcome {
    pub name: String,
    pub outcome: UpgradeOutcome,
}

impl PackageOutcome {
    pub fn new(name: impl Into<String>, outcome: UpgradeOutcome) -> Self {
        Self {
            name: name.into(),
            outcome,
        }
    }
}

/// One reported line of an upgrade run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEntry {
    Package(PackageOutcome),
    /// Reported once when `--all` finds nothing upgradeable.
    NoPackagesFound,
}

impl PlanEntry {
    pub fn package(&self) -> Option<&PackageOutcome> {
        match self {
            Self::Package(outcome) => Some(outcome),
            Self::NoPackagesFound => None,
        }
    }
}
