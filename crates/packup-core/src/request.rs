use std::fmt;

pub const LATEST_TOKEN: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionToken {
    Latest,
    Explicit(String),
}

impl VersionToken {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed == LATEST_TOKEN {
            Self::Latest
        } else {
            Self::Explicit(trimmed.to_string())
        }
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str(LATEST_TOKEN),
            Self::Explicit(version) => f.write_str(version),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Kubernetes,
    OpenShift,
}

impl Platform {
    pub fn template_file_name(self) -> &'static str {
        match self {
            Self::Kubernetes => "kubernetes.yml",
            Self::OpenShift => "openshift.yml",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kubernetes => "Kubernetes",
            Self::OpenShift => "OpenShift",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeScope {
    All,
    /// Requested names in command-line order, without duplicates.
    Named(Vec<String>),
}

impl UpgradeScope {
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self::Named(unique)
    }

    pub fn includes(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(names) => names.iter().any(|candidate| candidate == name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeRequest {
    pub scope: UpgradeScope,
    pub requested_version: VersionToken,
    pub platform: Platform,
    pub domain: String,
    pub namespace: String,
    pub api_server: String,
    pub persist_volumes: bool,
}
