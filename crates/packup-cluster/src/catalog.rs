use std::collections::BTreeMap;

use anyhow::{Context, Result};
use packup_core::{
    PackageRecord, METADATA_URL_KEY, PACKAGE_SELECTOR, PACKAGE_URL_PREFIX_KEY, VERSION_LABEL,
};
use serde::Deserialize;

use crate::Kubectl;

/// Single-pass sequence of package records, in the order the cluster returned them.
pub type PackageRecords = Box<dyn Iterator<Item = PackageRecord>>;

pub trait PackageCatalog {
    fn list_packages(&self, namespace: &str) -> Result<PackageRecords>;
}

#[derive(Debug, Deserialize)]
struct ConfigMapList {
    #[serde(default)]
    items: Vec<ConfigMap>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ConfigMap {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub data: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
}

pub fn record_from_config_map(config_map: ConfigMap) -> PackageRecord {
    let mut data = config_map.data.unwrap_or_default();
    let installed_version = config_map
        .metadata
        .labels
        .and_then(|mut labels| labels.remove(VERSION_LABEL))
        .unwrap_or_default();

    PackageRecord::new(
        config_map.metadata.name,
        data.remove(METADATA_URL_KEY).unwrap_or_default(),
        data.remove(PACKAGE_URL_PREFIX_KEY).unwrap_or_default(),
    )
    .with_installed_version(installed_version)
}

pub fn parse_config_map_list(json: &[u8]) -> Result<PackageRecords> {
    let list: ConfigMapList =
        serde_json::from_slice(json).context("failed to parse ConfigMap list")?;
    Ok(Box::new(list.items.into_iter().map(record_from_config_map)))
}

impl PackageCatalog for Kubectl {
    fn list_packages(&self, namespace: &str) -> Result<PackageRecords> {
        let output = self.run(&[
            "get",
            "configmaps",
            "--namespace",
            namespace,
            "--selector",
            PACKAGE_SELECTOR,
            "--output",
            "json",
        ])?;
        parse_config_map_list(&output)
    }
}
