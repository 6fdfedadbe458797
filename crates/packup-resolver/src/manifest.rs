use anyhow::{anyhow, Context, Result};
use semver::Version;
use serde::Deserialize;

/// The subset of a Maven `maven-metadata.xml` document needed to pick a version.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct MavenMetadata {
    pub versioning: Option<Versioning>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Versioning {
    pub latest: Option<String>,
    pub release: Option<String>,
    #[serde(default)]
    pub versions: Versions,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Versions {
    #[serde(default)]
    pub version: Vec<String>,
}

pub fn parse_maven_metadata(body: &[u8]) -> Result<MavenMetadata> {
    let text = std::str::from_utf8(body).context("manifest is not valid UTF-8")?;
    quick_xml::de::from_str(text).context("manifest is not a maven-metadata document")
}

/// Picks the newest published version: `<release>`, then `<latest>`, then the highest
/// semver entry of `<versions>` (the last listed entry when none parse as semver).
pub fn newest_version(metadata: &MavenMetadata) -> Result<String> {
    let versioning = metadata
        .versioning
        .as_ref()
        .ok_or_else(|| anyhow!("missing <versioning> element"))?;

    if let Some(release) = non_empty(versioning.release.as_deref()) {
        return Ok(release.to_string());
    }
    if let Some(latest) = non_empty(versioning.latest.as_deref()) {
        return Ok(latest.to_string());
    }

    let listed: Vec<&str> = versioning
        .versions
        .version
        .iter()
        .filter_map(|v| non_empty(Some(v.as_str())))
        .collect();

    let highest = listed
        .iter()
        .filter_map(|raw| Version::parse(raw).ok().map(|parsed| (parsed, *raw)))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, raw)| raw);

    highest
        .or_else(|| listed.last().copied())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("no versions listed under <versioning>"))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
