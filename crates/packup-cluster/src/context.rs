use anyhow::{Context, Result};
use packup_core::Platform;
use serde::Deserialize;
use url::{Host, Url};

use crate::Kubectl;

/// What the active kubeconfig context says about the target cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterContext {
    pub context_name: Option<String>,
    pub namespace: Option<String>,
    pub server: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConfigView {
    #[serde(rename = "current-context", default)]
    current_context: Option<String>,
    #[serde(default)]
    contexts: Vec<NamedContext>,
    #[serde(default)]
    clusters: Vec<NamedCluster>,
}

#[derive(Debug, Deserialize)]
struct NamedContext {
    name: String,
    #[serde(default)]
    context: Option<ContextEntry>,
}

#[derive(Debug, Deserialize)]
struct ContextEntry {
    #[serde(default)]
    namespace: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedCluster {
    #[serde(default)]
    cluster: Option<ClusterEntry>,
}

#[derive(Debug, Deserialize)]
struct ClusterEntry {
    #[serde(default)]
    server: Option<String>,
}

impl ClusterContext {
    pub fn discover(kubectl: &Kubectl) -> Result<Self> {
        let output = kubectl.run(&["config", "view", "--minify", "--output", "json"])?;
        Self::from_config_view(&output)
    }

    pub fn from_config_view(json: &[u8]) -> Result<Self> {
        let view: ConfigView =
            serde_json::from_slice(json).context("failed to parse kubeconfig view")?;

        let namespace = view
            .contexts
            .iter()
            .find(|entry| Some(&entry.name) == view.current_context.as_ref())
            .or_else(|| view.contexts.first())
            .and_then(|entry| entry.context.as_ref())
            .and_then(|context| context.namespace.clone())
            .filter(|ns| !ns.is_empty());
        let server = view
            .clusters
            .into_iter()
            .find_map(|entry| entry.cluster.and_then(|cluster| cluster.server))
            .filter(|server| !server.is_empty());

        Ok(Self {
            context_name: view.current_context.filter(|name| !name.is_empty()),
            namespace,
            server,
        })
    }

    pub fn detect_platform(kubectl: &Kubectl) -> Result<Platform> {
        let output = kubectl
            .run(&["api-versions"])
            .context("failed to detect cluster platform")?;
        Ok(platform_from_api_versions(&String::from_utf8_lossy(
            &output,
        )))
    }

    /// `host[:port]` of the API server, used as the default `APISERVER` template parameter.
    ///
    /// The authority is taken as written, so an explicit default port such as `:443` is kept.
    pub fn api_server_host(&self) -> Option<String> {
        let server = self.server.as_deref()?;
        Url::parse(server).ok()?.host_str()?;
        let authority = server.split_once("://").map_or(server, |(_, rest)| rest);
        let authority = authority
            .split(['/', '?', '#'])
            .next()
            .unwrap_or(authority);
        let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
        Some(authority.to_string())
    }

    /// A local minishift cluster has no wildcard DNS, so routes go through `<ip>.xip.io`.
    pub fn minishift_domain(&self, platform: Platform) -> Option<String> {
        if platform != Platform::OpenShift {
            return None;
        }
        if !self
            .context_name
            .as_deref()
            .is_some_and(|name| name.contains("minishift"))
        {
            return None;
        }

        let url = Url::parse(self.server.as_deref()?).ok()?;
        match url.host()? {
            Host::Ipv4(ip) => Some(format!("{ip}.xip.io")),
            Host::Ipv6(_) | Host::Domain(_) => None,
        }
    }
}

/// Any `*.openshift.io` API group marks the cluster as OpenShift.
pub fn platform_from_api_versions(api_versions: &str) -> Platform {
    let openshift = api_versions.lines().any(|line| {
        let group = line.trim().split('/').next().unwrap_or_default();
        group == "openshift.io" || group.ends_with(".openshift.io")
    });
    if openshift {
        Platform::OpenShift
    } else {
        Platform::Kubernetes
    }
}
