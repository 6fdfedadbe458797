use anyhow::{Context, Result};
use packup_cluster::{ClusterContext, Kubectl, PackageCatalog};
use packup_core::{Platform, UpgradeRequest, UpgradeScope, VersionToken, DEFAULT_REPOSITORY_BASE};
use packup_installer::{plan_upgrades, UpgradeEnv};
use packup_resolver::ReqwestFetcher;

use crate::config::PackupConfig;
use crate::render::{
    current_output_style, format_package_list_lines, format_plan_entry_lines,
    render_section_header, render_status_line, UpgradeProgress, UpgradeTally,
};

const DEFAULT_DOMAIN: &str = "vagrant.f8";
const DEFAULT_NAMESPACE: &str = "default";

pub(crate) const MISSING_UPGRADE_SCOPE: &str = "Either specify the names of packages to upgrade or use the `--all` command flag to upgrade all packages";

/// Command-line values that the configuration file may also provide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct GlobalOverrides {
    pub(crate) kubectl: Option<String>,
    pub(crate) namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UpgradeOptions {
    pub(crate) names: Vec<String>,
    pub(crate) all: bool,
    pub(crate) version: VersionToken,
    pub(crate) domain: Option<String>,
    pub(crate) api_server: Option<String>,
    pub(crate) persist_volumes: bool,
}

pub(crate) fn upgrade_scope(names: &[String], all: bool) -> Option<UpgradeScope> {
    if all {
        return Some(UpgradeScope::All);
    }
    if names.is_empty() {
        return None;
    }
    Some(UpgradeScope::named(names.iter().cloned()))
}

pub(crate) fn kubectl_for(overrides: &GlobalOverrides, config: &PackupConfig) -> Kubectl {
    let program = overrides
        .kubectl
        .clone()
        .or_else(|| config.kubectl.clone())
        .unwrap_or_else(|| "kubectl".to_string());
    Kubectl::new(program)
}

pub(crate) fn resolve_namespace(
    overrides: &GlobalOverrides,
    config: &PackupConfig,
    context: &ClusterContext,
) -> String {
    [
        overrides.namespace.as_deref(),
        config.namespace.as_deref(),
        context.namespace.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find(|value| !value.trim().is_empty())
    .unwrap_or(DEFAULT_NAMESPACE)
    .to_string()
}

/// Flag or `KUBERNETES_DOMAIN`, then the config file, then the minishift `xip.io`
/// domain, then `vagrant.f8`.
pub(crate) fn resolve_domain(
    flag: Option<&str>,
    config: &PackupConfig,
    context: &ClusterContext,
    platform: Platform,
) -> String {
    let explicit = [flag, config.domain.as_deref()]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .map(str::to_string);
    explicit
        .or_else(|| context.minishift_domain(platform))
        .unwrap_or_else(|| DEFAULT_DOMAIN.to_string())
}

pub(crate) fn resolve_api_server(flag: Option<&str>, context: &ClusterContext) -> String {
    flag.filter(|value| !value.trim().is_empty())
        .map(str::to_string)
        .or_else(|| context.api_server_host())
        .unwrap_or_default()
}

fn discover_context(kubectl: &Kubectl) -> ClusterContext {
    ClusterContext::discover(kubectl).unwrap_or_else(|err| {
        tracing::warn!("could not read the current kubeconfig context: {err:#}");
        ClusterContext::default()
    })
}

pub(crate) fn run_upgrade_command(
    overrides: &GlobalOverrides,
    config: &PackupConfig,
    options: UpgradeOptions,
) -> Result<()> {
    let output_style = current_output_style();
    let Some(scope) = upgrade_scope(&options.names, options.all) else {
        println!("{}", render_status_line(output_style, "err", MISSING_UPGRADE_SCOPE));
        return Ok(());
    };

    let kubectl = kubectl_for(overrides, config);
    let platform = ClusterContext::detect_platform(&kubectl)?;
    let context = discover_context(&kubectl);

    let request = UpgradeRequest {
        scope,
        requested_version: options.version,
        platform,
        domain: resolve_domain(options.domain.as_deref(), config, &context, platform),
        namespace: resolve_namespace(overrides, config, &context),
        api_server: resolve_api_server(options.api_server.as_deref(), &context),
        persist_volumes: options.persist_volumes,
    };
    tracing::debug!(?request, "upgrade request");

    println!(
        "{}",
        render_section_header(
            output_style,
            &format!(
                "Checking packages for upgrade in your {} installation at {} in namespace {}",
                platform.as_str(),
                context.server.as_deref().unwrap_or("unknown server"),
                request.namespace
            ),
        )
    );

    let fetcher = ReqwestFetcher::new()?;
    let env = UpgradeEnv {
        catalog: &kubectl,
        fetcher: &fetcher,
        applier: &kubectl,
        repository_base: config
            .repository_base
            .as_deref()
            .unwrap_or(DEFAULT_REPOSITORY_BASE),
    };

    let progress = UpgradeProgress::start(output_style, "upgrade");
    let mut tally = UpgradeTally::default();
    let result = plan_upgrades(&env, &request, |entry| {
        tally.record(&entry);
        progress.print_lines(&format_plan_entry_lines(&entry, output_style));
    });
    progress.finish();
    result?;

    println!("{}", tally.summary_line(output_style));
    Ok(())
}

pub(crate) fn run_list_command(overrides: &GlobalOverrides, config: &PackupConfig) -> Result<()> {
    let kubectl = kubectl_for(overrides, config);
    let context = discover_context(&kubectl);
    let namespace = resolve_namespace(overrides, config, &context);

    let records: Vec<_> = kubectl
        .list_packages(&namespace)
        .with_context(|| format!("failed to load packages in namespace {namespace}"))?
        .collect();
    if records.is_empty() {
        println!("No packages found in namespace {namespace}");
        return Ok(());
    }
    for line in format_package_list_lines(&records) {
        println!("{line}");
    }
    Ok(())
}
