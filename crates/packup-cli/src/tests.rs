use std::path::PathBuf;

use clap::error::ErrorKind;
use packup_cluster::ClusterContext;
use packup_core::{
    PackageOutcome, PackageRecord, Platform, PlanEntry, SkipReason, UpgradeError, UpgradeOutcome,
    UpgradeScope,
};

use super::*;
use crate::config::default_config_path;
use crate::flows::{
    kubectl_for, resolve_api_server, resolve_domain, resolve_namespace, upgrade_scope,
};
use crate::render::{
    format_package_list_lines, format_plan_entry_lines, output_style_for, render_status_line,
    OutputStyle, UpgradeTally,
};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("arguments must parse")
}

fn upgrade_args(cli: Cli) -> UpgradeArgs {
    match cli.command {
        Commands::Upgrade(args) => args,
        other => panic!("unexpected command: {other:?}"),
    }
}

fn minishift_context() -> ClusterContext {
    ClusterContext {
        context_name: Some("minishift".to_string()),
        namespace: Some("myproject".to_string()),
        server: Some("https://192.168.64.2:8443".to_string()),
    }
}

#[test]
fn upgrade_defaults_to_latest_with_persistent_volumes() {
    let args = upgrade_args(parse(&["packup", "upgrade", "fabric8-console"]));

    assert_eq!(args.names, ["fabric8-console"]);
    assert!(!args.all);
    assert_eq!(args.version, VersionToken::Latest);
    assert!(args.persist_volumes);
    assert_eq!(args.api_server, None);
}

#[test]
fn upgrade_accepts_explicit_version_and_pv_toggle() {
    let args = upgrade_args(parse(&[
        "packup",
        "upgrade",
        "--all",
        "--version",
        "2.2.19",
        "--pv",
        "false",
        "--api-server",
        "api.example.test:8443",
        "-d",
        "apps.example.test",
    ]));

    assert!(args.all);
    assert_eq!(args.version, VersionToken::Explicit("2.2.19".to_string()));
    assert!(!args.persist_volumes);
    assert_eq!(args.api_server.as_deref(), Some("api.example.test:8443"));
    assert_eq!(args.domain.as_deref(), Some("apps.example.test"));
}

#[test]
fn upgrade_rejects_empty_version() {
    let err = Cli::try_parse_from(["packup", "upgrade", "--all", "--version", ""])
        .expect_err("empty version must be rejected");
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn global_namespace_flag_is_accepted_after_subcommand() {
    let cli = parse(&["packup", "upgrade", "console", "-n", "team-a", "--kubectl", "oc"]);
    assert_eq!(cli.namespace.as_deref(), Some("team-a"));
    assert_eq!(cli.kubectl.as_deref(), Some("oc"));
}

#[test]
fn completions_command_generates_script() {
    let mut output = Vec::new();
    write_completions_script(Shell::Bash, &mut output).expect("must write completions");
    let script = String::from_utf8(output).expect("script must be utf-8");
    assert!(script.contains("packup"));
    assert!(script.contains("upgrade"));
}

#[test]
fn upgrade_scope_prefers_all_flag() {
    let names = vec!["console".to_string()];
    assert_eq!(upgrade_scope(&names, true), Some(UpgradeScope::All));
    assert_eq!(
        upgrade_scope(&names, false),
        Some(UpgradeScope::Named(vec!["console".to_string()]))
    );
    assert_eq!(upgrade_scope(&[], false), None);
}

#[test]
fn namespace_resolution_prefers_flag_then_config_then_context() {
    let context = minishift_context();
    let mut config = PackupConfig::default();
    let mut overrides = GlobalOverrides::default();

    assert_eq!(resolve_namespace(&overrides, &config, &context), "myproject");
    config.namespace = Some("from-config".to_string());
    assert_eq!(resolve_namespace(&overrides, &config, &context), "from-config");
    overrides.namespace = Some("from-flag".to_string());
    assert_eq!(resolve_namespace(&overrides, &config, &context), "from-flag");

    assert_eq!(
        resolve_namespace(
            &GlobalOverrides::default(),
            &PackupConfig::default(),
            &ClusterContext::default()
        ),
        "default"
    );
}

#[test]
fn domain_resolution_uses_minishift_xip_only_without_explicit_domain() {
    let context = minishift_context();
    let config = PackupConfig::default();

    assert_eq!(
        resolve_domain(None, &config, &context, Platform::OpenShift),
        "192.168.64.2.xip.io"
    );
    assert_eq!(
        resolve_domain(None, &config, &context, Platform::Kubernetes),
        "vagrant.f8"
    );
    assert_eq!(
        resolve_domain(Some("apps.example.test"), &config, &context, Platform::OpenShift),
        "apps.example.test"
    );
}

#[test]
fn api_server_defaults_to_kubeconfig_host() {
    let context = minishift_context();
    assert_eq!(resolve_api_server(None, &context), "192.168.64.2:8443");
    assert_eq!(resolve_api_server(Some(""), &context), "192.168.64.2:8443");
    assert_eq!(
        resolve_api_server(Some("api.example.test"), &context),
        "api.example.test"
    );
    assert_eq!(resolve_api_server(None, &ClusterContext::default()), "");
}

#[test]
fn kubectl_binary_prefers_flag_over_config() {
    let config = PackupConfig {
        kubectl: Some("oc".to_string()),
        ..PackupConfig::default()
    };
    assert_eq!(kubectl_for(&GlobalOverrides::default(), &config).program(), "oc");
    let overrides = GlobalOverrides {
        kubectl: Some("/usr/local/bin/kubectl".to_string()),
        namespace: None,
    };
    assert_eq!(
        kubectl_for(&overrides, &config).program(),
        "/usr/local/bin/kubectl"
    );
    assert_eq!(
        kubectl_for(&GlobalOverrides::default(), &PackupConfig::default()).program(),
        "kubectl"
    );
}

#[test]
fn config_parses_known_keys() {
    let config = PackupConfig::from_toml_str(
        r#"
repository_base = "https://nexus.example.test/repository/maven-public/"
kubectl = "oc"
namespace = "fabric8"
domain = "apps.example.test"
"#,
    )
    .expect("config must parse");

    assert_eq!(
        config.repository_base.as_deref(),
        Some("https://nexus.example.test/repository/maven-public/")
    );
    assert_eq!(config.kubectl.as_deref(), Some("oc"));
    assert_eq!(config.namespace.as_deref(), Some("fabric8"));
    assert_eq!(config.domain.as_deref(), Some("apps.example.test"));
}

#[test]
fn config_rejects_unknown_keys() {
    let err = PackupConfig::from_toml_str("registry = \"x\"").expect_err("unknown key must fail");
    assert!(err.to_string().contains("failed to parse packup config"));
}

#[test]
fn config_load_reports_missing_explicit_file() {
    let path = PathBuf::from("/nonexistent/packup/config.toml");
    let err = PackupConfig::load(Some(&path)).expect_err("missing explicit config must fail");
    assert!(err.to_string().contains("failed to read config"));
}

#[test]
fn default_config_path_follows_platform_conventions() {
    assert_eq!(
        default_config_path(Some("/xdg"), Some("/home/u"), None, false),
        Some(PathBuf::from("/xdg/packup/config.toml"))
    );
    assert_eq!(
        default_config_path(None, Some("/home/u"), None, false),
        Some(PathBuf::from("/home/u/.config/packup/config.toml"))
    );
    assert_eq!(
        default_config_path(Some("/xdg"), None, Some("C:\\Users\\u\\AppData"), true),
        Some(PathBuf::from("C:\\Users\\u\\AppData").join("packup").join("config.toml"))
    );
    assert_eq!(default_config_path(Some(""), None, None, false), None);
}

#[test]
fn output_style_is_plain_off_terminal_or_with_no_color() {
    assert_eq!(output_style_for(true, None), OutputStyle::Rich);
    assert_eq!(output_style_for(true, Some("")), OutputStyle::Rich);
    assert_eq!(output_style_for(true, Some("1")), OutputStyle::Plain);
    assert_eq!(output_style_for(false, None), OutputStyle::Plain);
}

#[test]
fn render_status_line_plain_is_unadorned() {
    assert_eq!(
        render_status_line(OutputStyle::Plain, "ok", "upgraded package console from 1 to 2"),
        "upgraded package console from 1 to 2"
    );
}

#[test]
fn render_status_line_rich_includes_ascii_badge() {
    assert_eq!(
        render_status_line(OutputStyle::Rich, "err", "package console failed"),
        "[ERR] package console failed"
    );
}

#[test]
fn plan_entries_render_one_line_per_outcome() {
    let render = |outcome: UpgradeOutcome| {
        format_plan_entry_lines(
            &PlanEntry::Package(PackageOutcome::new("console", outcome)),
            OutputStyle::Rich,
        )
    };

    assert_eq!(
        render(UpgradeOutcome::AlreadyCurrent {
            version: "2.2.19".to_string()
        }),
        ["[..] package console is already on version: 2.2.19"]
    );
    assert_eq!(
        render(UpgradeOutcome::Upgraded {
            from: None,
            to: "2.2.20".to_string()
        }),
        ["[OK] upgraded package console from none to 2.2.20"]
    );
    assert_eq!(
        render(UpgradeOutcome::Skipped(SkipReason::MissingMetadata {
            key: "metadata-url"
        })),
        ["[WARN] invalid package console: missing the `metadata-url` data"]
    );
    assert_eq!(
        render(UpgradeOutcome::Skipped(SkipReason::UnknownPackage)),
        ["[WARN] unknown package name console"]
    );
    assert_eq!(
        render(UpgradeOutcome::Failed(UpgradeError::DownloadError {
            url: "http://x/2.0/kubernetes.yml".to_string(),
            reason: "unexpected HTTP status 404 Not Found".to_string()
        })),
        ["[ERR] package console failed: cannot load YAML package at http://x/2.0/kubernetes.yml: unexpected HTTP status 404 Not Found"]
    );
}

#[test]
fn no_packages_found_suggests_named_packages() {
    let lines = format_plan_entry_lines(&PlanEntry::NoPackagesFound, OutputStyle::Plain);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("No packages found"));
    assert!(lines[1].contains("fabric8-console"));
}

#[test]
fn tally_counts_each_outcome_kind() {
    let mut tally = UpgradeTally::default();
    for outcome in [
        UpgradeOutcome::Upgraded {
            from: None,
            to: "1".to_string(),
        },
        UpgradeOutcome::AlreadyCurrent {
            version: "1".to_string(),
        },
        UpgradeOutcome::Skipped(SkipReason::UnknownPackage),
        UpgradeOutcome::Failed(UpgradeError::ApplyError {
            package: "a".to_string(),
            reason: "forbidden".to_string(),
        }),
    ] {
        tally.record(&PlanEntry::Package(PackageOutcome::new("a", outcome)));
    }
    tally.record(&PlanEntry::NoPackagesFound);

    assert_eq!(
        tally,
        UpgradeTally {
            upgraded: 1,
            current: 1,
            skipped: 1,
            failed: 1,
        }
    );
    assert_eq!(
        tally.summary_line(OutputStyle::Rich),
        "[WARN] upgraded=1 current=1 skipped=1 failed=1"
    );
}

#[test]
fn package_list_marks_invalid_records() {
    let records = vec![
        PackageRecord::new("console", "m", "t").with_installed_version("2.2.19"),
        PackageRecord::new("broken", "", "t"),
    ];
    assert_eq!(
        format_package_list_lines(&records),
        [
            "console 2.2.19",
            "broken unknown (invalid: missing the `metadata-url` data)"
        ]
    );
}
