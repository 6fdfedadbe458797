mod completion;
mod config;
mod flows;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;
use packup_core::VersionToken;
use tracing_subscriber::EnvFilter;

use crate::completion::write_completions_script;
use crate::config::PackupConfig;
use crate::flows::{run_list_command, run_upgrade_command, GlobalOverrides, UpgradeOptions};

#[derive(Parser, Debug)]
#[command(name = "packup")]
#[command(about = "Upgrades packages installed on a Kubernetes or OpenShift cluster", long_about = None)]
struct Cli {
    /// Configuration file, defaults to `<config dir>/packup/config.toml`
    #[arg(long, global = true, env = "PACKUP_CONFIG")]
    config: Option<PathBuf>,
    /// kubectl binary used to reach the cluster
    #[arg(long, global = true)]
    kubectl: Option<String>,
    /// The namespace to use
    #[arg(short = 'n', long, global = true, env = "KUBERNETES_NAMESPACE")]
    namespace: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upgrades the packages if there is a newer version available
    Upgrade(UpgradeArgs),
    /// Lists the packages installed in the namespace
    List,
    /// Prints a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    Version,
}

#[derive(Args, Debug)]
struct UpgradeArgs {
    /// Names of the packages to upgrade
    names: Vec<String>,
    /// Upgrade all packages
    #[arg(long)]
    all: bool,
    /// The version to upgrade to
    #[arg(long, default_value = "latest", value_parser = parse_version_token)]
    version: VersionToken,
    /// The domain name to append to the service name to access web applications
    #[arg(short = 'd', long, env = "KUBERNETES_DOMAIN")]
    domain: Option<String>,
    /// Overrides the api server url
    #[arg(long)]
    api_server: Option<String>,
    /// If false, deployments use emptyDir volumes and persistence is disabled for core apps
    #[arg(long = "pv", default_value_t = true, action = ArgAction::Set)]
    persist_volumes: bool,
}

fn parse_version_token(value: &str) -> Result<VersionToken, String> {
    if value.trim().is_empty() {
        return Err("version must not be empty".to_string());
    }
    Ok(VersionToken::parse(value))
}

impl From<UpgradeArgs> for UpgradeOptions {
    fn from(args: UpgradeArgs) -> Self {
        Self {
            names: args.names,
            all: args.all,
            version: args.version,
            domain: args.domain,
            api_server: args.api_server,
            persist_volumes: args.persist_volumes,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    run_cli(Cli::parse())
}

fn run_cli(cli: Cli) -> Result<()> {
    let overrides = GlobalOverrides {
        kubectl: cli.kubectl,
        namespace: cli.namespace,
    };

    match cli.command {
        Commands::Upgrade(args) => {
            let config = PackupConfig::load(cli.config.as_deref())?;
            run_upgrade_command(&overrides, &config, args.into())?;
        }
        Commands::List => {
            let config = PackupConfig::load(cli.config.as_deref())?;
            run_list_command(&overrides, &config)?;
        }
        Commands::Completions { shell } => {
            let mut stdout = std::io::stdout();
            write_completions_script(shell, &mut stdout)?;
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
