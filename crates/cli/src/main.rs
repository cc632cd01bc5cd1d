//! vx - VxSDK command-line client
//!
//! Lists and edits devices, monitors, volumes, rules and users on a video
//! management server.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use vxsdk_client::{ClientConfig, VxClient};

mod commands;
mod output;

use commands::{config, device, limits, monitor, rule, user, volume};

/// VxSDK CLI
#[derive(Parser)]
#[command(name = "vx")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Client configuration file
    #[arg(long, env = "VX_CONFIG", default_value = "vx.toml", global = true)]
    config: PathBuf,

    /// Server base URL, overriding the configuration file
    #[arg(long, env = "VX_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage devices
    #[command(subcommand)]
    Device(device::DeviceCommands),

    /// Manage monitors
    #[command(subcommand)]
    Monitor(monitor::MonitorCommands),

    /// Manage storage volumes
    #[command(subcommand)]
    Volume(volume::VolumeCommands),

    /// Manage rules
    #[command(subcommand)]
    Rule(rule::RuleCommands),

    /// Manage users
    #[command(subcommand)]
    User(user::UserCommands),

    /// Show field limits of a resource
    Limits(limits::LimitsArgs),

    /// System configuration
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Check server status
    Status,

    /// Show version information
    Version,
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    config.apply_env();
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    if let Commands::Version = cli.command {
        println!("vx v{}", env!("CARGO_PKG_VERSION"));
        println!("VxSDK v{}", vxsdk_common::VERSION);
        return Ok(());
    }

    let client_config = load_config(&cli)?;
    let client = VxClient::from_config(&client_config)?;
    let format = cli.format;

    match cli.command {
        Commands::Device(cmd) => device::execute(cmd, client, format).await?,
        Commands::Monitor(cmd) => monitor::execute(cmd, client, format).await?,
        Commands::Volume(cmd) => volume::execute(cmd, client, format).await?,
        Commands::Rule(cmd) => rule::execute(cmd, client, format).await?,
        Commands::User(cmd) => user::execute(cmd, client, format).await?,
        Commands::Limits(args) => limits::execute(args, client, format).await?,
        Commands::Config(cmd) => config::execute(cmd, client, format).await?,
        Commands::Status => match client.health_check().await {
            Ok(status) if status.is_healthy => {
                output::print_success(&format!(
                    "{} {} is running at {}",
                    status.name, status.version, client_config.base_url
                ));
            }
            Ok(status) => {
                output::print_error(&format!("{} reports an unhealthy state", status.name));
                std::process::exit(1);
            }
            Err(e) => {
                output::print_error(&format!("Cannot reach {}: {}", client_config.base_url, e));
                std::process::exit(1);
            }
        },
        Commands::Version => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_base_url_flag_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vx.toml");
        let mut file_config = ClientConfig::default();
        file_config.base_url = "https://file.example.com".to_string();
        file_config.save(&path).unwrap();

        let cli = Cli::try_parse_from([
            "vx",
            "--config",
            path.to_str().unwrap(),
            "--base-url",
            "https://flag.example.com",
            "status",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.base_url, "https://flag.example.com");
    }
}
