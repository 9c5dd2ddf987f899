//! Cyberith Virtualizer Driver CLI
//!
//! A command-line interface for reading and controlling Cyberith Virtualizer
//! locomotion platforms through the native CybSDK library.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use virt_driver::{exit_code, DeviceOptions, DriverConfig};

// CLI definitions
mod cli;
use cli::{Cli, Commands, ConfigCommands};

// Command handlers
mod commands;
use commands::{CommandResult, Context};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn build_context(cli: &Cli) -> anyhow::Result<Context> {
    let config_path = cli.config.clone().unwrap_or_else(DriverConfig::default_path);
    debug!("Loading config from {:?}", config_path);
    let config = DriverConfig::load(&config_path)?;

    let monitor = commands::create_monitor_config(cli.monitor, cli.filter.as_deref())?;
    let device = DeviceOptions {
        selection: cli.device.unwrap_or(config.device),
        library_path: cli.library.clone().or_else(|| config.library_path.clone()),
        monitor,
    };

    Ok(Context {
        config,
        config_path,
        device,
    })
}

async fn run(cli: Cli) -> CommandResult {
    let ctx = build_context(&cli)?;

    match cli.command {
        // Default: connection check
        None | Some(Commands::Check) => commands::query::check(&ctx),

        // === Query Commands ===
        Some(Commands::Version) => commands::query::version(&ctx),
        Some(Commands::List) => commands::query::list(&ctx),
        Some(Commands::Info { json }) => commands::query::info(&ctx, json),

        // === Live Commands ===
        Some(Commands::Data { count, interval }) => commands::live::data(&ctx, count, interval),
        Some(Commands::Posture {
            count,
            jump,
            crouch,
        }) => commands::live::posture(&ctx, count, jump, crouch),
        Some(Commands::Reset {
            height,
            orientation,
        }) => commands::live::reset(&ctx, height, orientation),
        Some(Commands::Haptic { action }) => commands::haptic::run(&ctx, action),
        Some(Commands::Walker { count, scale, json }) => {
            commands::live::walker(&ctx, count, scale, json)
        }

        // === Network Commands ===
        Some(Commands::Stream {
            target,
            rate,
            duration,
        }) => commands::stream::stream(&ctx, target, rate, duration).await,
        Some(Commands::Listen {
            addr,
            count,
            include_own,
        }) => commands::stream::listen(&ctx, addr, count, include_own).await,

        // === Utility Commands ===
        Some(Commands::Config(ConfigCommands::Show)) => commands::utility::config_show(&ctx),
        Some(Commands::Config(ConfigCommands::Init { force })) => {
            commands::utility::config_init(&ctx, force)
        }
    }
}
