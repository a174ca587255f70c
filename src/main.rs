//! Tailrelay package runner.
//!
//! # Architecture Overview
//!
//! ```text
//!            ┌──────────────────────────── tailrelay-package ────────────────────────────┐
//!            │                                                                            │
//!  stored    │  ┌───────────┐    ┌──────────────┐    ┌──────────────┐    ┌────────────┐  │
//!  config ───┼─▶│ migration │───▶│  interfaces  │───▶│  lifecycle   │───▶│   health   │  │
//!            │  │  chain    │    │   export     │    │ orchestrator │    │  liveness  │  │
//!            │  └───────────┘    └──────┬───────┘    └──────┬───────┘    └─────┬──────┘  │
//!            │                          │                   │                  │         │
//!            │                          ▼                   ▼                  ▼         │
//!            │                  ┌──────────────────────────────────────────────────┐     │
//!            │                  │            Effects (host capability)             │     │
//!            │                  │   platform host  |  host::local::LocalHost       │     │
//!            │                  └──────────────────────────────────────────────────┘     │
//!            └────────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use tailrelay_package::config::loader::load_config;
use tailrelay_package::config::{config_spec, ObservabilityConfig};
use tailrelay_package::declarations::declarations;
use tailrelay_package::health::{check_web_url, health_client, HealthMonitor, WEB_UI_URL};
use tailrelay_package::host::local::LocalHost;
use tailrelay_package::lifecycle::{signals, start_package, LifecycleState, Shutdown};
use tailrelay_package::migration::{migrate_file, package_chain, ConfigVersion};
use tailrelay_package::observability::{logging, metrics};
use tailrelay_package::PackageConfig;

#[derive(Parser)]
#[command(name = "tailrelay-package")]
#[command(about = "Package orchestration for Tailrelay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every host-facing declaration as JSON
    Declare,
    /// Plan or apply a configuration migration
    Migrate {
        /// Stored version to migrate from (ignored with --config)
        #[arg(long)]
        from: Option<String>,
        /// Target version (defaults to the current one)
        #[arg(long)]
        to: Option<String>,
        /// Stored configuration file to migrate in place
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run the web-ui liveness check once
    Health {
        #[arg(long, default_value = WEB_UI_URL)]
        url: String,
        #[arg(long, default_value_t = 5)]
        timeout_secs: u64,
    },
    /// Start the package on this machine and supervise it until stopped
    Run {
        /// Operator configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Declare => {
            println!("{}", serde_json::to_string_pretty(&declarations())?);
        }
        Commands::Migrate { from, to, config } => {
            logging::init_logging(&ObservabilityConfig::default());
            migrate(from, to, config).await?;
        }
        Commands::Health { url, timeout_secs } => {
            logging::init_logging(&ObservabilityConfig::default());
            let budget = Duration::from_secs(timeout_secs);
            let result = check_web_url(&health_client(), &url, budget).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Run { config } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => PackageConfig::default(),
            };
            run(config).await?;
        }
    }

    Ok(())
}

async fn migrate(
    from: Option<String>,
    to: Option<String>,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let chain = package_chain();
    let target: ConfigVersion = match to {
        Some(v) => v.parse()?,
        None => chain.current().clone(),
    };

    if let Some(path) = config {
        let outcome = migrate_file(&path, &chain, &config_spec(), &target).await?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let from: ConfigVersion = from.ok_or("either --from or --config is required")?.parse()?;
    let plan = chain.plan(&from, &target)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

async fn run(config: PackageConfig) -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tailrelay-package starting");

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_handler(shutdown.clone());

    let host = Arc::new(LocalHost::new(config.local.clone()));
    let mut stop = shutdown.subscribe();

    let mut started = match start_package(host, &config, &mut stop).await {
        Ok(started) => started,
        Err(e) => {
            tracing::error!(error = %e, "Package failed to start");
            return Err(e.into());
        }
    };

    if *started.state() != LifecycleState::Ready {
        tracing::info!("Stopped before becoming ready");
        return Ok(());
    }

    let monitor = HealthMonitor::new(config.health_check.clone());
    let monitor = tokio::spawn(monitor.run(shutdown.subscribe()));

    let state = started.orchestrator.supervise(&mut stop).await?;
    tracing::info!(state = %state, "Daemon supervision ended");

    shutdown.trigger();
    let _ = monitor.await;

    tracing::info!("Shutdown complete");
    Ok(())
}
