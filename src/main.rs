//! Fleet autoscaler daemon.
//!
//! Loads the config, wires the docker runtime into the control loop and
//! ticks until killed or hit by an unrecoverable error.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use fleet_autoscaler::config::load_config;
use fleet_autoscaler::observability::{logging, metrics};
use fleet_autoscaler::runtime::DockerCli;
use fleet_autoscaler::ControlLoop;

#[derive(Parser)]
#[command(name = "fleet-autoscaler")]
#[command(about = "Autoscaling control loop for an nginx-fronted worker fleet", long_about = None)]
struct Cli {
    /// Path to the scaler configuration file.
    #[arg(short, long, default_value = "scaler.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_tracing("fleet_autoscaler=debug");

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    tracing::info!(
        conf_path = %config.nginx.conf_path,
        min_servers = config.fleet.min_servers,
        max_servers = config.fleet.max_servers,
        interval_secs = config.poll.interval_secs,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            );
        }
    }

    let runtime = Arc::new(DockerCli::new());
    let control_loop = ControlLoop::new(&config, runtime);

    // No graceful-shutdown path: the loop runs until an unrecoverable
    // error or an external kill.
    control_loop.run().await?;
    Ok(())
}
