//! Demo backend worker.
//!
//! External collaborator for the autoscaler: serves `/` and exposes the
//! cumulative request counter on `/metrics` in the exposition format the
//! poller consumes. Treated as a black box by the control loop.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use clap::Parser;

#[derive(Parser)]
#[command(name = "demo-worker")]
#[command(about = "Demo HTTP worker with a /metrics counter", long_about = None)]
struct Cli {
    /// Display name, also used in the metric labels.
    #[arg(long)]
    name: String,

    /// Listen port.
    #[arg(long)]
    port: u16,
}

struct WorkerState {
    name: String,
    requests: AtomicU64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let state = Arc::new(WorkerState {
        name: cli.name,
        requests: AtomicU64::new(0),
    });

    let app = Router::new()
        .route("/", get(homepage))
        .route("/metrics", get(metrics))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    println!("demo-worker listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn homepage(State(state): State<Arc<WorkerState>>) -> String {
    state.requests.fetch_add(1, Ordering::Relaxed);
    format!("Hello from worker {}!\n", state.name)
}

async fn metrics(State(state): State<Arc<WorkerState>>) -> String {
    let count = state.requests.load(Ordering::Relaxed);
    format!(
        "# HELP request_count_total Total request count\n\
         # TYPE request_count_total counter\n\
         request_count_total{{worker=\"{}\",endpoint=\"/\"}} {}\n",
        state.name, count
    )
}
