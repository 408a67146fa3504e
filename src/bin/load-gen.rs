//! Load generator.
//!
//! Pure traffic source for exercising the autoscaler end to end: fires
//! batches of GET requests at the load balancer and prints per-request
//! timings.

use std::time::{Duration, Instant};

use clap::Parser;

#[derive(Parser)]
#[command(name = "load-gen")]
#[command(about = "Fires HTTP traffic at the load balancer", long_about = None)]
struct Cli {
    /// Target URL.
    #[arg(long, default_value = "http://localhost:8080/")]
    url: String,

    /// Requests per batch.
    #[arg(long, default_value_t = 100)]
    requests: u32,

    /// Delay between requests in milliseconds.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Stop after one batch instead of looping forever.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let mut sent = 0u64;

    loop {
        for _ in 0..cli.requests {
            sent += 1;
            let start = Instant::now();
            match client.get(&cli.url).send().await {
                Ok(response) => println!(
                    "Request {}: status = {}, time = {:.3}s",
                    sent,
                    response.status(),
                    start.elapsed().as_secs_f64()
                ),
                Err(e) => eprintln!("Request {} failed: {}", sent, e),
            }
            if cli.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(cli.delay_ms)).await;
            }
        }
        if cli.once {
            break;
        }
    }
    Ok(())
}
