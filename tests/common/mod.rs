//! Shared utilities for the control loop integration tests.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use fleet_autoscaler::error::{Result, ScalerError};
use fleet_autoscaler::runtime::{ContainerId, ContainerRuntime, ContainerSpec};

/// In-memory container runtime recording every lifecycle call.
#[derive(Default)]
pub struct FakeRuntime {
    pub calls: Mutex<Vec<String>>,
    pub running: Mutex<HashSet<String>>,
    pub fail_exec: AtomicBool,
}

impl FakeRuntime {
    /// A runtime with the given containers already running, mirroring
    /// workers started outside the scaler.
    pub fn with_running(names: &[&str]) -> Self {
        Self {
            running: Mutex::new(names.iter().map(|n| n.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ContainerRuntime for FakeRuntime {
    async fn run(&self, spec: &ContainerSpec) -> Result<ContainerId> {
        self.record(format!("run {}", spec.name));
        self.running.lock().unwrap().insert(spec.name.clone());
        Ok(ContainerId(format!("id-{}", spec.name)))
    }

    async fn get(&self, name: &str) -> Result<ContainerId> {
        if self.running.lock().unwrap().contains(name) {
            Ok(ContainerId(format!("id-{name}")))
        } else {
            Err(ScalerError::ContainerNotFound(name.to_string()))
        }
    }

    async fn stop(&self, id: &ContainerId) -> Result<()> {
        self.record(format!("stop {id}"));
        Ok(())
    }

    async fn remove(&self, id: &ContainerId) -> Result<()> {
        self.record(format!("rm {id}"));
        if let Some(name) = id.0.strip_prefix("id-") {
            self.running.lock().unwrap().remove(name);
        }
        Ok(())
    }

    async fn exec(&self, name: &str, command: &[String]) -> Result<()> {
        if self.fail_exec.load(Ordering::SeqCst) {
            return Err(ScalerError::Runtime("exec failed".to_string()));
        }
        self.record(format!("exec {} {}", name, command.join(" ")));
        Ok(())
    }
}

/// Start a mock worker that answers every request with a metrics
/// exposition body; the counter value comes from the closure.
pub async fn start_metrics_worker<F>(addr: SocketAddr, counter: F)
where
    F: Fn() -> f64 + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let counter = std::sync::Arc::new(counter);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let counter = counter.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 1024];
                        let _ = socket.read(&mut buf).await;
                        let body = format!(
                            "request_count_total{{worker=\"mock\"}} {}\n",
                            counter()
                        );
                        let response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
}
