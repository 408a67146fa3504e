//! Keeping the LB config file in step with the tracked fleet.
//!
//! # Responsibilities
//! - Adopt workers that appear in the file but are not yet tracked
//! - Add/remove routing entries idempotently
//! - Trigger the LB reload inside its container

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{Result, ScalerError};
use crate::fleet::{FleetState, WorkerRecord};
use crate::nginx::upstream::{UpstreamBlock, UpstreamEntry};
use crate::runtime::ContainerRuntime;

/// Direction of a routing entry mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamAction {
    Add,
    Remove,
}

/// Owns the mapping between the upstream block on disk and the tracked
/// worker set.
pub struct ConfigSynchronizer<R> {
    conf_path: PathBuf,
    upstream_name: String,
    lb_container: String,
    reload_command: Vec<String>,
    runtime: Arc<R>,
}

impl<R: ContainerRuntime> ConfigSynchronizer<R> {
    pub fn new(
        conf_path: impl Into<PathBuf>,
        upstream_name: impl Into<String>,
        lb_container: impl Into<String>,
        reload_command: Vec<String>,
        runtime: Arc<R>,
    ) -> Self {
        Self {
            conf_path: conf_path.into(),
            upstream_name: upstream_name.into(),
            lb_container: lb_container.into(),
            reload_command,
            runtime,
        }
    }

    /// Adopt file entries the fleet does not track yet.
    ///
    /// Discovery is additive only: a tracked worker whose entry went
    /// missing from the file stays tracked. External edits that add
    /// entries are tolerated; external removals are not mirrored.
    pub fn reconcile(&self, state: &mut FleetState) -> Result<()> {
        let text = fs::read_to_string(&self.conf_path)?;
        let (block, _) = UpstreamBlock::parse(&text, &self.upstream_name)?;

        for entry in block.entries() {
            if !state.contains_port(entry.port) {
                tracing::info!(
                    host = %entry.host,
                    port = entry.port,
                    "adopting worker discovered in config"
                );
                state.register(WorkerRecord::new(entry.host.clone(), entry.port));
            }
        }
        Ok(())
    }

    /// Add or remove a `host:port` entry in the upstream block.
    ///
    /// Idempotent: adding a present entry or removing an absent one is a
    /// logged no-op and leaves the file byte-identical. Content outside
    /// the block is never touched.
    pub fn mutate(&self, address: &str, action: UpstreamAction) -> Result<()> {
        let entry = UpstreamEntry::parse(address)?;
        let text = fs::read_to_string(&self.conf_path)?;
        let (mut block, span) = UpstreamBlock::parse(&text, &self.upstream_name)?;

        let changed = match action {
            UpstreamAction::Add => block.add(entry),
            UpstreamAction::Remove => block.remove(&entry),
        };

        if !changed {
            tracing::info!(%address, ?action, "upstream entry already in desired state");
            return Ok(());
        }

        let mut updated = String::with_capacity(text.len());
        updated.push_str(&text[..span.start]);
        updated.push_str(&block.serialize());
        updated.push_str(&text[span.end..]);
        fs::write(&self.conf_path, updated)?;

        tracing::info!(%address, ?action, path = %self.conf_path.display(), "upstream block updated");
        Ok(())
    }

    /// Ask the running LB to reload its configuration.
    ///
    /// On failure the LB's live routing may diverge from the file; the
    /// caller must treat the fleet as inconsistent until a later reload
    /// succeeds.
    pub async fn reload(&self) -> Result<()> {
        self.runtime
            .exec(&self.lb_container, &self.reload_command)
            .await
            .map_err(|e| ScalerError::Reload(e.to_string()))?;

        tracing::info!(container = %self.lb_container, "load balancer reloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::runtime::{ContainerId, ContainerSpec};

    /// Runtime stub; reload is exercised in the integration tests.
    struct NullRuntime;

    impl ContainerRuntime for NullRuntime {
        async fn run(&self, _spec: &ContainerSpec) -> Result<ContainerId> {
            unreachable!("not used in these tests")
        }
        async fn get(&self, name: &str) -> Result<ContainerId> {
            Err(ScalerError::ContainerNotFound(name.to_string()))
        }
        async fn stop(&self, _id: &ContainerId) -> Result<()> {
            Ok(())
        }
        async fn remove(&self, _id: &ContainerId) -> Result<()> {
            Ok(())
        }
        async fn exec(&self, _name: &str, _command: &[String]) -> Result<()> {
            Ok(())
        }
    }

    const CONF: &str = "\
worker_processes 1;

http {
    upstream backend_servers {
        server backend-app-0:8001;
    }

    server {
        listen 8080;
        location / { proxy_pass http://backend_servers; }
    }
}
";

    fn synchronizer_for(path: &std::path::Path) -> ConfigSynchronizer<NullRuntime> {
        ConfigSynchronizer::new(
            path,
            "backend_servers",
            "lb",
            vec!["nginx".into(), "-s".into(), "reload".into()],
            Arc::new(NullRuntime),
        )
    }

    fn write_conf() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONF.as_bytes()).unwrap();
        file
    }

    #[test]
    fn add_twice_equals_add_once() {
        let file = write_conf();
        let sync = synchronizer_for(file.path());

        sync.mutate("backend-app-1:8002", UpstreamAction::Add).unwrap();
        let once = fs::read_to_string(file.path()).unwrap();

        sync.mutate("backend-app-1:8002", UpstreamAction::Add).unwrap();
        let twice = fs::read_to_string(file.path()).unwrap();

        assert_eq!(once, twice);
        assert!(once.contains("server backend-app-1:8002;"));
    }

    #[test]
    fn remove_absent_leaves_file_byte_identical() {
        let file = write_conf();
        let sync = synchronizer_for(file.path());

        sync.mutate("backend-app-9:8010", UpstreamAction::Remove).unwrap();

        assert_eq!(fs::read_to_string(file.path()).unwrap(), CONF);
    }

    #[test]
    fn mutation_preserves_content_outside_the_block() {
        let file = write_conf();
        let sync = synchronizer_for(file.path());

        sync.mutate("backend-app-1:8002", UpstreamAction::Add).unwrap();

        let text = fs::read_to_string(file.path()).unwrap();
        assert!(text.starts_with("worker_processes 1;"));
        assert!(text.contains("proxy_pass http://backend_servers;"));
        assert!(text.contains("server backend-app-0:8001;"));
    }

    #[test]
    fn missing_block_aborts_and_leaves_file_untouched() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"http { }\n").unwrap();
        let sync = synchronizer_for(file.path());

        let result = sync.mutate("backend-app-1:8002", UpstreamAction::Add);

        assert!(matches!(result, Err(ScalerError::ConfigFormat(_))));
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "http { }\n");
    }

    #[test]
    fn reconcile_adopts_untracked_entries_only() {
        let file = write_conf();
        let sync = synchronizer_for(file.path());

        let mut state = FleetState::new();
        sync.reconcile(&mut state).unwrap();
        assert_eq!(state.len(), 1);
        assert_eq!(state.base_port(), Some(8001));

        // A tracked worker missing from the file is not dropped.
        state.register(WorkerRecord::new("backend-app-7".to_string(), 8008));
        sync.reconcile(&mut state).unwrap();
        assert_eq!(state.len(), 2);
        assert!(state.contains_port(8008));
    }
}
