//! Startup sequence
//!
//! ```text
//! Init -> IdentityLoaded -> Registered -> SessionStarted -> Pinging
//! ```
//!
//! Every step must succeed before the next runs. A failure at any step
//! aborts the sequence with a [`StartupError`] naming the step; nothing is
//! retried and no ping task is spawned. Once pinging, the agent stays in that
//! state until its cancellation token fires.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use nl_core::{read_node_identity, NodeIdentity};

use crate::api::NodeApi;
use crate::error::AgentError;
use crate::heartbeat::{PingHandle, PingTask};

/// Startup step that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadIdentity,
    Register,
    StartSession,
    InitialPing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::LoadIdentity => "load identity",
            Stage::Register => "register node",
            Stage::StartSession => "start session",
            Stage::InitialPing => "initial ping",
        };
        f.write_str(name)
    }
}

/// A startup step failed
#[derive(Debug, Error)]
#[error("Startup failed at {stage}: {source}")]
pub struct StartupError {
    pub stage: Stage,
    #[source]
    pub source: AgentError,
}

trait StageExt<T> {
    fn at(self, stage: Stage) -> Result<T, StartupError>;
}

impl<T, E: Into<AgentError>> StageExt<T> for Result<T, E> {
    fn at(self, stage: Stage) -> Result<T, StartupError> {
        self.map_err(|e| StartupError {
            stage,
            source: e.into(),
        })
    }
}

/// Agent after a successful startup
pub struct Running {
    pub identity: NodeIdentity,
    pub pings: PingHandle,
}

/// Drives the startup sequence and hands off to the ping loop
pub struct Orchestrator<A> {
    api: Arc<A>,
    id_file: PathBuf,
    ping_interval: Duration,
}

impl<A: NodeApi + 'static> Orchestrator<A> {
    pub fn new(api: Arc<A>, id_file: impl Into<PathBuf>, ping_interval: Duration) -> Self {
        Self {
            api,
            id_file: id_file.into(),
            ping_interval,
        }
    }

    /// Run every startup step, then spawn the recurring ping task.
    pub async fn start(&self, cancel: CancellationToken) -> Result<Running, StartupError> {
        let identity = read_node_identity(&self.id_file)
            .await
            .at(Stage::LoadIdentity)?;
        tracing::info!(
            "Read nodeId: {}, hardwareId: {}",
            identity.node_id,
            identity.hardware_id
        );

        let registration = self
            .api
            .register_node(&identity.node_id, &identity.hardware_id)
            .await
            .at(Stage::Register)?;
        tracing::info!("Node registration completed (status {})", registration.status);

        let session = self
            .api
            .start_session(&identity.node_id)
            .await
            .at(Stage::StartSession)?;
        tracing::info!("Session started (status {})", session.status);

        tracing::info!("Sending initial ping...");
        let ping = self
            .api
            .ping_node(&identity.node_id)
            .await
            .at(Stage::InitialPing)?;
        tracing::info!("Initial ping completed (status {})", ping.status);

        let pings = PingTask::new(
            Arc::clone(&self.api),
            identity.node_id.clone(),
            self.ping_interval,
        )
        .spawn(cancel);

        Ok(Running { identity, pings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nl_core::CoreError;

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::LoadIdentity.to_string(), "load identity");
        assert_eq!(Stage::InitialPing.to_string(), "initial ping");
    }

    #[test]
    fn test_startup_error_message() {
        let err = StartupError {
            stage: Stage::LoadIdentity,
            source: CoreError::MalformedIdentity {
                line: "oops".to_string(),
            }
            .into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Startup failed at load identity"), "{}", msg);
        assert!(msg.contains("oops"));
    }
}
