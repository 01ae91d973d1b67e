//! nl-agent: NodeLink node agent
//!
//! The agent registers this machine with the coordination gateway, opens a
//! session and keeps it alive with periodic pings.

pub mod api;
pub mod error;
pub mod heartbeat;
pub mod ip;
pub mod lifecycle;

pub use api::{GatewayClient, GatewayResponse, NodeApi};
pub use error::AgentError;
pub use heartbeat::{PingHandle, PingTask};
pub use ip::PublicIpResolver;
pub use lifecycle::{Orchestrator, Running, Stage, StartupError};
