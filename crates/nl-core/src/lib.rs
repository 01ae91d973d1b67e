//! nl-core: Core abstractions and configuration for NodeLink
//!
//! This crate provides the configuration structures, error types, node
//! identity reader and bearer token providers used by the agent.

pub mod config;
pub mod error;
pub mod identity;
pub mod token;

pub use error::{ConfigError, CoreError};
pub use identity::{read_node_identity, NodeIdentity};
pub use token::{FileTokenProvider, StaticTokenProvider, TokenProvider};
