//! Node identity loaded from the local id file

use std::fmt;
use std::path::Path;

use crate::error::CoreError;

/// Node and hardware identifiers this agent represents to the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    /// Identifier the gateway addresses the node by
    pub node_id: String,
    /// Identifier distinguishing the physical or virtual host
    pub hardware_id: String,
}

impl NodeIdentity {
    /// Parse a `<nodeId>:<hardwareId>` line.
    ///
    /// Surrounding whitespace is trimmed. Fields after the second `:` are
    /// ignored.
    pub fn parse(line: &str) -> Result<Self, CoreError> {
        let line = line.trim();
        let mut fields = line.split(':');

        let node_id = fields.next().unwrap_or_default();
        let hardware_id = fields.next();

        match hardware_id {
            Some(hardware_id) if !node_id.is_empty() => Ok(Self {
                node_id: node_id.to_string(),
                hardware_id: hardware_id.to_string(),
            }),
            _ => Err(CoreError::MalformedIdentity {
                line: line.to_string(),
            }),
        }
    }
}

impl fmt::Display for NodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (hardware {})", self.node_id, self.hardware_id)
    }
}

/// Read the node identity from `path`
pub async fn read_node_identity(path: &Path) -> Result<NodeIdentity, CoreError> {
    let data = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CoreError::io(path, e))?;

    let identity = NodeIdentity::parse(&data)?;
    tracing::debug!("Loaded identity from {:?}: {}", path, identity);
    Ok(identity)
}
