//! Agent descriptors returned by the external generation service.

use serde::{Deserialize, Serialize};

use crate::id::AgentId;

/// Descriptor of a content-generation agent.
///
/// Fetched from the agent service; extra fields on the wire are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Unique identifier
    pub id: AgentId,

    /// Display name
    #[serde(default)]
    pub name: Option<String>,

    /// The agent's own configured quality threshold.
    ///
    /// Reported in test details for comparison only; the harness uses its
    /// own fixed thresholds.
    #[serde(default)]
    pub quality_threshold: Option<f64>,
}
