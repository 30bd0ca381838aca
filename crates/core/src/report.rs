//! Test results, quality metrics, and aggregate reports.

use serde::{Deserialize, Serialize};

use crate::id::AgentId;
use crate::Time;

/// Outcome of a single named check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// Check succeeded
    Pass,
    /// Check failed
    Fail,
    /// Check succeeded with reservations
    Warning,
}

/// Result of a single named check against an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Check name
    pub name: String,

    /// Outcome
    pub status: TestStatus,

    /// Human-readable message
    pub message: String,

    /// Optional structured detail payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl TestResult {
    /// Create a passing result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Pass,
            message: message.into(),
            details: None,
        }
    }

    /// Create a failing result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Fail,
            message: message.into(),
            details: None,
        }
    }

    /// Create a warning result.
    pub fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Warning,
            message: message.into(),
            details: None,
        }
    }

    /// Attach a structured detail payload.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Four-dimension quality breakdown for one generated item.
///
/// Each component is on a 0-100 scale; `overall` is the weighted blend
/// 0.3 clarity + 0.3 usefulness + 0.2 uniqueness + 0.2 SEO.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Is the item well-formed and self-describing
    pub clarity: f64,

    /// Does the item carry enough substance to be useful
    pub usefulness: f64,

    /// Does the item differentiate itself from its keyword
    pub uniqueness: f64,

    /// Keyword placement and tagging
    pub seo_optimization: f64,

    /// Weighted blend of the four components
    pub overall: f64,
}

impl QualityMetrics {
    /// Build metrics from the four components, deriving `overall`.
    pub fn from_components(clarity: f64, usefulness: f64, uniqueness: f64, seo: f64) -> Self {
        Self {
            clarity,
            usefulness,
            uniqueness,
            seo_optimization: seo,
            overall: 0.3 * clarity + 0.3 * usefulness + 0.2 * uniqueness + 0.2 * seo,
        }
    }

    /// All-zero metrics, used for missing or malformed payloads.
    pub fn zeroed() -> Self {
        Self::from_components(0.0, 0.0, 0.0, 0.0)
    }
}

/// Aggregate report over one agent's test battery and recent output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTestReport {
    /// The agent under test
    pub agent_id: AgentId,

    /// Full accumulated check results
    pub results: Vec<TestResult>,

    /// Number of passing checks
    pub passed: usize,

    /// Number of failing checks
    pub failed: usize,

    /// Number of warning checks
    pub warnings: usize,

    /// Mean metrics over the evaluated sample, absent when no sample
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_metrics: Option<QualityMetrics>,

    /// Improvement recommendations, in emission order
    pub recommendations: Vec<String>,

    /// When the report was generated
    pub generated_at: Time,
}

impl AgentTestReport {
    /// Count pass/fail/warning totals from the accumulated result list.
    pub fn tally(results: &[TestResult]) -> (usize, usize, usize) {
        let passed = results.iter().filter(|r| r.status == TestStatus::Pass).count();
        let failed = results.iter().filter(|r| r.status == TestStatus::Fail).count();
        let warnings = results.iter().filter(|r| r.status == TestStatus::Warning).count();
        (passed, failed, warnings)
    }
}
