//! Agent testing and per-item quality evaluation.
//!
//! Talks to an external content-generation agent service over HTTP, runs a
//! sequential battery of black-box checks against it, and aggregates the
//! outcome into a report.

#![warn(missing_docs)]

mod client;
mod evaluate;
mod harness;

pub use client::{
    AgentService, AgentServiceError, GenerateRequest, GenerateResponse, HttpAgentService,
    Result, TopicSpec,
};
pub use evaluate::evaluate_prompt_quality;
pub use harness::TestHarness;
