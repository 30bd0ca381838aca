//! Quality control for generated prompt content.
//!
//! A [`QualityControl`] compiles a declarative [`promptqa_core::QualityConfig`]
//! once (forbidden-phrase matcher, instructions block) and then validates
//! arbitrary content strings cheaply and repeatedly.

#![warn(missing_docs)]

mod instructions;
mod validator;

pub use validator::QualityControl;
