//! Core library for the Teller banking backend.
//!
//! The `lending` module holds the loan-origination engine: metric
//! calculators, the hard-rule eligibility evaluator, and the decision
//! orchestrator, together with the store traits and HTTP router the
//! service binary composes at startup.

pub mod config;
pub mod error;
pub mod lending;
pub mod telemetry;
