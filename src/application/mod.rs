//! Application layer
//!
//! This layer contains use cases that orchestrate domain logic to implement
//! application-specific workflows. Use cases coordinate the billing service,
//! the state mirror, and the print renderer to fulfill business requirements.

pub mod billing;
pub mod mirror;
