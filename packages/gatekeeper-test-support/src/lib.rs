//! Gatekeeper test support utilities
//!
//! Shared helpers for unit and integration tests: one-time logging
//! initialization and assertions on the problem-details error contract.

pub mod logging;
pub mod problem_details;
