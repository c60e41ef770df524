//! Repository contracts.

pub mod users;
