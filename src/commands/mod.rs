//! CLI commands
//!
//! Each command loads its data through the services layer and returns the
//! rendered text. A failed query is returned as an error so the binary can
//! exit non-zero.

pub mod dashboard;
pub mod events;
pub mod reports;
