//! Shared database schema, migrations, and query builders.
//!
//! Every builder returns `(String, sea_query::Values)` ready for the
//! server's `sq_*` bridge helpers.

pub mod dial;
pub mod journeys;
pub mod migrations;
pub mod objectives;
pub mod projects;
pub mod rrgt;
pub mod tables;
pub mod tasks;
pub mod teams;
pub mod touchbases;
pub mod users;

// Re-export tables for convenience
pub use tables::*;

/// A built statement: SQL text plus bound values.
pub type Built = (String, sea_query::Values);
