//! Cricket scorer (workspace facade crate).
//!
//! Re-exports the workspace crates under short names and hosts the pieces
//! shared by the `cricket-scorer` binary and the integration tests.

pub use cricket_scorer_adapter as adapter;
pub use cricket_scorer_core as core;
pub use cricket_scorer_session as session;
pub use cricket_scorer_types as types;

pub mod cli;
pub mod telemetry;
