//! Adapter crate - everything outside the scoring engine
//!
//! The engine is in-memory only. This crate connects it to the outside:
//!
//! - [`record`]: the persisted shape of a completed match
//! - [`store`]: the [`MatchStore`] boundary with in-memory and JSON file backends
//! - [`notifier`]: saves each completed match exactly once
//! - [`analytics`]: figures over stored history
//! - [`protocol`]: line-delimited JSON scoring events
//! - [`config`]: environment configuration
//!
//! # Saving a Completed Match
//!
//! The [`CompletionNotifier`] is fed the current [`MatchState`] whenever
//! completion may have happened. It derives a [`CompletionId`] from teams,
//! date and final totals, and tracks each id through
//! `NotAttempted -> InFlight -> Attempted`:
//!
//! 1. **Dedup**: a record already in history (same teams, overs, scores,
//!    winner and date) is not stored again
//! 2. **Single flight**: concurrent observations of the same completion
//!    collapse to one save
//! 3. **Retry**: a failed save returns to `NotAttempted` until the attempt
//!    budget is spent
//!
//! Success and already-saved notices are sent once per completion over an
//! optional channel.
//!
//! [`MatchState`]: cricket_scorer_core::MatchState

pub mod analytics;
pub mod config;
pub mod notifier;
pub mod protocol;
pub mod record;
pub mod store;

pub use analytics::{summarize, summarize_on, HistorySummary, TeamScore, TeamStats};
pub use config::AdapterConfig;
pub use notifier::{
    spawn_completion_watcher, submit_and_save, CompletionId, CompletionNotifier, Notice,
    SaveOutcome, SaveState,
};
pub use protocol::{
    encode_event, encode_script, parse_event_line, parse_script, EventMessage, ProtocolError,
};
pub use record::{
    BatterRecord, BowlerRecord, Dismissal, ExtrasRecord, InningsRecord, MatchRecord, TossChoice,
    TossRecord,
};
pub use store::{InMemoryStore, JsonFileStore, MatchStore, StoreError};
