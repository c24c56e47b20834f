//! Live scoring session over the pure engine
//!
//! - [`session`]: serialized event submission and shared state
//! - [`signal`]: signals derived from each applied event (over completed,
//!   innings break, match completed, ...), broadcast to subscribers

pub mod session;
pub mod signal;

pub use session::{ScoringSession, Submitted, SIGNAL_CAPACITY};
pub use signal::{derive_signals, MatchSignal};
