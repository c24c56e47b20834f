//! Core scoring logic - pure, deterministic, and testable
//!
//! This crate contains the match state and every rule that changes it. It has
//! **no dependencies** on I/O, persistence, or presentation, making it:
//!
//! - **Deterministic**: the same events and the same id source produce the
//!   same match, ball for ball
//! - **Replayable**: a match is fully described by its event log
//! - **Testable**: every transition is a plain function over plain data
//!
//! # Module Structure
//!
//! - [`match_state`]: the complete match snapshot and its invariants
//! - [`engine`]: the transition function applying [`ScoringEvent`]s
//! - [`ids`]: injected identity generation for batters and bowlers
//! - [`scoring`]: match result, winning margin and individual highlights
//! - [`snapshot`]: read-only scoreboard view (run rates, chase figures)
//!
//! # Example
//!
//! ```
//! use cricket_scorer_core::{transition, MatchState, SequentialIds};
//! use cricket_scorer_types::{MatchSetup, ScoringEvent, TossInfo};
//!
//! let mut ids = SequentialIds::new();
//! let setup = MatchSetup {
//!     overs: 20,
//!     team_a: "Lions".into(),
//!     team_b: "Tigers".into(),
//!     toss: TossInfo::new("Lions"),
//!     batting_team: "Lions".into(),
//!     date: "2024-03-01".into(),
//! };
//!
//! let mut state = MatchState::new();
//! for event in [
//!     ScoringEvent::StartNewMatch(setup),
//!     ScoringEvent::AddNewBatsman("Opener A".into()),
//!     ScoringEvent::AddNewBatsman("Opener B".into()),
//!     ScoringEvent::ChangeBowler("Quick".into()),
//!     ScoringEvent::AddRuns(4),
//! ] {
//!     state = transition(&state, &event, &mut ids);
//! }
//!
//! assert_eq!(state.total_runs(), 4);
//! assert_eq!(state.snapshot().score_line(), "Lions 4/0 (0.1 ov)");
//! ```

pub mod engine;
pub mod ids;
pub mod match_state;
pub mod scoring;
pub mod snapshot;

pub use cricket_scorer_types as types;

// Re-export commonly used types for convenience
pub use engine::{replay, transition};
pub use ids::{IdKind, IdSource, RandomIds, SequentialIds, SimpleRng};
pub use match_state::{Innings, MatchState};
pub use scoring::{
    decide_result, highlights, match_highlights, match_result, BattingHighlight,
    BowlingHighlight, Margin, MatchHighlights, MatchResult,
};
pub use snapshot::{BatterLine, BowlerLine, ChaseSnapshot, ScoreSnapshot};
