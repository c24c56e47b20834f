//! Edge-triggered match signals derived from before/after states.

use std::sync::Arc;

use cricket_scorer_core::types::ScoringEvent;
use cricket_scorer_core::{Innings, MatchState};

#[derive(Debug, Clone, PartialEq)]
pub enum MatchSignal {
    /// Explicit: a match was configured and started
    MatchStarted,

    /// Edge-triggered: a legal ball completed an over; a new bowler is due
    OverCompleted { overs: u32 },

    /// Edge-triggered: a wicket fell
    WicketFell { wickets: u32 },

    /// Edge-triggered: first innings ended, offer the innings break
    InningsBreak { runs: u32, wickets: u32 },

    /// Edge-triggered: second innings started
    SecondInningsStarted { target: u32 },

    /// Edge-triggered: match moved to complete; carries the completed state
    MatchCompleted(Arc<MatchState>),

    /// Explicit: match returned to its unstarted default
    MatchReset,
}

/// Derive signals from the state before and after one applied event.
pub fn derive_signals(
    event: &ScoringEvent,
    before: &MatchState,
    after: &Arc<MatchState>,
) -> Vec<MatchSignal> {
    let mut signals = Vec::new();

    // 1. Explicit lifecycle events
    match event {
        ScoringEvent::StartNewMatch(_) => signals.push(MatchSignal::MatchStarted),
        ScoringEvent::ResetMatch => signals.push(MatchSignal::MatchReset),
        _ => {}
    }

    // 2. Deliveries within the same innings
    if event.is_scoring() && before.current_innings() == after.current_innings() {
        if after.total_wickets() > before.total_wickets() {
            signals.push(MatchSignal::WicketFell {
                wickets: after.total_wickets(),
            });
        }
        if after.total_overs() > before.total_overs() {
            signals.push(MatchSignal::OverCompleted {
                overs: after.total_overs(),
            });
        }
    }

    // 3. Innings break (!pending -> pending)
    if !before.innings_transition_pending() && after.innings_transition_pending() {
        signals.push(MatchSignal::InningsBreak {
            runs: after.total_runs(),
            wickets: after.total_wickets(),
        });
    }

    // 4. Second innings (First -> Second)
    if before.current_innings() == Innings::First && after.current_innings() == Innings::Second {
        if let Some(target) = after.target() {
            signals.push(MatchSignal::SecondInningsStarted { target });
        }
    }

    // 5. Completion (!complete -> complete)
    if !before.is_match_complete() && after.is_match_complete() {
        signals.push(MatchSignal::MatchCompleted(Arc::clone(after)));
    }

    signals
}
