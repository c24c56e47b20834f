//! Scoring session - one live match shared by many callers
//!
//! Every event goes through [`ScoringSession::submit`], which applies it under
//! a single lock. Two events submitted concurrently are therefore applied one
//! after the other, each against the state the previous one produced; no
//! update is ever lost. Signals are broadcast before the lock is released, so
//! every subscriber sees them in the order the events were applied. Readers
//! get an `Arc` of the latest state and never block a submit for longer than
//! the pointer copy.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info};

use cricket_scorer_core::types::ScoringEvent;
use cricket_scorer_core::{IdSource, MatchState, ScoreSnapshot, SequentialIds};

use crate::signal::{derive_signals, MatchSignal};

/// Buffered signals per subscriber before a lagging receiver starts dropping
pub const SIGNAL_CAPACITY: usize = 256;

/// Outcome of one submitted event
#[derive(Debug, Clone)]
pub struct Submitted {
    /// False when the event was inadmissible and the state is unchanged
    pub applied: bool,
    /// Position of this event among the applied ones (1-based); 0 if rejected
    pub sequence: u64,
    pub state: Arc<MatchState>,
    pub signals: Vec<MatchSignal>,
}

struct Inner {
    state: Arc<MatchState>,
    ids: Box<dyn IdSource + Send>,
    /// Applied events since the last reset or new match
    log: Vec<ScoringEvent>,
    sequence: u64,
}

pub struct ScoringSession {
    inner: Mutex<Inner>,
    signals: broadcast::Sender<MatchSignal>,
}

impl ScoringSession {
    pub fn new() -> Self {
        Self::with_ids(SequentialIds::new())
    }

    /// Session drawing batter and bowler ids from `ids`
    pub fn with_ids<I: IdSource + Send + 'static>(ids: I) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            inner: Mutex::new(Inner {
                state: Arc::new(MatchState::new()),
                ids: Box::new(ids),
                log: Vec::new(),
                sequence: 0,
            }),
            signals,
        }
    }

    /// Apply one event against the latest state.
    pub fn submit(&self, event: ScoringEvent) -> Submitted {
        let mut inner = self.inner.lock();

        let mut next = MatchState::clone(&inner.state);
        if !next.apply(&event, inner.ids.as_mut()) {
            return Submitted {
                applied: false,
                sequence: 0,
                state: Arc::clone(&inner.state),
                signals: Vec::new(),
            };
        }

        let state = Arc::new(next);
        let signals = derive_signals(&event, &inner.state, &state);
        inner.state = Arc::clone(&state);
        inner.sequence += 1;
        let sequence = inner.sequence;
        match event {
            ScoringEvent::StartNewMatch(_) | ScoringEvent::ResetMatch => {
                inner.log.clear();
                inner.log.push(event);
            }
            _ => inner.log.push(event),
        }

        // Published under the lock so subscribers see signals in apply order
        for signal in &signals {
            match signal {
                MatchSignal::MatchCompleted(completed) => info!(
                    sequence,
                    runs = completed.total_runs(),
                    wickets = completed.total_wickets(),
                    "match completed"
                ),
                MatchSignal::InningsBreak { .. } => info!(?signal, sequence, "match signal"),
                _ => debug!(?signal, sequence, "match signal"),
            }
            // No subscribers is fine
            let _ = self.signals.send(signal.clone());
        }
        drop(inner);

        Submitted {
            applied: true,
            sequence,
            state,
            signals,
        }
    }

    /// Apply events in order, returning the final state.
    pub fn submit_all<E>(&self, events: E) -> Arc<MatchState>
    where
        E: IntoIterator<Item = ScoringEvent>,
    {
        let mut last = None;
        for event in events {
            last = Some(self.submit(event).state);
        }
        last.unwrap_or_else(|| self.state())
    }

    pub fn state(&self) -> Arc<MatchState> {
        Arc::clone(&self.inner.lock().state)
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        self.state().snapshot()
    }

    /// Applied events of the current match, starting with its `StartNewMatch`
    pub fn event_log(&self) -> Vec<ScoringEvent> {
        self.inner.lock().log.clone()
    }

    /// Number of events applied over the session's lifetime
    pub fn applied_count(&self) -> u64 {
        self.inner.lock().sequence
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MatchSignal> {
        self.signals.subscribe()
    }
}

impl Default for ScoringSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_scorer_core::types::{MatchSetup, TossInfo};
    use cricket_scorer_core::RandomIds;

    fn setup(overs: u32) -> ScoringEvent {
        ScoringEvent::StartNewMatch(MatchSetup {
            overs,
            team_a: "Lions".into(),
            team_b: "Tigers".into(),
            toss: TossInfo::new("Tigers"),
            batting_team: "Lions".into(),
            date: "2024-06-01".into(),
        })
    }

    fn ready(session: &ScoringSession, overs: u32) {
        session.submit_all([
            setup(overs),
            ScoringEvent::AddNewBatsman("A".into()),
            ScoringEvent::AddNewBatsman("B".into()),
            ScoringEvent::ChangeBowler("C".into()),
        ]);
    }

    #[test]
    fn test_rejected_event_keeps_state() {
        let session = ScoringSession::new();
        let before = session.state();
        let result = session.submit(ScoringEvent::AddRuns(4));
        assert!(!result.applied);
        assert_eq!(result.sequence, 0);
        assert!(Arc::ptr_eq(&before, &result.state));
        assert_eq!(session.applied_count(), 0);
    }

    #[test]
    fn test_submit_returns_new_state_and_sequence() {
        let session = ScoringSession::new();
        ready(&session, 20);
        let result = session.submit(ScoringEvent::AddRuns(6));
        assert!(result.applied);
        assert_eq!(result.sequence, 5);
        assert_eq!(result.state.total_runs(), 6);
        assert_eq!(session.snapshot().runs, 6);
    }

    #[test]
    fn test_event_log_restarts_with_new_match() {
        let session = ScoringSession::new();
        ready(&session, 20);
        session.submit(ScoringEvent::AddRuns(1));
        assert_eq!(session.event_log().len(), 5);

        session.submit(setup(10));
        assert_eq!(session.event_log(), vec![setup(10)]);
    }

    #[test]
    fn test_event_log_replays_to_same_state() {
        let session = ScoringSession::with_ids(RandomIds::new(7));
        ready(&session, 20);
        for event in [
            ScoringEvent::AddRuns(3),
            ScoringEvent::AddWide,
            ScoringEvent::AddWicket,
            ScoringEvent::AddNewBatsman("D".into()),
        ] {
            session.submit(event);
        }

        let replayed =
            cricket_scorer_core::replay(&session.event_log(), &mut RandomIds::new(7));
        assert_eq!(&replayed, session.state().as_ref());
    }

    #[test]
    fn test_subscribers_receive_signals() {
        let session = ScoringSession::new();
        let mut rx = session.subscribe();
        ready(&session, 1);
        for _ in 0..6 {
            session.submit(ScoringEvent::AddRuns(0));
        }

        assert_eq!(rx.try_recv().unwrap(), MatchSignal::MatchStarted);
        assert_eq!(rx.try_recv().unwrap(), MatchSignal::OverCompleted { overs: 1 });
        assert_eq!(
            rx.try_recv().unwrap(),
            MatchSignal::InningsBreak {
                runs: 0,
                wickets: 0
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_concurrent_submits_are_serialized() {
        let session = Arc::new(ScoringSession::new());
        ready(&session, 50);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        assert!(session.submit(ScoringEvent::AddRuns(1)).applied);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let state = session.state();
        assert_eq!(state.total_runs(), 100);
        assert_eq!(state.total_balls(), 100);
        assert_eq!(state.deliveries().len(), 100);
        assert_eq!(session.applied_count(), 104);
    }

    #[test]
    fn test_concurrent_signals_arrive_in_apply_order() {
        let session = Arc::new(ScoringSession::new());
        ready(&session, 50);
        let mut rx = session.subscribe();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || {
                    for _ in 0..30 {
                        session.submit(ScoringEvent::AddRuns(0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut overs = Vec::new();
        while let Ok(signal) = rx.try_recv() {
            if let MatchSignal::OverCompleted { overs: n } = signal {
                overs.push(n);
            }
        }
        assert_eq!(overs, (1..=20).collect::<Vec<u32>>());
    }
}
