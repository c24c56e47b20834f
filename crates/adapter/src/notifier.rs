//! Completion notifier - saves each completed match exactly once
//!
//! Completion is observed repeatedly (every signal, every re-read of the
//! state), so saving is guarded by a tracker keyed by [`CompletionId`]:
//!
//! ```text
//! NotAttempted --observe--> InFlight --saved / already in history--> Attempted
//!       ^                      |
//!       +------- failed -------+   (until the attempt budget is spent,
//!                                    then Attempted)
//! ```
//!
//! Only one save per id can be in flight. The tracker lock is never held
//! across an await.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use cricket_scorer_core::types::ScoringEvent;
use cricket_scorer_core::MatchState;
use cricket_scorer_session::{MatchSignal, ScoringSession};

use crate::record::MatchRecord;
use crate::store::MatchStore;

/// Save attempts per completion before a failure becomes permanent
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Identity of one match completion: teams, date and final totals
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompletionId {
    pub team_a: String,
    pub team_b: String,
    pub date: String,
    pub runs: u32,
    pub wickets: u32,
}

impl CompletionId {
    /// `None` while the match is still in progress
    pub fn of(state: &MatchState) -> Option<Self> {
        if !state.is_match_complete() {
            return None;
        }
        Some(Self {
            team_a: state.team_a().to_string(),
            team_b: state.team_b().to_string(),
            date: state.match_date().to_string(),
            runs: state.total_runs(),
            wickets: state.total_wickets(),
        })
    }
}

impl fmt::Display for CompletionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}-{}",
            self.team_a, self.team_b, self.date, self.runs, self.wickets
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveState {
    #[default]
    NotAttempted,
    InFlight,
    Attempted,
}

/// User-facing notices; success notices are sent once per completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved(CompletionId),
    AlreadySaved(CompletionId),
    SaveFailed { id: CompletionId, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Match not complete, nothing to save
    NotComplete,
    /// Saving switched off by configuration
    Disabled,
    /// Another observation already owns this completion
    Skipped(SaveState),
    AlreadySaved,
    Saved,
    Failed(String),
}

#[derive(Debug, Default)]
struct Tracker {
    state: SaveState,
    failures: u32,
    notified: bool,
}

pub struct CompletionNotifier<S: ?Sized> {
    store: Arc<S>,
    tracked: Mutex<HashMap<CompletionId, Tracker>>,
    notices: Option<mpsc::UnboundedSender<Notice>>,
    max_attempts: u32,
    enabled: bool,
}

impl<S: MatchStore + ?Sized> CompletionNotifier<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            tracked: Mutex::new(HashMap::new()),
            notices: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            enabled: true,
        }
    }

    pub fn with_notices(mut self, notices: mpsc::UnboundedSender<Notice>) -> Self {
        self.notices = Some(notices);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save_state(&self, id: &CompletionId) -> SaveState {
        self.tracked
            .lock()
            .get(id)
            .map(|t| t.state)
            .unwrap_or_default()
    }

    fn notify(&self, notice: Notice) {
        if let Some(tx) = &self.notices {
            // Receiver gone means nobody is listening
            let _ = tx.send(notice);
        }
    }

    /// Mark `id` attempted and send `notice` unless one was already sent.
    fn finish(&self, id: &CompletionId, notice: Notice) {
        let first_notice = {
            let mut tracked = self.tracked.lock();
            let tracker = tracked.entry(id.clone()).or_default();
            tracker.state = SaveState::Attempted;
            !std::mem::replace(&mut tracker.notified, true)
        };
        if first_notice {
            self.notify(notice);
        }
    }

    fn fail(&self, id: &CompletionId, reason: String) -> SaveOutcome {
        let permanent = {
            let mut tracked = self.tracked.lock();
            let tracker = tracked.entry(id.clone()).or_default();
            tracker.failures += 1;
            let permanent = tracker.failures >= self.max_attempts;
            tracker.state = if permanent {
                SaveState::Attempted
            } else {
                SaveState::NotAttempted
            };
            permanent
        };
        warn!(completion = %id, %reason, permanent, "failed to save match");
        self.notify(Notice::SaveFailed {
            id: id.clone(),
            reason: reason.clone(),
        });
        SaveOutcome::Failed(reason)
    }

    /// Save the match in `state` if it is complete and not yet handled.
    pub async fn observe(&self, state: &MatchState) -> SaveOutcome {
        let Some(id) = CompletionId::of(state) else {
            return SaveOutcome::NotComplete;
        };
        if !self.enabled {
            return SaveOutcome::Disabled;
        }
        let Some(record) = MatchRecord::from_completed(state) else {
            return SaveOutcome::NotComplete;
        };

        // Claim the completion
        {
            let mut tracked = self.tracked.lock();
            let tracker = tracked.entry(id.clone()).or_default();
            if tracker.state != SaveState::NotAttempted {
                debug!(completion = %id, state = ?tracker.state, "save skipped");
                return SaveOutcome::Skipped(tracker.state);
            }
            tracker.state = SaveState::InFlight;
        }

        let history = match self.store.match_history().await {
            Ok(history) => history,
            Err(e) => return self.fail(&id, e.to_string()),
        };
        if history.iter().any(|r| r.is_same_match(&record)) {
            info!(completion = %id, "match already in history");
            self.finish(&id, Notice::AlreadySaved(id.clone()));
            return SaveOutcome::AlreadySaved;
        }

        match self.store.store_match(record).await {
            Ok(()) => {
                info!(completion = %id, "match saved to history");
                self.finish(&id, Notice::Saved(id.clone()));
                SaveOutcome::Saved
            }
            Err(e) => self.fail(&id, e.to_string()),
        }
    }
}

/// Save every completion of `session` in the background.
///
/// Each completion is saved from the state carried by its signal, so events
/// applied after it (a reset, the next match) cannot hide it. The task ends
/// when the session is dropped.
pub fn spawn_completion_watcher<S>(
    notifier: Arc<CompletionNotifier<S>>,
    session: &Arc<ScoringSession>,
) -> JoinHandle<()>
where
    S: MatchStore + ?Sized + 'static,
{
    let mut signals = session.subscribe();
    let session: Weak<ScoringSession> = Arc::downgrade(session);

    tokio::spawn(async move {
        loop {
            let state = match signals.recv().await {
                Ok(MatchSignal::MatchCompleted(state)) => state,
                Ok(_) => continue,
                // Missed signals; the best left is the current state
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "completion watcher lagged");
                    let Some(session) = session.upgrade() else {
                        break;
                    };
                    session.state()
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            notifier.observe(&state).await;
        }
    })
}

/// Submit `events` in order, saving each match the moment it completes.
///
/// Returns how many events were rejected and the outcome of every save.
pub async fn submit_and_save<S, E>(
    notifier: &CompletionNotifier<S>,
    session: &ScoringSession,
    events: E,
) -> (usize, Vec<SaveOutcome>)
where
    S: MatchStore + ?Sized,
    E: IntoIterator<Item = ScoringEvent>,
{
    let mut rejected = 0;
    let mut saves = Vec::new();
    for event in events {
        let submitted = session.submit(event);
        if !submitted.applied {
            rejected += 1;
            continue;
        }
        for signal in &submitted.signals {
            if let MatchSignal::MatchCompleted(state) = signal {
                saves.push(notifier.observe(state).await);
            }
        }
    }
    (rejected, saves)
}
