//! Scoring engine - the transition function over [`MatchState`]
//!
//! Every event is applied by [`transition`] (or its in-place form
//! [`MatchState::apply`]). Transitions are total: an event whose
//! preconditions do not hold leaves the state exactly as it was. Guards are
//! evaluated before anything is touched, so a rejected event never leaves a
//! partially applied state behind.
//!
//! # Delivery rules
//!
//! | Event | Legal ball | Batter ball faced | Runs to total |
//! |-------|------------|-------------------|---------------|
//! | `AddRuns(n)` | yes | yes | `n` |
//! | `AddWide` | no | no | 1 |
//! | `AddNoBall(n)` | no | no | `n + 1` |
//! | `AddWicket` | yes | yes | 0 |
//!
//! Strike changes after `AddRuns(n)` when `n` is odd or the ball completed
//! the over. Both together still produce a single swap.
//!
//! # Completion
//!
//! After a delivery the engine checks, in order: target passed (innings two),
//! all out, overs exhausted. Ending innings one raises the innings-break flag;
//! ending innings two completes the match.

use tracing::{debug, info, trace};

use crate::ids::{IdKind, IdSource};
use crate::match_state::{Innings, MatchState};
use crate::types::{
    Batter, Bowler, Delivery, DeliveryKind, MatchSetup, ScoringEvent, Slot, BALLS_PER_OVER,
    MAX_WICKETS,
};

/// Apply `event` to `state`, returning the next state.
///
/// Inadmissible events return an unchanged copy of `state`.
pub fn transition<I: IdSource + ?Sized>(
    state: &MatchState,
    event: &ScoringEvent,
    ids: &mut I,
) -> MatchState {
    let mut next = state.clone();
    if next.apply(event, ids) {
        next
    } else {
        state.clone()
    }
}

/// Replay a sequence of events from a fresh match.
pub fn replay<'a, I, E>(events: E, ids: &mut I) -> MatchState
where
    I: IdSource + ?Sized,
    E: IntoIterator<Item = &'a ScoringEvent>,
{
    let mut state = MatchState::new();
    for event in events {
        state.apply(event, ids);
    }
    state
}

impl MatchState {
    /// Apply `event` in place; returns whether the event was admissible.
    pub fn apply<I: IdSource + ?Sized>(&mut self, event: &ScoringEvent, ids: &mut I) -> bool {
        let applied = match event {
            ScoringEvent::AddRuns(runs) => self.add_runs(*runs),
            ScoringEvent::AddWide => self.add_wide(),
            ScoringEvent::AddNoBall(runs) => self.add_no_ball(*runs),
            ScoringEvent::AddWicket => self.add_wicket(),
            ScoringEvent::SwapStrike => self.swap_strike(),
            ScoringEvent::AddNewBatsman(name) => self.add_new_batsman(name, ids),
            ScoringEvent::RetireBatsman { slot, replacement } => {
                self.retire_batsman(*slot, replacement, ids)
            }
            ScoringEvent::ChangeBowler(name) => self.change_bowler(name, ids),
            ScoringEvent::StartSecondInnings => self.start_second_innings(),
            ScoringEvent::StartNewMatch(setup) => self.start_new_match(setup),
            ScoringEvent::ResetMatch => self.reset_match(),
        };

        if applied {
            debug!(
                event = event.kind().as_str(),
                innings = self.current_innings.number(),
                runs = self.total_runs,
                wickets = self.total_wickets,
                overs = %self.overs_display(),
                "event applied"
            );
        } else {
            trace!(event = event.kind().as_str(), "event rejected");
        }
        debug_assert!(self.check_invariants().is_ok(), "{:?}", self.check_invariants());

        applied
    }

    /// Deliveries are only scored while an innings is open
    fn accepts_delivery(&self) -> bool {
        self.is_match_started && !self.is_innings_complete && !self.is_match_complete
    }

    fn batter_mut(&mut self, id: &str) -> Option<&mut Batter> {
        self.batters.iter_mut().find(|b| b.id == id)
    }

    fn bowler_mut(&mut self, id: &str) -> Option<&mut Bowler> {
        self.bowlers.iter_mut().find(|b| b.id == id)
    }

    /// Ids of the striker and current bowler, when both are set
    fn striker_and_bowler(&self) -> Option<(String, String)> {
        let striker = self.current_batters[self.striker.index()].clone()?;
        let bowler = self.current_bowler.clone()?;
        Some((striker, bowler))
    }

    /// Count a legal ball on the match totals; returns true when it ended the over.
    ///
    /// The bowler-change flag follows the latest legal ball: raised when it
    /// ended an over, lowered by any other.
    fn count_legal_ball(&mut self) -> bool {
        self.total_balls += 1;
        self.total_overs = self.total_balls / BALLS_PER_OVER;
        let over_complete = self.total_balls % BALLS_PER_OVER == 0;
        self.needs_bowler_change = over_complete;
        over_complete
    }

    fn add_runs(&mut self, runs: u32) -> bool {
        if !self.accepts_delivery() {
            return false;
        }
        let Some((striker_id, bowler_id)) = self.striker_and_bowler() else {
            return false;
        };

        if let Some(batter) = self.batter_mut(&striker_id) {
            batter.runs = batter.runs.saturating_add(runs);
            batter.balls_faced += 1;
            if runs == 4 {
                batter.fours += 1;
            }
            if runs == 6 {
                batter.sixes += 1;
            }
        }
        if let Some(bowler) = self.bowler_mut(&bowler_id) {
            bowler.runs_conceded = bowler.runs_conceded.saturating_add(runs);
            bowler.bowl_legal_ball();
        }

        self.deliveries.push(Delivery {
            runs,
            kind: DeliveryKind::Normal,
            is_wicket: false,
            batter_id: Some(striker_id),
            bowler_id,
        });
        self.total_runs = self.total_runs.saturating_add(runs);
        let over_complete = self.count_legal_ball();

        // Single swap even when an odd run ends the over
        if runs % 2 == 1 || over_complete {
            self.striker = self.striker.other();
        }

        self.check_target_passed();
        self.check_overs_exhausted();
        true
    }

    fn add_wide(&mut self) -> bool {
        if !self.accepts_delivery() {
            return false;
        }
        let Some(bowler_id) = self.current_bowler.clone() else {
            return false;
        };

        if let Some(bowler) = self.bowler_mut(&bowler_id) {
            bowler.runs_conceded += 1;
        }
        self.deliveries.push(Delivery {
            runs: 1,
            kind: DeliveryKind::Wide,
            is_wicket: false,
            batter_id: self.current_batters[self.striker.index()].clone(),
            bowler_id,
        });
        self.extras.wides += 1;
        self.total_runs = self.total_runs.saturating_add(1);

        self.check_target_passed();
        true
    }

    fn add_no_ball(&mut self, runs: u32) -> bool {
        if !self.accepts_delivery() {
            return false;
        }
        let Some(bowler_id) = self.current_bowler.clone() else {
            return false;
        };

        let total = runs.saturating_add(1);
        if let Some(bowler) = self.bowler_mut(&bowler_id) {
            bowler.runs_conceded = bowler.runs_conceded.saturating_add(total);
        }
        self.deliveries.push(Delivery {
            runs: total,
            kind: DeliveryKind::NoBall,
            is_wicket: false,
            batter_id: self.current_batters[self.striker.index()].clone(),
            bowler_id,
        });
        self.extras.no_ball_runs = self.extras.no_ball_runs.saturating_add(total);
        self.total_runs = self.total_runs.saturating_add(total);

        self.check_target_passed();
        true
    }

    fn add_wicket(&mut self) -> bool {
        if !self.accepts_delivery() {
            return false;
        }
        let Some((striker_id, bowler_id)) = self.striker_and_bowler() else {
            return false;
        };

        if let Some(batter) = self.batter_mut(&striker_id) {
            batter.balls_faced += 1;
            batter.is_out = true;
        }
        if let Some(bowler) = self.bowler_mut(&bowler_id) {
            bowler.wickets += 1;
            bowler.bowl_legal_ball();
        }

        self.deliveries.push(Delivery {
            runs: 0,
            kind: DeliveryKind::Normal,
            is_wicket: true,
            batter_id: Some(striker_id),
            bowler_id,
        });
        self.total_wickets += 1;
        self.count_legal_ball();
        self.current_batters[self.striker.index()] = None;

        if self.total_wickets >= MAX_WICKETS {
            info!(
                innings = self.current_innings.number(),
                runs = self.total_runs,
                "all out"
            );
            self.complete_innings();
        }
        self.check_overs_exhausted();
        true
    }

    fn swap_strike(&mut self) -> bool {
        self.striker = self.striker.other();
        true
    }

    fn add_new_batsman<I: IdSource + ?Sized>(&mut self, name: &str, ids: &mut I) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        let batter = Batter::new(ids.next_id(IdKind::Batter), name);
        let slot = if self.current_batters[0].is_none() {
            Slot::First
        } else if self.current_batters[1].is_none() {
            Slot::Second
        } else {
            self.striker
        };
        self.current_batters[slot.index()] = Some(batter.id.clone());
        self.batters.push(batter);
        true
    }

    fn retire_batsman<I: IdSource + ?Sized>(
        &mut self,
        slot: Slot,
        replacement: &str,
        ids: &mut I,
    ) -> bool {
        let replacement = replacement.trim();
        if replacement.is_empty() {
            return false;
        }
        let Some(retiring_id) = self.current_batters[slot.index()].clone() else {
            return false;
        };

        if let Some(batter) = self.batter_mut(&retiring_id) {
            batter.retired = true;
        }
        let batter = Batter::new(ids.next_id(IdKind::Batter), replacement);
        self.current_batters[slot.index()] = Some(batter.id.clone());
        self.batters.push(batter);
        true
    }

    fn change_bowler<I: IdSource + ?Sized>(&mut self, name: &str, ids: &mut I) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        // Re-selecting keeps the bowler's figures across alternating overs
        let id = match self.bowlers.iter().find(|b| b.name == name) {
            Some(existing) => existing.id.clone(),
            None => {
                let bowler = Bowler::new(ids.next_id(IdKind::Bowler), name);
                let id = bowler.id.clone();
                self.bowlers.push(bowler);
                id
            }
        };
        self.current_bowler = Some(id);
        self.needs_bowler_change = false;
        true
    }

    fn start_second_innings(&mut self) -> bool {
        if !self.is_match_started
            || self.current_innings != Innings::First
            || !self.is_innings_complete
            || self.is_match_complete
        {
            return false;
        }

        let first = self.innings_snapshot();
        info!(
            batting_team = %first.batting_team,
            runs = first.runs,
            wickets = first.wickets,
            target = first.target(),
            "second innings started"
        );

        let batting_team = std::mem::take(&mut self.bowling_team);
        let bowling_team = std::mem::take(&mut self.batting_team);

        self.total_runs = 0;
        self.total_wickets = 0;
        self.total_overs = 0;
        self.total_balls = 0;
        self.current_batters = [None, None];
        self.striker = Slot::First;
        self.current_bowler = None;
        self.batters.clear();
        self.bowlers.clear();
        self.deliveries.clear();
        self.extras = Default::default();
        self.needs_bowler_change = false;
        self.current_innings = Innings::Second;
        self.first_innings = Some(first);
        self.is_innings_complete = false;
        self.innings_transition_pending = false;
        self.batting_team = batting_team;
        self.bowling_team = bowling_team;
        true
    }

    fn start_new_match(&mut self, setup: &MatchSetup) -> bool {
        if setup.overs == 0 {
            return false;
        }
        let bowling_team = if setup.batting_team == setup.team_a {
            setup.team_b.clone()
        } else if setup.batting_team == setup.team_b {
            setup.team_a.clone()
        } else {
            return false;
        };

        *self = MatchState::new();
        self.match_overs = setup.overs;
        self.is_match_started = true;
        self.team_a = setup.team_a.clone();
        self.team_b = setup.team_b.clone();
        self.batting_team = setup.batting_team.clone();
        self.bowling_team = bowling_team;
        self.toss = Some(setup.toss.clone());
        self.match_date = setup.date.clone();

        info!(
            team_a = %self.team_a,
            team_b = %self.team_b,
            overs = self.match_overs,
            batting_first = %self.batting_team,
            "new match started"
        );
        true
    }

    fn reset_match(&mut self) -> bool {
        *self = MatchState::new();
        true
    }

    /// Second innings: passing the first innings total wins the match
    fn check_target_passed(&mut self) {
        if self.current_innings != Innings::Second {
            return;
        }
        let Some(first) = self.first_innings.as_ref() else {
            return;
        };
        if self.total_runs > first.runs {
            info!(
                winner = %self.batting_team,
                runs = self.total_runs,
                wickets = self.total_wickets,
                "target passed"
            );
            self.is_innings_complete = true;
            self.is_match_complete = true;
        }
    }

    fn check_overs_exhausted(&mut self) {
        if self.is_innings_complete {
            return;
        }
        if self.total_balls >= self.innings_balls() {
            info!(
                innings = self.current_innings.number(),
                runs = self.total_runs,
                wickets = self.total_wickets,
                "overs exhausted"
            );
            self.complete_innings();
        }
    }

    fn complete_innings(&mut self) {
        self.is_innings_complete = true;
        match self.current_innings {
            Innings::First => self.innings_transition_pending = true,
            Innings::Second => self.is_match_complete = true,
        }
    }
}
