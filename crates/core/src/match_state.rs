//! Match state module - the full snapshot of a match in progress
//!
//! `MatchState` holds the live totals, who is at the crease, who is bowling,
//! both rosters and the delivery log of the current innings, plus the frozen
//! first innings once it ends. Fields are crate-private: the only way to
//! change a match from outside this crate is through the transitions in
//! [`crate::engine`].
//!
//! # Invariants
//!
//! After every transition:
//!
//! - `0 <= total_wickets <= 10`, and ten wickets means the innings is complete
//! - `total_balls % 6` is the ball within the over, `total_balls / 6` the
//!   completed overs
//! - exactly one slot is on strike
//! - once the match is complete the totals never change again
//! - a dismissed or retired batter never occupies a crease slot

use crate::types::{
    Batter, Bowler, Delivery, Extras, InningsSnapshot, Slot, TossInfo, BALLS_PER_OVER,
    DEFAULT_MATCH_OVERS,
};

/// Which innings is being played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Innings {
    #[default]
    First,
    Second,
}

impl Innings {
    pub fn number(&self) -> u8 {
        match self {
            Innings::First => 1,
            Innings::Second => 2,
        }
    }
}

/// Complete match state
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    pub(crate) total_runs: u32,
    pub(crate) total_wickets: u32,
    pub(crate) total_overs: u32,
    pub(crate) total_balls: u32,
    /// Crease slots hold roster ids; either may be empty
    pub(crate) current_batters: [Option<String>; 2],
    pub(crate) striker: Slot,
    pub(crate) current_bowler: Option<String>,
    pub(crate) batters: Vec<Batter>,
    pub(crate) bowlers: Vec<Bowler>,
    pub(crate) deliveries: Vec<Delivery>,
    pub(crate) extras: Extras,
    pub(crate) match_overs: u32,
    pub(crate) is_match_started: bool,
    pub(crate) needs_bowler_change: bool,
    pub(crate) team_a: String,
    pub(crate) team_b: String,
    pub(crate) batting_team: String,
    pub(crate) bowling_team: String,
    pub(crate) toss: Option<TossInfo>,
    pub(crate) current_innings: Innings,
    pub(crate) first_innings: Option<InningsSnapshot>,
    pub(crate) is_innings_complete: bool,
    pub(crate) is_match_complete: bool,
    /// Innings break pending: the consumer should offer to start innings two
    pub(crate) innings_transition_pending: bool,
    pub(crate) match_date: String,
}

impl MatchState {
    /// Fresh, unstarted match
    pub fn new() -> Self {
        Self {
            total_runs: 0,
            total_wickets: 0,
            total_overs: 0,
            total_balls: 0,
            current_batters: [None, None],
            striker: Slot::First,
            current_bowler: None,
            batters: Vec::new(),
            bowlers: Vec::new(),
            deliveries: Vec::new(),
            extras: Extras::default(),
            match_overs: DEFAULT_MATCH_OVERS,
            is_match_started: false,
            needs_bowler_change: false,
            team_a: String::new(),
            team_b: String::new(),
            batting_team: String::new(),
            bowling_team: String::new(),
            toss: None,
            current_innings: Innings::First,
            first_innings: None,
            is_innings_complete: false,
            is_match_complete: false,
            innings_transition_pending: false,
            match_date: String::new(),
        }
    }

    pub fn total_runs(&self) -> u32 {
        self.total_runs
    }

    pub fn total_wickets(&self) -> u32 {
        self.total_wickets
    }

    /// Completed overs in the current innings
    pub fn total_overs(&self) -> u32 {
        self.total_overs
    }

    /// Legal balls bowled in the current innings
    pub fn total_balls(&self) -> u32 {
        self.total_balls
    }

    pub fn ball_in_over(&self) -> u32 {
        self.total_balls % BALLS_PER_OVER
    }

    /// `O.B` overs notation, e.g. `18.3`
    pub fn overs_display(&self) -> String {
        format!("{}.{}", self.total_overs, self.ball_in_over())
    }

    pub fn striker(&self) -> Slot {
        self.striker
    }

    pub fn slot_id(&self, slot: Slot) -> Option<&str> {
        self.current_batters[slot.index()].as_deref()
    }

    /// Batter occupying `slot`, if any
    pub fn batter_in(&self, slot: Slot) -> Option<&Batter> {
        let id = self.slot_id(slot)?;
        self.batters.iter().find(|b| b.id == id)
    }

    pub fn striker_batter(&self) -> Option<&Batter> {
        self.batter_in(self.striker)
    }

    pub fn non_striker_batter(&self) -> Option<&Batter> {
        self.batter_in(self.striker.other())
    }

    pub fn current_bowler(&self) -> Option<&Bowler> {
        let id = self.current_bowler.as_deref()?;
        self.bowlers.iter().find(|b| b.id == id)
    }

    /// Every batter of the current innings, in order of arrival
    pub fn batters(&self) -> &[Batter] {
        &self.batters
    }

    pub fn bowlers(&self) -> &[Bowler] {
        &self.bowlers
    }

    /// Delivery log of the current innings
    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    pub fn extras(&self) -> Extras {
        self.extras
    }

    pub fn match_overs(&self) -> u32 {
        self.match_overs
    }

    pub fn is_match_started(&self) -> bool {
        self.is_match_started
    }

    pub fn needs_bowler_change(&self) -> bool {
        self.needs_bowler_change
    }

    pub fn team_a(&self) -> &str {
        &self.team_a
    }

    pub fn team_b(&self) -> &str {
        &self.team_b
    }

    pub fn batting_team(&self) -> &str {
        &self.batting_team
    }

    pub fn bowling_team(&self) -> &str {
        &self.bowling_team
    }

    pub fn toss(&self) -> Option<&TossInfo> {
        self.toss.as_ref()
    }

    pub fn current_innings(&self) -> Innings {
        self.current_innings
    }

    pub fn first_innings(&self) -> Option<&InningsSnapshot> {
        self.first_innings.as_ref()
    }

    pub fn is_innings_complete(&self) -> bool {
        self.is_innings_complete
    }

    pub fn is_match_complete(&self) -> bool {
        self.is_match_complete
    }

    pub fn innings_transition_pending(&self) -> bool {
        self.innings_transition_pending
    }

    pub fn match_date(&self) -> &str {
        &self.match_date
    }

    /// Legal balls allowed per innings; saturates for huge overs limits
    pub fn innings_balls(&self) -> u32 {
        self.match_overs.saturating_mul(BALLS_PER_OVER)
    }

    /// Legal balls left before the overs limit is reached
    pub fn balls_remaining(&self) -> u32 {
        self.innings_balls().saturating_sub(self.total_balls)
    }

    /// Chasing target in the second innings
    pub fn target(&self) -> Option<u32> {
        match self.current_innings {
            Innings::Second => self.first_innings.as_ref().map(InningsSnapshot::target),
            Innings::First => None,
        }
    }

    /// Freeze the live innings into a snapshot
    pub fn innings_snapshot(&self) -> InningsSnapshot {
        InningsSnapshot {
            runs: self.total_runs,
            wickets: self.total_wickets,
            overs: self.total_balls / BALLS_PER_OVER,
            balls: self.total_balls % BALLS_PER_OVER,
            batting_team: self.batting_team.clone(),
            bowling_team: self.bowling_team.clone(),
            extras: self.extras,
            batters: self.batters.clone(),
            bowlers: self.bowlers.clone(),
        }
    }

    /// Check the structural invariants; used by tests and debug assertions.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.total_wickets > crate::types::MAX_WICKETS {
            return Err(format!("wickets {} exceed ten", self.total_wickets));
        }
        if self.total_wickets == crate::types::MAX_WICKETS && !self.is_innings_complete {
            return Err("ten wickets down but innings still open".to_string());
        }
        if self.total_overs != self.total_balls / BALLS_PER_OVER {
            return Err(format!(
                "overs {} do not match balls {}",
                self.total_overs, self.total_balls
            ));
        }
        for slot in [Slot::First, Slot::Second] {
            if let Some(id) = self.slot_id(slot) {
                match self.batters.iter().find(|b| b.id == id) {
                    Some(b) if !b.is_available() => {
                        return Err(format!("unavailable batter {} at the crease", b.name));
                    }
                    None => return Err(format!("slot holds unknown batter id {id}")),
                    _ => {}
                }
            }
        }
        if let (Some(a), Some(b)) = (self.slot_id(Slot::First), self.slot_id(Slot::Second)) {
            if a == b {
                return Err("same batter in both slots".to_string());
            }
        }
        let legal = self.deliveries.iter().filter(|d| d.is_legal()).count() as u32;
        if legal != self.total_balls {
            return Err(format!(
                "{legal} legal deliveries logged but {} balls counted",
                self.total_balls
            ));
        }
        if self.is_match_complete && !self.is_innings_complete {
            return Err("match complete with innings still open".to_string());
        }
        Ok(())
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_state() {
        let state = MatchState::new();
        assert_eq!(state.total_runs(), 0);
        assert_eq!(state.total_wickets(), 0);
        assert_eq!(state.match_overs(), DEFAULT_MATCH_OVERS);
        assert_eq!(state.current_innings(), Innings::First);
        assert!(!state.is_match_started());
        assert!(state.striker_batter().is_none());
        assert!(state.current_bowler().is_none());
        assert!(state.first_innings().is_none());
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_overs_display_and_balls_remaining() {
        let mut state = MatchState::new();
        state.total_balls = 111;
        state.total_overs = 18;
        assert_eq!(state.overs_display(), "18.3");
        assert_eq!(state.balls_remaining(), 9);
    }

    #[test]
    fn test_innings_balls_saturate() {
        let mut state = MatchState::new();
        assert_eq!(state.innings_balls(), DEFAULT_MATCH_OVERS * BALLS_PER_OVER);

        state.match_overs = u32::MAX;
        state.total_balls = 12;
        assert_eq!(state.innings_balls(), u32::MAX);
        assert_eq!(state.balls_remaining(), u32::MAX - 12);
    }

    #[test]
    fn test_target_only_in_second_innings() {
        let mut state = MatchState::new();
        state.total_runs = 150;
        let snapshot = state.innings_snapshot();
        assert_eq!(state.target(), None);

        state.current_innings = Innings::Second;
        state.first_innings = Some(snapshot);
        assert_eq!(state.target(), Some(151));
    }

    #[test]
    fn test_invariants_reject_dismissed_batter_at_crease() {
        let mut state = MatchState::new();
        let mut batter = Batter::new("player-1", "Out Already");
        batter.is_out = true;
        state.batters.push(batter);
        state.current_batters[0] = Some("player-1".to_string());
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn test_innings_number() {
        assert_eq!(Innings::First.number(), 1);
        assert_eq!(Innings::Second.number(), 2);
    }
}
