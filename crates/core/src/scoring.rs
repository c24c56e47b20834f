//! Scoring module - match result, margin and individual highlights
//!
//! Result rules (decided only once the second innings is over):
//! - chasing side passed the first innings total: chasing side wins by the
//!   wickets it still had in hand (`10 - wickets lost`)
//! - scores level: tie, no margin
//! - otherwise the defending side wins by the run difference
//!
//! Highlights follow the scorer's conventions: strike-rate awards need at
//! least 10 balls faced, economy awards at least 2 completed overs. Earlier
//! entries win ties.

use crate::match_state::{Innings, MatchState};
use crate::types::{
    Batter, Bowler, MAX_WICKETS, MIN_BALLS_FOR_STRIKE_RATE, MIN_OVERS_FOR_ECONOMY, TIE_MARKER,
};

/// Winning margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Margin {
    Wickets(u32),
    Runs(u32),
}

impl Margin {
    /// `"by 6 wickets"`, `"by 1 run"`
    pub fn describe(&self) -> String {
        let (n, unit) = match self {
            Margin::Wickets(n) => (*n, "wicket"),
            Margin::Runs(n) => (*n, "run"),
        };
        let plural = if n == 1 { "" } else { "s" };
        format!("by {n} {unit}{plural}")
    }
}

/// Outcome of a completed match
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchResult {
    Won { team: String, margin: Margin },
    Tie,
}

impl MatchResult {
    /// Winner label as stored in history: team name or the tie marker
    pub fn winner_label(&self) -> &str {
        match self {
            MatchResult::Won { team, .. } => team,
            MatchResult::Tie => TIE_MARKER,
        }
    }

    pub fn margin(&self) -> Option<Margin> {
        match self {
            MatchResult::Won { margin, .. } => Some(*margin),
            MatchResult::Tie => None,
        }
    }

    /// `"Tigers won by 6 wickets"` / `"Match Tied"`
    pub fn describe(&self) -> String {
        match self {
            MatchResult::Won { team, margin } => format!("{team} won {}", margin.describe()),
            MatchResult::Tie => TIE_MARKER.to_string(),
        }
    }
}

/// Decide the result from both innings' totals.
pub fn decide_result(
    defending_team: &str,
    defending_runs: u32,
    chasing_team: &str,
    chasing_runs: u32,
    chasing_wickets: u32,
) -> MatchResult {
    use std::cmp::Ordering;

    match chasing_runs.cmp(&defending_runs) {
        Ordering::Greater => MatchResult::Won {
            team: chasing_team.to_string(),
            margin: Margin::Wickets(MAX_WICKETS.saturating_sub(chasing_wickets)),
        },
        Ordering::Equal => MatchResult::Tie,
        Ordering::Less => MatchResult::Won {
            team: defending_team.to_string(),
            margin: Margin::Runs(defending_runs - chasing_runs),
        },
    }
}

/// Result of the match, once the second innings has finished
pub fn match_result(state: &MatchState) -> Option<MatchResult> {
    if !state.is_match_complete() || state.current_innings() != Innings::Second {
        return None;
    }
    let first = state.first_innings()?;
    Some(decide_result(
        &first.batting_team,
        first.runs,
        state.batting_team(),
        state.total_runs(),
        state.total_wickets(),
    ))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattingHighlight {
    pub name: String,
    pub runs: u32,
    pub balls_faced: u32,
    pub strike_rate: f64,
}

impl From<&Batter> for BattingHighlight {
    fn from(b: &Batter) -> Self {
        Self {
            name: b.name.clone(),
            runs: b.runs,
            balls_faced: b.balls_faced,
            strike_rate: b.strike_rate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BowlingHighlight {
    pub name: String,
    pub wickets: u32,
    pub runs_conceded: u32,
    pub overs: u32,
    pub balls: u32,
    pub economy_rate: f64,
}

impl From<&Bowler> for BowlingHighlight {
    fn from(b: &Bowler) -> Self {
        Self {
            name: b.name.clone(),
            wickets: b.wickets,
            runs_conceded: b.runs_conceded,
            overs: b.overs,
            balls: b.balls,
            economy_rate: b.economy_rate(),
        }
    }
}

/// Standout individual performances across a match
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchHighlights {
    pub top_scorer: Option<BattingHighlight>,
    pub highest_strike_rate: Option<BattingHighlight>,
    pub top_wicket_taker: Option<BowlingHighlight>,
    pub best_economy: Option<BowlingHighlight>,
}

/// Keep the first maximum under `better`
fn best_by<'a, T, F>(items: impl IntoIterator<Item = &'a T>, better: F) -> Option<&'a T>
where
    T: 'a,
    F: Fn(&T, &T) -> bool,
{
    items.into_iter().fold(None, |best, item| match best {
        Some(current) if !better(item, current) => Some(current),
        _ => Some(item),
    })
}

/// Compute highlights over every batter and bowler of a match.
pub fn highlights<'a, B, W>(batters: B, bowlers: W) -> MatchHighlights
where
    B: IntoIterator<Item = &'a Batter>,
    W: IntoIterator<Item = &'a Bowler>,
{
    let batters: Vec<&Batter> = batters.into_iter().collect();
    let bowlers: Vec<&Bowler> = bowlers.into_iter().collect();

    let top_scorer = best_by(batters.iter().copied(), |a, b| a.runs > b.runs);
    let highest_strike_rate = best_by(
        batters
            .iter()
            .copied()
            .filter(|b| b.balls_faced >= MIN_BALLS_FOR_STRIKE_RATE),
        |a, b| a.strike_rate() > b.strike_rate(),
    );
    let top_wicket_taker = best_by(bowlers.iter().copied(), |a, b| a.wickets > b.wickets);
    let best_economy = best_by(
        bowlers
            .iter()
            .copied()
            .filter(|b| b.overs >= MIN_OVERS_FOR_ECONOMY),
        |a, b| a.economy_rate() < b.economy_rate(),
    );

    MatchHighlights {
        top_scorer: top_scorer.map(BattingHighlight::from),
        highest_strike_rate: highest_strike_rate.map(BattingHighlight::from),
        top_wicket_taker: top_wicket_taker.map(BowlingHighlight::from),
        best_economy: best_economy.map(BowlingHighlight::from),
    }
}

/// Highlights across the frozen first innings and the live innings
pub fn match_highlights(state: &MatchState) -> MatchHighlights {
    let (first_batters, first_bowlers) = match state.first_innings() {
        Some(first) => (first.batters.as_slice(), first.bowlers.as_slice()),
        None => (&[][..], &[][..]),
    };
    highlights(
        first_batters.iter().chain(state.batters()),
        first_bowlers.iter().chain(state.bowlers()),
    )
}
