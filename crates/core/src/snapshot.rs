use arrayvec::ArrayVec;

use crate::match_state::{Innings, MatchState};
use crate::types::{Batter, Bowler, BALLS_PER_OVER};

#[derive(Debug, Clone, PartialEq)]
pub struct BatterLine {
    pub name: String,
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub strike_rate: f64,
    pub on_strike: bool,
}

impl BatterLine {
    fn new(batter: &Batter, on_strike: bool) -> Self {
        Self {
            name: batter.name.clone(),
            runs: batter.runs,
            balls_faced: batter.balls_faced,
            fours: batter.fours,
            sixes: batter.sixes,
            strike_rate: batter.strike_rate(),
            on_strike,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BowlerLine {
    pub name: String,
    pub overs: u32,
    pub balls: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub economy_rate: f64,
}

impl From<&Bowler> for BowlerLine {
    fn from(bowler: &Bowler) -> Self {
        Self {
            name: bowler.name.clone(),
            overs: bowler.overs,
            balls: bowler.balls,
            runs_conceded: bowler.runs_conceded,
            wickets: bowler.wickets,
            economy_rate: bowler.economy_rate(),
        }
    }
}

/// Second-innings chase figures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseSnapshot {
    pub target: u32,
    pub runs_needed: u32,
    /// Absent once no balls remain
    pub required_run_rate: Option<f64>,
}

/// Read-only scoreboard view of a match
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreSnapshot {
    pub batting_team: String,
    pub bowling_team: String,
    pub innings: Innings,
    pub runs: u32,
    pub wickets: u32,
    pub overs: u32,
    pub balls: u32,
    pub current_run_rate: f64,
    pub balls_remaining: u32,
    pub projected_total: u32,
    pub chase: Option<ChaseSnapshot>,
    /// Striker first
    pub crease: ArrayVec<BatterLine, 2>,
    pub bowler: Option<BowlerLine>,
    /// Notation of the deliveries in the current over
    pub this_over: Vec<String>,
    pub needs_bowler_change: bool,
    pub innings_complete: bool,
    pub match_complete: bool,
    pub innings_transition_pending: bool,
}

impl ScoreSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn overs_display(&self) -> String {
        format!("{}.{}", self.overs, self.balls)
    }

    /// `"Lions 150/6 (20.0 ov)"`
    pub fn score_line(&self) -> String {
        format!(
            "{} {}/{} ({} ov)",
            self.batting_team,
            self.runs,
            self.wickets,
            self.overs_display()
        )
    }

    pub fn playable(&self) -> bool {
        !self.innings_complete && !self.match_complete
    }
}

impl MatchState {
    pub fn snapshot_into(&self, out: &mut ScoreSnapshot) {
        let total_balls = self.total_balls();
        let runs = self.total_runs();

        out.batting_team.clone_from(&self.batting_team);
        out.bowling_team.clone_from(&self.bowling_team);
        out.innings = self.current_innings();
        out.runs = runs;
        out.wickets = self.total_wickets();
        out.overs = self.total_overs();
        out.balls = self.ball_in_over();
        out.balls_remaining = self.balls_remaining();

        out.current_run_rate = if total_balls > 0 {
            runs as f64 / total_balls as f64 * BALLS_PER_OVER as f64
        } else {
            0.0
        };
        out.projected_total = if total_balls > 0 {
            (runs as f64 + out.current_run_rate * out.balls_remaining as f64 / 6.0).round() as u32
        } else {
            0
        };

        out.chase = self.target().map(|target| {
            let runs_needed = target.saturating_sub(runs);
            let required_run_rate = (out.balls_remaining > 0).then(|| {
                runs_needed as f64 / out.balls_remaining as f64 * BALLS_PER_OVER as f64
            });
            ChaseSnapshot {
                target,
                runs_needed,
                required_run_rate,
            }
        });

        out.crease.clear();
        if let Some(striker) = self.striker_batter() {
            out.crease.push(BatterLine::new(striker, true));
        }
        if let Some(non_striker) = self.non_striker_batter() {
            out.crease.push(BatterLine::new(non_striker, false));
        }
        out.bowler = self.current_bowler().map(BowlerLine::from);

        // Walk back to the first delivery of the current over
        let wanted = self.ball_in_over();
        let mut legal = 0;
        out.this_over.clear();
        for delivery in self.deliveries().iter().rev() {
            if delivery.is_legal() {
                if legal == wanted {
                    break;
                }
                legal += 1;
            }
            out.this_over.push(delivery.notation());
        }
        out.this_over.reverse();

        out.needs_bowler_change = self.needs_bowler_change();
        out.innings_complete = self.is_innings_complete();
        out.match_complete = self.is_match_complete();
        out.innings_transition_pending = self.innings_transition_pending();
    }

    pub fn snapshot(&self) -> ScoreSnapshot {
        let mut s = ScoreSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
