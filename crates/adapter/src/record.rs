//! Record module - the persisted shape of a completed match
//!
//! Field names are camelCase on the wire so histories written by earlier
//! scorers load unchanged. Reads are lenient: optional fields that older
//! records lack (date, dismissal, toss choice, boundary counts) default.

use serde::{Deserialize, Serialize};

use cricket_scorer_core::types::{
    strike_rate, Batter, Bowler, InningsSnapshot, BALLS_PER_OVER, MAX_WICKETS, TIE_MARKER,
};
use cricket_scorer_core::{highlights, match_result, Margin, MatchHighlights, MatchState};

/// Innings played in every completed match
pub const COMPLETED_TURNS: u32 = 2;

/// Dismissal text recorded for every dismissed batter
pub const DISMISSAL_OUT: &str = "out";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TossChoice {
    Bat,
    Bowl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TossRecord {
    pub winning_team: String,
    /// Only present on legacy records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice: Option<TossChoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dismissal {
    pub batsman: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterRecord {
    pub name: String,
    pub runs: u32,
    pub balls_faced: u32,
    pub strike_rate: f64,
    #[serde(default, rename = "dismissals", skip_serializing_if = "Option::is_none")]
    pub dismissal: Option<Dismissal>,
    #[serde(default)]
    pub retired: bool,
    #[serde(default)]
    pub fours: u32,
    #[serde(default)]
    pub sixes: u32,
}

impl From<&Batter> for BatterRecord {
    fn from(b: &Batter) -> Self {
        Self {
            name: b.name.clone(),
            runs: b.runs,
            balls_faced: b.balls_faced,
            strike_rate: b.strike_rate(),
            dismissal: b.is_out.then(|| Dismissal {
                batsman: b.name.clone(),
                description: DISMISSAL_OUT.to_string(),
            }),
            retired: b.retired,
            fours: b.fours,
            sixes: b.sixes,
        }
    }
}

impl BatterRecord {
    pub fn is_out(&self) -> bool {
        self.dismissal.is_some()
    }

    /// Rebuild the engine-side batter under `id`
    pub fn to_batter(&self, id: impl Into<String>) -> Batter {
        let mut batter = Batter::new(id, self.name.clone());
        batter.runs = self.runs;
        batter.balls_faced = self.balls_faced;
        batter.fours = self.fours;
        batter.sixes = self.sixes;
        batter.is_out = self.is_out();
        batter.retired = self.retired;
        batter
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlerRecord {
    pub name: String,
    pub overs: u32,
    pub balls: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub economy_rate: f64,
}

impl From<&Bowler> for BowlerRecord {
    fn from(b: &Bowler) -> Self {
        Self {
            name: b.name.clone(),
            overs: b.overs,
            balls: b.balls,
            runs_conceded: b.runs_conceded,
            wickets: b.wickets,
            economy_rate: b.economy_rate(),
        }
    }
}

impl BowlerRecord {
    pub fn to_bowler(&self, id: impl Into<String>) -> Bowler {
        let mut bowler = Bowler::new(id, self.name.clone());
        bowler.overs = self.overs;
        bowler.balls = self.balls;
        bowler.runs_conceded = self.runs_conceded;
        bowler.wickets = self.wickets;
        bowler
    }
}

/// Byes and leg byes are not scored and always zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtrasRecord {
    #[serde(default)]
    pub wides: u32,
    /// Every run conceded off no-balls, penalty included
    #[serde(default)]
    pub no_balls: u32,
    #[serde(default)]
    pub byes: u32,
    #[serde(default)]
    pub leg_byes: u32,
}

impl ExtrasRecord {
    pub fn total(&self) -> u32 {
        self.wides + self.no_balls + self.byes + self.leg_byes
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InningsRecord {
    pub batsmen: Vec<BatterRecord>,
    pub bowlers: Vec<BowlerRecord>,
    #[serde(default)]
    pub extras: ExtrasRecord,
    pub total_score: u32,
    pub wickets: u32,
    /// Completed overs
    pub overs: u32,
    /// Legal balls of an unfinished over
    #[serde(default)]
    pub balls: u32,
}

impl From<&InningsSnapshot> for InningsRecord {
    fn from(innings: &InningsSnapshot) -> Self {
        Self {
            batsmen: innings.batters.iter().map(BatterRecord::from).collect(),
            bowlers: innings.bowlers.iter().map(BowlerRecord::from).collect(),
            extras: ExtrasRecord {
                wides: innings.extras.wides,
                no_balls: innings.extras.no_ball_runs,
                byes: 0,
                leg_byes: 0,
            },
            total_score: innings.runs,
            wickets: innings.wickets,
            overs: innings.overs,
            balls: innings.balls,
        }
    }
}

impl InningsRecord {
    pub fn batters(&self) -> Vec<Batter> {
        self.batsmen
            .iter()
            .enumerate()
            .map(|(i, b)| b.to_batter(format!("player-{}", i + 1)))
            .collect()
    }

    pub fn bowlers(&self) -> Vec<Bowler> {
        self.bowlers
            .iter()
            .enumerate()
            .map(|(i, b)| b.to_bowler(format!("bowler-{}", i + 1)))
            .collect()
    }

    pub fn total_balls(&self) -> u32 {
        self.overs.saturating_mul(BALLS_PER_OVER).saturating_add(self.balls)
    }

    /// `"151/4 (18.3 ov)"`
    pub fn score_line(&self) -> String {
        format!(
            "{}/{} ({}.{} ov)",
            self.total_score, self.wickets, self.overs, self.balls
        )
    }

    /// Batting strike rate of the whole side
    pub fn team_strike_rate(&self) -> f64 {
        let balls: u32 = self.batsmen.iter().map(|b| b.balls_faced).sum();
        let runs: u32 = self.batsmen.iter().map(|b| b.runs).sum();
        strike_rate(runs, balls)
    }
}

/// One completed match as kept in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub team_a: String,
    pub team_b: String,
    pub overs: u32,
    /// Winning team name or [`TIE_MARKER`]
    pub winner: String,
    #[serde(default = "default_turns")]
    pub turns: u32,
    pub team_a_score: u32,
    pub team_b_score: u32,
    pub toss_info: TossRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub innings1: InningsRecord,
    pub innings2: InningsRecord,
}

fn default_turns() -> u32 {
    COMPLETED_TURNS
}

impl MatchRecord {
    /// Build the record of a completed match; `None` until the second
    /// innings has finished.
    pub fn from_completed(state: &MatchState) -> Option<Self> {
        let result = match_result(state)?;
        let first = state.first_innings()?;
        let toss = state.toss()?;
        let second = state.innings_snapshot();

        let (team_a_score, team_b_score) = if first.batting_team == state.team_a() {
            (first.runs, second.runs)
        } else {
            (second.runs, first.runs)
        };
        let date = Some(state.match_date().to_string()).filter(|d| !d.is_empty());

        Some(Self {
            team_a: state.team_a().to_string(),
            team_b: state.team_b().to_string(),
            overs: state.match_overs(),
            winner: result.winner_label().to_string(),
            turns: COMPLETED_TURNS,
            team_a_score,
            team_b_score,
            toss_info: TossRecord {
                winning_team: toss.winner.clone(),
                choice: None,
            },
            date,
            innings1: InningsRecord::from(first),
            innings2: InningsRecord::from(&second),
        })
    }

    pub fn is_tie(&self) -> bool {
        self.winner == TIE_MARKER
    }

    fn other_team(&self, team: &str) -> &str {
        if team == self.team_a {
            &self.team_b
        } else {
            &self.team_a
        }
    }

    /// Team that batted in the first innings.
    ///
    /// Legacy records carry the toss choice and are answered from it. Newer
    /// ones are matched by score; team A when both scores are level.
    pub fn first_innings_batting_team(&self) -> &str {
        if let Some(choice) = self.toss_info.choice {
            let winner = self.toss_info.winning_team.as_str();
            return match choice {
                TossChoice::Bat => winner,
                TossChoice::Bowl => self.other_team(winner),
            };
        }

        let first_total = self.innings1.total_score;
        let a = self.team_a_score == first_total;
        let b = self.team_b_score == first_total;
        if b && !a {
            &self.team_b
        } else {
            &self.team_a
        }
    }

    pub fn second_innings_batting_team(&self) -> &str {
        self.other_team(self.first_innings_batting_team())
    }

    pub fn score_of(&self, team: &str) -> Option<u32> {
        if team == self.team_a {
            Some(self.team_a_score)
        } else if team == self.team_b {
            Some(self.team_b_score)
        } else {
            None
        }
    }

    pub fn involves(&self, team: &str) -> bool {
        self.team_a == team || self.team_b == team
    }

    /// Winning margin as recorded; `None` for a tie or an unknown winner
    pub fn margin(&self) -> Option<Margin> {
        if self.is_tie() {
            return None;
        }
        if self.winner == self.first_innings_batting_team() {
            let runs = self
                .innings1
                .total_score
                .saturating_sub(self.innings2.total_score);
            Some(Margin::Runs(runs))
        } else if self.winner == self.second_innings_batting_team() {
            Some(Margin::Wickets(
                MAX_WICKETS.saturating_sub(self.innings2.wickets),
            ))
        } else {
            None
        }
    }

    /// `"Tigers won by 6 wickets"`
    pub fn result_line(&self) -> String {
        match self.margin() {
            Some(margin) => format!("{} won {}", self.winner, margin.describe()),
            None => self.winner.clone(),
        }
    }

    /// Same match as `other` by teams, overs, scores, winner and date
    pub fn is_same_match(&self, other: &MatchRecord) -> bool {
        self.team_a == other.team_a
            && self.team_b == other.team_b
            && self.overs == other.overs
            && self.team_a_score == other.team_a_score
            && self.team_b_score == other.team_b_score
            && self.winner == other.winner
            && self.date == other.date
    }

    pub fn highlights(&self) -> MatchHighlights {
        let batters: Vec<Batter> = self
            .innings1
            .batters()
            .into_iter()
            .chain(self.innings2.batters())
            .collect();
        let bowlers: Vec<Bowler> = self
            .innings1
            .bowlers()
            .into_iter()
            .chain(self.innings2.bowlers())
            .collect();
        highlights(&batters, &bowlers)
    }
}
