//! Scoring primitives - shared data structures and constants
//!
//! This crate defines the value types used throughout the scorer: batters,
//! bowlers, delivery records, toss information, frozen innings snapshots and
//! the scoring events that drive the engine. All types are pure data with no
//! external dependencies, making them usable in any context (engine, session,
//! persistence boundary).
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BALLS_PER_OVER` | 6 | Legal deliveries in one over |
//! | `MAX_WICKETS` | 10 | Wickets that end an innings (all out) |
//! | `DEFAULT_MATCH_OVERS` | 20 | Overs limit of an unconfigured match |
//! | `MIN_BALLS_FOR_STRIKE_RATE` | 10 | Balls faced to qualify for strike-rate awards |
//! | `MIN_OVERS_FOR_ECONOMY` | 2 | Completed overs to qualify for economy awards |
//!
//! # Derived Fields
//!
//! Strike rate and economy rate are never stored on the live types; they are
//! computed on demand from the cumulative counters.
//!
//! # Examples
//!
//! ```
//! use cricket_scorer_types::{Batter, EventKind, Slot, BALLS_PER_OVER};
//!
//! let mut batter = Batter::new("player-1", "Rahul");
//! batter.runs = 30;
//! batter.balls_faced = 20;
//! assert_eq!(batter.strike_rate(), 150.0);
//!
//! assert_eq!(Slot::First.other(), Slot::Second);
//! assert_eq!(EventKind::from_str("noBall"), Some(EventKind::NoBall));
//! assert_eq!(BALLS_PER_OVER, 6);
//! ```

/// Legal deliveries in one over
pub const BALLS_PER_OVER: u32 = 6;

/// Wickets that end an innings
pub const MAX_WICKETS: u32 = 10;

/// Overs limit used by a freshly reset match
pub const DEFAULT_MATCH_OVERS: u32 = 20;

/// Minimum balls faced before a batter qualifies for the strike-rate highlight
pub const MIN_BALLS_FOR_STRIKE_RATE: u32 = 10;

/// Minimum completed overs before a bowler qualifies for the economy highlight
pub const MIN_OVERS_FOR_ECONOMY: u32 = 2;

/// Winner marker used when both innings finish level
pub const TIE_MARKER: &str = "Match Tied";

pub type PlayerId = String;
pub type BowlerId = String;

/// Strike rate: runs per 100 balls faced, zero with no balls faced.
pub fn strike_rate(runs: u32, balls_faced: u32) -> f64 {
    if balls_faced == 0 {
        return 0.0;
    }
    runs as f64 / balls_faced as f64 * 100.0
}

/// Economy rate: runs conceded per over, zero with no balls bowled.
pub fn economy_rate(runs_conceded: u32, overs: u32, balls: u32) -> f64 {
    let total_overs = overs as f64 + balls as f64 / BALLS_PER_OVER as f64;
    if total_overs <= 0.0 {
        return 0.0;
    }
    runs_conceded as f64 / total_overs
}

/// A batter in the current innings roster
///
/// Created with zero stats when added to the roster and never removed;
/// dismissed and retired batters stay for the scorecard.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Batter {
    pub id: PlayerId,
    pub name: String,
    pub runs: u32,
    pub balls_faced: u32,
    pub fours: u32,
    pub sixes: u32,
    pub is_out: bool,
    pub retired: bool,
}

impl Batter {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            runs: 0,
            balls_faced: 0,
            fours: 0,
            sixes: 0,
            is_out: false,
            retired: false,
        }
    }

    /// Whether this batter may still occupy a crease slot
    pub fn is_available(&self) -> bool {
        !self.is_out && !self.retired
    }

    pub fn strike_rate(&self) -> f64 {
        strike_rate(self.runs, self.balls_faced)
    }
}

/// A bowler in the current innings roster
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bowler {
    pub id: BowlerId,
    pub name: String,
    /// Completed overs
    pub overs: u32,
    /// Legal balls bowled in the current over (0-5)
    pub balls: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    /// Reserved: tracked on the type but never computed by the engine
    pub maidens: u32,
}

impl Bowler {
    pub fn new(id: impl Into<BowlerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            overs: 0,
            balls: 0,
            runs_conceded: 0,
            wickets: 0,
            maidens: 0,
        }
    }

    /// Count one legal ball, rolling over into a completed over at six.
    pub fn bowl_legal_ball(&mut self) {
        self.balls += 1;
        if self.balls == BALLS_PER_OVER {
            self.overs += 1;
            self.balls = 0;
        }
    }

    pub fn economy_rate(&self) -> f64 {
        economy_rate(self.runs_conceded, self.overs, self.balls)
    }

    pub fn total_balls(&self) -> u32 {
        self.overs.saturating_mul(BALLS_PER_OVER).saturating_add(self.balls)
    }
}

/// Legality of a delivery
///
/// Wide and no-ball are mutually exclusive extras; a wicket only falls on a
/// normal (legal) delivery in this rule subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryKind {
    Normal,
    Wide,
    NoBall,
}

/// One entry of the append-only delivery log
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delivery {
    pub runs: u32,
    pub kind: DeliveryKind,
    pub is_wicket: bool,
    /// Striker at the time of the delivery (may be unset on extras)
    pub batter_id: Option<PlayerId>,
    pub bowler_id: BowlerId,
}

impl Delivery {
    pub fn is_wide(&self) -> bool {
        self.kind == DeliveryKind::Wide
    }

    pub fn is_no_ball(&self) -> bool {
        self.kind == DeliveryKind::NoBall
    }

    /// Legal deliveries consume a ball of the over
    pub fn is_legal(&self) -> bool {
        self.kind == DeliveryKind::Normal
    }

    /// Short scorer's notation: `.`, `1`..`6`, `W`, `wd`, `nb+2`
    pub fn notation(&self) -> String {
        match (self.kind, self.is_wicket) {
            (DeliveryKind::Normal, true) => "W".to_string(),
            (DeliveryKind::Normal, false) if self.runs == 0 => ".".to_string(),
            (DeliveryKind::Normal, false) => self.runs.to_string(),
            (DeliveryKind::Wide, _) => "wd".to_string(),
            (DeliveryKind::NoBall, _) if self.runs <= 1 => "nb".to_string(),
            (DeliveryKind::NoBall, _) => format!("nb+{}", self.runs - 1),
        }
    }
}

/// Toss result: winning team name only
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TossInfo {
    pub winner: String,
}

impl TossInfo {
    pub fn new(winner: impl Into<String>) -> Self {
        Self {
            winner: winner.into(),
        }
    }
}

/// Extras conceded during an innings
///
/// `no_ball_runs` holds the full value of every no-ball (penalty plus runs
/// run) since the batter is never credited on a no-ball.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Extras {
    pub wides: u32,
    pub no_ball_runs: u32,
}

impl Extras {
    pub fn total(&self) -> u32 {
        self.wides + self.no_ball_runs
    }
}

/// Frozen copy of the first innings, captured when it ends
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InningsSnapshot {
    pub runs: u32,
    pub wickets: u32,
    pub overs: u32,
    /// Balls within the final, incomplete over
    pub balls: u32,
    pub batting_team: String,
    pub bowling_team: String,
    pub extras: Extras,
    pub batters: Vec<Batter>,
    pub bowlers: Vec<Bowler>,
}

impl InningsSnapshot {
    pub fn total_balls(&self) -> u32 {
        self.overs.saturating_mul(BALLS_PER_OVER).saturating_add(self.balls)
    }

    /// Runs the chasing side needs to win
    pub fn target(&self) -> u32 {
        self.runs + 1
    }
}

/// One of the two crease positions
///
/// The slot pair is ordered: `First` is checked before `Second` when a new
/// batter walks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    First,
    Second,
}

impl Slot {
    pub fn other(&self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Slot::First),
            1 => Some(Slot::Second),
            _ => None,
        }
    }
}

/// Configuration applied by [`ScoringEvent::StartNewMatch`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchSetup {
    pub overs: u32,
    pub team_a: String,
    pub team_b: String,
    pub toss: TossInfo,
    /// Team batting first; the other team bowls first
    pub batting_team: String,
    pub date: String,
}

/// Events accepted by the scoring engine
///
/// These are the only way to change a match. Inadmissible events leave the
/// match untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScoringEvent {
    /// Runs off the bat on a legal delivery
    AddRuns(u32),
    /// Wide: one penalty run, no legal ball
    AddWide,
    /// No-ball with runs run off it: `runs + 1` total, no legal ball
    AddNoBall(u32),
    /// Striker dismissed on a legal delivery
    AddWicket,
    /// Flip which slot is on strike
    SwapStrike,
    /// New batter walks in
    AddNewBatsman(String),
    /// Retire the batter in `slot` and replace them
    RetireBatsman { slot: Slot, replacement: String },
    /// Select (or create) the current bowler
    ChangeBowler(String),
    /// Freeze the first innings and swap sides
    StartSecondInnings,
    /// Reset and configure a new match
    StartNewMatch(MatchSetup),
    /// Discard all progress
    ResetMatch,
}

impl ScoringEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ScoringEvent::AddRuns(_) => EventKind::Runs,
            ScoringEvent::AddWide => EventKind::Wide,
            ScoringEvent::AddNoBall(_) => EventKind::NoBall,
            ScoringEvent::AddWicket => EventKind::Wicket,
            ScoringEvent::SwapStrike => EventKind::SwapStrike,
            ScoringEvent::AddNewBatsman(_) => EventKind::NewBatsman,
            ScoringEvent::RetireBatsman { .. } => EventKind::RetireBatsman,
            ScoringEvent::ChangeBowler(_) => EventKind::ChangeBowler,
            ScoringEvent::StartSecondInnings => EventKind::StartSecondInnings,
            ScoringEvent::StartNewMatch(_) => EventKind::StartNewMatch,
            ScoringEvent::ResetMatch => EventKind::ResetMatch,
        }
    }

    /// Events that can change the score (gated by completion flags)
    pub fn is_scoring(&self) -> bool {
        matches!(
            self,
            ScoringEvent::AddRuns(_)
                | ScoringEvent::AddWide
                | ScoringEvent::AddNoBall(_)
                | ScoringEvent::AddWicket
        )
    }
}

/// Payload-free discriminant of [`ScoringEvent`], used in logs and protocols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Runs,
    Wide,
    NoBall,
    Wicket,
    SwapStrike,
    NewBatsman,
    RetireBatsman,
    ChangeBowler,
    StartSecondInnings,
    StartNewMatch,
    ResetMatch,
}

impl EventKind {
    /// Parse event kind from string (case-insensitive, `_` ignored)
    ///
    /// # Examples
    ///
    /// ```
    /// use cricket_scorer_types::EventKind;
    ///
    /// assert_eq!(EventKind::from_str("runs"), Some(EventKind::Runs));
    /// assert_eq!(EventKind::from_str("no_ball"), Some(EventKind::NoBall));
    /// assert_eq!(EventKind::from_str("changeBowler"), Some(EventKind::ChangeBowler));
    /// assert_eq!(EventKind::from_str("bye"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "").as_str() {
            "runs" => Some(EventKind::Runs),
            "wide" => Some(EventKind::Wide),
            "noball" => Some(EventKind::NoBall),
            "wicket" => Some(EventKind::Wicket),
            "swapstrike" => Some(EventKind::SwapStrike),
            "newbatsman" | "newbatter" => Some(EventKind::NewBatsman),
            "retirebatsman" | "retire" => Some(EventKind::RetireBatsman),
            "changebowler" => Some(EventKind::ChangeBowler),
            "startsecondinnings" => Some(EventKind::StartSecondInnings),
            "startnewmatch" | "startmatch" => Some(EventKind::StartNewMatch),
            "resetmatch" | "reset" => Some(EventKind::ResetMatch),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Runs => "runs",
            EventKind::Wide => "wide",
            EventKind::NoBall => "noBall",
            EventKind::Wicket => "wicket",
            EventKind::SwapStrike => "swapStrike",
            EventKind::NewBatsman => "newBatsman",
            EventKind::RetireBatsman => "retireBatsman",
            EventKind::ChangeBowler => "changeBowler",
            EventKind::StartSecondInnings => "startSecondInnings",
            EventKind::StartNewMatch => "startNewMatch",
            EventKind::ResetMatch => "resetMatch",
        }
    }
}
