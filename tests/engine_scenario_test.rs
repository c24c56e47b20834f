//! End-to-end match scenarios through the scoring engine

use cricket_scorer::core::{
    match_highlights, match_result, transition, Innings, Margin, MatchResult, MatchState,
    SequentialIds,
};
use cricket_scorer::types::{MatchSetup, ScoringEvent, TossInfo, TIE_MARKER};

/// Drives a match ball by ball, changing bowlers at every over end
struct Scorer {
    state: MatchState,
    ids: SequentialIds,
    batters_in: u32,
    bowlers: [&'static str; 2],
    spell: usize,
}

impl Scorer {
    fn start(overs: u32) -> Self {
        let mut scorer = Self {
            state: MatchState::new(),
            ids: SequentialIds::new(),
            batters_in: 0,
            bowlers: ["Tiger Quick", "Tiger Spin"],
            spell: 0,
        };
        scorer.apply(ScoringEvent::StartNewMatch(MatchSetup {
            overs,
            team_a: "Lions".into(),
            team_b: "Tigers".into(),
            toss: TossInfo::new("Tigers"),
            batting_team: "Lions".into(),
            date: "2024-03-01".into(),
        }));
        scorer.open_innings();
        scorer
    }

    fn apply(&mut self, event: ScoringEvent) {
        let applied = self.state.apply(&event, &mut self.ids);
        assert!(applied, "{event:?} rejected");
    }

    fn new_batter(&mut self) {
        self.batters_in += 1;
        let name = format!("{} {}", self.state.batting_team(), self.batters_in);
        self.apply(ScoringEvent::AddNewBatsman(name));
    }

    fn open_innings(&mut self) {
        self.batters_in = 0;
        self.spell = 0;
        self.new_batter();
        self.new_batter();
        self.apply(ScoringEvent::ChangeBowler(self.bowlers[0].into()));
    }

    fn ball(&mut self, event: ScoringEvent) {
        if self.state.needs_bowler_change() {
            self.spell += 1;
            let bowler = self.bowlers[self.spell % 2];
            self.apply(ScoringEvent::ChangeBowler(bowler.into()));
        }
        self.apply(event);
    }

    fn wickets(&mut self, n: u32, replace: bool) {
        for _ in 0..n {
            self.ball(ScoringEvent::AddWicket);
            if replace {
                self.new_batter();
            }
        }
    }

    fn runs(&mut self, twos: u32, ones: u32) {
        for _ in 0..twos {
            self.ball(ScoringEvent::AddRuns(2));
        }
        for _ in 0..ones {
            self.ball(ScoringEvent::AddRuns(1));
        }
    }

    fn second_innings(&mut self) {
        self.apply(ScoringEvent::StartSecondInnings);
        self.bowlers = ["Lion Quick", "Lion Spin"];
        self.open_innings();
    }
}

/// Lions 150/6 from their 20 overs
fn lions_first_innings() -> Scorer {
    let mut scorer = Scorer::start(20);
    scorer.wickets(6, true);
    scorer.runs(36, 78);
    scorer
}

#[test]
fn test_first_innings_ends_when_overs_run_out() {
    let scorer = lions_first_innings();
    let state = &scorer.state;

    assert_eq!((state.total_runs(), state.total_wickets()), (150, 6));
    assert_eq!(state.overs_display(), "20.0");
    assert!(state.is_innings_complete());
    assert!(state.innings_transition_pending());
    assert!(!state.is_match_complete());
    assert_eq!(match_result(state), None);
}

#[test]
fn test_chase_wins_by_wickets_in_hand() {
    let mut scorer = lions_first_innings();
    scorer.second_innings();
    scorer.wickets(4, true);
    scorer.runs(44, 62);

    // 150 from 110 balls: one short of the target
    assert_eq!(scorer.state.total_runs(), 150);
    assert!(!scorer.state.is_match_complete());

    scorer.ball(ScoringEvent::AddRuns(1));
    let state = &scorer.state;
    assert_eq!((state.total_runs(), state.total_wickets()), (151, 4));
    assert_eq!(state.overs_display(), "18.3");
    assert!(state.is_innings_complete());
    assert!(state.is_match_complete());

    let result = match_result(state).unwrap();
    assert_eq!(
        result,
        MatchResult::Won {
            team: "Tigers".into(),
            margin: Margin::Wickets(6)
        }
    );
    assert_eq!(result.describe(), "Tigers won by 6 wickets");
}

#[test]
fn test_all_out_defending_side_wins_by_runs() {
    let mut scorer = lions_first_innings();
    scorer.second_innings();
    scorer.wickets(9, true);
    scorer.runs(40, 60);
    assert!(!scorer.state.is_match_complete());

    scorer.ball(ScoringEvent::AddWicket);
    let state = &scorer.state;
    assert_eq!((state.total_runs(), state.total_wickets()), (140, 10));
    assert!(state.is_innings_complete());
    assert!(state.is_match_complete());
    assert!(!state.innings_transition_pending());

    let result = match_result(state).unwrap();
    assert_eq!(result.winner_label(), "Lions");
    assert_eq!(result.margin(), Some(Margin::Runs(10)));
}

#[test]
fn test_level_scores_tie() {
    let mut scorer = lions_first_innings();
    scorer.second_innings();
    scorer.runs(30, 90);

    let state = &scorer.state;
    assert_eq!(state.total_runs(), 150);
    assert!(state.is_match_complete());
    assert_eq!(match_result(state), Some(MatchResult::Tie));
    assert_eq!(match_result(state).unwrap().winner_label(), TIE_MARKER);
}

#[test]
fn test_wide_after_innings_complete_is_ignored() {
    let mut scorer = lions_first_innings();
    let before = scorer.state.clone();

    let after = transition(&before, &ScoringEvent::AddWide, &mut scorer.ids);
    assert_eq!(after, before);
    assert_eq!(after.deliveries().len(), before.deliveries().len());
}

#[test]
fn test_completed_match_is_frozen() {
    let mut scorer = lions_first_innings();
    scorer.second_innings();
    scorer.runs(76, 0);
    assert!(scorer.state.is_match_complete());

    let frozen = scorer.state.clone();
    for event in [
        ScoringEvent::AddRuns(4),
        ScoringEvent::AddWide,
        ScoringEvent::AddNoBall(2),
        ScoringEvent::AddWicket,
        ScoringEvent::StartSecondInnings,
    ] {
        let next = transition(&frozen, &event, &mut scorer.ids);
        assert_eq!(next.total_runs(), frozen.total_runs());
        assert_eq!(next, frozen, "{event:?} changed a completed match");
    }
}

#[test]
fn test_second_innings_snapshot_matches_first_innings_totals() {
    let mut scorer = lions_first_innings();
    let live = scorer.state.clone();
    scorer.apply(ScoringEvent::StartSecondInnings);

    let state = &scorer.state;
    let first = state.first_innings().unwrap();
    assert_eq!(first.runs, live.total_runs());
    assert_eq!(first.wickets, live.total_wickets());
    assert_eq!(first.overs, live.total_overs());
    assert_eq!(first.batters, live.batters());
    assert_eq!(state.current_innings(), Innings::Second);
    assert_eq!((state.total_runs(), state.total_wickets()), (0, 0));
    assert!(state.batters().is_empty());
    assert!(state.bowlers().is_empty());
    assert_eq!(state.target(), Some(151));
}

#[test]
fn test_highlights_span_both_innings() {
    let mut scorer = lions_first_innings();
    scorer.second_innings();
    scorer.wickets(4, true);
    scorer.runs(44, 63);

    let highlights = match_highlights(&scorer.state);
    let top = highlights.top_scorer.unwrap();
    assert!(top.runs > 0);
    let wicket_taker = highlights.top_wicket_taker.unwrap();
    // Six in the first over of the match beat four in the chase
    assert_eq!((wicket_taker.name.as_str(), wicket_taker.wickets), ("Tiger Quick", 6));
    assert!(highlights.best_economy.is_some());
}
