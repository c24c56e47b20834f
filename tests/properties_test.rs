//! Property tests for the scoring engine over random event sequences.
//!
//! Properties tested:
//! - Structural invariants hold after every event
//! - Only legal deliveries advance the ball count, by exactly one
//! - The bowler-change flag is set iff the latest legal ball ended an over, until a bowler change
//! - A completed match never changes again
//! - Ten wickets end the innings; the match only in innings two
//! - Batter runs plus extras always equal the total
//! - Replaying the log reproduces the state

use proptest::prelude::*;

use cricket_scorer::core::{replay, Innings, MatchState, SequentialIds};
use cricket_scorer::types::{MatchSetup, ScoringEvent, Slot, TossInfo, BALLS_PER_OVER, MAX_WICKETS};

fn event() -> impl Strategy<Value = ScoringEvent> {
    prop_oneof![
        8 => (0u32..=6).prop_map(ScoringEvent::AddRuns),
        2 => Just(ScoringEvent::AddWide),
        2 => (0u32..=6).prop_map(ScoringEvent::AddNoBall),
        3 => Just(ScoringEvent::AddWicket),
        1 => Just(ScoringEvent::SwapStrike),
        3 => "[A-E]".prop_map(ScoringEvent::AddNewBatsman),
        2 => prop::sample::select(vec!["Quick", "Spin", "Medium"])
            .prop_map(|name| ScoringEvent::ChangeBowler(name.to_string())),
        1 => (0usize..2, "[F-H]").prop_map(|(slot, name)| ScoringEvent::RetireBatsman {
            slot: Slot::from_index(slot).unwrap_or_default(),
            replacement: name,
        }),
        1 => Just(ScoringEvent::StartSecondInnings),
    ]
}

fn match_script() -> impl Strategy<Value = Vec<ScoringEvent>> {
    (1u32..=4, prop::collection::vec(event(), 0..300)).prop_map(|(overs, body)| {
        let mut events = vec![
            ScoringEvent::StartNewMatch(MatchSetup {
                overs,
                team_a: "Lions".into(),
                team_b: "Tigers".into(),
                toss: TossInfo::new("Lions"),
                batting_team: "Lions".into(),
                date: "2024-03-01".into(),
            }),
            ScoringEvent::AddNewBatsman("Opener A".into()),
            ScoringEvent::AddNewBatsman("Opener B".into()),
            ScoringEvent::ChangeBowler("Quick".into()),
        ];
        events.extend(body);
        events
    })
}

fn batter_runs(state: &MatchState) -> u32 {
    state.batters().iter().map(|b| b.runs).sum()
}

/// Keep scoring sixes until the match is over
fn drive_to_completion(state: &mut MatchState, ids: &mut SequentialIds) {
    for n in 0..200 {
        if state.is_match_complete() {
            return;
        }
        let event = if state.is_innings_complete() {
            ScoringEvent::StartSecondInnings
        } else if state.current_bowler().is_none() {
            ScoringEvent::ChangeBowler("Closer".into())
        } else if state.striker_batter().is_none() {
            ScoringEvent::AddNewBatsman(format!("Tail {n}"))
        } else {
            ScoringEvent::AddRuns(6)
        };
        state.apply(&event, ids);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_invariants_hold_after_every_event(events in match_script()) {
        let mut ids = SequentialIds::new();
        let mut state = MatchState::new();
        for event in &events {
            state.apply(event, &mut ids);
            prop_assert!(state.check_invariants().is_ok(), "{:?}", state.check_invariants());
            prop_assert!(state.total_wickets() <= MAX_WICKETS);
        }
    }

    #[test]
    fn prop_only_legal_deliveries_count_balls(events in match_script()) {
        let mut ids = SequentialIds::new();
        let mut state = MatchState::new();
        for event in &events {
            let before = state.clone();
            let applied = state.apply(event, &mut ids);
            if !applied || before.current_innings() != state.current_innings() {
                continue;
            }
            let expected = match event {
                ScoringEvent::AddRuns(_) | ScoringEvent::AddWicket => before.total_balls() + 1,
                _ => before.total_balls(),
            };
            prop_assert_eq!(state.total_balls(), expected, "after {:?}", event);
        }
    }

    #[test]
    fn prop_bowler_change_flag(events in match_script()) {
        let mut ids = SequentialIds::new();
        let mut state = MatchState::new();
        for event in &events {
            let before = state.clone();
            if !state.apply(event, &mut ids) || before.current_innings() != state.current_innings() {
                continue;
            }
            match event {
                ScoringEvent::ChangeBowler(_) => prop_assert!(!state.needs_bowler_change()),
                ScoringEvent::AddRuns(_) | ScoringEvent::AddWicket => prop_assert_eq!(
                    state.needs_bowler_change(),
                    state.total_balls() % BALLS_PER_OVER == 0,
                    "after {:?} at ball {}",
                    event,
                    state.total_balls()
                ),
                _ => prop_assert_eq!(state.needs_bowler_change(), before.needs_bowler_change()),
            }
        }
    }

    #[test]
    fn prop_completed_match_is_frozen(events in match_script(), tail in prop::collection::vec(event(), 1..20)) {
        let mut ids = SequentialIds::new();
        let mut state = MatchState::new();
        for event in &events {
            state.apply(event, &mut ids);
        }
        drive_to_completion(&mut state, &mut ids);
        prop_assert!(state.is_match_complete());

        let runs = state.total_runs();
        let wickets = state.total_wickets();
        let balls = state.total_balls();
        for event in tail.iter().filter(|e| e.is_scoring()) {
            let before = state.clone();
            prop_assert!(!state.apply(event, &mut ids));
            prop_assert_eq!(&state, &before);
        }
        prop_assert_eq!((state.total_runs(), state.total_wickets(), state.total_balls()), (runs, wickets, balls));
    }

    #[test]
    fn prop_tenth_wicket_ends_innings(events in match_script()) {
        let mut ids = SequentialIds::new();
        let mut state = MatchState::new();
        for event in &events {
            state.apply(event, &mut ids);
            if state.total_wickets() == MAX_WICKETS {
                prop_assert!(state.is_innings_complete());
                prop_assert_eq!(
                    state.is_match_complete(),
                    state.current_innings() == Innings::Second
                );
            }
        }
    }

    #[test]
    fn prop_batter_runs_plus_extras_equal_total(events in match_script()) {
        let mut ids = SequentialIds::new();
        let mut state = MatchState::new();
        for event in &events {
            state.apply(event, &mut ids);
            prop_assert_eq!(batter_runs(&state) + state.extras().total(), state.total_runs());
            if let Some(first) = state.first_innings() {
                let first_batters: u32 = first.batters.iter().map(|b| b.runs).sum();
                prop_assert_eq!(first_batters + first.extras.total(), first.runs);
            }
        }
    }

    #[test]
    fn prop_replay_is_deterministic(events in match_script()) {
        let mut ids = SequentialIds::new();
        let mut state = MatchState::new();
        for event in &events {
            state.apply(event, &mut ids);
        }
        let replayed = replay(&events, &mut SequentialIds::new());
        prop_assert_eq!(replayed, state);
    }
}

#[test]
fn test_odd_run_on_sixth_ball_swaps_once() {
    let mut ids = SequentialIds::new();
    let mut state = MatchState::new();
    state.apply(
        &ScoringEvent::StartNewMatch(MatchSetup {
            overs: 20,
            team_a: "Lions".into(),
            team_b: "Tigers".into(),
            toss: TossInfo::new("Lions"),
            batting_team: "Lions".into(),
            date: String::new(),
        }),
        &mut ids,
    );
    state.apply(&ScoringEvent::AddNewBatsman("A".into()), &mut ids);
    state.apply(&ScoringEvent::AddNewBatsman("B".into()), &mut ids);
    state.apply(&ScoringEvent::ChangeBowler("Quick".into()), &mut ids);
    for _ in 0..5 {
        state.apply(&ScoringEvent::AddRuns(0), &mut ids);
    }
    let striker = state.striker();
    state.apply(&ScoringEvent::AddRuns(1), &mut ids);
    assert_eq!(state.striker(), striker.other());
    assert_eq!(state.striker_batter().unwrap().name, "B");
}
