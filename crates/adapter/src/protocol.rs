//! Protocol module - line-delimited JSON scoring events
//!
//! One event object per line, tagged by `type`:
//!
//! ```text
//! {"type":"start_match","overs":20,"team_a":"Lions","team_b":"Tigers","toss_winner":"Lions","batting_team":"Lions","date":"2024-03-01"}
//! {"type":"new_batter","name":"Opener A"}
//! {"type":"change_bowler","name":"Quick"}
//! {"type":"runs","runs":4}
//! {"type":"no_ball","runs":1}
//! {"type":"retire","slot":0,"replacement":"Sub"}
//! ```
//!
//! Type names are matched loosely (`noBall`, `no_ball`, `NOBALL`). Blank
//! lines and lines starting with `#` are skipped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cricket_scorer_core::types::{EventKind, MatchSetup, ScoringEvent, Slot, TossInfo};

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("line {line}: malformed event: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: event has no \"type\"")]
    MissingType { line: usize },

    #[error("line {line}: unknown event type {kind:?}")]
    UnknownType { line: usize, kind: String },

    #[error("line {line}: slot {slot} is not 0 or 1")]
    BadSlot { line: usize, slot: u64 },
}

impl ProtocolError {
    pub fn line(&self) -> usize {
        match self {
            ProtocolError::Malformed { line, .. }
            | ProtocolError::MissingType { line }
            | ProtocolError::UnknownType { line, .. }
            | ProtocolError::BadSlot { line, .. } => *line,
        }
    }
}

/// Wire form of a [`ScoringEvent`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventMessage {
    StartMatch {
        overs: u32,
        team_a: String,
        team_b: String,
        toss_winner: String,
        batting_team: String,
        #[serde(default)]
        date: String,
    },
    Runs {
        runs: u32,
    },
    Wide,
    NoBall {
        #[serde(default)]
        runs: u32,
    },
    Wicket,
    SwapStrike,
    NewBatter {
        name: String,
    },
    Retire {
        slot: u64,
        replacement: String,
    },
    ChangeBowler {
        name: String,
    },
    StartSecondInnings,
    Reset,
}

/// Canonical `type` tag for an event kind
pub fn wire_name(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Runs => "runs",
        EventKind::Wide => "wide",
        EventKind::NoBall => "no_ball",
        EventKind::Wicket => "wicket",
        EventKind::SwapStrike => "swap_strike",
        EventKind::NewBatsman => "new_batter",
        EventKind::RetireBatsman => "retire",
        EventKind::ChangeBowler => "change_bowler",
        EventKind::StartSecondInnings => "start_second_innings",
        EventKind::StartNewMatch => "start_match",
        EventKind::ResetMatch => "reset",
    }
}

impl EventMessage {
    pub fn into_event(self, line: usize) -> Result<ScoringEvent, ProtocolError> {
        let event = match self {
            EventMessage::StartMatch {
                overs,
                team_a,
                team_b,
                toss_winner,
                batting_team,
                date,
            } => ScoringEvent::StartNewMatch(MatchSetup {
                overs,
                team_a,
                team_b,
                toss: TossInfo::new(toss_winner),
                batting_team,
                date,
            }),
            EventMessage::Runs { runs } => ScoringEvent::AddRuns(runs),
            EventMessage::Wide => ScoringEvent::AddWide,
            EventMessage::NoBall { runs } => ScoringEvent::AddNoBall(runs),
            EventMessage::Wicket => ScoringEvent::AddWicket,
            EventMessage::SwapStrike => ScoringEvent::SwapStrike,
            EventMessage::NewBatter { name } => ScoringEvent::AddNewBatsman(name),
            EventMessage::Retire { slot, replacement } => {
                let slot = usize::try_from(slot)
                    .ok()
                    .and_then(Slot::from_index)
                    .ok_or(ProtocolError::BadSlot { line, slot })?;
                ScoringEvent::RetireBatsman { slot, replacement }
            }
            EventMessage::ChangeBowler { name } => ScoringEvent::ChangeBowler(name),
            EventMessage::StartSecondInnings => ScoringEvent::StartSecondInnings,
            EventMessage::Reset => ScoringEvent::ResetMatch,
        };
        Ok(event)
    }
}

impl From<&ScoringEvent> for EventMessage {
    fn from(event: &ScoringEvent) -> Self {
        match event {
            ScoringEvent::AddRuns(runs) => EventMessage::Runs { runs: *runs },
            ScoringEvent::AddWide => EventMessage::Wide,
            ScoringEvent::AddNoBall(runs) => EventMessage::NoBall { runs: *runs },
            ScoringEvent::AddWicket => EventMessage::Wicket,
            ScoringEvent::SwapStrike => EventMessage::SwapStrike,
            ScoringEvent::AddNewBatsman(name) => EventMessage::NewBatter { name: name.clone() },
            ScoringEvent::RetireBatsman { slot, replacement } => EventMessage::Retire {
                slot: slot.index() as u64,
                replacement: replacement.clone(),
            },
            ScoringEvent::ChangeBowler(name) => EventMessage::ChangeBowler { name: name.clone() },
            ScoringEvent::StartSecondInnings => EventMessage::StartSecondInnings,
            ScoringEvent::StartNewMatch(setup) => EventMessage::StartMatch {
                overs: setup.overs,
                team_a: setup.team_a.clone(),
                team_b: setup.team_b.clone(),
                toss_winner: setup.toss.winner.clone(),
                batting_team: setup.batting_team.clone(),
                date: setup.date.clone(),
            },
            ScoringEvent::ResetMatch => EventMessage::Reset,
        }
    }
}

/// Parse one script line; `Ok(None)` for blank and comment lines.
pub fn parse_event_line(line: usize, text: &str) -> Result<Option<ScoringEvent>, ProtocolError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut value: serde_json::Value =
        serde_json::from_str(text).map_err(|source| ProtocolError::Malformed { line, source })?;

    let kind = match value.get("type").and_then(|t| t.as_str()) {
        Some(kind) => kind.to_string(),
        None => return Err(ProtocolError::MissingType { line }),
    };
    let Some(event_kind) = EventKind::from_str(&kind) else {
        return Err(ProtocolError::UnknownType { line, kind });
    };
    if let Some(obj) = value.as_object_mut() {
        obj.insert(
            "type".to_string(),
            serde_json::Value::from(wire_name(event_kind)),
        );
    }

    let message: EventMessage =
        serde_json::from_value(value).map_err(|source| ProtocolError::Malformed { line, source })?;
    message.into_event(line).map(Some)
}

/// Parse a whole script, stopping at the first bad line.
pub fn parse_script(text: &str) -> Result<Vec<ScoringEvent>, ProtocolError> {
    let mut events = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(event) = parse_event_line(idx + 1, line)? {
            events.push(event);
        }
    }
    Ok(events)
}

pub fn encode_event(event: &ScoringEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EventMessage::from(event))
}

/// Encode events as a script, one line each
pub fn encode_script<'a, I>(events: I) -> Result<String, serde_json::Error>
where
    I: IntoIterator<Item = &'a ScoringEvent>,
{
    let mut out = String::new();
    for event in events {
        out.push_str(&encode_event(event)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_runs() {
        let event = parse_event_line(1, r#"{"type":"runs","runs":4}"#).unwrap();
        assert_eq!(event, Some(ScoringEvent::AddRuns(4)));
    }

    #[test]
    fn test_type_aliases() {
        assert_eq!(
            parse_event_line(1, r#"{"type":"noBall","runs":2}"#).unwrap(),
            Some(ScoringEvent::AddNoBall(2))
        );
        assert_eq!(
            parse_event_line(1, r#"{"type":"no_ball"}"#).unwrap(),
            Some(ScoringEvent::AddNoBall(0))
        );
        assert_eq!(
            parse_event_line(1, r#"{"type":"resetMatch"}"#).unwrap(),
            Some(ScoringEvent::ResetMatch)
        );
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        assert_eq!(parse_event_line(1, "   ").unwrap(), None);
        assert_eq!(parse_event_line(2, "# first over").unwrap(), None);
    }

    #[test]
    fn test_retire_slot_is_checked() {
        let ok = parse_event_line(3, r#"{"type":"retire","slot":1,"replacement":"Sub"}"#).unwrap();
        assert_eq!(
            ok,
            Some(ScoringEvent::RetireBatsman {
                slot: Slot::Second,
                replacement: "Sub".into()
            })
        );

        let err = parse_event_line(4, r#"{"type":"retire","slot":2,"replacement":"Sub"}"#)
            .unwrap_err();
        assert!(matches!(err, ProtocolError::BadSlot { line: 4, slot: 2 }));
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let script = "{\"type\":\"wide\"}\n\n{\"type\":\"bye\"}\n";
        let err = parse_script(script).unwrap_err();
        assert_eq!(err.line(), 3);
        assert!(matches!(err, ProtocolError::UnknownType { ref kind, .. } if kind == "bye"));

        let err = parse_event_line(7, "{\"runs\":4}").unwrap_err();
        assert!(matches!(err, ProtocolError::MissingType { line: 7 }));

        let err = parse_event_line(8, "{\"type\":\"runs\"}").unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { line: 8, .. }));
        assert!(err.to_string().starts_with("line 8: malformed event"));
    }

    #[test]
    fn test_encode_uses_canonical_tags() {
        let line = encode_event(&ScoringEvent::AddNoBall(1)).unwrap();
        assert_eq!(line, r#"{"type":"no_ball","runs":1}"#);

        let script = encode_script(&[
            ScoringEvent::AddNewBatsman("A".into()),
            ScoringEvent::SwapStrike,
        ])
        .unwrap();
        assert_eq!(
            script,
            "{\"type\":\"new_batter\",\"name\":\"A\"}\n{\"type\":\"swap_strike\"}\n"
        );
        assert_eq!(parse_script(&script).unwrap().len(), 2);
    }
}
