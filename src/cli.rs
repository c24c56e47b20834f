//! Command line parsing and plain-text reports for the `cricket-scorer` binary.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::adapter::{HistorySummary, MatchRecord};
use crate::core::{match_highlights, match_result, MatchHighlights, MatchState};
use crate::types::InningsSnapshot;

pub const USAGE: &str = "\
usage:
  cricket-scorer replay <events.jsonl> [--no-save]
  cricket-scorer history [--date YYYY-MM-DD]
  cricket-scorer clear-history";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Replay { script: PathBuf, save: bool },
    History { date: Option<String> },
    ClearHistory,
    Help,
}

/// `YYYY-MM-DD`, digits only; calendar validity is not checked
fn is_iso_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b.iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
}

pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some(command) = args.first() else {
        return Ok(Command::Help);
    };

    match command.as_str() {
        "replay" => {
            let mut script = None;
            let mut save = true;
            for arg in &args[1..] {
                match arg.as_str() {
                    "--no-save" => save = false,
                    other if other.starts_with("--") => {
                        return Err(anyhow!("replay: unknown argument: {}", other));
                    }
                    other if script.is_none() => script = Some(PathBuf::from(other)),
                    other => return Err(anyhow!("replay: unexpected argument: {}", other)),
                }
            }
            let script = script.ok_or_else(|| anyhow!("replay: missing event script path"))?;
            Ok(Command::Replay { script, save })
        }
        "history" => {
            let mut date = None;
            let mut i = 1usize;
            while i < args.len() {
                match args[i].as_str() {
                    "--date" => {
                        i += 1;
                        let v = args
                            .get(i)
                            .ok_or_else(|| anyhow!("history: missing value for --date"))?;
                        if !is_iso_date(v) {
                            return Err(anyhow!("history: invalid --date value: {}", v));
                        }
                        date = Some(v.clone());
                    }
                    other => return Err(anyhow!("history: unknown argument: {}", other)),
                }
                i += 1;
            }
            Ok(Command::History { date })
        }
        "clear-history" => match args.get(1) {
            None => Ok(Command::ClearHistory),
            Some(other) => Err(anyhow!("clear-history: unknown argument: {}", other)),
        },
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(anyhow!("unknown command: {}\n{}", other, USAGE)),
    }
}

fn write_innings(out: &mut String, title: &str, innings: &InningsSnapshot) {
    let _ = writeln!(
        out,
        "{title}: {} {}/{} ({}.{} ov)",
        innings.batting_team, innings.runs, innings.wickets, innings.overs, innings.balls
    );
    for b in &innings.batters {
        let status = if b.is_out {
            "out"
        } else if b.retired {
            "retired"
        } else {
            "not out"
        };
        let _ = writeln!(
            out,
            "  {:<20} {:>4} ({:>3}b) SR {:>6.1}  {}",
            b.name,
            b.runs,
            b.balls_faced,
            b.strike_rate(),
            status
        );
    }
    if innings.extras.total() > 0 {
        let _ = writeln!(
            out,
            "  extras {} (wd {}, nb {})",
            innings.extras.total(),
            innings.extras.wides,
            innings.extras.no_ball_runs
        );
    }
    for b in &innings.bowlers {
        let _ = writeln!(
            out,
            "  {:<20} {}.{}-{}-{} Econ {:.2}",
            b.name,
            b.overs,
            b.balls,
            b.runs_conceded,
            b.wickets,
            b.economy_rate()
        );
    }
}

fn write_highlights(out: &mut String, h: &MatchHighlights) {
    if let Some(b) = &h.top_scorer {
        let _ = writeln!(out, "Top scorer: {} {} ({}b)", b.name, b.runs, b.balls_faced);
    }
    if let Some(b) = &h.highest_strike_rate {
        let _ = writeln!(out, "Best strike rate: {} {:.1}", b.name, b.strike_rate);
    }
    if let Some(b) = &h.top_wicket_taker {
        let _ = writeln!(out, "Most wickets: {} {}", b.name, b.wickets);
    }
    if let Some(b) = &h.best_economy {
        let _ = writeln!(out, "Best economy: {} {:.2}", b.name, b.economy_rate);
    }
}

/// Scorecard of both innings, result and highlights
pub fn render_scorecard(state: &MatchState) -> String {
    let mut out = String::new();
    if !state.is_match_started() {
        out.push_str("No match in progress\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{} v {}, {} overs{}",
        state.team_a(),
        state.team_b(),
        state.match_overs(),
        if state.match_date().is_empty() {
            String::new()
        } else {
            format!(", {}", state.match_date())
        }
    );
    if let Some(first) = state.first_innings() {
        write_innings(&mut out, "1st innings", first);
    }
    let title = match state.first_innings() {
        Some(_) => "2nd innings",
        None => "1st innings",
    };
    write_innings(&mut out, title, &state.innings_snapshot());

    let snap = state.snapshot();
    if let Some(chase) = snap.chase.filter(|_| !snap.match_complete) {
        let _ = writeln!(
            out,
            "Target {}: need {} from {} balls",
            chase.target, chase.runs_needed, snap.balls_remaining
        );
    }
    match match_result(state) {
        Some(result) => {
            let _ = writeln!(out, "Result: {}", result.describe());
        }
        None if snap.innings_transition_pending => out.push_str("Innings break\n"),
        None => {
            let _ = writeln!(out, "In progress: {}", snap.score_line());
        }
    }
    write_highlights(&mut out, &match_highlights(state));
    out
}

pub fn render_history(records: &[MatchRecord], summary: &HistorySummary) -> String {
    let mut out = String::new();
    if records.is_empty() {
        out.push_str("No matches in history\n");
        return out;
    }
    for r in records {
        let _ = writeln!(
            out,
            "{} {} {} v {} {} - {}",
            r.date.as_deref().unwrap_or("----------"),
            r.team_a,
            r.team_a_score,
            r.team_b,
            r.team_b_score,
            r.result_line()
        );
    }
    let _ = writeln!(out, "Matches: {}", summary.matches);
    if let Some(best) = &summary.highest_score {
        let _ = writeln!(out, "Highest score: {} by {}", best.runs, best.team);
    }
    let _ = writeln!(out, "Average score: {:.1}", summary.average_score);
    for t in &summary.teams {
        let _ = writeln!(
            out,
            "  {:<20} P {:>3} W {:>3} Win% {:>5.1} Avg {:>5.0}",
            t.team,
            t.played,
            t.won,
            t.win_rate(),
            t.average_runs()
        );
    }
    if let Some(t) = &summary.most_successful {
        let _ = writeln!(out, "Most successful: {} ({} of {})", t.team, t.won, t.played);
    }
    if let Some(t) = &summary.highest_average {
        let _ = writeln!(out, "Highest average: {} ({:.0})", t.team, t.average_runs());
    }
    out
}
