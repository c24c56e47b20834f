//! History analytics over stored match records

use crate::record::MatchRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct TeamStats {
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub total_runs: u32,
}

impl TeamStats {
    fn new(team: &str) -> Self {
        Self {
            team: team.to_string(),
            played: 0,
            won: 0,
            total_runs: 0,
        }
    }

    /// Percentage of matches won
    pub fn win_rate(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        self.won as f64 / self.played as f64 * 100.0
    }

    pub fn average_runs(&self) -> f64 {
        if self.played == 0 {
            return 0.0;
        }
        self.total_runs as f64 / self.played as f64
    }
}

/// One team's total in one match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamScore {
    pub team: String,
    pub runs: u32,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistorySummary {
    pub matches: usize,
    pub highest_score: Option<TeamScore>,
    /// Mean of every team total
    pub average_score: f64,
    /// In order of first appearance
    pub teams: Vec<TeamStats>,
    pub most_successful: Option<TeamStats>,
    pub highest_average: Option<TeamStats>,
}

fn team_scores(records: &[&MatchRecord]) -> Vec<TeamScore> {
    records
        .iter()
        .flat_map(|r| {
            [
                TeamScore {
                    team: r.team_a.clone(),
                    runs: r.team_a_score,
                    date: r.date.clone(),
                },
                TeamScore {
                    team: r.team_b.clone(),
                    runs: r.team_b_score,
                    date: r.date.clone(),
                },
            ]
        })
        .collect()
}

/// Per-team figures, in order of first appearance
pub fn team_table<'a, I>(records: I) -> Vec<TeamStats>
where
    I: IntoIterator<Item = &'a MatchRecord>,
{
    let mut table: Vec<TeamStats> = Vec::new();
    for record in records {
        for (team, runs) in [
            (&record.team_a, record.team_a_score),
            (&record.team_b, record.team_b_score),
        ] {
            let idx = match table.iter().position(|t| &t.team == team) {
                Some(idx) => idx,
                None => {
                    table.push(TeamStats::new(team));
                    table.len() - 1
                }
            };
            let stats = &mut table[idx];
            stats.played += 1;
            stats.total_runs += runs;
            if &record.winner == team {
                stats.won += 1;
            }
        }
    }
    table
}

/// First maximum wins
fn best_team(table: &[TeamStats], key: impl Fn(&TeamStats) -> f64) -> Option<TeamStats> {
    let mut best: Option<&TeamStats> = None;
    for stats in table {
        match best {
            Some(current) if key(stats) <= key(current) => {}
            _ => best = Some(stats),
        }
    }
    best.cloned()
}

pub fn summarize(records: &[MatchRecord]) -> HistorySummary {
    let all: Vec<&MatchRecord> = records.iter().collect();
    summarize_refs(&all)
}

/// Summary over the matches played on `date`
pub fn summarize_on(records: &[MatchRecord], date: &str) -> HistorySummary {
    summarize_refs(&on_date(records, date))
}

fn summarize_refs(records: &[&MatchRecord]) -> HistorySummary {
    if records.is_empty() {
        return HistorySummary::default();
    }

    let scores = team_scores(records);
    let mut highest_score: Option<&TeamScore> = None;
    for score in &scores {
        if highest_score.map_or(true, |best| score.runs > best.runs) {
            highest_score = Some(score);
        }
    }
    let total: u32 = scores.iter().map(|s| s.runs).sum();

    let teams = team_table(records.iter().copied());
    let most_successful = best_team(&teams, TeamStats::win_rate);
    let highest_average = best_team(&teams, TeamStats::average_runs);

    HistorySummary {
        matches: records.len(),
        highest_score: highest_score.cloned(),
        average_score: total as f64 / scores.len() as f64,
        teams,
        most_successful,
        highest_average,
    }
}

pub fn on_date<'a>(records: &'a [MatchRecord], date: &str) -> Vec<&'a MatchRecord> {
    records
        .iter()
        .filter(|r| r.date.as_deref() == Some(date))
        .collect()
}

pub fn team_matches<'a>(records: &'a [MatchRecord], team: &str) -> Vec<&'a MatchRecord> {
    records.iter().filter(|r| r.involves(team)).collect()
}

/// Every team name, in order of first appearance
pub fn teams(records: &[MatchRecord]) -> Vec<String> {
    team_table(records).into_iter().map(|t| t.team).collect()
}
