//! Cricket scorer command line.
//!
//! Replays a JSON-lines event script through a scoring session, prints the
//! scorecard of the last match, and saves every completed match to the
//! history file.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use cricket_scorer::adapter::{
    parse_script, submit_and_save, summarize, summarize_on, AdapterConfig, CompletionNotifier,
    JsonFileStore, MatchStore, SaveOutcome,
};
use cricket_scorer::cli::{parse_args, render_history, render_scorecard, Command, USAGE};
use cricket_scorer::session::ScoringSession;
use cricket_scorer::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AdapterConfig::from_env();
    init_tracing(config.log_json);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let store = Arc::new(JsonFileStore::new(&config.history_path));

    match parse_args(&args)? {
        Command::Replay { script, save } => {
            let text = tokio::fs::read_to_string(&script)
                .await
                .with_context(|| format!("reading {}", script.display()))?;
            let events =
                parse_script(&text).with_context(|| format!("parsing {}", script.display()))?;

            let session = ScoringSession::new();
            let notifier =
                CompletionNotifier::new(store).with_enabled(save && config.save_enabled);
            let (rejected, saves) = submit_and_save(&notifier, &session, events).await;
            if rejected > 0 {
                info!(rejected, "inadmissible events ignored");
            }

            print!("{}", render_scorecard(&session.state()));

            let mut failures = Vec::new();
            for outcome in saves {
                match outcome {
                    SaveOutcome::Saved => println!("Match saved to history"),
                    SaveOutcome::AlreadySaved => println!("Match already saved to history"),
                    SaveOutcome::Failed(reason) => failures.push(reason),
                    SaveOutcome::NotComplete | SaveOutcome::Disabled | SaveOutcome::Skipped(_) => {}
                }
            }
            if !failures.is_empty() {
                return Err(anyhow::anyhow!(
                    "failed to save {} match(es): {}",
                    failures.len(),
                    failures.join("; ")
                ));
            }
        }
        Command::History { date } => {
            let records = match &date {
                Some(date) => store.matches_on(date).await,
                None => store.match_history().await,
            }
            .with_context(|| format!("loading {}", config.history_path.display()))?;
            let summary = match &date {
                Some(date) => summarize_on(&records, date),
                None => summarize(&records),
            };
            print!("{}", render_history(&records, &summary));
        }
        Command::ClearHistory => {
            store
                .clear_history()
                .await
                .with_context(|| format!("clearing {}", config.history_path.display()))?;
            println!("Match history cleared");
        }
        Command::Help => println!("{}", USAGE),
    }

    Ok(())
}
