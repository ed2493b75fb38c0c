use std::sync::Arc;

use clap::Subcommand;
use focustray_core::{JsonFileStore, SessionLog};
use serde::Serialize;

#[derive(Subcommand)]
pub enum SessionsAction {
    /// Work periods completed in the current session day
    Today,
    /// Every stored completion timestamp
    All,
}

#[derive(Serialize)]
struct TodaySummary {
    completed_today: usize,
}

pub fn run(action: SessionsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(JsonFileStore::open_default()?);
    let log = SessionLog::load(store);

    match action {
        SessionsAction::Today => {
            let summary = TodaySummary {
                completed_today: log.count_for_today(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        SessionsAction::All => {
            println!("{}", serde_json::to_string_pretty(log.entries())?);
        }
    }
    Ok(())
}
