use chrono::Local;
use taikai_live::{FileStore, RecordStore, UserId};

use crate::config::Config;
use crate::Error;

pub async fn run(config: &Config, user: &UserId) -> Result<(), Error> {
    let store = FileStore::new(&config.store);
    let records = store
        .list(user)
        .await
        .map_err(taikai_live::Error::from)?;

    if records.is_empty() {
        println!("No tournaments yet");
        return Ok(());
    }

    for record in records {
        println!(
            "{}  {} ({})",
            record.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            record.tournament_name,
            record.category
        );
        println!("    Champion:  {}", record.champion);
        println!("    Runner-up: {}", record.runner_up);
    }

    Ok(())
}
