use std::sync::Arc;
use std::time::Duration;

use taikai_core::{BracketSize, Competitor, Match, Roster, Side};
use taikai_live::{BracketEvent, FileStore, LiveBracket, RecordStore, UserId};
use tokio::sync::broadcast;
use tokio::time;

use crate::config::Config;
use crate::utils::{NonBlank, Prompt};
use crate::Error;

/// Upper bound for waiting on the record store before exiting.
const SAVE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn run(config: &Config, user: UserId) -> Result<(), Error> {
    let store: Arc<dyn RecordStore> = Arc::new(FileStore::new(&config.store));

    let roster = read_roster()?;
    let bracket = LiveBracket::new(roster, user, store)?;
    let mut rx = bracket.subscribe();

    loop {
        let tournament = bracket.snapshot();
        let round = tournament.current_round();

        println!("Round {}", tournament.current_round_index() + 1);
        for (index, m) in round.iter().enumerate() {
            print_match(index, m);
        }

        for (index, m) in round.iter().enumerate() {
            read_winner(&bracket, index, m)?;
        }

        let tournament = bracket.advance()?;
        if tournament.is_completed() {
            break;
        }
    }

    let tournament = bracket.snapshot();
    if let (Some(champion), Some(runner_up)) = (tournament.champion(), tournament.runner_up()) {
        println!("Champion: {}", champion);
        println!("Runner-up: {}", runner_up);
    }

    match time::timeout(SAVE_TIMEOUT, wait_saved(&mut rx)).await {
        Ok(Some(Ok(()))) => println!("Tournament saved"),
        Ok(Some(Err(err))) => println!("Failed to save tournament: {}", err),
        Ok(None) => log::warn!("Bracket closed before the record was saved"),
        Err(_) => println!("Saving the tournament timed out"),
    }

    Ok(())
}

fn read_roster() -> Result<Roster, Error> {
    let name: NonBlank = Prompt::new("Tournament name").read_valid()?;
    let category: NonBlank = Prompt::new("Category").read_valid()?;

    println!("Bracket sizes:");
    for size in BracketSize::ALL {
        println!("  {:>2}: {}", size.slots(), size);
    }
    let size: BracketSize = Prompt::new("Size").read_valid()?;

    let mut roster = Roster::new(name.0, category.0, size)?;
    for slot in 0..size.slots() {
        let name: NonBlank = Prompt::new(&format!("Competitor {}", slot + 1)).read_valid()?;
        let club: NonBlank = Prompt::new("Club").read_valid()?;

        roster.set(slot, Competitor::new(name.0, club.0))?;
    }

    Ok(roster)
}

fn print_match(index: usize, m: &Match) {
    println!(
        "  [{}] {} vs {}",
        index + 1,
        m.entrant(Side::A),
        m.entrant(Side::B)
    );
}

/// Reads the winner of a match as `a`, `b` or the name of a competitor.
fn read_winner(bracket: &LiveBracket, index: usize, m: &Match) -> Result<(), Error> {
    let msg = format!(
        "Winner of match {} (a: {}, b: {})",
        index + 1,
        m.entrant(Side::A).name,
        m.entrant(Side::B).name
    );
    let prompt = Prompt::new(&msg);

    loop {
        let input: NonBlank = prompt.read_valid()?;

        let res = match input.0.to_lowercase().as_str() {
            "a" => bracket.record_winner(index, Side::A),
            "b" => bracket.record_winner(index, Side::B),
            _ => bracket.record_winner_by_name(index, &input.0),
        };

        match res {
            Ok(_) => return Ok(()),
            Err(err) => println!("{}", err),
        }
    }
}

/// Waits until the record of the completed bracket was written or failed to be written.
async fn wait_saved(rx: &mut broadcast::Receiver<BracketEvent>) -> Option<Result<(), String>> {
    loop {
        match rx.recv().await {
            Ok(BracketEvent::RecordSaved(_)) => return Some(Ok(())),
            Ok(BracketEvent::RecordFailed { error, .. }) => return Some(Err(error)),
            Ok(_) => (),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                log::warn!("Missed {} bracket events", n);
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}
