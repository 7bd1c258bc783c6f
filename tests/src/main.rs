use std::path::Path;
use std::sync::Arc;

use chrono::{Duration, Utc};
use taikai_core::{BracketSize, Competitor, Roster, Side, TournamentRecord};
use taikai_live::auth::{hash_secret, UserEntry};
use taikai_live::{
    AuthError, Authenticator, BracketEvent, CredentialField, FileStore, LiveBracket,
    MemoryAuthenticator, RecordStore, UserId,
};

#[tokio::main]
async fn main() {
    let dir = tempfile::tempdir().unwrap();

    let user = login(dir.path()).await;
    run_bracket(dir.path(), &user).await;
    history(dir.path(), &user).await;

    println!("ok");
}

async fn login(dir: &Path) -> UserId {
    let users = vec![UserEntry {
        id: UserId::from("sensei-1"),
        identifier: String::from("sensei@dojo.example"),
        secret_sha256: hash_secret("oss"),
    }];

    let path = dir.join("users.json");
    tokio::fs::write(&path, serde_json::to_vec(&users).unwrap())
        .await
        .unwrap();

    let auth = MemoryAuthenticator::from_file(&path).await.unwrap();

    let err = auth.login("sensei", "oss").await.unwrap_err();
    assert_eq!(err, AuthError::InvalidIdentifier);
    assert_eq!(err.field(), Some(CredentialField::Identifier));

    let err = auth.login("sensei@dojo.example", "os").await.unwrap_err();
    assert_eq!(err.field(), Some(CredentialField::Secret));

    auth.login("sensei@dojo.example", "oss").await.unwrap()
}

async fn run_bracket(dir: &Path, user: &UserId) {
    let store: Arc<dyn RecordStore> = Arc::new(FileStore::new(dir.join("tournaments.json")));

    let mut roster = Roster::new("Copa Primavera", "Kumite -60kg", BracketSize::Quarterfinals)
        .unwrap();
    for slot in 0..roster.size().slots() {
        let competitor = Competitor::new(format!("K{}", slot), "Shotokan Norte");
        roster.set(slot, competitor).unwrap();
    }

    let bracket = LiveBracket::new(roster, user.clone(), store).unwrap();
    let mut rx = bracket.subscribe();

    // The lower seat of every match wins.
    loop {
        let tournament = bracket.snapshot();
        for index in 0..tournament.current_round().len() {
            bracket.record_winner(index, Side::A).unwrap();
        }

        if bracket.advance().unwrap().is_completed() {
            break;
        }
    }

    let tournament = bracket.snapshot();
    assert_eq!(tournament.rounds().len(), 3);
    assert_eq!(tournament.champion().unwrap().name, "K0");
    assert_eq!(tournament.runner_up().unwrap().name, "K4");

    loop {
        match rx.recv().await.unwrap() {
            BracketEvent::RecordSaved(record) => {
                assert_eq!(record.champion.name, "K0");
                break;
            }
            BracketEvent::RecordFailed { error, .. } => panic!("failed to save record: {}", error),
            _ => (),
        }
    }
}

async fn history(dir: &Path, user: &UserId) {
    let store = FileStore::new(dir.join("tournaments.json"));

    let records = store.list(user).await.unwrap();
    assert_eq!(records.len(), 1);

    let newest = records[0].clone();
    let older = TournamentRecord {
        tournament_name: String::from("Copa Invierno"),
        timestamp: newest.timestamp - Duration::days(90),
        ..newest.clone()
    };
    store.insert(user, &older).await.unwrap();

    let other = UserId::from("sensei-2");
    store.insert(&other, &older).await.unwrap();

    let records = store.list(user).await.unwrap();
    assert_eq!(
        records
            .iter()
            .map(|record| record.tournament_name.as_str())
            .collect::<Vec<_>>(),
        ["Copa Primavera", "Copa Invierno"]
    );
    assert!(records[0].timestamp <= Utc::now());
    assert_eq!(store.list(&other).await.unwrap().len(), 1);
}
