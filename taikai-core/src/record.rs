use chrono::{DateTime, Utc};

use crate::{Competitor, Podium, Roster};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The result of a completed tournament.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TournamentRecord {
    pub tournament_name: String,
    pub category: String,
    pub champion: Competitor,
    pub runner_up: Competitor,
    pub timestamp: DateTime<Utc>,
}

impl TournamentRecord {
    /// Creates a new `TournamentRecord` for `roster` finished at `timestamp`.
    pub fn new(roster: &Roster, podium: &Podium, timestamp: DateTime<Utc>) -> Self {
        Self {
            tournament_name: roster.name().to_owned(),
            category: roster.category().to_owned(),
            champion: podium.champion.clone(),
            runner_up: podium.runner_up.clone(),
            timestamp,
        }
    }

    /// Creates a new `TournamentRecord` for `roster` finished now.
    #[inline]
    pub fn now(roster: &Roster, podium: &Podium) -> Self {
        Self::new(roster, podium, Utc::now())
    }
}
