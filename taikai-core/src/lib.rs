//! # taikai-core
//!
//! This crate contains all the items required to run a single elimination martial-arts
//! tournament and to score a single bout. Nothing in here performs I/O or spawns tasks; see
//! `taikai-live` for the runtime side.
//!
//! Important types:
//! - [`Competitor`]: A name and a club. Competitors are plain values.
//! - [`Tournament`]: An immutable snapshot of a bracket. Every transition returns a new
//! snapshot.
//! - [`Round`]: An ordered list of [`Match`]es. Adjacent matches feed a single match in the
//! next round.
//! - [`Side`]: One of the two spots in a [`Match`]. Winners are stored as a `Side`, never as a
//! name.
//! - [`Clock`]: The countdown state of a bout.
//! - [`Scoreboard`]: Points, penalties and the advantage marker of both sides.
//! - [`Roster`]: The finalized list of competitors together with the tournament name and category.
//! - [`TournamentRecord`]: The result of a finished tournament, ready to be persisted.
//!
//! ## Feature Flags
//!
//! `serde`: Adds `Serialize` and `Deserialize` impls to almost all types.
//!
pub mod bracket;
pub mod clock;
pub mod record;
pub mod roster;
pub mod scoring;

mod competitor;

pub use bracket::{generate_first_round, generate_next_round};
pub use bracket::{Advance, Match, Podium, Round, Side, State, Tournament};
pub use clock::{BoutDuration, Centiseconds, Clock, Tick};
pub use competitor::Competitor;
pub use record::TournamentRecord;
pub use roster::{BracketSize, Roster};
pub use scoring::{Scoreboard, SideScore, MAX_PENALTIES};

use thiserror::Error;

use std::result;

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("not enough competitors: at least 2 are required, found {found}")]
    NotEnoughCompetitors { found: usize },
    #[error("invalid match: round {round} has {length} matches but match {index} was requested")]
    MatchOutOfBounds {
        round: usize,
        index: usize,
        length: usize,
    },
    #[error("round {round} is incomplete: {pending} matches have no winner")]
    IncompleteRound { round: usize, pending: usize },
    #[error("the tournament is already completed")]
    AlreadyCompleted,
    #[error("no competitor named {name:?} in this match")]
    UnknownEntrant { name: String },
    #[error("both competitors in this match are named {name:?}")]
    AmbiguousEntrant { name: String },
    #[error("the bout duration cannot be changed once the clock has started")]
    DurationLocked,
    #[error("invalid bout duration: {0:?}")]
    InvalidDuration(String),
    #[error("invalid bracket size: {0:?}")]
    InvalidBracketSize(String),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("invalid slot: roster has {length} slots but slot {index} was requested")]
    SlotOutOfBounds { index: usize, length: usize },
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(&'static str),
}
