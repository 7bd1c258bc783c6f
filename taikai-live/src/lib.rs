//! # taikai-live
//!
//! The runtime side of the TaikaiSensei tools. Everything in here expects to run inside a tokio
//! runtime.
//!
//! - [`LiveBracket`]: A bracket session. Publishes every change and persists the result once a
//! champion is known.
//! - [`MatchClock`]: A [`Clock`](taikai_core::Clock) driven by a cancellable tick task.
//! - [`Bout`]: A match clock together with a scoreboard.
//! - [`Authenticator`] and [`RecordStore`]: The contracts of the external collaborators.
pub mod auth;
pub mod bout;
pub mod bracket;
pub mod clock;
pub mod store;

pub use auth::{AuthError, Authenticator, CredentialField, MemoryAuthenticator, UserId};
pub use bout::{Bout, BoutCommand};
pub use bracket::{BracketEvent, LiveBracket};
pub use clock::MatchClock;
pub use store::{FileStore, MemoryStore, RecordStore, StoreError};

use thiserror::Error;

/// An `Result<T>` using [`enum@Error`] as an error type.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Bracket(#[from] taikai_core::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),
    #[error("no tokio runtime available: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),
}
