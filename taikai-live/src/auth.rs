use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// The opaque identity of an authenticated user.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct UserId(pub String);

impl Display for UserId {
    #[inline]
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl AsRef<str> for UserId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    #[inline]
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// The credential a failed login should be blamed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CredentialField {
    Identifier,
    Secret,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("the identifier is malformed")]
    InvalidIdentifier,
    #[error("no user with this identifier exists")]
    UnknownIdentifier,
    #[error("wrong secret")]
    WrongSecret,
    #[error("authentication unavailable: {0}")]
    Unavailable(String),
}

impl AuthError {
    /// Returns the [`CredentialField`] that caused the error, if any.
    pub fn field(&self) -> Option<CredentialField> {
        match self {
            Self::InvalidIdentifier | Self::UnknownIdentifier => Some(CredentialField::Identifier),
            Self::WrongSecret => Some(CredentialField::Secret),
            Self::Unavailable(_) => None,
        }
    }
}

/// Accepts credentials and returns the identity of the user.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, identifier: &str, secret: &str) -> Result<UserId, AuthError>;
}

/// A user known to a [`MemoryAuthenticator`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub id: UserId,
    pub identifier: String,
    /// Hex encoded SHA-256 digest of the secret.
    pub secret_sha256: String,
}

/// An [`Authenticator`] with a fixed list of users.
#[derive(Clone, Debug, Default)]
pub struct MemoryAuthenticator {
    users: Vec<UserEntry>,
}

impl MemoryAuthenticator {
    #[inline]
    pub fn new(users: Vec<UserEntry>) -> Self {
        Self { users }
    }

    /// Loads the users from a JSON file containing a list of [`UserEntry`]s.
    pub async fn from_file<P>(path: P) -> Result<Self, AuthError>
    where
        P: AsRef<Path>,
    {
        let buf = tokio::fs::read(path.as_ref()).await.map_err(unavailable)?;
        let users: Vec<UserEntry> =
            serde_json::from_slice(&buf).map_err(|err| AuthError::Unavailable(err.to_string()))?;

        log::debug!(
            "Loaded {} users from {}",
            users.len(),
            path.as_ref().display()
        );

        Ok(Self { users })
    }
}

#[async_trait]
impl Authenticator for MemoryAuthenticator {
    async fn login(&self, identifier: &str, secret: &str) -> Result<UserId, AuthError> {
        log::debug!("Trying to authenticate {:?}", identifier);

        if !is_valid_identifier(identifier) {
            return Err(AuthError::InvalidIdentifier);
        }

        let user = self
            .users
            .iter()
            .find(|user| user.identifier == identifier)
            .ok_or(AuthError::UnknownIdentifier)?;

        if !hash_secret(secret).eq_ignore_ascii_case(&user.secret_sha256) {
            return Err(AuthError::WrongSecret);
        }

        Ok(user.id.clone())
    }
}

/// Returns the hex encoded SHA-256 digest of `secret`.
pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Identifiers are email addresses: `local@domain.tld` without whitespace.
fn is_valid_identifier(identifier: &str) -> bool {
    if identifier.chars().any(char::is_whitespace) {
        return false;
    }

    match identifier.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
        }
        None => false,
    }
}

fn unavailable(err: io::Error) -> AuthError {
    AuthError::Unavailable(err.to_string())
}
