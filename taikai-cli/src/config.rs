use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

macro_rules! from_environment {
    ($config:expr, $($key:expr, $name:tt),*$(,)?) => {{
        $(
            {
                if let Ok(value) = env::var($key) {
                    if let Ok(value) = value.parse() {
                        $config.$name = value;
                    }
                }
            }
        )*
    }};
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub loglevel: LevelFilter,
    /// Path of the JSON document holding the finished tournaments.
    pub store: PathBuf,
    /// Path of the JSON list of users allowed to log in.
    pub users: PathBuf,
    /// Tick period of the match clock in milliseconds.
    pub tick_ms: u64,
}

impl Config {
    pub async fn from_file<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let mut file = File::open(path).await?;

        let mut buf = Vec::new();
        file.read_to_end(&mut buf).await?;

        Ok(toml::from_slice(&buf)?)
    }

    /// Loads the config file at `path`, falling back to the defaults if it does not exist.
    /// Environment variables override the values from the file.
    pub async fn load<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(err),
        };

        Ok(config.with_environment())
    }

    pub fn with_environment(mut self) -> Self {
        from_environment!(
            self,
            "TAIKAI_LOGLEVEL",
            loglevel,
            "TAIKAI_STORE",
            store,
            "TAIKAI_USERS",
            users,
            "TAIKAI_TICK_MS",
            tick_ms,
        );

        self
    }

    /// Returns the tick period of the match clock. A period of zero is raised to 1ms.
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Warn,
            store: PathBuf::from("tournaments.json"),
            users: PathBuf::from("users.json"),
            tick_ms: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
