mod bout;
mod bracket;
mod config;
mod history;
mod logger;
mod utils;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use taikai_core::BoutDuration;
use taikai_live::auth::hash_secret;
use taikai_live::{AuthError, Authenticator, CredentialField, MemoryAuthenticator, UserId};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::utils::Prompt;

#[derive(Debug, Parser)]
#[clap(version, about)]
pub struct Args {
    /// Path of the config file.
    #[clap(short, long, default_value = "taikai.toml")]
    config: PathBuf,
    #[clap(short, long)]
    username: Option<String>,
    #[clap(short, long)]
    password: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a roster and run its bracket until a champion is known.
    Bracket,
    /// List the finished tournaments, newest first.
    History,
    /// Run the clock and scoreboard of a single bout.
    Bout {
        /// Bout duration: 1:30, 2:00 or 3:00.
        #[clap(short, long, default_value = "1:30")]
        duration: BoutDuration,
    },
    /// Print the digest of a secret for the users file.
    HashSecret { secret: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Live(#[from] taikai_live::Error),
    #[error(transparent)]
    Core(#[from] taikai_core::Error),
    #[error("Failed to authorize: {0}")]
    Unauthorized(AuthError),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::load(&args.config).await {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load {}: {}", args.config.display(), err);
            std::process::exit(1);
        }
    };

    logger::init(config.loglevel);
    log::debug!("Using config: {:?}", config);

    let res = match args.command {
        Command::HashSecret { secret } => {
            println!("{}", hash_secret(&secret));
            Ok(())
        }
        Command::Bout { duration } => bout::run(&config, duration).await,
        Command::Bracket => match login(&config, args.username, args.password).await {
            Ok(user) => bracket::run(&config, user).await,
            Err(err) => Err(err),
        },
        Command::History => match login(&config, args.username, args.password).await {
            Ok(user) => history::run(&config, &user).await,
            Err(err) => Err(err),
        },
    };

    if let Err(err) = res {
        println!("{}", err);
        std::process::exit(1);
    }
}

/// Logs in with the given credentials, prompting for the missing ones.
async fn login(
    config: &Config,
    username: Option<String>,
    password: Option<String>,
) -> Result<UserId, Error> {
    let auth = MemoryAuthenticator::from_file(&config.users)
        .await
        .map_err(Error::Unauthorized)?;

    let username = match username {
        Some(username) => username,
        None => Prompt::new("Email").read_valid()?,
    };
    let password = match password {
        Some(password) => password,
        None => Prompt::new("Password").read_valid()?,
    };

    match auth.login(&username, &password).await {
        Ok(user) => {
            println!("Logged in");
            Ok(user)
        }
        Err(err) => {
            match err.field() {
                Some(CredentialField::Identifier) => println!("Check the email address"),
                Some(CredentialField::Secret) => println!("Check the password"),
                None => (),
            }

            Err(Error::Unauthorized(err))
        }
    }
}
