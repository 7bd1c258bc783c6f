use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use taikai_core::{BoutDuration, Clock, Scoreboard, Side};
use tokio::sync::watch;

use crate::clock::MatchClock;
use crate::{Error, Result};

/// A single user action on the scoreboard screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoutCommand {
    Start,
    Stop,
    /// Start the clock if it is stopped, stop it otherwise.
    Toggle,
    Reset,
    AddPoint(Side),
    RemovePoint(Side),
    AddPenalty(Side),
    RemovePenalty(Side),
    ToggleAdvantage(Side),
}

impl FromStr for BoutCommand {
    type Err = Error;

    /// Parses commands like `start`, `a+` (point), `bp-` (penalty) or `as` (advantage).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        let cmd = match s {
            "start" => Self::Start,
            "stop" => Self::Stop,
            "toggle" | "" => Self::Toggle,
            "reset" => Self::Reset,
            _ => {
                let mut chars = s.chars();
                let side = match chars.next() {
                    Some('a') => Side::A,
                    Some('b') => Side::B,
                    _ => return Err(Error::InvalidCommand(s.to_owned())),
                };

                match chars.as_str() {
                    "+" => Self::AddPoint(side),
                    "-" => Self::RemovePoint(side),
                    "p+" => Self::AddPenalty(side),
                    "p-" => Self::RemovePenalty(side),
                    "s" => Self::ToggleAdvantage(side),
                    _ => return Err(Error::InvalidCommand(s.to_owned())),
                }
            }
        };

        Ok(cmd)
    }
}

/// A live bout: a [`MatchClock`] and a [`Scoreboard`].
///
/// The clock and the scoreboard are independent. Every command is applied as a whole before the
/// next one.
#[derive(Clone, Debug)]
pub struct Bout {
    clock: MatchClock,
    scoreboard: Arc<Mutex<Scoreboard>>,
    tx: Arc<watch::Sender<Scoreboard>>,
}

impl Bout {
    pub fn new(duration: BoutDuration, period: Duration) -> Self {
        let (tx, _) = watch::channel(Scoreboard::new());

        Self {
            clock: MatchClock::with_period(duration, period),
            scoreboard: Arc::new(Mutex::new(Scoreboard::new())),
            tx: Arc::new(tx),
        }
    }

    #[inline]
    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    pub fn scoreboard(&self) -> Scoreboard {
        *self.scoreboard.lock()
    }

    pub fn watch_scoreboard(&self) -> watch::Receiver<Scoreboard> {
        self.tx.subscribe()
    }

    /// Returns the current clock and scoreboard.
    pub fn snapshot(&self) -> (Clock, Scoreboard) {
        (self.clock.snapshot(), self.scoreboard())
    }

    /// Applies `cmd` to the clock or the scoreboard.
    ///
    /// # Errors
    ///
    /// Starting the clock fails without a tokio runtime.
    pub fn apply(&self, cmd: BoutCommand) -> Result<()> {
        log::debug!("Applying bout command {:?}", cmd);

        match cmd {
            BoutCommand::Start => self.clock.start()?,
            BoutCommand::Stop => self.clock.stop(),
            BoutCommand::Toggle => self.clock.toggle()?,
            BoutCommand::Reset => self.clock.reset(),
            BoutCommand::AddPoint(side) => self.update(|board| board.add_point(side)),
            BoutCommand::RemovePoint(side) => self.update(|board| board.remove_point(side)),
            BoutCommand::AddPenalty(side) => self.update(|board| board.add_penalty(side)),
            BoutCommand::RemovePenalty(side) => self.update(|board| board.remove_penalty(side)),
            BoutCommand::ToggleAdvantage(side) => {
                self.update(|board| board.toggle_advantage(side))
            }
        }

        Ok(())
    }

    fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Scoreboard),
    {
        let mut board = self.scoreboard.lock();
        f(&mut board);
        self.tx.send_replace(*board);
    }
}
