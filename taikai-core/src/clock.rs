//! The countdown state of a bout.
//!
//! [`Clock`] only holds the state and the transitions. It has no notion of wall-clock time;
//! something else has to call [`Clock::tick`] once per [`Centiseconds`] unit.
use crate::{Error, Result};

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A duration in hundredths of a second.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Centiseconds(pub u32);

impl Centiseconds {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs * 100)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Display for Centiseconds {
    /// Formats the duration as `MM:SS.CC`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let minutes = self.0 / 6000;
        let seconds = (self.0 % 6000) / 100;
        let centis = self.0 % 100;

        write!(f, "{:02}:{:02}.{:02}", minutes, seconds, centis)
    }
}

/// The bout durations offered before a bout starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BoutDuration {
    /// 1:30
    Short,
    /// 2:00
    Regular,
    /// 3:00
    Long,
}

impl BoutDuration {
    pub const ALL: [Self; 3] = [Self::Short, Self::Regular, Self::Long];

    #[inline]
    pub fn centiseconds(self) -> Centiseconds {
        match self {
            Self::Short => Centiseconds::from_secs(90),
            Self::Regular => Centiseconds::from_secs(120),
            Self::Long => Centiseconds::from_secs(180),
        }
    }

    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Self::Short => "1:30",
            Self::Regular => "2:00",
            Self::Long => "3:00",
        }
    }
}

impl Default for BoutDuration {
    #[inline]
    fn default() -> Self {
        Self::Short
    }
}

impl Display for BoutDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BoutDuration {
    type Err = Error;

    /// Accepts either the label (`1:30`) or the number of seconds (`90`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        Self::ALL
            .into_iter()
            .find(|duration| {
                duration.label() == s || (duration.centiseconds().0 / 100).to_string() == s
            })
            .ok_or_else(|| Error::InvalidDuration(s.to_owned()))
    }
}

/// The outcome of a single [`Clock::tick`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    /// The clock is not running, nothing changed.
    Idle,
    Decremented,
    /// The clock reached zero on this tick and stopped.
    Expired,
}

/// The countdown of a bout.
///
/// The remaining time never exceeds the selected duration and never drops below zero. The
/// clock stops itself when it reaches zero and stays there until it is [`reset`].
///
/// [`reset`]: Self::reset
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ClockData"))]
pub struct Clock {
    selected: Centiseconds,
    remaining: Centiseconds,
    running: bool,
    started: bool,
}

impl Clock {
    pub fn new(duration: BoutDuration) -> Self {
        let selected = duration.centiseconds();

        Self {
            selected,
            remaining: selected,
            running: false,
            started: false,
        }
    }

    #[inline]
    pub fn selected(&self) -> Centiseconds {
        self.selected
    }

    #[inline]
    pub fn remaining(&self) -> Centiseconds {
        self.remaining
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns `true` if the clock has been started at least once.
    #[inline]
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Selects a new bout duration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DurationLocked`] once the clock has been started. The duration of a bout
    /// is fixed after it began, [`reset`] does not unlock it.
    ///
    /// [`reset`]: Self::reset
    pub fn select_duration(&mut self, duration: BoutDuration) -> Result<()> {
        if self.started {
            return Err(Error::DurationLocked);
        }

        self.selected = duration.centiseconds();
        self.remaining = self.selected;
        Ok(())
    }

    /// Starts the clock. Starting a clock that reached zero does nothing.
    pub fn start(&mut self) {
        if self.remaining.is_zero() {
            return;
        }

        self.running = true;
        self.started = true;
    }

    #[inline]
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Starts the clock if it is stopped and stops it if it is running.
    pub fn toggle(&mut self) {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Stops the clock and restores the selected duration.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining = self.selected;
    }

    /// Advances the clock by one unit.
    pub fn tick(&mut self) -> Tick {
        if !self.running || self.remaining.is_zero() {
            return Tick::Idle;
        }

        self.remaining.0 -= 1;

        if self.remaining.is_zero() {
            self.running = false;
            Tick::Expired
        } else {
            Tick::Decremented
        }
    }
}

impl Default for Clock {
    #[inline]
    fn default() -> Self {
        Self::new(BoutDuration::default())
    }
}

/// The unchecked fields of a deserialized [`Clock`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(rename = "Clock")]
struct ClockData {
    selected: Centiseconds,
    remaining: Centiseconds,
    running: bool,
    started: bool,
}

#[cfg(feature = "serde")]
impl TryFrom<ClockData> for Clock {
    type Error = Error;

    fn try_from(data: ClockData) -> Result<Self> {
        if data.remaining > data.selected {
            return Err(Error::InvalidSnapshot(
                "remaining time exceeds the selected duration",
            ));
        }

        if data.running && (data.remaining.is_zero() || !data.started) {
            return Err(Error::InvalidSnapshot("clock cannot run"));
        }

        Ok(Self {
            selected: data.selected,
            remaining: data.remaining,
            running: data.running,
            started: data.started,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centiseconds_display() {
        assert_eq!(Centiseconds(0).to_string(), "00:00.00");
        assert_eq!(Centiseconds(9000).to_string(), "01:30.00");
        assert_eq!(Centiseconds(17999).to_string(), "02:59.99");
        assert_eq!(Centiseconds(61).to_string(), "00:00.61");
    }

    #[test]
    fn test_bout_duration_parse() {
        assert_eq!("1:30".parse::<BoutDuration>(), Ok(BoutDuration::Short));
        assert_eq!("120".parse::<BoutDuration>(), Ok(BoutDuration::Regular));
        assert_eq!(" 3:00 ".parse::<BoutDuration>(), Ok(BoutDuration::Long));
        assert_eq!(
            "2:30".parse::<BoutDuration>(),
            Err(Error::InvalidDuration(String::from("2:30")))
        );
    }

    #[test]
    fn test_clock_idle() {
        let mut clock = Clock::new(BoutDuration::Short);
        assert_eq!(clock.tick(), Tick::Idle);
        assert_eq!(clock.remaining(), Centiseconds(9000));
    }

    #[test]
    fn test_clock_counts_down_to_zero() {
        let mut clock = Clock::new(BoutDuration::Short);
        clock.start();

        let mut last = clock.remaining();
        for _ in 0..8999 {
            assert_eq!(clock.tick(), Tick::Decremented);
            assert!(clock.remaining() < last);
            last = clock.remaining();
        }

        assert_eq!(clock.tick(), Tick::Expired);
        assert_eq!(clock.remaining(), Centiseconds::ZERO);
        assert!(!clock.is_running());

        // Stays at zero until reset.
        assert_eq!(clock.tick(), Tick::Idle);
        clock.start();
        assert!(!clock.is_running());
        assert_eq!(clock.remaining(), Centiseconds::ZERO);

        clock.reset();
        assert_eq!(clock.remaining(), Centiseconds(9000));
    }

    #[test]
    fn test_clock_pause_resume() {
        let mut clock = Clock::new(BoutDuration::Regular);
        clock.toggle();
        clock.tick();
        clock.tick();
        clock.toggle();
        assert_eq!(clock.tick(), Tick::Idle);
        assert_eq!(clock.remaining(), Centiseconds(11998));

        clock.toggle();
        clock.tick();
        assert_eq!(clock.remaining(), Centiseconds(11997));

        clock.reset();
        assert!(!clock.is_running());
        assert_eq!(clock.remaining(), clock.selected());
    }

    #[test]
    fn test_clock_duration_locked() {
        let mut clock = Clock::default();
        clock.select_duration(BoutDuration::Long).unwrap();
        assert_eq!(clock.remaining(), Centiseconds(18000));

        clock.start();
        clock.stop();
        clock.reset();
        assert_eq!(
            clock.select_duration(BoutDuration::Short),
            Err(Error::DurationLocked)
        );
        assert_eq!(clock.selected(), Centiseconds(18000));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_clock_deserialize() {
        use serde_test::{assert_de_tokens, assert_de_tokens_error, Token};

        fn tokens(selected: u32, remaining: u32, running: bool) -> Vec<Token> {
            vec![
                Token::Struct {
                    name: "Clock",
                    len: 4,
                },
                Token::Str("selected"),
                Token::U32(selected),
                Token::Str("remaining"),
                Token::U32(remaining),
                Token::Str("running"),
                Token::Bool(running),
                Token::Str("started"),
                Token::Bool(true),
                Token::StructEnd,
            ]
        }

        let mut clock = Clock::new(BoutDuration::Short);
        clock.start();
        for _ in 0..250 {
            clock.tick();
        }
        assert_de_tokens(&clock, &tokens(9000, 8750, true));

        assert_de_tokens_error::<Clock>(
            &tokens(9000, 9001, false),
            "invalid snapshot: remaining time exceeds the selected duration",
        );
        assert_de_tokens_error::<Clock>(
            &tokens(9000, 0, true),
            "invalid snapshot: clock cannot run",
        );
    }
}
