//! The finalized list of competitors.
use crate::{Competitor, Error, Result, Tournament};

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The number of slots in a bracket, named after the first round it starts with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BracketSize {
    Semifinals,
    Quarterfinals,
    RoundOf16,
    RoundOf32,
}

impl BracketSize {
    pub const ALL: [Self; 4] = [
        Self::Semifinals,
        Self::Quarterfinals,
        Self::RoundOf16,
        Self::RoundOf32,
    ];

    /// Returns the number of competitors in this bracket.
    #[inline]
    pub fn slots(self) -> usize {
        match self {
            Self::Semifinals => 4,
            Self::Quarterfinals => 8,
            Self::RoundOf16 => 16,
            Self::RoundOf32 => 32,
        }
    }

    /// Returns the `BracketSize` with exactly `slots` slots.
    pub fn from_slots(slots: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.slots() == slots)
    }
}

impl Display for BracketSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Semifinals => "Semifinals",
            Self::Quarterfinals => "Quarterfinals",
            Self::RoundOf16 => "Round of 16",
            Self::RoundOf32 => "Round of 32",
        };

        write!(f, "{} ({} competitors)", name, self.slots())
    }
}

impl FromStr for BracketSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse()
            .ok()
            .and_then(Self::from_slots)
            .ok_or_else(|| Error::InvalidBracketSize(s.to_owned()))
    }
}

/// The roster of a tournament.
///
/// A `Roster` always has exactly [`BracketSize::slots`] competitors. Slots start out with a
/// default (empty) competitor and are replaced one by one. The competitors themselves are not
/// validated.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Roster {
    name: String,
    category: String,
    size: BracketSize,
    competitors: Vec<Competitor>,
}

impl Roster {
    /// Creates a new `Roster` with empty slots.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if `name` or `category` are blank.
    pub fn new<N, C>(name: N, category: C, size: BracketSize) -> Result<Self>
    where
        N: Into<String>,
        C: Into<String>,
    {
        let name = name.into();
        let category = category.into();

        if name.trim().is_empty() {
            return Err(Error::MissingField("name"));
        }

        if category.trim().is_empty() {
            return Err(Error::MissingField("category"));
        }

        Ok(Self {
            name,
            category,
            size,
            competitors: vec![Competitor::default(); size.slots()],
        })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[inline]
    pub fn size(&self) -> BracketSize {
        self.size
    }

    #[inline]
    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    /// Replaces the competitor in `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SlotOutOfBounds`] if `slot` is not a valid slot for the bracket size.
    pub fn set(&mut self, slot: usize, competitor: Competitor) -> Result<()> {
        let length = self.competitors.len();
        let spot = self
            .competitors
            .get_mut(slot)
            .ok_or(Error::SlotOutOfBounds {
                index: slot,
                length,
            })?;

        *spot = competitor;
        Ok(())
    }

    /// Builds the [`Tournament`] for this roster.
    pub fn tournament(&self) -> Result<Tournament> {
        log::debug!(
            "Finalizing roster {:?} ({}) with {} competitors",
            self.name,
            self.category,
            self.competitors.len()
        );

        Tournament::new(&self.competitors)
    }
}
