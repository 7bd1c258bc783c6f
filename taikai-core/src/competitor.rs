use std::fmt::{self, Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A competitor in a tournament.
///
/// Two competitors are equal if both their name and their club are equal. Note that the bracket
/// never uses this equality to find the winner of a match, the winner is always stored as a
/// [`Side`](crate::Side).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Competitor {
    pub name: String,
    pub club: String,
}

impl Competitor {
    #[inline]
    pub fn new<N, C>(name: N, club: C) -> Self
    where
        N: Into<String>,
        C: Into<String>,
    {
        Self {
            name: name.into(),
            club: club.into(),
        }
    }
}

impl Display for Competitor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.club)
    }
}
