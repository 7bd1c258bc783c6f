//! Points, penalties (chui) and the advantage marker (senshu) of a bout.
use crate::Side;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The maximum number of penalties a side can accumulate.
pub const MAX_PENALTIES: u8 = 5;

/// The score of a single side.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SideScore {
    pub points: u32,
    pub penalties: u8,
}

/// The scoring state of both sides of a bout.
///
/// The advantage marker is stored once for the whole board, so at most one side can hold it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scoreboard {
    sides: [SideScore; 2],
    advantage: Option<Side>,
}

impl Scoreboard {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn side(&self, side: Side) -> &SideScore {
        &self.sides[side.index()]
    }

    #[inline]
    fn side_mut(&mut self, side: Side) -> &mut SideScore {
        &mut self.sides[side.index()]
    }

    #[inline]
    pub fn points(&self, side: Side) -> u32 {
        self.side(side).points
    }

    #[inline]
    pub fn penalties(&self, side: Side) -> u8 {
        self.side(side).penalties
    }

    /// Returns the side holding the advantage marker.
    #[inline]
    pub fn advantage(&self) -> Option<Side> {
        self.advantage
    }

    #[inline]
    pub fn has_advantage(&self, side: Side) -> bool {
        self.advantage == Some(side)
    }

    pub fn add_point(&mut self, side: Side) {
        let score = self.side_mut(side);
        score.points = score.points.saturating_add(1);
    }

    pub fn remove_point(&mut self, side: Side) {
        let score = self.side_mut(side);
        score.points = score.points.saturating_sub(1);
    }

    /// Adds a penalty to `side`. Does nothing once [`MAX_PENALTIES`] is reached.
    pub fn add_penalty(&mut self, side: Side) {
        let score = self.side_mut(side);
        if score.penalties < MAX_PENALTIES {
            score.penalties += 1;
        }
    }

    pub fn remove_penalty(&mut self, side: Side) {
        let score = self.side_mut(side);
        score.penalties = score.penalties.saturating_sub(1);
    }

    /// Gives the advantage marker to `side`, taking it from the other side. If `side` already
    /// holds the marker it is cleared instead.
    pub fn toggle_advantage(&mut self, side: Side) {
        self.advantage = match self.advantage {
            Some(holder) if holder == side => None,
            _ => Some(side),
        };
    }

    /// Resets the board for a new bout.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::{Scoreboard, MAX_PENALTIES};
    use crate::Side;

    #[test]
    fn test_points() {
        let mut board = Scoreboard::new();
        board.remove_point(Side::A);
        assert_eq!(board.points(Side::A), 0);

        for _ in 0..12 {
            board.add_point(Side::A);
        }
        board.remove_point(Side::A);
        board.add_point(Side::B);

        assert_eq!(board.points(Side::A), 11);
        assert_eq!(board.points(Side::B), 1);
    }

    #[test]
    fn test_penalty_clamp() {
        let mut board = Scoreboard::new();
        for _ in 0..10 {
            board.add_penalty(Side::B);
        }
        assert_eq!(board.penalties(Side::B), MAX_PENALTIES);
        assert_eq!(board.penalties(Side::A), 0);

        let mut board = Scoreboard::new();
        for _ in 0..10 {
            board.remove_penalty(Side::A);
        }
        assert_eq!(board.penalties(Side::A), 0);
    }

    #[test]
    fn test_toggle_advantage() {
        let mut board = Scoreboard::new();
        assert_eq!(board.advantage(), None);

        board.toggle_advantage(Side::A);
        assert!(board.has_advantage(Side::A));
        assert!(!board.has_advantage(Side::B));

        board.toggle_advantage(Side::B);
        assert!(!board.has_advantage(Side::A));
        assert!(board.has_advantage(Side::B));

        board.toggle_advantage(Side::B);
        assert_eq!(board.advantage(), None);
    }

    #[test]
    fn test_advantage_exclusive() {
        let sequence = [
            Side::A,
            Side::A,
            Side::B,
            Side::A,
            Side::B,
            Side::B,
            Side::A,
            Side::B,
        ];

        let mut board = Scoreboard::new();
        for side in sequence {
            board.toggle_advantage(side);
            assert!(!(board.has_advantage(Side::A) && board.has_advantage(Side::B)));
        }
    }

    #[test]
    fn test_reset() {
        let mut board = Scoreboard::new();
        board.add_point(Side::A);
        board.add_penalty(Side::B);
        board.toggle_advantage(Side::A);

        board.reset();
        assert_eq!(board, Scoreboard::default());
    }
}
