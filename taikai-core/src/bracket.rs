//! The single elimination bracket.
//!
//! A [`Tournament`] is built round by round. Only the first [`Round`] exists when the tournament
//! is created; every following round is derived from the winners of the previous one once all of
//! its matches are decided. The winners keep the order of their matches, so the winners of
//! match `2i` and match `2i + 1` meet in match `i` of the next round.
//!
//! All transitions take `&self` and return a new snapshot, the old snapshot stays valid.
use crate::{Competitor, Error, Result};

use std::ops::{Deref, Index};
use std::slice::Iter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the two spots in a [`Match`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    /// Returns the opposing side.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

/// A match between two competitors.
///
/// The winner is either unset or one of the two [`Side`]s. It can be changed freely until the
/// round is advanced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Match {
    entrants: [Competitor; 2],
    winner: Option<Side>,
}

impl Match {
    /// Creates a new undecided `Match`.
    #[inline]
    pub fn new(a: Competitor, b: Competitor) -> Self {
        Self {
            entrants: [a, b],
            winner: None,
        }
    }

    #[inline]
    pub fn entrants(&self) -> &[Competitor; 2] {
        &self.entrants
    }

    /// Returns the competitor at `side`.
    #[inline]
    pub fn entrant(&self, side: Side) -> &Competitor {
        &self.entrants[side.index()]
    }

    #[inline]
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Returns `true` if a winner has been declared for this match.
    #[inline]
    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner_entrant(&self) -> Option<&Competitor> {
        self.winner.map(|side| self.entrant(side))
    }

    pub fn loser_entrant(&self) -> Option<&Competitor> {
        self.winner.map(|side| self.entrant(side.other()))
    }

    /// Resolves the [`Side`] of the competitor called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEntrant`] if no competitor in this match is called `name` and
    /// [`Error::AmbiguousEntrant`] if both are.
    pub fn resolve(&self, name: &str) -> Result<Side> {
        let matching: Vec<Side> = Side::ALL
            .into_iter()
            .filter(|side| self.entrant(*side).name == name)
            .collect();

        match matching[..] {
            [side] => Ok(side),
            [] => Err(Error::UnknownEntrant {
                name: name.to_owned(),
            }),
            _ => Err(Error::AmbiguousEntrant {
                name: name.to_owned(),
            }),
        }
    }
}

impl Index<Side> for Match {
    type Output = Competitor;

    #[inline]
    fn index(&self, side: Side) -> &Self::Output {
        self.entrant(side)
    }
}

/// A full layer of the bracket.
///
/// This is a read-only wrapper around a `Vec<Match>`. The order of the matches is the bracket
/// position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Round {
    matches: Vec<Match>,
}

impl Round {
    /// Pairs `competitors` by position: (0, 1), (2, 3), ... An unpaired last competitor is
    /// dropped.
    fn pair(competitors: &[Competitor]) -> Self {
        let mut pairs = competitors.chunks_exact(2);

        let matches = pairs
            .by_ref()
            .map(|pair| Match::new(pair[0].clone(), pair[1].clone()))
            .collect();

        if let [dropped] = pairs.remainder() {
            log::warn!("Dropping unpaired competitor {}", dropped);
        }

        Self { matches }
    }

    /// Returns `true` if every match in the round has a winner.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.matches.iter().all(Match::is_decided)
    }

    /// Returns the number of matches without a winner.
    pub fn pending(&self) -> usize {
        self.matches.iter().filter(|m| !m.is_decided()).count()
    }

    /// Returns the winners of all decided matches in bracket order.
    pub fn winners(&self) -> Vec<Competitor> {
        self.matches
            .iter()
            .filter_map(Match::winner_entrant)
            .cloned()
            .collect()
    }
}

impl Deref for Round {
    type Target = [Match];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.matches
    }
}

impl From<Vec<Match>> for Round {
    #[inline]
    fn from(matches: Vec<Match>) -> Self {
        Self { matches }
    }
}

impl FromIterator<Match> for Round {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Match>,
    {
        Self {
            matches: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Round {
    type Item = &'a Match;
    type IntoIter = Iter<'a, Match>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Creates the first round from the finalized list of competitors.
pub fn generate_first_round(competitors: &[Competitor]) -> Round {
    log::debug!(
        "Creating first round with {} competitors",
        competitors.len()
    );

    Round::pair(competitors)
}

/// Creates the next round from the `winners` of the previous round. `winners` must be in the
/// order of the matches they won.
pub fn generate_next_round(winners: &[Competitor]) -> Round {
    log::debug!("Creating next round with {} winners", winners.len());

    Round::pair(winners)
}

/// The champion and the runner-up of a completed tournament.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Podium {
    pub champion: Competitor,
    pub runner_up: Competitor,
}

/// The state of a [`Tournament`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State<'a> {
    /// Winners are being collected for the round at index `round`.
    Collecting { round: usize },
    Completed(&'a Podium),
}

/// The result of [`Tournament::advance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// A new round has been appended and is now the current round.
    NextRound(Tournament),
    /// The last round produced a single winner.
    Completed(Tournament),
}

impl Advance {
    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    #[inline]
    pub fn tournament(&self) -> &Tournament {
        match self {
            Self::NextRound(tournament) => tournament,
            Self::Completed(tournament) => tournament,
        }
    }

    #[inline]
    pub fn into_tournament(self) -> Tournament {
        match self {
            Self::NextRound(tournament) => tournament,
            Self::Completed(tournament) => tournament,
        }
    }
}

/// A snapshot of a single elimination tournament.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TournamentData"))]
pub struct Tournament {
    rounds: Vec<Round>,
    current: usize,
    podium: Option<Podium>,
}

/// The unchecked fields of a deserialized [`Tournament`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(rename = "Tournament")]
struct TournamentData {
    rounds: Vec<Round>,
    current: usize,
    podium: Option<Podium>,
}

#[cfg(feature = "serde")]
impl TryFrom<TournamentData> for Tournament {
    type Error = Error;

    fn try_from(data: TournamentData) -> Result<Self> {
        let current = data
            .rounds
            .get(data.current)
            .ok_or(Error::InvalidSnapshot("current round out of bounds"))?;

        if !data.rounds[..data.current].iter().all(Round::is_complete) {
            return Err(Error::InvalidSnapshot("a previous round is incomplete"));
        }

        if data.podium.is_some() && (current.len() != 1 || !current.is_complete()) {
            return Err(Error::InvalidSnapshot("podium without a decided final"));
        }

        Ok(Self {
            rounds: data.rounds,
            current: data.current,
            podium: data.podium,
        })
    }
}

impl Tournament {
    /// Creates a new `Tournament` with the first round generated from `competitors`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotEnoughCompetitors`] if less than two competitors are given.
    pub fn new(competitors: &[Competitor]) -> Result<Self> {
        if competitors.len() < 2 {
            return Err(Error::NotEnoughCompetitors {
                found: competitors.len(),
            });
        }

        Ok(Self {
            rounds: vec![generate_first_round(competitors)],
            current: 0,
            podium: None,
        })
    }

    /// Returns all rounds created so far, including the current one.
    #[inline]
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    #[inline]
    pub fn current_round(&self) -> &Round {
        &self.rounds[self.current]
    }

    #[inline]
    pub fn current_round_index(&self) -> usize {
        self.current
    }

    #[inline]
    pub fn podium(&self) -> Option<&Podium> {
        self.podium.as_ref()
    }

    #[inline]
    pub fn champion(&self) -> Option<&Competitor> {
        self.podium.as_ref().map(|podium| &podium.champion)
    }

    #[inline]
    pub fn runner_up(&self) -> Option<&Competitor> {
        self.podium.as_ref().map(|podium| &podium.runner_up)
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.podium.is_some()
    }

    pub fn state(&self) -> State<'_> {
        match &self.podium {
            Some(podium) => State::Completed(podium),
            None => State::Collecting {
                round: self.current,
            },
        }
    }

    /// Declares the competitor at `side` the winner of the match at `index` in the current
    /// round. A previously declared winner is replaced.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if the tournament is already completed or `index` is
    /// out-of-bounds.
    pub fn record_winner(&self, index: usize, side: Side) -> Result<Self> {
        if self.is_completed() {
            return Err(Error::AlreadyCompleted);
        }

        let round = self.current;
        let length = self.current_round().len();

        let mut next = self.clone();
        let r#match = next.rounds[round]
            .matches
            .get_mut(index)
            .ok_or(Error::MatchOutOfBounds {
                round,
                index,
                length,
            })?;

        log::debug!(
            "Recording {} as winner of match {} in round {}",
            r#match.entrant(side),
            index,
            round
        );

        r#match.winner = Some(side);

        Ok(next)
    }

    /// Declares the competitor called `name` the winner of the match at `index` in the current
    /// round.
    ///
    /// # Errors
    ///
    /// Returns an [`enum@Error`] if the name matches none or both competitors of the match, in
    /// addition to the errors of [`record_winner`].
    ///
    /// [`record_winner`]: Self::record_winner
    pub fn record_winner_by_name(&self, index: usize, name: &str) -> Result<Self> {
        let length = self.current_round().len();
        let r#match = self
            .current_round()
            .get(index)
            .ok_or(Error::MatchOutOfBounds {
                round: self.current,
                index,
                length,
            })?;

        let side = r#match.resolve(name)?;
        self.record_winner(index, side)
    }

    /// Advances the tournament once every match in the current round has a winner.
    ///
    /// If the current round produced a single winner the tournament is completed, otherwise
    /// the next round is generated from the winners.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteRound`] if any match in the current round has no winner and
    /// [`Error::AlreadyCompleted`] if the tournament is already completed.
    pub fn advance(&self) -> Result<Advance> {
        if self.is_completed() {
            return Err(Error::AlreadyCompleted);
        }

        let round = self.current_round();

        let pending = round.pending();
        if pending != 0 {
            return Err(Error::IncompleteRound {
                round: self.current,
                pending,
            });
        }

        let mut next = self.clone();

        if let [final_match] = &round[..] {
            if let (Some(champion), Some(runner_up)) =
                (final_match.winner_entrant(), final_match.loser_entrant())
            {
                log::debug!("Tournament completed, champion: {}", champion);

                next.podium = Some(Podium {
                    champion: champion.clone(),
                    runner_up: runner_up.clone(),
                });

                return Ok(Advance::Completed(next));
            }
        }

        next.rounds.push(generate_next_round(&round.winners()));
        next.current += 1;

        log::debug!("Advanced to round {}", next.current);

        Ok(Advance::NextRound(next))
    }
}

#[cfg(test)]
mod tests {
    use crate::competitors;

    use super::*;

    fn decide_all(mut tournament: Tournament, side: Side) -> Tournament {
        for index in 0..tournament.current_round().len() {
            tournament = tournament.record_winner(index, side).unwrap();
        }

        tournament
    }

    #[test]
    fn test_generate_first_round() {
        let round = generate_first_round(&competitors![]);
        assert!(round.is_empty());

        let competitors = competitors!["A", "B", "C", "D", "E", "F"];
        let round = generate_first_round(&competitors);

        assert_eq!(round.len(), 3);
        for (i, r#match) in round.iter().enumerate() {
            assert_eq!(r#match.entrant(Side::A), &competitors[2 * i]);
            assert_eq!(r#match.entrant(Side::B), &competitors[2 * i + 1]);
            assert_eq!(r#match.winner(), None);
        }

        // Input stays untouched.
        assert_eq!(competitors, competitors!["A", "B", "C", "D", "E", "F"]);
    }

    #[test]
    fn test_generate_first_round_odd() {
        let round = generate_first_round(&competitors!["A"]);
        assert!(round.is_empty());

        let round = generate_first_round(&competitors!["A", "B", "C", "D", "E"]);
        assert_eq!(round.len(), 2);
        assert!(round
            .iter()
            .flat_map(|m| m.entrants().iter())
            .all(|c| c.name != "E"));
    }

    #[test]
    fn test_generate_next_round() {
        let round = generate_next_round(&competitors!["A", "D", "F", "G"]);

        assert_eq!(
            round,
            Round::from(vec![
                Match::new(Competitor::new("A", "Club"), Competitor::new("D", "Club")),
                Match::new(Competitor::new("F", "Club"), Competitor::new("G", "Club")),
            ])
        );
    }

    #[test]
    fn test_match_resolve() {
        let r#match = Match::new(Competitor::new("A", "X"), Competitor::new("B", "Y"));
        assert_eq!(r#match.resolve("A"), Ok(Side::A));
        assert_eq!(r#match.resolve("B"), Ok(Side::B));
        assert_eq!(
            r#match.resolve("C"),
            Err(Error::UnknownEntrant {
                name: String::from("C")
            })
        );

        let r#match = Match::new(Competitor::new("A", "X"), Competitor::new("A", "Y"));
        assert_eq!(
            r#match.resolve("A"),
            Err(Error::AmbiguousEntrant {
                name: String::from("A")
            })
        );
    }

    #[test]
    fn test_tournament_new() {
        assert_eq!(
            Tournament::new(&competitors![]),
            Err(Error::NotEnoughCompetitors { found: 0 })
        );
        assert_eq!(
            Tournament::new(&competitors!["A"]),
            Err(Error::NotEnoughCompetitors { found: 1 })
        );

        let tournament = Tournament::new(&competitors!["A", "B", "C", "D"]).unwrap();
        assert_eq!(tournament.rounds().len(), 1);
        assert_eq!(tournament.current_round_index(), 0);
        assert_eq!(tournament.current_round().len(), 2);
        assert_eq!(tournament.state(), State::Collecting { round: 0 });
        assert_eq!(tournament.champion(), None);
    }

    #[test]
    fn test_record_winner() {
        let tournament = Tournament::new(&competitors!["A", "B", "C", "D"]).unwrap();

        let next = tournament.record_winner(0, Side::A).unwrap();
        assert_eq!(next.current_round()[0].winner(), Some(Side::A));
        // The previous snapshot is unchanged.
        assert_eq!(tournament.current_round()[0].winner(), None);

        // Switching the winner before advancing is allowed.
        let next = next.record_winner(0, Side::B).unwrap();
        assert_eq!(next.current_round()[0].winner(), Some(Side::B));

        assert_eq!(
            next.record_winner(2, Side::A),
            Err(Error::MatchOutOfBounds {
                round: 0,
                index: 2,
                length: 2
            })
        );

        let next = next.record_winner_by_name(1, "C").unwrap();
        assert_eq!(next.current_round()[1].winner(), Some(Side::A));
    }

    #[test]
    fn test_advance_incomplete() {
        let tournament = Tournament::new(&competitors!["A", "B", "C", "D"]).unwrap();
        assert_eq!(
            tournament.advance(),
            Err(Error::IncompleteRound {
                round: 0,
                pending: 2
            })
        );

        let tournament = tournament.record_winner(1, Side::A).unwrap();
        assert_eq!(
            tournament.advance(),
            Err(Error::IncompleteRound {
                round: 0,
                pending: 1
            })
        );
    }

    #[test]
    fn test_advance_halves_rounds() {
        let competitors: Vec<Competitor> = (0..16)
            .map(|i| Competitor::new(format!("C{}", i), "Club"))
            .collect();

        let mut tournament = Tournament::new(&competitors).unwrap();
        let mut expected = 8;

        loop {
            assert_eq!(tournament.current_round().len(), expected);

            let advance = decide_all(tournament, Side::B).advance().unwrap();
            if expected == 1 {
                assert!(advance.is_completed());
                tournament = advance.into_tournament();
                break;
            }

            assert!(!advance.is_completed());
            tournament = advance.into_tournament();
            assert_eq!(tournament.champion(), None);
            expected /= 2;
        }

        assert_eq!(tournament.rounds().len(), 4);
        assert_eq!(tournament.champion().unwrap().name, "C15");
        assert_eq!(tournament.runner_up().unwrap().name, "C7");
    }

    #[test]
    fn test_tournament_scenario() {
        let tournament = Tournament::new(&competitors!["A", "B", "C", "D"]).unwrap();
        assert_eq!(
            tournament.current_round().winners(),
            Vec::<Competitor>::new()
        );

        let tournament = tournament
            .record_winner(0, Side::A)
            .unwrap()
            .record_winner(1, Side::B)
            .unwrap();

        let tournament = match tournament.advance().unwrap() {
            Advance::NextRound(tournament) => tournament,
            Advance::Completed(_) => panic!("tournament completed after the first round"),
        };

        assert_eq!(tournament.current_round_index(), 1);
        assert_eq!(
            tournament.current_round(),
            &Round::from(vec![Match::new(
                Competitor::new("A", "Club"),
                Competitor::new("D", "Club"),
            )])
        );

        let tournament = tournament.record_winner(0, Side::A).unwrap();
        let tournament = match tournament.advance().unwrap() {
            Advance::Completed(tournament) => tournament,
            Advance::NextRound(_) => panic!("tournament not completed after the final"),
        };

        let podium = tournament.podium().unwrap();
        assert_eq!(podium.champion.name, "A");
        assert_eq!(podium.runner_up.name, "D");
        assert_eq!(tournament.state(), State::Completed(podium));

        assert_eq!(tournament.advance(), Err(Error::AlreadyCompleted));
        assert_eq!(
            tournament.record_winner(0, Side::B),
            Err(Error::AlreadyCompleted)
        );
    }

    #[test]
    fn test_runner_up_never_champion() {
        // Same name, different clubs: the podium is resolved by side, not by name.
        let competitors = vec![Competitor::new("A", "X"), Competitor::new("A", "Y")];

        for side in Side::ALL {
            let tournament = Tournament::new(&competitors)
                .unwrap()
                .record_winner(0, side)
                .unwrap()
                .advance()
                .unwrap()
                .into_tournament();

            let podium = tournament.podium().unwrap();
            assert_eq!(podium.champion, competitors[side.index()]);
            assert_eq!(podium.runner_up, competitors[side.other().index()]);
            assert_ne!(podium.champion, podium.runner_up);
        }
    }

    #[test]
    fn test_advance_drops_odd_winner() {
        let tournament = Tournament::new(&competitors!["A", "B", "C", "D", "E", "F"]).unwrap();
        let tournament = decide_all(tournament, Side::A)
            .advance()
            .unwrap()
            .into_tournament();

        // Winners A, C, E: E has no opponent and is dropped.
        assert_eq!(tournament.current_round().len(), 1);
        assert_eq!(tournament.current_round()[0].entrant(Side::A).name, "A");
        assert_eq!(tournament.current_round()[0].entrant(Side::B).name, "C");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_side_serde() {
        use serde_test::{assert_tokens, Token};

        assert_tokens(
            &Side::A,
            &[Token::UnitVariant {
                name: "Side",
                variant: "A",
            }],
        );
        assert_tokens(
            &Side::B,
            &[Token::UnitVariant {
                name: "Side",
                variant: "B",
            }],
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_tournament_deserialize_current_out_of_bounds() {
        use serde_test::{assert_de_tokens_error, Token};

        assert_de_tokens_error::<Tournament>(
            &[
                Token::Struct {
                    name: "Tournament",
                    len: 3,
                },
                Token::Str("rounds"),
                Token::Seq { len: Some(0) },
                Token::SeqEnd,
                Token::Str("current"),
                Token::U64(0),
                Token::Str("podium"),
                Token::None,
                Token::StructEnd,
            ],
            "invalid snapshot: current round out of bounds",
        );
    }
}
