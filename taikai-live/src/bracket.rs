use std::sync::Arc;

use parking_lot::RwLock;
use taikai_core::{Advance, Match, Podium, Roster, Side, Tournament, TournamentRecord};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::auth::UserId;
use crate::store::RecordStore;
use crate::Result;

/// A bracket that is currently being played.
///
/// Every change replaces the current [`Tournament`] snapshot and is published as a
/// [`BracketEvent`]. Once a champion is known the result is written to the [`RecordStore`] in
/// the background. A failed write does not undo the completion.
#[derive(Clone)]
pub struct LiveBracket {
    inner: Arc<LiveBracketInner>,
}

struct LiveBracketInner {
    roster: Roster,
    user: UserId,
    store: Arc<dyn RecordStore>,
    tournament: RwLock<Tournament>,
    tx: broadcast::Sender<BracketEvent>,
}

impl LiveBracket {
    /// Creates a new `LiveBracket` for `roster`, owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot form a bracket.
    pub fn new(roster: Roster, user: UserId, store: Arc<dyn RecordStore>) -> Result<Self> {
        let tournament = roster.tournament()?;
        let (tx, _) = broadcast::channel(32);

        log::debug!(
            "Created LiveBracket {:?} for user {}",
            roster.name(),
            user
        );

        Ok(Self {
            inner: Arc::new(LiveBracketInner {
                roster,
                user,
                store,
                tournament: RwLock::new(tournament),
                tx,
            }),
        })
    }

    #[inline]
    pub fn roster(&self) -> &Roster {
        &self.inner.roster
    }

    #[inline]
    pub fn user(&self) -> &UserId {
        &self.inner.user
    }

    /// Returns the latest [`Tournament`] snapshot.
    pub fn snapshot(&self) -> Tournament {
        self.inner.tournament.read().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BracketEvent> {
        self.inner.tx.subscribe()
    }

    /// Returns a stream of all following [`BracketEvent`]s.
    pub fn changes(&self) -> BroadcastStream<BracketEvent> {
        BroadcastStream::new(self.subscribe())
    }

    /// Declares the winner of the match at `index` in the current round.
    pub fn record_winner(&self, index: usize, side: Side) -> Result<Tournament> {
        let mut tournament = self.inner.tournament.write();

        let next = tournament.record_winner(index, side)?;
        Ok(self.commit_winner(&mut tournament, next, index))
    }

    /// Declares the competitor called `name` the winner of the match at `index`.
    ///
    /// The name is resolved against the current round while holding the same lock that
    /// records the winner.
    pub fn record_winner_by_name(&self, index: usize, name: &str) -> Result<Tournament> {
        let mut tournament = self.inner.tournament.write();

        let next = tournament.record_winner_by_name(index, name)?;
        Ok(self.commit_winner(&mut tournament, next, index))
    }

    fn commit_winner(
        &self,
        tournament: &mut Tournament,
        next: Tournament,
        index: usize,
    ) -> Tournament {
        if let Some(side) = next.current_round().get(index).and_then(Match::winner) {
            self.send(BracketEvent::WinnerRecorded {
                round: next.current_round_index(),
                index,
                side,
            });
        }

        *tournament = next.clone();
        next
    }

    /// Advances the bracket. If this completes the tournament the record is persisted in the
    /// background; the outcome is published as [`BracketEvent::RecordSaved`] or
    /// [`BracketEvent::RecordFailed`].
    ///
    /// Without a tokio runtime on the calling thread the record cannot be written. The
    /// tournament still completes and [`BracketEvent::RecordFailed`] is published.
    pub fn advance(&self) -> Result<Tournament> {
        let mut tournament = self.inner.tournament.write();

        let advance = tournament.advance()?;
        *tournament = advance.tournament().clone();

        match advance {
            Advance::NextRound(next) => {
                self.send(BracketEvent::RoundAdvanced {
                    round: next.current_round_index(),
                });

                Ok(next)
            }
            Advance::Completed(next) => {
                if let Some(podium) = next.podium() {
                    self.send(BracketEvent::Completed(podium.clone()));
                    drop(tournament);

                    let record = TournamentRecord::now(&self.inner.roster, podium);
                    self.spawn_save(record);
                }

                Ok(next)
            }
        }
    }

    fn spawn_save(&self, record: TournamentRecord) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                log::error!("Cannot save tournament record without a runtime: {}", err);
                self.send(BracketEvent::RecordFailed {
                    record,
                    error: err.to_string(),
                });
                return;
            }
        };

        let bracket = self.clone();
        handle.spawn(async move {
            match bracket
                .inner
                .store
                .insert(&bracket.inner.user, &record)
                .await
            {
                Ok(()) => {
                    log::debug!("Saved record for {:?}", record.tournament_name);
                    bracket.send(BracketEvent::RecordSaved(record));
                }
                Err(err) => {
                    log::error!("Failed to save tournament record: {}", err);
                    bracket.send(BracketEvent::RecordFailed {
                        record,
                        error: err.to_string(),
                    });
                }
            }
        });
    }

    fn send(&self, event: BracketEvent) {
        // Having no subscribers is fine.
        let _ = self.inner.tx.send(event);
    }
}

impl std::fmt::Debug for LiveBracket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveBracket")
            .field("roster", &self.inner.roster)
            .field("user", &self.inner.user)
            .field("tournament", &*self.inner.tournament.read())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BracketEvent {
    WinnerRecorded {
        round: usize,
        index: usize,
        side: Side,
    },
    RoundAdvanced {
        round: usize,
    },
    Completed(Podium),
    RecordSaved(TournamentRecord),
    RecordFailed {
        record: TournamentRecord,
        error: String,
    },
}
