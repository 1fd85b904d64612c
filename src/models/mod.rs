//! Data structures for the bracket engine: participants, matches, tournaments, errors.

mod error;
mod game;
mod participant;
mod tournament;
mod view;

pub use error::{ErrorKind, TournamentError};
pub use game::{Match, MatchId, MatchStatus, Slot};
pub use participant::{Participant, ParticipantId, ParticipantSummary};
pub use tournament::{Tournament, TournamentFormat, TournamentId, TournamentStatus};
pub use view::{BracketView, MatchView, RoundView};
