//! Errors returned by tournament and bracket operations.

use crate::models::game::{MatchId, MatchStatus};
use crate::models::participant::ParticipantId;
use crate::models::tournament::{TournamentFormat, TournamentId, TournamentStatus};
use serde::Serialize;
use thiserror::Error;

/// How a caller should react to an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input; nothing changed. Correct the input and try again.
    Validation,
    NotFound,
    /// The caller's view of the bracket is stale or the action is structurally invalid.
    StateConflict,
    /// Another writer got there first. Re-fetch and re-submit once.
    Concurrency,
    Internal,
}

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    #[error("Need at least 2 participants to build a bracket (have {count})")]
    InsufficientParticipants { count: usize },

    #[error("Invalid seeding: {0}")]
    InvalidSeeding(String),

    #[error("Invalid score {score1}-{score2}: scores must be non-negative and not equal")]
    InvalidScore { score1: i64, score2: i64 },

    #[error("Bracket already has completed matches and cannot be regenerated")]
    AlreadyInProgress,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Match {match_id} is not playable (status {status})")]
    MatchNotPlayable { match_id: MatchId, status: MatchStatus },

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(ParticipantId),

    #[error("A participant with this name already exists")]
    DuplicateParticipant,

    #[error("Tournament is full (capacity {capacity})")]
    TournamentFull { capacity: usize },

    #[error("Tournament is {actual:?}, which does not allow this action")]
    InvalidState { actual: TournamentStatus },

    #[error("Bracket format {0:?} is not supported")]
    UnsupportedFormat(TournamentFormat),

    #[error("Slot conflict on match {match_id}: slot already holds another participant")]
    SlotConflict { match_id: MatchId },

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Tournament state is unavailable (lock poisoned)")]
    LockPoisoned,
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            InsufficientParticipants { .. }
            | InvalidSeeding(_)
            | InvalidScore { .. }
            | DuplicateParticipant
            | InvalidRoster(_)
            | InvalidRequest(_) => ErrorKind::Validation,
            MatchNotFound(_) | TournamentNotFound(_) | ParticipantNotFound(_) => {
                ErrorKind::NotFound
            }
            AlreadyInProgress
            | MatchNotPlayable { .. }
            | TournamentFull { .. }
            | InvalidState { .. }
            | UnsupportedFormat(_) => ErrorKind::StateConflict,
            SlotConflict { .. } => ErrorKind::Concurrency,
            LockPoisoned => ErrorKind::Internal,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Concurrency
    }
}
