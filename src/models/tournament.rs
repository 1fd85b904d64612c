//! Tournament, TournamentStatus and TournamentFormat.

use crate::models::error::TournamentError;
use crate::models::game::{Match, MatchId, MatchStatus};
use crate::models::participant::{Participant, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Bracket format. Only single elimination has a bracket builder.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    #[default]
    SingleElimination,
    DoubleElimination,
    RoundRobin,
    Swiss,
}

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Being configured; participants may be added.
    #[default]
    Draft,
    /// Registration open.
    Open,
    /// Bracket generated, matches being played.
    InProgress,
    /// Final recorded; `champion_id` is set.
    Completed,
    Cancelled,
}

/// Full tournament state: roster, matches and phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Maximum number of participants.
    pub capacity: usize,
    pub format: TournamentFormat,
    pub status: TournamentStatus,
    /// Registered participants in registration order.
    pub participants: Vec<Participant>,
    /// Every match of the current bracket, ordered by match number.
    pub matches: Vec<Match>,
    pub champion_id: Option<ParticipantId>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Tournament {
    /// Create a new single-elimination tournament in Draft with no participants.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            capacity,
            format: TournamentFormat::SingleElimination,
            status: TournamentStatus::Draft,
            participants: Vec::new(),
            matches: Vec::new(),
            champion_id: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn with_format(mut self, format: TournamentFormat) -> Self {
        self.format = format;
        self
    }

    /// Create a tournament with an initial roster. Capacity grows to fit if needed.
    pub fn with_participants(
        name: impl Into<String>,
        capacity: usize,
        participants: Vec<Participant>,
    ) -> Self {
        let capacity = capacity.max(participants.len());
        Self {
            participants,
            ..Self::new(name, capacity)
        }
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn match_index(&self, id: MatchId) -> Option<usize> {
        self.matches.iter().position(|m| m.id == id)
    }

    pub fn get_match(&self, id: MatchId) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn has_bracket(&self) -> bool {
        !self.matches.is_empty()
    }

    /// True once any match has a played (non-bye) result.
    pub fn has_completed_matches(&self) -> bool {
        self.matches.iter().any(|m| m.status == MatchStatus::Completed)
    }

    pub fn total_rounds(&self) -> u32 {
        self.matches.iter().map(|m| m.round).max().unwrap_or(0)
    }

    fn ensure_registration(&self) -> Result<(), TournamentError> {
        if !matches!(self.status, TournamentStatus::Draft | TournamentStatus::Open) {
            return Err(TournamentError::InvalidState { actual: self.status });
        }
        Ok(())
    }

    /// Register a participant (Draft or Open). Names must be unique (case-insensitive).
    pub fn add_participant(
        &mut self,
        participant: Participant,
    ) -> Result<ParticipantId, TournamentError> {
        self.ensure_registration()?;
        let name = participant.name.trim().to_string();
        if name.is_empty() {
            return Err(TournamentError::InvalidRoster("participant name is empty".into()));
        }
        if self.participants.len() >= self.capacity {
            return Err(TournamentError::TournamentFull { capacity: self.capacity });
        }
        if self.participants.iter().any(|p| p.name.eq_ignore_ascii_case(&name)) {
            return Err(TournamentError::DuplicateParticipant);
        }
        let participant = Participant { name, ..participant };
        let id = participant.id;
        self.participants.push(participant);
        Ok(id)
    }

    /// Remove a participant by id (Draft or Open).
    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<(), TournamentError> {
        self.ensure_registration()?;
        let idx = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::ParticipantNotFound(id))?;
        self.participants.remove(idx);
        Ok(())
    }

    /// Draft -> Open.
    pub fn open_registration(&mut self) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::Draft {
            return Err(TournamentError::InvalidState { actual: self.status });
        }
        self.status = TournamentStatus::Open;
        Ok(())
    }

    /// Cancel from any phase except Completed. Matches are kept for display.
    pub fn cancel(&mut self) -> Result<(), TournamentError> {
        if matches!(self.status, TournamentStatus::Completed | TournamentStatus::Cancelled) {
            return Err(TournamentError::InvalidState { actual: self.status });
        }
        self.status = TournamentStatus::Cancelled;
        Ok(())
    }
}
