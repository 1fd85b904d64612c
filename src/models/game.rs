//! Match, Slot and MatchStatus for elimination brackets.

use crate::models::participant::ParticipantId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two participant positions within a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    #[default]
    One,
    Two,
}

impl Slot {
    /// Slot of the successor match fed by the match at `bracket_position`.
    /// Even positions feed slot one, odd positions feed slot two.
    pub fn fed_by(bracket_position: u32) -> Self {
        if bracket_position % 2 == 0 {
            Slot::One
        } else {
            Slot::Two
        }
    }

    pub fn other(self) -> Self {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }
}

/// Lifecycle of a single match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// At least one slot still waits on an earlier winner.
    #[default]
    Pending,
    /// Both slots known, not yet started.
    Scheduled,
    InProgress,
    /// Result recorded. Terminal.
    Completed,
    /// Auto-resolved at build time because only one participant was seated. Terminal.
    Bye,
}

impl MatchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Bye)
    }

    /// Only pending and scheduled matches may still receive a participant via propagation.
    pub fn accepts_participants(self) -> bool {
        matches!(self, MatchStatus::Pending | MatchStatus::Scheduled)
    }

    pub fn is_playable(self) -> bool {
        matches!(self, MatchStatus::Scheduled | MatchStatus::InProgress)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Bye => "bye",
        };
        f.write_str(s)
    }
}

/// A single bracket match. Mutated only through `logic::state_machine`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// 1-based; round 1 is the first round played.
    pub round: u32,
    /// Sequential within the tournament, starting at 1.
    pub match_number: u32,
    /// 0-based position within its round.
    pub bracket_position: u32,
    pub participant1_id: Option<ParticipantId>,
    pub participant2_id: Option<ParticipantId>,
    pub winner_id: Option<ParticipantId>,
    pub participant1_score: Option<u32>,
    pub participant2_score: Option<u32>,
    pub status: MatchStatus,
    /// `None` only for the final.
    pub next_match_id: Option<MatchId>,
    pub is_bye: bool,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Match {
    /// Create an empty pending match.
    pub fn new(
        tournament_id: TournamentId,
        round: u32,
        match_number: u32,
        bracket_position: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            match_number,
            bracket_position,
            participant1_id: None,
            participant2_id: None,
            winner_id: None,
            participant1_score: None,
            participant2_score: None,
            status: MatchStatus::Pending,
            next_match_id: None,
            is_bye: false,
            scheduled_at: None,
            completed_at: None,
        }
    }

    pub fn participant(&self, slot: Slot) -> Option<ParticipantId> {
        match slot {
            Slot::One => self.participant1_id,
            Slot::Two => self.participant2_id,
        }
    }

    pub(crate) fn participant_mut(&mut self, slot: Slot) -> &mut Option<ParticipantId> {
        match slot {
            Slot::One => &mut self.participant1_id,
            Slot::Two => &mut self.participant2_id,
        }
    }

    pub fn has_both_participants(&self) -> bool {
        self.participant1_id.is_some() && self.participant2_id.is_some()
    }

    pub fn is_final(&self) -> bool {
        self.next_match_id.is_none()
    }

    /// Slot of the successor match this match's winner is written into.
    pub fn feeds_slot(&self) -> Slot {
        Slot::fed_by(self.bracket_position)
    }

    pub fn contains(&self, participant: ParticipantId) -> bool {
        self.participant1_id == Some(participant) || self.participant2_id == Some(participant)
    }

    /// Score in display form, e.g. `"3-1"`. `None` until a result is recorded.
    pub fn score_display(&self) -> Option<String> {
        match (self.participant1_score, self.participant2_score) {
            (Some(s1), Some(s2)) => Some(format!("{s1}-{s2}")),
            _ => None,
        }
    }

    /// The structural invariants every match must satisfy at rest.
    pub fn invariants_hold(&self) -> bool {
        let winner_seated = match self.winner_id {
            None => true,
            Some(w) => self.contains(w),
        };
        let decided_iff_terminal = self.status.is_terminal() == self.winner_id.is_some();
        let scheduled_means_seated = !matches!(
            self.status,
            MatchStatus::Scheduled | MatchStatus::InProgress | MatchStatus::Completed
        ) || self.has_both_participants();
        let bye_flag_matches = self.is_bye == (self.status == MatchStatus::Bye);
        winner_seated && decided_iff_terminal && scheduled_means_seated && bye_flag_matches
    }
}
