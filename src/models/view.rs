//! Read-only projections of a bracket for display (grouped by round).

use crate::models::game::{Match, MatchId, MatchStatus};
use crate::models::participant::{ParticipantId, ParticipantSummary};
use crate::models::tournament::{Tournament, TournamentId, TournamentStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// External representation of a match. Slots carry name and club for rendering.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: MatchId,
    pub round: u32,
    pub match_number: u32,
    pub bracket_position: u32,
    pub participant1: Option<ParticipantSummary>,
    pub participant2: Option<ParticipantSummary>,
    pub winner_id: Option<ParticipantId>,
    pub status: MatchStatus,
    /// `"s1-s2"`, `None` until played.
    pub score: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_bye: bool,
    pub next_match_id: Option<MatchId>,
}

impl MatchView {
    pub fn new(m: &Match, tournament: &Tournament) -> Self {
        let summary = |id: Option<ParticipantId>| {
            id.and_then(|id| tournament.participant(id)).map(|p| p.summary())
        };
        Self {
            id: m.id,
            round: m.round,
            match_number: m.match_number,
            bracket_position: m.bracket_position,
            participant1: summary(m.participant1_id),
            participant2: summary(m.participant2_id),
            winner_id: m.winner_id,
            status: m.status,
            score: m.score_display(),
            scheduled_at: m.scheduled_at,
            completed_at: m.completed_at,
            is_bye: m.is_bye,
            next_match_id: m.next_match_id,
        }
    }
}

/// All matches of one round ordered by bracket position.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundView {
    pub round: u32,
    pub matches: Vec<MatchView>,
}

/// The whole bracket as returned by bracket generation and match listing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketView {
    pub tournament_id: TournamentId,
    pub status: TournamentStatus,
    pub champion_id: Option<ParticipantId>,
    pub rounds: Vec<RoundView>,
}

impl Tournament {
    /// Current matches grouped by round, each round ordered by bracket position.
    pub fn bracket_view(&self) -> BracketView {
        let mut rounds: Vec<RoundView> = (1..=self.total_rounds())
            .map(|round| RoundView {
                round,
                matches: Vec::new(),
            })
            .collect();
        for m in &self.matches {
            if let Some(r) = rounds.get_mut(m.round as usize - 1) {
                r.matches.push(MatchView::new(m, self));
            }
        }
        for r in &mut rounds {
            r.matches.sort_by_key(|m| m.bracket_position);
        }
        BracketView {
            tournament_id: self.id,
            status: self.status,
            champion_id: self.champion_id,
            rounds,
        }
    }
}
