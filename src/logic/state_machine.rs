//! Match state machine: the only place a match's status, slots and result change.
//!
//! ```text
//! pending --both slots seated--> scheduled --start--> in_progress
//!    |                               |                     |
//!    +--one slot, no feeder--> bye   +------complete-------+--> completed
//! ```
//!
//! `completed` and `bye` are terminal.

use crate::models::{Match, MatchStatus, ParticipantId, Slot, TournamentError};
use chrono::{DateTime, Utc};

fn not_playable(m: &Match) -> TournamentError {
    TournamentError::MatchNotPlayable {
        match_id: m.id,
        status: m.status,
    }
}

/// Derive the readiness status after a slot change. Terminal and in-progress
/// matches are left alone.
pub fn refresh(m: &mut Match) {
    if m.status == MatchStatus::Pending && m.has_both_participants() {
        m.status = MatchStatus::Scheduled;
    }
}

/// Seat `participant` in `slot`. Fails with a conflict instead of overwriting
/// a slot that already holds someone else.
pub fn seat(m: &mut Match, slot: Slot, participant: ParticipantId) -> Result<(), TournamentError> {
    match m.participant(slot) {
        Some(existing) if existing == participant => return Ok(()),
        Some(_) => return Err(TournamentError::SlotConflict { match_id: m.id }),
        None => {}
    }
    if !m.status.accepts_participants() {
        return Err(TournamentError::SlotConflict { match_id: m.id });
    }
    if m.participant(slot.other()) == Some(participant) {
        return Err(TournamentError::SlotConflict { match_id: m.id });
    }
    *m.participant_mut(slot) = Some(participant);
    refresh(m);
    Ok(())
}

/// Resolve a match that holds exactly one participant as a bye.
pub fn resolve_bye(m: &mut Match, now: DateTime<Utc>) -> Result<ParticipantId, TournamentError> {
    if !m.status.accepts_participants() {
        return Err(not_playable(m));
    }
    let winner = match (m.participant1_id, m.participant2_id) {
        (Some(p), None) | (None, Some(p)) => p,
        _ => return Err(not_playable(m)),
    };
    m.winner_id = Some(winner);
    m.is_bye = true;
    m.status = MatchStatus::Bye;
    m.completed_at = Some(now);
    Ok(winner)
}

/// Set or move the planned start time of a match that has not finished.
pub fn schedule(m: &mut Match, at: DateTime<Utc>) -> Result<(), TournamentError> {
    if m.status.is_terminal() {
        return Err(not_playable(m));
    }
    m.scheduled_at = Some(at);
    Ok(())
}

/// scheduled -> in_progress.
pub fn start(m: &mut Match) -> Result<(), TournamentError> {
    if m.status != MatchStatus::Scheduled || !m.has_both_participants() {
        return Err(not_playable(m));
    }
    m.status = MatchStatus::InProgress;
    Ok(())
}

/// scheduled | in_progress -> completed. The higher score wins.
pub fn complete(
    m: &mut Match,
    score1: u32,
    score2: u32,
    now: DateTime<Utc>,
) -> Result<ParticipantId, TournamentError> {
    if !m.status.is_playable() {
        return Err(not_playable(m));
    }
    let (p1, p2) = match (m.participant1_id, m.participant2_id) {
        (Some(p1), Some(p2)) => (p1, p2),
        _ => return Err(not_playable(m)),
    };
    if score1 == score2 {
        return Err(TournamentError::InvalidScore {
            score1: score1.into(),
            score2: score2.into(),
        });
    }
    let winner = if score1 > score2 { p1 } else { p2 };
    m.participant1_score = Some(score1);
    m.participant2_score = Some(score2);
    m.winner_id = Some(winner);
    m.status = MatchStatus::Completed;
    m.completed_at = Some(now);
    Ok(winner)
}
