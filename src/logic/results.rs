//! Result recording and winner propagation.

use crate::logic::state_machine;
use crate::models::{
    Match, MatchId, MatchStatus, ParticipantId, Slot, Tournament, TournamentError,
    TournamentStatus,
};
use chrono::{DateTime, Utc};
use log::{debug, info};

/// What a successful [`record_result`] changed.
#[derive(Clone, Debug)]
pub struct ResultOutcome {
    pub updated: Match,
    /// The successor after the winner was seated; `None` for the final.
    pub successor: Option<Match>,
    /// Set when this result decided the tournament.
    pub champion: Option<ParticipantId>,
}

fn position_of(matches: &[Match], id: MatchId) -> Result<usize, TournamentError> {
    matches
        .iter()
        .position(|m| m.id == id)
        .ok_or(TournamentError::MatchNotFound(id))
}

/// A slot is dead when nothing can ever fill it: there is no feeder match, or
/// the feeder is empty and both of its own slots are dead.
fn slot_is_dead(matches: &[Match], match_id: MatchId, slot: Slot) -> bool {
    let feeder = matches
        .iter()
        .find(|f| f.next_match_id == Some(match_id) && f.feeds_slot() == slot);
    match feeder {
        None => true,
        Some(f) => {
            f.winner_id.is_none()
                && f.participant1_id.is_none()
                && f.participant2_id.is_none()
                && slot_is_dead(matches, f.id, Slot::One)
                && slot_is_dead(matches, f.id, Slot::Two)
        }
    }
}

/// Seat the winner of `matches[idx]` in its successor and resolve the
/// successor as a bye if its other slot can never be filled. Cascades.
///
/// Returns the index of the direct successor, or `None` for the final.
pub(crate) fn advance_winner(
    matches: &mut [Match],
    idx: usize,
    now: DateTime<Utc>,
) -> Result<Option<usize>, TournamentError> {
    let mut current = idx;
    let mut direct = None;
    loop {
        let (winner, next, slot) = {
            let m = &matches[current];
            match (m.winner_id, m.next_match_id) {
                (Some(w), Some(next)) => (w, next, m.feeds_slot()),
                _ => return Ok(direct),
            }
        };
        let sidx = position_of(matches, next)?;
        if direct.is_none() {
            direct = Some(sidx);
        }

        state_machine::seat(&mut matches[sidx], slot, winner)?;
        debug!(
            "Advanced {} from match {} into slot {:?} of match {}",
            winner, matches[current].match_number, slot, matches[sidx].match_number
        );

        let successor = &matches[sidx];
        let latent_bye = successor.status == MatchStatus::Pending
            && successor.participant(slot.other()).is_none()
            && slot_is_dead(matches, successor.id, slot.other());
        if !latent_bye {
            return Ok(direct);
        }
        state_machine::resolve_bye(&mut matches[sidx], now)?;
        debug!("Resolved match {} as a bye", matches[sidx].match_number);
        current = sidx;
    }
}

/// Push every resolved bye's winner into its successor. Returns how many were pushed.
pub fn propagate_byes(
    matches: &mut [Match],
    now: DateTime<Utc>,
) -> Result<usize, TournamentError> {
    let mut pushed = 0;
    for idx in 0..matches.len() {
        let m = &matches[idx];
        if m.status != MatchStatus::Bye {
            continue;
        }
        let (Some(winner), Some(next)) = (m.winner_id, m.next_match_id) else {
            continue;
        };
        let slot = m.feeds_slot();
        let sidx = position_of(matches, next)?;
        if matches[sidx].participant(slot) == Some(winner) {
            continue;
        }
        advance_winner(matches, idx, now)?;
        pushed += 1;
    }
    Ok(pushed)
}

fn require_in_progress(tournament: &Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::InvalidState {
            actual: tournament.status,
        });
    }
    Ok(())
}

fn validate_scores(score1: i64, score2: i64) -> Result<(u32, u32), TournamentError> {
    let invalid = || TournamentError::InvalidScore { score1, score2 };
    if score1 == score2 {
        return Err(invalid());
    }
    let s1 = u32::try_from(score1).map_err(|_| invalid())?;
    let s2 = u32::try_from(score2).map_err(|_| invalid())?;
    Ok((s1, s2))
}

/// Record a played result, advance the winner and complete the tournament
/// when the final is decided. Nothing changes on error.
pub fn record_result(
    tournament: &mut Tournament,
    match_id: MatchId,
    score1: i64,
    score2: i64,
) -> Result<ResultOutcome, TournamentError> {
    require_in_progress(tournament)?;
    let (s1, s2) = validate_scores(score1, score2)?;
    let idx = tournament
        .match_index(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;

    let m = &tournament.matches[idx];
    if !m.status.is_playable() || !m.has_both_participants() {
        return Err(TournamentError::MatchNotPlayable {
            match_id,
            status: m.status,
        });
    }
    // Check the successor slot before touching anything.
    if let Some(next) = m.next_match_id {
        let slot = m.feeds_slot();
        let successor = tournament
            .get_match(next)
            .ok_or(TournamentError::MatchNotFound(next))?;
        if successor.participant(slot).is_some() || !successor.status.accepts_participants() {
            return Err(TournamentError::SlotConflict { match_id: next });
        }
    }

    let now = Utc::now();
    let winner = state_machine::complete(&mut tournament.matches[idx], s1, s2, now)?;
    let successor_idx = advance_winner(&mut tournament.matches, idx, now)?;

    debug!("Match {} won by {}", tournament.matches[idx].match_number, winner);

    // The final may also have been decided by a cascading bye.
    let champion = tournament
        .matches
        .iter()
        .find(|m| m.is_final())
        .and_then(|m| m.winner_id);
    if let Some(champion) = champion {
        tournament.status = TournamentStatus::Completed;
        tournament.champion_id = Some(champion);
        tournament.completed_at = Some(now);
        info!("Tournament {} completed, champion {}", tournament.id, champion);
    }

    Ok(ResultOutcome {
        updated: tournament.matches[idx].clone(),
        successor: successor_idx.map(|i| tournament.matches[i].clone()),
        champion,
    })
}

/// Set the planned start time of a match.
pub fn schedule_match(
    tournament: &mut Tournament,
    match_id: MatchId,
    at: DateTime<Utc>,
) -> Result<Match, TournamentError> {
    require_in_progress(tournament)?;
    let idx = tournament
        .match_index(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    state_machine::schedule(&mut tournament.matches[idx], at)?;
    Ok(tournament.matches[idx].clone())
}

/// Mark a scheduled match as being played.
pub fn start_match(
    tournament: &mut Tournament,
    match_id: MatchId,
) -> Result<Match, TournamentError> {
    require_in_progress(tournament)?;
    let idx = tournament
        .match_index(match_id)
        .ok_or(TournamentError::MatchNotFound(match_id))?;
    state_machine::start(&mut tournament.matches[idx])?;
    Ok(tournament.matches[idx].clone())
}
