//! Bracket building: pad seeded slots to a power of two, create every match for
//! every round, link each match to its successor and resolve first-round byes.

use crate::logic::results::propagate_byes;
use crate::logic::seeding::{assign_seeds, standard_seed_order, SeedingPolicy};
use crate::logic::state_machine;
use crate::models::{
    Match, ParticipantId, Slot, Tournament, TournamentError, TournamentFormat, TournamentId,
    TournamentStatus,
};
use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::Rng;

/// Builds the match graph for one tournament format.
pub trait BracketStrategy {
    /// `seeded` is in seed order (index 0 = top seed).
    fn build(
        &self,
        tournament_id: TournamentId,
        seeded: &[ParticipantId],
        now: DateTime<Utc>,
    ) -> Result<Vec<Match>, TournamentError>;
}

/// Classic knockout: one loss and you are out.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleElimination;

/// Builder for `format`. Round robin, swiss and double elimination have none yet.
pub fn strategy_for(
    format: TournamentFormat,
) -> Result<&'static dyn BracketStrategy, TournamentError> {
    match format {
        TournamentFormat::SingleElimination => Ok(&SingleElimination),
        other => Err(TournamentError::UnsupportedFormat(other)),
    }
}

/// Place seed-ordered participants into `nextPowerOfTwo(N)` bracket slots.
///
/// Seeds beyond N are empty placeholders. Standard placement pairs them with
/// the strongest seeds, so byes go to seeds 1, 2, 3, ... in that order.
pub fn pad_slots(seeded: &[ParticipantId]) -> Vec<Option<ParticipantId>> {
    let size = seeded.len().next_power_of_two();
    standard_seed_order(size)
        .into_iter()
        .map(|seed| seeded.get(seed - 1).copied())
        .collect()
}

impl BracketStrategy for SingleElimination {
    fn build(
        &self,
        tournament_id: TournamentId,
        seeded: &[ParticipantId],
        now: DateTime<Utc>,
    ) -> Result<Vec<Match>, TournamentError> {
        if seeded.len() < 2 {
            return Err(TournamentError::InsufficientParticipants { count: seeded.len() });
        }
        let slots = pad_slots(seeded);
        let size = slots.len();
        let total_rounds = size.trailing_zeros();

        let mut match_number = 0u32;
        let mut next_number = || {
            match_number += 1;
            match_number
        };

        let mut rounds: Vec<Vec<Match>> = Vec::with_capacity(total_rounds as usize);

        let mut first = Vec::with_capacity(size / 2);
        for (k, pair) in slots.chunks_exact(2).enumerate() {
            let mut m = Match::new(tournament_id, 1, next_number(), k as u32);
            match (pair[0], pair[1]) {
                (None, None) => {
                    return Err(TournamentError::InvalidSeeding(format!(
                        "first-round match {} has no participants",
                        k
                    )))
                }
                (p1, p2) => {
                    if let Some(p) = p1 {
                        state_machine::seat(&mut m, Slot::One, p)?;
                    }
                    if let Some(p) = p2 {
                        state_machine::seat(&mut m, Slot::Two, p)?;
                    }
                    if !m.has_both_participants() {
                        state_machine::resolve_bye(&mut m, now)?;
                    }
                }
            }
            first.push(m);
        }
        rounds.push(first);

        for round in 2..=total_rounds {
            let count = size >> round;
            let matches: Vec<Match> = (0..count)
                .map(|k| Match::new(tournament_id, round, next_number(), k as u32))
                .collect();
            rounds.push(matches);
        }

        // Child at position k feeds parent k / 2 of the next round.
        for r in 1..rounds.len() {
            let (earlier, later) = rounds.split_at_mut(r);
            let parents = &later[0];
            for child in earlier[r - 1].iter_mut() {
                child.next_match_id = Some(parents[(child.bracket_position / 2) as usize].id);
            }
        }

        let mut matches: Vec<Match> = rounds.into_iter().flatten().collect();
        propagate_byes(&mut matches, now)?;
        Ok(matches)
    }
}

/// Seed the roster and (re)build the bracket for `tournament`.
///
/// An existing bracket is discarded and rebuilt from the current roster as long
/// as no match has a played result. Nothing on the tournament changes on error.
pub fn generate_bracket<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    policy: &SeedingPolicy,
    rng: &mut R,
) -> Result<(), TournamentError> {
    use TournamentStatus::*;
    if !matches!(tournament.status, Draft | Open | InProgress) {
        return Err(TournamentError::InvalidState {
            actual: tournament.status,
        });
    }
    if tournament.has_completed_matches() {
        warn!(
            "Rejected bracket regeneration for tournament {}: results already recorded",
            tournament.id
        );
        return Err(TournamentError::AlreadyInProgress);
    }

    let strategy = strategy_for(tournament.format)?;
    let seeded = assign_seeds(&tournament.participants, policy, rng)?;
    let matches = strategy.build(tournament.id, &seeded, Utc::now())?;

    let byes = matches.iter().filter(|m| m.is_bye).count();
    if tournament.has_bracket() {
        info!(
            "Regenerated bracket for tournament {}: discarded {} matches",
            tournament.id,
            tournament.matches.len()
        );
    }
    info!(
        "Built bracket for tournament {}: {} participants, {} matches, {} byes",
        tournament.id,
        seeded.len(),
        matches.len(),
        byes
    );

    tournament.matches = matches;
    tournament.status = InProgress;
    Ok(())
}
