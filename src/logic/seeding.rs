//! Seeding: order the roster into seed order according to a policy.
//!
//! The output is always a permutation of the roster where index 0 is the top
//! seed. Geometric placement into bracket slots (1 vs N, 2 vs N-1, ...) is done
//! by [`standard_seed_order`] when the bracket is built.

use crate::models::{Participant, ParticipantId, TournamentError};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Explicit seed of one participant for [`SeedingPolicy::Manual`].
///
/// Seeds are placed into bracket slots by [`standard_seed_order`] like any
/// other policy, so seeds 0 and 1 can only meet in the final.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeedAssignment {
    pub participant_id: ParticipantId,
    /// 0-based seed; 0 is the top seed.
    pub seed: usize,
}

/// How participants are ordered before the bracket is built.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum SeedingPolicy {
    /// Uniformly shuffled.
    #[default]
    Random,
    /// By seed value ascending; unseeded participants follow in roster order.
    Ranked,
    /// Caller-supplied bijection from participants onto seeds 0..N-1.
    Manual { assignments: Vec<SeedAssignment> },
}

/// Order `participants` into seeds 0..N-1 according to `policy`.
pub fn assign_seeds<R: Rng + ?Sized>(
    participants: &[Participant],
    policy: &SeedingPolicy,
    rng: &mut R,
) -> Result<Vec<ParticipantId>, TournamentError> {
    if participants.len() < 2 {
        return Err(TournamentError::InsufficientParticipants {
            count: participants.len(),
        });
    }

    match policy {
        SeedingPolicy::Random => {
            let mut ids: Vec<ParticipantId> = participants.iter().map(|p| p.id).collect();
            ids.shuffle(rng);
            Ok(ids)
        }
        SeedingPolicy::Ranked => {
            let mut ranked: Vec<&Participant> = participants.iter().collect();
            // Stable: equal seeds keep registration order.
            ranked.sort_by_key(|p| (p.seed.is_none(), p.seed));
            Ok(ranked.into_iter().map(|p| p.id).collect())
        }
        SeedingPolicy::Manual { assignments } => manual_order(participants, assignments),
    }
}

fn manual_order(
    participants: &[Participant],
    assignments: &[SeedAssignment],
) -> Result<Vec<ParticipantId>, TournamentError> {
    let n = participants.len();
    if assignments.len() != n {
        return Err(TournamentError::InvalidSeeding(format!(
            "expected {} seed assignments, got {}",
            n,
            assignments.len()
        )));
    }

    let roster: HashSet<ParticipantId> = participants.iter().map(|p| p.id).collect();
    let mut seen = HashSet::with_capacity(n);
    let mut seeds: Vec<Option<ParticipantId>> = vec![None; n];

    for a in assignments {
        if !roster.contains(&a.participant_id) {
            return Err(TournamentError::InvalidSeeding(format!(
                "participant {} is not registered",
                a.participant_id
            )));
        }
        if !seen.insert(a.participant_id) {
            return Err(TournamentError::InvalidSeeding(format!(
                "participant {} assigned more than once",
                a.participant_id
            )));
        }
        let cell = seeds.get_mut(a.seed).ok_or_else(|| {
            TournamentError::InvalidSeeding(format!("seed {} is out of range 0..{}", a.seed, n))
        })?;
        if cell.is_some() {
            return Err(TournamentError::InvalidSeeding(format!(
                "seed {} assigned more than once",
                a.seed
            )));
        }
        *cell = Some(a.participant_id);
    }

    // n distinct participants onto n distinct seeds: every seed is taken.
    Ok(seeds.into_iter().flatten().collect())
}

/// Seed numbers (1-based) in bracket-slot order for a bracket of `size` slots.
///
/// Built by repeatedly pairing each seed `s` with `2 * len + 1 - s`, so for 8
/// slots this yields `[1, 8, 4, 5, 2, 7, 3, 6]`: seeds 1 and 2 sit in opposite
/// halves and can only meet in the final.
pub fn standard_seed_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let next_len = order.len() * 2;
        order = order
            .iter()
            .flat_map(|&s| [s, next_len + 1 - s])
            .collect();
    }
    order
}
