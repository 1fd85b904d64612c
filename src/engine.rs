//! In-memory tournament store with one lock per tournament.
//!
//! Every mutating call locks its tournament for the whole operation and works
//! on a copy that is committed only on success, so bracket regeneration and
//! result recording never interleave and a failed call leaves no trace.

use crate::logic::{self, SeedingPolicy};
use crate::models::{
    BracketView, MatchId, MatchView, Participant, ParticipantId, Tournament, TournamentError,
    TournamentFormat, TournamentId, TournamentStatus,
};
use crate::roster::read_roster;
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// Response of a recorded result.
#[derive(Clone, Debug, Serialize)]
pub struct RecordedResult {
    pub updated_match: MatchView,
    pub updated_successor: Option<MatchView>,
    pub tournament_status: TournamentStatus,
    pub champion_id: Option<ParticipantId>,
}

pub struct BracketEngine {
    tournaments: RwLock<HashMap<TournamentId, Arc<Mutex<TournamentEntry>>>>,
    default_capacity: usize,
}

impl Default for BracketEngine {
    fn default() -> Self {
        Self::new(32)
    }
}

impl BracketEngine {
    pub fn new(default_capacity: usize) -> Self {
        Self {
            tournaments: RwLock::new(HashMap::new()),
            default_capacity,
        }
    }

    fn entry(&self, id: TournamentId) -> Result<Arc<Mutex<TournamentEntry>>, TournamentError> {
        let map = self.tournaments.read().map_err(|_| TournamentError::LockPoisoned)?;
        map.get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Run `f` on a snapshot of the tournament.
    fn read<T>(
        &self,
        id: TournamentId,
        f: impl FnOnce(&Tournament) -> T,
    ) -> Result<T, TournamentError> {
        let entry = self.entry(id)?;
        let mut guard = entry.lock().map_err(|_| TournamentError::LockPoisoned)?;
        guard.last_activity = Instant::now();
        Ok(f(&guard.tournament))
    }

    /// Run `f` on a working copy under the tournament lock; commit only on `Ok`.
    fn write<T>(
        &self,
        id: TournamentId,
        f: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let entry = self.entry(id)?;
        let mut guard = entry.lock().map_err(|_| TournamentError::LockPoisoned)?;
        guard.last_activity = Instant::now();
        let mut draft = guard.tournament.clone();
        let out = f(&mut draft)?;
        guard.tournament = draft;
        Ok(out)
    }

    /// Store an existing tournament (e.g. restored or built in tests).
    pub fn insert(&self, tournament: Tournament) -> Result<TournamentId, TournamentError> {
        let id = tournament.id;
        let mut map = self.tournaments.write().map_err(|_| TournamentError::LockPoisoned)?;
        map.insert(
            id,
            Arc::new(Mutex::new(TournamentEntry {
                tournament,
                last_activity: Instant::now(),
            })),
        );
        Ok(id)
    }

    /// Create a tournament in Draft.
    pub fn create_tournament(
        &self,
        name: &str,
        capacity: Option<usize>,
        format: TournamentFormat,
    ) -> Result<Tournament, TournamentError> {
        let capacity = capacity.unwrap_or(self.default_capacity);
        let tournament = Tournament::new(name.trim(), capacity).with_format(format);
        info!("Created tournament {} ({:?})", tournament.id, format);
        self.insert(tournament.clone())?;
        Ok(tournament)
    }

    pub fn get_tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.read(id, Tournament::clone)
    }

    pub fn add_participant(
        &self,
        id: TournamentId,
        participant: Participant,
    ) -> Result<Tournament, TournamentError> {
        self.write(id, |t| {
            t.add_participant(participant)?;
            Ok(t.clone())
        })
    }

    pub fn remove_participant(
        &self,
        id: TournamentId,
        participant_id: ParticipantId,
    ) -> Result<Tournament, TournamentError> {
        self.write(id, |t| {
            t.remove_participant(participant_id)?;
            Ok(t.clone())
        })
    }

    /// Register every row of a CSV roster. All rows are added or none are.
    pub fn import_roster(
        &self,
        id: TournamentId,
        csv: &str,
    ) -> Result<Tournament, TournamentError> {
        let participants = read_roster(csv.as_bytes())?;
        self.write(id, |t| {
            for p in participants {
                t.add_participant(p)?;
            }
            info!(
                "Imported roster into tournament {}: {} participants",
                t.id,
                t.participants.len()
            );
            Ok(t.clone())
        })
    }

    pub fn open_registration(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.write(id, |t| {
            t.open_registration()?;
            Ok(t.clone())
        })
    }

    pub fn cancel(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.write(id, |t| {
            t.cancel()?;
            info!("Cancelled tournament {}", t.id);
            Ok(t.clone())
        })
    }

    /// GenerateBracket: seed the current roster and build (or rebuild) the bracket.
    pub fn generate_bracket(
        &self,
        id: TournamentId,
        policy: &SeedingPolicy,
    ) -> Result<BracketView, TournamentError> {
        self.write(id, |t| {
            logic::generate_bracket(t, policy, &mut rand::thread_rng())?;
            Ok(t.bracket_view())
        })
    }

    /// ListMatches: current matches grouped by round.
    pub fn list_matches(&self, id: TournamentId) -> Result<BracketView, TournamentError> {
        self.read(id, Tournament::bracket_view)
    }

    pub fn schedule_match(
        &self,
        id: TournamentId,
        match_id: MatchId,
        at: DateTime<Utc>,
    ) -> Result<MatchView, TournamentError> {
        self.write(id, |t| {
            let m = logic::schedule_match(t, match_id, at)?;
            Ok(MatchView::new(&m, t))
        })
    }

    pub fn start_match(
        &self,
        id: TournamentId,
        match_id: MatchId,
    ) -> Result<MatchView, TournamentError> {
        self.write(id, |t| {
            let m = logic::start_match(t, match_id)?;
            Ok(MatchView::new(&m, t))
        })
    }

    /// RecordMatchResult: finalize a match and advance its winner.
    pub fn record_match_result(
        &self,
        id: TournamentId,
        match_id: MatchId,
        score1: i64,
        score2: i64,
    ) -> Result<RecordedResult, TournamentError> {
        self.write(id, |t| {
            let outcome = logic::record_result(t, match_id, score1, score2)?;
            Ok(RecordedResult {
                updated_match: MatchView::new(&outcome.updated, t),
                updated_successor: outcome.successor.as_ref().map(|m| MatchView::new(m, t)),
                tournament_status: t.status,
                champion_id: t.champion_id,
            })
        })
    }

    /// Remove tournaments not accessed for `timeout`. Returns how many were removed.
    pub fn evict_inactive(&self, timeout: Duration) -> Result<usize, TournamentError> {
        let mut map = self.tournaments.write().map_err(|_| TournamentError::LockPoisoned)?;
        let before = map.len();
        // A tournament locked by an in-flight call is active by definition.
        map.retain(|_, entry| match entry.try_lock() {
            Ok(e) => e.last_activity.elapsed() < timeout,
            Err(_) => true,
        });
        Ok(before - map.len())
    }

    pub fn len(&self) -> Result<usize, TournamentError> {
        let map = self.tournaments.read().map_err(|_| TournamentError::LockPoisoned)?;
        Ok(map.len())
    }

    pub fn is_empty(&self) -> Result<bool, TournamentError> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic;

    #[test]
    fn poisoned_store_reports_lock_poisoned() {
        let engine = BracketEngine::default();
        engine
            .create_tournament("Poisoned", None, TournamentFormat::SingleElimination)
            .unwrap();

        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| {
            let _guard = engine.tournaments.write().unwrap();
            panic!("writer died holding the store lock");
        }));
        assert!(result.is_err());

        assert_eq!(engine.len(), Err(TournamentError::LockPoisoned));
        assert_eq!(engine.is_empty(), Err(TournamentError::LockPoisoned));
        assert_eq!(
            engine.evict_inactive(Duration::ZERO),
            Err(TournamentError::LockPoisoned)
        );
    }
}
