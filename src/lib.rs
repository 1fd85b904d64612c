//! Tournament bracket engine: seeding, single-elimination bracket building,
//! match lifecycle and result propagation, with an in-memory store and REST API.

pub mod api;
pub mod config;
pub mod engine;
pub mod logic;
pub mod models;
pub mod roster;

pub use config::{ConfigError, ServerConfig};
pub use engine::{BracketEngine, RecordedResult};
pub use logic::{
    assign_seeds, generate_bracket, pad_slots, propagate_byes, record_result, schedule_match,
    standard_seed_order, start_match, strategy_for, BracketStrategy, ResultOutcome, SeedingPolicy,
    SingleElimination, SeedAssignment,
};
pub use models::{
    BracketView, ErrorKind, Match, MatchId, MatchStatus, MatchView, Participant, ParticipantId,
    ParticipantSummary, RoundView, Slot, Tournament, TournamentError, TournamentFormat,
    TournamentId, TournamentStatus,
};
pub use roster::{read_roster, RosterError};
