//! Bracket business logic: seeding, bracket building, match lifecycle, results.

mod bracket;
mod results;
mod seeding;
pub mod state_machine;

pub use bracket::{generate_bracket, pad_slots, strategy_for, BracketStrategy, SingleElimination};
pub use results::{
    propagate_byes, record_result, schedule_match, start_match, ResultOutcome,
};
pub use seeding::{assign_seeds, standard_seed_order, SeedingPolicy, SeedAssignment};
