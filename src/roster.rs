//! CSV roster import: `name,club,seed` rows into participants.

use crate::models::{Participant, TournamentError};
use serde::Deserialize;
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: participant name is empty")]
    EmptyName { row: usize },
}

impl From<RosterError> for TournamentError {
    fn from(e: RosterError) -> Self {
        TournamentError::InvalidRoster(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct RosterRecord {
    name: String,
    #[serde(default)]
    club: Option<String>,
    #[serde(default)]
    seed: Option<u32>,
}

/// Parse a roster with a header row. `club` and `seed` columns are optional
/// and may be left blank.
pub fn read_roster<R: Read>(reader: R) -> Result<Vec<Participant>, RosterError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut participants = Vec::new();
    for (i, record) in rdr.deserialize::<RosterRecord>().enumerate() {
        let record = record?;
        if record.name.is_empty() {
            return Err(RosterError::EmptyName { row: i + 1 });
        }
        let mut p = Participant::new(record.name);
        p.club = record.club.filter(|c| !c.is_empty());
        p.seed = record.seed;
        participants.push(p);
    }
    Ok(participants)
}
