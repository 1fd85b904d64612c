//! Participant: an immutable entrant consumed by bracket construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (used in match slots and lookups).
pub type ParticipantId = Uuid;

/// A registered entrant. The engine reads participants but never mutates them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub club: Option<String>,
    /// Ranking or manual order; lower is stronger. `None` sorts after every seeded entrant.
    pub seed: Option<u32>,
}

impl Participant {
    /// Create a new participant with the given name, no club and no seed.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            club: None,
            seed: None,
        }
    }

    pub fn with_club(mut self, club: impl Into<String>) -> Self {
        self.club = Some(club.into());
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Display reference carried by match projections.
    pub fn summary(&self) -> ParticipantSummary {
        ParticipantSummary {
            id: self.id,
            name: self.name.clone(),
            club: self.club.clone(),
        }
    }
}

/// Identity shown in a match slot: enough to render a name and club.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub id: ParticipantId,
    pub name: String,
    pub club: Option<String>,
}
