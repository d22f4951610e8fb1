use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tambola_core::{ClaimType, PlayerId, Ticket};

/// A player seated in one game, holding exactly one ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    ticket: Ticket,
    claimed: HashSet<ClaimType>,
    joined_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, ticket: Ticket) -> Self {
        Self {
            id,
            name: name.into(),
            ticket,
            claimed: HashSet::new(),
            joined_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    pub fn has_claimed(&self, claim: ClaimType) -> bool {
        self.claimed.contains(&claim)
    }

    /// Returns false if the prize was already recorded.
    pub fn record_claim(&mut self, claim: ClaimType) -> bool {
        self.claimed.insert(claim)
    }
}
