use crate::{ClaimHistory, GameError, Player, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tambola_core::config::POOL_SIZE;
use tambola_core::{
    ClaimType, ClaimValidator, GameConfig, GameId, PlayerId, Ticket, TicketGenerator,
};

/// Why a claim was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    AlreadyClaimed,
    PatternIncomplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Claim accepted; carries the full history after recording it.
    Valid { history: ClaimHistory },
    Invalid { reason: RejectReason },
}

impl ClaimOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ClaimOutcome::Valid { .. })
    }
}

/// What changed when a player joined.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub player_id: PlayerId,
    pub ticket: Ticket,
    /// Display names of everyone seated, in join order
    pub roster: Vec<String>,
}

/// One game room's mutable state: number pool, draws, players and winners.
///
/// A game is always open. Callers serialize access (the registry hands it out
/// behind a mutex) and publish notifications after releasing it.
#[derive(Debug)]
pub struct GameState {
    id: GameId,
    created_at: DateTime<Utc>,
    id_length: usize,
    generator: TicketGenerator,
    validator: ClaimValidator,
    players: HashMap<PlayerId, Player>,
    join_order: Vec<PlayerId>,
    drawn: Vec<u8>,
    remaining: Vec<u8>,
    history: ClaimHistory,
}

impl GameState {
    pub fn new(id: GameId, config: &GameConfig) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            id_length: config.id_length,
            generator: TicketGenerator::new(config.max_ticket_attempts),
            validator: ClaimValidator::new(config.claim_policy),
            players: HashMap::new(),
            join_order: Vec::new(),
            drawn: Vec::with_capacity(usize::from(POOL_SIZE)),
            remaining: (1..=POOL_SIZE).collect(),
            history: ClaimHistory::new(),
        }
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, player_id: &PlayerId) -> Option<&Player> {
        self.players.get(player_id)
    }

    /// Display names in join order.
    pub fn roster(&self) -> Vec<String> {
        self.join_order
            .iter()
            .filter_map(|id| self.players.get(id))
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Numbers called so far, in draw order.
    pub fn drawn(&self) -> &[u8] {
        &self.drawn
    }

    pub fn remaining_count(&self) -> usize {
        self.remaining.len()
    }

    pub fn last_number(&self) -> Option<u8> {
        self.drawn.last().copied()
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn history(&self) -> &ClaimHistory {
        &self.history
    }

    /// Seat a new player with a freshly generated ticket.
    pub fn join(&mut self, name: &str) -> Result<JoinOutcome> {
        self.join_with(name, &mut rand::thread_rng())
    }

    pub fn join_with<R: Rng + ?Sized>(&mut self, name: &str, rng: &mut R) -> Result<JoinOutcome> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(GameError::InvalidName(name.to_string()));
        }
        let name = trimmed;

        let ticket = self.generator.generate_with(rng)?;
        let player_id = PlayerId::generate(self.id_length);
        let player = Player::new(player_id.clone(), name, ticket.clone());

        self.players.insert(player_id.clone(), player);
        self.join_order.push(player_id.clone());

        tracing::info!("Player {} ({}) joined game {}", player_id, name, self.id);

        Ok(JoinOutcome {
            player_id,
            ticket,
            roster: self.roster(),
        })
    }

    /// Call one number from the pool. `None` once the pool is empty.
    pub fn draw(&mut self) -> Option<u8> {
        self.draw_with(&mut rand::thread_rng())
    }

    pub fn draw_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<u8> {
        if self.remaining.is_empty() {
            return None;
        }

        let index = rng.gen_range(0..self.remaining.len());
        let number = self.remaining.swap_remove(index);
        self.drawn.push(number);

        tracing::debug!(
            "Game {} drew {} ({} left)",
            self.id,
            number,
            self.remaining.len()
        );
        Some(number)
    }

    /// Adjudicate a claim against the player's ticket and reported marks.
    pub fn claim(
        &mut self,
        player_id: &PlayerId,
        claim: ClaimType,
        marked: &HashSet<u8>,
    ) -> Result<ClaimOutcome> {
        let drawn: HashSet<u8> = self.drawn.iter().copied().collect();
        let player = self
            .players
            .get_mut(player_id)
            .ok_or_else(|| GameError::PlayerNotFound(player_id.clone()))?;

        if player.has_claimed(claim) {
            tracing::debug!("Player {} already claimed {}", player_id, claim);
            return Ok(ClaimOutcome::Invalid {
                reason: RejectReason::AlreadyClaimed,
            });
        }

        if !self
            .validator
            .evaluate(player.ticket(), claim, marked, &drawn)
        {
            tracing::debug!("Rejected {} claim from player {}", claim, player_id);
            return Ok(ClaimOutcome::Invalid {
                reason: RejectReason::PatternIncomplete,
            });
        }

        player.record_claim(claim);
        self.history.record(claim, player.name());

        tracing::info!(
            "Game {}: {} won {}",
            self.id,
            player.name(),
            claim.title()
        );

        Ok(ClaimOutcome::Valid {
            history: self.history.clone(),
        })
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id.clone(),
            created_at: self.created_at,
            player_count: self.players.len(),
            drawn_count: self.drawn.len(),
            remaining_count: self.remaining.len(),
            last_number: self.last_number(),
            roster: self.roster(),
        }
    }
}

/// Game info for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: GameId,
    pub created_at: DateTime<Utc>,
    pub player_count: usize,
    pub drawn_count: usize,
    pub remaining_count: usize,
    pub last_number: Option<u8>,
    pub roster: Vec<String>,
}
