use crate::claim::ClaimPolicy;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every game draws from `1..=POOL_SIZE`.
pub const POOL_SIZE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub id_length: usize,
    pub max_ticket_attempts: u32,
    pub claim_policy: ClaimPolicy,
    pub invite_base_url: String,
    /// Buffered events per room before slow subscribers start lagging
    pub room_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            id_length: 6,
            max_ticket_attempts: 10_000,
            claim_policy: ClaimPolicy::Lenient,
            invite_base_url: "http://localhost:5000".to_string(),
            room_capacity: 1024,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if !(4..=32).contains(&self.id_length) {
            return Err(CoreError::config(format!(
                "Identifier length must be between 4 and 32, got {}",
                self.id_length
            )));
        }

        if self.max_ticket_attempts == 0 {
            return Err(CoreError::config(
                "Max ticket attempts must be greater than 0",
            ));
        }

        if self.invite_base_url.trim().is_empty() {
            return Err(CoreError::config("Invite base URL cannot be empty"));
        }

        if self.room_capacity == 0 {
            return Err(CoreError::config("Room capacity must be greater than 0"));
        }

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn invite_link(&self, game_id: &crate::GameId) -> String {
        format!(
            "{}/join/{}",
            self.invite_base_url.trim_end_matches('/'),
            game_id
        )
    }
}
