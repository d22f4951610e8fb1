use tambola_core::{GameId, PlayerId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Tambola core error: {0}")]
    Core(#[from] tambola_core::CoreError),

    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Invalid player name: {0:?}")]
    InvalidName(String),
}
