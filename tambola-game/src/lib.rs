//! Tambola game rooms
//!
//! Per-game state (number pool, players, winners), the registry that holds
//! every live game, and the lobby that serializes operations on a game and
//! publishes the resulting notifications to its room.

pub mod error;
pub mod events;
pub mod game;
pub mod history;
pub mod lobby;
pub mod player;
pub mod registry;

pub use error::{GameError, Result};
pub use events::{
    Audience, BroadcastHub, EventChannel, GameEvent, MemoryChannel, Notification,
    RoomSubscription, Viewer,
};
pub use game::{ClaimOutcome, GameState, GameSummary, JoinOutcome, RejectReason};
pub use history::ClaimHistory;
pub use lobby::{GameInvite, JoinedPlayer, Lobby};
pub use player::Player;
pub use registry::{GameRegistry, SharedGame};

pub use tambola_core::{ClaimType, GameConfig, GameId, PlayerId, Ticket};
