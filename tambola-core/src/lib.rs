//! Tambola core - ticket generation and claim validation
//!
//! Pure building blocks for a number-calling game: valid 3×9 tickets, the
//! prize patterns players claim, and the configuration shared by games.

pub mod claim;
pub mod config;
pub mod error;
pub mod ticket;
pub mod types;

pub use claim::{pattern_complete, ClaimPolicy, ClaimType, ClaimValidator};
pub use config::GameConfig;
pub use error::{CoreError, Result};
pub use ticket::{Ticket, TicketGenerator};
pub use types::{GameId, PlayerId};
