pub mod config;
pub mod play;
pub mod ticket;

pub use config::{handle_config_command, ConfigCommands};
pub use play::play_game;
pub use ticket::print_tickets;
