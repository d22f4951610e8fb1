use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),

    #[error("Ticket generation gave up after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    #[error("Unknown claim type: {0}")]
    UnknownClaimType(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub fn invalid_ticket(msg: impl Into<String>) -> Self {
        Self::InvalidTicket(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
