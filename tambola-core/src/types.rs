use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Cut a short lowercase hex token from a fresh v4 UUID.
fn short_token(len: usize) -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(len.clamp(1, 32));
    token
}

macro_rules! token_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn generate(len: usize) -> Self {
                Self(short_token(len))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = crate::CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let token = s.trim();
                if token.is_empty() {
                    return Err(crate::CoreError::config(concat!(
                        stringify!($name),
                        " cannot be empty"
                    )));
                }
                Ok(Self(token.to_string()))
            }
        }
    };
}

token_id!(
    /// Identifier of one game room
    GameId
);

token_id!(
    /// Identifier of a player within a game
    PlayerId
);
