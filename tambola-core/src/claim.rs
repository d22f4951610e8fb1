//! Prize patterns and the rules that decide whether a claim stands.

use crate::error::CoreError;
use crate::ticket::Ticket;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Numbers needed for the quick-five prize.
pub const JALDI5_MARKS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    Jaldi5,
    Row1,
    Row2,
    Row3,
    Full,
}

impl ClaimType {
    /// Prize order used for history and results.
    pub const ALL: [ClaimType; 5] = [
        ClaimType::Jaldi5,
        ClaimType::Row1,
        ClaimType::Row2,
        ClaimType::Row3,
        ClaimType::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Jaldi5 => "jaldi5",
            ClaimType::Row1 => "row1",
            ClaimType::Row2 => "row2",
            ClaimType::Row3 => "row3",
            ClaimType::Full => "full",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ClaimType::Jaldi5 => "Jaldi 5",
            ClaimType::Row1 => "First Line",
            ClaimType::Row2 => "Second Line",
            ClaimType::Row3 => "Third Line",
            ClaimType::Full => "Full House",
        }
    }

    pub fn row_index(&self) -> Option<usize> {
        match self {
            ClaimType::Row1 => Some(0),
            ClaimType::Row2 => Some(1),
            ClaimType::Row3 => Some(2),
            ClaimType::Jaldi5 | ClaimType::Full => None,
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimType::ALL
            .into_iter()
            .find(|claim| claim.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownClaimType(s.to_string()))
    }
}

/// How much of a player's self-reported marks is trusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimPolicy {
    /// Marks are taken at face value, and jaldi5 only counts them.
    #[default]
    Lenient,
    /// Marks count only if they are on the ticket and have been drawn.
    Strict,
}

/// Pattern check on the player's ticket against a set of marks.
pub fn pattern_complete(ticket: &Ticket, claim: ClaimType, marked: &HashSet<u8>) -> bool {
    match claim {
        ClaimType::Jaldi5 => marked.len() >= JALDI5_MARKS,
        ClaimType::Row1 => row_marked(ticket, 0, marked),
        ClaimType::Row2 => row_marked(ticket, 1, marked),
        ClaimType::Row3 => row_marked(ticket, 2, marked),
        ClaimType::Full => ticket.numbers().all(|n| marked.contains(&n)),
    }
}

fn row_marked(ticket: &Ticket, row: usize, marked: &HashSet<u8>) -> bool {
    ticket.row_numbers(row).all(|n| marked.contains(&n))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimValidator {
    policy: ClaimPolicy,
}

impl ClaimValidator {
    pub fn new(policy: ClaimPolicy) -> Self {
        Self { policy }
    }

    pub fn evaluate(
        &self,
        ticket: &Ticket,
        claim: ClaimType,
        marked: &HashSet<u8>,
        drawn: &HashSet<u8>,
    ) -> bool {
        match self.policy {
            ClaimPolicy::Lenient => pattern_complete(ticket, claim, marked),
            ClaimPolicy::Strict => {
                let trusted: HashSet<u8> = marked
                    .iter()
                    .copied()
                    .filter(|n| drawn.contains(n) && ticket.contains(*n))
                    .collect();
                pattern_complete(ticket, claim, &trusted)
            }
        }
    }
}
