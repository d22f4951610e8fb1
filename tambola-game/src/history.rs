use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tambola_core::ClaimType;

/// Winners per prize, in the order their claims were accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimHistory {
    winners: BTreeMap<ClaimType, Vec<String>>,
}

impl Default for ClaimHistory {
    fn default() -> Self {
        Self {
            winners: ClaimType::ALL
                .into_iter()
                .map(|claim| (claim, Vec::new()))
                .collect(),
        }
    }
}

impl ClaimHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn winners(&self, claim: ClaimType) -> &[String] {
        self.winners.get(&claim).map(Vec::as_slice).unwrap_or_default()
    }

    /// Append a winner unless the name is already listed for this prize.
    pub fn record(&mut self, claim: ClaimType, name: &str) -> bool {
        let winners = self.winners.entry(claim).or_default();
        if winners.iter().any(|w| w == name) {
            return false;
        }
        winners.push(name.to_string());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClaimType, &[String])> {
        self.winners
            .iter()
            .map(|(claim, names)| (*claim, names.as_slice()))
    }

    pub fn total_winners(&self) -> usize {
        self.winners.values().map(Vec::len).sum()
    }
}

/// Plain-text results sheet.
impl fmt::Display for ClaimHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🎯 Tambola Game Results")?;
        writeln!(f)?;

        for (claim, names) in self.iter() {
            writeln!(f, "{} Winners:", claim.title())?;
            if names.is_empty() {
                writeln!(f, "None")?;
            } else {
                for (i, name) in names.iter().enumerate() {
                    writeln!(f, "{}. {}", i + 1, name)?;
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
