//! Tambola tickets: a 3×9 grid holding fifteen numbers.
//!
//! Every row carries five numbers, every column holds one to three numbers
//! from its own decade, and each column reads strictly upwards from top to
//! bottom.

pub mod generator;

pub use generator::TicketGenerator;

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::RangeInclusive;

pub const ROWS: usize = 3;
pub const COLUMNS: usize = 9;
pub const NUMBERS_PER_ROW: usize = 5;
pub const MAX_PER_COLUMN: usize = 3;
pub const NUMBERS_PER_TICKET: usize = ROWS * NUMBERS_PER_ROW;

pub type Row = [Option<u8>; COLUMNS];

/// Values allowed in a column: 1-9, then 10-19 through 70-79, and 80-90 for the last.
pub fn column_range(column: usize) -> RangeInclusive<u8> {
    debug_assert!(column < COLUMNS);
    match column {
        0 => 1..=9,
        c if c == COLUMNS - 1 => 80..=90,
        c => {
            let start = (c * 10) as u8;
            start..=start + 9
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket {
    rows: [Row; ROWS],
}

impl Ticket {
    /// Wrap a grid as-is. Use [`Ticket::validate`] or `TryFrom` when the
    /// layout comes from outside the generator.
    pub fn new(rows: [Row; ROWS]) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row; ROWS] {
        &self.rows
    }

    /// Filled cells of one row, left to right. Empty for an out of range index.
    pub fn row_numbers(&self, index: usize) -> impl Iterator<Item = u8> + '_ {
        self.rows
            .get(index)
            .into_iter()
            .flat_map(|row| row.iter().flatten().copied())
    }

    /// Filled cells of one column, top to bottom.
    pub fn column_numbers(&self, column: usize) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().filter_map(move |row| row.get(column).copied().flatten())
    }

    /// Every filled cell, row by row.
    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.rows.iter().flat_map(|row| row.iter().flatten().copied())
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers().any(|n| n == number)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(NUMBERS_PER_TICKET);

        for (r, row) in self.rows.iter().enumerate() {
            let filled = row.iter().flatten().count();
            if filled != NUMBERS_PER_ROW {
                return Err(CoreError::invalid_ticket(format!(
                    "row {} has {} numbers, expected {}",
                    r + 1,
                    filled,
                    NUMBERS_PER_ROW
                )));
            }
        }

        for column in 0..COLUMNS {
            let range = column_range(column);
            let mut previous: Option<u8> = None;

            for number in self.column_numbers(column) {
                if !range.contains(&number) {
                    return Err(CoreError::invalid_ticket(format!(
                        "{} does not belong in column {}",
                        number,
                        column + 1
                    )));
                }
                if previous.is_some_and(|p| p >= number) {
                    return Err(CoreError::invalid_ticket(format!(
                        "column {} is not increasing top to bottom",
                        column + 1
                    )));
                }
                if !seen.insert(number) {
                    return Err(CoreError::invalid_ticket(format!(
                        "{} appears more than once",
                        number
                    )));
                }
                previous = Some(number);
            }
        }

        Ok(())
    }
}

impl TryFrom<[Row; ROWS]> for Ticket {
    type Error = CoreError;

    fn try_from(rows: [Row; ROWS]) -> Result<Self> {
        let ticket = Self::new(rows);
        ticket.validate()?;
        Ok(ticket)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(n) => format!("{:>2}", n),
                    None => " .".to_string(),
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}
