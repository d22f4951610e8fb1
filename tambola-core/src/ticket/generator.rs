use super::{
    column_range, Row, Ticket, COLUMNS, MAX_PER_COLUMN, NUMBERS_PER_ROW, NUMBERS_PER_TICKET, ROWS,
};
use crate::error::{CoreError, Result};
use rand::seq::{index, SliceRandom};
use rand::Rng;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// Builds tickets by rejection sampling: lay out a random grid and start
/// over whenever row allocation runs into a dead end.
#[derive(Debug, Clone, Copy)]
pub struct TicketGenerator {
    max_attempts: u32,
}

impl Default for TicketGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl TicketGenerator {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn generate(&self) -> Result<Ticket> {
        self.generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Ticket> {
        for attempt in 1..=self.max_attempts {
            match try_layout(rng) {
                Some(ticket) => {
                    if attempt > 1 {
                        tracing::debug!("Ticket generated after {} attempts", attempt);
                    }
                    return Ok(ticket);
                }
                None => tracing::trace!("Ticket layout hit a dead end on attempt {}", attempt),
            }
        }

        Err(CoreError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }
}

/// One column per number first, then the six remaining cells land on random
/// columns that still have room.
fn column_counts<R: Rng + ?Sized>(rng: &mut R) -> [usize; COLUMNS] {
    let mut counts = [1usize; COLUMNS];
    let mut extra = NUMBERS_PER_TICKET - COLUMNS;

    while extra > 0 {
        let column = rng.gen_range(0..COLUMNS);
        if counts[column] < MAX_PER_COLUMN {
            counts[column] += 1;
            extra -= 1;
        }
    }

    counts
}

/// Distinct values from the column's range, ascending.
fn column_values<R: Rng + ?Sized>(rng: &mut R, column: usize, count: usize) -> Vec<u8> {
    let range = column_range(column);
    let start = *range.start();
    let span = usize::from(*range.end() - start) + 1;

    let mut values: Vec<u8> = index::sample(rng, span, count)
        .into_vec()
        .into_iter()
        .map(|offset| start + offset as u8)
        .collect();
    values.sort_unstable();
    values
}

fn try_layout<R: Rng + ?Sized>(rng: &mut R) -> Option<Ticket> {
    let counts = column_counts(rng);
    let mut rows: [Row; ROWS] = [[None; COLUMNS]; ROWS];
    let mut filled = [0usize; ROWS];

    for (column, &count) in counts.iter().enumerate() {
        let values = column_values(rng, column, count);

        let mut chosen = Vec::with_capacity(count);
        for _ in 0..count {
            let open: Vec<usize> = (0..ROWS)
                .filter(|&r| filled[r] < NUMBERS_PER_ROW && !chosen.contains(&r))
                .collect();
            let &row = open.choose(rng)?;
            chosen.push(row);
            filled[row] += 1;
        }

        // Rows are picked in random order; assign values top to bottom so the
        // column stays ascending.
        chosen.sort_unstable();
        for (row, value) in chosen.into_iter().zip(values) {
            rows[row][column] = Some(value);
        }
    }

    Some(Ticket::new(rows))
}
