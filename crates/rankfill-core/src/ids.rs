//! Short, reproducible item identifiers.
//!
//! Identifiers are two distinct characters drawn from `a–z` and `2–8`
//! (`0`, `1` and `9` are left out to avoid confusion with letters and
//! ranks), excluding all-digit pairs so an id never reads as a number.
//! That yields 1014 identifiers, enough for one 1000-rank list.
//!
//! The pool is shuffled with a seeded RNG and scoped to a single ingestion,
//! so the same input and seed always produce the same identifiers.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{InferError, Result};
use crate::model::ItemId;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz2345678";

/// Total number of identifiers a pool can hand out.
pub const POOL_SIZE: usize = 1014;

/// A pre-shuffled stack of unused identifiers.
#[derive(Debug, Clone)]
pub struct IdPool {
    free: Vec<ItemId>,
    allocated: usize,
}

impl IdPool {
    /// Build the full pool and shuffle it deterministically with `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        let chars: Vec<char> = ALPHABET.chars().collect();
        let mut free = Vec::with_capacity(POOL_SIZE);
        for &first in &chars {
            for &second in &chars {
                if first == second || (first.is_ascii_digit() && second.is_ascii_digit()) {
                    continue;
                }
                free.push(ItemId::new(format!("{first}{second}")));
            }
        }
        debug_assert_eq!(free.len(), POOL_SIZE);

        let mut rng = StdRng::seed_from_u64(seed);
        free.shuffle(&mut rng);

        Self { free, allocated: 0 }
    }

    /// Take the next identifier.
    ///
    /// # Errors
    ///
    /// Returns [`InferError::IdPoolExhausted`] once every identifier is in use.
    pub fn allocate(&mut self) -> Result<ItemId> {
        let id = self.free.pop().ok_or(InferError::IdPoolExhausted {
            allocated: self.allocated,
        })?;
        self.allocated += 1;
        Ok(id)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.free.len()
    }
}
