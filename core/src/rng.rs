//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through an LcgStream owned by the run that
//! created it. Streams are never shared between runs.
//!
//! The generator is a plain linear congruential generator:
//!   state = (a * state + c) mod m
//! with the Numerical Recipes constants by default. Same seed, same
//! call order, bit-identical draws.

use crate::{
    error::{SimError, SimResult},
    types::{CombinationId, Seed},
};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

pub const LCG_MULTIPLIER: u64 = 1_664_525;
pub const LCG_INCREMENT: u64 = 1_013_904_223;
pub const LCG_MODULUS: u64 = 1 << 32;
/// Largest modulus whose states all divide into an f64 below 1.0.
pub const MAX_MODULUS: u64 = 1 << 53;

/// A reproducible uniform stream for a single simulation run.
#[derive(Debug, Clone)]
pub struct LcgStream {
    state: u64,
    multiplier: u64,
    increment: u64,
    modulus: u64,
}

impl LcgStream {
    pub fn new(seed: Seed) -> Self {
        Self {
            state: seed,
            multiplier: LCG_MULTIPLIER,
            increment: LCG_INCREMENT,
            modulus: LCG_MODULUS,
        }
    }

    /// Build a stream with custom constants. The modulus must lie in
    /// `1..=MAX_MODULUS` so every draw stays below 1.0.
    pub fn with_constants(seed: Seed, multiplier: u64, increment: u64, modulus: u64) -> SimResult<Self> {
        if modulus == 0 {
            return Err(SimError::invalid("modulus", 0.0, "must be greater than 0"));
        }
        if modulus > MAX_MODULUS {
            return Err(SimError::invalid("modulus", modulus as f64, "must not exceed 2^53"));
        }
        Ok(Self { state: seed, multiplier, increment, modulus })
    }

    /// Current raw state. Useful for checkpointing a run.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Advance once and return the new raw state, always below the modulus.
    fn step(&mut self) -> u64 {
        // 128-bit intermediate keeps a*state exact for any seed.
        let next = (self.multiplier as u128 * self.state as u128 + self.increment as u128)
            % self.modulus as u128;
        self.state = next as u64;
        self.state
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let raw = self.step();
        raw as f64 / self.modulus as f64
    }
}

impl RngCore for LcgStream {
    fn next_u32(&mut self) -> u32 {
        self.step() as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for LcgStream {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }
}

/// How each combination in a sweep gets its seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    /// Every combination replays the master seed. Outcomes differ only
    /// because parameters differ (common random numbers).
    #[default]
    Shared,
    /// Each combination gets its own seed derived from the master seed
    /// and its id.
    PerCombination,
}

impl SeedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::PerCombination => "per_combination",
        }
    }
}

/// Hands out seeds for combinations of one sweep.
#[derive(Debug, Clone, Copy)]
pub struct SeedPlan {
    master_seed: Seed,
    mode: SeedMode,
}

impl SeedPlan {
    pub fn new(master_seed: Seed, mode: SeedMode) -> Self {
        Self { master_seed, mode }
    }

    pub fn master_seed(&self) -> Seed {
        self.master_seed
    }

    pub fn seed_for(&self, id: CombinationId) -> Seed {
        match self.mode {
            SeedMode::Shared => self.master_seed,
            SeedMode::PerCombination => {
                let mixed = self.master_seed ^ (id.0 as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
                Pcg64Mcg::seed_from_u64(mixed).next_u64()
            }
        }
    }

    /// A fresh stream for the given combination.
    pub fn stream_for(&self, id: CombinationId) -> LcgStream {
        LcgStream::new(self.seed_for(id))
    }
}
