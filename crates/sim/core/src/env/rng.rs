//! Deterministic random number generation.
//!
//! All rolls (dodge, block, fumble, hit location) go through [`RngOracle`]
//! with seeds derived from simulation state, so a session replays
//! identically from the same starting seed.

use crate::state::{ActorId, Tick};

/// Roll channels keep independent outcomes from sharing a seed within one
/// attack instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RollChannel {
    Dodge,
    Block,
    Fumble,
    HitLocation,
}

impl RollChannel {
    const fn salt(self) -> u64 {
        match self {
            RollChannel::Dodge => 0x0d,
            RollChannel::Block => 0xb1,
            RollChannel::Fumble => 0xf0,
            RollChannel::HitLocation => 0x41,
        }
    }
}

/// Mixes clock, participants, and channel into a roll seed.
pub fn roll_seed(tick: Tick, attacker: ActorId, defender: ActorId, channel: RollChannel) -> u64 {
    let mut seed = tick.0;
    seed = seed
        .wrapping_mul(0x9e3779b97f4a7c15)
        .wrapping_add(attacker.0 as u64);
    seed = seed
        .wrapping_mul(0x9e3779b97f4a7c15)
        .wrapping_add(defender.0 as u64);
    seed.wrapping_mul(0x9e3779b97f4a7c15)
        .wrapping_add(channel.salt())
}

/// Deterministic random source.
///
/// Implementations must produce the same value for the same seed; the
/// session-level seed that perturbs the stream belongs to the
/// implementation, not the call sites.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Random value in `[0, total)`, used for weighted table picks.
    fn weighted_index(&self, seed: u64, total: u32) -> u32 {
        if total == 0 {
            return 0;
        }
        self.next_u32(seed) % total
    }
}

/// PCG-XSH-RR random number generator.
///
/// Small state, fast, and statistically solid; the same generator family
/// the original host used for combat rolls.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng {
    session_seed: u64,
}

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(session_seed: u64) -> Self {
        Self { session_seed }
    }

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed ^ self.session_seed);
        Self::pcg_output(Self::pcg_step(state))
    }
}
