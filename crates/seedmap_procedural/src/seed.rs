//! # World Seeds
//!
//! Everything a map shows derives from one signed 64-bit seed.
//!
//! ## Text Seeds
//!
//! Users type seeds. Text that parses as a decimal `i64` is used verbatim,
//! anything else is folded with the classic 32-bit `h = 31 * h + c` string
//! hash over UTF-16 code units. Both paths are platform independent, so the
//! same text always yields the same world.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Multiplier used to scramble derived sub-seeds.
const MIX_MULTIPLIER: u64 = 0x517c_c1b7_2722_0a95;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldSeed(i64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: i64) -> Self {
        Self(seed)
    }

    /// Creates a seed from user input.
    ///
    /// Numeric text is taken literally; other text is hashed.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.parse::<i64>() {
            Ok(value) => Self(value),
            Err(_) => Self(i64::from(string_hash(trimmed))),
        }
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., one structure type).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        Self(mix(self.0 as u64 ^ purpose) as i64)
    }

    /// Derives the sub-seed of one lattice cell of a named stream.
    ///
    /// Used for noise corners and placement regions: `(seed, salt, a, b)`
    /// fully determines the result.
    #[inline]
    #[must_use]
    pub const fn lattice(self, salt: u64, a: i64, b: i64) -> i64 {
        let mut hash = self.0 as u64 ^ salt;
        hash = mix(hash ^ a as u64);
        hash = mix(hash ^ b as u64);
        hash as i64
    }
}

impl From<i64> for WorldSeed {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for WorldSeed {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_text(s))
    }
}

impl fmt::Display for WorldSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 32-bit polynomial string hash (`h = 31 * h + c`, wrapping).
#[must_use]
pub fn string_hash(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Salt for a named stream (noise channel, structure tag).
#[inline]
#[must_use]
pub fn salt_of(name: &str) -> u64 {
    i64::from(string_hash(name)) as u64
}

#[inline]
const fn mix(value: u64) -> u64 {
    let hash = value.wrapping_mul(MIX_MULTIPLIER);
    hash ^ (hash >> 32)
}
