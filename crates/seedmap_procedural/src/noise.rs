//! # Value Noise Climate
//!
//! Deterministic lattice noise feeding the biome classifier.
//!
//! ## How a Sample Is Built
//!
//! Each channel divides the world into square cells of `scale` blocks. The
//! four lattice corners around a point each get a sub-seed derived from
//! `(seed, channel, corner)`, and a fresh [`JavaRandom`] draws one
//! `next_double()` per corner. The corners are blended bilinearly with
//! smoothstep weights, so values vary smoothly inside a cell and match at
//! the borders.
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, this implementation will produce
//! **exactly** the same values on any platform, any time.

use crate::error::{GenerationError, GenerationResult};
use crate::random::JavaRandom;
use crate::seed::{salt_of, WorldSeed};

/// Lattice size of the temperature channel, in blocks.
pub const TEMPERATURE_SCALE: f64 = 320.0;
/// Lattice size of the humidity channel, in blocks.
pub const HUMIDITY_SCALE: f64 = 256.0;
/// Lattice size of the variation channel, in blocks.
pub const VARIATION_SCALE: f64 = 96.0;
/// Lattice size of the water channel, in blocks.
pub const WATER_SCALE: f64 = 448.0;

/// One named value-noise channel.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseChannel {
    name: &'static str,
    salt: u64,
    scale: f64,
}

impl NoiseChannel {
    /// Creates a channel. The name seeds the channel's lattice.
    #[must_use]
    pub fn new(name: &'static str, scale: f64) -> Self {
        Self {
            name,
            salt: salt_of(name),
            scale,
        }
    }

    /// Channel name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Lattice size in blocks.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Value of one lattice corner, in `[0, 1)`.
    #[inline]
    #[must_use]
    pub fn corner(&self, seed: WorldSeed, cx: i64, cz: i64) -> f64 {
        JavaRandom::new(seed.lattice(self.salt, cx, cz)).next_double()
    }

    /// Samples the channel at a block position.
    ///
    /// # Errors
    ///
    /// Returns `TransientSampleFailure` if the blend is not a finite value
    /// (only possible with a degenerate scale).
    pub fn sample(&self, seed: WorldSeed, x: i32, z: i32) -> GenerationResult<f64> {
        let fx = f64::from(x) / self.scale;
        let fz = f64::from(z) / self.scale;
        let x0 = fx.floor();
        let z0 = fz.floor();

        let sx = smoothstep(fx - x0);
        let sz = smoothstep(fz - z0);
        let (cx, cz) = (x0 as i64, z0 as i64);

        let v00 = self.corner(seed, cx, cz);
        let v10 = self.corner(seed, cx + 1, cz);
        let v01 = self.corner(seed, cx, cz + 1);
        let v11 = self.corner(seed, cx + 1, cz + 1);

        let top = lerp(v00, v10, sx);
        let bottom = lerp(v01, v11, sx);
        let value = lerp(top, bottom, sz);

        if value.is_finite() {
            Ok(value)
        } else {
            Err(GenerationError::TransientSampleFailure {
                channel: self.name,
                x,
                z,
            })
        }
    }
}

#[inline]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Climate values at one block, each in `[0, 1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ClimateSample {
    /// Cold (0) to hot (1).
    pub temperature: f64,
    /// Dry (0) to wet (1).
    pub humidity: f64,
    /// Small-scale variation driving rare biomes.
    pub variation: f64,
    /// Low values are water.
    pub water: f64,
}

/// Source of climate samples for a `BiomeField`.
pub trait ClimateSource {
    /// Samples the climate at a block position.
    ///
    /// # Errors
    ///
    /// Returns `TransientSampleFailure` when a channel cannot be evaluated.
    fn climate_at(&self, x: i32, z: i32) -> GenerationResult<ClimateSample>;
}

/// Four-channel value noise climate for one seed.
#[derive(Clone, Debug)]
pub struct ValueNoiseClimate {
    seed: WorldSeed,
    temperature: NoiseChannel,
    humidity: NoiseChannel,
    variation: NoiseChannel,
    water: NoiseChannel,
}

impl ValueNoiseClimate {
    /// Creates the climate for a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            seed,
            temperature: NoiseChannel::new("temperature", TEMPERATURE_SCALE),
            humidity: NoiseChannel::new("humidity", HUMIDITY_SCALE),
            variation: NoiseChannel::new("variation", VARIATION_SCALE),
            water: NoiseChannel::new("water", WATER_SCALE),
        }
    }

    /// Seed of this climate.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }
}

impl ClimateSource for ValueNoiseClimate {
    fn climate_at(&self, x: i32, z: i32) -> GenerationResult<ClimateSample> {
        Ok(ClimateSample {
            temperature: self.temperature.sample(self.seed, x, z)?,
            humidity: self.humidity.sample(self.seed, x, z)?,
            variation: self.variation.sample(self.seed, x, z)?,
            water: self.water.sample(self.seed, x, z)?,
        })
    }
}
