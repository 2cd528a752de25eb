//! Scatter placement: uniform candidates in a square around the origin.

use crate::biome::{Biome, BiomeLookup};
use crate::error::{GenerationError, GenerationResult};
use crate::random::JavaRandom;
use crate::seed::{salt_of, WorldSeed};
use crate::version::GameVersion;

use super::{BiomeRule, PlacementOptions, Structure, StructurePlacement, StructureType};

/// Draws `round(count * density)` candidates in `[-bound, bound)` blocks
/// per axis and keeps those passing the biome and chance checks.
#[derive(Clone, Debug)]
pub struct ScatterPlacement {
    structure_type: StructureType,
    salt: u64,
    count: u32,
    bound: i32,
    chance: f64,
    biomes: BiomeRule,
}

impl ScatterPlacement {
    /// Creates a scatter strategy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a non-positive bound.
    pub fn new(
        structure_type: StructureType,
        count: u32,
        bound: i32,
        chance: f64,
        biomes: BiomeRule,
    ) -> GenerationResult<Self> {
        if bound <= 0 || bound > i32::MAX / 2 {
            return Err(GenerationError::InvalidArgument(format!(
                "scatter bound out of range: {bound}"
            )));
        }
        Ok(Self {
            salt: salt_of(structure_type.as_str()),
            structure_type,
            count,
            bound,
            chance,
            biomes,
        })
    }

    /// Number of candidates drawn at `density`.
    #[must_use]
    pub fn candidates(&self, density: f64) -> u32 {
        (f64::from(self.count) * density).round().max(0.0) as u32
    }
}

impl StructurePlacement for ScatterPlacement {
    fn structure_type(&self) -> &StructureType {
        &self.structure_type
    }

    fn is_valid_biome(&self, biome: Biome, version: Option<GameVersion>) -> bool {
        self.biomes.allows(biome, version)
    }

    fn generate_structures(
        &self,
        seed: WorldSeed,
        biomes: &mut dyn BiomeLookup,
        range: i32,
        options: &PlacementOptions,
    ) -> GenerationResult<Vec<Structure>> {
        if range < 0 {
            return Err(GenerationError::InvalidArgument(format!(
                "range must not be negative, got {range}"
            )));
        }

        let mut rng = JavaRandom::from_world_seed(seed.derive(self.salt));
        let mut placed = Vec::new();

        for _ in 0..self.candidates(options.density_factor) {
            let x = rng.next_int_bounded(self.bound * 2)? - self.bound;
            let z = rng.next_int_bounded(self.bound * 2)? - self.bound;

            let biome = biomes.biome_at(x, z);
            let roll = f64::from(rng.next_float());

            if self.is_valid_biome(biome, Some(options.version)) && roll < self.chance {
                placed.push(Structure::new(
                    self.structure_type.clone(),
                    x,
                    z,
                    biome,
                    options.version,
                ));
            }
        }

        Ok(placed)
    }
}
