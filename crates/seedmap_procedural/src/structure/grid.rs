//! Region-grid placement: at most one structure per `spacing`-chunk region.

use crate::biome::{Biome, BiomeLookup};
use crate::chunk::CHUNK_SIZE;
use crate::error::{GenerationError, GenerationResult};
use crate::random::JavaRandom;
use crate::seed::{salt_of, WorldSeed};
use crate::version::GameVersion;

use super::{BiomeRule, PlacementOptions, Structure, StructurePlacement, StructureType};

/// Places one candidate per grid region and keeps it on a biome and chance
/// check.
///
/// Regions are `spacing` chunks wide and aligned to multiples of `spacing`.
/// The candidate lies in the first `spacing - separation` chunks of its
/// region on each axis, so neighbours keep at least `separation` chunks
/// apart.
#[derive(Clone, Debug)]
pub struct GridPlacement {
    structure_type: StructureType,
    salt: u64,
    spacing: i32,
    separation: i32,
    chance: f64,
    biomes: BiomeRule,
}

impl GridPlacement {
    /// Creates a grid strategy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless `0 <= separation < spacing`.
    pub fn new(
        structure_type: StructureType,
        spacing: i32,
        separation: i32,
        chance: f64,
        biomes: BiomeRule,
    ) -> GenerationResult<Self> {
        if separation < 0 || spacing <= separation {
            return Err(GenerationError::InvalidArgument(format!(
                "grid spacing {spacing} must exceed separation {separation}"
            )));
        }
        Ok(Self {
            salt: salt_of(structure_type.as_str()),
            structure_type,
            spacing,
            separation,
            chance,
            biomes,
        })
    }

    /// Region size in chunks.
    #[must_use]
    pub const fn spacing(&self) -> i32 {
        self.spacing
    }

    /// Minimum gap between neighbours in chunks.
    #[must_use]
    pub const fn separation(&self) -> i32 {
        self.separation
    }

    /// Base spawn chance per region.
    #[must_use]
    pub const fn chance(&self) -> f64 {
        self.chance
    }
}

impl StructurePlacement for GridPlacement {
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

        let first = (-range).div_euclid(self.spacing);
        let last = range.div_euclid(self.spacing);
        let threshold = self.chance * options.density_factor;
        let mut placed = Vec::new();

        for region_x in first..=last {
            for region_z in first..=last {
                let mut rng = JavaRandom::new(seed.lattice(
                    self.salt,
                    i64::from(region_x),
                    i64::from(region_z),
                ));
                let offset_x = rng.next_int_bounded(self.spacing - self.separation)?;
                let offset_z = rng.next_int_bounded(self.spacing - self.separation)?;

                let block_x = (region_x * self.spacing + offset_x).saturating_mul(CHUNK_SIZE);
                let block_z = (region_z * self.spacing + offset_z).saturating_mul(CHUNK_SIZE);

                let biome = biomes.biome_at(block_x, block_z);
                let roll = f64::from(rng.next_float());

                if self.is_valid_biome(biome, Some(options.version)) && roll < threshold {
                    placed.push(Structure::new(
                        self.structure_type.clone(),
                        block_x,
                        block_z,
                        biome,
                        options.version,
                    ));
                }
            }
        }

        tracing::debug!(
            "Grid placement of {} over {} regions produced {} structures",
            self.structure_type,
            (last - first + 1).pow(2),
            placed.len()
        );
        Ok(placed)
    }
}
