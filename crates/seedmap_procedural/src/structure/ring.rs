//! Ring placement: a fixed number of structures around the origin.

use std::f64::consts::TAU;

use crate::biome::{Biome, BiomeLookup};
use crate::error::{GenerationError, GenerationResult};
use crate::random::JavaRandom;
use crate::seed::{salt_of, WorldSeed};
use crate::version::GameVersion;

use super::{BiomeRule, PlacementOptions, Structure, StructurePlacement, StructureType};

/// Places `count` structures at equal angles on a ring of `distance`
/// blocks, each jittered per axis.
///
/// The biome is recorded but never prevents placement.
#[derive(Clone, Debug)]
pub struct RingPlacement {
    structure_type: StructureType,
    salt: u64,
    count: u32,
    distance: f64,
    jitter: i32,
    biomes: BiomeRule,
}

impl RingPlacement {
    /// Creates a ring strategy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero count or a negative jitter.
    pub fn new(
        structure_type: StructureType,
        count: u32,
        distance: f64,
        jitter: i32,
        biomes: BiomeRule,
    ) -> GenerationResult<Self> {
        if count == 0 || jitter < 0 {
            return Err(GenerationError::InvalidArgument(format!(
                "ring needs count > 0 and jitter >= 0, got {count} and {jitter}"
            )));
        }
        Ok(Self {
            salt: salt_of(structure_type.as_str()),
            structure_type,
            count,
            distance,
            jitter,
            biomes,
        })
    }

    fn jitter(&self, rng: &mut JavaRandom) -> GenerationResult<i32> {
        if self.jitter == 0 {
            return Ok(0);
        }
        Ok(rng.next_int_bounded(self.jitter * 2)? - self.jitter)
    }
}

impl StructurePlacement for RingPlacement {
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
        let mut placed = Vec::with_capacity(self.count as usize);

        for i in 0..self.count {
            let angle = TAU * f64::from(i) / f64::from(self.count);
            let x = (angle.cos() * self.distance).floor() as i32 + self.jitter(&mut rng)?;
            let z = (angle.sin() * self.distance).floor() as i32 + self.jitter(&mut rng)?;

            let biome = biomes.biome_at(x, z);
            placed.push(Structure::new(
                self.structure_type.clone(),
                x,
                z,
                biome,
                options.version,
            ));
        }

        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat(Biome);

    impl BiomeLookup for Flat {
        fn biome_at(&mut self, _x: i32, _z: i32) -> Biome {
            self.0
        }
    }

    fn strongholds() -> RingPlacement {
        RingPlacement::new(
            StructureType::STRONGHOLD,
            8,
            1280.0,
            100,
            BiomeRule::none_of(&[Biome::Ocean, Biome::River, Biome::Beach]),
        )
        .unwrap()
    }

    #[test]
    fn test_ring_always_emits_count() {
        let placed = strongholds()
            .generate_structures(
                WorldSeed::new(12),
                &mut Flat(Biome::Ocean),
                0,
                &PlacementOptions::default(),
            )
            .unwrap();
        assert_eq!(placed.len(), 8);
        assert!(placed.iter().all(|s| s.biome == Biome::Ocean));
    }

    #[test]
    fn test_ring_distance_band() {
        let placed = strongholds()
            .generate_structures(
                WorldSeed::new(-4),
                &mut Flat(Biome::Plains),
                10,
                &PlacementOptions::default(),
            )
            .unwrap();
        for s in &placed {
            // 1280 +- sqrt(2) * 100, plus floor rounding.
            assert!(s.distance_from_origin > 1280.0 - 143.0, "{s:?}");
            assert!(s.distance_from_origin < 1280.0 + 143.0, "{s:?}");
        }
    }

    #[test]
    fn test_rejects_empty_ring() {
        let ring = RingPlacement::new(StructureType::STRONGHOLD, 0, 10.0, 1, BiomeRule::any());
        assert!(ring.is_err());
    }

    #[test]
    fn test_zero_jitter_is_exact() {
        let ring =
            RingPlacement::new(StructureType::STRONGHOLD, 4, 100.0, 0, BiomeRule::any()).unwrap();
        let placed = ring
            .generate_structures(
                WorldSeed::new(0),
                &mut Flat(Biome::Plains),
                0,
                &PlacementOptions::default(),
            )
            .unwrap();
        assert_eq!((placed[0].x, placed[0].z), (100, 0));
    }
}
