//! Placement strategies keyed by structure tag.

use std::collections::BTreeMap;
use std::fmt;

use crate::biome::Biome;
use crate::error::{GenerationError, GenerationResult};
use crate::version::GameVersion;

use super::{
    BiomeRule, GridPlacement, RingPlacement, ScatterPlacement, StructurePlacement, StructureType,
};

/// Registry of placement strategies.
///
/// Iteration order is the sorted tag order, so "every type" queries are
/// reproducible.
#[derive(Default)]
pub struct StructureRegistry {
    strategies: BTreeMap<StructureType, Box<dyn StructurePlacement>>,
}

impl StructureRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in structure type.
    ///
    /// # Errors
    ///
    /// Only fails if a built-in table entry is malformed.
    pub fn with_defaults() -> GenerationResult<Self> {
        use Biome::{
            Beach, DarkForest, Desert, IcePlains, Jungle, Ocean, Plains, River, Savanna, Taiga,
        };

        let mut registry = Self::new();

        registry.register(GridPlacement::new(
            StructureType::VILLAGE,
            32,
            8,
            0.5,
            BiomeRule::one_of(&[Plains, Desert, Savanna, Taiga])
                .with_biome_since(GameVersion::V1_18, IcePlains),
        )?);
        registry.register(GridPlacement::new(
            StructureType::TEMPLE,
            32,
            8,
            0.3,
            BiomeRule::one_of(&[Desert, Jungle, Plains]),
        )?);
        registry.register(GridPlacement::new(
            StructureType::MONUMENT,
            32,
            5,
            0.6,
            BiomeRule::one_of(&[Ocean]),
        )?);
        registry.register(GridPlacement::new(
            StructureType::MANSION,
            80,
            20,
            0.8,
            BiomeRule::one_of(&[DarkForest]),
        )?);
        registry.register(GridPlacement::new(
            StructureType::FORTRESS,
            27,
            4,
            0.25,
            BiomeRule::any(),
        )?);
        registry.register(GridPlacement::new(
            StructureType::OUTPOST,
            32,
            8,
            0.2,
            BiomeRule::one_of(&[Desert, Plains, Taiga, Savanna]),
        )?);
        registry.register(GridPlacement::new(
            StructureType::RUINED_PORTAL,
            40,
            15,
            0.5,
            BiomeRule::any(),
        )?);
        registry.register(RingPlacement::new(
            StructureType::STRONGHOLD,
            8,
            1280.0,
            100,
            BiomeRule::none_of(&[Ocean, River, Beach]),
        )?);
        registry.register(ScatterPlacement::new(
            StructureType::SPAWNER,
            20,
            1500,
            0.5,
            BiomeRule::any(),
        )?);
        registry.register(ScatterPlacement::new(
            StructureType::MINESHAFT,
            40,
            2000,
            0.4,
            BiomeRule::none_of(&[Ocean]),
        )?);

        Ok(registry)
    }

    /// Registers a strategy, replacing any previous one for the same tag.
    pub fn register(&mut self, strategy: impl StructurePlacement + 'static) {
        let tag = strategy.structure_type().clone();
        if self.strategies.insert(tag.clone(), Box::new(strategy)).is_some() {
            tracing::debug!("Replaced placement strategy for {tag}");
        }
    }

    /// Looks up the strategy for a tag.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStructureType` if nothing is registered for `tag`.
    pub fn get(&self, tag: &str) -> GenerationResult<&dyn StructurePlacement> {
        self.strategies
            .get(&StructureType::new(tag))
            .map(|strategy| &**strategy)
            .ok_or_else(|| GenerationError::UnknownStructureType(tag.to_string()))
    }

    /// Returns whether a tag is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.strategies.contains_key(&StructureType::new(tag))
    }

    /// Registered tags in sorted order.
    pub fn types(&self) -> impl Iterator<Item = &StructureType> {
        self.strategies.keys()
    }

    /// Number of registered strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl fmt::Debug for StructureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructureRegistry")
            .field("types", &self.strategies.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_register_every_tag() {
        let registry = StructureRegistry::with_defaults().unwrap();
        assert_eq!(registry.len(), 10);
        for tag in [
            "village",
            "temple",
            "stronghold",
            "monument",
            "mansion",
            "mineshaft",
            "fortress",
            "spawner",
            "outpost",
            "ruined_portal",
        ] {
            assert!(registry.contains(tag), "missing {tag}");
        }
    }

    #[test]
    fn test_unknown_tag() {
        let registry = StructureRegistry::with_defaults().unwrap();
        assert_eq!(
            registry.get("end_city").err(),
            Some(GenerationError::UnknownStructureType("end_city".to_string()))
        );
    }

    #[test]
    fn test_village_biomes_by_version() {
        let registry = StructureRegistry::with_defaults().unwrap();
        let village = registry.get("village").unwrap();
        assert!(village.is_valid_biome(Biome::Plains, None));
        assert!(!village.is_valid_biome(Biome::IcePlains, Some(GameVersion::V1_16)));
        assert!(village.is_valid_biome(Biome::IcePlains, Some(GameVersion::V1_18)));
        assert!(!village.is_valid_biome(Biome::Jungle, Some(GameVersion::V1_20)));
    }

    #[test]
    fn test_types_sorted() {
        let registry = StructureRegistry::with_defaults().unwrap();
        let tags: Vec<&str> = registry.types().map(StructureType::as_str).collect();
        let mut sorted = tags.clone();
        sorted.sort_unstable();
        assert_eq!(tags, sorted);
    }
}
