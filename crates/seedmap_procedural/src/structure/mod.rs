//! # Structure Placement
//!
//! Points of interest placed deterministically from the seed.
//!
//! ## Strategy Families
//!
//! - [`GridPlacement`]: one candidate per region of a chunk grid
//! - [`RingPlacement`]: fixed count on a ring around the origin
//! - [`ScatterPlacement`]: uniform points in a square around the origin
//!
//! Every strategy implements [`StructurePlacement`] and is registered by tag
//! in a [`StructureRegistry`]. The [`StructureManager`] applies version
//! presets and caches results per `(context, type, range)`.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::biome::{Biome, BiomeLookup};
use crate::error::GenerationResult;
use crate::seed::WorldSeed;
use crate::version::GameVersion;

mod grid;
mod manager;
mod registry;
mod ring;
mod scatter;

pub use grid::GridPlacement;
pub use manager::{StructureCacheStats, StructureManager};
pub use registry::StructureRegistry;
pub use ring::RingPlacement;
pub use scatter::ScatterPlacement;

/// Open string tag naming a structure type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureType(Cow<'static, str>);

impl StructureType {
    /// Villages.
    pub const VILLAGE: Self = Self::from_static("village");
    /// Desert and jungle temples.
    pub const TEMPLE: Self = Self::from_static("temple");
    /// Strongholds.
    pub const STRONGHOLD: Self = Self::from_static("stronghold");
    /// Ocean monuments.
    pub const MONUMENT: Self = Self::from_static("monument");
    /// Woodland mansions.
    pub const MANSION: Self = Self::from_static("mansion");
    /// Mineshafts.
    pub const MINESHAFT: Self = Self::from_static("mineshaft");
    /// Fortresses.
    pub const FORTRESS: Self = Self::from_static("fortress");
    /// Monster spawners.
    pub const SPAWNER: Self = Self::from_static("spawner");
    /// Pillager outposts.
    pub const OUTPOST: Self = Self::from_static("outpost");
    /// Ruined portals.
    pub const RUINED_PORTAL: Self = Self::from_static("ruined_portal");

    /// Every built-in tag.
    pub const BUILTIN: [Self; 10] = [
        Self::VILLAGE,
        Self::FORTRESS,
        Self::STRONGHOLD,
        Self::MONUMENT,
        Self::MANSION,
        Self::TEMPLE,
        Self::MINESHAFT,
        Self::RUINED_PORTAL,
        Self::OUTPOST,
        Self::SPAWNER,
    ];

    /// Tag from a static string.
    #[must_use]
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    /// Tag from any string.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    /// The tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StructureType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// One placed structure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Type tag.
    pub structure_type: StructureType,
    /// Block X coordinate.
    pub x: i32,
    /// Block Z coordinate.
    pub z: i32,
    /// Biome at the structure's position.
    pub biome: Biome,
    /// Euclidean distance from (0, 0) in blocks.
    pub distance_from_origin: f64,
    /// Version the structure was generated for.
    pub version: GameVersion,
}

impl Structure {
    /// Creates a structure, computing its distance from the origin.
    #[must_use]
    pub fn new(
        structure_type: StructureType,
        x: i32,
        z: i32,
        biome: Biome,
        version: GameVersion,
    ) -> Self {
        Self {
            structure_type,
            x,
            z,
            biome,
            distance_from_origin: f64::from(x).hypot(f64::from(z)),
            version,
        }
    }

    /// Squared distance to a block position.
    #[inline]
    #[must_use]
    pub fn distance_squared_to(&self, x: f64, z: f64) -> f64 {
        let dx = f64::from(self.x) - x;
        let dz = f64::from(self.z) - z;
        dx * dx + dz * dz
    }
}

/// Sorts structures by distance from the origin, then by position.
pub fn sort_by_distance(structures: &mut [Structure]) {
    structures.sort_by(|a, b| {
        a.distance_from_origin
            .total_cmp(&b.distance_from_origin)
            .then(a.x.cmp(&b.x))
            .then(a.z.cmp(&b.z))
    });
}

/// Parameters passed from the manager to a strategy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementOptions {
    /// Version the structures are generated for.
    pub version: GameVersion,
    /// Multiplier on spawn chance (grid) or count (scatter).
    pub density_factor: f64,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            version: GameVersion::LATEST,
            density_factor: 1.0,
        }
    }
}

impl From<GameVersion> for PlacementOptions {
    fn from(version: GameVersion) -> Self {
        Self {
            version,
            density_factor: version.preset().density_factor,
        }
    }
}

/// Which biomes a structure may spawn in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BiomeRule {
    kind: RuleKind,
    since: Vec<(GameVersion, Biome)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum RuleKind {
    Any,
    OneOf(Vec<Biome>),
    NoneOf(Vec<Biome>),
}

impl BiomeRule {
    /// Every biome is valid.
    #[must_use]
    pub const fn any() -> Self {
        Self {
            kind: RuleKind::Any,
            since: Vec::new(),
        }
    }

    /// Only the listed biomes are valid.
    #[must_use]
    pub fn one_of(biomes: &[Biome]) -> Self {
        Self {
            kind: RuleKind::OneOf(biomes.to_vec()),
            since: Vec::new(),
        }
    }

    /// Every biome except the listed ones is valid.
    #[must_use]
    pub fn none_of(biomes: &[Biome]) -> Self {
        Self {
            kind: RuleKind::NoneOf(biomes.to_vec()),
            since: Vec::new(),
        }
    }

    /// Also allows `biome` from `version` onwards.
    #[must_use]
    pub fn with_biome_since(mut self, version: GameVersion, biome: Biome) -> Self {
        self.since.push((version, biome));
        self
    }

    /// Returns whether `biome` is valid.
    ///
    /// Without a version only the base rule applies.
    #[must_use]
    pub fn allows(&self, biome: Biome, version: Option<GameVersion>) -> bool {
        let base = match &self.kind {
            RuleKind::Any => true,
            RuleKind::OneOf(list) => list.contains(&biome),
            RuleKind::NoneOf(list) => !list.contains(&biome),
        };
        base || version.is_some_and(|version| {
            self.since
                .iter()
                .any(|&(since, extra)| extra == biome && version >= since)
        })
    }
}

/// A placement strategy for one structure type.
pub trait StructurePlacement {
    /// Tag of the structures this strategy places.
    fn structure_type(&self) -> &StructureType;

    /// Returns whether the structure may spawn in `biome`.
    fn is_valid_biome(&self, biome: Biome, version: Option<GameVersion>) -> bool;

    /// Places every structure within `range` chunks of the origin.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative range or degenerate
    /// parameters.
    fn generate_structures(
        &self,
        seed: WorldSeed,
        biomes: &mut dyn BiomeLookup,
        range: i32,
        options: &PlacementOptions,
    ) -> GenerationResult<Vec<Structure>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_from_origin() {
        let s = Structure::new(StructureType::VILLAGE, 3, -4, Biome::Plains, GameVersion::V1_20);
        assert!((s.distance_from_origin - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sort_by_distance_is_total() {
        let mut list = vec![
            Structure::new(StructureType::TEMPLE, 0, 10, Biome::Desert, GameVersion::V1_20),
            Structure::new(StructureType::TEMPLE, 10, 0, Biome::Desert, GameVersion::V1_20),
            Structure::new(StructureType::TEMPLE, 1, 1, Biome::Desert, GameVersion::V1_20),
        ];
        sort_by_distance(&mut list);
        let order: Vec<(i32, i32)> = list.iter().map(|s| (s.x, s.z)).collect();
        assert_eq!(order, vec![(1, 1), (0, 10), (10, 0)]);
    }

    #[test]
    fn test_biome_rule_versions() {
        let rule = BiomeRule::one_of(&[Biome::Plains])
            .with_biome_since(GameVersion::V1_18, Biome::IcePlains);
        assert!(rule.allows(Biome::Plains, None));
        assert!(!rule.allows(Biome::IcePlains, None));
        assert!(!rule.allows(Biome::IcePlains, Some(GameVersion::V1_17)));
        assert!(rule.allows(Biome::IcePlains, Some(GameVersion::V1_18)));
        assert!(rule.allows(Biome::IcePlains, Some(GameVersion::V1_20)));

        let not_ocean = BiomeRule::none_of(&[Biome::Ocean]);
        assert!(!not_ocean.allows(Biome::Ocean, None));
        assert!(not_ocean.allows(Biome::River, None));
        assert!(BiomeRule::any().allows(Biome::Unknown, None));
    }

    #[test]
    fn test_structure_type_tags() {
        assert_eq!(StructureType::from("village"), StructureType::VILLAGE);
        assert_eq!(StructureType::RUINED_PORTAL.to_string(), "ruined_portal");
    }
}
