//! # Biome Classification
//!
//! Determines terrain type from climate values.
//!
//! Uses a climate model based on:
//! - Temperature and humidity (the base table)
//! - Water level (oceans, rivers, beaches)
//! - Small-scale variation (rare biomes)

use std::collections::{HashMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::noise::{ClimateSample, ClimateSource, ValueNoiseClimate};
use crate::version::GenerationContext;

/// Default capacity of the per-block biome cache.
pub const DEFAULT_BIOME_CACHE_CAPACITY: usize = 10_000;

/// Biome types in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Biome {
    /// Sentinel for "no answer available".
    #[default]
    Unknown = 0,
    /// Plains/grassland
    Plains = 1,
    /// Arid desert
    Desert = 2,
    /// Forest
    Forest = 3,
    /// High mountains
    Mountains = 4,
    /// Swamp/wetland
    Swamp = 5,
    /// Ocean
    Ocean = 6,
    /// River
    River = 7,
    /// Taiga forest
    Taiga = 8,
    /// Beach/coastline
    Beach = 9,
    /// Savanna grassland
    Savanna = 10,
    /// Dense jungle
    Jungle = 11,
    /// Badlands
    Badlands = 12,
    /// Dark forest
    DarkForest = 13,
    /// Snowy plains
    IcePlains = 14,
    /// Mushroom island
    MushroomIsland = 15,
}

impl Biome {
    /// Every biome, in id order.
    pub const ALL: [Self; 16] = [
        Self::Unknown,
        Self::Plains,
        Self::Desert,
        Self::Forest,
        Self::Mountains,
        Self::Swamp,
        Self::Ocean,
        Self::River,
        Self::Taiga,
        Self::Beach,
        Self::Savanna,
        Self::Jungle,
        Self::Badlands,
        Self::DarkForest,
        Self::IcePlains,
        Self::MushroomIsland,
    ];

    /// Numeric id.
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Converts from u8. Out-of-range ids map to `Unknown`.
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Plains,
            2 => Self::Desert,
            3 => Self::Forest,
            4 => Self::Mountains,
            5 => Self::Swamp,
            6 => Self::Ocean,
            7 => Self::River,
            8 => Self::Taiga,
            9 => Self::Beach,
            10 => Self::Savanna,
            11 => Self::Jungle,
            12 => Self::Badlands,
            13 => Self::DarkForest,
            14 => Self::IcePlains,
            15 => Self::MushroomIsland,
            _ => Self::Unknown,
        }
    }

    /// Snake-case name, matching the serialized form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Plains => "plains",
            Self::Desert => "desert",
            Self::Forest => "forest",
            Self::Mountains => "mountains",
            Self::Swamp => "swamp",
            Self::Ocean => "ocean",
            Self::River => "river",
            Self::Taiga => "taiga",
            Self::Beach => "beach",
            Self::Savanna => "savanna",
            Self::Jungle => "jungle",
            Self::Badlands => "badlands",
            Self::DarkForest => "dark_forest",
            Self::IcePlains => "ice_plains",
            Self::MushroomIsland => "mushroom_island",
        }
    }

    /// Returns whether this biome is water.
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, Self::Ocean | Self::River | Self::Beach)
    }

    /// Classifies a climate sample.
    ///
    /// Later rules override earlier ones: base table, then water, then
    /// rarity.
    #[must_use]
    pub fn classify(sample: &ClimateSample) -> Self {
        let t = sample.temperature;
        let h = sample.humidity;
        let v = sample.variation;
        let w = sample.water;

        let mut biome = Self::from_temperature_humidity(t, h);

        if w < 0.12 {
            biome = Self::Ocean;
        } else if w < 0.3 && v > 0.72 {
            biome = Self::River;
        } else if w < 0.16 && v > 0.45 {
            biome = Self::Beach;
        }

        if v > 0.965 && h > 0.6 && t > 0.45 {
            return Self::MushroomIsland;
        }
        if biome.is_water() {
            return biome;
        }

        if v > 0.93 && t > 0.55 && h > 0.5 {
            Self::Jungle
        } else if v > 0.9 && (0.2..0.55).contains(&t) && h > 0.45 {
            Self::DarkForest
        } else if v > 0.86 && t < 0.7 {
            Self::Mountains
        } else {
            biome
        }
    }

    fn from_temperature_humidity(t: f64, h: f64) -> Self {
        if t < 0.1 {
            Self::IcePlains
        } else if t < 0.2 {
            if h > 0.5 {
                Self::Taiga
            } else {
                Self::IcePlains
            }
        } else if t < 0.4 {
            if h > 0.7 {
                Self::Swamp
            } else if h > 0.4 {
                Self::Forest
            } else {
                Self::Plains
            }
        } else if t < 0.7 {
            if h < 0.2 {
                Self::Desert
            } else if h > 0.6 {
                Self::Jungle
            } else if h > 0.4 {
                Self::Forest
            } else {
                Self::Plains
            }
        } else if h < 0.3 {
            Self::Badlands
        } else if h < 0.5 {
            Self::Savanna
        } else {
            Self::Jungle
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything that answers biome queries for block positions.
///
/// Placement strategies take `&mut dyn BiomeLookup` so they stay object
/// safe regardless of the climate source behind the field.
pub trait BiomeLookup {
    /// Biome at a block position.
    fn biome_at(&mut self, x: i32, z: i32) -> Biome;
}

impl<S: ClimateSource> BiomeLookup for BiomeField<S> {
    fn biome_at(&mut self, x: i32, z: i32) -> Biome {
        BiomeField::biome_at(self, x, z)
    }
}

/// Cache statistics for a `BiomeField`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BiomeFieldStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that sampled the climate.
    pub misses: u64,
    /// Samples that failed and fell back to the last good biome.
    pub fallbacks: u64,
}

/// Biome lookup for one generation context.
///
/// Results are cached per block in a bounded FIFO cache.
#[derive(Debug)]
pub struct BiomeField<S: ClimateSource = ValueNoiseClimate> {
    context: GenerationContext,
    source: S,
    capacity: usize,
    cache: HashMap<(i32, i32), Biome>,
    order: VecDeque<(i32, i32)>,
    last_good: Biome,
    stats: BiomeFieldStats,
}

impl BiomeField<ValueNoiseClimate> {
    /// Creates a field backed by value noise.
    #[must_use]
    pub fn new(context: GenerationContext, capacity: usize) -> Self {
        Self::with_source(context, ValueNoiseClimate::new(context.seed), capacity)
    }
}

impl<S: ClimateSource> BiomeField<S> {
    /// Creates a field backed by a custom climate source.
    #[must_use]
    pub fn with_source(context: GenerationContext, source: S, capacity: usize) -> Self {
        Self {
            context,
            source,
            capacity: capacity.max(1),
            cache: HashMap::new(),
            order: VecDeque::new(),
            last_good: Biome::Unknown,
            stats: BiomeFieldStats::default(),
        }
    }

    /// Context this field answers for.
    #[must_use]
    pub const fn context(&self) -> GenerationContext {
        self.context
    }

    /// Biome at a block position.
    ///
    /// A failed sample is logged and answered with the last biome that was
    /// computed successfully (`Unknown` before the first success).
    pub fn biome_at(&mut self, x: i32, z: i32) -> Biome {
        if let Some(&biome) = self.cache.get(&(x, z)) {
            self.stats.hits += 1;
            return biome;
        }
        self.stats.misses += 1;

        match self.source.climate_at(x, z) {
            Ok(sample) => {
                let biome = Biome::classify(&sample);
                self.insert(x, z, biome);
                self.last_good = biome;
                biome
            }
            Err(error) => {
                self.stats.fallbacks += 1;
                tracing::warn!(
                    "Biome sample failed ({error}), using last good biome {}",
                    self.last_good
                );
                self.last_good
            }
        }
    }

    fn insert(&mut self, x: i32, z: i32, biome: Biome) {
        if self.cache.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.cache.remove(&oldest);
            }
        }
        self.cache.insert((x, z), biome);
        self.order.push_back((x, z));
    }

    /// Number of cached blocks.
    #[must_use]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Cache capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns whether a block is currently cached.
    #[must_use]
    pub fn is_cached(&self, x: i32, z: i32) -> bool {
        self.cache.contains_key(&(x, z))
    }

    /// Cache statistics.
    #[must_use]
    pub const fn stats(&self) -> BiomeFieldStats {
        self.stats
    }

    /// Drops every cached biome.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.order.clear();
        self.last_good = Biome::Unknown;
    }
}
