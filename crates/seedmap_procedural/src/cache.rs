//! # Spatial Query Cache
//!
//! Keeps repeated viewport queries cheap.
//!
//! ## Layers
//!
//! 1. `BiomeField`: per-block biome cache (bounded FIFO)
//! 2. `StructureManager`: placement results per `(context, type, range)`,
//!    one power-of-two range per type
//! 3. Chunk biome memo: one sample per chunk, at the chunk centre (bounded FIFO)
//! 4. Find memo: `find_structures` answers per `(type, centre, radius)`
//!    (bounded FIFO)
//!
//! Every layer is only valid for one `GenerationContext`. Switching context
//! resets all of them.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;

use crate::biome::{Biome, BiomeField, BiomeFieldStats};
use crate::chunk::{ChunkCoord, ChunkRect};
use crate::config::GenerationConfig;
use crate::error::{GenerationError, GenerationResult};
use crate::structure::{
    sort_by_distance, Structure, StructureCacheStats, StructureManager, StructureType,
};
use crate::version::GenerationContext;

/// Default size of the per-chunk biome memo.
pub const DEFAULT_CHUNK_MEMO_CAPACITY: usize = 16_384;

/// Default number of remembered `find_structures` answers.
pub const DEFAULT_FIND_MEMO_CAPACITY: usize = 512;

/// Default upper bound on a search radius, in blocks.
pub const DEFAULT_MAX_SEARCH_RADIUS: u32 = 100_000;

/// Key of the find memo.
type FindKey = (StructureType, i32, i32, u32);

/// Map that forgets its oldest entry once full.
#[derive(Debug)]
struct FifoMemo<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Clone + Eq + Hash, V> FifoMemo<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    fn insert(&mut self, key: K, value: V) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Snapshot of every cache counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Per-block biome cache.
    pub biome: BiomeFieldStats,
    /// Placement result cache.
    pub structures: StructureCacheStats,
    /// Chunk biome memo hits.
    pub chunk_hits: u64,
    /// Chunk biome memo misses.
    pub chunk_misses: u64,
    /// Find memo hits.
    pub find_hits: u64,
    /// Find memo misses.
    pub find_misses: u64,
    /// Number of context switches that cleared the caches.
    pub resets: u64,
}

/// Cached biome and structure queries for one generation context.
#[derive(Debug)]
pub struct SpatialQueryCache {
    context: GenerationContext,
    biome_capacity: usize,
    field: BiomeField,
    structures: StructureManager,
    chunk_biomes: FifoMemo<ChunkCoord, Biome>,
    finds: FifoMemo<FindKey, Vec<Structure>>,
    max_search_radius: u32,
    stats: CacheStats,
}

impl SpatialQueryCache {
    /// Creates a cache over a structure manager with default memo limits.
    #[must_use]
    pub fn new(
        context: GenerationContext,
        structures: StructureManager,
        biome_capacity: usize,
    ) -> Self {
        let config = GenerationConfig {
            biome_cache_capacity: biome_capacity,
            ..GenerationConfig::default()
        };
        Self::from_config(context, structures, &config)
    }

    /// Creates a cache sized by `config`.
    #[must_use]
    pub fn from_config(
        context: GenerationContext,
        structures: StructureManager,
        config: &GenerationConfig,
    ) -> Self {
        Self {
            context,
            biome_capacity: config.biome_cache_capacity,
            field: BiomeField::new(context, config.biome_cache_capacity),
            structures,
            chunk_biomes: FifoMemo::new(config.chunk_memo_capacity),
            finds: FifoMemo::new(config.find_memo_capacity),
            max_search_radius: config.max_search_radius,
            stats: CacheStats::default(),
        }
    }

    /// Context the cached answers belong to.
    #[must_use]
    pub const fn context(&self) -> GenerationContext {
        self.context
    }

    /// Switches context, clearing every layer if it changed.
    ///
    /// Returns `true` if the caches were reset.
    pub fn set_context(&mut self, context: GenerationContext) -> bool {
        if context == self.context {
            return false;
        }

        tracing::info!(
            "Generation context changed: seed {} ({}) -> seed {} ({}), clearing caches",
            self.context.seed,
            self.context.version,
            context.seed,
            context.version
        );

        self.context = context;
        self.field = BiomeField::new(context, self.biome_capacity);
        self.structures.clear();
        self.chunk_biomes.clear();
        self.finds.clear();
        self.stats.resets += 1;
        true
    }

    /// Biome at a block position.
    pub fn biome_at(&mut self, x: i32, z: i32) -> Biome {
        self.field.biome_at(x, z)
    }

    /// Biome of a chunk, sampled at its centre block.
    pub fn chunk_biome(&mut self, coord: ChunkCoord) -> Biome {
        if let Some(&biome) = self.chunk_biomes.get(&coord) {
            self.stats.chunk_hits += 1;
            return biome;
        }
        self.stats.chunk_misses += 1;
        let (x, z) = coord.center_block();
        let biome = self.field.biome_at(x, z);
        self.chunk_biomes.insert(coord, biome);
        biome
    }

    /// Chunk biomes of the square reaching `radius` chunks around `center`.
    pub fn biome_samples(
        &mut self,
        center: ChunkCoord,
        radius: u32,
    ) -> BTreeMap<ChunkCoord, Biome> {
        ChunkRect::around(center, radius)
            .iter()
            .map(|coord| (coord, self.chunk_biome(coord)))
            .collect()
    }

    /// Structures of `tag` within `radius` blocks of the centre, sorted by
    /// distance from the origin.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStructureType` for an unregistered tag and
    /// `InvalidArgument` for a radius above the configured maximum.
    pub fn find_structures(
        &mut self,
        tag: &str,
        center_x: i32,
        center_z: i32,
        radius: u32,
    ) -> GenerationResult<Vec<Structure>> {
        let structure_type = self.structures.registry().get(tag)?.structure_type().clone();
        if radius > self.max_search_radius {
            return Err(GenerationError::InvalidArgument(format!(
                "search radius {radius} exceeds the maximum of {}",
                self.max_search_radius
            )));
        }
        let key = (structure_type, center_x, center_z, radius);
        if let Some(found) = self.finds.get(&key) {
            self.stats.find_hits += 1;
            return Ok(found.clone());
        }
        self.stats.find_misses += 1;

        let rect = ChunkRect::from_block_circle(center_x, center_z, radius);
        let (cx, cz) = (f64::from(center_x), f64::from(center_z));
        let limit = f64::from(radius) * f64::from(radius);

        let mut found: Vec<Structure> = self
            .structures
            .generate_in_region(self.context, tag, rect, &mut self.field)?
            .into_iter()
            .filter(|s| s.distance_squared_to(cx, cz) <= limit)
            .collect();
        sort_by_distance(&mut found);

        self.finds.insert(key, found.clone());
        Ok(found)
    }

    /// Every structure of `tag` within `range` chunks of the origin.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStructureType` or `InvalidArgument`.
    pub fn structures_in_range(
        &mut self,
        tag: &str,
        range: i32,
    ) -> GenerationResult<Vec<Structure>> {
        let mut list = self
            .structures
            .generate(self.context, tag, range, &mut self.field)?
            .to_vec();
        sort_by_distance(&mut list);
        Ok(list)
    }

    /// Every registered structure type within `range` chunks, sorted by
    /// distance from the origin.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a negative range.
    pub fn all_structures(&mut self, range: i32) -> GenerationResult<Vec<Structure>> {
        self.structures.generate_all(self.context, range, &mut self.field)
    }

    /// Registered structure tags.
    pub fn structure_types(&self) -> impl Iterator<Item = &StructureType> {
        self.structures.registry().types()
    }

    /// Entries in the per-chunk biome memo.
    #[must_use]
    pub fn chunk_memo_len(&self) -> usize {
        self.chunk_biomes.len()
    }

    /// Entries in the find memo.
    #[must_use]
    pub fn find_memo_len(&self) -> usize {
        self.finds.len()
    }

    /// Cached placement results.
    #[must_use]
    pub fn structure_entries(&self) -> usize {
        self.structures.cached_entries()
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            biome: self.field.stats(),
            structures: self.structures.stats(),
            ..self.stats
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::WorldSeed;
    use crate::version::GameVersion;

    fn cache(seed: i64) -> SpatialQueryCache {
        let context = GenerationContext::new(WorldSeed::new(seed), GameVersion::V1_20);
        SpatialQueryCache::new(context, StructureManager::with_defaults().unwrap(), 4096)
    }

    #[test]
    fn test_find_is_memoized() {
        let mut cache = cache(1234);
        let first = cache.find_structures("village", 0, 0, 3000).unwrap();
        let second = cache.find_structures("village", 0, 0, 3000).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.stats().find_hits, 1);
        assert_eq!(cache.stats().find_misses, 1);
    }

    #[test]
    fn test_find_respects_circle() {
        let mut cache = cache(77);
        let found = cache.find_structures("ruined_portal", 500, -300, 1500).unwrap();
        for s in &found {
            assert!(s.distance_squared_to(500.0, -300.0) <= 1500.0 * 1500.0);
        }
        assert!(found
            .windows(2)
            .all(|w| w[0].distance_from_origin <= w[1].distance_from_origin));
    }

    #[test]
    fn test_unknown_type_is_error() {
        let mut cache = cache(1);
        assert!(cache.find_structures("end_city", 0, 0, 100).is_err());
    }

    #[test]
    fn test_chunk_biome_matches_centre_block() {
        let mut cache = cache(5);
        let coord = ChunkCoord::new(-3, 7);
        let (x, z) = coord.center_block();
        assert_eq!(cache.chunk_biome(coord), cache.biome_at(x, z));
        cache.chunk_biome(coord);
        assert_eq!(cache.stats().chunk_hits, 1);
    }

    #[test]
    fn test_biome_samples_cover_square() {
        let mut cache = cache(5);
        let samples = cache.biome_samples(ChunkCoord::new(0, 0), 3);
        assert_eq!(samples.len(), 49);
        assert!(samples.values().all(|b| *b != Biome::Unknown));
    }

    #[test]
    fn test_panning_stays_bounded() {
        let context = GenerationContext::new(WorldSeed::new(1234), GameVersion::V1_20);
        let config = GenerationConfig {
            chunk_memo_capacity: 64,
            find_memo_capacity: 16,
            ..GenerationConfig::default()
        };
        let manager = StructureManager::with_defaults().unwrap();
        let mut cache = SpatialQueryCache::from_config(context, manager, &config);

        for step in 0..200 {
            cache.find_structures("village", step * 16, 0, 800).unwrap();
            cache.chunk_biome(ChunkCoord::new(step, -step));

            assert!(cache.find_memo_len() <= 16);
            assert!(cache.chunk_memo_len() <= 64);
            assert_eq!(cache.structure_entries(), 1);
        }
        println!("placement runs while panning: {}", cache.stats().structures.misses);
        assert!(cache.stats().structures.misses <= 3);
    }

    #[test]
    fn test_evicted_answers_are_recomputed_identically() {
        let context = GenerationContext::new(WorldSeed::new(8), GameVersion::V1_18);
        let config = GenerationConfig {
            chunk_memo_capacity: 2,
            find_memo_capacity: 1,
            ..GenerationConfig::default()
        };
        let manager = StructureManager::with_defaults().unwrap();
        let mut cache = SpatialQueryCache::from_config(context, manager, &config);

        let first = cache.find_structures("temple", 0, 0, 3000).unwrap();
        let biome = cache.chunk_biome(ChunkCoord::new(0, 0));
        cache.find_structures("temple", 100, 100, 3000).unwrap();
        cache.chunk_biome(ChunkCoord::new(1, 0));
        cache.chunk_biome(ChunkCoord::new(2, 0));

        assert_eq!(cache.find_structures("temple", 0, 0, 3000).unwrap(), first);
        assert_eq!(cache.chunk_biome(ChunkCoord::new(0, 0)), biome);
        assert_eq!(cache.stats().find_hits, 0);
        assert_eq!(cache.stats().chunk_hits, 0);
    }

    #[test]
    fn test_radius_limit() {
        assert!(matches!(
            cache(3).find_structures("village", 0, 0, u32::MAX),
            Err(GenerationError::InvalidArgument(_))
        ));

        let context = GenerationContext::new(WorldSeed::new(3), GameVersion::V1_20);
        let config = GenerationConfig {
            max_search_radius: 5000,
            ..GenerationConfig::default()
        };
        let manager = StructureManager::with_defaults().unwrap();
        let mut cache = SpatialQueryCache::from_config(context, manager, &config);
        assert!(cache.find_structures("village", 0, 0, 5000).is_ok());
        assert!(matches!(
            cache.find_structures("village", 0, 0, 5001),
            Err(GenerationError::InvalidArgument(_))
        ));
        assert!(matches!(
            cache.find_structures("end_city", 0, 0, 5001),
            Err(GenerationError::UnknownStructureType(_))
        ));
    }

    #[test]
    fn test_context_switch_resets_everything() {
        let mut a = cache(1);
        let mut b = cache(2);
        let from_b = b.find_structures("temple", 0, 0, 4000).unwrap();

        a.find_structures("temple", 0, 0, 4000).unwrap();
        a.chunk_biome(ChunkCoord::new(0, 0));
        assert!(a.set_context(b.context()));
        assert!(!a.set_context(b.context()));

        // Nothing from the old seed may leak into the new answers.
        assert_eq!(a.find_structures("temple", 0, 0, 4000).unwrap(), from_b);
        assert_eq!(
            a.chunk_biome(ChunkCoord::new(0, 0)),
            b.chunk_biome(ChunkCoord::new(0, 0))
        );
        assert_eq!(a.stats().resets, 1);
    }
}
