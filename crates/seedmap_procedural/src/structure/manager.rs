//! Version-aware, cached front end over the placement registry.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::biome::BiomeLookup;
use crate::chunk::ChunkRect;
use crate::error::{GenerationError, GenerationResult};
use crate::version::{GenerationContext, VersionPreset};

use super::{
    sort_by_distance, PlacementOptions, Structure, StructurePlacement, StructureRegistry,
    StructureType,
};

/// Cache key: every input that determines a placement result.
type CacheKey = (GenerationContext, StructureType, i32);

/// Smallest range (in chunks) generated for a region query.
const MIN_COVERING_RANGE: u32 = 16;

/// Hit/miss counters of the structure cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StructureCacheStats {
    /// Queries answered from the cache.
    pub hits: u64,
    /// Queries that ran a placement strategy.
    pub misses: u64,
}

/// Applies version presets and caches placement results.
///
/// Results are cached per `(context, type, range)`, where `range` is the
/// requested range in chunks before version scaling.
#[derive(Debug)]
pub struct StructureManager {
    registry: StructureRegistry,
    cache: HashMap<CacheKey, Vec<Structure>>,
    stats: StructureCacheStats,
}

impl StructureManager {
    /// Creates a manager over a registry.
    #[must_use]
    pub fn new(registry: StructureRegistry) -> Self {
        Self {
            registry,
            cache: HashMap::new(),
            stats: StructureCacheStats::default(),
        }
    }

    /// Creates a manager with every built-in structure type.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`StructureRegistry::with_defaults`].
    pub fn with_defaults() -> GenerationResult<Self> {
        Ok(Self::new(StructureRegistry::with_defaults()?))
    }

    /// The underlying registry.
    #[must_use]
    pub const fn registry(&self) -> &StructureRegistry {
        &self.registry
    }

    /// Registers a strategy and drops cached results for its tag.
    pub fn register(&mut self, strategy: impl StructurePlacement + 'static) {
        let tag = strategy.structure_type().clone();
        self.cache.retain(|(_, cached, _), _| *cached != tag);
        self.registry.register(strategy);
    }

    /// Every structure of `tag` within `range` chunks (before version
    /// scaling) of the origin.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStructureType` for an unregistered tag and
    /// `InvalidArgument` for a negative range.
    pub fn generate(
        &mut self,
        context: GenerationContext,
        tag: &str,
        range: i32,
        biomes: &mut dyn BiomeLookup,
    ) -> GenerationResult<&[Structure]> {
        let strategy = self.registry.get(tag)?;
        if range < 0 {
            return Err(GenerationError::InvalidArgument(format!(
                "range must not be negative, got {range}"
            )));
        }

        let key = (context, strategy.structure_type().clone(), range);
        match self.cache.entry(key) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                Ok(entry.into_mut().as_slice())
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                let preset = context.version.preset();
                let options = PlacementOptions {
                    version: context.version,
                    density_factor: preset.density_factor,
                };
                let placed = strategy.generate_structures(
                    context.seed,
                    biomes,
                    preset.scale_range(range),
                    &options,
                )?;
                tracing::debug!(
                    "Generated {} {tag} structures for seed {} ({}), range {range}",
                    placed.len(),
                    context.seed,
                    context.version
                );
                Ok(entry.insert(placed).as_slice())
            }
        }
    }

    /// Structures of `tag` whose chunk lies inside `rect`.
    ///
    /// Served from any cached result whose scaled range covers the
    /// rectangle. Otherwise a covering range, rounded up to a power of two,
    /// is generated and replaces the smaller entries for that type.
    ///
    /// # Errors
    ///
    /// Same as [`StructureManager::generate`].
    pub fn generate_in_region(
        &mut self,
        context: GenerationContext,
        tag: &str,
        rect: ChunkRect,
        biomes: &mut dyn BiomeLookup,
    ) -> GenerationResult<Vec<Structure>> {
        let tag_key = self.registry.get(tag)?.structure_type().clone();
        let required = i32::try_from(rect.required_range()).map_err(|_| {
            GenerationError::InvalidArgument(format!("region too large: {rect:?}"))
        })?;
        let preset = context.version.preset();

        let cached_range = self
            .cache
            .keys()
            .filter(|(ctx, cached, range)| {
                *ctx == context && *cached == tag_key && preset.scale_range(*range) >= required
            })
            .map(|(_, _, range)| *range)
            .min();

        let range = match cached_range {
            Some(range) => range,
            None => {
                let range = covering_range(preset, required);
                self.evict_below(context, &tag_key, range);
                range
            }
        };

        Ok(self
            .generate(context, tag, range, biomes)?
            .iter()
            .filter(|s| rect.contains_block(s.x, s.z))
            .cloned()
            .collect())
    }

    /// Every registered type within `range` chunks, sorted by distance.
    ///
    /// # Errors
    ///
    /// Same as [`StructureManager::generate`].
    pub fn generate_all(
        &mut self,
        context: GenerationContext,
        range: i32,
        biomes: &mut dyn BiomeLookup,
    ) -> GenerationResult<Vec<Structure>> {
        let tags: Vec<StructureType> = self.registry.types().cloned().collect();
        let mut all = Vec::new();
        for tag in &tags {
            all.extend_from_slice(self.generate(context, tag.as_str(), range, biomes)?);
        }
        sort_by_distance(&mut all);
        Ok(all)
    }

    /// Drops entries of `(context, tag)` smaller than `range`.
    fn evict_below(&mut self, context: GenerationContext, tag: &StructureType, range: i32) {
        let before = self.cache.len();
        self.cache
            .retain(|(ctx, cached, r), _| !(*ctx == context && cached == tag && *r < range));
        let evicted = before - self.cache.len();
        if evicted > 0 {
            tracing::debug!("Evicted {evicted} {tag} results superseded by range {range}");
        }
    }

    /// Drops every cached result.
    pub fn clear(&mut self) {
        if !self.cache.is_empty() {
            tracing::debug!("Clearing {} cached structure results", self.cache.len());
        }
        self.cache.clear();
    }

    /// Number of cached `(context, type, range)` entries.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Cache counters.
    #[must_use]
    pub const fn stats(&self) -> StructureCacheStats {
        self.stats
    }
}

/// Smallest unscaled range whose scaled value reaches `required` rounded up
/// to a power of two (at least [`MIN_COVERING_RANGE`]).
fn covering_range(preset: VersionPreset, required: i32) -> i32 {
    let target = u32::try_from(required)
        .ok()
        .and_then(|r| r.max(MIN_COVERING_RANGE).checked_next_power_of_two())
        .and_then(|r| i32::try_from(r).ok())
        .unwrap_or(required);
    let mut range = (f64::from(target) / preset.range_scale).ceil() as i32;
    while preset.scale_range(range) < target {
        range = range.saturating_add(1);
    }
    range.max(0)
}
