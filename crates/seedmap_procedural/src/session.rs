//! # Map Session
//!
//! The boundary the viewport talks to.
//!
//! A session must be initialized before it answers queries. While it is not
//! ready, the user is told once through the [`Notifier`] and every query is
//! answered with a sentinel (`Biome::Unknown`, an empty structure list).
//!
//! ## Stale Responses
//!
//! Every `generate_map` call is tagged with a [`RequestToken`]. A response
//! is only applied if its token is still the latest one issued, so a slow
//! answer for an old seed can never overwrite a newer map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::cache::{CacheStats, SpatialQueryCache};
use crate::chunk::{ChunkCoord, ChunkRect};
use crate::config::{ConfigSource, GenerationConfig};
use crate::error::{GenerationError, GenerationResult};
use crate::structure::{sort_by_distance, Structure, StructureManager, StructureType};
use crate::version::GenerationContext;

/// Severity of a user notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// Informational.
    Info,
    /// An operation completed.
    Success,
    /// Degraded but working.
    Warning,
    /// An operation failed.
    Error,
}

/// A message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Short headline.
    pub title: String,
    /// Details.
    pub message: String,
}

impl Notice {
    /// Creates a notice.
    #[must_use]
    pub fn new(level: NoticeLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Delivers notices to the user.
pub trait Notifier {
    /// Shows a notice.
    fn notify(&mut self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!("{}: {}", notice.title, notice.message);
            }
            NoticeLevel::Warning => tracing::warn!("{}: {}", notice.title, notice.message),
            NoticeLevel::Error => tracing::error!("{}: {}", notice.title, notice.message),
        }
    }
}

/// Collects notices, mostly for tests.
impl Notifier for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

/// Monotonically increasing id of a map request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Raw value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Issues request tokens and remembers the latest one.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    /// Issues a token newer than every previous one.
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Returns whether `token` is the latest issued.
    #[must_use]
    pub const fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// The latest issued token, if any.
    #[must_use]
    pub const fn latest(&self) -> Option<RequestToken> {
        if self.latest == 0 {
            None
        } else {
            Some(RequestToken(self.latest))
        }
    }
}

/// Parameters of a full map request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    /// Seed text (numeric or free text).
    pub seed: String,
    /// Version text (`"1.16"` .. `"1.20"` or `"java"`).
    pub version: String,
    /// Centre of the search, block X.
    pub center_x: i32,
    /// Centre of the search, block Z.
    pub center_z: i32,
    /// Search radius in blocks.
    pub radius: u32,
    /// Types to search; empty means every registered type.
    pub structure_types: Vec<StructureType>,
    /// Whether to sample chunk biomes around the centre.
    pub show_biomes: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            seed: "0".to_string(),
            version: "1.20".to_string(),
            center_x: 0,
            center_z: 0,
            radius: 5000,
            structure_types: Vec::new(),
            show_biomes: true,
        }
    }
}

/// A generated map.
#[derive(Clone, Debug, PartialEq)]
pub struct MapResult {
    /// Context the map was generated for.
    pub context: GenerationContext,
    /// Structures sorted by distance from the origin.
    pub structures: Vec<Structure>,
    /// Chunk biomes around the centre (empty unless requested).
    pub biomes: BTreeMap<ChunkCoord, Biome>,
}

/// A map tagged with the request that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct MapResponse {
    /// Request the map answers.
    pub token: RequestToken,
    /// The map.
    pub result: MapResult,
}

/// Readiness of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// `initialize` has not been called.
    Uninitialized,
    /// Queries are answered.
    Ready,
    /// Initialization failed.
    NotReady,
}

/// Query front end with readiness tracking and request tokens.
#[derive(Debug)]
pub struct MapSession<N: Notifier = TracingNotifier> {
    state: SessionState,
    notifier: N,
    notified: bool,
    config: GenerationConfig,
    cache: Option<SpatialQueryCache>,
    requests: RequestTracker,
}

impl<N: Notifier> MapSession<N> {
    /// Creates an uninitialized session.
    #[must_use]
    pub fn new(notifier: N) -> Self {
        Self {
            state: SessionState::Uninitialized,
            notifier,
            notified: false,
            config: GenerationConfig::default(),
            cache: None,
            requests: RequestTracker::default(),
        }
    }

    /// Loads configuration and builds the generation backend.
    ///
    /// # Errors
    ///
    /// Returns the load failure; the session is then `NotReady` and the
    /// user has been notified once.
    pub fn initialize(&mut self, source: ConfigSource) -> GenerationResult<()> {
        let built = source.load().and_then(|config| {
            let manager = StructureManager::with_defaults()?;
            Ok((config, manager))
        });

        match built {
            Ok((config, manager)) => {
                tracing::info!(
                    "Map session ready ({} structure types, biome cache {})",
                    manager.registry().len(),
                    config.biome_cache_capacity
                );
                self.cache = Some(SpatialQueryCache::from_config(
                    GenerationContext::default(),
                    manager,
                    &config,
                ));
                self.config = config;
                self.state = SessionState::Ready;
                self.notified = false;
                Ok(())
            }
            Err(error) => {
                tracing::error!("Map session initialization failed: {error}");
                self.cache = None;
                self.state = SessionState::NotReady;
                self.notify_not_ready(&error.to_string());
                Err(error)
            }
        }
    }

    /// Readiness.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Returns whether queries are answered.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready)
    }

    /// Fails unless queries are answered by a live backend.
    ///
    /// Queries themselves never fail for this reason; they return
    /// sentinels instead.
    ///
    /// # Errors
    ///
    /// Returns `BackendNotReady` before a successful `initialize`.
    pub fn ensure_ready(&self) -> GenerationResult<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(GenerationError::BackendNotReady)
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// The notifier.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Cache counters, if the backend is up.
    #[must_use]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(SpatialQueryCache::stats)
    }

    /// Biome at a block position, or `Biome::Unknown` when not ready.
    pub fn get_biome_at(&mut self, context: GenerationContext, x: i32, z: i32) -> Biome {
        match self.backend(context) {
            Some(cache) => cache.biome_at(x, z),
            None => Biome::Unknown,
        }
    }

    /// Structures of `tag` within `radius` blocks of the centre, sorted by
    /// distance from the origin. Empty when not ready.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStructureType` for an unregistered tag, ready or not.
    pub fn find_structures(
        &mut self,
        context: GenerationContext,
        tag: &str,
        center_x: i32,
        center_z: i32,
        radius: u32,
    ) -> GenerationResult<Vec<Structure>> {
        match self.backend(context) {
            Some(cache) => cache.find_structures(tag, center_x, center_z, radius),
            None if is_builtin(tag) => Ok(Vec::new()),
            None => Err(GenerationError::UnknownStructureType(tag.to_string())),
        }
    }

    /// Every registered structure within `default_range_chunks` of the
    /// origin, sorted by distance. Empty when not ready.
    ///
    /// # Errors
    ///
    /// Propagates placement errors.
    pub fn all_structures(
        &mut self,
        context: GenerationContext,
    ) -> GenerationResult<Vec<Structure>> {
        let range = self.config.default_range_chunks;
        match self.backend(context) {
            Some(cache) => cache.all_structures(range),
            None => Ok(Vec::new()),
        }
    }

    /// Generates structures (and optionally biomes) for a whole map view.
    ///
    /// When not ready the map is empty and every biome sample is
    /// `Biome::Unknown`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unknown version or an oversized
    /// radius and `UnknownStructureType` for an unregistered tag.
    pub fn generate_map(&mut self, options: &MapOptions) -> GenerationResult<MapResponse> {
        let token = self.requests.issue();
        let context = GenerationContext::parse(&options.seed, &options.version)?;
        let center = ChunkCoord::from_block_pos(options.center_x, options.center_z);
        let sample_radius = (options.radius / 16).min(self.config.biome_sample_radius_chunks);

        let Some(cache) = self.backend(context) else {
            if let Some(tag) = options.structure_types.iter().find(|t| !is_builtin(t.as_str())) {
                return Err(GenerationError::UnknownStructureType(tag.to_string()));
            }
            let biomes = if options.show_biomes {
                ChunkRect::around(center, sample_radius)
                    .iter()
                    .map(|coord| (coord, Biome::Unknown))
                    .collect()
            } else {
                BTreeMap::new()
            };
            return Ok(MapResponse {
                token,
                result: MapResult {
                    context,
                    structures: Vec::new(),
                    biomes,
                },
            });
        };

        let tags: Vec<StructureType> = if options.structure_types.is_empty() {
            cache.structure_types().cloned().collect()
        } else {
            options.structure_types.clone()
        };

        let mut structures = Vec::new();
        for tag in &tags {
            structures.extend(cache.find_structures(
                tag.as_str(),
                options.center_x,
                options.center_z,
                options.radius,
            )?);
        }
        sort_by_distance(&mut structures);

        let biomes = if options.show_biomes {
            cache.biome_samples(center, sample_radius)
        } else {
            BTreeMap::new()
        };

        self.notifier.notify(Notice::new(
            NoticeLevel::Success,
            "Map generated",
            format!(
                "Found {} structures for seed {}",
                structures.len(),
                options.seed
            ),
        ));

        Ok(MapResponse {
            token,
            result: MapResult {
                context,
                structures,
                biomes,
            },
        })
    }

    /// Applies a response only if it answers the latest request.
    pub fn accept(&self, response: MapResponse) -> Option<MapResult> {
        if self.requests.is_current(response.token) {
            Some(response.result)
        } else {
            tracing::debug!(
                "Discarding stale map response {} (latest {:?})",
                response.token.value(),
                self.requests.latest().map(RequestToken::value)
            );
            None
        }
    }

    /// The backend switched to `context`, or `None` (after notifying once)
    /// when not ready.
    fn backend(&mut self, context: GenerationContext) -> Option<&mut SpatialQueryCache> {
        if self.cache.is_none() {
            let reason = match self.state {
                SessionState::Uninitialized => "the generator has not been initialized",
                _ => "the generator failed to initialize",
            };
            self.notify_not_ready(reason);
            return None;
        }
        let cache = self.cache.as_mut()?;
        cache.set_context(context);
        Some(cache)
    }

    fn notify_not_ready(&mut self, reason: &str) {
        if self.notified {
            return;
        }
        self.notified = true;
        self.notifier.notify(Notice::new(
            NoticeLevel::Error,
            "Map generator unavailable",
            reason,
        ));
    }
}

fn is_builtin(tag: &str) -> bool {
    StructureType::BUILTIN.iter().any(|t| t.as_str() == tag)
}

impl Default for MapSession<TracingNotifier> {
    fn default() -> Self {
        Self::new(TracingNotifier)
    }
}
