//! # SEEDMAP Procedural Generation
//!
//! Deterministic biome and structure maps from a world seed.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and version always produce the same map
//! 2. **Explicit context**: Every query carries its `GenerationContext`
//! 3. **Cached**: Repeated viewport queries never recompute
//! 4. **Pluggable**: Placement strategies are registered by tag
//!
//! ## Core Components
//!
//! - `JavaRandom`: 48-bit LCG random source
//! - `BiomeField`: value-noise climate plus biome classification
//! - `StructureManager`: version-aware placement over a `StructureRegistry`
//! - `SpatialQueryCache`: memoized biome and structure queries
//! - `MapSession`: readiness, notifications and request tokens
//!
//! ## Example
//!
//! ```rust,ignore
//! use seedmap_procedural::{ConfigSource, GenerationContext, MapSession};
//!
//! let mut session = MapSession::default();
//! session.initialize(ConfigSource::Default)?;
//!
//! let ctx = GenerationContext::parse("1234", "1.20")?;
//! let biome = session.get_biome_at(ctx, 0, 0);
//! let villages = session.find_structures(ctx, "village", 0, 0, 4000)?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod cache;
pub mod chunk;
pub mod config;
pub mod error;
pub mod noise;
pub mod random;
pub mod seed;
pub mod session;
pub mod structure;
pub mod version;

pub use biome::{Biome, BiomeField, BiomeFieldStats, BiomeLookup};
pub use cache::{CacheStats, SpatialQueryCache};
pub use chunk::{ChunkCoord, ChunkRect, CHUNK_SIZE};
pub use config::{ConfigSource, GenerationConfig};
pub use error::{GenerationError, GenerationResult};
pub use noise::{ClimateSample, ClimateSource, NoiseChannel, ValueNoiseClimate};
pub use random::JavaRandom;
pub use seed::WorldSeed;
pub use session::{
    MapOptions, MapResponse, MapResult, MapSession, Notice, NoticeLevel, Notifier, RequestToken,
    RequestTracker, SessionState, TracingNotifier,
};
pub use structure::{
    BiomeRule, GridPlacement, PlacementOptions, RingPlacement, ScatterPlacement, Structure,
    StructureManager, StructurePlacement, StructureRegistry, StructureType,
};
pub use version::{GameVersion, GenerationContext, VersionPreset};
