//! # Placement and Cache Properties
//!
//! Seeded-random property checks over many seeds and query shapes.
//! Inputs come from `ChaCha8Rng`, so failures reproduce exactly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use seedmap_procedural::{
    Biome, BiomeField, ChunkCoord, ConfigSource, GameVersion, GenerationContext, MapSession,
    SpatialQueryCache, StructureManager, StructureType, WorldSeed,
};

fn session() -> MapSession<Vec<seedmap_procedural::Notice>> {
    let mut session = MapSession::new(Vec::new());
    session.initialize(ConfigSource::Default).unwrap();
    session
}

/// Test: Biome lookup is a pure function of (seed, x, z), whatever the cache size.
#[test]
fn test_biome_lookup_is_pure() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xB10E);

    for _ in 0..8 {
        let ctx = GenerationContext::new(WorldSeed::new(rng.gen()), GameVersion::V1_20);
        let mut tiny = BiomeField::new(ctx, 1);
        let mut large = BiomeField::new(ctx, 100_000);

        for _ in 0..500 {
            let x = rng.gen_range(-30_000..30_000);
            let z = rng.gen_range(-30_000..30_000);
            assert_eq!(tiny.biome_at(x, z), large.biome_at(x, z), "({x}, {z})");
        }
        assert_eq!(tiny.cached_len(), 1);
    }
}

/// Test: Every biome the classifier knows shows up somewhere.
#[test]
fn test_biome_variety() {
    let ctx = GenerationContext::new(WorldSeed::new(1234), GameVersion::V1_20);
    let mut field = BiomeField::new(ctx, 1);
    let mut seen = std::collections::HashSet::new();

    for z in (-6400..6400).step_by(64) {
        for x in (-6400..6400).step_by(64) {
            seen.insert(field.biome_at(x, z));
        }
    }

    println!("Distinct biomes: {}", seen.len());
    assert!(!seen.contains(&Biome::Unknown));
    for biome in [Biome::Plains, Biome::Ocean, Biome::Forest, Biome::Desert, Biome::Jungle] {
        assert!(seen.contains(&biome), "missing {biome}");
    }
}

/// Test: Neighbouring grid candidates keep their separation.
#[test]
fn test_village_separation() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..4 {
        let ctx = GenerationContext::new(WorldSeed::new(rng.gen()), GameVersion::V1_18);
        let mut field = BiomeField::new(ctx, 10_000);
        let mut manager = StructureManager::with_defaults().unwrap();
        let villages = manager.generate(ctx, "village", 160, &mut field).unwrap();

        for (i, a) in villages.iter().enumerate() {
            for b in &villages[i + 1..] {
                let ca = ChunkCoord::from_block_pos(a.x, a.z);
                let cb = ChunkCoord::from_block_pos(b.x, b.z);
                assert!(ca.chebyshev_distance(cb) > 8, "{ca:?} too close to {cb:?}");
            }
        }
    }
}

/// Test: Placement is deterministic for a fixed (seed, version, type, region).
#[test]
fn test_placement_determinism() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for tag in StructureType::BUILTIN {
        let seed = WorldSeed::new(rng.gen());
        let version = GameVersion::ALL[rng.gen_range(0..GameVersion::ALL.len())];
        let ctx = GenerationContext::new(seed, version);
        let x = rng.gen_range(-5000..5000);
        let z = rng.gen_range(-5000..5000);

        let first = session().find_structures(ctx, tag.as_str(), x, z, 2500).unwrap();
        let second = session().find_structures(ctx, tag.as_str(), x, z, 2500).unwrap();
        assert_eq!(first, second, "{tag} differs between runs");
    }
}

/// Test: Older versions only ever see a subset of the newer villages.
#[test]
fn test_density_presets_nest() {
    let seed = WorldSeed::new(2024);
    let mut session = session();

    let old = session
        .find_structures(GenerationContext::new(seed, GameVersion::V1_16), "village", 0, 0, 3000)
        .unwrap();
    let new = session
        .find_structures(GenerationContext::new(seed, GameVersion::V1_20), "village", 0, 0, 3000)
        .unwrap();

    println!("1.16: {} villages, 1.20: {} villages", old.len(), new.len());
    assert!(old.len() <= new.len());
    for village in &old {
        assert!(
            new.iter().any(|v| v.x == village.x && v.z == village.z),
            "village at ({}, {}) vanished in 1.20",
            village.x,
            village.z
        );
    }
}

/// Test: Strongholds always form a full ring.
#[test]
fn test_strongholds_ring() {
    let mut session = session();
    let ctx = GenerationContext::new(WorldSeed::new(-31), GameVersion::V1_19);
    let found = session.find_structures(ctx, "stronghold", 0, 0, 2000).unwrap();
    assert_eq!(found.len(), 8);
}

/// Test: No answer for the old seed survives a context change.
#[test]
fn test_cache_correct_after_seed_change() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xCAFE);
    let version = GameVersion::V1_20;
    let mut shared = SpatialQueryCache::new(
        GenerationContext::new(WorldSeed::new(0), version),
        StructureManager::with_defaults().unwrap(),
        2048,
    );

    for _ in 0..6 {
        let ctx = GenerationContext::new(WorldSeed::new(rng.gen_range(-1000..1000)), version);
        let x = rng.gen_range(-3000..3000);
        let z = rng.gen_range(-3000..3000);

        shared.set_context(ctx);
        let manager = StructureManager::with_defaults().unwrap();
        let mut fresh = SpatialQueryCache::new(ctx, manager, 2048);

        assert_eq!(shared.biome_at(x, z), fresh.biome_at(x, z));
        assert_eq!(
            shared.find_structures("temple", x, z, 1500).unwrap(),
            fresh.find_structures("temple", x, z, 1500).unwrap()
        );
        assert_eq!(
            shared.chunk_biome(ChunkCoord::new(3, 3)),
            fresh.chunk_biome(ChunkCoord::new(3, 3))
        );
    }
}

/// Test: Sub-region answers equal filtered whole-circle answers.
#[test]
fn test_find_within_radius_only() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut session = session();
    let ctx = GenerationContext::new(WorldSeed::new(77), GameVersion::V1_20);

    let everything = session.find_structures(ctx, "ruined_portal", 0, 0, 6000).unwrap();

    for _ in 0..10 {
        let x = rng.gen_range(-2000..2000);
        let z = rng.gen_range(-2000..2000);
        let radius: u32 = rng.gen_range(100..2000);
        let limit = f64::from(radius).powi(2);

        let local = session.find_structures(ctx, "ruined_portal", x, z, radius).unwrap();
        let expected: Vec<_> = everything
            .iter()
            .filter(|s| s.distance_squared_to(f64::from(x), f64::from(z)) <= limit)
            .cloned()
            .collect();
        assert_eq!(local, expected);
    }
}
