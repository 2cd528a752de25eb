//! # Chunk Coordinates
//!
//! The map is organized into 16x16-block chunks:
//! - Structure placement works on chunk grids
//! - Biome previews sample one block per chunk
//! - Viewport regions are expressed as inclusive chunk rectangles

use serde::{Deserialize, Serialize};

/// Chunk width/depth in blocks.
pub const CHUNK_SIZE: i32 = 16;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts world block coordinates to chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE),
            z: block_z.div_euclid(CHUNK_SIZE),
        }
    }

    /// Returns the world X coordinate of the chunk's origin (corner).
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i32 {
        self.x.saturating_mul(CHUNK_SIZE)
    }

    /// Returns the world Z coordinate of the chunk's origin.
    #[inline]
    #[must_use]
    pub const fn world_z(self) -> i32 {
        self.z.saturating_mul(CHUNK_SIZE)
    }

    /// Block at the centre of the chunk, used for biome previews.
    #[inline]
    #[must_use]
    pub const fn center_block(self) -> (i32, i32) {
        (
            self.world_x().saturating_add(CHUNK_SIZE / 2),
            self.world_z().saturating_add(CHUNK_SIZE / 2),
        )
    }

    /// Chebyshev distance to another chunk.
    #[inline]
    #[must_use]
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dz = self.z.abs_diff(other.z);
        if dx > dz {
            dx
        } else {
            dz
        }
    }
}

/// Inclusive rectangle of chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkRect {
    /// Lowest corner (inclusive).
    pub min: ChunkCoord,
    /// Highest corner (inclusive).
    pub max: ChunkCoord,
}

impl ChunkRect {
    /// Creates a rectangle from two corners in any order.
    #[must_use]
    pub fn new(a: ChunkCoord, b: ChunkCoord) -> Self {
        Self {
            min: ChunkCoord::new(a.x.min(b.x), a.z.min(b.z)),
            max: ChunkCoord::new(a.x.max(b.x), a.z.max(b.z)),
        }
    }

    /// Square of chunks around `center` reaching `radius` chunks out.
    #[must_use]
    pub fn around(center: ChunkCoord, radius: u32) -> Self {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        Self {
            min: ChunkCoord::new(center.x.saturating_sub(r), center.z.saturating_sub(r)),
            max: ChunkCoord::new(center.x.saturating_add(r), center.z.saturating_add(r)),
        }
    }

    /// Smallest rectangle holding every block of a circle.
    #[must_use]
    pub fn from_block_circle(center_x: i32, center_z: i32, radius: u32) -> Self {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        Self {
            min: ChunkCoord::from_block_pos(center_x.saturating_sub(r), center_z.saturating_sub(r)),
            max: ChunkCoord::from_block_pos(center_x.saturating_add(r), center_z.saturating_add(r)),
        }
    }

    /// Returns whether the chunk lies inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(&self, coord: ChunkCoord) -> bool {
        coord.x >= self.min.x
            && coord.x <= self.max.x
            && coord.z >= self.min.z
            && coord.z <= self.max.z
    }

    /// Returns whether the block lies inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains_block(&self, x: i32, z: i32) -> bool {
        self.contains(ChunkCoord::from_block_pos(x, z))
    }

    /// Smallest origin-centred chunk range that covers the rectangle.
    #[must_use]
    pub fn required_range(&self) -> u32 {
        [self.min.x, self.max.x, self.min.z, self.max.z]
            .into_iter()
            .map(i32::unsigned_abs)
            .max()
            .unwrap_or(0)
    }

    /// Iterates every chunk, row by row.
    pub fn iter(&self) -> impl Iterator<Item = ChunkCoord> {
        let (min, max) = (self.min, self.max);
        (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| ChunkCoord::new(x, z)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_coord_from_block() {
        assert_eq!(ChunkCoord::from_block_pos(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(15, 15), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(16, 16), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_block_pos(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_pos(-16, -17), ChunkCoord::new(-1, -2));
    }

    #[test]
    fn test_center_block() {
        assert_eq!(ChunkCoord::new(0, 0).center_block(), (8, 8));
        assert_eq!(ChunkCoord::new(-2, 3).center_block(), (-24, 56));
    }

    #[test]
    fn test_rect_from_circle() {
        let rect = ChunkRect::from_block_circle(128, -64, 100);
        assert_eq!(rect.min, ChunkCoord::new(1, -11));
        assert_eq!(rect.max, ChunkCoord::new(14, 2));
        assert!(rect.contains_block(128, -64));
        assert!(!rect.contains_block(240, 0));
        assert_eq!(rect.required_range(), 14);
    }

    #[test]
    fn test_rect_normalizes_corners() {
        let rect = ChunkRect::new(ChunkCoord::new(3, -1), ChunkCoord::new(-2, 4));
        assert_eq!(rect.min, ChunkCoord::new(-2, -1));
        assert_eq!(rect.max, ChunkCoord::new(3, 4));
        assert_eq!(rect.iter().count(), 36);
    }

    #[test]
    fn test_around() {
        let rect = ChunkRect::around(ChunkCoord::new(0, 0), 2);
        assert_eq!(rect.iter().count(), 25);
        assert!(rect.iter().all(|c| c.chebyshev_distance(ChunkCoord::new(0, 0)) <= 2));
    }
}
