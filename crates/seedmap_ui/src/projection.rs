//! Screen and world coordinate mapping.
//!
//! At zoom 1.0 one screen pixel covers one chunk (16 blocks). The canvas
//! centre shows the world origin shifted by the pan offset.

use serde::{Deserialize, Serialize};

/// Blocks covered by one screen pixel at zoom 1.0.
pub const BLOCKS_PER_PIXEL: f64 = 16.0;

/// A point in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal position, growing right.
    pub x: f64,
    /// Vertical position, growing down.
    pub y: f64,
}

impl ScreenPoint {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in world blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Block X.
    pub x: f64,
    /// Block Z.
    pub z: f64,
}

impl WorldPoint {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// The block containing this point.
    #[must_use]
    pub fn to_block(self) -> (i32, i32) {
        (self.x.floor() as i32, self.z.floor() as i32)
    }
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl CanvasSize {
    /// Creates a canvas size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the centre point.
    #[must_use]
    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Visible world area in blocks. Both edges are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewBounds {
    /// Western edge.
    pub min_x: i32,
    /// Northern edge.
    pub min_z: i32,
    /// Eastern edge.
    pub max_x: i32,
    /// Southern edge.
    pub max_z: i32,
}

impl ViewBounds {
    /// Returns the width in blocks.
    #[must_use]
    pub fn width(&self) -> i64 {
        i64::from(self.max_x) - i64::from(self.min_x)
    }

    /// Returns the height in blocks.
    #[must_use]
    pub fn height(&self) -> i64 {
        i64::from(self.max_z) - i64::from(self.min_z)
    }

    /// Returns true if the block lies inside the bounds.
    #[must_use]
    pub fn contains(&self, x: i32, z: i32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_z..=self.max_z).contains(&z)
    }

    /// Smallest circle around the centre block that holds every corner.
    #[must_use]
    pub fn covering_circle(&self) -> SearchCircle {
        let center_x = (i64::from(self.min_x) + i64::from(self.max_x)).div_euclid(2);
        let center_z = (i64::from(self.min_z) + i64::from(self.max_z)).div_euclid(2);
        let reach_x = (i64::from(self.max_x) - center_x).max(center_x - i64::from(self.min_x));
        let reach_z = (i64::from(self.max_z) - center_z).max(center_z - i64::from(self.min_z));
        SearchCircle {
            center_x: center_x as i32,
            center_z: center_z as i32,
            radius: (reach_x as f64).hypot(reach_z as f64).ceil() as u32,
        }
    }
}

/// A circular structure query, in blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCircle {
    /// Centre block X.
    pub center_x: i32,
    /// Centre block Z.
    pub center_z: i32,
    /// Radius in blocks.
    pub radius: u32,
}

/// Canvas size, pan offset and zoom: everything needed to map coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Canvas dimensions.
    pub canvas: CanvasSize,
    /// Pan offset in pixels.
    pub offset: ScreenPoint,
    /// Zoom factor.
    pub zoom: f64,
}

impl Projection {
    /// Creates a projection.
    #[must_use]
    pub const fn new(canvas: CanvasSize, offset: ScreenPoint, zoom: f64) -> Self {
        Self {
            canvas,
            offset,
            zoom,
        }
    }

    /// Blocks covered by `pixels` screen pixels.
    #[inline]
    #[must_use]
    pub fn pixels_to_blocks(&self, pixels: f64) -> f64 {
        pixels * BLOCKS_PER_PIXEL / self.zoom
    }

    /// Maps a screen point to world blocks.
    #[must_use]
    pub fn screen_to_world(&self, screen: ScreenPoint) -> WorldPoint {
        let center = self.canvas.center();
        WorldPoint::new(
            self.pixels_to_blocks(screen.x - center.x - self.offset.x),
            self.pixels_to_blocks(screen.y - center.y - self.offset.y),
        )
    }

    /// Maps world blocks to a screen point.
    #[must_use]
    pub fn world_to_screen(&self, world: WorldPoint) -> ScreenPoint {
        let center = self.canvas.center();
        ScreenPoint::new(
            center.x + self.offset.x + world.x * self.zoom / BLOCKS_PER_PIXEL,
            center.y + self.offset.y + world.z * self.zoom / BLOCKS_PER_PIXEL,
        )
    }

    /// World area covered by the whole canvas, rounded outwards.
    #[must_use]
    pub fn view_bounds(&self) -> ViewBounds {
        let top_left = self.screen_to_world(ScreenPoint::ZERO);
        let bottom_right =
            self.screen_to_world(ScreenPoint::new(self.canvas.width, self.canvas.height));
        ViewBounds {
            min_x: top_left.x.floor() as i32,
            min_z: top_left.z.floor() as i32,
            max_x: bottom_right.x.ceil() as i32,
            max_z: bottom_right.z.ceil() as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(offset: ScreenPoint, zoom: f64) -> Projection {
        Projection::new(CanvasSize::new(800.0, 600.0), offset, zoom)
    }

    #[test]
    fn test_canvas_center_is_origin() {
        let p = projection(ScreenPoint::ZERO, 1.0);
        assert_eq!(p.screen_to_world(ScreenPoint::new(400.0, 300.0)), WorldPoint::new(0.0, 0.0));
        assert_eq!(p.world_to_screen(WorldPoint::new(0.0, 0.0)), ScreenPoint::new(400.0, 300.0));
    }

    #[test]
    fn test_one_pixel_is_one_chunk() {
        let p = projection(ScreenPoint::ZERO, 1.0);
        assert_eq!(p.screen_to_world(ScreenPoint::new(401.0, 299.0)), WorldPoint::new(16.0, -16.0));

        let zoomed = projection(ScreenPoint::ZERO, 2.0);
        assert_eq!(
            zoomed.screen_to_world(ScreenPoint::new(401.0, 300.0)),
            WorldPoint::new(8.0, 0.0)
        );
    }

    #[test]
    fn test_offset_shifts_world() {
        let p = projection(ScreenPoint::new(10.0, -5.0), 1.0);
        assert_eq!(p.screen_to_world(ScreenPoint::new(410.0, 295.0)), WorldPoint::new(0.0, 0.0));
    }

    #[test]
    fn test_view_bounds() {
        let bounds = projection(ScreenPoint::ZERO, 1.0).view_bounds();
        assert_eq!(
            bounds,
            ViewBounds {
                min_x: -6400,
                min_z: -4800,
                max_x: 6400,
                max_z: 4800
            }
        );
        assert_eq!(bounds.width(), 12_800);
        assert_eq!(
            bounds.covering_circle(),
            SearchCircle {
                center_x: 0,
                center_z: 0,
                radius: 8000
            }
        );
        assert!(bounds.contains(6400, -4800));
        assert!(!bounds.contains(6401, 0));
    }

    #[test]
    fn test_covering_circle_holds_corners() {
        let bounds = ViewBounds {
            min_x: -5,
            min_z: 10,
            max_x: 20,
            max_z: 13,
        };
        let circle = bounds.covering_circle();
        assert_eq!((circle.center_x, circle.center_z), (7, 11));
        for (x, z) in [(-5, 10), (20, 10), (-5, 13), (20, 13)] {
            let dx = f64::from(x - circle.center_x);
            let dz = f64::from(z - circle.center_z);
            assert!(dx.hypot(dz) <= f64::from(circle.radius));
        }
    }

    #[test]
    fn test_to_block_floors() {
        assert_eq!(WorldPoint::new(-0.5, 15.9).to_block(), (-1, 15));
    }
}
