//! Walkability grid.
//!
//! The core does not decode map images; it consumes a pre-classified grid of
//! walkable/blocked cells from the map loader. Out-of-bounds queries are
//! treated as blocked, never as errors.

use glam::Vec2;

use crate::constants::TILE_SIZE;
use crate::geometry::Rect;

pub struct Grid {
    pub width: usize,
    pub height: usize,
    walkable: Vec<bool>,
}

impl Grid {
    /// Build a grid from per-cell walkability rows (row-major, `rows[y][x]`).
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut walkable = Vec::with_capacity(width * height);
        for row in &rows {
            debug_assert_eq!(row.len(), width, "ragged grid rows");
            walkable.extend_from_slice(row);
        }
        Self {
            width,
            height,
            walkable,
        }
    }

    /// Parse a grid from text lines where '1' marks a wall and any other
    /// character marks floor. Matches the map loader's cell classification.
    pub fn from_layout<S: AsRef<str>>(layout: &[S]) -> Self {
        Self::from_rows(
            layout
                .iter()
                .map(|line| line.as_ref().chars().map(|c| c != '1').collect())
                .collect(),
        )
    }

    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.walkable[y as usize * self.width + x as usize]
    }

    /// World-space rectangles for every blocked cell. Consumed by projectile
    /// collision and line-of-sight tests.
    pub fn wall_rects(&self) -> Vec<Rect> {
        let mut rects = Vec::new();
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if !self.walkable[y as usize * self.width + x as usize] {
                    rects.push(Rect::new(
                        x as f32 * TILE_SIZE,
                        y as f32 * TILE_SIZE,
                        TILE_SIZE,
                        TILE_SIZE,
                    ));
                }
            }
        }
        rects
    }
}

/// Convert a world-space point to its containing tile.
pub fn world_to_tile(point: Vec2) -> (i32, i32) {
    (
        (point.x / TILE_SIZE).floor() as i32,
        (point.y / TILE_SIZE).floor() as i32,
    )
}

/// World-space center of a tile.
pub fn tile_center(tile: (i32, i32)) -> Vec2 {
    Vec2::new(
        tile.0 as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        tile.1 as f32 * TILE_SIZE + TILE_SIZE / 2.0,
    )
}
