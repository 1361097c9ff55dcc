//! Square-grid world used by tests and simple embedders.

use std::collections::HashSet;

use super::world::{TileData, WorldOracle};
use crate::state::{Position, TileIndex};

/// Rectangular grid of tiles with 8-way adjacency.
///
/// Tile `(x, y)` has index `y * width + x` and its centre at `(x, y)` in
/// world space, at the tile's elevation.
#[derive(Clone, Debug, PartialEq)]
pub struct GridWorld {
    width: u32,
    height: u32,
    tiles: Vec<TileData>,
}

impl GridWorld {
    /// Creates a grid where every tile is `fill`.
    pub fn new(width: u32, height: u32, fill: TileData) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn index(&self, x: u32, y: u32) -> TileIndex {
        TileIndex(y * self.width + x)
    }

    pub fn coords(&self, tile: TileIndex) -> Option<(u32, u32)> {
        if tile.0 >= self.width * self.height {
            return None;
        }
        Some((tile.0 % self.width, tile.0 / self.width))
    }

    /// Replaces the tile at `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, tile: TileData) {
        let index = self.index(x, y).0 as usize;
        if let Some(slot) = self.tiles.get_mut(index) {
            *slot = tile;
        }
    }

    /// Builder-style variant of [`GridWorld::set`].
    pub fn with_tile(mut self, x: u32, y: u32, tile: TileData) -> Self {
        self.set(x, y, tile);
        self
    }

    fn chebyshev(&self, a: TileIndex, b: TileIndex) -> Option<u32> {
        let (ax, ay) = self.coords(a)?;
        let (bx, by) = self.coords(b)?;
        Some(ax.abs_diff(bx).max(ay.abs_diff(by)))
    }
}

impl WorldOracle for GridWorld {
    fn tile(&self, tile: TileIndex) -> Option<TileData> {
        self.tiles.get(tile.0 as usize).copied()
    }

    fn neighbors(&self, tile: TileIndex) -> Vec<TileIndex> {
        let Some((x, y)) = self.coords(tile) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(8);
        for dy in -1i64..=1 {
            for dx in -1i64..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx >= 0 && ny >= 0 && nx < self.width as i64 && ny < self.height as i64 {
                    out.push(self.index(nx as u32, ny as u32));
                }
            }
        }
        out
    }

    fn tile_center(&self, tile: TileIndex) -> Option<Position> {
        let (x, y) = self.coords(tile)?;
        let data = self.tile(tile)?;
        Some(Position::new(x as f32, y as f32, data.elevation))
    }

    fn tile_at(&self, position: Position) -> Option<TileIndex> {
        let x = position.x.round();
        let y = position.y.round();
        if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
            return None;
        }
        Some(self.index(x as u32, y as u32))
    }

    /// Greedy walk through passable tiles, always stepping to the neighbour
    /// closest to the goal. Good enough for open test maps.
    fn find_path(&self, from: TileIndex, to: TileIndex) -> Option<Vec<TileIndex>> {
        self.tile(to).filter(|tile| tile.is_passable)?;
        let mut path = vec![from];
        let mut visited = HashSet::from([from]);
        let mut current = from;
        while current != to {
            let next = self
                .neighbors(current)
                .into_iter()
                .filter(|n| !visited.contains(n))
                .filter(|n| self.tile(*n).is_some_and(|t| t.is_passable))
                .min_by_key(|n| self.chebyshev(*n, to).unwrap_or(u32::MAX))?;
            visited.insert(next);
            path.push(next);
            current = next;
        }
        Some(path)
    }
}
