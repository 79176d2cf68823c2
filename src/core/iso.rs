//! Isometric grid transforms.
//!
//! Tile `(x, y)` is drawn as a diamond centered at
//! `((x - y) * w/2, (x + y) * h/2)`. Chunks are square blocks of tiles in grid
//! space, so a chunk looks like a large diamond on screen.

use crate::config::settings::WorldConfig;
use crate::domain::model::{ChunkCoord, ScreenPoint, TileCoord};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoGrid {
    pub tile_width: f64,
    pub tile_height: f64,
    pub chunk_size: i64,
}

impl IsoGrid {
    pub fn new(tile_width: f64, tile_height: f64, chunk_size: i64) -> Self {
        Self {
            tile_width,
            tile_height,
            chunk_size,
        }
    }

    pub fn from_world(world: &WorldConfig) -> Self {
        Self::new(world.tile_width, world.tile_height, world.chunk_size)
    }

    pub fn iso_to_screen(&self, tile: TileCoord) -> ScreenPoint {
        ScreenPoint::new(
            (tile.x as f64 - tile.y as f64) * (self.tile_width / 2.0),
            (tile.x as f64 + tile.y as f64) * (self.tile_height / 2.0),
        )
    }

    /// The tile whose center is nearest to `point` along both grid axes.
    pub fn screen_to_tile(&self, point: ScreenPoint) -> TileCoord {
        let u = point.x / (self.tile_width / 2.0);
        let v = point.y / (self.tile_height / 2.0);
        TileCoord::new(((u + v) / 2.0).round() as i64, ((v - u) / 2.0).round() as i64)
    }

    pub fn tile_to_chunk(&self, tile: TileCoord) -> ChunkCoord {
        ChunkCoord::new(
            tile.x.div_euclid(self.chunk_size),
            tile.y.div_euclid(self.chunk_size),
        )
    }

    pub fn screen_to_chunk(&self, point: ScreenPoint) -> ChunkCoord {
        self.tile_to_chunk(self.screen_to_tile(point))
    }

    pub fn chunk_origin(&self, chunk: ChunkCoord) -> TileCoord {
        TileCoord::new(chunk.x * self.chunk_size, chunk.y * self.chunk_size)
    }

    /// Tiles of a chunk, x-major then y, the order generation consumes randomness in.
    pub fn chunk_tiles(&self, chunk: ChunkCoord) -> impl Iterator<Item = TileCoord> {
        let origin = self.chunk_origin(chunk);
        let size = self.chunk_size;
        (0..size).flat_map(move |dx| (0..size).map(move |dy| TileCoord::new(origin.x + dx, origin.y + dy)))
    }
}

impl Default for IsoGrid {
    fn default() -> Self {
        Self::from_world(&WorldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_to_screen() {
        let grid = IsoGrid::default();
        assert_eq!(grid.iso_to_screen(TileCoord::new(0, 0)), ScreenPoint::new(0.0, 0.0));
        assert_eq!(grid.iso_to_screen(TileCoord::new(1, 0)), ScreenPoint::new(64.0, 32.0));
        assert_eq!(grid.iso_to_screen(TileCoord::new(0, 1)), ScreenPoint::new(-64.0, 32.0));
        assert_eq!(grid.iso_to_screen(TileCoord::new(3, 5)), ScreenPoint::new(-128.0, 256.0));
    }

    #[test]
    fn test_iso_to_screen_extreme_tiles() {
        let grid = IsoGrid::default();
        let point = grid.iso_to_screen(TileCoord::new(i64::MAX, i64::MAX));
        assert_eq!(point.x, 0.0);
        assert!(point.y.is_finite() && point.y > 0.0);
        let point = grid.iso_to_screen(TileCoord::new(i64::MIN, i64::MAX));
        assert!(point.x < 0.0);
    }

    #[test]
    fn test_screen_to_tile_inverts_tile_centers() {
        let grid = IsoGrid::default();
        for x in -20..20 {
            for y in -20..20 {
                let tile = TileCoord::new(x, y);
                assert_eq!(grid.screen_to_tile(grid.iso_to_screen(tile)), tile);
            }
        }
    }

    #[test]
    fn test_screen_to_tile_near_center() {
        let grid = IsoGrid::default();
        let center = grid.iso_to_screen(TileCoord::new(4, -2));
        assert_eq!(grid.screen_to_tile(center.offset(10.0, 4.0)), TileCoord::new(4, -2));
    }

    #[test]
    fn test_tile_to_chunk_floors_negatives() {
        let grid = IsoGrid::default();
        assert_eq!(grid.tile_to_chunk(TileCoord::new(0, 15)), ChunkCoord::new(0, 0));
        assert_eq!(grid.tile_to_chunk(TileCoord::new(16, 0)), ChunkCoord::new(1, 0));
        assert_eq!(grid.tile_to_chunk(TileCoord::new(-1, -16)), ChunkCoord::new(-1, -1));
        assert_eq!(grid.tile_to_chunk(TileCoord::new(-17, 0)), ChunkCoord::new(-2, 0));
    }

    #[test]
    fn test_chunk_tiles_order_and_count() {
        let grid = IsoGrid::new(128.0, 64.0, 4);
        let tiles: Vec<_> = grid.chunk_tiles(ChunkCoord::new(-1, 2)).collect();
        assert_eq!(tiles.len(), 16);
        assert_eq!(tiles[0], TileCoord::new(-4, 8));
        assert_eq!(tiles[1], TileCoord::new(-4, 9));
        assert_eq!(tiles[4], TileCoord::new(-3, 8));
        assert_eq!(tiles[15], TileCoord::new(-1, 11));
        assert!(tiles
            .iter()
            .all(|t| grid.tile_to_chunk(*t) == ChunkCoord::new(-1, 2)));
    }
}
