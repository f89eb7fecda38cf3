//! Reference tile map for demos and integration tests
//!
//! A square grid with hash-noise terrain. Real deployments implement
//! [`MapOracle`](super::MapOracle) over the host world's chunk store; this
//! exists so the simulation can run headless.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::{Biome, MapOracle, TerrainKind, Tile};

/// Square world map with noise-generated terrain
#[derive(Debug, Clone)]
pub struct GridMap {
    /// Width and height in tiles; tiles span [-half, half) on both axes
    pub size: i32,
    tiles: Vec<Tile>,
}

impl GridMap {
    /// Generate a `size` x `size` map centered on the origin
    pub fn generate(size: i32, seed: u64, rng: &mut ChaCha8Rng) -> Self {
        let half = size / 2;
        let mut tiles = Vec::with_capacity((size * size) as usize);
        for y in -half..size - half {
            for x in -half..size - half {
                tiles.push(generate_tile(x, y, size, seed, rng));
            }
        }
        Self { size, tiles }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let half = self.size / 2;
        if x < -half || x >= self.size - half || y < -half || y >= self.size - half {
            return None;
        }
        Some(((y + half) * self.size + (x + half)) as usize)
    }
}

impl MapOracle for GridMap {
    fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.index(x, y).map(|i| self.tiles[i])
    }
}

fn generate_tile(x: i32, y: i32, size: i32, seed: u64, rng: &mut ChaCha8Rng) -> Tile {
    let noise = simple_noise(x, y, seed);
    let half = (size / 2) as f32;
    let edge = 1.0 - ((x * x + y * y) as f32).sqrt() / (half * 1.42);

    // Map edge tends toward water, high noise toward mountains
    let (kind, biome) = if edge < 0.12 && rng.gen::<f32>() < 0.6 {
        (TerrainKind::Water, Biome::Water)
    } else if noise > 0.82 {
        (TerrainKind::Rock, Biome::Mountains)
    } else if noise > 0.6 {
        (TerrainKind::Grass, Biome::Forest)
    } else if noise < 0.08 {
        (TerrainKind::Sand, Biome::Desert)
    } else if noise < 0.16 {
        (TerrainKind::Dirt, Biome::Swamp)
    } else {
        (TerrainKind::Grass, Biome::Plains)
    };

    let walkable = !matches!(kind, TerrainKind::Water);
    Tile { kind, biome, walkable }
}

/// Cheap deterministic pseudo-noise in [0, 1)
fn simple_noise(x: i32, y: i32, seed: u64) -> f32 {
    let n = (x as i64 as u64)
        .wrapping_mul(374761393)
        .wrapping_add((y as i64 as u64).wrapping_mul(668265263))
        .wrapping_add(seed);
    let n = n.wrapping_mul(n).wrapping_mul(n);
    (n >> 16) as f32 / (u64::MAX >> 16) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_map_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let map = GridMap::generate(32, 1, &mut rng);
        assert!(map.tile(0, 0).is_some());
        assert!(map.tile(-16, -16).is_some());
        assert!(map.tile(15, 15).is_some());
        assert!(map.tile(16, 0).is_none());
        assert!(map.tile(0, -17).is_none());
        assert!(!map.is_walkable(999, 999));
    }

    #[test]
    fn test_water_tiles_are_unwalkable() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let map = GridMap::generate(64, 7, &mut rng);
        for y in -32..32 {
            for x in -32..32 {
                let tile = map.tile(x, y).unwrap();
                assert_eq!(tile.walkable, tile.kind != TerrainKind::Water);
            }
        }
    }
}
