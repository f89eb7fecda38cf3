//! Host-world interface: tiles, biomes, and the map oracle
//!
//! The ecosystem never owns the map. It asks the host for tiles and
//! walkability through [`MapOracle`] and treats misses (out-of-bounds,
//! unloaded chunks) as unwalkable.

pub mod map;

use serde::{Deserialize, Serialize};

pub use map::GridMap;

/// Biome classification used for habitat gating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Plains,
    Forest,
    Mountains,
    Desert,
    Swamp,
    Tundra,
    Water,
}

/// Coarse terrain kind of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Grass,
    Dirt,
    Rock,
    Sand,
    Snow,
    Water,
}

/// A single map tile as seen by the ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TerrainKind,
    pub biome: Biome,
    pub walkable: bool,
}

/// Read-only view of the host world's tile map
pub trait MapOracle {
    /// Tile at (x, y), or None outside the world
    fn tile(&self, x: i32, y: i32) -> Option<Tile>;

    fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).map(|t| t.walkable).unwrap_or(false)
    }
}

/// Phase of the day/night cycle, derived from the world clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPhase {
    Day,
    Night,
}

impl DayPhase {
    /// Ticks per full day/night cycle
    pub const CYCLE_LENGTH: u64 = 600;

    /// Phase at a given tick: first 60% of each cycle is daylight
    pub fn at_tick(tick: u64) -> Self {
        if tick % Self::CYCLE_LENGTH < Self::CYCLE_LENGTH * 6 / 10 {
            DayPhase::Day
        } else {
            DayPhase::Night
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_phase_cycles() {
        assert_eq!(DayPhase::at_tick(0), DayPhase::Day);
        assert_eq!(DayPhase::at_tick(359), DayPhase::Day);
        assert_eq!(DayPhase::at_tick(360), DayPhase::Night);
        assert_eq!(DayPhase::at_tick(599), DayPhase::Night);
        assert_eq!(DayPhase::at_tick(600), DayPhase::Day);
    }
}
