//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for creatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CreatureId(pub Uuid);

impl CreatureId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CreatureId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for packs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackId(pub u32);

impl PackId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for dens
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DenId(pub u32);

impl DenId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Difficulty/strength tier bounds for creatures and dens
pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 5;

/// Stat multiplier per tier. Strictly increasing, deliberately non-linear
/// so tier 5 creatures feel like a different weight class.
pub fn tier_multiplier(tier: u8) -> f32 {
    match tier.clamp(MIN_TIER, MAX_TIER) {
        1 => 1.0,
        2 => 1.5,
        3 => 2.5,
        4 => 4.0,
        _ => 7.0,
    }
}

/// Integer tile position on the world grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between tile centers
    pub fn distance(&self, other: &Self) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// One grid-snapped step of `speed` tiles toward `target`.
    ///
    /// Movement is distance-gated rather than kinematic: the result never
    /// overshoots the target.
    pub fn step_toward(&self, target: &Self, speed: f32) -> Self {
        let dx = (target.x - self.x) as f32;
        let dy = (target.y - self.y) as f32;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 0.0001 {
            return *self;
        }
        let step = speed.min(len);
        Self {
            x: self.x + (dx / len * step).round() as i32,
            y: self.y + (dy / len * step).round() as i32,
        }
    }

    /// One step directly away from `threat` at `speed` tiles
    pub fn step_away(&self, threat: &Self, speed: f32) -> Self {
        let dx = (self.x - threat.x) as f32;
        let dy = (self.y - threat.y) as f32;
        let len = (dx * dx + dy * dy).sqrt();
        if len < 0.0001 {
            // Sitting on the threat: any direction works
            return self.offset(speed.round() as i32, 0);
        }
        Self {
            x: self.x + (dx / len * speed).round() as i32,
            y: self.y + (dy / len * speed).round() as i32,
        }
    }

    /// True when the two positions touch (8-neighborhood or same tile)
    pub fn is_adjacent(&self, other: &Self) -> bool {
        (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }
}
