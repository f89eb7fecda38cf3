//! Ecosystem configuration with documented constants
//!
//! All tuning numbers for the three managers are collected here with
//! explanations of their purpose and how they interact with each other.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::TilePos;

/// Configuration for the ecosystem simulation
///
/// These values have been tuned to produce believable wildlife pacing.
/// Changing them shifts how crowded, dangerous, and dynamic the world feels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemConfig {
    // === SPAWNING ===
    /// Ticks between creature spawning passes
    ///
    /// Lower values refill the world faster after die-offs but add per-tick
    /// cost proportional to `spawn_chunks_per_pass`.
    pub spawn_interval: u64,

    /// Hard cap on living creatures; spawning passes skip entirely above it
    pub max_creatures: usize,

    /// Map chunks sampled per spawning pass
    pub spawn_chunks_per_pass: usize,

    /// Side length of a spawn chunk in tiles
    pub chunk_size: i32,

    /// Spawning pass samples chunks within this radius (chunks) of the
    /// world center
    pub world_radius_chunks: i32,

    /// Placement attempts per chunk before the spawn is silently skipped
    pub placement_attempts: u32,

    /// No creature spawns within this radius (tiles) of a settlement
    pub safe_zone_radius: f32,

    /// Settlement positions the safe zone applies around
    pub settlements: Vec<TilePos>,

    /// World center used for the distance-banded tier gate
    pub world_center: TilePos,

    /// Inside this radius (chunks from world center) only tier 1 spawns
    ///
    /// The allowed tier set widens by one tier per band of
    /// `tier_band_width` chunks beyond this, reaching all five tiers past
    /// `tier_band_radius + 4 * tier_band_width`.
    pub tier_band_radius: f32,

    /// Width in chunks of each successive tier band
    pub tier_band_width: f32,

    // === INDIVIDUAL BEHAVIOR ===
    /// Ticks between behavior evaluations per creature
    pub behavior_interval: u64,

    /// Chance an aggressive roamer escalates to hunting, per evaluation
    pub hunt_escalation_chance: f64,

    /// Chance a hunting creature gives up and resumes roaming
    pub hunt_giveup_chance: f64,

    /// Chance a resting or guarding creature resumes roaming
    pub wake_chance: f64,

    /// Ticks a creature keeps fleeing before reverting to roaming
    pub flee_duration: u64,

    /// Tiles covered per tick while fleeing
    pub flee_speed: f32,

    /// Radius within which wolves notice rabbits and deer
    pub predator_sense_radius: f32,

    // === PACKS ===
    /// Ticks between pack tactic evaluations
    pub pack_tick_interval: u64,

    /// Single-link clustering radius for pack auto-formation
    pub pack_cluster_radius: f32,

    /// Minimum cluster size that forms a pack (leader included)
    pub pack_min_size: usize,

    /// Default territory radius for new packs
    pub territory_radius: f32,

    /// Idle packs regain 1 morale each time this many ticks elapse
    pub morale_regen_interval: u64,

    // === DENS ===
    /// Ticks between den respawn checks
    pub den_tick_interval: u64,
}

impl Default for EcosystemConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 50,
            max_creatures: 500,
            spawn_chunks_per_pass: 8,
            chunk_size: 16,
            world_radius_chunks: 40,
            placement_attempts: 10,
            safe_zone_radius: 40.0,
            settlements: Vec::new(),
            world_center: TilePos::new(0, 0),
            tier_band_radius: 5.0,
            tier_band_width: 10.0,
            behavior_interval: 5,
            hunt_escalation_chance: 0.1,
            hunt_giveup_chance: 0.2,
            wake_chance: 0.1,
            flee_duration: 5,
            flee_speed: 2.0,
            predator_sense_radius: 8.0,
            pack_tick_interval: 5,
            pack_cluster_radius: 10.0,
            pack_min_size: 3,
            territory_radius: 15.0,
            morale_regen_interval: 20,
            den_tick_interval: 10,
        }
    }
}

impl EcosystemConfig {
    /// Parse a config from TOML text; missing keys fall back to defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Allowed spawn tiers at `dist_chunks` chunks from the world center.
    ///
    /// Tier 1 only near the center; one more tier per band outward until
    /// all five are available in the deep wilds.
    pub fn allowed_tiers(&self, dist_chunks: f32) -> Vec<u8> {
        let extra = if dist_chunks <= self.tier_band_radius {
            0
        } else {
            (((dist_chunks - self.tier_band_radius) / self.tier_band_width).ceil() as u8).min(4)
        };
        (1..=1 + extra).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_tiers_narrow_at_center() {
        let config = EcosystemConfig::default();
        assert_eq!(config.allowed_tiers(0.0), vec![1]);
        assert_eq!(config.allowed_tiers(5.0), vec![1]);
    }

    #[test]
    fn test_allowed_tiers_widen_with_distance() {
        let config = EcosystemConfig::default();
        assert_eq!(config.allowed_tiers(15.0), vec![1, 2]);
        assert_eq!(config.allowed_tiers(25.0), vec![1, 2, 3]);
        assert_eq!(config.allowed_tiers(35.0), vec![1, 2, 3, 4]);
        assert_eq!(config.allowed_tiers(36.0), vec![1, 2, 3, 4, 5]);
        assert_eq!(config.allowed_tiers(500.0), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_from_toml_partial_override() {
        let config = EcosystemConfig::from_toml_str("max_creatures = 64\n").unwrap();
        assert_eq!(config.max_creatures, 64);
        assert_eq!(config.spawn_interval, EcosystemConfig::default().spawn_interval);
    }
}
