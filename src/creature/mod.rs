//! Individual creature records and behavior
//!
//! A [`Creature`] is one living entity: stats scaled by tier, a behavior
//! state, a habitat, and optional pack/den affiliation. The
//! [`manager::CreatureManager`] owns every record; packs and dens refer to
//! creatures by id only.

pub mod manager;
pub mod templates;

use serde::{Deserialize, Serialize};

use crate::core::types::{CreatureId, DenId, PackId, Tick, TilePos};
use crate::world::Biome;

/// Broad creature classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    /// Domestic-capable producers (chicken, sheep)
    Animal,
    /// Wild fauna (rabbit, deer, wolf, bear)
    Beast,
    /// Hostile factions (goblin, bandit, orc)
    Humanoid,
}

/// How a creature reacts to the world when left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorArchetype {
    Passive,
    Neutral,
    Aggressive,
}

/// When a creature is active; outside its window it rests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveTime {
    Day,
    Night,
    Any,
}

/// Individual behavior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreatureState {
    Roaming,
    Hunting,
    Resting,
    Guarding,
    Fleeing,
    Dead,
}

/// Combat and movement stats, already tier-scaled on the creature
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Stats {
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
    pub strength: f32,
    pub agility: f32,
    pub vitality: f32,
    pub cunning: f32,
}

/// One entry of a loot table; rolled independently on death
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootEntry {
    pub item_type: String,
    pub chance: f64,
    pub quantity_min: u32,
    pub quantity_max: u32,
}

/// Periodic resource production for animals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionSchedule {
    pub item_type: String,
    pub interval: Tick,
    pub last_produced: Tick,
}

/// A living entity instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    pub template_id: String,
    pub name: String,
    pub tier: u8,
    pub kind: CreatureKind,
    pub archetype: BehaviorArchetype,
    pub state: CreatureState,
    pub position: TilePos,
    /// Where the creature first spawned; respawns try to return here
    pub spawn_origin: TilePos,
    pub hp: f32,
    pub max_hp: f32,
    pub stats: Stats,
    pub loot_table: Vec<LootEntry>,
    pub habitat: Vec<Biome>,
    pub active_time: ActiveTime,
    pub pack_id: Option<PackId>,
    pub den_id: Option<DenId>,
    pub respawn_at: Option<Tick>,
    pub last_action: Tick,
    /// Unit step the creature retreats along while fleeing; zeroed once
    /// the flight ends
    pub flee_dir: (i32, i32),
    pub production: Option<ProductionSchedule>,
}

impl Creature {
    pub fn is_alive(&self) -> bool {
        self.state != CreatureState::Dead
    }

    pub fn is_animal(&self) -> bool {
        self.kind == CreatureKind::Animal
    }

    /// Apply damage from the external combat resolver, clamping at zero.
    /// Returns true when the hit was lethal.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.hp = (self.hp - amount).max(0.0);
        if self.hp <= 0.0 {
            self.hp = 0.0;
            self.state = CreatureState::Dead;
            true
        } else {
            false
        }
    }

    /// True when this creature wants to be awake at the given phase
    pub fn is_active_at(&self, phase: crate::world::DayPhase) -> bool {
        match (self.active_time, phase) {
            (ActiveTime::Any, _) => true,
            (ActiveTime::Day, crate::world::DayPhase::Day) => true,
            (ActiveTime::Night, crate::world::DayPhase::Night) => true,
            _ => false,
        }
    }
}
