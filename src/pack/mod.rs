//! Pack records and group tactics
//!
//! A [`Pack`] is a leader plus a member set sharing territory and morale.
//! Packs hold creature ids only; every read or mutation of a member goes
//! through the [`CreatureAccess`] accessor supplied by the caller, so a
//! deleted creature can never leave a dangling pointer here.

pub mod manager;
pub mod tactics;

use serde::{Deserialize, Serialize};

use crate::core::types::{CreatureId, PackId, Tick, TilePos};
use crate::creature::Creature;

/// The four faction flavors, each with its own tactic state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackType {
    WolfPack,
    GoblinTribe,
    BanditGang,
    OrcWarband,
}

impl PackType {
    pub const ALL: [PackType; 4] = [
        PackType::WolfPack,
        PackType::GoblinTribe,
        PackType::BanditGang,
        PackType::OrcWarband,
    ];

    /// Stable string used in event payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            PackType::WolfPack => "wolf_pack",
            PackType::GoblinTribe => "goblin_tribe",
            PackType::BanditGang => "bandit_gang",
            PackType::OrcWarband => "orc_warband",
        }
    }

    /// True when a creature of this template can join this pack type
    pub fn accepts_template(&self, template_id: &str) -> bool {
        match self {
            PackType::WolfPack => template_id == "wolf",
            PackType::GoblinTribe => template_id == "goblin" || template_id == "goblin_brute",
            PackType::BanditGang => template_id == "bandit",
            PackType::OrcWarband => template_id == "orc" || template_id == "orc_berserker",
        }
    }
}

/// Group tactical state shared by all four pack types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackState {
    Idle,
    Hunting,
    Raiding,
    Patrolling,
    Fleeing,
}

/// A named, typed group of creatures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pack {
    pub id: PackId,
    pub pack_type: PackType,
    pub leader_id: CreatureId,
    /// Members excluding the leader
    pub member_ids: Vec<CreatureId>,
    pub territory_center: TilePos,
    pub territory_radius: f32,
    /// 0-100, clamped on every change
    pub morale: i32,
    pub state: PackState,
    pub target_id: Option<CreatureId>,
    /// Surround signal from the last hunt evaluation; consumed by the
    /// external combat resolver, never applied to damage here
    pub flankers: usize,
    pub last_action: Tick,
    /// Tick the last idle morale recovery was applied
    pub last_regen: Tick,
}

impl Pack {
    /// Add to morale, clamping into [0, 100]
    pub fn adjust_morale(&mut self, delta: i32) {
        self.morale = (self.morale + delta).clamp(0, 100);
    }

    /// Leader plus members
    pub fn all_ids(&self) -> Vec<CreatureId> {
        let mut ids = Vec::with_capacity(self.member_ids.len() + 1);
        ids.push(self.leader_id);
        ids.extend_from_slice(&self.member_ids);
        ids
    }

    pub fn contains(&self, id: CreatureId) -> bool {
        self.leader_id == id || self.member_ids.contains(&id)
    }

    /// True when `pos` falls inside the pack's territory circle
    pub fn in_territory(&self, pos: &TilePos) -> bool {
        self.territory_center.distance(pos) <= self.territory_radius
    }
}

/// Narrow read/mutate accessor over the creature registry.
///
/// `CreatureManager` implements this; tests substitute stub registries.
/// Lookups tolerate misses: a dead or deleted creature simply returns None.
pub trait CreatureAccess {
    fn creature(&self, id: CreatureId) -> Option<&Creature>;
    fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature>;
    /// Ids of all living creatures
    fn living_ids(&self) -> Vec<CreatureId>;

    /// Position of a living creature, if present
    fn position_of(&self, id: CreatureId) -> Option<TilePos> {
        self.creature(id).filter(|c| c.is_alive()).map(|c| c.position)
    }

    /// True when the id refers to a living creature
    fn is_living(&self, id: CreatureId) -> bool {
        self.creature(id).map(|c| c.is_alive()).unwrap_or(false)
    }
}

impl CreatureAccess for crate::creature::manager::CreatureManager {
    fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.get_creature(id)
    }

    fn creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.get_creature_mut(id)
    }

    fn living_ids(&self) -> Vec<CreatureId> {
        // Stable order: downstream tactic code draws rng per id
        let mut ids: Vec<CreatureId> = self.alive_creatures().map(|c| c.id).collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_morale_clamps() {
        let mut pack = Pack {
            id: PackId(1),
            pack_type: PackType::WolfPack,
            leader_id: CreatureId::new(),
            member_ids: vec![],
            territory_center: TilePos::new(0, 0),
            territory_radius: 15.0,
            morale: 50,
            state: PackState::Idle,
            target_id: None,
            flankers: 0,
            last_action: 0,
            last_regen: 0,
        };
        pack.adjust_morale(200);
        assert_eq!(pack.morale, 100);
        pack.adjust_morale(-500);
        assert_eq!(pack.morale, 0);
    }

    #[test]
    fn test_accepts_template() {
        assert!(PackType::WolfPack.accepts_template("wolf"));
        assert!(!PackType::WolfPack.accepts_template("goblin"));
        assert!(PackType::GoblinTribe.accepts_template("goblin_brute"));
        assert!(PackType::OrcWarband.accepts_template("orc"));
        assert!(PackType::OrcWarband.accepts_template("orc_berserker"));
    }
}
