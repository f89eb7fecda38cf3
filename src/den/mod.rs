//! Procedurally generated lairs
//!
//! A [`Den`] is a multi-floor room graph with traps and loot, populated
//! with creature ids by an external spawner. Cleared dens respawn after a
//! delay with their tier escalated.

pub mod generation;
pub mod manager;
pub mod templates;

use serde::{Deserialize, Serialize};

use crate::core::types::{CreatureId, DenId, Tick, TilePos};

/// The four lair flavors, matching the hostile pack types plus wolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DenType {
    WolfDen,
    GoblinCave,
    BanditCamp,
    OrcStronghold,
}

impl DenType {
    pub const ALL: [DenType; 4] = [
        DenType::WolfDen,
        DenType::GoblinCave,
        DenType::BanditCamp,
        DenType::OrcStronghold,
    ];

    /// Stable string used in event payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            DenType::WolfDen => "wolf_den",
            DenType::GoblinCave => "goblin_cave",
            DenType::BanditCamp => "bandit_camp",
            DenType::OrcStronghold => "orc_stronghold",
        }
    }
}

/// Trap flavors placed in non-boss rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapKind {
    SpikePit,
    SnareWire,
    DeadfallRock,
    PoisonDart,
}

/// A placed trap; damage and disarm difficulty scale with den tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trap {
    pub kind: TrapKind,
    pub damage: f32,
    pub disarm_difficulty: u8,
    pub triggered: bool,
}

/// One room of a den
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenRoom {
    /// Index into the den's room list; doubles as the graph node id
    pub id: u32,
    pub floor: u32,
    pub name: String,
    pub is_boss_room: bool,
    pub is_cleared: bool,
    /// Undirected edges to other room ids
    pub connections: Vec<u32>,
    pub occupant_ids: Vec<CreatureId>,
    pub traps: Vec<Trap>,
    pub loot: Vec<String>,
}

/// A procedurally generated lair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Den {
    pub id: DenId,
    pub den_type: DenType,
    pub name: String,
    pub position: TilePos,
    pub tier: u8,
    pub rooms: Vec<DenRoom>,
    /// Every creature spawned into this den, by id only
    pub creature_ids: Vec<CreatureId>,
    pub boss_id: Option<CreatureId>,
    pub boss_name: Option<String>,
    pub discovered: bool,
    /// Agents (player/party names) who have found this den
    pub discovered_by: Vec<String>,
    pub cleared: bool,
    pub respawn_at: Option<Tick>,
    pub last_cleared: Option<Tick>,
}

impl Den {
    /// A den counts as cleared when marked so or when every room is
    pub fn is_fully_cleared(&self) -> bool {
        self.cleared || self.rooms.iter().all(|r| r.is_cleared)
    }

    pub fn boss_room(&self) -> Option<&DenRoom> {
        self.rooms.iter().find(|r| r.is_boss_room)
    }

    pub fn room(&self, room_id: u32) -> Option<&DenRoom> {
        self.rooms.get(room_id as usize)
    }

    pub fn room_mut(&mut self, room_id: u32) -> Option<&mut DenRoom> {
        self.rooms.get_mut(room_id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_den_type_strings() {
        assert_eq!(DenType::WolfDen.as_str(), "wolf_den");
        assert_eq!(DenType::OrcStronghold.as_str(), "orc_stronghold");
    }
}
