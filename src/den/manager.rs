//! DenManager - owns all den records
//!
//! Creates dens from type templates, tracks discovery and clearing, and
//! regenerates cleared dens at an escalated tier once their respawn
//! deadline passes. Creature spawning for dens is external; this manager
//! only stores the ids handed to `populate_den`.

use ahash::AHashMap;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::EcosystemConfig;
use crate::core::types::{CreatureId, DenId, Tick, TilePos, MAX_TIER, MIN_TIER};
use crate::den::generation::generate_rooms;
use crate::den::templates::template_for;
use crate::den::{Den, DenType};
use crate::events::{EventSink, WorldEvent};

/// Owner of all den state
pub struct DenManager {
    dens: AHashMap<DenId, Den>,
    next_den_id: u32,
    config: EcosystemConfig,
    rng: ChaCha8Rng,
}

impl DenManager {
    pub fn new(config: EcosystemConfig, rng: ChaCha8Rng) -> Self {
        Self {
            dens: AHashMap::new(),
            next_den_id: 1,
            config,
            rng,
        }
    }

    fn next_id(&mut self) -> DenId {
        let id = DenId(self.next_den_id);
        self.next_den_id += 1;
        id
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create a den of the given type and tier at a position
    pub fn create_den(&mut self, den_type: DenType, position: TilePos, tier: u8) -> DenId {
        let tier = tier.clamp(MIN_TIER, MAX_TIER);
        let template = template_for(den_type);
        let rooms = generate_rooms(&template, tier, &mut self.rng);
        let prefix = template.name_prefixes[self.rng.gen_range(0..template.name_prefixes.len())];
        let id = self.next_id();

        let den = Den {
            id,
            den_type,
            name: format!("{} {}", prefix, template.display_name),
            position,
            tier,
            rooms,
            creature_ids: Vec::new(),
            boss_id: None,
            boss_name: None,
            discovered: false,
            discovered_by: Vec::new(),
            cleared: false,
            respawn_at: None,
            last_cleared: None,
        };
        tracing::debug!(den = id.0, den_type = den_type.as_str(), tier, "den created");
        self.dens.insert(id, den);
        id
    }

    /// Distribute externally spawned creatures across the den's rooms.
    ///
    /// The boss goes alone into the boss room; everyone else is dealt
    /// round-robin across the other rooms. Returns false for unknown dens.
    pub fn populate_den(
        &mut self,
        den_id: DenId,
        creature_ids: &[CreatureId],
        boss: Option<(CreatureId, &str)>,
    ) -> bool {
        let Some(den) = self.dens.get_mut(&den_id) else {
            return false;
        };

        // Repopulation replaces any previous roster outright
        for room in den.rooms.iter_mut() {
            room.occupant_ids.clear();
        }
        den.boss_id = None;
        den.boss_name = None;

        den.creature_ids = creature_ids.to_vec();
        if let Some((boss_id, boss_name)) = boss {
            den.boss_id = Some(boss_id);
            den.boss_name = Some(boss_name.to_string());
            den.creature_ids.push(boss_id);
            if let Some(room) = den.rooms.iter_mut().find(|r| r.is_boss_room) {
                room.occupant_ids = vec![boss_id];
            }
        }

        let normal_rooms: Vec<u32> = den
            .rooms
            .iter()
            .filter(|r| !r.is_boss_room)
            .map(|r| r.id)
            .collect();
        if normal_rooms.is_empty() {
            return true;
        }
        for (i, &creature_id) in creature_ids.iter().enumerate() {
            let room_id = normal_rooms[i % normal_rooms.len()];
            if let Some(room) = den.room_mut(room_id) {
                room.occupant_ids.push(creature_id);
            }
        }
        true
    }

    /// Record a discovery; the event fires only for the first discoverer
    pub fn discover_den(
        &mut self,
        den_id: DenId,
        discovered_by: &str,
        events: &mut dyn EventSink,
    ) -> bool {
        let Some(den) = self.dens.get_mut(&den_id) else {
            return false;
        };
        if !den.discovered_by.iter().any(|a| a == discovered_by) {
            den.discovered_by.push(discovered_by.to_string());
        }
        if !den.discovered {
            den.discovered = true;
            events.publish(WorldEvent::DenDiscovered {
                den_id,
                den_type: den.den_type.as_str().to_string(),
                tier: den.tier,
                position: den.position,
                discovered_by: discovered_by.to_string(),
            });
        }
        true
    }

    /// Mark one room cleared. When it was the last uncleared room the
    /// whole den cascades to cleared.
    pub fn clear_room(
        &mut self,
        den_id: DenId,
        room_id: u32,
        cleared_by: &str,
        clock: Tick,
        events: &mut dyn EventSink,
    ) -> bool {
        let Some(den) = self.dens.get_mut(&den_id) else {
            return false;
        };
        let Some(room) = den.room_mut(room_id) else {
            return false;
        };
        room.is_cleared = true;

        if den.rooms.iter().all(|r| r.is_cleared) {
            self.clear_den(den_id, cleared_by, clock, events);
        }
        true
    }

    /// Mark a whole den cleared and schedule its respawn. Idempotent:
    /// clearing an already-cleared den changes nothing.
    pub fn clear_den(
        &mut self,
        den_id: DenId,
        cleared_by: &str,
        clock: Tick,
        events: &mut dyn EventSink,
    ) -> bool {
        let Some(den) = self.dens.get_mut(&den_id) else {
            return false;
        };
        if den.cleared {
            return true;
        }
        den.cleared = true;
        den.last_cleared = Some(clock);
        den.respawn_at = Some(clock + template_for(den.den_type).respawn_delay);
        for room in den.rooms.iter_mut() {
            room.is_cleared = true;
        }
        events.publish(WorldEvent::DenCleared {
            den_id,
            cleared_by: cleared_by.to_string(),
            boss_name: den.boss_name.clone(),
        });
        tracing::debug!(den = den_id.0, cleared_by, "den cleared");
        true
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Regenerate cleared dens whose respawn deadline has passed
    pub fn tick(&mut self, clock: Tick, events: &mut dyn EventSink) {
        if clock % self.config.den_tick_interval != 0 {
            return;
        }
        let mut due: Vec<DenId> = self
            .dens
            .values()
            .filter(|d| d.cleared && d.respawn_at.map(|t| t <= clock).unwrap_or(false))
            .map(|d| d.id)
            .collect();
        due.sort();

        for id in due {
            // Escalation: each clear pushes the den one tier up, capped
            let (den_type, new_tier) = {
                let den = &self.dens[&id];
                (den.den_type, (den.tier + 1).min(MAX_TIER))
            };
            let rooms = generate_rooms(&template_for(den_type), new_tier, &mut self.rng);
            if let Some(den) = self.dens.get_mut(&id) {
                den.tier = new_tier;
                den.rooms = rooms;
                den.creature_ids.clear();
                den.boss_id = None;
                den.boss_name = None;
                den.discovered = false;
                den.discovered_by.clear();
                den.cleared = false;
                den.respawn_at = None;
            }
            events.publish(WorldEvent::DenRespawned { den_id: id, new_tier });
            tracing::debug!(den = id.0, new_tier, "den respawned");
        }
    }

    // ========================================================================
    // Query surface
    // ========================================================================

    pub fn get_den(&self, id: DenId) -> Option<&Den> {
        self.dens.get(&id)
    }

    pub fn get_den_mut(&mut self, id: DenId) -> Option<&mut Den> {
        self.dens.get_mut(&id)
    }

    pub fn all_dens(&self) -> impl Iterator<Item = &Den> {
        self.dens.values()
    }

    pub fn dens_by_type(&self, den_type: DenType) -> Vec<&Den> {
        self.dens.values().filter(|d| d.den_type == den_type).collect()
    }

    pub fn discovered_dens(&self) -> Vec<&Den> {
        self.dens.values().filter(|d| d.discovered).collect()
    }

    pub fn uncleared_dens(&self) -> Vec<&Den> {
        self.dens.values().filter(|d| !d.cleared).collect()
    }

    /// Human-readable den status. Presentation only.
    pub fn describe_den(&self, id: DenId) -> Option<String> {
        let den = self.dens.get(&id)?;
        let cleared_rooms = den.rooms.iter().filter(|r| r.is_cleared).count();
        let mut text = format!(
            "{} (tier {} {}) at ({}, {})\n",
            den.name,
            den.tier,
            den.den_type.as_str(),
            den.position.x,
            den.position.y
        );
        text.push_str(&format!(
            "Status: {}, {}/{} rooms cleared\n",
            if den.cleared {
                "cleared"
            } else if den.discovered {
                "discovered"
            } else {
                "hidden"
            },
            cleared_rooms,
            den.rooms.len()
        ));
        for room in &den.rooms {
            text.push_str(&format!(
                "- [floor {}] {}{}: {} occupants, {} traps, {} loot\n",
                room.floor,
                room.name,
                if room.is_boss_room { " (boss)" } else { "" },
                room.occupant_ids.len(),
                room.traps.len(),
                room.loot.len()
            ));
        }
        Some(text)
    }
}
