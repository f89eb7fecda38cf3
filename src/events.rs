//! World events emitted by the ecosystem managers
//!
//! Other subsystems (quests, chronicle, client notifications) subscribe to
//! these through an [`EventSink`]. The managers never call back into their
//! consumers; they only publish tagged records.

use serde::{Deserialize, Serialize};

use crate::core::types::{CreatureId, DenId, PackId, Tick, TilePos};

/// A tagged ecosystem event record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum WorldEvent {
    CreatureSpawned {
        creature_id: CreatureId,
        template_id: String,
        kind: String,
        tier: u8,
        name: String,
        position: TilePos,
    },
    CreatureDied {
        creature_id: CreatureId,
        template_id: String,
        name: String,
        killed_by: Option<CreatureId>,
        loot: Vec<String>,
        position: TilePos,
    },
    /// An animal produced a resource (egg, wool, ...)
    CreatureProduced {
        creature_id: CreatureId,
        item_type: String,
        position: TilePos,
    },
    PackFormed {
        pack_id: PackId,
        pack_type: String,
        leader_id: CreatureId,
        member_count: usize,
        territory: TilePos,
    },
    PackDisbanded {
        pack_id: PackId,
        pack_type: String,
        reason: String,
    },
    /// A pack closed on a hunt target; `flankers` is the surround signal
    /// for the external combat resolver, not a damage computation.
    PackHunt {
        pack_id: PackId,
        target_id: CreatureId,
        position: TilePos,
        flankers: usize,
    },
    /// A wolf pack below breeding strength asks the spawner for a pup
    PackBreedRequest {
        pack_id: PackId,
        territory: TilePos,
    },
    DenDiscovered {
        den_id: DenId,
        den_type: String,
        tier: u8,
        position: TilePos,
        discovered_by: String,
    },
    DenCleared {
        den_id: DenId,
        cleared_by: String,
        boss_name: Option<String>,
    },
    DenRespawned {
        den_id: DenId,
        new_tier: u8,
    },
}

/// Receiver for published events
pub trait EventSink {
    fn publish(&mut self, event: WorldEvent);
}

/// A recorded event with the tick it occurred on
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub tick: Tick,
    pub event: WorldEvent,
}

/// The standard in-memory event sink: an append-only log
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<LoggedEvent>,
    current_tick: Tick,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp subsequent events with this tick
    pub fn set_tick(&mut self, tick: Tick) {
        self.current_tick = tick;
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events_for_tick(&self, tick: Tick) -> impl Iterator<Item = &LoggedEvent> {
        self.events.iter().filter(move |e| e.tick == tick)
    }

    pub fn drain(&mut self) -> Vec<LoggedEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventSink for EventLog {
    fn publish(&mut self, event: WorldEvent) {
        self.events.push(LoggedEvent { tick: self.current_tick, event });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_stamps_ticks() {
        let mut log = EventLog::new();
        log.set_tick(7);
        log.publish(WorldEvent::DenRespawned { den_id: DenId(1), new_tier: 3 });
        assert_eq!(log.len(), 1);
        assert_eq!(log.events[0].tick, 7);
        assert_eq!(log.events_for_tick(7).count(), 1);
        assert_eq!(log.events_for_tick(8).count(), 0);
    }

    #[test]
    fn test_event_round_trips_through_json() {
        let event = WorldEvent::PackHunt {
            pack_id: PackId(3),
            target_id: CreatureId::new(),
            position: TilePos::new(2, -4),
            flankers: 2,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: WorldEvent = serde_json::from_str(&json).unwrap();
        match back {
            WorldEvent::PackHunt { pack_id, flankers, .. } => {
                assert_eq!(pack_id, PackId(3));
                assert_eq!(flankers, 2);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
