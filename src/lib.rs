//! Wildlands - ecosystem simulation core
//!
//! Autonomous wildlife and hostile factions for a persistent tile world:
//! per-creature behavior state machines, pack-level tactics with leadership
//! succession, and procedurally generated dens that respawn at escalating
//! tiers. The host world supplies the map oracle, the clock, and the combat
//! resolver; this crate owns everything that lives, hunts, and lairs.

pub mod core;
pub mod creature;
pub mod den;
pub mod events;
pub mod pack;
pub mod world;

pub use crate::core::config::EcosystemConfig;
pub use crate::core::types::{CreatureId, DenId, PackId, Tick, TilePos};
pub use crate::creature::manager::CreatureManager;
pub use crate::den::manager::DenManager;
pub use crate::events::{EventLog, EventSink, WorldEvent};
pub use crate::pack::manager::PackManager;
