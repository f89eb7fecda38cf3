//! CreatureManager - owns every creature record
//!
//! Drives the periodic passes (spawning, individual behavior, respawn,
//! predator/prey, animal production) and exposes the query/mutation surface
//! other subsystems use. Packs and dens never hold references into this
//! registry, only ids.

use ahash::AHashMap;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::EcosystemConfig;
use crate::core::types::{CreatureId, DenId, PackId, Tick, TilePos, MAX_TIER, MIN_TIER};
use crate::creature::templates::{builtin_templates, CreatureTemplate};
use crate::creature::{
    BehaviorArchetype, Creature, CreatureKind, CreatureState, ProductionSchedule,
};
use crate::events::{EventSink, WorldEvent};
use crate::world::{DayPhase, MapOracle, TerrainKind};

/// Optional knobs for [`CreatureManager::spawn_creature`]
#[derive(Debug, Clone, Default)]
pub struct SpawnOptions {
    /// Tier 1-5; defaults to 1, clamped into range
    pub tier: Option<u8>,
    pub pack_id: Option<PackId>,
    pub den_id: Option<DenId>,
}

/// Owner of all individual creature state
pub struct CreatureManager {
    creatures: AHashMap<CreatureId, Creature>,
    templates: AHashMap<String, CreatureTemplate>,
    config: EcosystemConfig,
    rng: ChaCha8Rng,
}

impl CreatureManager {
    pub fn new(config: EcosystemConfig, rng: ChaCha8Rng) -> Self {
        Self {
            creatures: AHashMap::new(),
            templates: builtin_templates(),
            config,
            rng,
        }
    }

    /// Register an additional species template (host-defined)
    pub fn register_template(&mut self, template: CreatureTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn template(&self, template_id: &str) -> Option<&CreatureTemplate> {
        self.templates.get(template_id)
    }

    // ========================================================================
    // Spawning
    // ========================================================================

    /// Spawn one creature from a template. Returns None for unknown
    /// templates. Base stats are multiplied by the tier multiplier.
    pub fn spawn_creature(
        &mut self,
        template_id: &str,
        position: TilePos,
        options: SpawnOptions,
        clock: Tick,
        events: &mut dyn EventSink,
    ) -> Option<CreatureId> {
        let template = self.templates.get(template_id)?.clone();
        let tier = options.tier.unwrap_or(MIN_TIER).clamp(MIN_TIER, MAX_TIER);
        let mult = crate::core::types::tier_multiplier(tier);

        let mut stats = template.base_stats;
        stats.attack *= mult;
        stats.defense *= mult;
        stats.strength *= mult;
        stats.agility *= mult;
        stats.vitality *= mult;
        stats.cunning *= mult;
        // Speed stays unscaled: high-tier creatures hit harder, not faster

        let max_hp = template.base_hp * mult;
        let id = CreatureId::new();
        let creature = Creature {
            id,
            template_id: template.id.clone(),
            name: template.name.clone(),
            tier,
            kind: template.kind,
            archetype: template.archetype,
            state: CreatureState::Roaming,
            position,
            spawn_origin: position,
            hp: max_hp,
            max_hp,
            stats,
            loot_table: template.loot_table.clone(),
            habitat: template.habitat.clone(),
            active_time: template.active_time,
            pack_id: options.pack_id,
            den_id: options.den_id,
            respawn_at: None,
            last_action: clock,
            flee_dir: (0, 0),
            production: template.production.as_ref().map(|(item, interval)| {
                ProductionSchedule {
                    item_type: item.clone(),
                    interval: *interval,
                    last_produced: clock,
                }
            }),
        };

        events.publish(WorldEvent::CreatureSpawned {
            creature_id: id,
            template_id: creature.template_id.clone(),
            kind: format!("{:?}", creature.kind),
            tier,
            name: creature.name.clone(),
            position,
        });
        tracing::debug!(template = template_id, tier, ?position, "creature spawned");

        self.creatures.insert(id, creature);
        Some(id)
    }

    /// Periodic world spawning: sample chunks, skip settlement safe zones,
    /// roll a biome/time-eligible template, and place it on a valid tile.
    fn spawning_pass(&mut self, clock: Tick, map: &dyn MapOracle, events: &mut dyn EventSink) {
        if self.count_alive() >= self.config.max_creatures {
            return;
        }
        let phase = DayPhase::at_tick(clock);
        let chunk_size = self.config.chunk_size;
        let world_r = self.config.world_radius_chunks;

        for _ in 0..self.config.spawn_chunks_per_pass {
            let cx = self.rng.gen_range(-world_r..=world_r);
            let cy = self.rng.gen_range(-world_r..=world_r);
            let chunk_center = TilePos::new(
                self.config.world_center.x + cx * chunk_size + chunk_size / 2,
                self.config.world_center.y + cy * chunk_size + chunk_size / 2,
            );

            // Settlement safe zones suppress all spawning
            let safe = self
                .config
                .settlements
                .iter()
                .any(|s| s.distance(&chunk_center) < self.config.safe_zone_radius);
            if safe {
                continue;
            }

            let Some(center_tile) = map.tile(chunk_center.x, chunk_center.y) else {
                continue;
            };

            // Weighted lottery over templates eligible for this biome and
            // time of day. Sorted so the roll consumption is stable across
            // runs with the same seed.
            let mut candidates: Vec<(String, u32)> = self
                .templates
                .values()
                .filter(|t| t.habitat.contains(&center_tile.biome))
                .filter(|t| match t.active_time {
                    crate::creature::ActiveTime::Any => true,
                    crate::creature::ActiveTime::Day => phase == DayPhase::Day,
                    crate::creature::ActiveTime::Night => phase == DayPhase::Night,
                })
                .map(|t| (t.id.clone(), t.spawn_weight))
                .collect();
            candidates.sort();
            let total: u32 = candidates.iter().map(|(_, w)| w).sum();
            if total == 0 {
                continue;
            }
            let mut roll = self.rng.gen_range(0..total);
            let mut chosen = None;
            for (id, weight) in &candidates {
                if roll < *weight {
                    chosen = Some(id.clone());
                    break;
                }
                roll -= weight;
            }
            let Some(template_id) = chosen else { continue };

            // Tier band: only weak creatures near the world center
            let dist_chunks = ((cx * cx + cy * cy) as f32).sqrt();
            let allowed = self.config.allowed_tiers(dist_chunks);
            let tier = allowed[self.rng.gen_range(0..allowed.len())];

            if let Some(pos) = self.find_spawn_tile(chunk_center, map) {
                let options = SpawnOptions { tier: Some(tier), ..Default::default() };
                self.spawn_creature(&template_id, pos, options, clock, events);
                if self.count_alive() >= self.config.max_creatures {
                    return;
                }
            }
            // No valid tile after bounded attempts: give up silently
        }
    }

    /// Bounded sampling for a walkable, non-mountain, non-water tile near
    /// `center`
    fn find_spawn_tile(&mut self, center: TilePos, map: &dyn MapOracle) -> Option<TilePos> {
        let half = self.config.chunk_size / 2;
        for _ in 0..self.config.placement_attempts {
            let pos = center.offset(
                self.rng.gen_range(-half..=half),
                self.rng.gen_range(-half..=half),
            );
            if let Some(tile) = map.tile(pos.x, pos.y) {
                if tile.walkable && !matches!(tile.kind, TerrainKind::Rock | TerrainKind::Water) {
                    return Some(pos);
                }
            }
        }
        None
    }

    // ========================================================================
    // Behavior
    // ========================================================================

    /// Advance the per-creature behavior state machine
    fn behavior_pass(&mut self, clock: Tick, map: &dyn MapOracle) {
        let phase = DayPhase::at_tick(clock);
        let mut ids: Vec<CreatureId> = self
            .creatures
            .values()
            .filter(|c| c.is_alive())
            .map(|c| c.id)
            .collect();
        ids.sort();

        let hunt_escalation = self.config.hunt_escalation_chance;
        let hunt_giveup = self.config.hunt_giveup_chance;
        let wake = self.config.wake_chance;
        let flee_step = self.config.flee_speed as i32;
        let flee_duration = self.config.flee_duration;

        for id in ids {
            // Probability rolls drawn up-front so the borrow of the record
            // stays exclusive below
            let roll: f64 = self.rng.gen();
            let dx = self.rng.gen_range(-1..=1);
            let dy = self.rng.gen_range(-1..=1);

            let Some(creature) = self.creatures.get_mut(&id) else { continue };

            // Off-hours creatures sleep; fleeing overrides the nap
            if !creature.is_active_at(phase) && creature.state != CreatureState::Fleeing {
                creature.state = CreatureState::Resting;
                continue;
            }

            match creature.state {
                CreatureState::Roaming => {
                    let next = creature.position.offset(dx, dy);
                    if Self::tile_in_habitat(creature, next, map) {
                        creature.position = next;
                    }
                    if creature.archetype == BehaviorArchetype::Aggressive
                        && roll < hunt_escalation
                    {
                        creature.state = CreatureState::Hunting;
                        creature.last_action = clock;
                    }
                }
                CreatureState::Hunting => {
                    let next = creature.position.offset(dx, dy);
                    if map.is_walkable(next.x, next.y) {
                        creature.position = next;
                    }
                    if roll < hunt_giveup {
                        creature.state = CreatureState::Roaming;
                        creature.last_action = clock;
                    }
                }
                CreatureState::Resting | CreatureState::Guarding => {
                    if roll < wake {
                        creature.state = CreatureState::Roaming;
                        creature.last_action = clock;
                    }
                }
                CreatureState::Fleeing => {
                    // Forced retreat along the direction set when the threat
                    // was sighted; a fright with no known source still never
                    // stands still
                    let (fx, fy) = match creature.flee_dir {
                        (0, 0) => (if dx == 0 && dy == 0 { 1 } else { dx }, dy),
                        dir => dir,
                    };
                    let next = creature.position.offset(fx * flee_step, fy * flee_step);
                    if map.is_walkable(next.x, next.y) {
                        creature.position = next;
                    }
                    if clock.saturating_sub(creature.last_action) >= flee_duration {
                        creature.state = CreatureState::Roaming;
                        creature.flee_dir = (0, 0);
                        creature.last_action = clock;
                    }
                }
                CreatureState::Dead => {}
            }
        }
    }

    fn tile_in_habitat(creature: &Creature, pos: TilePos, map: &dyn MapOracle) -> bool {
        match map.tile(pos.x, pos.y) {
            Some(tile) => tile.walkable && creature.habitat.contains(&tile.biome),
            None => false,
        }
    }

    /// Wolves notice nearby roaming rabbits and deer. A hard-coded
    /// predator/prey rule, not a general relation table.
    fn predator_prey_pass(&mut self, clock: Tick) {
        let radius = self.config.predator_sense_radius;
        let mut wolves: Vec<(CreatureId, TilePos)> = self
            .creatures
            .values()
            .filter(|c| c.is_alive() && c.template_id == "wolf")
            .map(|c| (c.id, c.position))
            .collect();
        wolves.sort_by_key(|(id, _)| *id);
        let mut prey: Vec<(CreatureId, TilePos)> = self
            .creatures
            .values()
            .filter(|c| {
                c.state == CreatureState::Roaming
                    && (c.template_id == "rabbit" || c.template_id == "deer")
            })
            .map(|c| (c.id, c.position))
            .collect();
        // Sorted so distance ties resolve the same way every run
        prey.sort_by_key(|(id, _)| *id);

        for (wolf_id, wolf_pos) in wolves {
            let target = prey
                .iter()
                .filter(|(_, p)| wolf_pos.distance(p) <= radius)
                .min_by(|(_, a), (_, b)| {
                    wolf_pos.distance(a).partial_cmp(&wolf_pos.distance(b)).unwrap()
                });
            if let Some(&(prey_id, prey_pos)) = target {
                if let Some(wolf) = self.creatures.get_mut(&wolf_id) {
                    wolf.state = CreatureState::Hunting;
                }
                // Flight heads directly away from the wolf; a shared tile
                // gets an arbitrary axis
                let mut dir = (
                    (prey_pos.x - wolf_pos.x).signum(),
                    (prey_pos.y - wolf_pos.y).signum(),
                );
                if dir == (0, 0) {
                    dir = (1, 0);
                }
                if let Some(victim) = self.creatures.get_mut(&prey_id) {
                    if victim.state == CreatureState::Roaming {
                        victim.state = CreatureState::Fleeing;
                        victim.flee_dir = dir;
                        victim.last_action = clock;
                    }
                }
            }
        }
    }

    /// Animals with a production schedule emit their resource periodically
    fn production_pass(&mut self, clock: Tick, events: &mut dyn EventSink) {
        let mut ids: Vec<CreatureId> = self
            .creatures
            .values()
            .filter(|c| c.is_alive() && c.is_animal() && c.production.is_some())
            .map(|c| c.id)
            .collect();
        ids.sort();

        for id in ids {
            let Some(creature) = self.creatures.get_mut(&id) else { continue };
            if let Some(schedule) = creature.production.as_mut() {
                if clock.saturating_sub(schedule.last_produced) >= schedule.interval {
                    schedule.last_produced = clock;
                    events.publish(WorldEvent::CreatureProduced {
                        creature_id: creature.id,
                        item_type: schedule.item_type.clone(),
                        position: creature.position,
                    });
                }
            }
        }
    }

    // ========================================================================
    // Death and respawn
    // ========================================================================

    /// Mark a creature dead and roll its loot table. Returns the flattened
    /// loot, or None if the id is unknown or already dead.
    pub fn kill_creature(
        &mut self,
        id: CreatureId,
        killer: Option<CreatureId>,
        events: &mut dyn EventSink,
    ) -> Option<Vec<String>> {
        // Loot rolls need &mut rng while the creature is borrowed, so
        // snapshot the table first
        let (table, template_id, name, position) = {
            let creature = self.creatures.get(&id)?;
            if !creature.is_alive() {
                return None;
            }
            (
                creature.loot_table.clone(),
                creature.template_id.clone(),
                creature.name.clone(),
                creature.position,
            )
        };

        let mut drops = Vec::new();
        for entry in &table {
            if self.rng.gen::<f64>() < entry.chance {
                let quantity = self.rng.gen_range(entry.quantity_min..=entry.quantity_max);
                for _ in 0..quantity {
                    drops.push(entry.item_type.clone());
                }
            }
        }

        let creature = self.creatures.get_mut(&id)?;
        creature.hp = 0.0;
        creature.state = CreatureState::Dead;

        events.publish(WorldEvent::CreatureDied {
            creature_id: id,
            template_id,
            name,
            killed_by: killer,
            loot: drops.clone(),
            position,
        });
        Some(drops)
    }

    /// Mark a dead creature for revival at `at`; without this it stays dead
    /// until removed
    pub fn schedule_respawn(&mut self, id: CreatureId, at: Tick) -> bool {
        match self.creatures.get_mut(&id) {
            Some(c) if !c.is_alive() => {
                c.respawn_at = Some(at);
                true
            }
            _ => false,
        }
    }

    /// Delete a creature record outright (no event; the death event already
    /// fired)
    pub fn remove_creature(&mut self, id: CreatureId) -> bool {
        self.creatures.remove(&id).is_some()
    }

    /// Revive dead creatures whose respawn timestamp has elapsed
    fn respawn_pass(&mut self, clock: Tick, map: &dyn MapOracle) {
        let mut due: Vec<CreatureId> = self
            .creatures
            .values()
            .filter(|c| !c.is_alive() && c.respawn_at.map(|t| t <= clock).unwrap_or(false))
            .map(|c| c.id)
            .collect();
        due.sort();

        for id in due {
            let origin = self.creatures[&id].spawn_origin;
            let landing = self
                .find_spawn_tile(origin, map)
                .unwrap_or(self.creatures[&id].position);
            if let Some(creature) = self.creatures.get_mut(&id) {
                creature.position = landing;
                creature.hp = creature.max_hp;
                creature.state = CreatureState::Roaming;
                creature.flee_dir = (0, 0);
                creature.respawn_at = None;
                creature.last_action = clock;
                tracing::debug!(?id, ?landing, "creature respawned");
            }
        }
    }

    // ========================================================================
    // Tick entry point
    // ========================================================================

    /// Advance one world tick
    pub fn tick(&mut self, clock: Tick, map: &dyn MapOracle, events: &mut dyn EventSink) {
        if clock % self.config.spawn_interval == 0 {
            self.spawning_pass(clock, map, events);
        }
        self.respawn_pass(clock, map);
        if clock % self.config.behavior_interval == 0 {
            self.behavior_pass(clock, map);
            self.predator_prey_pass(clock);
        }
        self.production_pass(clock, events);
    }

    // ========================================================================
    // Query surface
    // ========================================================================

    pub fn get_creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.get(&id)
    }

    pub fn get_creature_mut(&mut self, id: CreatureId) -> Option<&mut Creature> {
        self.creatures.get_mut(&id)
    }

    pub fn all_creatures(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.values()
    }

    pub fn alive_creatures(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.values().filter(|c| c.is_alive())
    }

    pub fn count_alive(&self) -> usize {
        self.alive_creatures().count()
    }

    /// Living creatures within `radius` of `pos`
    pub fn creatures_in_radius(&self, pos: TilePos, radius: f32) -> Vec<&Creature> {
        self.creatures
            .values()
            .filter(|c| c.is_alive() && c.position.distance(&pos) <= radius)
            .collect()
    }

    pub fn creatures_by_kind(&self, kind: CreatureKind) -> Vec<&Creature> {
        self.creatures
            .values()
            .filter(|c| c.is_alive() && c.kind == kind)
            .collect()
    }

    /// Human-readable survey of living creatures around a position.
    /// Presentation only; not part of the behavioral contract.
    pub fn describe_nearby(&self, pos: TilePos, radius: f32) -> String {
        let mut nearby = self.creatures_in_radius(pos, radius);
        if nearby.is_empty() {
            return "No creatures nearby.".to_string();
        }
        nearby.sort_by(|a, b| {
            a.position
                .distance(&pos)
                .partial_cmp(&b.position.distance(&pos))
                .unwrap()
        });
        let lines: Vec<String> = nearby
            .iter()
            .take(10)
            .map(|c| {
                format!(
                    "- {} (tier {}, {:?}) at ({}, {}), {:.0}/{:.0} hp",
                    c.name, c.tier, c.state, c.position.x, c.position.y, c.hp, c.max_hp
                )
            })
            .collect();
        format!("Creatures within {:.0} tiles:\n{}", radius, lines.join("\n"))
    }
}
