//! PackManager - owns all pack records
//!
//! Creates packs explicitly or by spatial clustering, runs the throttled
//! group tick (morale upkeep, viability checks, tactic dispatch), and keeps
//! the registry free of dead weight by disbanding non-viable packs.

use ahash::AHashMap;
use rand_chacha::ChaCha8Rng;

use crate::core::config::EcosystemConfig;
use crate::core::types::{CreatureId, PackId, Tick, TilePos};
use crate::events::{EventSink, WorldEvent};
use crate::pack::tactics::{self, TacticCtx, TacticOutcome};
use crate::pack::{CreatureAccess, Pack, PackState, PackType};

/// Morale for freshly formed packs
const INITIAL_MORALE: i32 = 70;

/// Owner of all pack state
pub struct PackManager {
    packs: AHashMap<PackId, Pack>,
    next_pack_id: u32,
    config: EcosystemConfig,
    rng: ChaCha8Rng,
}

impl PackManager {
    pub fn new(config: EcosystemConfig, rng: ChaCha8Rng) -> Self {
        Self {
            packs: AHashMap::new(),
            next_pack_id: 1,
            config,
            rng,
        }
    }

    fn next_id(&mut self) -> PackId {
        let id = PackId(self.next_pack_id);
        self.next_pack_id += 1;
        id
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    /// Create a pack and stamp the affiliation onto its creatures
    pub fn create_pack(
        &mut self,
        pack_type: PackType,
        leader_id: CreatureId,
        member_ids: Vec<CreatureId>,
        territory_center: TilePos,
        clock: Tick,
        creatures: &mut dyn CreatureAccess,
        events: &mut dyn EventSink,
    ) -> PackId {
        let id = self.next_id();
        let member_count = member_ids.len() + 1;
        let pack = Pack {
            id,
            pack_type,
            leader_id,
            member_ids,
            territory_center,
            territory_radius: self.config.territory_radius,
            morale: INITIAL_MORALE,
            state: PackState::Idle,
            target_id: None,
            flankers: 0,
            last_action: clock,
            last_regen: clock,
        };
        for member in pack.all_ids() {
            if let Some(creature) = creatures.creature_mut(member) {
                creature.pack_id = Some(id);
            }
        }
        events.publish(WorldEvent::PackFormed {
            pack_id: id,
            pack_type: pack_type.as_str().to_string(),
            leader_id,
            member_count,
            territory: territory_center,
        });
        tracing::debug!(pack = id.0, pack_type = pack_type.as_str(), member_count, "pack formed");
        self.packs.insert(id, pack);
        id
    }

    /// Delete a pack and clear its creatures' affiliation. Disbanded packs
    /// are not archived.
    pub fn disband_pack(
        &mut self,
        id: PackId,
        reason: &str,
        creatures: &mut dyn CreatureAccess,
        events: &mut dyn EventSink,
    ) -> bool {
        let Some(pack) = self.packs.remove(&id) else {
            return false;
        };
        for member in pack.all_ids() {
            if let Some(creature) = creatures.creature_mut(member) {
                if creature.pack_id == Some(id) {
                    creature.pack_id = None;
                }
            }
        }
        events.publish(WorldEvent::PackDisbanded {
            pack_id: id,
            pack_type: pack.pack_type.as_str().to_string(),
            reason: reason.to_string(),
        });
        tracing::debug!(pack = id.0, reason, "pack disbanded");
        true
    }

    /// Add a living, unaffiliated creature of a matching species
    pub fn add_member(
        &mut self,
        pack_id: PackId,
        creature_id: CreatureId,
        creatures: &mut dyn CreatureAccess,
    ) -> bool {
        let Some(pack) = self.packs.get_mut(&pack_id) else {
            return false;
        };
        let eligible = creatures
            .creature(creature_id)
            .map(|c| {
                c.is_alive()
                    && c.pack_id.is_none()
                    && pack.pack_type.accepts_template(&c.template_id)
            })
            .unwrap_or(false);
        if !eligible || pack.contains(creature_id) {
            return false;
        }
        pack.member_ids.push(creature_id);
        if let Some(creature) = creatures.creature_mut(creature_id) {
            creature.pack_id = Some(pack_id);
        }
        true
    }

    /// Drop a member (not the leader) from a pack
    pub fn remove_member(
        &mut self,
        pack_id: PackId,
        creature_id: CreatureId,
        creatures: &mut dyn CreatureAccess,
    ) -> bool {
        let Some(pack) = self.packs.get_mut(&pack_id) else {
            return false;
        };
        let before = pack.member_ids.len();
        pack.member_ids.retain(|&m| m != creature_id);
        if pack.member_ids.len() == before {
            return false;
        }
        if let Some(creature) = creatures.creature_mut(creature_id) {
            if creature.pack_id == Some(pack_id) {
                creature.pack_id = None;
            }
        }
        true
    }

    // ========================================================================
    // Auto-formation
    // ========================================================================

    /// Band spatially clustered, pack-less creatures into new packs.
    ///
    /// Single-link clustering: a creature joins a cluster when it is within
    /// the cluster radius of any current cluster member. Clusters of
    /// `pack_min_size` or more become packs led by their highest-hp member.
    pub fn try_form_packs(
        &mut self,
        clock: Tick,
        creatures: &mut dyn CreatureAccess,
        events: &mut dyn EventSink,
    ) -> Vec<PackId> {
        let mut formed = Vec::new();
        for pack_type in PackType::ALL {
            let mut loose: Vec<(CreatureId, TilePos, f32)> = creatures
                .living_ids()
                .into_iter()
                .filter_map(|id| creatures.creature(id))
                .filter(|c| c.pack_id.is_none() && pack_type.accepts_template(&c.template_id))
                .map(|c| (c.id, c.position, c.hp))
                .collect();

            while let Some(seed) = loose.pop() {
                // Grow the cluster by single linkage
                let mut cluster = vec![seed];
                let mut frontier = vec![seed];
                while let Some((_, pos, _)) = frontier.pop() {
                    let mut i = 0;
                    while i < loose.len() {
                        if loose[i].1.distance(&pos) <= self.config.pack_cluster_radius {
                            let joined = loose.swap_remove(i);
                            cluster.push(joined);
                            frontier.push(joined);
                        } else {
                            i += 1;
                        }
                    }
                }

                if cluster.len() < self.config.pack_min_size {
                    continue;
                }

                let leader = cluster
                    .iter()
                    .max_by(|a, b| a.2.partial_cmp(&b.2).unwrap())
                    .map(|(id, _, _)| *id)
                    .unwrap();
                let members: Vec<CreatureId> = cluster
                    .iter()
                    .map(|(id, _, _)| *id)
                    .filter(|&id| id != leader)
                    .collect();
                let centroid = TilePos::new(
                    cluster.iter().map(|(_, p, _)| p.x).sum::<i32>() / cluster.len() as i32,
                    cluster.iter().map(|(_, p, _)| p.y).sum::<i32>() / cluster.len() as i32,
                );

                formed.push(self.create_pack(
                    pack_type, leader, members, centroid, clock, creatures, events,
                ));
            }
        }
        formed
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance all packs. Throttled: does nothing except on multiples of
    /// the pack tick interval.
    pub fn tick(
        &mut self,
        clock: Tick,
        creatures: &mut dyn CreatureAccess,
        events: &mut dyn EventSink,
    ) {
        if clock % self.config.pack_tick_interval != 0 {
            return;
        }

        let mut ids: Vec<PackId> = self.packs.keys().copied().collect();
        ids.sort_by_key(|id| id.0);

        for id in ids {
            if let Some(pack) = self.packs.get_mut(&id) {
                // Passive morale recovery while idle, on elapsed ticks so the
                // interval works whether or not it aligns with the pack tick
                if pack.state == PackState::Idle
                    && clock.saturating_sub(pack.last_regen) >= self.config.morale_regen_interval
                {
                    pack.adjust_morale(1);
                    pack.last_regen = clock;
                }

                // Drop dead members first; the tactic layer handles the
                // leader. Clearing the affiliation here means a respawned
                // creature comes back wild instead of bound to this pack.
                let dead: Vec<CreatureId> = pack
                    .member_ids
                    .iter()
                    .copied()
                    .filter(|&m| !creatures.is_living(m))
                    .collect();
                pack.member_ids.retain(|m| !dead.contains(m));
                for member in dead {
                    if let Some(creature) = creatures.creature_mut(member) {
                        if creature.pack_id == Some(id) {
                            creature.pack_id = None;
                        }
                    }
                }
            }

            // Viability: broken morale or too few members ends the pack
            let verdict = self.packs.get(&id).map(|p| {
                if p.morale <= 0 {
                    Some("morale_collapse")
                } else if p.member_ids.len() < 2 {
                    Some("too_few_members")
                } else {
                    None
                }
            });
            match verdict {
                None => continue,
                Some(Some(reason)) => {
                    self.disband_pack(id, reason, creatures, events);
                    continue;
                }
                Some(None) => {}
            }

            // Tactic dispatch; the pack is moved out so the context can
            // borrow the manager's rng
            let Some(mut pack) = self.packs.remove(&id) else { continue };
            let outcome = {
                let mut ctx = TacticCtx {
                    clock,
                    config: &self.config,
                    rng: &mut self.rng,
                    creatures,
                    events,
                };
                tactics::tick(&mut pack, &mut ctx)
            };
            pack.last_action = clock;
            match outcome {
                TacticOutcome::Continue => {
                    // Succession can pull a member up to leader and leave the
                    // roster under strength; re-check so no non-viable pack
                    // survives the tick
                    let verdict = if pack.morale <= 0 {
                        Some("morale_collapse")
                    } else if pack.member_ids.len() < 2 {
                        Some("too_few_members")
                    } else {
                        None
                    };
                    self.packs.insert(id, pack);
                    if let Some(reason) = verdict {
                        self.disband_pack(id, reason, creatures, events);
                    }
                }
                TacticOutcome::Disband(reason) => {
                    self.packs.insert(id, pack);
                    self.disband_pack(id, reason, creatures, events);
                }
            }
        }
    }

    // ========================================================================
    // Query surface
    // ========================================================================

    pub fn get_pack(&self, id: PackId) -> Option<&Pack> {
        self.packs.get(&id)
    }

    pub fn all_packs(&self) -> impl Iterator<Item = &Pack> {
        self.packs.values()
    }

    pub fn pack_count(&self) -> usize {
        self.packs.len()
    }

    /// First pack whose territory contains the position
    pub fn pack_at_position(&self, pos: TilePos) -> Option<&Pack> {
        self.packs.values().find(|p| p.in_territory(&pos))
    }

    pub fn pack_for_creature(&self, id: CreatureId) -> Option<&Pack> {
        self.packs.values().find(|p| p.contains(id))
    }

    /// Human-readable pack roster. Presentation only.
    pub fn describe_pack(&self, id: PackId, creatures: &dyn CreatureAccess) -> Option<String> {
        let pack = self.packs.get(&id)?;
        let leader_name = creatures
            .creature(pack.leader_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "(missing)".to_string());
        let mut text = format!(
            "{} #{} - {:?}, morale {}, led by {}\n",
            pack.pack_type.as_str(),
            pack.id.0,
            pack.state,
            pack.morale,
            leader_name
        );
        text.push_str(&format!(
            "Territory: ({}, {}) radius {:.0}\n",
            pack.territory_center.x, pack.territory_center.y, pack.territory_radius
        ));
        for member in &pack.member_ids {
            match creatures.creature(*member) {
                Some(c) => text.push_str(&format!(
                    "- {} ({:.0}/{:.0} hp)\n",
                    c.name, c.hp, c.max_hp
                )),
                None => text.push_str("- (missing)\n"),
            }
        }
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::TilePos;
    use crate::events::EventLog;
    use crate::pack::tactics::test_support::StubRegistry;
    use rand::SeedableRng;

    fn test_manager() -> PackManager {
        PackManager::new(EcosystemConfig::default(), ChaCha8Rng::seed_from_u64(11))
    }

    #[test]
    fn test_form_pack_from_cluster() {
        let mut manager = test_manager();
        let mut registry = StubRegistry::default();
        let mut log = EventLog::new();

        let strong = registry.add("goblin", TilePos::new(0, 0), 30.0);
        let a = registry.add("goblin", TilePos::new(4, 0), 20.0);
        let b = registry.add("goblin", TilePos::new(0, 5), 15.0);
        // Too far away to link into the cluster
        let lone = registry.add("goblin", TilePos::new(50, 50), 25.0);

        let formed = manager.try_form_packs(0, &mut registry, &mut log);
        assert_eq!(formed.len(), 1);

        let pack = manager.get_pack(formed[0]).unwrap();
        assert_eq!(pack.pack_type, PackType::GoblinTribe);
        assert_eq!(pack.leader_id, strong);
        assert_eq!(pack.member_ids.len(), 2);
        assert!(pack.member_ids.contains(&a));
        assert!(pack.member_ids.contains(&b));
        assert!(!pack.contains(lone));
        assert_eq!(registry.creature(strong).unwrap().pack_id, Some(pack.id));
        assert!(registry.creature(lone).unwrap().pack_id.is_none());
    }

    #[test]
    fn test_no_pack_below_min_size() {
        let mut manager = test_manager();
        let mut registry = StubRegistry::default();
        let mut log = EventLog::new();
        registry.add("wolf", TilePos::new(0, 0), 40.0);
        registry.add("wolf", TilePos::new(3, 0), 40.0);

        assert!(manager.try_form_packs(0, &mut registry, &mut log).is_empty());
    }

    #[test]
    fn test_affiliated_creatures_not_reclustered() {
        let mut manager = test_manager();
        let mut registry = StubRegistry::default();
        let mut log = EventLog::new();
        for i in 0..3 {
            registry.add("orc", TilePos::new(i, 0), 60.0);
        }
        assert_eq!(manager.try_form_packs(0, &mut registry, &mut log).len(), 1);
        // Second pass finds nobody loose
        assert!(manager.try_form_packs(0, &mut registry, &mut log).is_empty());
    }

    #[test]
    fn test_understrength_pack_disbands_on_tick() {
        let mut manager = test_manager();
        let mut registry = StubRegistry::default();
        let mut log = EventLog::new();

        let leader = registry.add("wolf", TilePos::new(0, 0), 40.0);
        let a = registry.add("wolf", TilePos::new(1, 0), 40.0);
        let b = registry.add("wolf", TilePos::new(2, 0), 40.0);
        let id = manager.create_pack(
            PackType::WolfPack,
            leader,
            vec![a, b],
            TilePos::new(0, 0),
            0,
            &mut registry,
            &mut log,
        );

        // A member dies, leaving one: below the viability floor
        registry.creatures.get_mut(&a).unwrap().take_damage(999.0);
        manager.tick(5, &mut registry, &mut log);

        assert!(manager.get_pack(id).is_none());
        assert!(registry.creature(b).unwrap().pack_id.is_none());
        assert!(log.events.iter().any(|e| matches!(
            &e.event,
            WorldEvent::PackDisbanded { reason, .. } if reason == "too_few_members"
        )));
    }

    #[test]
    fn test_morale_collapse_disbands() {
        let mut manager = test_manager();
        let mut registry = StubRegistry::default();
        let mut log = EventLog::new();

        let leader = registry.add("bandit", TilePos::new(0, 0), 35.0);
        let a = registry.add("bandit", TilePos::new(1, 0), 35.0);
        let b = registry.add("bandit", TilePos::new(2, 0), 35.0);
        let id = manager.create_pack(
            PackType::BanditGang,
            leader,
            vec![a, b],
            TilePos::new(0, 0),
            0,
            &mut registry,
            &mut log,
        );
        manager.packs.get_mut(&id).unwrap().morale = 0;

        manager.tick(5, &mut registry, &mut log);
        assert!(manager.get_pack(id).is_none());
    }

    #[test]
    fn test_tick_is_throttled() {
        let mut manager = test_manager();
        let mut registry = StubRegistry::default();
        let mut log = EventLog::new();

        let leader = registry.add("wolf", TilePos::new(0, 0), 40.0);
        let a = registry.add("wolf", TilePos::new(1, 0), 40.0);
        let id = manager.create_pack(
            PackType::WolfPack,
            leader,
            vec![a],
            TilePos::new(0, 0),
            0,
            &mut registry,
            &mut log,
        );

        // Off-interval tick leaves even a non-viable pack alone
        manager.tick(3, &mut registry, &mut log);
        assert!(manager.get_pack(id).is_some());
        manager.tick(5, &mut registry, &mut log);
        assert!(manager.get_pack(id).is_none());
    }

    #[test]
    fn test_idle_morale_regen() {
        let mut manager = test_manager();
        let mut registry = StubRegistry::default();
        let mut log = EventLog::new();

        let leader = registry.add("wolf", TilePos::new(0, 0), 40.0);
        let a = registry.add("wolf", TilePos::new(1, 0), 40.0);
        let b = registry.add("wolf", TilePos::new(2, 0), 40.0);
        let id = manager.create_pack(
            PackType::WolfPack,
            leader,
            vec![a, b],
            TilePos::new(0, 0),
            0,
            &mut registry,
            &mut log,
        );
        manager.packs.get_mut(&id).unwrap().morale = 50;

        manager.tick(20, &mut registry, &mut log);
        // +1 regen applied before the tactic ran
        let pack = manager.get_pack(id).unwrap();
        assert!(pack.morale >= 51);
    }

    #[test]
    fn test_pruned_member_loses_affiliation() {
        let mut manager = test_manager();
        let mut registry = StubRegistry::default();
        let mut log = EventLog::new();

        let leader = registry.add("wolf", TilePos::new(0, 0), 40.0);
        let a = registry.add("wolf", TilePos::new(1, 0), 40.0);
        let b = registry.add("wolf", TilePos::new(2, 0), 40.0);
        let c = registry.add("wolf", TilePos::new(3, 0), 40.0);
        let id = manager.create_pack(
            PackType::WolfPack,
            leader,
            vec![a, b, c],
            TilePos::new(0, 0),
            0,
            &mut registry,
            &mut log,
        );

        registry.creatures.get_mut(&b).unwrap().take_damage(999.0);
        manager.tick(5, &mut registry, &mut log);

        let pack = manager.get_pack(id).expect("two members keep the pack viable");
        assert!(!pack.member_ids.contains(&b));
        assert!(registry.creatures[&b].pack_id.is_none());
        assert_eq!(registry.creatures[&a].pack_id, Some(id));
    }

    #[test]
    fn test_regen_tracks_elapsed_ticks() {
        // 7 does not divide 20, so clock-aligned regen would never fire
        let config = EcosystemConfig {
            pack_tick_interval: 7,
            ..EcosystemConfig::default()
        };
        let mut manager = PackManager::new(config, ChaCha8Rng::seed_from_u64(11));
        let mut registry = StubRegistry::default();
        let mut log = EventLog::new();

        let leader = registry.add("wolf", TilePos::new(0, 0), 40.0);
        let a = registry.add("wolf", TilePos::new(1, 0), 40.0);
        let b = registry.add("wolf", TilePos::new(2, 0), 40.0);
        let id = manager.create_pack(
            PackType::WolfPack,
            leader,
            vec![a, b],
            TilePos::new(0, 0),
            0,
            &mut registry,
            &mut log,
        );
        manager.packs.get_mut(&id).unwrap().morale = 50;

        manager.tick(7, &mut registry, &mut log);
        manager.tick(14, &mut registry, &mut log);
        assert_eq!(manager.get_pack(id).unwrap().morale, 50);

        let pack = manager.packs.get_mut(&id).unwrap();
        pack.state = PackState::Idle;
        manager.tick(21, &mut registry, &mut log);
        assert_eq!(manager.get_pack(id).unwrap().morale, 51);
    }

    #[test]
    fn test_queries() {
        let mut manager = test_manager();
        let mut registry = StubRegistry::default();
        let mut log = EventLog::new();

        let leader = registry.add("orc", TilePos::new(0, 0), 60.0);
        let a = registry.add("orc", TilePos::new(1, 0), 60.0);
        let id = manager.create_pack(
            PackType::OrcWarband,
            leader,
            vec![a],
            TilePos::new(0, 0),
            0,
            &mut registry,
            &mut log,
        );

        assert!(manager.pack_at_position(TilePos::new(5, 5)).is_some());
        assert!(manager.pack_at_position(TilePos::new(100, 100)).is_none());
        assert_eq!(manager.pack_for_creature(a).unwrap().id, id);
        assert!(manager.pack_for_creature(CreatureId::new()).is_none());
        assert!(manager.describe_pack(id, &registry).unwrap().contains("orc_warband"));
    }
}
