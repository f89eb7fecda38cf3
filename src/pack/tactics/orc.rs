//! Orc warband tactics - wide-ranging aggressors
//!
//! Warbands roam far past their own borders looking for anything that
//! belongs to another pack or a den, and wounded orcs only get faster.

use crate::events::WorldEvent;
use crate::pack::{Pack, PackState};

use super::{move_member_toward, nearest_outsider, promote_leader, random_point_within, TacticCtx, TacticOutcome};

/// Morale lost when the warchief falls
const SUCCESSION_MORALE_LOSS: i32 = 20;
/// Warbands patrol wider than their nominal territory
const PATROL_RADIUS_MULT: f32 = 1.2;
/// And scan even wider for something to raid
const RAID_SCAN_MULT: f32 = 1.5;
/// Below half hp an orc charges at double speed
const BERSERK_HP_RATIO: f32 = 0.5;
const BERSERK_SPEED_MULT: f32 = 2.0;

pub fn tick(pack: &mut Pack, ctx: &mut TacticCtx) -> TacticOutcome {
    // Succession by strength of arm
    if !ctx.creatures.is_living(pack.leader_id) {
        if !promote_leader(pack, ctx, |c| c.stats.attack) {
            return TacticOutcome::Disband("no_survivors");
        }
        pack.adjust_morale(-SUCCESSION_MORALE_LOSS);
    }

    match pack.state {
        PackState::Idle | PackState::Hunting | PackState::Fleeing => {
            // Warbands are never still and never rout on their own
            pack.state = PackState::Patrolling;
        }
        PackState::Patrolling => {
            for id in pack.all_ids() {
                let point = random_point_within(
                    ctx.rng,
                    pack.territory_center,
                    pack.territory_radius * PATROL_RADIUS_MULT,
                );
                move_member_toward(ctx, id, point, 1.0);
            }
            // Anything sworn to another pack or holed up in a den is a
            // target
            let own = pack.id;
            let quarry = nearest_outsider(
                ctx,
                pack,
                pack.territory_center,
                pack.territory_radius * RAID_SCAN_MULT,
                |c| c.pack_id.map(|p| p != own).unwrap_or(false) || c.den_id.is_some(),
            );
            if let Some((target, _)) = quarry {
                pack.state = PackState::Raiding;
                pack.target_id = Some(target);
            }
        }
        PackState::Raiding => {
            let target_pos = pack.target_id.and_then(|t| ctx.creatures.position_of(t));
            let (Some(target), Some(pos)) = (pack.target_id, target_pos) else {
                pack.state = PackState::Patrolling;
                pack.target_id = None;
                pack.flankers = 0;
                return TacticOutcome::Continue;
            };

            // Berserker rule: the bloodied charge hardest
            for id in pack.all_ids() {
                let berserk = ctx
                    .creatures
                    .creature(id)
                    .map(|c| c.hp < c.max_hp * BERSERK_HP_RATIO)
                    .unwrap_or(false);
                let mult = if berserk { BERSERK_SPEED_MULT } else { 1.0 };
                move_member_toward(ctx, id, pos, mult);
            }

            let flankers = pack
                .all_ids()
                .iter()
                .filter_map(|&id| ctx.creatures.position_of(id))
                .filter(|p| p.is_adjacent(&pos))
                .count();
            pack.flankers = flankers;
            if flankers > 0 {
                ctx.events.publish(WorldEvent::PackHunt {
                    pack_id: pack.id,
                    target_id: target,
                    position: pos,
                    flankers,
                });
            }
        }
    }

    TacticOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EcosystemConfig;
    use crate::core::types::{CreatureId, PackId, TilePos};
    use crate::events::EventLog;
    use crate::pack::tactics::test_support::StubRegistry;
    use crate::pack::{CreatureAccess, PackType};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_pack(leader: CreatureId, members: Vec<CreatureId>) -> Pack {
        Pack {
            id: PackId(4),
            pack_type: PackType::OrcWarband,
            leader_id: leader,
            member_ids: members,
            territory_center: TilePos::new(0, 0),
            territory_radius: 15.0,
            morale: 60,
            state: PackState::Patrolling,
            target_id: None,
            flankers: 0,
            last_action: 0,
            last_regen: 0,
        }
    }

    fn run_tick(pack: &mut Pack, registry: &mut StubRegistry, log: &mut EventLog) -> TacticOutcome {
        let config = EcosystemConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut ctx = TacticCtx {
            clock: 5,
            config: &config,
            rng: &mut rng,
            creatures: registry,
            events: log,
        };
        tick(pack, &mut ctx)
    }

    #[test]
    fn test_succession_by_attack() {
        let mut registry = StubRegistry::default();
        let chief = registry.add("orc", TilePos::new(0, 0), 60.0);
        let strong = registry.add_with("orc", TilePos::new(1, 0), 30.0, |c| c.stats.attack = 15.0);
        let tough = registry.add_with("orc", TilePos::new(2, 0), 60.0, |c| c.stats.attack = 8.0);
        registry.creatures.get_mut(&chief).unwrap().take_damage(999.0);

        let mut pack = test_pack(chief, vec![strong, tough]);
        let mut log = EventLog::new();
        run_tick(&mut pack, &mut registry, &mut log);

        // Highest attack wins even at lower hp
        assert_eq!(pack.leader_id, strong);
        assert_eq!(pack.morale, 40);
    }

    #[test]
    fn test_raids_only_affiliated_creatures() {
        let mut registry = StubRegistry::default();
        let chief = registry.add("orc", TilePos::new(0, 0), 60.0);
        let a = registry.add("orc", TilePos::new(1, 0), 60.0);
        let b = registry.add("orc", TilePos::new(2, 0), 60.0);
        // A loose deer is beneath a warband's notice
        registry.add("deer", TilePos::new(5, 0), 25.0);
        let rival = registry.add_with("wolf", TilePos::new(10, 0), 40.0, |c| {
            c.pack_id = Some(PackId(99));
        });

        let mut pack = test_pack(chief, vec![a, b]);
        let mut log = EventLog::new();
        run_tick(&mut pack, &mut registry, &mut log);

        assert_eq!(pack.state, PackState::Raiding);
        assert_eq!(pack.target_id, Some(rival));
    }

    #[test]
    fn test_berserkers_close_twice_as_fast() {
        let mut registry = StubRegistry::default();
        let chief = registry.add("orc", TilePos::new(0, 0), 60.0);
        let hale = registry.add("orc", TilePos::new(0, 10), 60.0);
        let bloodied = registry.add_with("orc", TilePos::new(0, 20), 60.0, |c| c.hp = 20.0);
        let quarry = registry.add_with("wolf", TilePos::new(0, 40), 40.0, |c| {
            c.pack_id = Some(PackId(99));
        });

        let mut pack = test_pack(chief, vec![hale, bloodied]);
        pack.state = PackState::Raiding;
        pack.target_id = Some(quarry);

        let mut log = EventLog::new();
        let hale_before = registry.creature(hale).unwrap().position;
        let bloodied_before = registry.creature(bloodied).unwrap().position;
        run_tick(&mut pack, &mut registry, &mut log);

        let hale_moved = hale_before.distance(&registry.creature(hale).unwrap().position);
        let bloodied_moved =
            bloodied_before.distance(&registry.creature(bloodied).unwrap().position);
        assert!(bloodied_moved > hale_moved * 1.5);
    }

    #[test]
    fn test_lost_target_resumes_patrol() {
        let mut registry = StubRegistry::default();
        let chief = registry.add("orc", TilePos::new(0, 0), 60.0);
        let a = registry.add("orc", TilePos::new(1, 0), 60.0);
        let b = registry.add("orc", TilePos::new(2, 0), 60.0);

        let mut pack = test_pack(chief, vec![a, b]);
        pack.state = PackState::Raiding;
        pack.target_id = Some(CreatureId::new());

        let mut log = EventLog::new();
        run_tick(&mut pack, &mut registry, &mut log);
        assert_eq!(pack.state, PackState::Patrolling);
        assert!(pack.target_id.is_none());
    }
}
