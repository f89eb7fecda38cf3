//! Goblin tribe tactics - chief-centered raiders
//!
//! Everything revolves around the chief's nerve. A confident tribe raids
//! with a scout vanguard; a wavering one patrols close to home; a broken
//! one runs.

use rand::Rng;

use crate::core::types::CreatureId;
use crate::events::WorldEvent;
use crate::pack::{Pack, PackState};

use super::{
    move_member_away, move_member_toward, nearest_outsider, promote_leader, random_point_within,
    TacticCtx, TacticOutcome,
};

/// Losing the chief shakes the tribe badly
const SUCCESSION_MORALE_LOSS: i32 = 50;
/// Above this the chief is bold enough to raid
const RAID_THRESHOLD: i32 = 70;
/// Below this the tribe is forced to flee
const PANIC_THRESHOLD: i32 = 30;
/// Fraction of members sent ahead as the scout vanguard
const SCOUT_FRACTION: f32 = 0.3;
/// Scouts range this far ahead of the warrior line
const SCOUT_SPEED_MULT: f32 = 1.3;

pub fn tick(pack: &mut Pack, ctx: &mut TacticCtx) -> TacticOutcome {
    // The chief is dead: a new one claws their way up, or the tribe scatters
    if !ctx.creatures.is_living(pack.leader_id) {
        if !promote_leader(pack, ctx, |c| c.stats.cunning) {
            return TacticOutcome::Disband("tribe_scattered");
        }
        pack.adjust_morale(-SUCCESSION_MORALE_LOSS);
    }

    // The chief's morale tier gates the whole tribe's behavior
    if pack.morale < PANIC_THRESHOLD {
        pack.state = PackState::Fleeing;
        pack.target_id = None;
    } else if pack.morale <= RAID_THRESHOLD && pack.state == PackState::Raiding {
        // Nerve failed mid-raid
        pack.state = PackState::Patrolling;
        pack.target_id = None;
    }

    match pack.state {
        PackState::Idle | PackState::Patrolling => {
            if pack.morale > RAID_THRESHOLD && ctx.rng.gen::<f64>() < 0.3 {
                let target = nearest_outsider(
                    ctx,
                    pack,
                    pack.territory_center,
                    pack.territory_radius * 2.0,
                    |c| c.is_alive(),
                );
                if let Some((target, _)) = target {
                    pack.state = PackState::Raiding;
                    pack.target_id = Some(target);
                    return TacticOutcome::Continue;
                }
            }
            // Defensive patrol hugs the camp
            pack.state = PackState::Patrolling;
            for id in pack.all_ids() {
                let point = random_point_within(
                    ctx.rng,
                    pack.territory_center,
                    pack.territory_radius * 0.8,
                );
                move_member_toward(ctx, id, point, 1.0);
            }
        }
        PackState::Raiding => {
            let target_pos = pack.target_id.and_then(|t| ctx.creatures.position_of(t));
            let (Some(target), Some(pos)) = (pack.target_id, target_pos) else {
                pack.state = PackState::Patrolling;
                pack.target_id = None;
                return TacticOutcome::Continue;
            };

            // Scout vanguard by agility; the rest escort the chief
            let (scouts, warriors) = split_vanguard(pack, ctx);
            for id in scouts {
                move_member_toward(ctx, id, pos, SCOUT_SPEED_MULT);
            }
            move_member_toward(ctx, pack.leader_id, pos, 1.0);
            let chief_pos = ctx
                .creatures
                .position_of(pack.leader_id)
                .unwrap_or(pack.territory_center);
            for id in warriors {
                move_member_toward(ctx, id, chief_pos, 1.0);
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
        PackState::Fleeing => {
            for id in pack.all_ids() {
                move_member_away(ctx, id, pack.territory_center);
            }
            pack.adjust_morale(1);
            if pack.morale >= PANIC_THRESHOLD {
                pack.state = PackState::Patrolling;
            }
        }
        PackState::Hunting => {
            // Goblins raid rather than hunt; normalize stray state
            pack.state = PackState::Patrolling;
        }
    }

    TacticOutcome::Continue
}

/// Top 30% of members by agility scout ahead; the rest are warriors
fn split_vanguard(pack: &Pack, ctx: &TacticCtx) -> (Vec<CreatureId>, Vec<CreatureId>) {
    let mut ranked: Vec<(CreatureId, f32)> = pack
        .member_ids
        .iter()
        .filter_map(|&id| ctx.creatures.creature(id))
        .filter(|c| c.is_alive())
        .map(|c| (c.id, c.stats.agility))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let scout_count = ((ranked.len() as f32 * SCOUT_FRACTION).ceil() as usize).min(ranked.len());
    let scouts = ranked[..scout_count].iter().map(|(id, _)| *id).collect();
    let warriors = ranked[scout_count..].iter().map(|(id, _)| *id).collect();
    (scouts, warriors)
}
