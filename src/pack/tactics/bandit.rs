//! Bandit gang tactics - ambush predators
//!
//! A gang is held together by its leader alone: no succession, no fear
//! state. They lurk at the edge of their turf and rush anything that
//! wanders in.

use crate::events::WorldEvent;
use crate::pack::{Pack, PackState};

use super::{move_member_toward, nearest_outsider, random_point_within, TacticCtx, TacticOutcome};

/// Ambush rush closes faster than a normal march
const RUSH_SPEED_MULT: f32 = 1.2;
/// A victim escaping beyond this multiple of the territory radius is let go
const PURSUIT_LIMIT: f32 = 1.5;

pub fn tick(pack: &mut Pack, ctx: &mut TacticCtx) -> TacticOutcome {
    // The gang was only ever the leader's; without them it dissolves
    if !ctx.creatures.is_living(pack.leader_id) {
        return TacticOutcome::Disband("leader_killed");
    }

    match pack.state {
        PackState::Idle => {
            pack.state = PackState::Patrolling;
        }
        PackState::Patrolling => {
            // Lurk near the territory edge, waiting
            for id in pack.all_ids() {
                let edge = random_point_within(ctx.rng, pack.territory_center, pack.territory_radius);
                let lurk = pack.territory_center.step_toward(&edge, pack.territory_radius * 0.9);
                move_member_toward(ctx, id, lurk, 1.0);
            }
            // Spring the ambush on anything that wanders in
            let victim = nearest_outsider(
                ctx,
                pack,
                pack.territory_center,
                pack.territory_radius,
                |c| c.is_alive(),
            );
            if let Some((target, _)) = victim {
                pack.state = PackState::Raiding;
                pack.target_id = Some(target);
            }
        }
        PackState::Raiding => {
            let target_pos = pack.target_id.and_then(|t| ctx.creatures.position_of(t));
            let (Some(target), Some(pos)) = (pack.target_id, target_pos) else {
                pack.state = PackState::Idle;
                pack.target_id = None;
                pack.flankers = 0;
                return TacticOutcome::Continue;
            };

            // Victims that make it out of reach are let go
            if pack.territory_center.distance(&pos) > pack.territory_radius * PURSUIT_LIMIT {
                pack.state = PackState::Idle;
                pack.target_id = None;
                return TacticOutcome::Continue;
            }

            for id in pack.all_ids() {
                move_member_toward(ctx, id, pos, RUSH_SPEED_MULT);
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
        // No morale-gated fear state: bandits never rout, and a stray
        // hunting/fleeing state is folded back into the patrol
        PackState::Hunting | PackState::Fleeing => {
            pack.state = PackState::Patrolling;
        }
    }

    TacticOutcome::Continue
}
