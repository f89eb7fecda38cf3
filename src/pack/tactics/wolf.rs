//! Wolf pack tactics - coordinated hunters
//!
//! Wolves patrol their territory, converge on prey, and surround it. The
//! surround ("flanking") count is computed here and published as a hunt
//! signal; the kill itself is resolved by the external combat engine.

use rand::Rng;

use crate::events::WorldEvent;
use crate::pack::{Pack, PackState};

use super::{
    move_member_away, move_member_toward, nearest_outsider, promote_leader, random_point_within,
    TacticCtx, TacticOutcome,
};

/// Morale lost when the pack leader dies
const SUCCESSION_MORALE_LOSS: i32 = 30;
/// Below this morale the pack breaks and runs
const FLEE_THRESHOLD: i32 = 20;
/// Fleeing ends once morale recovers past this
const RALLY_THRESHOLD: i32 = 40;
/// Understrength packs with morale above this ask for a pup
const BREED_MORALE_MIN: i32 = 60;
/// Ticks between breed-request signals
const BREED_INTERVAL: u64 = 100;

pub fn tick(pack: &mut Pack, ctx: &mut TacticCtx) -> TacticOutcome {
    // Succession: the strongest survivor takes over, shaken
    if !ctx.creatures.is_living(pack.leader_id) {
        if !promote_leader(pack, ctx, |c| c.hp) {
            return TacticOutcome::Disband("no_survivors");
        }
        pack.adjust_morale(-SUCCESSION_MORALE_LOSS);
        tracing::debug!(pack = pack.id.0, "wolf pack promoted a new leader");
    }

    // Understrength packs in good spirits request a new pup from the spawner
    if pack.member_ids.len() < 3
        && pack.morale > BREED_MORALE_MIN
        && ctx.clock % BREED_INTERVAL == 0
    {
        ctx.events.publish(WorldEvent::PackBreedRequest {
            pack_id: pack.id,
            territory: pack.territory_center,
        });
    }

    if pack.morale < FLEE_THRESHOLD && pack.state != PackState::Fleeing {
        pack.state = PackState::Fleeing;
        pack.target_id = None;
    }

    match pack.state {
        PackState::Idle => {
            let roll: f64 = ctx.rng.gen();
            if roll < 0.3 {
                pack.state = PackState::Patrolling;
            } else if roll < 0.5 {
                // Hunt only if there is prey inside the territory
                let prey = nearest_outsider(
                    ctx,
                    pack,
                    pack.territory_center,
                    pack.territory_radius,
                    |c| c.template_id == "rabbit" || c.template_id == "deer",
                );
                if let Some((target, _)) = prey {
                    pack.state = PackState::Hunting;
                    pack.target_id = Some(target);
                }
            }
        }
        PackState::Hunting => {
            let target_pos = pack.target_id.and_then(|t| ctx.creatures.position_of(t));
            let (Some(target), Some(pos)) = (pack.target_id, target_pos) else {
                // Prey died or despawned
                pack.state = PackState::Idle;
                pack.target_id = None;
                pack.flankers = 0;
                return TacticOutcome::Continue;
            };

            for id in pack.all_ids() {
                move_member_toward(ctx, id, pos, 1.0);
            }

            // Surround check: two adjacent wolves spring the attack. The
            // flanker count scales the external resolver's bonus.
            let flankers = pack
                .all_ids()
                .iter()
                .filter_map(|&id| ctx.creatures.position_of(id))
                .filter(|p| p.is_adjacent(&pos))
                .count();
            pack.flankers = flankers;
            if flankers >= 2 {
                ctx.events.publish(WorldEvent::PackHunt {
                    pack_id: pack.id,
                    target_id: target,
                    position: pos,
                    flankers,
                });
            }
        }
        PackState::Patrolling => {
            for id in pack.all_ids() {
                let point =
                    random_point_within(ctx.rng, pack.territory_center, pack.territory_radius);
                move_member_toward(ctx, id, point, 1.0);
            }
            // Aggressive outsiders inside the territory rattle the pack
            let intruder = nearest_outsider(
                ctx,
                pack,
                pack.territory_center,
                pack.territory_radius,
                |c| c.archetype == crate::creature::BehaviorArchetype::Aggressive,
            );
            if intruder.is_some() {
                pack.adjust_morale(-5);
            }
            if ctx.rng.gen::<f64>() < 0.2 {
                pack.state = PackState::Idle;
            }
        }
        PackState::Fleeing => {
            for id in pack.all_ids() {
                move_member_away(ctx, id, pack.territory_center);
            }
            // Distance calms the pack; it rallies once morale recovers
            pack.adjust_morale(1);
            if pack.morale > RALLY_THRESHOLD {
                pack.state = PackState::Idle;
            }
        }
        PackState::Raiding => {
            // Wolves do not raid; normalize stray state
            pack.state = PackState::Idle;
        }
    }

    TacticOutcome::Continue
}
