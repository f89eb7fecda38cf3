//! Faction tactic state machines
//!
//! All four pack types share the same state shape (idle/patrol ->
//! hunt-or-raid -> flee) but diverge in thresholds and effects. Dispatch is
//! a single match on [`PackType`](crate::pack::PackType) so the shared
//! movement helpers and the four-state contract stay in one place.

pub mod bandit;
pub mod goblin;
pub mod orc;
pub mod wolf;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::EcosystemConfig;
use crate::core::types::{CreatureId, Tick, TilePos};
use crate::events::EventSink;
use crate::pack::{CreatureAccess, Pack, PackType};

/// Everything a tactic evaluation may touch
pub struct TacticCtx<'a> {
    pub clock: Tick,
    pub config: &'a EcosystemConfig,
    pub rng: &'a mut ChaCha8Rng,
    pub creatures: &'a mut dyn CreatureAccess,
    pub events: &'a mut dyn EventSink,
}

/// Result of one tactic evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TacticOutcome {
    Continue,
    /// The pack cannot go on (leader dead with no successor, gang broken);
    /// the manager deletes it with this reason
    Disband(&'static str),
}

/// Dispatch to the pack-type tactic
pub fn tick(pack: &mut Pack, ctx: &mut TacticCtx) -> TacticOutcome {
    match pack.pack_type {
        PackType::WolfPack => wolf::tick(pack, ctx),
        PackType::GoblinTribe => goblin::tick(pack, ctx),
        PackType::BanditGang => bandit::tick(pack, ctx),
        PackType::OrcWarband => orc::tick(pack, ctx),
    }
}

// ============================================================================
// Shared movement and perception helpers
// ============================================================================

/// Step one pack member toward a target at its own speed times
/// `speed_mult`. Silently skips dead or deleted members.
pub(crate) fn move_member_toward(
    ctx: &mut TacticCtx,
    id: CreatureId,
    target: TilePos,
    speed_mult: f32,
) {
    if let Some(creature) = ctx.creatures.creature_mut(id) {
        if creature.is_alive() {
            let speed = creature.stats.speed * speed_mult;
            creature.position = creature.position.step_toward(&target, speed);
        }
    }
}

/// Step one pack member directly away from a position
pub(crate) fn move_member_away(ctx: &mut TacticCtx, id: CreatureId, threat: TilePos) {
    if let Some(creature) = ctx.creatures.creature_mut(id) {
        if creature.is_alive() {
            let speed = creature.stats.speed;
            creature.position = creature.position.step_away(&threat, speed);
        }
    }
}

/// Uniform random point inside a circle, grid-snapped
pub(crate) fn random_point_within(rng: &mut ChaCha8Rng, center: TilePos, radius: f32) -> TilePos {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    let dist = rng.gen::<f32>().sqrt() * radius;
    TilePos::new(
        center.x + (angle.cos() * dist).round() as i32,
        center.y + (angle.sin() * dist).round() as i32,
    )
}

/// Nearest living creature to `origin` within `radius` that is not part of
/// this pack and passes `filter`
pub(crate) fn nearest_outsider(
    ctx: &TacticCtx,
    pack: &Pack,
    origin: TilePos,
    radius: f32,
    filter: impl Fn(&crate::creature::Creature) -> bool,
) -> Option<(CreatureId, TilePos)> {
    let mut best: Option<(CreatureId, TilePos, f32)> = None;
    for id in ctx.creatures.living_ids() {
        if pack.contains(id) {
            continue;
        }
        let Some(creature) = ctx.creatures.creature(id) else { continue };
        if !filter(creature) {
            continue;
        }
        let dist = origin.distance(&creature.position);
        if dist <= radius && best.map(|(_, _, d)| dist < d).unwrap_or(true) {
            best = Some((id, creature.position, dist));
        }
    }
    best.map(|(id, pos, _)| (id, pos))
}

/// Promote a member chosen by `score` to leader; returns false when no
/// living member remains
pub(crate) fn promote_leader(
    pack: &mut Pack,
    ctx: &mut TacticCtx,
    score: impl Fn(&crate::creature::Creature) -> f32,
) -> bool {
    let mut best: Option<(CreatureId, f32)> = None;
    for &id in &pack.member_ids {
        if let Some(creature) = ctx.creatures.creature(id) {
            if creature.is_alive() {
                let s = score(creature);
                if best.map(|(_, b)| s > b).unwrap_or(true) {
                    best = Some((id, s));
                }
            }
        }
    }
    match best {
        Some((id, _)) => {
            // The dead leader keeps no claim on the pack; a respawn brings
            // it back wild
            if let Some(old) = ctx.creatures.creature_mut(pack.leader_id) {
                if old.pack_id == Some(pack.id) {
                    old.pack_id = None;
                }
            }
            pack.member_ids.retain(|&m| m != id);
            pack.leader_id = id;
            true
        }
        None => false,
    }
}
