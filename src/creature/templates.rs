//! Builtin creature templates
//!
//! Base stats here are tier 1; `CreatureManager::spawn_creature` scales them
//! by the tier multiplier. Templates are plain data so hosts can register
//! their own species alongside the builtins.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::creature::{ActiveTime, BehaviorArchetype, CreatureKind, LootEntry, Stats};
use crate::world::Biome;

/// Species definition shared by every creature spawned from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureTemplate {
    pub id: String,
    pub name: String,
    pub kind: CreatureKind,
    pub archetype: BehaviorArchetype,
    pub base_hp: f32,
    pub base_stats: Stats,
    pub habitat: Vec<Biome>,
    pub active_time: ActiveTime,
    /// Relative weight in the spawning pass lottery
    pub spawn_weight: u32,
    pub loot_table: Vec<LootEntry>,
    /// (item type, interval in ticks) for producing animals
    pub production: Option<(String, u64)>,
}

fn loot(item: &str, chance: f64, min: u32, max: u32) -> LootEntry {
    LootEntry {
        item_type: item.to_string(),
        chance,
        quantity_min: min,
        quantity_max: max,
    }
}

fn stats(attack: f32, defense: f32, speed: f32, str_: f32, agi: f32, vit: f32, cun: f32) -> Stats {
    Stats {
        attack,
        defense,
        speed,
        strength: str_,
        agility: agi,
        vitality: vit,
        cunning: cun,
    }
}

/// The builtin species registry
pub fn builtin_templates() -> AHashMap<String, CreatureTemplate> {
    let defs = vec![
        CreatureTemplate {
            id: "rabbit".into(),
            name: "Rabbit".into(),
            kind: CreatureKind::Beast,
            archetype: BehaviorArchetype::Passive,
            base_hp: 8.0,
            base_stats: stats(1.0, 1.0, 3.0, 1.0, 8.0, 2.0, 2.0),
            habitat: vec![Biome::Plains, Biome::Forest],
            active_time: ActiveTime::Day,
            spawn_weight: 30,
            loot_table: vec![loot("rabbit_meat", 0.8, 1, 1), loot("rabbit_fur", 0.5, 1, 2)],
            production: None,
        },
        CreatureTemplate {
            id: "deer".into(),
            name: "Deer".into(),
            kind: CreatureKind::Beast,
            archetype: BehaviorArchetype::Passive,
            base_hp: 25.0,
            base_stats: stats(2.0, 2.0, 3.0, 4.0, 7.0, 4.0, 3.0),
            habitat: vec![Biome::Forest, Biome::Plains],
            active_time: ActiveTime::Day,
            spawn_weight: 20,
            loot_table: vec![loot("venison", 0.9, 1, 3), loot("hide", 0.7, 1, 2)],
            production: None,
        },
        CreatureTemplate {
            id: "chicken".into(),
            name: "Chicken".into(),
            kind: CreatureKind::Animal,
            archetype: BehaviorArchetype::Passive,
            base_hp: 5.0,
            base_stats: stats(1.0, 1.0, 1.0, 1.0, 3.0, 1.0, 1.0),
            habitat: vec![Biome::Plains],
            active_time: ActiveTime::Day,
            spawn_weight: 10,
            loot_table: vec![loot("chicken_meat", 0.9, 1, 1), loot("feather", 0.6, 1, 3)],
            production: Some(("egg".into(), 200)),
        },
        CreatureTemplate {
            id: "sheep".into(),
            name: "Sheep".into(),
            kind: CreatureKind::Animal,
            archetype: BehaviorArchetype::Passive,
            base_hp: 18.0,
            base_stats: stats(1.0, 2.0, 1.0, 3.0, 2.0, 3.0, 1.0),
            habitat: vec![Biome::Plains],
            active_time: ActiveTime::Day,
            spawn_weight: 10,
            loot_table: vec![loot("mutton", 0.9, 1, 2), loot("wool", 0.8, 1, 2)],
            production: Some(("wool".into(), 400)),
        },
        CreatureTemplate {
            id: "wolf".into(),
            name: "Wolf".into(),
            kind: CreatureKind::Beast,
            archetype: BehaviorArchetype::Aggressive,
            base_hp: 40.0,
            base_stats: stats(8.0, 3.0, 2.5, 6.0, 7.0, 5.0, 6.0),
            habitat: vec![Biome::Forest, Biome::Tundra],
            active_time: ActiveTime::Night,
            spawn_weight: 15,
            loot_table: vec![loot("wolf_pelt", 0.8, 1, 1), loot("fang", 0.4, 1, 2)],
            production: None,
        },
        CreatureTemplate {
            id: "bear".into(),
            name: "Bear".into(),
            kind: CreatureKind::Beast,
            archetype: BehaviorArchetype::Neutral,
            base_hp: 90.0,
            base_stats: stats(14.0, 8.0, 1.5, 10.0, 3.0, 9.0, 4.0),
            habitat: vec![Biome::Forest, Biome::Mountains],
            active_time: ActiveTime::Any,
            spawn_weight: 5,
            loot_table: vec![loot("bear_pelt", 0.9, 1, 1), loot("bear_meat", 0.8, 2, 4)],
            production: None,
        },
        CreatureTemplate {
            id: "goblin".into(),
            name: "Goblin".into(),
            kind: CreatureKind::Humanoid,
            archetype: BehaviorArchetype::Aggressive,
            base_hp: 22.0,
            base_stats: stats(5.0, 2.0, 2.0, 3.0, 6.0, 3.0, 5.0),
            habitat: vec![Biome::Forest, Biome::Swamp, Biome::Mountains],
            active_time: ActiveTime::Night,
            spawn_weight: 12,
            loot_table: vec![loot("crude_dagger", 0.3, 1, 1), loot("goblin_ear", 0.7, 1, 2)],
            production: None,
        },
        CreatureTemplate {
            id: "goblin_brute".into(),
            name: "Goblin Brute".into(),
            kind: CreatureKind::Humanoid,
            archetype: BehaviorArchetype::Aggressive,
            base_hp: 45.0,
            base_stats: stats(9.0, 5.0, 1.5, 7.0, 3.0, 6.0, 2.0),
            habitat: vec![Biome::Swamp, Biome::Mountains],
            active_time: ActiveTime::Night,
            spawn_weight: 4,
            loot_table: vec![loot("spiked_club", 0.4, 1, 1), loot("goblin_ear", 0.9, 2, 3)],
            production: None,
        },
        CreatureTemplate {
            id: "bandit".into(),
            name: "Bandit".into(),
            kind: CreatureKind::Humanoid,
            archetype: BehaviorArchetype::Aggressive,
            base_hp: 35.0,
            base_stats: stats(7.0, 4.0, 2.0, 5.0, 6.0, 5.0, 7.0),
            habitat: vec![Biome::Plains, Biome::Forest],
            active_time: ActiveTime::Any,
            spawn_weight: 8,
            loot_table: vec![loot("coin_pouch", 0.6, 1, 1), loot("iron_sword", 0.2, 1, 1)],
            production: None,
        },
        CreatureTemplate {
            id: "orc".into(),
            name: "Orc".into(),
            kind: CreatureKind::Humanoid,
            archetype: BehaviorArchetype::Aggressive,
            base_hp: 60.0,
            base_stats: stats(12.0, 6.0, 1.8, 9.0, 4.0, 8.0, 3.0),
            habitat: vec![Biome::Mountains, Biome::Desert, Biome::Swamp],
            active_time: ActiveTime::Any,
            spawn_weight: 6,
            loot_table: vec![loot("orc_tusk", 0.7, 1, 2), loot("war_axe", 0.25, 1, 1)],
            production: None,
        },
        CreatureTemplate {
            id: "orc_berserker".into(),
            name: "Orc Berserker".into(),
            kind: CreatureKind::Humanoid,
            archetype: BehaviorArchetype::Aggressive,
            base_hp: 50.0,
            base_stats: stats(15.0, 3.0, 2.2, 10.0, 6.0, 6.0, 2.0),
            habitat: vec![Biome::Mountains, Biome::Desert],
            active_time: ActiveTime::Any,
            spawn_weight: 3,
            loot_table: vec![loot("orc_tusk", 0.8, 1, 2), loot("berserker_totem", 0.15, 1, 1)],
            production: None,
        },
    ];

    defs.into_iter().map(|t| (t.id.clone(), t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_present() {
        let templates = builtin_templates();
        for id in ["rabbit", "deer", "wolf", "bear", "goblin", "bandit", "orc"] {
            assert!(templates.contains_key(id), "missing template {}", id);
        }
    }

    #[test]
    fn test_producers_are_animals() {
        for template in builtin_templates().values() {
            if template.production.is_some() {
                assert_eq!(template.kind, CreatureKind::Animal, "{}", template.id);
            }
        }
    }

    #[test]
    fn test_loot_chances_are_probabilities() {
        for template in builtin_templates().values() {
            for entry in &template.loot_table {
                assert!((0.0..=1.0).contains(&entry.chance));
                assert!(entry.quantity_min <= entry.quantity_max);
            }
        }
    }
}
