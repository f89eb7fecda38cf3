//! Room, trap, and loot generation for dens
//!
//! Rooms form a path graph with occasional shortcut branches: room i always
//! connects to room i+1, and interior rooms have a 20% chance of an extra
//! edge to room i+2. The last room of the last floor is the boss room.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::den::templates::DenTemplate;
use crate::den::{DenRoom, Trap, TrapKind};

/// Chance per roll of placing a trap; two rolls per non-boss room
const TRAP_CHANCE: f64 = 0.2;
/// Chance of a shortcut edge from an interior room to room i+2
const BRANCH_CHANCE: f64 = 0.2;
/// Chance a non-boss room holds loot at all
const ROOM_LOOT_CHANCE: f64 = 0.3;

/// Generate the full room list for a den at the given tier
pub fn generate_rooms(template: &DenTemplate, tier: u8, rng: &mut ChaCha8Rng) -> Vec<DenRoom> {
    let mut rooms = Vec::new();
    let mut id = 0u32;

    for floor in 0..template.floors {
        let count = rng.gen_range(template.rooms_per_floor.0..=template.rooms_per_floor.1);
        for _ in 0..count {
            let name = template.room_names[id as usize % template.room_names.len()].to_string();
            rooms.push(DenRoom {
                id,
                floor,
                name,
                is_boss_room: false,
                is_cleared: false,
                connections: Vec::new(),
                occupant_ids: Vec::new(),
                traps: Vec::new(),
                loot: Vec::new(),
            });
            id += 1;
        }
    }

    // The last room of the final floor is the boss room
    if let Some(last) = rooms.last_mut() {
        last.is_boss_room = true;
        last.name = template.boss_room_name.to_string();
    }

    connect_rooms(&mut rooms, rng);

    for room in rooms.iter_mut() {
        if room.is_boss_room {
            // Boss hoard: guaranteed, scaled up
            room.loot = roll_loot(template, tier as usize + 2, rng);
        } else {
            room.traps = roll_traps(tier, rng);
            if rng.gen::<f64>() < ROOM_LOOT_CHANCE {
                room.loot = roll_loot(template, tier as usize / 2 + 1, rng);
            }
        }
    }

    rooms
}

/// Sequential spine plus occasional shortcuts
fn connect_rooms(rooms: &mut [DenRoom], rng: &mut ChaCha8Rng) {
    let n = rooms.len();
    for i in 0..n.saturating_sub(1) {
        rooms[i].connections.push((i + 1) as u32);
        rooms[i + 1].connections.push(i as u32);
    }
    for i in 1..n.saturating_sub(2) {
        if rng.gen::<f64>() < BRANCH_CHANCE {
            rooms[i].connections.push((i + 2) as u32);
            rooms[i + 2].connections.push(i as u32);
        }
    }
}

/// 0-2 traps, each rolled independently
fn roll_traps(tier: u8, rng: &mut ChaCha8Rng) -> Vec<Trap> {
    let kinds = [
        TrapKind::SpikePit,
        TrapKind::SnareWire,
        TrapKind::DeadfallRock,
        TrapKind::PoisonDart,
    ];
    let mut traps = Vec::new();
    for _ in 0..2 {
        if rng.gen::<f64>() < TRAP_CHANCE {
            traps.push(Trap {
                kind: kinds[rng.gen_range(0..kinds.len())],
                damage: 5.0 * tier as f32,
                disarm_difficulty: 10 + 5 * tier,
                triggered: false,
            });
        }
    }
    traps
}

fn roll_loot(template: &DenTemplate, count: usize, rng: &mut ChaCha8Rng) -> Vec<String> {
    (0..count)
        .map(|_| template.loot_pool[rng.gen_range(0..template.loot_pool.len())].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::den::templates::template_for;
    use crate::den::DenType;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn generate(den_type: DenType, tier: u8, seed: u64) -> Vec<DenRoom> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate_rooms(&template_for(den_type), tier, &mut rng)
    }

    #[test]
    fn test_room_count_within_template_bounds() {
        for seed in 0..50 {
            let template = template_for(DenType::GoblinCave);
            let rooms = generate(DenType::GoblinCave, 1, seed);
            let min = template.floors * template.rooms_per_floor.0;
            let max = template.floors * template.rooms_per_floor.1;
            assert!(rooms.len() as u32 >= min && rooms.len() as u32 <= max);
        }
    }

    #[test]
    fn test_exactly_one_boss_room_and_it_is_last() {
        for den_type in DenType::ALL {
            for seed in 0..20 {
                let rooms = generate(den_type, 2, seed);
                let bosses: Vec<_> = rooms.iter().filter(|r| r.is_boss_room).collect();
                assert_eq!(bosses.len(), 1);
                assert_eq!(bosses[0].id as usize, rooms.len() - 1);
                assert_eq!(bosses[0].floor, rooms.last().unwrap().floor);
            }
        }
    }

    #[test]
    fn test_boss_room_reachable_from_entrance() {
        for seed in 0..50 {
            let rooms = generate(DenType::OrcStronghold, 3, seed);
            let mut visited = HashSet::new();
            let mut stack = vec![0u32];
            while let Some(id) = stack.pop() {
                if visited.insert(id) {
                    stack.extend(&rooms[id as usize].connections);
                }
            }
            let boss_id = rooms.iter().find(|r| r.is_boss_room).unwrap().id;
            assert!(visited.contains(&boss_id));
            // The spine alone makes every room reachable
            assert_eq!(visited.len(), rooms.len());
        }
    }

    #[test]
    fn test_boss_room_has_no_traps_and_guaranteed_loot() {
        for seed in 0..30 {
            let tier = 3;
            let rooms = generate(DenType::BanditCamp, tier, seed);
            let boss = rooms.iter().find(|r| r.is_boss_room).unwrap();
            assert!(boss.traps.is_empty());
            assert_eq!(boss.loot.len(), tier as usize + 2);
        }
    }

    #[test]
    fn test_traps_scale_with_tier() {
        // Gather traps across many seeds; every one must match the tier
        // scaling and no room may exceed two
        for seed in 0..40 {
            let rooms = generate(DenType::GoblinCave, 4, seed);
            for room in &rooms {
                assert!(room.traps.len() <= 2);
                for trap in &room.traps {
                    assert_eq!(trap.damage, 20.0);
                    assert_eq!(trap.disarm_difficulty, 30);
                    assert!(!trap.triggered);
                }
            }
        }
    }

    #[test]
    fn test_connections_are_undirected() {
        for seed in 0..20 {
            let rooms = generate(DenType::BanditCamp, 1, seed);
            for room in &rooms {
                for &other in &room.connections {
                    assert!(rooms[other as usize].connections.contains(&room.id));
                }
            }
        }
    }
}
