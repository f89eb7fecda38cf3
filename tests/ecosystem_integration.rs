//! Whole-ecosystem integration tests
//!
//! All three managers running together over a generated map, checked the
//! way a host game would drive them: one shared clock, events drained each
//! tick, no manager reaching into another except through ids.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use wildlands::core::config::EcosystemConfig;
use wildlands::core::types::TilePos;
use wildlands::creature::manager::SpawnOptions;
use wildlands::den::DenType;
use wildlands::world::map::GridMap;
use wildlands::{CreatureManager, DenManager, EventLog, PackManager, WorldEvent};

struct World {
    map: GridMap,
    creatures: CreatureManager,
    packs: PackManager,
    dens: DenManager,
    log: EventLog,
}

fn build_world(seed: u64) -> World {
    let config = EcosystemConfig {
        world_radius_chunks: 5,
        ..EcosystemConfig::default()
    };
    let mut map_rng = ChaCha8Rng::seed_from_u64(seed);
    World {
        map: GridMap::generate(192, seed, &mut map_rng),
        creatures: CreatureManager::new(config.clone(), ChaCha8Rng::seed_from_u64(seed)),
        packs: PackManager::new(config.clone(), ChaCha8Rng::seed_from_u64(seed.wrapping_add(1))),
        dens: DenManager::new(config, ChaCha8Rng::seed_from_u64(seed.wrapping_add(2))),
        log: EventLog::new(),
    }
}

fn run(world: &mut World, ticks: u64) -> Vec<wildlands::events::LoggedEvent> {
    let mut all = Vec::new();
    for tick in 0..ticks {
        world.log.set_tick(tick);
        world.creatures.tick(tick, &world.map, &mut world.log);
        if tick % 100 == 0 {
            world.packs.try_form_packs(tick, &mut world.creatures, &mut world.log);
        }
        world.packs.tick(tick, &mut world.creatures, &mut world.log);
        world.dens.tick(tick, &mut world.log);
        all.extend(world.log.drain());
    }
    all
}

// ============================================================================
// Long-run invariants
// ============================================================================

#[test]
fn test_long_run_holds_invariants() {
    let mut world = build_world(101);
    let wolf_den = world.dens.create_den(DenType::WolfDen, TilePos::new(-60, -60), 1);
    world.dens.create_den(DenType::OrcStronghold, TilePos::new(60, 60), 2);

    let events = run(&mut world, 2000);

    assert!(world.creatures.count_alive() > 0, "world never populated");
    assert!(world.creatures.count_alive() <= 500);

    for creature in world.creatures.alive_creatures() {
        assert!(creature.hp > 0.0 && creature.hp <= creature.max_hp);
        assert!((1..=5).contains(&creature.tier));
    }

    for pack in world.packs.all_packs() {
        assert!((0..=100).contains(&pack.morale));
        assert!(pack.member_ids.len() >= 2, "non-viable pack survived a tick");
        assert!(!pack.member_ids.contains(&pack.leader_id));
        // Every roster entry points back at this pack
        for id in pack.all_ids() {
            let creature = world.creatures.get_creature(id).expect("roster id resolves");
            if creature.is_alive() {
                assert_eq!(creature.pack_id, Some(pack.id));
            }
        }
    }

    // Untouched dens never clear or respawn on their own
    let den = world.dens.get_den(wolf_den).unwrap();
    assert!(!den.cleared);
    assert_eq!(den.tier, 1);
    assert!(!events.iter().any(|e| matches!(
        e.event,
        WorldEvent::DenCleared { .. } | WorldEvent::DenRespawned { .. }
    )));
}

#[test]
fn test_runs_are_deterministic_for_a_seed() {
    let mut a = build_world(137);
    let mut b = build_world(137);
    let events_a = run(&mut a, 800);
    let events_b = run(&mut b, 800);

    assert_eq!(events_a.len(), events_b.len());
    assert_eq!(a.creatures.count_alive(), b.creatures.count_alive());
    assert_eq!(a.packs.pack_count(), b.packs.pack_count());
    let json_a = serde_json::to_string(&events_a).unwrap();
    let json_b = serde_json::to_string(&events_b).unwrap();
    assert_eq!(json_a, json_b);
}

// ============================================================================
// Tier scaling through the public surface
// ============================================================================

#[test]
fn test_spawned_bear_scales_with_tier() {
    let mut world = build_world(149);
    let options = SpawnOptions {
        tier: Some(3),
        ..Default::default()
    };
    let id = world
        .creatures
        .spawn_creature("bear", TilePos::new(0, 0), options, 0, &mut world.log)
        .unwrap();

    let bear = world.creatures.get_creature(id).unwrap();
    // Tier 3 multiplies base 90 hp by 2.5
    assert_eq!(bear.hp, 225.0);
    assert_eq!(bear.max_hp, 225.0);
    assert_eq!(bear.stats.attack, 35.0);
    // Speed is exempt from tier scaling
    assert_eq!(bear.stats.speed, 1.5);
}

// ============================================================================
// Event stream
// ============================================================================

#[test]
fn test_event_stream_round_trips_through_json() {
    let mut world = build_world(163);
    world.dens.create_den(DenType::GoblinCave, TilePos::new(40, -40), 1);
    let events = run(&mut world, 600);

    assert!(!events.is_empty());
    let json = serde_json::to_string(&events).unwrap();
    let back: Vec<wildlands::events::LoggedEvent> = serde_json::from_str(&json).unwrap();
    assert_eq!(back.len(), events.len());
}

#[test]
fn test_describe_surfaces_render() {
    let mut world = build_world(173);
    let den_id = world.dens.create_den(DenType::BanditCamp, TilePos::new(10, 10), 2);
    run(&mut world, 300);

    let den_text = world.dens.describe_den(den_id).unwrap();
    assert!(den_text.contains("Bandit Camp"));
    assert!(den_text.contains("hidden"));

    // Nearby summary never panics regardless of what spawned
    let _ = world.creatures.describe_nearby(TilePos::new(0, 0), 50.0);

    for pack in world.packs.all_packs().map(|p| p.id).collect::<Vec<_>>() {
        assert!(world.packs.describe_pack(pack, &world.creatures).is_some());
    }
}
