//! Headless ecosystem demo
//!
//! Runs the three managers over a generated grid map for a fixed number of
//! ticks and prints a world summary at the end. Useful for eyeballing
//! population dynamics and event volume at different seeds.

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use wildlands::core::config::EcosystemConfig;
use wildlands::core::types::TilePos;
use wildlands::creature::manager::SpawnOptions;
use wildlands::creature::CreatureKind;
use wildlands::den::DenType;
use wildlands::world::map::GridMap;
use wildlands::{CreatureManager, DenManager, EventLog, PackManager};

/// Ecosystem demo - creatures, packs, and dens over a noise map
#[derive(Parser, Debug)]
#[command(name = "wildlands")]
#[command(about = "Run a headless ecosystem simulation")]
struct Args {
    /// Random seed for reproducible runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Ticks to simulate
    #[arg(long, default_value_t = 3000)]
    ticks: u64,

    /// Map edge length in tiles
    #[arg(long, default_value_t = 192)]
    map_size: i32,

    /// Print every event as it happens
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = EcosystemConfig::default();

    let mut map_rng = ChaCha8Rng::seed_from_u64(args.seed);
    let map = GridMap::generate(args.map_size, args.seed, &mut map_rng);

    let mut creatures = CreatureManager::new(
        config.clone(),
        ChaCha8Rng::seed_from_u64(args.seed),
    );
    let mut packs = PackManager::new(
        config.clone(),
        ChaCha8Rng::seed_from_u64(args.seed.wrapping_add(1)),
    );
    let mut dens = DenManager::new(
        config.clone(),
        ChaCha8Rng::seed_from_u64(args.seed.wrapping_add(2)),
    );
    let mut log = EventLog::new();

    seed_dens(&mut dens, &mut creatures, &mut log);

    println!(
        "Simulating {} ticks on a {}x{} map (seed {})",
        args.ticks, args.map_size, args.map_size, args.seed
    );

    let mut event_total = 0usize;
    for tick in 0..args.ticks {
        log.set_tick(tick);
        creatures.tick(tick, &map, &mut log);
        if tick % 100 == 0 {
            packs.try_form_packs(tick, &mut creatures, &mut log);
        }
        packs.tick(tick, &mut creatures, &mut log);
        dens.tick(tick, &mut log);

        let events = log.drain();
        event_total += events.len();
        if args.verbose {
            for logged in &events {
                println!("[{:>5}] {:?}", logged.tick, logged.event);
            }
        }
    }

    print_summary(&creatures, &packs, &dens, event_total);
}

/// Place one den of each type near the corners and stock it
fn seed_dens(dens: &mut DenManager, creatures: &mut CreatureManager, log: &mut EventLog) {
    let placements = [
        (DenType::WolfDen, TilePos::new(-60, -60), 1, "wolf", "Greymaw Alpha"),
        (DenType::GoblinCave, TilePos::new(60, -60), 1, "goblin", "Chief Snagtooth"),
        (DenType::BanditCamp, TilePos::new(-60, 60), 2, "bandit", "Captain Vex"),
        (DenType::OrcStronghold, TilePos::new(60, 60), 2, "orc", "Warchief Durgash"),
    ];

    for (den_type, position, tier, template, boss_name) in placements {
        let den_id = dens.create_den(den_type, position, tier);
        let mut minions = Vec::new();
        for _ in 0..4 {
            let options = SpawnOptions {
                tier: Some(tier),
                den_id: Some(den_id),
                ..Default::default()
            };
            if let Some(id) = creatures.spawn_creature(template, position, options, 0, log) {
                minions.push(id);
            }
        }
        let boss_options = SpawnOptions {
            tier: Some((tier + 1).min(5)),
            den_id: Some(den_id),
            ..Default::default()
        };
        let boss = creatures
            .spawn_creature(template, position, boss_options, 0, log)
            .map(|id| (id, boss_name));
        dens.populate_den(den_id, &minions, boss);
    }
}

fn print_summary(
    creatures: &CreatureManager,
    packs: &PackManager,
    dens: &DenManager,
    event_total: usize,
) {
    println!("\n=== Final world state ===");
    println!("Events emitted: {}", event_total);
    println!("Creatures alive: {}", creatures.count_alive());
    for kind in [CreatureKind::Animal, CreatureKind::Beast, CreatureKind::Humanoid] {
        let count = creatures
            .creatures_by_kind(kind)
            .iter()
            .filter(|c| c.is_alive())
            .count();
        println!("  {:?}: {}", kind, count);
    }

    println!("Packs: {}", packs.pack_count());
    for pack in packs.all_packs() {
        println!(
            "  {} #{} - {} heads, morale {}, {:?}",
            pack.pack_type.as_str(),
            pack.id.0,
            pack.member_ids.len() + 1,
            pack.morale,
            pack.state
        );
    }

    for den in dens.all_dens() {
        if let Some(text) = dens.describe_den(den.id) {
            println!("\n{}", text);
        }
    }

    println!("{}", creatures.describe_nearby(TilePos::new(0, 0), 40.0));
}
