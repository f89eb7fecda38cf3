//! Den generation templates
//!
//! Fixed per-type layout bounds, naming pools, and respawn pacing. Room
//! counts are ranges; the generator rolls within them per floor.

use crate::den::DenType;

/// Layout and flavor parameters for one den type
#[derive(Debug, Clone)]
pub struct DenTemplate {
    pub den_type: DenType,
    /// Adjectives drawn for the den's display name
    pub name_prefixes: &'static [&'static str],
    pub display_name: &'static str,
    pub floors: u32,
    /// Inclusive range of rooms per floor
    pub rooms_per_floor: (u32, u32),
    /// Thematic room names, cycled through per den
    pub room_names: &'static [&'static str],
    pub boss_room_name: &'static str,
    /// Item pool for room loot
    pub loot_pool: &'static [&'static str],
    /// Ticks from clearing to regeneration
    pub respawn_delay: u64,
}

/// The generation template for a den type
pub fn template_for(den_type: DenType) -> DenTemplate {
    match den_type {
        DenType::WolfDen => DenTemplate {
            den_type,
            name_prefixes: &["Gloomfang", "Greymaw", "Frostpelt", "Shadowhowl"],
            display_name: "Wolf Den",
            floors: 1,
            rooms_per_floor: (3, 5),
            room_names: &["Bone-Strewn Hollow", "Narrow Burrow", "Whelping Cave", "Carcass Pit"],
            boss_room_name: "Alpha's Lair",
            loot_pool: &["wolf_pelt", "fang", "gnawed_bone", "raw_meat"],
            respawn_delay: 1000,
        },
        DenType::GoblinCave => DenTemplate {
            den_type,
            name_prefixes: &["Sporerot", "Muckspittle", "Wartfinger", "Cacklejaw"],
            display_name: "Goblin Cave",
            floors: 2,
            rooms_per_floor: (2, 4),
            room_names: &["Fungus Grotto", "Scrap Heap", "Sleeping Warren", "Totem Chamber", "Flooded Passage"],
            boss_room_name: "Chief's Throne",
            loot_pool: &["crude_dagger", "goblin_ear", "shiny_trinket", "mushroom_cluster", "copper_coin"],
            respawn_delay: 1500,
        },
        DenType::BanditCamp => DenTemplate {
            den_type,
            name_prefixes: &["Cutthroat", "Blackflag", "Hollowtree", "Red Knife"],
            display_name: "Bandit Camp",
            floors: 1,
            rooms_per_floor: (4, 6),
            room_names: &["Lookout Post", "Supply Tent", "Gambling Circle", "Stolen-Goods Cache", "Palisade Gate"],
            boss_room_name: "Captain's Quarters",
            loot_pool: &["coin_pouch", "iron_sword", "stolen_jewelry", "lockbox", "contraband"],
            respawn_delay: 1200,
        },
        DenType::OrcStronghold => DenTemplate {
            den_type,
            name_prefixes: &["Skullcrusher", "Ironjaw", "Bloodfist", "Grimtusk"],
            display_name: "Orc Stronghold",
            floors: 3,
            rooms_per_floor: (2, 3),
            room_names: &["War Hall", "Forge Pit", "Trophy Room", "Barracks", "Beast Pens", "Armory"],
            boss_room_name: "Warchief's Seat",
            loot_pool: &["orc_tusk", "war_axe", "iron_ingot", "war_banner", "crude_armor"],
            respawn_delay: 2000,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_are_well_formed() {
        for den_type in DenType::ALL {
            let template = template_for(den_type);
            assert!(template.floors >= 1);
            assert!(template.rooms_per_floor.0 >= 1);
            assert!(template.rooms_per_floor.0 <= template.rooms_per_floor.1);
            assert!(!template.room_names.is_empty());
            assert!(!template.loot_pool.is_empty());
            assert!(template.respawn_delay > 0);
        }
    }
}
