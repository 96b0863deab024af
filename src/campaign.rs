//! Scripted campaign
//!
//! Twenty hand-tuned levels with fixed spawn manifests, culminating in a
//! boss every fifth level. Manifests pin down species, variant, radius,
//! and count for every ordinary pathogen so the difficulty ramp is
//! authored rather than procedural; placement still comes from the run's
//! seed.

use crate::sim::state::{BossKind, Species, Variant};

/// One scripted spawn line: `count` pathogens of a fixed make
#[derive(Debug, Clone, Copy)]
pub struct SpawnScript {
    pub species: Species,
    pub variant: Option<Variant>,
    pub radius: f32,
    pub count: u32,
}

const fn s(species: Species, variant: Option<Variant>, radius: f32, count: u32) -> SpawnScript {
    SpawnScript {
        species,
        variant,
        radius,
        count,
    }
}

/// One authored level: flavor text plus its spawn manifest
#[derive(Debug, Clone, Copy)]
pub struct CampaignLevel {
    pub number: u32,
    pub title: &'static str,
    pub briefing: &'static str,
    /// Short goal line shown by the UI collaborator
    pub objective: &'static str,
    /// Ordinary pathogens to spawn, by scripted make
    pub spawns: &'static [SpawnScript],
    pub prion_swarms: u32,
    pub cancers: u32,
    pub biofilms: u32,
    pub boss: Option<BossKind>,
}

pub const LEVEL_COUNT: u32 = 20;

/// Look up a campaign level by number (1-based)
pub fn level(number: u32) -> Option<&'static CampaignLevel> {
    LEVELS.get(number.checked_sub(1)? as usize)
}

macro_rules! lvl {
    ($n:expr, $title:expr, $brief:expr, $obj:expr, $spawns:expr,
     prions: $pr:expr, cancers: $ca:expr, biofilms: $bf:expr, boss: $boss:expr) => {
        CampaignLevel {
            number: $n,
            title: $title,
            briefing: $brief,
            objective: $obj,
            spawns: &$spawns,
            prion_swarms: $pr,
            cancers: $ca,
            biofilms: $bf,
            boss: $boss,
        }
    };
}

const CLEAR_ALL: &str = "Eliminate every pathogen";

use Species::{Bacteria, Fungus, Parasite, Virus};
use Variant::{Armored, Stalker, Swift};

pub static LEVELS: [CampaignLevel; LEVEL_COUNT as usize] = [
    lvl!(1, "First Contact",
        "A handful of stray pathogens drift into the bloodstream. Clear them out.",
        CLEAR_ALL,
        [s(Virus, None, 20.0, 3)],
        prions: 0, cancers: 0, biofilms: 0, boss: None),
    lvl!(2, "Low-Grade Fever",
        "The infection takes hold. Expect larger colonies.",
        CLEAR_ALL,
        [s(Virus, None, 22.0, 2), s(Bacteria, None, 32.0, 2)],
        prions: 0, cancers: 0, biofilms: 0, boss: None),
    lvl!(3, "Opportunists",
        "Fast movers slip past the outer defenses.",
        CLEAR_ALL,
        [s(Virus, Some(Swift), 18.0, 2), s(Virus, None, 25.0, 2), s(Parasite, None, 28.0, 1)],
        prions: 0, cancers: 0, biofilms: 0, boss: None),
    lvl!(4, "Spore Season",
        "Heavy fungal mats ride the current. They soak up damage.",
        CLEAR_ALL,
        [s(Fungus, None, 45.0, 2), s(Virus, None, 20.0, 2)],
        prions: 0, cancers: 0, biofilms: 0, boss: None),
    lvl!(5, "The Mega Virus",
        "A capsid giant breaches the vessel wall. Strike when its shield drops.",
        "Defeat the Mega Virus",
        [], prions: 0, cancers: 0, biofilms: 0, boss: Some(BossKind::MegaVirus)),
    lvl!(6, "Aftershock",
        "Remnants of the outbreak regroup in force.",
        CLEAR_ALL,
        [s(Virus, None, 22.0, 2), s(Bacteria, None, 34.0, 2), s(Fungus, None, 42.0, 1)],
        prions: 1, cancers: 0, biofilms: 0, boss: None),
    lvl!(7, "Misfolded",
        "Prion clusters flicker at the edge of vision. Small, fast, many.",
        CLEAR_ALL,
        [s(Bacteria, None, 32.0, 2), s(Virus, None, 25.0, 1)],
        prions: 2, cancers: 0, biofilms: 0, boss: None),
    lvl!(8, "Rogue Growth",
        "A tumor cell anchors itself and begins to divide. Cut it out early.",
        "Excise the cancer before it spreads",
        [s(Bacteria, Some(Armored), 32.0, 1), s(Virus, None, 22.0, 2)],
        prions: 1, cancers: 1, biofilms: 0, boss: None),
    lvl!(9, "Septic Tide",
        "Everything at once. Hold the line.",
        CLEAR_ALL,
        [s(Virus, None, 18.0, 2), s(Bacteria, None, 32.0, 2),
         s(Parasite, Some(Stalker), 26.0, 1), s(Fungus, None, 44.0, 1)],
        prions: 1, cancers: 1, biofilms: 0, boss: None),
    lvl!(10, "The Colony",
        "A bacterial chain snakes through the plasma. Its body scatters when the head falls.",
        "Destroy the Bacterial Colony and its remnants",
        [], prions: 0, cancers: 0, biofilms: 0, boss: Some(BossKind::BacterialColony)),
    lvl!(11, "Slick Walls",
        "Biofilm drifters shrug off the first volley. Break the film, then the core.",
        CLEAR_ALL,
        [s(Bacteria, None, 32.0, 2), s(Virus, None, 24.0, 1)],
        prions: 0, cancers: 0, biofilms: 2, boss: None),
    lvl!(12, "Double Helix",
        "Armored and swift variants hunt in pairs.",
        CLEAR_ALL,
        [s(Bacteria, Some(Armored), 32.0, 2), s(Virus, Some(Swift), 20.0, 2),
         s(Fungus, None, 42.0, 1)],
        prions: 1, cancers: 0, biofilms: 1, boss: None),
    lvl!(13, "Malignant",
        "Multiple growths, already dividing.",
        "Excise every growth",
        [s(Virus, None, 24.0, 1), s(Bacteria, None, 32.0, 1)],
        prions: 1, cancers: 2, biofilms: 1, boss: None),
    lvl!(14, "Overrun",
        "The bloodstream is thick with hostiles. Conserve nothing.",
        CLEAR_ALL,
        [s(Virus, Some(Swift), 18.0, 2), s(Bacteria, None, 34.0, 2),
         s(Parasite, Some(Stalker), 26.0, 1), s(Fungus, None, 46.0, 2)],
        prions: 1, cancers: 1, biofilms: 1, boss: None),
    lvl!(15, "The Worm",
        "A segmented parasite threads the arena. Only the head bleeds.",
        "Defeat the Parasitic Worm",
        [], prions: 0, cancers: 0, biofilms: 0, boss: Some(BossKind::ParasiticWorm)),
    lvl!(16, "Relapse",
        "The infection returns, meaner than before.",
        CLEAR_ALL,
        [s(Virus, Some(Swift), 20.0, 2), s(Bacteria, Some(Armored), 34.0, 2),
         s(Fungus, None, 44.0, 2)],
        prions: 2, cancers: 1, biofilms: 1, boss: None),
    lvl!(17, "White Noise",
        "Prion swarms saturate the field. Watch the flicker.",
        CLEAR_ALL,
        [s(Bacteria, None, 30.0, 1), s(Virus, None, 25.0, 1)],
        prions: 3, cancers: 1, biofilms: 1, boss: None),
    lvl!(18, "Hard Shell",
        "Layered biofilms escort the heavies.",
        CLEAR_ALL,
        [s(Bacteria, Some(Armored), 36.0, 2), s(Fungus, None, 46.0, 1)],
        prions: 1, cancers: 1, biofilms: 3, boss: None),
    lvl!(19, "Last Stand",
        "Everything the body has ever fought, at once.",
        CLEAR_ALL,
        [s(Virus, Some(Swift), 18.0, 2), s(Bacteria, Some(Armored), 34.0, 2),
         s(Parasite, Some(Stalker), 28.0, 2), s(Fungus, None, 48.0, 2)],
        prions: 2, cancers: 2, biofilms: 2, boss: None),
    lvl!(20, "The Bloom",
        "A fungal mass blots out the arena, seeding spores as it advances. End this.",
        "Defeat the Fungal Bloom",
        [], prions: 0, cancers: 0, biofilms: 0, boss: Some(BossKind::FungalBloom)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_levels_numbered_in_order() {
        assert_eq!(LEVELS.len(), LEVEL_COUNT as usize);
        for (i, l) in LEVELS.iter().enumerate() {
            assert_eq!(l.number, i as u32 + 1);
        }
    }

    #[test]
    fn bosses_every_fifth_level() {
        for l in &LEVELS {
            if l.number % 5 == 0 {
                assert!(l.boss.is_some(), "level {} should have a boss", l.number);
                assert!(l.spawns.is_empty());
            } else {
                assert!(l.boss.is_none(), "level {} should not have a boss", l.number);
                assert!(!l.spawns.is_empty());
            }
        }
    }

    #[test]
    fn manifests_script_species_and_variants() {
        // "Double Helix" pairs armored bacteria with swift viruses by script
        let helix = level(12).unwrap();
        assert!(helix.spawns.iter().any(|s| {
            s.species == Species::Bacteria && s.variant == Some(Variant::Armored)
        }));
        assert!(helix.spawns.iter().any(|s| {
            s.species == Species::Virus && s.variant == Some(Variant::Swift)
        }));
        // variants only appear on the species that carries them
        for l in &LEVELS {
            for s in l.spawns {
                match s.variant {
                    Some(Variant::Armored) => assert_eq!(s.species, Species::Bacteria),
                    Some(Variant::Swift) => assert_eq!(s.species, Species::Virus),
                    Some(Variant::Stalker) => assert_eq!(s.species, Species::Parasite),
                    None => {}
                }
            }
        }
    }

    #[test]
    fn lookup_is_one_based() {
        assert_eq!(level(1).map(|l| l.title), Some("First Contact"));
        assert_eq!(level(20).map(|l| l.title), Some("The Bloom"));
        assert!(level(0).is_none());
        assert!(level(21).is_none());
    }
}
