//! # Encounter Engine
//!
//! Daily sea-encounter checks and their resolution: what surfaced, how
//! far away, whether it menaces the ship, and what it costs in hull and
//! crew. Table data lives in [`tables`]; the fixed name sets that drive
//! behavior (what submerges, what thinks, what boards) live here next to
//! the rules that read them.

pub mod tables;

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[allow(unused_imports)]
use log::{debug, warn};

use crate::dice::Dice;
use crate::geography::WaterType;
use self::tables::{EncounterEntry, FrequencyClass};

/// Creatures that can submerge and surface close aboard.
const SUBMERSIBLE: &[&str] = &[
    "shark",
    "giant shark",
    "barracuda",
    "dolphin",
    "whale",
    "giant octopus",
    "giant squid",
    "sea serpent",
    "kraken",
    "leviathan",
    "dragon turtle",
    "merrow",
    "sahuagin",
    "lacedon",
    "triton",
    "nixie",
    "water naga",
    "giant pike",
    "crocodile",
    "giant crocodile",
    "giant snapping turtle",
    "giant leech",
    "giant crayfish",
    "manta ray",
    "scrag",
];

/// Creatures without meaningful intelligence; mitigation (oil, food) only
/// works on these.
const UNINTELLIGENT: &[&str] = &[
    "shark",
    "giant shark",
    "barracuda",
    "giant crayfish",
    "giant leech",
    "giant pike",
    "crocodile",
    "giant crocodile",
    "giant snapping turtle",
    "giant crab",
    "giant octopus",
    "giant squid",
    "whale",
    "manta ray",
    "sea serpent",
    "leviathan",
];

/// Always a threat regardless of size or temperament.
const EXPLICIT_THREATS: &[&str] = &[
    "pirate ship",
    "merrow",
    "scrag",
    "sahuagin",
    "lacedon",
    "sea hag",
    "harpy",
    "kraken",
    "sea serpent",
    "dragon turtle",
    "leviathan",
    "water naga",
];

/// Navigation hazards rather than creatures.
const HAZARDS: &[&str] = &["seaweed", "shoals", "reef", "whirlpool", "maelstrom", "ice floe"];

/// Ships, islands, and omens: things to hail or note, not fight.
const INTERACTIVE: &[&str] = &[
    "river barge",
    "merchant cog",
    "merchant caravel",
    "merchant galleon",
    "floating wreckage",
    "uncharted island",
    "river omen",
    "storm petrel omen",
];

/// Flyers that harass the rigging.
const AERIAL: &[&str] = &["harpy"];

/// Boarders that come over the rail and into the crew.
const BOARDING: &[&str] = &["merrow", "scrag", "ogre", "troll", "giant"];

/// When a check is made, by water type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeOfDay {
    Dawn,
    Morning,
    Noon,
    Evening,
    Midnight,
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeOfDay::Dawn => write!(f, "dawn"),
            TimeOfDay::Morning => write!(f, "morning"),
            TimeOfDay::Noon => write!(f, "noon"),
            TimeOfDay::Evening => write!(f, "evening"),
            TimeOfDay::Midnight => write!(f, "midnight"),
        }
    }
}

/// Check schedule: fresh water three checks, coastal and shallow two,
/// deep one.
pub fn check_times(water: WaterType) -> &'static [TimeOfDay] {
    match water {
        WaterType::Fresh => &[TimeOfDay::Morning, TimeOfDay::Evening, TimeOfDay::Midnight],
        WaterType::Coastal | WaterType::Shallow => &[TimeOfDay::Dawn, TimeOfDay::Noon],
        WaterType::Deep => &[TimeOfDay::Noon],
    }
}

/// What an encounter amounts to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Classification {
    Hazard,
    Interactive,
    Threat,
    Sighting,
}

impl Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Hazard => write!(f, "hazard"),
            Classification::Interactive => write!(f, "interactive"),
            Classification::Threat => write!(f, "threat"),
            Classification::Sighting => write!(f, "sighting"),
        }
    }
}

/// How a ship-harmful creature does its harm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ThreatKind {
    Pirate,
    Aerial,
    Large,
    Boarding,
    Small,
}

/// Which navigation hazard an entry names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HazardKind {
    Seaweed,
    Shoals,
    Reef,
    Whirlpool,
    Maelstrom,
    Ice,
}

impl HazardKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "seaweed" => Some(HazardKind::Seaweed),
            "shoals" => Some(HazardKind::Shoals),
            "reef" => Some(HazardKind::Reef),
            "whirlpool" => Some(HazardKind::Whirlpool),
            "maelstrom" => Some(HazardKind::Maelstrom),
            "ice floe" => Some(HazardKind::Ice),
            _ => None,
        }
    }
}

/// A fully resolved encounter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Encounter {
    pub time_of_day: TimeOfDay,
    pub water: WaterType,
    pub name: String,
    pub category: FrequencyClass,
    pub classification: Classification,
    /// Effective distance in yards, surprise closure already applied.
    pub distance_yd: i32,
    pub surprised: bool,
    pub number_appearing: i32,
    pub is_unintelligent: bool,
    pub can_be_driven_off: bool,
    pub threat_kind: Option<ThreatKind>,
    pub hazard_kind: Option<HazardKind>,
    /// Per-creature hit dice from the table entry.
    pub base_hd: i32,
    pub capsize_risk: bool,
    pub description: String,
}

impl Encounter {
    /// Combined hit dice of everything that showed up.
    pub fn total_hd(&self) -> i32 {
        self.base_hd * self.number_appearing
    }
}

/// Run one scheduled check: an encounter only happens on a d20 roll of 1.
pub fn check_for_encounter(
    dice: &mut Dice,
    water: WaterType,
    time: TimeOfDay,
) -> Option<Encounter> {
    if dice.d20() != 1 {
        return None;
    }
    let class = FrequencyClass::from_d100(dice.d100());
    let entries = tables::entries(water, class);
    if entries.is_empty() {
        warn!("no encounter entries for {water} / {class}");
        return None;
    }
    let pick = dice.range(0, entries.len() as i32 - 1) as usize;
    Some(resolve_entry(dice, water, time, class, &entries[pick]))
}

/// Resolve a chosen table entry into a full encounter.
pub fn resolve_entry(
    dice: &mut Dice,
    water: WaterType,
    time: TimeOfDay,
    category: FrequencyClass,
    entry: &EncounterEntry,
) -> Encounter {
    let name = entry.name.as_str();

    // Number appearing first, then distance, then surprise; the voyage
    // tests rely on this dice order.
    let number_appearing = if entry.number == "-" {
        1
    } else {
        match dice.roll(&entry.number) {
            Ok(n) => n.max(1),
            Err(e) => {
                warn!("bad number-appearing expression for {name}: {e}");
                1
            }
        }
    };

    // Submersibles surface close aboard; everything else shows at
    // line-of-sight range.
    let submerges = SUBMERSIBLE.contains(&name);
    let raw_distance = if submerges {
        dice.dice(6, 4)
    } else {
        dice.dice(6, 4) * 10
    };

    // Base 2-in-6 surprise unless the entry says otherwise. A surprised
    // crew loses ten yards of warning per surprise segment.
    let threshold = entry.surprise_in_6.unwrap_or(2);
    let surprise_roll = dice.d6();
    let surprised = surprise_roll <= threshold;
    let distance_yd = if surprised {
        (raw_distance - surprise_roll * 10).max(0)
    } else {
        raw_distance
    };

    let classification = classify(dice, entry);
    let hazard_kind = HazardKind::from_name(name);
    let is_unintelligent = UNINTELLIGENT.contains(&name);
    let threat_kind =
        (classification == Classification::Threat).then(|| threat_kind(name, entry));

    let description = describe(name, classification, number_appearing, distance_yd, time);
    debug!("encounter at {time}: {description}");

    Encounter {
        time_of_day: time,
        water,
        name: entry.name.clone(),
        category,
        classification,
        distance_yd,
        surprised,
        number_appearing,
        is_unintelligent,
        can_be_driven_off: is_unintelligent && classification == Classification::Threat,
        threat_kind,
        hazard_kind,
        base_hd: entry.hd,
        capsize_risk: entry.capsize,
        description,
    }
}

fn classify(dice: &mut Dice, entry: &EncounterEntry) -> Classification {
    let name = entry.name.as_str();
    if HAZARDS.contains(&name) {
        Classification::Hazard
    } else if INTERACTIVE.contains(&name) {
        Classification::Interactive
    } else if EXPLICIT_THREATS.contains(&name) {
        Classification::Threat
    } else if entry.size.ship_scale() && dice.percent(15) {
        // Big animals are only sometimes in the mood.
        Classification::Threat
    } else {
        Classification::Sighting
    }
}

fn threat_kind(name: &str, entry: &EncounterEntry) -> ThreatKind {
    if name.contains("pirate") {
        ThreatKind::Pirate
    } else if AERIAL.contains(&name) {
        ThreatKind::Aerial
    } else if BOARDING.contains(&name) {
        ThreatKind::Boarding
    } else if entry.size.ship_scale() {
        ThreatKind::Large
    } else {
        ThreatKind::Small
    }
}

fn describe(
    name: &str,
    classification: Classification,
    number: i32,
    distance_yd: i32,
    time: TimeOfDay,
) -> String {
    match classification {
        Classification::Sighting => {
            if number > 1 {
                format!("Spotted {name} ({number}) at {distance_yd} yards, {time}")
            } else {
                format!("Spotted {name} at {distance_yd} yards, {time}")
            }
        }
        Classification::Interactive => format!("Sighted {name} at {distance_yd} yards, {time}"),
        Classification::Hazard => format!("Ran into {name}, {time}"),
        Classification::Threat => {
            if number > 1 {
                format!("{number} {name} closing from {distance_yd} yards, {time}")
            } else {
                format!("{name} closing from {distance_yd} yards, {time}")
            }
        }
    }
}

/// What an encounter does to the ship once resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EncounterOutcome {
    pub hull_damage: i32,
    pub crew_loss: i32,
    /// Today's speed multiplier, when the hazard fouls the ship.
    pub speed_factor: Option<f64>,
    /// A seaweed bed sometimes forces one more check today.
    pub extra_check: bool,
    pub note: String,
}

/// Roll the damage an encounter inflicts.
///
/// Threats use the classifier: large creatures ram for 1dK with
/// K = max(2, 2 x totalHD/10), flyers tear rigging for 1d4, pirates cost
/// 1d6 in a boarding scuffle, boarders ram like large creatures and also
/// bleed the crew, small threats are noise. Anything with 6+ total HD
/// that can reach the deck takes 1d4 crew with it.
pub fn resolve_outcome(dice: &mut Dice, encounter: &Encounter) -> EncounterOutcome {
    match encounter.classification {
        Classification::Hazard => hazard_outcome(dice, encounter),
        Classification::Threat => threat_outcome(dice, encounter),
        _ => EncounterOutcome {
            note: encounter.description.clone(),
            ..Default::default()
        },
    }
}

fn threat_outcome(dice: &mut Dice, encounter: &Encounter) -> EncounterOutcome {
    let kind = encounter.threat_kind.unwrap_or(ThreatKind::Small);
    let total_hd = encounter.total_hd();
    let ram = |dice: &mut Dice| {
        let k = (2 * (total_hd / 10)).max(2);
        dice.d(k)
    };
    let (hull_damage, deck_reach, note) = match kind {
        ThreatKind::Large => (
            ram(dice),
            false,
            format!("{} battered the hull", encounter.name),
        ),
        ThreatKind::Aerial => (
            dice.d(4),
            true,
            format!("{} tore at the rigging and sails", encounter.name),
        ),
        ThreatKind::Pirate => (
            dice.d(6),
            true,
            "repelled a boarding action".to_string(),
        ),
        ThreatKind::Boarding => (
            ram(dice),
            true,
            format!("{} came over the rail", encounter.name),
        ),
        ThreatKind::Small => (
            0,
            false,
            format!("{} harried the ship to no effect", encounter.name),
        ),
    };

    let crew_loss = if total_hd >= 6 && deck_reach {
        dice.d(4)
    } else {
        0
    };

    EncounterOutcome {
        hull_damage,
        crew_loss,
        speed_factor: None,
        extra_check: false,
        note,
    }
}

fn hazard_outcome(dice: &mut Dice, encounter: &Encounter) -> EncounterOutcome {
    match encounter.hazard_kind {
        Some(HazardKind::Whirlpool) | Some(HazardKind::Maelstrom) => EncounterOutcome {
            hull_damage: dice.dice(2, 10),
            note: format!("fought clear of the {}", encounter.name),
            ..Default::default()
        },
        Some(HazardKind::Ice) => {
            let mut damage = dice.d6();
            let holed = dice.percent(10);
            if holed {
                damage += dice.d6();
            }
            EncounterOutcome {
                hull_damage: damage,
                note: if holed {
                    "ice holed the ship below the waterline".to_string()
                } else {
                    "scraped along an ice floe".to_string()
                },
                ..Default::default()
            }
        }
        Some(HazardKind::Reef) | Some(HazardKind::Shoals) => EncounterOutcome {
            hull_damage: dice.dice(2, 6),
            note: format!("ground across {}", encounter.name),
            ..Default::default()
        },
        Some(HazardKind::Seaweed) => EncounterOutcome {
            speed_factor: Some(0.5),
            extra_check: dice.percent(40),
            note: "fouled in a seaweed bed, making half speed".to_string(),
            ..Default::default()
        },
        None => EncounterOutcome::default(),
    }
}

/// Mitigation methods against unintelligent threats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Mitigation {
    /// Flaming oil over the side; better odds if the creature is already
    /// burning.
    FlamingOil { burning: bool },
    /// Throw food and run.
    Food,
}

/// Attempt to drive an unintelligent threat off. Oil works on 75 or less
/// (90 if it is already burning); food ends it on 50 or less.
pub fn attempt_mitigation(dice: &mut Dice, method: Mitigation) -> bool {
    match method {
        Mitigation::FlamingOil { burning } => dice.percent(if burning { 90 } else { 75 }),
        Mitigation::Food => dice.percent(50),
    }
}

/// Capsize chance against gargantuan creatures or entries flagged for it,
/// derived from the ship's hull: small hulls roll over easily.
pub fn capsize_chance(hull_max: i32) -> i32 {
    let tier = if hull_max <= 10 {
        15
    } else if hull_max <= 20 {
        10
    } else if hull_max <= 40 {
        5
    } else if hull_max >= 80 {
        -10
    } else if hull_max >= 60 {
        -5
    } else {
        0
    };
    10 + tier
}
