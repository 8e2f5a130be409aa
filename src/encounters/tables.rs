//! # Encounter Tables
//!
//! Static encounter reference data, keyed by water type and frequency
//! class. Rows are compact strings parsed once at startup; the fixed name
//! sets (what submerges, what thinks, what boards) live in the engine
//! next to the rules that read them.

use itertools::Itertools;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

use crate::geography::WaterType;

/// Frequency classes, rolled on d100 per encounter: 65/20/12/3.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FrequencyClass {
    Common,
    Uncommon,
    Rare,
    VeryRare,
}

impl FrequencyClass {
    pub fn from_d100(roll: i32) -> Self {
        match roll {
            i32::MIN..=65 => FrequencyClass::Common,
            66..=85 => FrequencyClass::Uncommon,
            86..=97 => FrequencyClass::Rare,
            _ => FrequencyClass::VeryRare,
        }
    }
}

impl Display for FrequencyClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrequencyClass::Common => write!(f, "common"),
            FrequencyClass::Uncommon => write!(f, "uncommon"),
            FrequencyClass::Rare => write!(f, "rare"),
            FrequencyClass::VeryRare => write!(f, "very rare"),
        }
    }
}

/// Creature size codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeClass {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
    Gargantuan,
}

impl SizeClass {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "T" => Ok(SizeClass::Tiny),
            "S" => Ok(SizeClass::Small),
            "M" => Ok(SizeClass::Medium),
            "L" => Ok(SizeClass::Large),
            "H" => Ok(SizeClass::Huge),
            "G" => Ok(SizeClass::Gargantuan),
            other => Err(format!("unknown size class: {other:?}")),
        }
    }

    /// Sizes big enough to menace a ship when aggressive.
    pub fn ship_scale(&self) -> bool {
        matches!(self, SizeClass::Large | SizeClass::Huge | SizeClass::Gargantuan)
    }
}

/// One entry in the encounter tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncounterEntry {
    pub name: String,
    pub size: SizeClass,
    /// Base hit dice per creature; scales hull damage.
    pub hd: i32,
    /// Number-appearing dice expression; "-" means exactly one.
    pub number: String,
    /// Per-entry surprise override: "surprise N in 6".
    pub surprise_in_6: Option<i32>,
    /// Entry can capsize a vessel outright (dragon turtle and kin).
    pub capsize: bool,
}

/// Table rows: [water, class, name, size, hd, number, flags].
/// Water is a comma list; flags are `surprise:N` and `capsize`.
static ENCOUNTER_ROWS: &[&[&str; 7]] = &[
    // Fresh water
    &["fresh", "common", "crocodile", "M", "3", "1d6", ""],
    &["fresh", "common", "giant crayfish", "L", "4", "2d4", ""],
    &["fresh", "common", "giant leech", "S", "2", "1d4", ""],
    &["fresh", "common", "river barge", "L", "0", "-", ""],
    &["fresh", "common", "shoals", "L", "0", "-", ""],
    &["fresh", "uncommon", "giant pike", "L", "4", "1d4", ""],
    &["fresh", "uncommon", "nixie", "S", "1", "2d10", "surprise:4"],
    &["fresh", "uncommon", "giant snapping turtle", "L", "6", "-", ""],
    &["fresh", "uncommon", "seaweed", "M", "0", "-", ""],
    &["fresh", "rare", "giant crocodile", "H", "7", "1d3", ""],
    &["fresh", "rare", "water naga", "L", "8", "1d2", ""],
    &["fresh", "rare", "whirlpool", "L", "0", "-", ""],
    &["fresh", "very rare", "river omen", "M", "0", "-", ""],
    &["fresh", "very rare", "dragon turtle", "G", "12", "-", "capsize"],
    // Coastal water
    &["coastal", "common", "shark", "M", "3", "3d4", ""],
    &["coastal", "common", "dolphin", "M", "2", "2d10", ""],
    &["coastal", "common", "merchant cog", "L", "0", "-", ""],
    &["coastal", "common", "seaweed", "M", "0", "-", ""],
    &["coastal", "common", "shoals", "L", "0", "-", ""],
    &["coastal", "uncommon", "merrow", "M", "2", "2d6", "surprise:3"],
    &["coastal", "uncommon", "pirate ship", "L", "0", "-", ""],
    &["coastal", "uncommon", "harpy", "M", "3", "1d6", ""],
    &["coastal", "uncommon", "reef", "L", "0", "-", ""],
    &["coastal", "rare", "scrag", "L", "6", "1d4", "surprise:3"],
    &["coastal", "rare", "sea hag", "M", "3", "1d3", ""],
    &["coastal", "rare", "giant octopus", "L", "8", "1d2", ""],
    &["coastal", "very rare", "sea serpent", "G", "10", "-", ""],
    &["coastal", "very rare", "dragon turtle", "G", "12", "-", "capsize"],
    // Shallow water
    &["shallow", "common", "shark", "M", "3", "3d4", ""],
    &["shallow", "common", "barracuda", "M", "2", "2d6", ""],
    &["shallow", "common", "merchant caravel", "L", "0", "-", ""],
    &["shallow", "common", "seaweed", "M", "0", "-", ""],
    &["shallow", "common", "shoals", "L", "0", "-", ""],
    &["shallow", "uncommon", "giant crab", "L", "3", "2d4", ""],
    &["shallow", "uncommon", "sahuagin", "M", "2", "1d4x10", "surprise:3"],
    &["shallow", "uncommon", "lacedon", "M", "2", "2d8", ""],
    &["shallow", "uncommon", "reef", "L", "0", "-", ""],
    &["shallow", "rare", "giant squid", "H", "12", "-", ""],
    &["shallow", "rare", "triton", "M", "3", "1d6", ""],
    &["shallow", "rare", "uncharted island", "G", "0", "-", ""],
    &["shallow", "very rare", "kraken", "G", "20", "-", "capsize"],
    &["shallow", "very rare", "maelstrom", "G", "0", "-", ""],
    // Deep water
    &["deep", "common", "dolphin", "M", "2", "2d10", ""],
    &["deep", "common", "whale", "H", "9", "1d3", ""],
    &["deep", "common", "merchant galleon", "L", "0", "-", ""],
    &["deep", "common", "floating wreckage", "L", "0", "-", ""],
    &["deep", "uncommon", "giant shark", "H", "10", "1d2", ""],
    &["deep", "uncommon", "manta ray", "L", "6", "1d2", ""],
    &["deep", "uncommon", "storm petrel omen", "S", "0", "-", ""],
    &["deep", "uncommon", "ice floe", "G", "0", "-", ""],
    &["deep", "rare", "sea serpent", "G", "10", "-", ""],
    &["deep", "rare", "giant squid", "H", "12", "-", ""],
    &["deep", "rare", "whirlpool", "L", "0", "-", ""],
    &["deep", "very rare", "kraken", "G", "20", "-", "capsize"],
    &["deep", "very rare", "leviathan", "G", "16", "-", "capsize"],
    &["deep", "very rare", "maelstrom", "G", "0", "-", ""],
];

fn parse_class(s: &str) -> Result<FrequencyClass, String> {
    match s {
        "common" => Ok(FrequencyClass::Common),
        "uncommon" => Ok(FrequencyClass::Uncommon),
        "rare" => Ok(FrequencyClass::Rare),
        "very rare" => Ok(FrequencyClass::VeryRare),
        other => Err(format!("unknown frequency class: {other:?}")),
    }
}

fn parse_row(row: &[&str; 7]) -> Result<(Vec<WaterType>, FrequencyClass, EncounterEntry), String> {
    let waters = row[0]
        .split(',')
        .map(WaterType::parse)
        .collect::<Result<Vec<_>, _>>()?;
    let class = parse_class(row[1])?;

    let mut surprise_in_6 = None;
    let mut capsize = false;
    for flag in row[6].split_whitespace() {
        if let Some(n) = flag.strip_prefix("surprise:") {
            surprise_in_6 = Some(
                n.parse::<i32>()
                    .map_err(|_| format!("{}: bad surprise flag {flag:?}", row[2]))?,
            );
        } else if flag == "capsize" {
            capsize = true;
        } else {
            return Err(format!("{}: unknown flag {flag:?}", row[2]));
        }
    }

    let entry = EncounterEntry {
        name: row[2].to_string(),
        size: SizeClass::parse(row[3])?,
        hd: row[4]
            .parse::<i32>()
            .map_err(|_| format!("{}: bad hit dice {:?}", row[2], row[4]))?,
        number: row[5].to_string(),
        surprise_in_6,
        capsize,
    };
    Ok((waters, class, entry))
}

lazy_static! {
    static ref ENCOUNTER_TABLES: HashMap<(WaterType, FrequencyClass), Vec<EncounterEntry>> =
        ENCOUNTER_ROWS
            .iter()
            .flat_map(|row| {
                let (waters, class, entry) =
                    parse_row(row).unwrap_or_else(|e| panic!("bad encounter row: {e}"));
                waters
                    .into_iter()
                    .map(move |water| ((water, class), entry.clone()))
                    .collect::<Vec<_>>()
            })
            .into_group_map();
}

/// All entries for a water/class pair. Every pair in the registry is
/// non-empty; an empty slice means the pair was never stocked.
pub fn entries(water: WaterType, class: FrequencyClass) -> &'static [EncounterEntry] {
    ENCOUNTER_TABLES
        .get(&(water, class))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_every_bucket_is_stocked() {
        for water in [
            WaterType::Fresh,
            WaterType::Coastal,
            WaterType::Shallow,
            WaterType::Deep,
        ] {
            for class in [
                FrequencyClass::Common,
                FrequencyClass::Uncommon,
                FrequencyClass::Rare,
                FrequencyClass::VeryRare,
            ] {
                assert!(
                    !entries(water, class).is_empty(),
                    "no entries for {water} / {class}"
                );
            }
        }
    }

    #[test_log::test]
    fn test_frequency_class_bands() {
        assert_eq!(FrequencyClass::from_d100(1), FrequencyClass::Common);
        assert_eq!(FrequencyClass::from_d100(65), FrequencyClass::Common);
        assert_eq!(FrequencyClass::from_d100(66), FrequencyClass::Uncommon);
        assert_eq!(FrequencyClass::from_d100(85), FrequencyClass::Uncommon);
        assert_eq!(FrequencyClass::from_d100(86), FrequencyClass::Rare);
        assert_eq!(FrequencyClass::from_d100(97), FrequencyClass::Rare);
        assert_eq!(FrequencyClass::from_d100(98), FrequencyClass::VeryRare);
        assert_eq!(FrequencyClass::from_d100(100), FrequencyClass::VeryRare);
    }

    #[test_log::test]
    fn test_flags_parse() {
        let merrow = entries(WaterType::Coastal, FrequencyClass::Uncommon)
            .iter()
            .find(|entry| entry.name == "merrow")
            .unwrap();
        assert_eq!(merrow.surprise_in_6, Some(3));
        assert!(!merrow.capsize);

        let kraken = entries(WaterType::Deep, FrequencyClass::VeryRare)
            .iter()
            .find(|entry| entry.name == "kraken")
            .unwrap();
        assert!(kraken.capsize);
        assert_eq!(kraken.size, SizeClass::Gargantuan);
    }
}
