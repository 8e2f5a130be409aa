//! # Officer Module
//!
//! Ship's officers (captain and lieutenant) carry the ability scores and
//! skill sets that every proficiency check reads. Crew quality is a
//! ship-wide modifier applied on top of the officer's own numbers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

use crate::dice::Dice;
use crate::skills::Skill;

/// The six ability scores, 3-18 each.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Abilities {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl Abilities {
    /// All-10s stat block, the baseline for generated officers.
    pub fn average() -> Self {
        Abilities {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }

    /// True when every score sits in the legal 3-18 range.
    pub fn in_range(&self) -> bool {
        [
            self.strength,
            self.dexterity,
            self.constitution,
            self.intelligence,
            self.wisdom,
            self.charisma,
        ]
        .iter()
        .all(|score| (3..=18).contains(score))
    }

    /// Reaction adjustment from charisma, used for merchant availability.
    ///
    /// CHA 5 or less -2, 6-8 -1, 9-13 0, 14-15 +1, 16-17 +2, 18+ +3.
    pub fn reaction_adjustment(&self) -> i32 {
        match self.charisma {
            i32::MIN..=5 => -2,
            6..=8 => -1,
            9..=13 => 0,
            14..=15 => 1,
            16..=17 => 2,
            _ => 3,
        }
    }
}

impl Default for Abilities {
    fn default() -> Self {
        Self::average()
    }
}

/// A ship's officer: captain or lieutenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Officer {
    pub name: String,
    pub abilities: Abilities,
    /// Known skills. Absence means the officer attempts unskilled (which
    /// fails for everything except piloting).
    pub skills: BTreeSet<Skill>,
    /// Experience level; captains without one are filled from a 1d10 table.
    pub level: Option<i32>,
}

impl Officer {
    pub fn new(name: impl Into<String>, abilities: Abilities) -> Self {
        Officer {
            name: name.into(),
            abilities,
            skills: BTreeSet::new(),
            level: None,
        }
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = Skill>) -> Self {
        self.skills.extend(skills);
        self
    }

    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }

    /// Resolve the officer's level, rolling the captain fill table when it
    /// was never set: 1d10 of 1-4 gives 5, 5-7 gives 6, 8-9 gives 7, 10
    /// gives 8.
    pub fn resolve_level(&mut self, dice: &mut Dice) -> i32 {
        if let Some(level) = self.level {
            return level;
        }
        let level = match dice.d(10) {
            1..=4 => 5,
            5..=7 => 6,
            8..=9 => 7,
            _ => 8,
        };
        self.level = Some(level);
        level
    }
}

/// Crew quality grades, best to worst. Each grade is a flat modifier on
/// every proficiency check made aboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CrewQuality {
    Landlubber,
    Green,
    #[default]
    Average,
    Trained,
    Crack,
    OldSalts,
}

impl CrewQuality {
    /// Check modifier for the grade. Old Salts cap at the same +2 as a
    /// Crack crew.
    pub fn check_modifier(&self) -> i32 {
        match self {
            CrewQuality::Landlubber => -2,
            CrewQuality::Green => -1,
            CrewQuality::Average => 0,
            CrewQuality::Trained => 1,
            CrewQuality::Crack => 2,
            CrewQuality::OldSalts => 2,
        }
    }
}

impl Display for CrewQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrewQuality::Landlubber => write!(f, "Landlubber"),
            CrewQuality::Green => write!(f, "Green"),
            CrewQuality::Average => write!(f, "Average"),
            CrewQuality::Trained => write!(f, "Trained"),
            CrewQuality::Crack => write!(f, "Crack"),
            CrewQuality::OldSalts => write!(f, "Old Salts"),
        }
    }
}

impl From<&str> for CrewQuality {
    fn from(s: &str) -> Self {
        match s {
            "Landlubber" => CrewQuality::Landlubber,
            "Green" => CrewQuality::Green,
            "Trained" => CrewQuality::Trained,
            "Crack" => CrewQuality::Crack,
            "Old Salts" => CrewQuality::OldSalts,
            _ => CrewQuality::Average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_reaction_adjustment_bands() {
        let mut abilities = Abilities::average();
        for (cha, expected) in [(3, -2), (5, -2), (6, -1), (9, 0), (13, 0), (14, 1), (17, 2), (18, 3)]
        {
            abilities.charisma = cha;
            assert_eq!(abilities.reaction_adjustment(), expected, "cha {cha}");
        }
    }

    #[test_log::test]
    fn test_ability_range_check() {
        let mut abilities = Abilities::average();
        assert!(abilities.in_range());
        abilities.wisdom = 2;
        assert!(!abilities.in_range());
        abilities.wisdom = 19;
        assert!(!abilities.in_range());
    }

    #[test_log::test]
    fn test_captain_level_fill_table() {
        // The fill table maps every d10 face into 5..=8 and the rolled
        // level sticks.
        for seed in 0..32 {
            let mut dice = Dice::seeded(seed);
            let mut captain = Officer::new("Aldra", Abilities::average());
            let level = captain.resolve_level(&mut dice);
            assert!((5..=8).contains(&level));
            assert_eq!(captain.level, Some(level));
            assert_eq!(captain.resolve_level(&mut dice), level);
        }
    }

    #[test_log::test]
    fn test_explicit_level_is_kept() {
        let mut dice = Dice::seeded(1);
        let mut captain = Officer::new("Aldra", Abilities::average());
        captain.level = Some(3);
        assert_eq!(captain.resolve_level(&mut dice), 3);
    }

    #[test_log::test]
    fn test_crew_quality_round_trip() {
        for quality in [
            CrewQuality::Landlubber,
            CrewQuality::Green,
            CrewQuality::Average,
            CrewQuality::Trained,
            CrewQuality::Crack,
            CrewQuality::OldSalts,
        ] {
            assert_eq!(CrewQuality::from(quality.to_string().as_str()), quality);
        }
    }
}
