//! # Skills Module
//!
//! Proficiency checks. A skill maps an officer's ability score through a
//! fixed adjustment to a target number; the check rolls 1d20 and succeeds
//! when the roll is at or under the target plus whatever situational
//! modifiers apply. Positive modifiers help, penalties come in negative.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::dice::Dice;
use crate::officer::{Abilities, CrewQuality, Officer};

/// The skill vocabulary the rules reference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Skill {
    Bargaining,
    Piloting,
    Navigation,
    Smuggling,
    Seamanship,
    Appraisal,
    Trade,
    CustomsInspection,
    ShipCarpentry,
    Shipwright,
    Swimming,
}

impl Skill {
    /// Target number for this skill given a stat block: ability score plus
    /// the skill's fixed adjustment.
    pub fn target(&self, abilities: &Abilities) -> i32 {
        match self {
            Skill::Bargaining => abilities.charisma - 2,
            Skill::Piloting => abilities.wisdom + 1,
            Skill::Navigation => abilities.intelligence - 3,
            Skill::Smuggling => abilities.wisdom - 4,
            Skill::Seamanship => abilities.dexterity + 1,
            Skill::Appraisal => abilities.intelligence,
            Skill::Trade => abilities.charisma - 1,
            Skill::CustomsInspection => abilities.intelligence - 2,
            Skill::ShipCarpentry => abilities.intelligence - 3,
            Skill::Shipwright => abilities.intelligence - 2,
            Skill::Swimming => abilities.strength,
        }
    }

    /// Unskilled piloting is still possible at WIS - 4; every other skill
    /// simply fails without training.
    fn unskilled_target(&self, abilities: &Abilities) -> Option<i32> {
        match self {
            Skill::Piloting => Some(abilities.wisdom - 4),
            _ => None,
        }
    }
}

impl Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Skill::Bargaining => write!(f, "bargaining"),
            Skill::Piloting => write!(f, "piloting"),
            Skill::Navigation => write!(f, "navigation"),
            Skill::Smuggling => write!(f, "smuggling"),
            Skill::Seamanship => write!(f, "seamanship"),
            Skill::Appraisal => write!(f, "appraisal"),
            Skill::Trade => write!(f, "trade"),
            Skill::CustomsInspection => write!(f, "customs inspection"),
            Skill::ShipCarpentry => write!(f, "ship carpentry"),
            Skill::Shipwright => write!(f, "shipwright"),
            Skill::Swimming => write!(f, "swimming"),
        }
    }
}

/// Outcome of a proficiency check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CheckResult {
    pub success: bool,
    /// The raw d20 roll (0 when no roll was possible, e.g. unskilled).
    pub roll: i32,
    /// Effective target the roll was compared against.
    pub needed: i32,
    /// How far over the target the roll landed; 0 on success.
    pub miss_margin: i32,
}

impl CheckResult {
    /// A check that never had a target: unskilled attempt at a skill with
    /// no fallback.
    pub fn untrained() -> Self {
        CheckResult::default()
    }

    /// Success margin: how far under the target the roll landed.
    pub fn margin(&self) -> i32 {
        (self.needed - self.roll).max(0)
    }

    /// Failure with an odd die roll. A few market rules treat odd-numbered
    /// failures as actively bad instead of merely neutral.
    pub fn odd_failure(&self) -> bool {
        !self.success && self.roll % 2 == 1
    }
}

/// Roll 1d20 against a precomputed target. Used directly for port-agent
/// transactions, where the agent's contracted skill value is the target.
pub fn check_against(dice: &mut Dice, needed: i32) -> CheckResult {
    let roll = dice.d20();
    CheckResult {
        success: roll <= needed,
        roll,
        needed,
        miss_margin: (roll - needed).max(0),
    }
}

/// Run a proficiency check for the ship's officers.
///
/// The captain rolls; `needed` is the skill target plus the crew-quality
/// modifier, the caller's situational `modifier` (penalties negative), and
/// +1 when the lieutenant also knows the skill. The lieutenant assist
/// never applies to smuggling or piloting, and smuggling instead gains +1
/// when either officer knows customs inspection.
pub fn officer_check(
    dice: &mut Dice,
    skill: Skill,
    captain: &Officer,
    lieutenant: Option<&Officer>,
    crew_quality: CrewQuality,
    modifier: i32,
) -> CheckResult {
    let target = if captain.has_skill(skill) {
        skill.target(&captain.abilities)
    } else {
        match skill.unskilled_target(&captain.abilities) {
            Some(fallback) => fallback,
            None => return CheckResult::untrained(),
        }
    };

    let mut effective = crew_quality.check_modifier() + modifier;
    match skill {
        Skill::Smuggling => {
            let inspector = captain.has_skill(Skill::CustomsInspection)
                || lieutenant.is_some_and(|lt| lt.has_skill(Skill::CustomsInspection));
            if inspector {
                effective += 1;
            }
        }
        Skill::Piloting => {}
        _ => {
            if lieutenant.is_some_and(|lt| lt.has_skill(skill)) {
                effective += 1;
            }
        }
    }

    check_against(dice, target + effective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::officer::Abilities;

    fn captain_with(skill: Skill, abilities: Abilities) -> Officer {
        Officer::new("Aldra", abilities).with_skills([skill])
    }

    #[test_log::test]
    fn test_skill_targets() {
        let abilities = Abilities {
            strength: 12,
            dexterity: 14,
            constitution: 10,
            intelligence: 13,
            wisdom: 17,
            charisma: 15,
        };
        assert_eq!(Skill::Bargaining.target(&abilities), 13);
        assert_eq!(Skill::Piloting.target(&abilities), 18);
        assert_eq!(Skill::Navigation.target(&abilities), 10);
        assert_eq!(Skill::Smuggling.target(&abilities), 13);
        assert_eq!(Skill::Seamanship.target(&abilities), 15);
    }

    #[test_log::test]
    fn test_unskilled_fails_except_piloting() {
        let mut dice = Dice::seeded(8);
        let captain = Officer::new("Aldra", Abilities::average());
        let result = officer_check(
            &mut dice,
            Skill::Bargaining,
            &captain,
            None,
            CrewQuality::Average,
            0,
        );
        assert!(!result.success);
        assert_eq!(result.roll, 0);

        // Piloting falls back to WIS - 4 and actually rolls.
        let result = officer_check(
            &mut dice,
            Skill::Piloting,
            &captain,
            None,
            CrewQuality::Average,
            0,
        );
        assert_eq!(result.needed, 6);
        assert!(result.roll >= 1);
    }

    #[test_log::test]
    fn test_hazard_penalty_lowers_target() {
        // WIS 17 pilot: target 18; a Major storm's -5 brings needed to 13.
        let mut abilities = Abilities::average();
        abilities.wisdom = 17;
        let captain = captain_with(Skill::Piloting, abilities);
        let mut dice = Dice::seeded(0);
        let result = officer_check(
            &mut dice,
            Skill::Piloting,
            &captain,
            None,
            CrewQuality::Average,
            -5,
        );
        assert_eq!(result.needed, 13);
    }

    #[test_log::test]
    fn test_lieutenant_assist_skips_piloting_and_smuggling() {
        let mut abilities = Abilities::average();
        abilities.wisdom = 14;
        abilities.charisma = 14;
        let captain = Officer::new("Aldra", abilities)
            .with_skills([Skill::Piloting, Skill::Smuggling, Skill::Bargaining]);
        let lieutenant = Officer::new("Merrin", abilities)
            .with_skills([Skill::Piloting, Skill::Smuggling, Skill::Bargaining]);

        let mut dice = Dice::seeded(2);
        let bargain = officer_check(
            &mut dice,
            Skill::Bargaining,
            &captain,
            Some(&lieutenant),
            CrewQuality::Average,
            0,
        );
        // CHA 14 - 2 = 12, +1 lieutenant assist.
        assert_eq!(bargain.needed, 13);

        let pilot = officer_check(
            &mut dice,
            Skill::Piloting,
            &captain,
            Some(&lieutenant),
            CrewQuality::Average,
            0,
        );
        assert_eq!(pilot.needed, 15); // WIS 14 + 1, no assist

        let smuggle = officer_check(
            &mut dice,
            Skill::Smuggling,
            &captain,
            Some(&lieutenant),
            CrewQuality::Average,
            0,
        );
        assert_eq!(smuggle.needed, 10); // WIS 14 - 4, no assist
    }

    #[test_log::test]
    fn test_customs_inspection_helps_smuggling() {
        let mut abilities = Abilities::average();
        abilities.wisdom = 14;
        let captain = Officer::new("Aldra", abilities)
            .with_skills([Skill::Smuggling, Skill::CustomsInspection]);
        let mut dice = Dice::seeded(2);
        let result = officer_check(
            &mut dice,
            Skill::Smuggling,
            &captain,
            None,
            CrewQuality::Average,
            0,
        );
        assert_eq!(result.needed, 11);
    }

    #[test_log::test]
    fn test_crew_quality_shifts_needed() {
        let mut abilities = Abilities::average();
        abilities.dexterity = 12;
        let captain = captain_with(Skill::Seamanship, abilities);
        let mut dice = Dice::seeded(6);
        let crack = officer_check(
            &mut dice,
            Skill::Seamanship,
            &captain,
            None,
            CrewQuality::Crack,
            0,
        );
        assert_eq!(crack.needed, 15); // DEX 12 + 1 skill + 2 crew
        let lubbers = officer_check(
            &mut dice,
            Skill::Seamanship,
            &captain,
            None,
            CrewQuality::Landlubber,
            0,
        );
        assert_eq!(lubbers.needed, 11);
    }

    #[test_log::test]
    fn test_margins() {
        let result = CheckResult {
            success: false,
            roll: 20,
            needed: 13,
            miss_margin: 7,
        };
        assert_eq!(result.margin(), 0);
        assert!(!result.odd_failure()); // roll 20 is even

        let result = CheckResult {
            success: true,
            roll: 9,
            needed: 13,
            miss_margin: 0,
        };
        assert_eq!(result.margin(), 4);
    }
}
