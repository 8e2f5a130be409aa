//! # Cargo Module
//!
//! Cargo categories, the sale-adjustment table, and the distance tables
//! that both the trading strategy and the market resolver read. A load is
//! a half-ton unit; all values are gold pieces per load.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The five cargo categories, cheapest to dearest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum CargoCategory {
    Primitive,
    Consumer,
    Comfort,
    Fine,
    Precious,
}

impl CargoCategory {
    /// Base value in gp per load.
    pub fn base_value(&self) -> i32 {
        match self {
            CargoCategory::Primitive => 50,
            CargoCategory::Consumer => 150,
            CargoCategory::Comfort => 400,
            CargoCategory::Fine => 1000,
            CargoCategory::Precious => 3000,
        }
    }

    /// Map a 3d6 determination roll (after modifiers, clamped to 3-20) to
    /// a category.
    pub fn from_determination_roll(roll: i32) -> Self {
        match roll.clamp(3, 20) {
            3..=8 => CargoCategory::Primitive,
            9..=12 => CargoCategory::Consumer,
            13..=15 => CargoCategory::Comfort,
            16..=18 => CargoCategory::Fine,
            _ => CargoCategory::Precious,
        }
    }
}

impl Display for CargoCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CargoCategory::Primitive => write!(f, "primitive"),
            CargoCategory::Consumer => write!(f, "consumer"),
            CargoCategory::Comfort => write!(f, "comfort"),
            CargoCategory::Fine => write!(f, "fine"),
            CargoCategory::Precious => write!(f, "precious"),
        }
    }
}

/// Sale-adjustment lookup: an SA roll maps to a percentage of base value.
///
/// | SA | 3  | 4  | 5  | 6  | 7  | 8  | 9  | 10  | 11  | 12  | 13  | 14  | 15  | 16  | 17  | 18  | 19  | 20  |
/// |----|----|----|----|----|----|----|----|-----|-----|-----|-----|-----|-----|-----|-----|-----|-----|-----|
/// | %  | 30 | 40 | 50 | 60 | 70 | 80 | 90 | 100 | 110 | 120 | 130 | 140 | 150 | 160 | 180 | 200 | 300 | 400 |
///
/// Rolls below 3 clamp to 30%, above 20 to 400%.
pub fn sale_adjustment_pct(sa_roll: i32) -> i32 {
    match sa_roll.clamp(3, 20) {
        roll @ 3..=16 => (roll - 3) * 10 + 30,
        17 => 180,
        18 => 200,
        19 => 300,
        _ => 400,
    }
}

/// Distance bonus on a sale, by miles traveled since purchase.
pub fn distance_bonus(distance_mi: i32) -> i32 {
    if distance_mi > 500 {
        4
    } else if distance_mi > 250 {
        2
    } else if distance_mi > 80 {
        0
    } else {
        -1
    }
}

/// Distance categories rolled at sale time. The same roll feeds both the
/// sale modifier and the perishability threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum DistanceCategory {
    Short,
    Medium,
    Long,
    Extraordinary,
}

impl DistanceCategory {
    /// Roll the category on 1d6: 1-2 Short, 3-5 Medium, 6 Long. A voyage
    /// over 500 miles is Extraordinary no matter what the die says.
    pub fn from_roll(d6: i32, actual_distance_mi: i32) -> Self {
        if actual_distance_mi > 500 {
            return DistanceCategory::Extraordinary;
        }
        match d6 {
            1..=2 => DistanceCategory::Short,
            3..=5 => DistanceCategory::Medium,
            _ => DistanceCategory::Long,
        }
    }

    /// Sale modifier for the category.
    pub fn sale_modifier(&self) -> i32 {
        match self {
            DistanceCategory::Short => -1,
            DistanceCategory::Medium => 0,
            DistanceCategory::Long => 2,
            DistanceCategory::Extraordinary => 4,
        }
    }

    /// Perishability threshold in miles; cargo carried further than the
    /// category's threshold starts risking spoilage. Extraordinary has no
    /// threshold.
    pub fn spoilage_threshold_mi(&self) -> Option<i32> {
        match self {
            DistanceCategory::Short => Some(80),
            DistanceCategory::Medium => Some(250),
            DistanceCategory::Long => Some(500),
            DistanceCategory::Extraordinary => None,
        }
    }

    fn next(&self) -> Option<Self> {
        match self {
            DistanceCategory::Short => Some(DistanceCategory::Medium),
            DistanceCategory::Medium => Some(DistanceCategory::Long),
            DistanceCategory::Long => Some(DistanceCategory::Extraordinary),
            DistanceCategory::Extraordinary => None,
        }
    }

    /// How many category steps the actual distance overshoots this
    /// category's threshold. Each excess step is one spoilage roll.
    pub fn excess_steps(&self, actual_distance_mi: i32) -> i32 {
        let mut steps = 0;
        let mut category = *self;
        while let Some(threshold) = category.spoilage_threshold_mi() {
            if actual_distance_mi <= threshold {
                break;
            }
            match category.next() {
                Some(next) => {
                    steps += 1;
                    category = next;
                }
                None => break,
            }
        }
        steps
    }
}

impl Display for DistanceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceCategory::Short => write!(f, "Short"),
            DistanceCategory::Medium => write!(f, "Medium"),
            DistanceCategory::Long => write!(f, "Long"),
            DistanceCategory::Extraordinary => write!(f, "Extraordinary"),
        }
    }
}

/// The ship's current cargo. Loads of zero always means no type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CargoHold {
    pub category: Option<CargoCategory>,
    pub loads: i32,
    pub purchase_price_per_load: i32,
    /// Index of the leg on which the cargo came aboard; -1 means the
    /// origin port, before the first leg.
    pub purchase_leg_index: i32,
}

impl CargoHold {
    pub fn is_empty(&self) -> bool {
        self.loads == 0
    }

    /// Put cargo aboard, replacing whatever was held.
    pub fn stow(&mut self, category: CargoCategory, loads: i32, price_per_load: i32, leg: i32) {
        debug_assert!(loads > 0);
        self.category = Some(category);
        self.loads = loads;
        self.purchase_price_per_load = price_per_load;
        self.purchase_leg_index = leg;
    }

    /// Remove loads (sale or spoilage), clearing the type when the hold
    /// runs empty. Returns the number actually removed.
    pub fn remove(&mut self, loads: i32) -> i32 {
        let removed = loads.clamp(0, self.loads);
        self.loads -= removed;
        if self.loads == 0 {
            self.category = None;
            self.purchase_price_per_load = 0;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_determination_ranges() {
        assert_eq!(CargoCategory::from_determination_roll(1), CargoCategory::Primitive);
        assert_eq!(CargoCategory::from_determination_roll(8), CargoCategory::Primitive);
        assert_eq!(CargoCategory::from_determination_roll(9), CargoCategory::Consumer);
        assert_eq!(CargoCategory::from_determination_roll(12), CargoCategory::Consumer);
        assert_eq!(CargoCategory::from_determination_roll(15), CargoCategory::Comfort);
        assert_eq!(CargoCategory::from_determination_roll(16), CargoCategory::Fine);
        assert_eq!(CargoCategory::from_determination_roll(19), CargoCategory::Precious);
        assert_eq!(CargoCategory::from_determination_roll(25), CargoCategory::Precious);
    }

    #[test_log::test]
    fn test_sale_adjustment_table() {
        let expected = [
            (3, 30),
            (4, 40),
            (9, 90),
            (10, 100),
            (11, 110),
            (14, 140),
            (16, 160),
            (17, 180),
            (18, 200),
            (19, 300),
            (20, 400),
        ];
        for (roll, pct) in expected {
            assert_eq!(sale_adjustment_pct(roll), pct, "SA {roll}");
        }
        assert_eq!(sale_adjustment_pct(-2), 30);
        assert_eq!(sale_adjustment_pct(27), 400);
    }

    #[test_log::test]
    fn test_sale_adjustment_is_monotone() {
        for roll in 0..25 {
            assert!(sale_adjustment_pct(roll) <= sale_adjustment_pct(roll + 1));
        }
    }

    #[test_log::test]
    fn test_distance_bonus_is_monotone() {
        assert_eq!(distance_bonus(50), -1);
        assert_eq!(distance_bonus(80), -1);
        assert_eq!(distance_bonus(81), 0);
        assert_eq!(distance_bonus(250), 0);
        assert_eq!(distance_bonus(251), 2);
        assert_eq!(distance_bonus(500), 2);
        assert_eq!(distance_bonus(501), 4);
        for d in (0..1200).step_by(7) {
            assert!(distance_bonus(d) <= distance_bonus(d + 1));
        }
    }

    #[test_log::test]
    fn test_distance_category_roll_and_override() {
        assert_eq!(DistanceCategory::from_roll(1, 100), DistanceCategory::Short);
        assert_eq!(DistanceCategory::from_roll(4, 100), DistanceCategory::Medium);
        assert_eq!(DistanceCategory::from_roll(6, 100), DistanceCategory::Long);
        // Over 500 miles the override wins regardless of the die.
        assert_eq!(
            DistanceCategory::from_roll(1, 600),
            DistanceCategory::Extraordinary
        );
        assert_eq!(DistanceCategory::Extraordinary.sale_modifier(), 4);
    }

    #[test_log::test]
    fn test_excess_steps() {
        // Short threshold 80, carried 600 miles: Medium, Long,
        // Extraordinary -> 3 steps.
        assert_eq!(DistanceCategory::Short.excess_steps(600), 3);
        assert_eq!(DistanceCategory::Short.excess_steps(80), 0);
        assert_eq!(DistanceCategory::Short.excess_steps(200), 1);
        assert_eq!(DistanceCategory::Medium.excess_steps(600), 2);
        assert_eq!(DistanceCategory::Long.excess_steps(501), 1);
        assert_eq!(DistanceCategory::Extraordinary.excess_steps(5000), 0);
    }

    #[test_log::test]
    fn test_hold_invariant() {
        let mut hold = CargoHold::default();
        assert!(hold.is_empty());
        hold.stow(CargoCategory::Consumer, 20, 140, -1);
        assert_eq!(hold.remove(5), 5);
        assert_eq!(hold.loads, 15);
        assert_eq!(hold.category, Some(CargoCategory::Consumer));
        assert_eq!(hold.remove(99), 15);
        assert!(hold.is_empty());
        assert_eq!(hold.category, None);
    }
}
