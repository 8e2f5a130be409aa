//! # Port Services
//!
//! Everything a harbor charges for or offers: entrance and moorage fees,
//! the three ways to mend a hull, crew hiring against the required
//! complement, and passenger or charter bookings for the legs ahead.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[allow(unused_imports)]
use log::{debug, info};

use crate::dice::Dice;
use crate::geography::PortSize;
use crate::officer::{CrewQuality, Officer};
use crate::skills::{officer_check, Skill};

/// How the ship is moored for the stay.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Moorage {
    /// Alongside a berth: 1 gp per hull point per day.
    Berth,
    /// Swinging at anchor: 5 gp a day flat.
    Anchor,
}

impl Display for Moorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Moorage::Berth => write!(f, "berth"),
            Moorage::Anchor => write!(f, "anchor"),
        }
    }
}

/// The fees assessed on entry, paid in full up front.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortFees {
    pub entrance: i32,
    pub pilot: i32,
    pub moorage: Moorage,
    pub moorage_cost: i32,
    pub days: i32,
}

impl PortFees {
    pub fn total(&self) -> i64 {
        i64::from(self.entrance) + i64::from(self.pilot) + i64::from(self.moorage_cost)
    }
}

/// Assess port fees for a stay: entrance 1d10+10, harbor pilot one gp per
/// hull point, and moorage. A berth is taken only when one is free (80%)
/// and the ship either needs repair work (over 10% damage) or is small
/// enough (hull 5 or less) that a berth costs little.
pub fn assess_port_fees(
    dice: &mut Dice,
    hull_max: i32,
    damage_pct: i32,
    days_in_port: i32,
) -> PortFees {
    let entrance = dice.d(10) + 10;
    let pilot = hull_max;

    let berth_free = dice.percent(80);
    let wants_berth = damage_pct > 10 || hull_max <= 5;
    let (moorage, moorage_cost) = if berth_free && wants_berth {
        (Moorage::Berth, hull_max * days_in_port)
    } else {
        (Moorage::Anchor, 5 * days_in_port)
    };

    PortFees {
        entrance,
        pilot,
        moorage,
        moorage_cost,
        days: days_in_port,
    }
}

/// The three ways to mend a hull.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RepairMethod {
    Professional,
    Drydock,
    SelfRepair,
}

impl Display for RepairMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairMethod::Professional => write!(f, "professional"),
            RepairMethod::Drydock => write!(f, "drydock"),
            RepairMethod::SelfRepair => write!(f, "self-repair"),
        }
    }
}

/// A patch that did not hold: it fails again after the expiry day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemporaryRepair {
    pub points: i32,
    /// Voyage day on which the patch lets go.
    pub expires_on_day: i32,
}

/// A costed repair plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepairPlan {
    pub method: RepairMethod,
    pub cost: i64,
    pub days: i32,
    pub points_restored: i32,
    pub temporary: Vec<TemporaryRepair>,
}

/// Professional yard work: 100 gp and a day per point, restores to full.
pub fn professional_repair(damage: i32) -> RepairPlan {
    RepairPlan {
        method: RepairMethod::Professional,
        cost: 100 * i64::from(damage),
        days: damage,
        points_restored: damage,
        temporary: Vec::new(),
    }
}

/// Drydock work: same labor bill, but faster (six days per ten points)
/// with the dock itself billed daily at five gp per hull point, scaled by
/// port size.
pub fn drydock_repair(damage: i32, hull_max: i32, size: PortSize) -> RepairPlan {
    let days = (damage * 6 + 9) / 10; // ceil(damage * 0.6)
    let daily_fee = (f64::from(hull_max) * 5.0 * (1.0 + size.drydock_fee_modifier())).round() as i64;
    RepairPlan {
        method: RepairMethod::Drydock,
        cost: 100 * i64::from(damage) + i64::from(days) * daily_fee,
        days,
        points_restored: damage,
        temporary: Vec::new(),
    }
}

/// Self-repair by a carpenter officer: 50 gp and a week per point, at
/// most half the hull's maximum. Each point takes a proficiency check;
/// a failed check still patches the point, but the patch fails again in
/// 1d6 days.
///
/// Returns None when neither officer can swing a mallet.
pub fn self_repair(
    dice: &mut Dice,
    damage: i32,
    hull_max: i32,
    captain: &Officer,
    lieutenant: Option<&Officer>,
    crew_quality: CrewQuality,
    voyage_day: i32,
) -> Option<RepairPlan> {
    let skill = [Skill::ShipCarpentry, Skill::Shipwright]
        .into_iter()
        .find(|&skill| {
            captain.has_skill(skill) || lieutenant.is_some_and(|lt| lt.has_skill(skill))
        })?;

    let points = damage.min(hull_max / 2);
    let mut temporary = Vec::new();
    for _ in 0..points {
        let check = officer_check(dice, skill, captain, lieutenant, crew_quality, 0);
        if !check.success {
            temporary.push(TemporaryRepair {
                points: 1,
                expires_on_day: voyage_day + dice.d6(),
            });
        }
    }

    Some(RepairPlan {
        method: RepairMethod::SelfRepair,
        cost: 50 * i64::from(points),
        days: points * 7,
        points_restored: points,
        temporary,
    })
}

/// The automated repair policy: go professional when damage has reached
/// 10% and the treasury covers it; otherwise defer.
pub fn auto_repair_choice(damage_pct: i32, treasury: i64, professional_cost: i64) -> bool {
    damage_pct >= 10 && treasury >= professional_cost
}

/// Whether this port hires crew at all: small ships find hands anywhere,
/// larger ones need a Minor Port or better.
pub fn hiring_allowed(size: PortSize, hull_max: i32) -> bool {
    hull_max <= 10 || size.offers_repairs()
}

/// Auto-hire when the total shortfall tops 20% of the required
/// complement.
pub fn should_auto_hire(shortfall_total: i32, required_total: i32) -> bool {
    required_total > 0 && shortfall_total * 5 > required_total
}

/// Regular passengers looking for passage: max(0, 2d4 - 1d4 + size mod).
pub fn passengers_available(dice: &mut Dice, size: PortSize) -> i32 {
    (dice.dice(2, 4) - dice.d(4) + size.market_modifier()).max(0)
}

/// Fare revenue: 20 gp a head per started 500 miles of remaining route.
pub fn passenger_revenue(count: i32, remaining_distance_mi: i32) -> i64 {
    i64::from(count) * 20 * i64::from((remaining_distance_mi + 499) / 500)
}

/// A charter offer: someone wants the whole ship for a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharterOffer {
    pub distance_mi: i32,
    pub fee: i64,
}

/// One charter in twenty port calls: destination 2d20 x 100 miles away,
/// fee 40 gp per started 500 miles with a 100 gp floor. Refusing one has
/// no effect.
pub fn charter_opportunity(dice: &mut Dice) -> Option<CharterOffer> {
    if !dice.percent(5) {
        return None;
    }
    let distance_mi = dice.dice(2, 20) * 100;
    let fee = i64::from(40 * ((distance_mi + 499) / 500)).max(100);
    info!("charter offered: {distance_mi} miles for {fee} gp");
    Some(CharterOffer { distance_mi, fee })
}
