//! # Weather Module
//!
//! Turns a day's weather record into sailing progress and piloting
//! hazards. Speed is a pure function of wind and precipitation given the
//! dice stream; hazard severity feeds the piloting check and, on a miss,
//! the hull-damage table.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[allow(unused_imports)]
use log::debug;

use crate::dice::Dice;

/// Temperature band for a day, degrees Fahrenheit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Temperature {
    pub high: i32,
    pub low: i32,
}

/// Wind for a day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Wind {
    pub speed_mph: i32,
    pub direction: String,
}

/// Precipitation kinds the rules care about. Fog rides along with storms,
/// so it is its own pair of variants rather than an attribute.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PrecipKind {
    #[default]
    None,
    Drizzle,
    LightRainstorm,
    HeavyRainstorm,
    Hailstorm,
    Snow,
    Sleet,
    Fog,
    HeavyFog,
    Thunderstorm,
    TropicalStorm,
    Gale,
    Hurricane,
}

impl PrecipKind {
    /// Rain heavy enough to wet the sails and add a little speed.
    pub fn wets_sails(&self) -> bool {
        matches!(
            self,
            PrecipKind::Drizzle
                | PrecipKind::LightRainstorm
                | PrecipKind::HeavyRainstorm
                | PrecipKind::Hailstorm
        )
    }
}

impl Display for PrecipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrecipKind::None => write!(f, "clear"),
            PrecipKind::Drizzle => write!(f, "drizzle"),
            PrecipKind::LightRainstorm => write!(f, "light rainstorm"),
            PrecipKind::HeavyRainstorm => write!(f, "heavy rainstorm"),
            PrecipKind::Hailstorm => write!(f, "hailstorm"),
            PrecipKind::Snow => write!(f, "snow"),
            PrecipKind::Sleet => write!(f, "sleet"),
            PrecipKind::Fog => write!(f, "fog"),
            PrecipKind::HeavyFog => write!(f, "heavy fog"),
            PrecipKind::Thunderstorm => write!(f, "thunderstorm"),
            PrecipKind::TropicalStorm => write!(f, "tropical storm"),
            PrecipKind::Gale => write!(f, "gale"),
            PrecipKind::Hurricane => write!(f, "hurricane"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Precipitation {
    pub kind: PrecipKind,
    pub duration_h: i32,
}

/// A single day's weather, as delivered by the weather adapter or the
/// built-in fallback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WeatherRecord {
    pub temperature: Temperature,
    pub wind: Wind,
    pub precipitation: Precipitation,
    pub sky: String,
}

impl WeatherRecord {
    /// Fallback weather when no adapter is wired up: wind 2d10+5 out of
    /// the west, partly cloudy, dry.
    pub fn fallback(dice: &mut Dice) -> Self {
        WeatherRecord {
            temperature: Temperature { high: 70, low: 55 },
            wind: Wind {
                speed_mph: dice.dice(2, 10) + 5,
                direction: "W".to_string(),
            },
            precipitation: Precipitation::default(),
            sky: "partly cloudy".to_string(),
        }
    }

    /// Fog detection: either the precipitation kind or a sky description
    /// mentioning fog (storm days can be foggy too).
    fn fog_penalty(&self) -> i32 {
        let sky = self.sky.to_lowercase();
        if self.precipitation.kind == PrecipKind::HeavyFog || sky.contains("heavy fog") {
            6
        } else if self.precipitation.kind == PrecipKind::Fog || sky.contains("fog") {
            3
        } else {
            0
        }
    }
}

/// How the day's wind drives the ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SailingCondition {
    Becalmed,
    LightWinds,
    GoodWinds,
    StrongWinds,
}

impl Display for SailingCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SailingCondition::Becalmed => write!(f, "Becalmed"),
            SailingCondition::LightWinds => write!(f, "Light winds"),
            SailingCondition::GoodWinds => write!(f, "Good winds"),
            SailingCondition::StrongWinds => write!(f, "Strong winds"),
        }
    }
}

/// The day's computed propulsion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayMotion {
    pub condition: SailingCondition,
    /// Miles covered under sail, wet-sails bonus included.
    pub speed_mi: i32,
    pub wet_sails_bonus: i32,
    pub note: String,
}

/// Compute the day's sailing speed from the weather and the ship's base
/// speed in miles per day (movement x 8).
///
/// Under 5 mph the ship is becalmed. Light winds lose 8 miles per full
/// 10 mph below 20 (floored at 1 mile), 20-30 mph is full speed, and
/// every full 10 mph past 30 adds 16 miles. Rain wets the sails for a
/// uniform 5-10% bonus.
pub fn sailing_speed(dice: &mut Dice, weather: &WeatherRecord, base_speed: i32) -> DayMotion {
    let wind = weather.wind.speed_mph;
    let (condition, mut speed) = if wind < 5 {
        (SailingCondition::Becalmed, 0)
    } else if wind < 20 {
        let speed = (base_speed - 8 * ((20 - wind) / 10)).max(1);
        (SailingCondition::LightWinds, speed)
    } else if wind <= 30 {
        (SailingCondition::GoodWinds, base_speed)
    } else {
        (
            SailingCondition::StrongWinds,
            base_speed + 16 * ((wind - 30) / 10),
        )
    };

    let mut wet_sails_bonus = 0;
    if condition != SailingCondition::Becalmed && weather.precipitation.kind.wets_sails() {
        let pct = dice.range(5, 10);
        wet_sails_bonus = speed * pct / 100;
        speed += wet_sails_bonus;
    }

    let note = match condition {
        SailingCondition::Becalmed => format!("Becalmed, wind {wind} mph"),
        _ => format!("{condition}, wind {wind} mph, making {speed} miles"),
    };
    debug!("sailing: {note}");

    DayMotion {
        condition,
        speed_mi: speed,
        wet_sails_bonus,
        note,
    }
}

/// Severity grades for weather hazards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum HazardSeverity {
    Minor,
    Major,
    Critical,
}

impl Display for HazardSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HazardSeverity::Minor => write!(f, "Minor"),
            HazardSeverity::Major => write!(f, "Major"),
            HazardSeverity::Critical => write!(f, "Critical"),
        }
    }
}

/// A signaled piloting hazard: severity for the damage table plus the
/// total piloting penalty (storm plus fog).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherHazard {
    pub severity: HazardSeverity,
    pub piloting_penalty: i32,
    pub description: String,
}

/// Classify the day's weather into an optional piloting hazard.
///
/// Hurricane or wind 75+ is Critical (penalty 10), gale or 50+ Major
/// (penalty 5), thunderstorm / tropical storm or 30+ Minor (penalty 2).
/// Fog adds 3 (heavy fog 6) on top and, on an otherwise quiet day,
/// signals a Minor hazard by itself.
pub fn classify_hazard(weather: &WeatherRecord) -> Option<WeatherHazard> {
    let wind = weather.wind.speed_mph;
    let kind = weather.precipitation.kind;

    let storm = if kind == PrecipKind::Hurricane || wind >= 75 {
        Some((HazardSeverity::Critical, 10))
    } else if kind == PrecipKind::Gale || wind >= 50 {
        Some((HazardSeverity::Major, 5))
    } else if matches!(kind, PrecipKind::Thunderstorm | PrecipKind::TropicalStorm) || wind >= 30 {
        Some((HazardSeverity::Minor, 2))
    } else {
        None
    };

    let fog = weather.fog_penalty();
    match (storm, fog) {
        (Some((severity, penalty)), fog) => Some(WeatherHazard {
            severity,
            piloting_penalty: penalty + fog,
            description: if fog > 0 {
                format!("{} in fog, wind {} mph", weather.precipitation.kind, wind)
            } else {
                format!("{}, wind {} mph", weather.precipitation.kind, wind)
            },
        }),
        (None, fog) if fog > 0 => Some(WeatherHazard {
            severity: HazardSeverity::Minor,
            piloting_penalty: fog,
            description: "fog bank".to_string(),
        }),
        _ => None,
    }
}

/// Hull damage for a failed piloting check, by severity and miss margin.
///
/// | Severity | 1-2   | 3-4   | 5-7   | 8+    |
/// |----------|-------|-------|-------|-------|
/// | Minor    | 1     | 1d3+1 | 1d4+2 | 1d4+2 |
/// | Major    | 1     | 1d3+1 | 1d5+3 | 1d5+3 |
/// | Critical | 1d3+1 | 1d4+2 | 1d5+3 | 1d6+4 |
pub fn hazard_damage(dice: &mut Dice, severity: HazardSeverity, miss_margin: i32) -> i32 {
    match severity {
        HazardSeverity::Minor => match miss_margin {
            i32::MIN..=2 => 1,
            3..=4 => dice.d(3) + 1,
            _ => dice.d(4) + 2,
        },
        HazardSeverity::Major => match miss_margin {
            i32::MIN..=2 => 1,
            3..=4 => dice.d(3) + 1,
            _ => dice.d(5) + 3,
        },
        HazardSeverity::Critical => match miss_margin {
            i32::MIN..=2 => dice.d(3) + 1,
            3..=4 => dice.d(4) + 2,
            5..=7 => dice.d(5) + 3,
            _ => dice.d(6) + 4,
        },
    }
}

/// Speed penalty from accumulated hull damage: 10% per full 10% of hull
/// lost. At 75% damage the ship is dead in the water.
pub fn hull_speed_penalty_pct(damage_pct: i32) -> i32 {
    10 * (damage_pct / 10)
}

/// True when the hull is too far gone to make way at all.
pub fn dead_in_water(damage_pct: i32) -> bool {
    damage_pct >= 75
}

/// Rowing speed in miles per day. Oarsmen manage 8 miles; after more than
/// three consecutive days at the oars the crew is fatigued and manages 4.
pub fn rowing_speed(consecutive_rowing_days: i32) -> i32 {
    if consecutive_rowing_days > 3 {
        4
    } else {
        8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(wind: i32, kind: PrecipKind) -> WeatherRecord {
        WeatherRecord {
            wind: Wind {
                speed_mph: wind,
                direction: "NW".to_string(),
            },
            precipitation: Precipitation {
                kind,
                duration_h: 2,
            },
            ..Default::default()
        }
    }

    #[test_log::test]
    fn test_becalmed_under_five() {
        let mut dice = Dice::seeded(1);
        let motion = sailing_speed(&mut dice, &day(3, PrecipKind::None), 120);
        assert_eq!(motion.condition, SailingCondition::Becalmed);
        assert_eq!(motion.speed_mi, 0);
        assert!(motion.note.contains("Becalmed"));
    }

    #[test_log::test]
    fn test_light_wind_bands() {
        let mut dice = Dice::seeded(1);
        // 5-9 mph: 20-wind in [11,15] -> lose 8 miles... the floor division
        // gives one band per full 10 mph short of 20.
        assert_eq!(
            sailing_speed(&mut dice, &day(5, PrecipKind::None), 120).speed_mi,
            112
        );
        assert_eq!(
            sailing_speed(&mut dice, &day(12, PrecipKind::None), 120).speed_mi,
            120 - 8 * ((20 - 12) / 10)
        );
        assert_eq!(
            sailing_speed(&mut dice, &day(19, PrecipKind::None), 120).speed_mi,
            120
        );
        // A tiny base speed still makes at least one mile.
        assert_eq!(
            sailing_speed(&mut dice, &day(5, PrecipKind::None), 8).speed_mi,
            1
        );
    }

    #[test_log::test]
    fn test_good_and_strong_winds() {
        let mut dice = Dice::seeded(1);
        assert_eq!(
            sailing_speed(&mut dice, &day(25, PrecipKind::None), 120).speed_mi,
            120
        );
        assert_eq!(
            sailing_speed(&mut dice, &day(30, PrecipKind::None), 120).speed_mi,
            120
        );
        assert_eq!(
            sailing_speed(&mut dice, &day(45, PrecipKind::None), 120).speed_mi,
            136
        );
        assert_eq!(
            sailing_speed(&mut dice, &day(55, PrecipKind::None), 120).speed_mi,
            152
        );
    }

    #[test_log::test]
    fn test_wet_sails_bonus_range() {
        for seed in 0..16 {
            let mut dice = Dice::seeded(seed);
            let motion = sailing_speed(&mut dice, &day(25, PrecipKind::Drizzle), 120);
            assert!(motion.wet_sails_bonus >= 120 * 5 / 100);
            assert!(motion.wet_sails_bonus <= 120 * 10 / 100);
            assert_eq!(motion.speed_mi, 120 + motion.wet_sails_bonus);
        }
    }

    #[test_log::test]
    fn test_hazard_classification() {
        assert!(classify_hazard(&day(25, PrecipKind::None)).is_none());

        let minor = classify_hazard(&day(35, PrecipKind::None)).unwrap();
        assert_eq!(minor.severity, HazardSeverity::Minor);
        assert_eq!(minor.piloting_penalty, 2);

        let major = classify_hazard(&day(55, PrecipKind::None)).unwrap();
        assert_eq!(major.severity, HazardSeverity::Major);
        assert_eq!(major.piloting_penalty, 5);

        let gale = classify_hazard(&day(40, PrecipKind::Gale)).unwrap();
        assert_eq!(gale.severity, HazardSeverity::Major);

        let critical = classify_hazard(&day(80, PrecipKind::None)).unwrap();
        assert_eq!(critical.severity, HazardSeverity::Critical);
        assert_eq!(critical.piloting_penalty, 10);

        let storm = classify_hazard(&day(20, PrecipKind::Thunderstorm)).unwrap();
        assert_eq!(storm.severity, HazardSeverity::Minor);
    }

    #[test_log::test]
    fn test_fog_composes() {
        let mut foggy_gale = day(55, PrecipKind::None);
        foggy_gale.sky = "heavy fog".to_string();
        let hazard = classify_hazard(&foggy_gale).unwrap();
        assert_eq!(hazard.severity, HazardSeverity::Major);
        assert_eq!(hazard.piloting_penalty, 11);

        let fog_only = day(15, PrecipKind::Fog);
        let hazard = classify_hazard(&fog_only).unwrap();
        assert_eq!(hazard.severity, HazardSeverity::Minor);
        assert_eq!(hazard.piloting_penalty, 3);
    }

    #[test_log::test]
    fn test_hazard_damage_bands() {
        for seed in 0..16 {
            let mut dice = Dice::seeded(seed);
            assert_eq!(hazard_damage(&mut dice, HazardSeverity::Minor, 1), 1);
            assert_eq!(hazard_damage(&mut dice, HazardSeverity::Major, 2), 1);
            let d = hazard_damage(&mut dice, HazardSeverity::Minor, 4);
            assert!((2..=4).contains(&d));
            let d = hazard_damage(&mut dice, HazardSeverity::Minor, 9);
            assert!((3..=6).contains(&d));
            let d = hazard_damage(&mut dice, HazardSeverity::Major, 6);
            assert!((4..=8).contains(&d));
            let d = hazard_damage(&mut dice, HazardSeverity::Critical, 1);
            assert!((2..=4).contains(&d));
            let d = hazard_damage(&mut dice, HazardSeverity::Critical, 8);
            assert!((5..=10).contains(&d));
        }
    }

    #[test_log::test]
    fn test_hull_speed_penalty() {
        assert_eq!(hull_speed_penalty_pct(0), 0);
        assert_eq!(hull_speed_penalty_pct(9), 0);
        assert_eq!(hull_speed_penalty_pct(10), 10);
        assert_eq!(hull_speed_penalty_pct(47), 40);
        assert!(!dead_in_water(74));
        assert!(dead_in_water(75));
    }

    #[test_log::test]
    fn test_rowing_fatigue() {
        assert_eq!(rowing_speed(0), 8);
        assert_eq!(rowing_speed(3), 8);
        assert_eq!(rowing_speed(4), 4);
    }

    #[test_log::test]
    fn test_fallback_weather() {
        let mut dice = Dice::seeded(13);
        let record = WeatherRecord::fallback(&mut dice);
        assert!((7..=25).contains(&record.wind.speed_mph));
        assert_eq!(record.sky, "partly cloudy");
    }
}
