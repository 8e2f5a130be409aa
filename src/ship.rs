//! # Ship Module
//!
//! Ship templates and the live instances a voyage mutates. Templates live
//! in an embedded registry in the same compact-row format as the other
//! reference tables; an instance is a deep clone, so a battered voyage
//! never leaks damage back into the registry.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// Crew roles aboard a trading vessel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CrewRole {
    Sailor,
    Oarsman,
    Marine,
    Mate,
    Lieutenant,
    Captain,
}

impl CrewRole {
    /// Monthly wage in gp. Lieutenants are paid by level.
    pub fn monthly_wage(&self, level: i32) -> i32 {
        match self {
            CrewRole::Sailor => 2,
            CrewRole::Oarsman => 5,
            CrewRole::Marine => 3,
            CrewRole::Mate => 30,
            CrewRole::Lieutenant => 100 * level.max(1),
            CrewRole::Captain => 0,
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "sailor" => Ok(CrewRole::Sailor),
            "oarsman" => Ok(CrewRole::Oarsman),
            "marine" => Ok(CrewRole::Marine),
            "mate" => Ok(CrewRole::Mate),
            "lieutenant" => Ok(CrewRole::Lieutenant),
            "captain" => Ok(CrewRole::Captain),
            other => Err(format!("unknown crew role: {other:?}")),
        }
    }
}

impl Display for CrewRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrewRole::Sailor => write!(f, "sailor"),
            CrewRole::Oarsman => write!(f, "oarsman"),
            CrewRole::Marine => write!(f, "marine"),
            CrewRole::Mate => write!(f, "mate"),
            CrewRole::Lieutenant => write!(f, "lieutenant"),
            CrewRole::Captain => write!(f, "captain"),
        }
    }
}

/// One crew block: a role, how many fill it, and their level (only
/// meaningful for lieutenants' pay).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrewUnit {
    pub role: CrewRole,
    pub count: i32,
    pub level: i32,
}

/// Hull integrity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hull {
    pub value: i32,
    pub max: i32,
}

impl Hull {
    pub fn damage(&self) -> i32 {
        self.max - self.value
    }

    pub fn damage_pct(&self) -> i32 {
        if self.max == 0 {
            return 0;
        }
        self.damage() * 100 / self.max
    }
}

/// A ship template from the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShipTemplate {
    pub id: String,
    pub name: String,
    pub ship_type: String,
    pub hull_max: i32,
    /// Cargo capacity in loads (half-tons).
    pub cargo_capacity: i32,
    /// Abstract movement units; one unit is 8 miles per day under sail.
    pub movement: i32,
    pub crew: Vec<CrewUnit>,
}

/// A live ship: template attributes plus mutable hull and crew.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ship {
    pub name: String,
    pub ship_type: String,
    pub hull: Hull,
    pub cargo_capacity: i32,
    pub movement: i32,
    pub crew: Vec<CrewUnit>,
}

impl Ship {
    /// Instantiate a template. The clone is deep; voyage mutations never
    /// touch the registry.
    pub fn from_template(template: &ShipTemplate) -> Self {
        Ship {
            name: template.name.clone(),
            ship_type: template.ship_type.clone(),
            hull: Hull {
                value: template.hull_max,
                max: template.hull_max,
            },
            cargo_capacity: template.cargo_capacity,
            movement: template.movement,
            crew: template.crew.clone(),
        }
    }

    /// Base sailing speed in miles per day.
    pub fn base_speed(&self) -> i32 {
        self.movement * 8
    }

    /// Everyone aboard, officers included.
    pub fn total_souls(&self) -> i32 {
        self.crew.iter().map(|unit| unit.count).sum()
    }

    pub fn count(&self, role: CrewRole) -> i32 {
        self.crew
            .iter()
            .filter(|unit| unit.role == role)
            .map(|unit| unit.count)
            .sum()
    }

    /// Total monthly wage bill in gp.
    pub fn monthly_wage(&self) -> i32 {
        self.crew
            .iter()
            .map(|unit| unit.role.monthly_wage(unit.level) * unit.count)
            .sum()
    }

    /// Apply hull damage, clamping at zero. Returns the remaining hull.
    pub fn damage_hull(&mut self, points: i32) -> i32 {
        self.hull.value = (self.hull.value - points.max(0)).max(0);
        self.hull.value
    }

    /// Lose crew to an encounter: sailors first, then marines. Returns
    /// how many were actually lost.
    pub fn lose_crew(&mut self, count: i32) -> i32 {
        let mut remaining = count.max(0);
        for role in [CrewRole::Sailor, CrewRole::Marine] {
            if remaining == 0 {
                break;
            }
            for unit in self.crew.iter_mut().filter(|unit| unit.role == role) {
                let taken = remaining.min(unit.count);
                unit.count -= taken;
                remaining -= taken;
                if remaining == 0 {
                    break;
                }
            }
        }
        count.max(0) - remaining
    }

    /// Add hired crew into the matching block (or a new one).
    pub fn add_crew(&mut self, role: CrewRole, count: i32, level: i32) {
        if let Some(unit) = self
            .crew
            .iter_mut()
            .find(|unit| unit.role == role && unit.level == level)
        {
            unit.count += count;
        } else {
            self.crew.push(CrewUnit { role, count, level });
        }
    }

    /// Shortfall per role against a template's required complement.
    pub fn shortfall(&self, template: &ShipTemplate) -> Vec<(CrewRole, i32)> {
        template
            .crew
            .iter()
            .filter_map(|required| {
                let missing = required.count - self.count(required.role);
                (missing > 0).then_some((required.role, missing))
            })
            .collect()
    }
}

/// Ship template registry in compact rows:
/// [id, name, type, hull, capacity, movement, crew].
///
/// Crew is a space-separated list of role:count or role:count:level.
static SHIP_TEMPLATES: &[&[&str; 7]] = &[
    &[
        "coaster",
        "Gullwing",
        "Coaster",
        "8",
        "20",
        "10",
        "sailor:8 mate:1 captain:1",
    ],
    &[
        "cog",
        "Brinehart",
        "Cog",
        "20",
        "60",
        "12",
        "sailor:18 marine:4 mate:2 lieutenant:1:1 captain:1",
    ],
    &[
        "caravel",
        "Dawn Chaser",
        "Caravel",
        "30",
        "80",
        "15",
        "sailor:24 marine:6 mate:2 lieutenant:1:2 captain:1",
    ],
    &[
        "small-galley",
        "Spraydancer",
        "Small Galley",
        "25",
        "40",
        "12",
        "sailor:12 oarsman:30 marine:6 mate:2 lieutenant:1:1 captain:1",
    ],
    &[
        "great-galley",
        "Stormcrown",
        "Great Galley",
        "50",
        "150",
        "15",
        "sailor:20 oarsman:70 marine:16 mate:4 lieutenant:2:2 captain:1",
    ],
    &[
        "galleon",
        "Pride of Tides",
        "Galleon",
        "60",
        "200",
        "15",
        "sailor:40 marine:20 mate:4 lieutenant:2:3 captain:1",
    ],
    &[
        "longship",
        "Wavewolf",
        "Longship",
        "15",
        "30",
        "18",
        "sailor:10 oarsman:40 mate:1 captain:1",
    ],
    &[
        "knarr",
        "Deepkeel",
        "Knarr",
        "12",
        "40",
        "11",
        "sailor:9 oarsman:6 mate:1 captain:1",
    ],
];

fn parse_template(row: &[&str; 7]) -> Result<ShipTemplate, String> {
    let id = row[0].to_string();
    let parse_num = |s: &str, what: &str| {
        s.parse::<i32>()
            .map_err(|_| format!("ship {id}: bad {what}: {s:?}"))
    };
    let mut crew = Vec::new();
    for part in row[6].split_whitespace() {
        let mut fields = part.split(':');
        let role = CrewRole::parse(fields.next().unwrap_or_default())
            .map_err(|e| format!("ship {id}: {e}"))?;
        let count = parse_num(fields.next().unwrap_or_default(), "crew count")?;
        let level = match fields.next() {
            Some(level) => parse_num(level, "crew level")?,
            None => 1,
        };
        crew.push(CrewUnit { role, count, level });
    }
    let hull_max = parse_num(row[3], "hull")?;
    let cargo_capacity = parse_num(row[4], "capacity")?;
    let movement = parse_num(row[5], "movement")?;
    Ok(ShipTemplate {
        id,
        name: row[1].to_string(),
        ship_type: row[2].to_string(),
        hull_max,
        cargo_capacity,
        movement,
        crew,
    })
}

lazy_static! {
    static ref SHIP_REGISTRY: HashMap<String, ShipTemplate> = SHIP_TEMPLATES
        .iter()
        .map(|row| {
            let template = parse_template(row)
                .unwrap_or_else(|e| panic!("bad ship template row: {e}"));
            (template.id.clone(), template)
        })
        .collect();
}

/// Look up a ship template by id.
pub fn ship_template(id: &str) -> Option<&'static ShipTemplate> {
    SHIP_REGISTRY.get(id)
}

/// All registered template ids, for configuration validation messages.
pub fn ship_ids() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = SHIP_REGISTRY.keys().map(String::as_str).collect();
    ids.sort_unstable();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_registry_parses() {
        assert!(ship_ids().len() >= 8);
        let cog = ship_template("cog").unwrap();
        assert_eq!(cog.hull_max, 20);
        assert_eq!(cog.cargo_capacity, 60);
        let lieutenant = cog
            .crew
            .iter()
            .find(|unit| unit.role == CrewRole::Lieutenant)
            .unwrap();
        assert_eq!(lieutenant.level, 1);
    }

    #[test_log::test]
    fn test_instance_is_deep_clone() {
        let template = ship_template("caravel").unwrap();
        let mut ship = Ship::from_template(template);
        ship.damage_hull(10);
        ship.lose_crew(5);
        assert_eq!(template.hull_max, 30);
        assert_eq!(ship.hull.value, 20);
        assert_eq!(
            template.crew.iter().map(|unit| unit.count).sum::<i32>(),
            34
        );
    }

    #[test_log::test]
    fn test_base_speed_and_wages() {
        let ship = Ship::from_template(ship_template("caravel").unwrap());
        assert_eq!(ship.base_speed(), 120);
        // 24 sailors x2 + 6 marines x3 + 2 mates x30 + 1 lieutenant (level
        // 2) x200 + captain 0.
        assert_eq!(ship.monthly_wage(), 48 + 18 + 60 + 200);
        assert_eq!(ship.total_souls(), 34);
    }

    #[test_log::test]
    fn test_crew_losses_hit_sailors_first() {
        let mut ship = Ship::from_template(ship_template("cog").unwrap());
        assert_eq!(ship.lose_crew(2), 2);
        assert_eq!(ship.count(CrewRole::Sailor), 16);
        assert_eq!(ship.count(CrewRole::Marine), 4);
        // Wipe the sailors; the overflow comes out of the marines.
        assert_eq!(ship.lose_crew(18), 18);
        assert_eq!(ship.count(CrewRole::Sailor), 0);
        assert_eq!(ship.count(CrewRole::Marine), 2);
        // Mates and officers are never casualties here.
        assert_eq!(ship.lose_crew(10), 2);
        assert_eq!(ship.count(CrewRole::Mate), 2);
    }

    #[test_log::test]
    fn test_shortfall_and_hiring() {
        let template = ship_template("cog").unwrap();
        let mut ship = Ship::from_template(template);
        ship.lose_crew(6);
        let shortfall = ship.shortfall(template);
        assert_eq!(shortfall, vec![(CrewRole::Sailor, 6)]);
        ship.add_crew(CrewRole::Sailor, 6, 1);
        assert!(ship.shortfall(template).is_empty());
    }

    #[test_log::test]
    fn test_hull_damage_pct() {
        let mut ship = Ship::from_template(ship_template("cog").unwrap());
        ship.damage_hull(5);
        assert_eq!(ship.hull.damage_pct(), 25);
        ship.damage_hull(100);
        assert_eq!(ship.hull.value, 0);
    }
}
