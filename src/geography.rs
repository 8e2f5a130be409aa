//! # Geography Module
//!
//! Ports, the sea lanes between them, and the routes a voyage follows.
//! All of it is immutable reference data parsed once from embedded rows.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// Port sizes, smallest to largest. Size drives the merchant/demand
/// modifier and which services a port offers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum PortSize {
    Anchorage,
    MinorPort,
    Port,
    MajorPort,
}

impl PortSize {
    /// Merchant and demand modifier: Major +2, Port +1, Minor 0,
    /// Anchorage -2.
    pub fn market_modifier(&self) -> i32 {
        match self {
            PortSize::Anchorage => -2,
            PortSize::MinorPort => 0,
            PortSize::Port => 1,
            PortSize::MajorPort => 2,
        }
    }

    /// Repairs are offered at Minor Port or larger.
    pub fn offers_repairs(&self) -> bool {
        *self >= PortSize::MinorPort
    }

    /// Drydock size modifier on the daily fee: cheaper at a Major Port,
    /// dearer at a Minor Port.
    pub fn drydock_fee_modifier(&self) -> f64 {
        match self {
            PortSize::MajorPort => -0.5,
            PortSize::MinorPort => 0.5,
            _ => 0.0,
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "Anchorage" => Ok(PortSize::Anchorage),
            "Minor Port" => Ok(PortSize::MinorPort),
            "Port" => Ok(PortSize::Port),
            "Major Port" => Ok(PortSize::MajorPort),
            other => Err(format!("unknown port size: {other:?}")),
        }
    }
}

impl Display for PortSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortSize::Anchorage => write!(f, "Anchorage"),
            PortSize::MinorPort => write!(f, "Minor Port"),
            PortSize::Port => write!(f, "Port"),
            PortSize::MajorPort => write!(f, "Major Port"),
        }
    }
}

/// The waters a sea lane crosses; this sets the encounter check schedule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WaterType {
    Fresh,
    Coastal,
    Shallow,
    Deep,
}

impl WaterType {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "fresh" => Ok(WaterType::Fresh),
            "coastal" => Ok(WaterType::Coastal),
            "shallow" => Ok(WaterType::Shallow),
            "deep" => Ok(WaterType::Deep),
            other => Err(format!("unknown water type: {other:?}")),
        }
    }
}

impl Display for WaterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaterType::Fresh => write!(f, "fresh"),
            WaterType::Coastal => write!(f, "coastal"),
            WaterType::Shallow => write!(f, "shallow"),
            WaterType::Deep => write!(f, "deep"),
        }
    }
}

/// A sea lane out of a port.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Connection {
    pub distance_mi: i32,
    pub water: WaterType,
}

/// A port on the coast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortInfo {
    pub id: String,
    pub name: String,
    pub size: PortSize,
    pub connections: HashMap<String, Connection>,
}

/// An ordered list of port ids to sail. A circuit closes back on its
/// first port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub ports: Vec<String>,
    pub circuit: bool,
}

impl Route {
    /// The full leg list, with the closing leg appended for circuits.
    pub fn leg_ports(&self) -> Vec<String> {
        let mut ports = self.ports.clone();
        if self.circuit {
            if let Some(first) = self.ports.first() {
                ports.push(first.clone());
            }
        }
        ports
    }
}

/// Port registry rows: [id, name, size, connections].
/// Connections are space-separated `other_id:miles:water`.
static PORT_ROWS: &[&[&str; 4]] = &[
    &[
        "saltmere",
        "Saltmere",
        "Major Port",
        "gullhaven:120:coastal tidesend:340:shallow korvast:560:deep",
    ],
    &[
        "gullhaven",
        "Gullhaven",
        "Port",
        "saltmere:120:coastal tidesend:260:coastal brackwater:90:coastal",
    ],
    &[
        "tidesend",
        "Tidesend",
        "Port",
        "saltmere:340:shallow gullhaven:260:coastal korvast:280:deep palegate:150:shallow",
    ],
    &[
        "brackwater",
        "Brackwater",
        "Minor Port",
        "gullhaven:90:coastal mistreach:60:fresh",
    ],
    &[
        "korvast",
        "Korvast",
        "Major Port",
        "saltmere:560:deep tidesend:280:deep palegate:210:shallow embercove:430:deep",
    ],
    &[
        "palegate",
        "Palegate",
        "Minor Port",
        "tidesend:150:shallow korvast:210:shallow",
    ],
    &[
        "mistreach",
        "Mistreach",
        "Anchorage",
        "brackwater:60:fresh",
    ],
    &[
        "embercove",
        "Embercove",
        "Port",
        "korvast:430:deep stormwatch:70:coastal",
    ],
    &[
        "stormwatch",
        "Stormwatch",
        "Anchorage",
        "embercove:70:coastal",
    ],
];

/// Route registry rows: [id, name, circuit, ports].
static ROUTE_ROWS: &[&[&str; 4]] = &[
    &[
        "coastal-run",
        "The Coastal Run",
        "no",
        "saltmere gullhaven brackwater",
    ],
    &[
        "spice-circuit",
        "Spice Circuit",
        "yes",
        "saltmere tidesend korvast",
    ],
    &[
        "deepwater-haul",
        "Deepwater Haul",
        "no",
        "saltmere korvast embercove",
    ],
    &[
        "palegate-ferry",
        "Palegate Ferry",
        "no",
        "tidesend palegate korvast",
    ],
];

fn parse_port(row: &[&str; 4]) -> Result<PortInfo, String> {
    let id = row[0].to_string();
    let mut connections = HashMap::new();
    for lane in row[3].split_whitespace() {
        let mut fields = lane.split(':');
        let other = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| format!("port {id}: empty connection"))?;
        let distance = fields
            .next()
            .and_then(|s| s.parse::<i32>().ok())
            .ok_or_else(|| format!("port {id}: bad distance in {lane:?}"))?;
        let water = WaterType::parse(fields.next().unwrap_or_default())
            .map_err(|e| format!("port {id}: {e}"))?;
        connections.insert(
            other.to_string(),
            Connection {
                distance_mi: distance,
                water,
            },
        );
    }
    Ok(PortInfo {
        id,
        name: row[1].to_string(),
        size: PortSize::parse(row[2])?,
        connections,
    })
}

lazy_static! {
    static ref PORT_REGISTRY: HashMap<String, PortInfo> = PORT_ROWS
        .iter()
        .map(|row| {
            let port = parse_port(row).unwrap_or_else(|e| panic!("bad port row: {e}"));
            (port.id.clone(), port)
        })
        .collect();
    static ref ROUTE_REGISTRY: HashMap<String, Route> = ROUTE_ROWS
        .iter()
        .map(|row| {
            let route = Route {
                id: row[0].to_string(),
                name: row[1].to_string(),
                circuit: row[2] == "yes",
                ports: row[3].split_whitespace().map(str::to_string).collect(),
            };
            (route.id.clone(), route)
        })
        .collect();
}

/// Look up a port by id.
pub fn port(id: &str) -> Option<&'static PortInfo> {
    PORT_REGISTRY.get(id)
}

/// Look up a route by id.
pub fn route(id: &str) -> Option<&'static Route> {
    ROUTE_REGISTRY.get(id)
}

/// The sea lane between two adjacent ports, if one exists.
pub fn lane(from: &str, to: &str) -> Option<Connection> {
    PORT_REGISTRY
        .get(from)
        .and_then(|port| port.connections.get(to))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_registry_parses_and_lanes_are_symmetric() {
        for info in PORT_REGISTRY.values() {
            for (other, connection) in &info.connections {
                let back = lane(other, &info.id)
                    .unwrap_or_else(|| panic!("{other} missing lane back to {}", info.id));
                assert_eq!(back.distance_mi, connection.distance_mi);
                assert_eq!(back.water, connection.water);
            }
        }
    }

    #[test_log::test]
    fn test_routes_reference_known_lanes() {
        for route in ROUTE_REGISTRY.values() {
            let legs = route.leg_ports();
            for pair in legs.windows(2) {
                assert!(
                    lane(&pair[0], &pair[1]).is_some(),
                    "route {} has no lane {} -> {}",
                    route.id,
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    #[test_log::test]
    fn test_circuit_appends_closing_leg() {
        let circuit = route("spice-circuit").unwrap();
        let legs = circuit.leg_ports();
        assert_eq!(legs.first(), legs.last());
        assert_eq!(legs.len(), circuit.ports.len() + 1);

        let open = route("coastal-run").unwrap();
        assert_eq!(open.leg_ports(), open.ports);
    }

    #[test_log::test]
    fn test_market_modifiers() {
        assert_eq!(PortSize::MajorPort.market_modifier(), 2);
        assert_eq!(PortSize::Port.market_modifier(), 1);
        assert_eq!(PortSize::MinorPort.market_modifier(), 0);
        assert_eq!(PortSize::Anchorage.market_modifier(), -2);
    }

    #[test_log::test]
    fn test_repair_availability() {
        assert!(!PortSize::Anchorage.offers_repairs());
        assert!(PortSize::MinorPort.offers_repairs());
        assert!(PortSize::MajorPort.offers_repairs());
    }
}
