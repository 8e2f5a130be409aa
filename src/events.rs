//! # Events Module
//!
//! The voyage's append-only structured event stream. Rendering (plain
//! text here, HTML in a host) is a pure function over these records; the
//! engine itself only ever appends.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::calendar::VoyageDate;
use crate::encounters::{Classification, TimeOfDay};
use crate::geography::WaterType;

/// Where hull damage came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DamageSource {
    Storm,
    Creature,
    Hazard,
}

impl Display for DamageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DamageSource::Storm => write!(f, "storm"),
            DamageSource::Creature => write!(f, "creature"),
            DamageSource::Hazard => write!(f, "hazard"),
        }
    }
}

/// One event. The payload is a closed set of variants; match them
/// exhaustively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum EventDetail {
    Damage {
        source: DamageSource,
        source_name: String,
        hull_damage: i32,
        hull_remaining: i32,
    },
    Encounter {
        water_type: WaterType,
        name: String,
        classification: Classification,
        time_of_day: TimeOfDay,
        number: i32,
        distance_yd: i32,
        surprise: bool,
        description: String,
    },
    CrewLoss {
        source_name: String,
        count: i32,
    },
    CargoSpoilage {
        loads_lost: i32,
        loads_remaining: i32,
        note: String,
    },
    /// Structured warning, e.g. a missing weather adapter.
    Warning {
        message: String,
    },
}

/// A dated event in the stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub date: VoyageDate,
    /// Day number within the voyage, 0 at departure.
    pub voyage_day: i32,
    pub detail: EventDetail,
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.date)?;
        match &self.detail {
            EventDetail::Damage {
                source,
                source_name,
                hull_damage,
                hull_remaining,
            } => write!(
                f,
                "{source_name} ({source}) dealt {hull_damage} hull damage, {hull_remaining} remaining"
            ),
            EventDetail::Encounter { description, .. } => write!(f, "{description}"),
            EventDetail::CrewLoss { source_name, count } => {
                write!(f, "lost {count} crew to {source_name}")
            }
            EventDetail::CargoSpoilage {
                loads_lost,
                loads_remaining,
                note,
            } => write!(f, "{loads_lost} loads spoiled ({note}), {loads_remaining} remain"),
            EventDetail::Warning { message } => write!(f, "warning: {message}"),
        }
    }
}
