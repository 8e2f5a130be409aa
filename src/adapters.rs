//! # Adapters Module
//!
//! The engine's five capability seams: weather, calendar, persistence,
//! decisions, and notifications. The core depends only on these traits;
//! hosts plug in their own implementations, and the provided ones cover
//! the automated path so a voyage can run with no host at all.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[allow(unused_imports)]
use log::{error, info};

use crate::cargo::CargoHold;
use crate::encounters::Mitigation;
use crate::market::CargoOffer;
use crate::port::{CharterOffer, RepairMethod, RepairPlan};
use crate::strategy::{BuyDecision, SellDecision};
use crate::voyage::VoyageState;
use crate::weather::WeatherRecord;

/// Supplies a day's weather. When no adapter is wired up the engine
/// falls back to [`WeatherRecord::fallback`] and records a warning.
pub trait WeatherAdapter {
    fn generate_day_weather(&mut self) -> WeatherRecord;
}

/// Host calendar hooks. The engine keeps its own date; an adapter is
/// only told about it so a host calendar can stay in step.
pub trait CalendarAdapter {
    fn current_date(&self) -> String;
    fn advance_day(&mut self);
}

/// Persistence failures. A failed save never mutates engine state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store serialization failed: {0}")]
    Serialization(String),

    #[error("store backend failed: {0}")]
    Backend(String),
}

/// A simple keyed store for voyage state, one key per voyage id.
pub trait StateStore {
    fn save(&mut self, id: &str, state: &VoyageState) -> Result<(), StoreError>;
    /// Unknown ids are not an error; they load as None.
    fn load(&self, id: &str) -> Result<Option<VoyageState>, StoreError>;
    fn remove(&mut self, id: &str) -> Result<(), StoreError>;
    fn active_ids(&self) -> Vec<String>;
}

/// In-memory store. Round-trips through JSON so that what comes back is
/// exactly what a durable backend would have returned.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn save(&mut self, id: &str, state: &VoyageState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.entries.insert(id.to_string(), json);
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<VoyageState>, StoreError> {
        self.entries
            .get(id)
            .map(|json| {
                serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .transpose()
    }

    fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        self.entries.remove(id);
        Ok(())
    }

    fn active_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// A typed request for a choice. Every request carries the engine's own
/// recommendation so an automated adapter can simply follow it and an
/// interactive one can present it as the default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DecisionRequest {
    Repair {
        damage: i32,
        damage_pct: i32,
        treasury: i64,
        options: Vec<RepairPlan>,
        recommended: Option<RepairMethod>,
    },
    Purchase {
        offer: CargoOffer,
        recommended: BuyDecision,
    },
    Sell {
        cargo: CargoHold,
        recommended: SellDecision,
    },
    Hire {
        shortfall_total: i32,
        required_total: i32,
        recommended: bool,
    },
    Charter {
        offer: CharterOffer,
        recommended: bool,
    },
    Mitigate {
        threat_name: String,
        recommended: Option<Mitigation>,
    },
}

/// A typed reply to a [`DecisionRequest`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DecisionReply {
    Repair(Option<RepairMethod>),
    Purchase { loads: i32 },
    Sell(bool),
    Hire(bool),
    Charter(bool),
    Mitigate(Option<Mitigation>),
}

/// Presents choices and returns structured replies. Manual and automated
/// voyages use the same mechanism; only the adapter differs.
pub trait DecisionAdapter {
    fn decide(&mut self, request: &DecisionRequest) -> DecisionReply;
}

/// The automated policy: follow every recommendation the engine
/// attached to the request.
#[derive(Debug, Default)]
pub struct AutoDecisions;

impl DecisionAdapter for AutoDecisions {
    fn decide(&mut self, request: &DecisionRequest) -> DecisionReply {
        match request {
            DecisionRequest::Repair { recommended, .. } => DecisionReply::Repair(*recommended),
            DecisionRequest::Purchase { recommended, .. } => match recommended {
                BuyDecision::Buy { loads, .. } => DecisionReply::Purchase { loads: *loads },
                BuyDecision::Refuse { .. } => DecisionReply::Purchase { loads: 0 },
            },
            DecisionRequest::Sell { recommended, .. } => {
                DecisionReply::Sell(matches!(recommended, SellDecision::Sell { .. }))
            }
            DecisionRequest::Hire { recommended, .. } => DecisionReply::Hire(*recommended),
            DecisionRequest::Charter { recommended, .. } => DecisionReply::Charter(*recommended),
            DecisionRequest::Mitigate { recommended, .. } => DecisionReply::Mitigate(*recommended),
        }
    }
}

/// User-visible notifications from the engine.
pub trait Notifier {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Routes notifications through the `log` facade.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_memory_store_unknown_id_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.load("no-such-voyage").unwrap(), None);
    }

    #[test_log::test]
    fn test_auto_decisions_follow_recommendations() {
        let mut auto = AutoDecisions;
        let reply = auto.decide(&DecisionRequest::Hire {
            shortfall_total: 8,
            required_total: 30,
            recommended: true,
        });
        assert_eq!(reply, DecisionReply::Hire(true));

        let reply = auto.decide(&DecisionRequest::Purchase {
            offer: CargoOffer {
                category: crate::cargo::CargoCategory::Consumer,
                base_value: 150,
                loads_available: 20,
                price_per_load: 140,
                bargain_pct: -10,
            },
            recommended: BuyDecision::Refuse {
                reason: "test".to_string(),
            },
        });
        assert_eq!(reply, DecisionReply::Purchase { loads: 0 });
    }
}
