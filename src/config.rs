//! # Configuration Module
//!
//! The voyage configuration record and its validation. A bad
//! configuration is surfaced before any state is created; nothing else
//! in the error taxonomy stops a voyage from starting.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::VoyageDate;
use crate::geography;
use crate::officer::{CrewQuality, Officer};
use crate::ship;

/// Automatic end-to-end run, or one day at a time under caller control.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum VoyageMode {
    #[default]
    Auto,
    Manual,
}

/// Trading on the owner's account, or contract freight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TradeMode {
    #[default]
    Speculation,
    Consignment,
}

/// Everything needed to start a voyage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoyageConfig {
    /// Schema version for persisted configurations.
    pub version: u32,
    pub ship_id: String,
    pub route_id: String,
    pub mode: VoyageMode,
    pub captain: Officer,
    pub lieutenant: Option<Officer>,
    pub starting_gold: i64,
    pub trade_mode: TradeMode,
    /// Crew commission on consignment sales, 10-40 percent. Ignored in
    /// speculation mode.
    pub commission_rate: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub auto_repair: bool,
    pub enable_rowing: bool,
    pub automate_trading: bool,
    pub start_date: VoyageDate,
    pub crew_quality: CrewQuality,
}

impl Default for VoyageConfig {
    fn default() -> Self {
        VoyageConfig {
            version: 1,
            ship_id: String::new(),
            route_id: String::new(),
            mode: VoyageMode::Auto,
            captain: Officer::default(),
            lieutenant: None,
            starting_gold: 0,
            trade_mode: TradeMode::Speculation,
            commission_rate: 20,
            latitude: 0.0,
            longitude: 0.0,
            auto_repair: true,
            enable_rowing: false,
            automate_trading: true,
            start_date: VoyageDate::default(),
            crew_quality: CrewQuality::Average,
        }
    }
}

/// Why a configuration was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown ship id: {0}")]
    UnknownShip(String),

    #[error("unknown route id: {0}")]
    UnknownRoute(String),

    #[error("starting gold must be non-negative, got {0}")]
    NegativeGold(i64),

    #[error("consignment commission must be between 10 and 40 percent, got {0}")]
    CommissionOutOfRange(i32),

    #[error("captain has no name")]
    MissingCaptainName,

    #[error("{officer} has an ability score outside 3-18")]
    AbilityOutOfRange { officer: String },
}

impl VoyageConfig {
    /// Validate the configuration against the registries and the legal
    /// ranges. Called before any voyage state exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if ship::ship_template(&self.ship_id).is_none() {
            return Err(ConfigError::UnknownShip(self.ship_id.clone()));
        }
        if geography::route(&self.route_id).is_none() {
            return Err(ConfigError::UnknownRoute(self.route_id.clone()));
        }
        if self.starting_gold < 0 {
            return Err(ConfigError::NegativeGold(self.starting_gold));
        }
        if self.trade_mode == TradeMode::Consignment
            && !(10..=40).contains(&self.commission_rate)
        {
            return Err(ConfigError::CommissionOutOfRange(self.commission_rate));
        }
        if self.captain.name.trim().is_empty() {
            return Err(ConfigError::MissingCaptainName);
        }
        if !self.captain.abilities.in_range() {
            return Err(ConfigError::AbilityOutOfRange {
                officer: "captain".to_string(),
            });
        }
        if let Some(lieutenant) = &self.lieutenant {
            if !lieutenant.abilities.in_range() {
                return Err(ConfigError::AbilityOutOfRange {
                    officer: "lieutenant".to_string(),
                });
            }
        }
        Ok(())
    }
}
