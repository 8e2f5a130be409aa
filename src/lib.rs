//! # Voyagesim - a rule-driven maritime voyage simulator
//!
//! Voyagesim drives a trading ship through a multi-port route one
//! simulated day at a time: weather sets the sailing speed, piloting
//! checks resolve storm hazards, encounter tables populate the sea, and
//! every port call runs fees, repairs, hiring, passengers, and the cargo
//! market. The run ends in a structured [`report::VoyageReport`] whose
//! financial ledger reconstructs to the final treasury.
//!
//! The engine lives in [`voyage::VoyageEngine`]; it depends on its host
//! only through the capability traits in [`adapters`] (weather, calendar,
//! persistence, decisions, notifications), and every die it rolls comes
//! from one seedable [`dice::Dice`] source, so a voyage is replayable
//! from its seed and configuration.
//!
//! Reference data - ports and sea lanes, ship templates, cargo
//! categories, encounter tables - is immutable and embedded, parsed once
//! into registries at first use.

pub mod adapters;
pub mod calendar;
pub mod cargo;
pub mod config;
pub mod dice;
pub mod encounters;
pub mod events;
pub mod geography;
pub mod ledger;
pub mod market;
pub mod officer;
pub mod port;
pub mod report;
pub mod ship;
pub mod skills;
pub mod strategy;
pub mod voyage;
pub mod weather;
