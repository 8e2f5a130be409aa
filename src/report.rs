//! # Report Module
//!
//! The structured voyage report and its companion record types. The
//! report is plain data; the text rendering here is the reference
//! presentation, and a host's HTML journal is just another pure function
//! over the same record.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::calendar::VoyageDate;
use crate::events::Event;
use crate::ledger::{Breakdown, LedgerEntry};
use crate::port::{Moorage, RepairMethod};

/// What happened during one port call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortActivity {
    pub port_id: String,
    pub port_name: String,
    pub arrival_date: VoyageDate,
    pub days_in_port: i32,
    pub entrance_fee: i32,
    pub pilot_fee: i32,
    pub moorage: Moorage,
    pub moorage_fee: i32,
    /// Trading record lines: offers, purchases, sales, customs.
    pub trading: Vec<String>,
    /// Everything else: repairs, hiring, passengers.
    pub activity: Vec<String>,
}

/// One repair job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepairRecord {
    pub date: VoyageDate,
    pub port_id: String,
    pub method: RepairMethod,
    pub points: i32,
    pub cost: i64,
    pub days: i32,
}

/// A passenger or charter booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PassengerRecord {
    pub date: VoyageDate,
    pub port_id: String,
    pub passengers: i32,
    pub revenue: i64,
    pub note: String,
}

/// The finished voyage, as one structured record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoyageReport {
    pub voyage_id: String,
    pub ship_name: String,
    pub ship_type: String,
    pub route_name: String,
    pub captain: String,
    pub lieutenant: Option<String>,
    pub start_date: VoyageDate,
    pub end_date: VoyageDate,
    pub total_days: i32,
    pub total_distance: i32,
    pub final_hull: i32,
    pub hull_max: i32,
    pub starting_capital: i64,
    pub treasury: i64,
    pub revenue_total: i64,
    pub expense_total: i64,
    pub crew_earnings_from_trade: i64,
    pub breakdown: Breakdown,
    pub ports_visited: Vec<String>,
    pub port_activities: Vec<PortActivity>,
    pub repair_log: Vec<RepairRecord>,
    pub passenger_manifest: Vec<PassengerRecord>,
    pub ledger: Vec<LedgerEntry>,
    pub events: Vec<Event>,
    pub succeeded: bool,
}

impl VoyageReport {
    pub fn net_result(&self) -> i64 {
        self.treasury - self.starting_capital
    }
}

impl Display for VoyageReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Voyage of the {} ({}) under Captain {}",
            self.ship_name, self.ship_type, self.captain
        )?;
        writeln!(
            f,
            "{}: {} to {}, {} days, {} miles",
            self.route_name, self.start_date, self.end_date, self.total_days, self.total_distance
        )?;
        writeln!(
            f,
            "Hull {}/{}; ports called: {}",
            self.final_hull,
            self.hull_max,
            self.ports_visited.join(", ")
        )?;
        writeln!(
            f,
            "Treasury {} gp on {} gp capital ({:+} gp); revenue {}, expenses {}",
            self.treasury,
            self.starting_capital,
            self.net_result(),
            self.revenue_total,
            self.expense_total
        )?;
        writeln!(
            f,
            "Expenses: wages {}, food {}, repairs {}, fees {}, cargo {}, taxes {}",
            self.breakdown.wages,
            self.breakdown.food,
            self.breakdown.repairs,
            self.breakdown.fees,
            self.breakdown.cargo,
            self.breakdown.taxes
        )?;
        if self.crew_earnings_from_trade > 0 {
            writeln!(f, "Crew trade earnings: {} gp", self.crew_earnings_from_trade)?;
        }
        for event in &self.events {
            writeln!(f, "  {event}")?;
        }
        if !self.succeeded {
            writeln!(f, "LOST AT SEA")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_report_renders() {
        let report = VoyageReport {
            voyage_id: "abc123".to_string(),
            ship_name: "Brinehart".to_string(),
            ship_type: "Cog".to_string(),
            route_name: "Spice Circuit".to_string(),
            captain: "Aldra".to_string(),
            lieutenant: None,
            start_date: VoyageDate::new(1374, 1, 1),
            end_date: VoyageDate::new(1374, 2, 10),
            total_days: 39,
            total_distance: 1180,
            final_hull: 17,
            hull_max: 20,
            starting_capital: 5000,
            treasury: 6200,
            revenue_total: 4400,
            expense_total: 3200,
            crew_earnings_from_trade: 800,
            breakdown: Breakdown::default(),
            ports_visited: vec!["saltmere".to_string(), "tidesend".to_string()],
            port_activities: Vec::new(),
            repair_log: Vec::new(),
            passenger_manifest: Vec::new(),
            ledger: Vec::new(),
            events: Vec::new(),
            succeeded: true,
        };
        let text = report.to_string();
        assert!(text.contains("Brinehart"));
        assert!(text.contains("+1200 gp"));
        assert!(!text.contains("LOST AT SEA"));
        assert_eq!(report.net_result(), 1200);
    }
}
