//! # Ledger Module
//!
//! The voyage's financial record. The ledger is append-only and carries a
//! running balance; every entry after the opening one satisfies
//! `balance = previous balance + income - expense`, so the whole history
//! can be reconstructed and audited from the entries alone.

use serde::{Deserialize, Serialize};

use crate::calendar::VoyageDate;

/// One ledger line. Income and expense are both non-negative; an entry
/// normally carries one or the other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    pub date: VoyageDate,
    pub description: String,
    pub income: i64,
    pub expense: i64,
    pub balance: i64,
}

/// Expense classification for the voyage breakdown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExpenseKind {
    Wages,
    Food,
    Repairs,
    Fees,
    Cargo,
    Taxes,
}

/// Running totals per expense class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Breakdown {
    pub wages: i64,
    pub food: i64,
    pub repairs: i64,
    pub fees: i64,
    pub cargo: i64,
    pub taxes: i64,
}

impl Breakdown {
    pub fn add(&mut self, kind: ExpenseKind, amount: i64) {
        match kind {
            ExpenseKind::Wages => self.wages += amount,
            ExpenseKind::Food => self.food += amount,
            ExpenseKind::Repairs => self.repairs += amount,
            ExpenseKind::Fees => self.fees += amount,
            ExpenseKind::Cargo => self.cargo += amount,
            ExpenseKind::Taxes => self.taxes += amount,
        }
    }

    pub fn total(&self) -> i64 {
        self.wages + self.food + self.repairs + self.fees + self.cargo + self.taxes
    }
}

/// Append-only ledger with a running balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Write the opening entry. It sets the balance directly instead of
    /// deriving it.
    pub fn open(&mut self, date: VoyageDate, description: impl Into<String>, balance: i64) {
        debug_assert!(self.entries.is_empty(), "ledger already opened");
        self.entries.push(LedgerEntry {
            date,
            description: description.into(),
            income: 0,
            expense: 0,
            balance,
        });
    }

    /// Append an entry; the new balance follows from the previous one.
    /// Returns the balance after the entry.
    pub fn record(
        &mut self,
        date: VoyageDate,
        description: impl Into<String>,
        income: i64,
        expense: i64,
    ) -> i64 {
        debug_assert!(income >= 0 && expense >= 0);
        let balance = self.balance() + income - expense;
        self.entries.push(LedgerEntry {
            date,
            description: description.into(),
            income,
            expense,
            balance,
        });
        balance
    }

    pub fn balance(&self) -> i64 {
        self.entries.last().map(|entry| entry.balance).unwrap_or(0)
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn total_income(&self) -> i64 {
        self.entries.iter().map(|entry| entry.income).sum()
    }

    pub fn total_expense(&self) -> i64 {
        self.entries.iter().map(|entry| entry.expense).sum()
    }

    /// Check that every post-opening balance follows from its
    /// predecessor. Used by tests and the voyage finalizer.
    pub fn reconciles(&self) -> bool {
        self.entries.windows(2).all(|pair| {
            pair[1].balance == pair[0].balance + pair[1].income - pair[1].expense
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> VoyageDate {
        VoyageDate::new(1374, 3, 1)
    }

    #[test_log::test]
    fn test_opening_entry_sets_balance() {
        let mut ledger = Ledger::default();
        ledger.open(date(), "Voyage capital", 5000);
        assert_eq!(ledger.balance(), 5000);
        assert!(ledger.reconciles());
    }

    #[test_log::test]
    fn test_running_balance() {
        let mut ledger = Ledger::default();
        ledger.open(date(), "Voyage capital", 5000);
        ledger.record(date(), "Port fees at Saltmere", 0, 120);
        ledger.record(date(), "Cargo sale at Korvast", 4400, 0);
        assert_eq!(ledger.balance(), 5000 - 120 + 4400);
        assert!(ledger.reconciles());
        assert_eq!(ledger.total_income(), 4400);
        assert_eq!(ledger.total_expense(), 120);
    }

    #[test_log::test]
    fn test_reconciliation_detects_tampering() {
        let mut ledger = Ledger::default();
        ledger.open(date(), "Voyage capital", 100);
        ledger.record(date(), "Fees", 0, 10);
        ledger.entries[1].balance += 1;
        assert!(!ledger.reconciles());
    }

    #[test_log::test]
    fn test_breakdown_totals() {
        let mut breakdown = Breakdown::default();
        breakdown.add(ExpenseKind::Wages, 30);
        breakdown.add(ExpenseKind::Food, 12);
        breakdown.add(ExpenseKind::Taxes, 200);
        assert_eq!(breakdown.total(), 242);
        assert_eq!(breakdown.wages, 30);
    }
}
