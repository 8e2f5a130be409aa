//! # Calendar Module
//!
//! The sixteen-month mariners' calendar. Thirty days to a month, so a
//! year runs 480 days; the simulator only ever steps forward one day at
//! a time.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Month names in order.
pub const MONTHS: [&str; 16] = [
    "Deepfrost",
    "Wolfmoon",
    "Icemelt",
    "Rainmarch",
    "Seedfall",
    "Blossomtide",
    "Highsun",
    "Firstharvest",
    "Emberwane",
    "Goldleaf",
    "Mistfall",
    "Frostmarch",
    "Longdark",
    "Starhold",
    "Galesmonth",
    "Yearsend",
];

pub const DAYS_PER_MONTH: i32 = 30;

/// A calendar date. Month is 1-16, day 1-30.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct VoyageDate {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl VoyageDate {
    pub fn new(year: i32, month: i32, day: i32) -> Self {
        VoyageDate {
            year,
            month: month.clamp(1, MONTHS.len() as i32),
            day: day.clamp(1, DAYS_PER_MONTH),
        }
    }

    /// Parse a month by name, case-insensitively.
    pub fn month_number(name: &str) -> Option<i32> {
        MONTHS
            .iter()
            .position(|m| m.eq_ignore_ascii_case(name))
            .map(|i| i as i32 + 1)
    }

    pub fn month_name(&self) -> &'static str {
        MONTHS[(self.month - 1) as usize]
    }

    /// Step one day forward, rolling months and years.
    pub fn advance_day(&mut self) {
        self.day += 1;
        if self.day > DAYS_PER_MONTH {
            self.day = 1;
            self.month += 1;
            if self.month > MONTHS.len() as i32 {
                self.month = 1;
                self.year += 1;
            }
        }
    }

    /// Days elapsed from another date to this one.
    pub fn days_since(&self, earlier: &VoyageDate) -> i32 {
        let this = (self.year * 16 + (self.month - 1)) * DAYS_PER_MONTH + (self.day - 1);
        let that = (earlier.year * 16 + (earlier.month - 1)) * DAYS_PER_MONTH + (earlier.day - 1);
        this - that
    }
}

impl Default for VoyageDate {
    fn default() -> Self {
        VoyageDate::new(1370, 1, 1)
    }
}

impl Display for VoyageDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.day, self.month_name(), self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn test_month_rollover() {
        let mut date = VoyageDate::new(1370, 1, 30);
        date.advance_day();
        assert_eq!((date.month, date.day), (2, 1));
    }

    #[test_log::test]
    fn test_year_rollover() {
        let mut date = VoyageDate::new(1370, 16, 30);
        date.advance_day();
        assert_eq!((date.year, date.month, date.day), (1371, 1, 1));
    }

    #[test_log::test]
    fn test_days_since() {
        let start = VoyageDate::new(1370, 1, 5);
        let mut date = start;
        for _ in 0..75 {
            date.advance_day();
        }
        assert_eq!(date.days_since(&start), 75);
    }

    #[test_log::test]
    fn test_display_and_month_lookup() {
        let date = VoyageDate::new(1374, 9, 12);
        assert_eq!(date.to_string(), "12 Emberwane 1374");
        assert_eq!(VoyageDate::month_number("emberwane"), Some(9));
        assert_eq!(VoyageDate::month_number("Thermidor"), None);
    }
}
