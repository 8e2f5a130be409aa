//! # Trading Strategy
//!
//! Buy/sell/hold/wait decisions over deterministic scoring rules. No dice
//! and no I/O: the same inputs always produce the same decision, which is
//! what makes automated trading auditable after the fact.

use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use log::debug;

use crate::cargo::{distance_bonus, sale_adjustment_pct};

/// Outcome of a purchase deliberation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum BuyDecision {
    Buy { loads: i32, reason: String },
    Refuse { reason: String },
}

/// Outcome of a sale deliberation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SellDecision {
    Sell { reason: String },
    Hold { reason: String },
}

/// Whether to wait in port for a better market week.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WaitDecision {
    Wait { reason: String },
    Depart { reason: String },
}

/// What the strategist knows when a merchant makes an offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuyOffer {
    pub price_per_load: i32,
    pub base_value: i32,
    pub loads_available: i32,
}

/// Expected sale percentage of base value after sailing `distance_mi`,
/// assuming an average 3d6 (10) and neutral demand.
pub fn expected_sale_pct(distance_mi: i32) -> i32 {
    sale_adjustment_pct(10 + distance_bonus(distance_mi))
}

/// Expected profit per load for an offer sold after `distance_mi`.
fn expected_profit_per_load(offer: &BuyOffer, distance_mi: i32) -> i32 {
    offer.base_value * expected_sale_pct(distance_mi) / 100 - offer.price_per_load
}

/// How many loads the treasury can cover while keeping `reserve_pct`
/// back.
fn affordable_loads(treasury: i64, price_per_load: i32, reserve_pct: i32) -> i32 {
    if price_per_load <= 0 {
        return 0;
    }
    let budget = treasury * i64::from(100 - reserve_pct) / 100;
    (budget / i64::from(price_per_load)).min(i64::from(i32::MAX)) as i32
}

/// Decide whether to buy a merchant's offer.
///
/// `downstream_distances` holds the cumulative sailing distance from here
/// to each remaining port on the route; empty means this is the final
/// port. `hold_capacity` is the free space in loads.
pub fn decide_buy(
    offer: &BuyOffer,
    downstream_distances: &[i32],
    hold_capacity: i32,
    treasury: i64,
) -> BuyDecision {
    let Some(&best_sale_distance) = downstream_distances.iter().max() else {
        return BuyDecision::Refuse {
            reason: "Final port; nowhere left to sell".to_string(),
        };
    };

    if hold_capacity <= 0 {
        return BuyDecision::Refuse {
            reason: "Hold is full".to_string(),
        };
    }

    let price_ratio = f64::from(offer.price_per_load) / f64::from(offer.base_value.max(1));
    let profit = expected_profit_per_load(offer, best_sale_distance);

    if price_ratio > 1.10 && profit < 0 {
        return BuyDecision::Refuse {
            reason: format!(
                "Overpriced at {:.0}% of base with no profitable leg",
                price_ratio * 100.0
            ),
        };
    }

    let (accept, reserve_pct, reason) = if best_sale_distance > 500 {
        (
            true,
            20,
            "Extraordinary distance, guaranteed +4".to_string(),
        )
    } else if best_sale_distance < 250 {
        (
            price_ratio <= 0.85,
            50,
            format!("Short haul; only worthwhile at {:.0}% of base", price_ratio * 100.0),
        )
    } else {
        (
            price_ratio <= 1.0 || profit > 0,
            30,
            format!("Medium haul, expected {profit} gp per load"),
        )
    };

    if !accept {
        return BuyDecision::Refuse {
            reason: format!("No margin: {reason}"),
        };
    }

    let loads = hold_capacity
        .min(offer.loads_available)
        .min(affordable_loads(treasury, offer.price_per_load, reserve_pct));
    if loads <= 0 {
        return BuyDecision::Refuse {
            reason: "Treasury too thin after reserve".to_string(),
        };
    }

    debug!("buying {loads} loads: {reason}");
    BuyDecision::Buy { loads, reason }
}

/// Decide whether to sell held cargo here or carry it on.
///
/// `distance_traveled` is miles since purchase; `distance_to_next` is the
/// next leg (0 at the final port).
pub fn decide_sell(
    at_final_port: bool,
    distance_traveled: i32,
    distance_to_next: i32,
) -> SellDecision {
    if at_final_port {
        return SellDecision::Sell {
            reason: "Final port; selling out".to_string(),
        };
    }

    let current = distance_bonus(distance_traveled);
    let future = distance_bonus(distance_traveled + distance_to_next);

    if current < 4 && future >= 4 {
        return SellDecision::Hold {
            reason: "One more leg reaches the +4 band".to_string(),
        };
    }
    if future >= current + 2 {
        return SellDecision::Hold {
            reason: format!("Holding: bonus improves from {current:+} to {future:+}"),
        };
    }
    if current >= 2 {
        SellDecision::Sell {
            reason: format!("Good distance bonus ({current:+}) and no better ahead"),
        }
    } else {
        SellDecision::Sell {
            reason: "Freeing the hold; carrying further gains nothing".to_string(),
        }
    }
}

/// Decide whether to wait a week in port hoping for a better buy. Worth
/// it when a 15% saving on a full hold beats one and a half weeks of
/// operating cost.
pub fn decide_wait(hold_capacity: i32, price_per_load: i32, weekly_wait_cost: i64) -> WaitDecision {
    let potential_savings = i64::from(hold_capacity) * i64::from(price_per_load) * 15 / 100;
    if potential_savings > weekly_wait_cost * 3 / 2 {
        WaitDecision::Wait {
            reason: format!("Possible {potential_savings} gp saving beats the wait cost"),
        }
    } else {
        WaitDecision::Depart {
            reason: "Waiting costs more than it could save".to_string(),
        }
    }
}
