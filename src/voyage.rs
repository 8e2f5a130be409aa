//! # Voyage Engine
//!
//! The orchestrator. Owns the voyage state machine (origin processing,
//! the per-leg day loop, port calls, finalization) and drives every rule
//! subsystem in a fixed order: costs, weather, propulsion, hazards,
//! encounters, calendar. All money moves through the ledger, so the
//! treasury is always the last ledger balance.

use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use log::{debug, info, warn};

use crate::adapters::{
    AutoDecisions, CalendarAdapter, DecisionAdapter, DecisionReply, DecisionRequest, LogNotifier,
    Notifier, StateStore, WeatherAdapter,
};
use crate::calendar::VoyageDate;
use crate::cargo::{CargoCategory, CargoHold};
use crate::config::{ConfigError, TradeMode, VoyageConfig};
use crate::dice::Dice;
use crate::encounters::{self, Classification, Encounter, Mitigation};
use crate::events::{DamageSource, Event, EventDetail};
use crate::geography::{self, Connection, Route};
use crate::ledger::{Breakdown, ExpenseKind, Ledger};
use crate::market::{self, PortAgent, Trader};
use crate::officer::Officer;
use crate::port::{self, RepairMethod, RepairPlan, TemporaryRepair};
use crate::report::{PassengerRecord, PortActivity, RepairRecord, VoyageReport};
use crate::ship::{self, CrewRole, Ship};
use crate::skills::{officer_check, Skill};
use crate::strategy::{self, BuyDecision, SellDecision};
use crate::weather::{self, SailingCondition, WeatherRecord};

/// Hard ceiling on simulated days; a voyage that drifts this long is
/// abandoned as lost rather than spun forever.
const MAX_VOYAGE_DAYS: i32 = 1500;

/// Where the voyage stands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum VoyagePhase {
    /// Configured but not yet departed.
    Origin,
    /// Under way on leg `leg` (an index into the leg list).
    Sailing { leg: usize },
    /// Tied up after leg `leg` with `days_left` of the stay remaining.
    InPort { leg: usize, days_left: i32 },
    Final,
    Failed,
}

/// A consignment contract loaded at the origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsignmentContract {
    pub category: CargoCategory,
    pub loads: i32,
    pub total_fee: i64,
    pub upfront_paid: i64,
}

/// The long-lived voyage aggregate. Everything needed to resume a voyage
/// round-trips through the state store as one record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoyageState {
    pub version: u32,
    pub id: String,
    pub config: VoyageConfig,
    pub ship: Ship,
    pub route: Route,
    /// Resolved leg ports, with the closing leg appended for circuits.
    pub leg_ports: Vec<String>,
    pub phase: VoyagePhase,
    pub date: VoyageDate,
    pub total_days: i32,
    pub treasury: i64,
    pub starting_capital: i64,
    pub crew_earnings_from_trade: i64,
    pub daily_operational_cost: i64,
    pub leg_accumulated_cost: i64,
    leg_wages_accrued: i64,
    leg_food_accrued: i64,
    pub breakdown: Breakdown,
    pub cargo: CargoHold,
    pub consignment: Option<ConsignmentContract>,
    pub total_distance: i32,
    pub distance_since_purchase: i32,
    pub remaining_leg_distance: i32,
    pub total_hull_damage: i32,
    pub consecutive_rowing_days: i32,
    /// Weeks already spent waiting on this port's market for a better
    /// offer; one wait per call at most.
    market_weeks_waited: i32,
    pub temporary_repairs: Vec<TemporaryRepair>,
    pub events: Vec<Event>,
    pub ports_visited: Vec<String>,
    pub port_activities: Vec<PortActivity>,
    pub ledger: Ledger,
    pub repair_log: Vec<RepairRecord>,
    pub passenger_manifest: Vec<PassengerRecord>,
    pub at_sea: bool,
    pub in_port: bool,
    pub finished: bool,
    pub last_port_id: Option<String>,
    warned_missing_weather: bool,
}

impl VoyageState {
    pub fn revenue_total(&self) -> i64 {
        self.ledger.total_income()
    }

    pub fn expense_total(&self) -> i64 {
        self.ledger.total_expense()
    }

    fn final_position(&self) -> usize {
        self.leg_ports.len() - 1
    }
}

/// What one engine step did, for hosts that narrate progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOutcome {
    pub date: VoyageDate,
    pub note: String,
    pub finished: bool,
}

/// What came of a week's visit to the merchants.
#[derive(Debug, Clone, Copy, Default)]
struct MarketVisit {
    bought: bool,
    last_price_per_load: Option<i32>,
}

/// The running engine: state plus dice plus the capability adapters.
pub struct VoyageEngine {
    state: VoyageState,
    dice: Dice,
    weather: Option<Box<dyn WeatherAdapter>>,
    calendar: Option<Box<dyn CalendarAdapter>>,
    decisions: Box<dyn DecisionAdapter>,
    notifier: Box<dyn Notifier>,
}

impl VoyageEngine {
    /// Validate a configuration and build the initial state. The voyage
    /// has not departed yet; wire up adapters, then call
    /// [`Self::depart`] or just start stepping.
    pub fn new(config: VoyageConfig, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut dice = match seed {
            Some(seed) => Dice::seeded(seed),
            None => Dice::new(),
        };

        let template = ship::ship_template(&config.ship_id)
            .expect("validated ship id");
        let route = geography::route(&config.route_id)
            .expect("validated route id")
            .clone();
        let leg_ports = route.leg_ports();

        let mut config = config;
        config.captain.resolve_level(&mut dice);

        let state = VoyageState {
            version: 1,
            id: dice.token(12),
            ship: Ship::from_template(template),
            route,
            leg_ports,
            phase: VoyagePhase::Origin,
            date: config.start_date,
            total_days: 0,
            treasury: 0,
            starting_capital: config.starting_gold,
            crew_earnings_from_trade: 0,
            daily_operational_cost: 0,
            leg_accumulated_cost: 0,
            leg_wages_accrued: 0,
            leg_food_accrued: 0,
            breakdown: Breakdown::default(),
            cargo: CargoHold::default(),
            consignment: None,
            total_distance: 0,
            distance_since_purchase: 0,
            remaining_leg_distance: 0,
            total_hull_damage: 0,
            consecutive_rowing_days: 0,
            market_weeks_waited: 0,
            temporary_repairs: Vec::new(),
            events: Vec::new(),
            ports_visited: Vec::new(),
            port_activities: Vec::new(),
            ledger: Ledger::default(),
            repair_log: Vec::new(),
            passenger_manifest: Vec::new(),
            at_sea: false,
            in_port: true,
            finished: false,
            last_port_id: None,
            warned_missing_weather: false,
            config,
        };

        Ok(VoyageEngine {
            state,
            dice,
            weather: None,
            calendar: None,
            decisions: Box::new(AutoDecisions),
            notifier: Box::new(LogNotifier),
        })
    }

    /// Resume a previously persisted voyage.
    pub fn resume(state: VoyageState, seed: Option<u64>) -> Self {
        let dice = match seed {
            Some(seed) => Dice::seeded(seed),
            None => Dice::new(),
        };
        VoyageEngine {
            state,
            dice,
            weather: None,
            calendar: None,
            decisions: Box::new(AutoDecisions),
            notifier: Box::new(LogNotifier),
        }
    }

    pub fn with_weather(mut self, adapter: Box<dyn WeatherAdapter>) -> Self {
        self.weather = Some(adapter);
        self
    }

    pub fn with_calendar(mut self, adapter: Box<dyn CalendarAdapter>) -> Self {
        self.calendar = Some(adapter);
        self
    }

    pub fn with_decisions(mut self, adapter: Box<dyn DecisionAdapter>) -> Self {
        self.decisions = adapter;
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn state(&self) -> &VoyageState {
        &self.state
    }

    pub fn voyage_id(&self) -> &str {
        &self.state.id
    }

    fn captain(&self) -> &Officer {
        &self.state.config.captain
    }

    /// The trader for a transaction: the captain in person, or a freshly
    /// contracted agent when the captain has none of the trade skills.
    fn hire_agent_if_needed(&mut self) -> Option<PortAgent> {
        let captain = self.captain();
        let unskilled = ![Skill::Bargaining, Skill::Appraisal, Skill::Trade]
            .iter()
            .any(|&skill| captain.has_skill(skill));
        unskilled.then(|| PortAgent::hire(&mut self.dice))
    }

    // === Origin processing ===

    /// Process the origin port and put the ship to sea on the first leg.
    pub fn depart(&mut self) {
        if self.state.phase != VoyagePhase::Origin {
            return;
        }
        let origin_id = self.state.leg_ports[0].clone();
        let origin = geography::port(&origin_id).expect("route ports exist");

        self.state.ledger.open(
            self.state.date,
            format!("Voyage capital aboard the {}", self.state.ship.name),
            self.state.starting_capital,
        );
        self.state.treasury = self.state.ledger.balance();
        self.state.ports_visited.push(origin_id.clone());
        self.state.last_port_id = Some(origin_id.clone());

        let mut activity = self.begin_port_activity(origin, 3);
        self.pay_port_fees(&mut activity);
        self.offer_repairs(origin, &mut activity);
        self.offer_hiring(origin, &mut activity);

        // Three days alongside before sailing.
        for _ in 0..3 {
            self.accrue_daily_cost();
            self.advance_calendar();
        }

        match self.state.config.trade_mode {
            TradeMode::Consignment => self.load_consignment(&mut activity),
            TradeMode::Speculation => {
                if self.state.config.automate_trading {
                    self.trade_buy(0, 1, &mut activity);
                }
            }
        }

        self.flush_accrued(&format!("Stay at {}", origin.name));
        self.state.port_activities.push(activity);

        self.begin_leg(0);
        self.notifier.info(&format!(
            "{} departs {} on the {}",
            self.state.ship.name, origin.name, self.state.route.name
        ));
    }

    fn begin_leg(&mut self, leg: usize) {
        let lane = self.leg_lane(leg);
        self.state.remaining_leg_distance = lane.distance_mi;
        self.state.phase = VoyagePhase::Sailing { leg };
        self.state.at_sea = true;
        self.state.in_port = false;
    }

    fn leg_lane(&self, leg: usize) -> Connection {
        let from = &self.state.leg_ports[leg];
        let to = &self.state.leg_ports[leg + 1];
        geography::lane(from, to)
            .unwrap_or_else(|| panic!("no lane {from} -> {to} on route {}", self.state.route.id))
    }

    /// Cumulative distances from a position in the leg list to each
    /// downstream port.
    fn downstream_distances(&self, position: usize) -> Vec<i32> {
        let mut distances = Vec::new();
        let mut total = 0;
        for leg in position..self.state.leg_ports.len() - 1 {
            total += self.leg_lane(leg).distance_mi;
            distances.push(total);
        }
        distances
    }

    // === The day loop ===

    /// Advance the simulation by one step: the origin block if the
    /// voyage has not departed, otherwise exactly one day at sea or in
    /// port.
    pub fn simulate_day(&mut self) -> DayOutcome {
        match self.state.phase {
            VoyagePhase::Origin => {
                self.depart();
                DayOutcome {
                    date: self.state.date,
                    note: "Departed the origin port".to_string(),
                    finished: false,
                }
            }
            VoyagePhase::Sailing { leg } => self.sail_day(leg),
            VoyagePhase::InPort { leg, days_left } => self.port_day(leg, days_left),
            VoyagePhase::Final | VoyagePhase::Failed => DayOutcome {
                date: self.state.date,
                note: "Voyage is over".to_string(),
                finished: true,
            },
        }
    }

    /// Run to the end of the voyage, persisting at day boundaries.
    /// Returns the report on success, None on failure.
    pub fn run_to_completion(
        &mut self,
        store: Option<&mut dyn StateStore>,
    ) -> Option<VoyageReport> {
        let mut store = store;
        loop {
            let outcome = self.simulate_day();
            if let Some(store) = store.as_mut() {
                if let Err(e) = store.save(&self.state.id, &self.state) {
                    self.notifier.error(&format!("state save failed: {e}"));
                }
            }
            if outcome.finished {
                break;
            }
            if self.state.total_days > MAX_VOYAGE_DAYS {
                self.notifier
                    .error("voyage abandoned: adrift past the day limit");
                self.state.phase = VoyagePhase::Failed;
                break;
            }
        }

        // Terminated either way; the voyage leaves the active registry.
        let succeeded = self.state.phase == VoyagePhase::Final;
        if let Some(store) = store.as_mut() {
            let _ = store.remove(&self.state.id);
        }
        succeeded.then(|| self.build_report())
    }

    fn sail_day(&mut self, leg: usize) -> DayOutcome {
        self.accrue_daily_cost();
        let record = self.day_weather();
        let lane = self.leg_lane(leg);

        // Propulsion, with the hull drag applied on top of the weather.
        let damage_pct = self.state.ship.hull.damage_pct();
        let motion = weather::sailing_speed(&mut self.dice, &record, self.state.ship.base_speed());
        let mut note = motion.note.clone();
        let mut distance_today;
        if weather::dead_in_water(damage_pct) {
            distance_today = 0;
            note = "Dead in the water; the hull will not answer".to_string();
            self.state.consecutive_rowing_days = 0;
        } else if motion.condition == SailingCondition::Becalmed {
            if self.state.config.enable_rowing && self.state.ship.count(CrewRole::Oarsman) >= 1 {
                self.state.consecutive_rowing_days += 1;
                distance_today = weather::rowing_speed(self.state.consecutive_rowing_days);
                note = format!("{note}; out oars for {distance_today} miles");
            } else {
                distance_today = 0;
                self.state.consecutive_rowing_days = 0;
            }
        } else {
            self.state.consecutive_rowing_days = 0;
            let penalty = weather::hull_speed_penalty_pct(damage_pct);
            distance_today = motion.speed_mi * (100 - penalty) / 100;
        }

        // Weather hazard and the piloting check.
        if let Some(hazard) = weather::classify_hazard(&record) {
            if motion.condition != SailingCondition::Becalmed {
                let check = officer_check(
                    &mut self.dice,
                    Skill::Piloting,
                    &self.state.config.captain,
                    self.state.config.lieutenant.as_ref(),
                    self.state.config.crew_quality,
                    -hazard.piloting_penalty,
                );
                if !check.success {
                    let damage =
                        weather::hazard_damage(&mut self.dice, hazard.severity, check.miss_margin);
                    self.apply_hull_damage(DamageSource::Storm, &hazard.description, damage);
                    note = format!("{note}; {} cost {damage} hull", hazard.description);
                }
            }
        }

        // Scheduled encounter checks for the leg's waters.
        if self.state.phase != VoyagePhase::Failed {
            let mut speed_factor = 1.0f64;
            let times: Vec<_> = encounters::check_times(lane.water).to_vec();
            let mut extra_checks = 0;
            for time in times.iter().copied() {
                if self.state.phase == VoyagePhase::Failed {
                    break;
                }
                if let Some(encounter) =
                    encounters::check_for_encounter(&mut self.dice, lane.water, time)
                {
                    let factor = self.handle_encounter(&encounter);
                    speed_factor = speed_factor.min(factor.0);
                    if factor.1 {
                        extra_checks += 1;
                    }
                }
            }
            for _ in 0..extra_checks {
                if self.state.phase == VoyagePhase::Failed {
                    break;
                }
                if let Some(encounter) = encounters::check_for_encounter(
                    &mut self.dice,
                    lane.water,
                    encounters::TimeOfDay::Evening,
                ) {
                    let factor = self.handle_encounter(&encounter);
                    speed_factor = speed_factor.min(factor.0);
                }
            }
            if speed_factor < 1.0 {
                distance_today = (f64::from(distance_today) * speed_factor) as i32;
            }
        }

        self.expire_temporary_repairs();

        if self.state.phase == VoyagePhase::Failed {
            return DayOutcome {
                date: self.state.date,
                note: "The ship was lost".to_string(),
                finished: true,
            };
        }

        // Advance the calendar and the chart.
        let covered = distance_today.min(self.state.remaining_leg_distance);
        self.state.remaining_leg_distance -= covered;
        self.state.total_distance += covered;
        if !self.state.cargo.is_empty() {
            self.state.distance_since_purchase += covered;
        }
        self.advance_calendar();

        if self.state.remaining_leg_distance <= 0 {
            self.arrive(leg);
        }

        DayOutcome {
            date: self.state.date,
            note,
            finished: false,
        }
    }

    /// Returns (speed factor for the day, whether to run an extra check).
    fn handle_encounter(&mut self, encounter: &Encounter) -> (f64, bool) {
        self.push_event(EventDetail::Encounter {
            water_type: encounter.water,
            name: encounter.name.clone(),
            classification: encounter.classification,
            time_of_day: encounter.time_of_day,
            number: encounter.number_appearing,
            distance_yd: encounter.distance_yd,
            surprise: encounter.surprised,
            description: encounter.description.clone(),
        });

        if encounter.classification == Classification::Threat {
            // Offer mitigation before blood is drawn.
            if encounter.can_be_driven_off {
                let recommended = Some(Mitigation::FlamingOil { burning: false });
                let reply = self.decisions.decide(&DecisionRequest::Mitigate {
                    threat_name: encounter.name.clone(),
                    recommended,
                });
                if let DecisionReply::Mitigate(Some(method)) = reply {
                    if encounters::attempt_mitigation(&mut self.dice, method) {
                        debug!("{} driven off", encounter.name);
                        return (1.0, false);
                    }
                }
            }

            // A gargantuan attacker can simply roll the ship over.
            if encounter.capsize_risk {
                let chance = encounters::capsize_chance(self.state.ship.hull.max);
                if self.dice.percent(chance) {
                    let hull_max = self.state.ship.hull.max;
                    self.apply_hull_damage(
                        DamageSource::Creature,
                        &format!("capsized by {}", encounter.name),
                        hull_max,
                    );
                    return (1.0, false);
                }
            }
        }

        let outcome = encounters::resolve_outcome(&mut self.dice, encounter);
        if outcome.hull_damage > 0 {
            self.apply_hull_damage(DamageSource::Creature, &encounter.name, outcome.hull_damage);
        }
        if outcome.crew_loss > 0 {
            let lost = self.state.ship.lose_crew(outcome.crew_loss);
            if lost > 0 {
                self.push_event(EventDetail::CrewLoss {
                    source_name: encounter.name.clone(),
                    count: lost,
                });
            }
        }
        (outcome.speed_factor.unwrap_or(1.0), outcome.extra_check)
    }

    fn apply_hull_damage(&mut self, source: DamageSource, source_name: &str, damage: i32) {
        if damage <= 0 {
            return;
        }
        let remaining = self.state.ship.damage_hull(damage);
        self.state.total_hull_damage += damage;
        self.push_event(EventDetail::Damage {
            source,
            source_name: source_name.to_string(),
            hull_damage: damage,
            hull_remaining: remaining,
        });
        if remaining <= 0 {
            self.state.phase = VoyagePhase::Failed;
            self.state.finished = true;
            self.state.at_sea = false;
            self.notifier.error(&self.failure_summary());
        }
    }

    fn expire_temporary_repairs(&mut self) {
        let today = self.state.total_days;
        let expiring: Vec<TemporaryRepair> = self
            .state
            .temporary_repairs
            .iter()
            .copied()
            .filter(|patch| patch.expires_on_day <= today)
            .collect();
        self.state
            .temporary_repairs
            .retain(|patch| patch.expires_on_day > today);
        for patch in expiring {
            self.apply_hull_damage(DamageSource::Hazard, "failed patch", patch.points);
            if self.state.phase == VoyagePhase::Failed {
                break;
            }
        }
    }

    // === Port calls ===

    fn arrive(&mut self, leg: usize) {
        let position = leg + 1;
        let port_id = self.state.leg_ports[position].clone();
        let info = geography::port(&port_id).expect("route ports exist");
        self.state.at_sea = false;
        self.state.in_port = true;
        self.state.market_weeks_waited = 0;
        self.state.ports_visited.push(port_id.clone());
        self.state.last_port_id = Some(port_id);

        self.flush_accrued(&format!("Passage to {}", info.name));

        let at_final = position == self.state.final_position();
        let days = if at_final { 3 } else { self.dice.range(2, 4) };

        let mut activity = self.begin_port_activity(info, days);
        self.pay_port_fees(&mut activity);
        let repair_days = self.offer_repairs(info, &mut activity);
        self.offer_hiring(info, &mut activity);
        self.state.port_activities.push(activity);

        self.state.phase = VoyagePhase::InPort {
            leg,
            days_left: days + repair_days,
        };
        info!(
            "arrived at {} for {} days",
            info.name,
            days + repair_days
        );
    }

    fn port_day(&mut self, leg: usize, days_left: i32) -> DayOutcome {
        self.accrue_daily_cost();
        // Harbor weather is generated for the record but carries no
        // hazard while tied up.
        let record = self.day_weather();
        self.advance_calendar();

        if days_left > 1 {
            self.state.phase = VoyagePhase::InPort {
                leg,
                days_left: days_left - 1,
            };
            return DayOutcome {
                date: self.state.date,
                note: format!("In port under {} skies", record.sky),
                finished: false,
            };
        }

        self.depart_port(leg)
    }

    fn depart_port(&mut self, leg: usize) -> DayOutcome {
        let position = leg + 1;
        let port_id = self.state.leg_ports[position].clone();
        let info = geography::port(&port_id).expect("route ports exist");
        let at_final = position == self.state.final_position();

        let mut activity = self
            .state
            .port_activities
            .pop()
            .expect("activity opened at arrival");

        self.flush_accrued(&format!("Stay at {}", info.name));

        if !at_final && self.state.market_weeks_waited == 0 {
            self.offer_passengers(info, position, &mut activity);
        }

        // Trade: sell or deliver what we hold, then restock.
        if !self.state.cargo.is_empty() {
            match self.state.config.trade_mode {
                TradeMode::Speculation => self.trade_sell(info, position, at_final, &mut activity),
                TradeMode::Consignment => {
                    if at_final {
                        self.deliver_consignment(info, &mut activity);
                    }
                }
            }
        }
        if self.state.cargo.is_empty()
            && !at_final
            && self.state.config.trade_mode == TradeMode::Speculation
            && self.state.config.automate_trading
        {
            let week = self.state.market_weeks_waited + 1;
            let visit = self.trade_buy(position, week, &mut activity);
            // An empty hold and no worthwhile offer: maybe a week's wait
            // brings better merchants.
            if !visit.bought && self.state.market_weeks_waited == 0 {
                if let Some(price) = visit.last_price_per_load {
                    let weekly_cost = self.state.daily_operational_cost * 7;
                    if let strategy::WaitDecision::Wait { reason } = strategy::decide_wait(
                        self.state.ship.cargo_capacity,
                        price,
                        weekly_cost,
                    ) {
                        activity
                            .trading
                            .push(format!("Waiting on the market: {reason}"));
                        self.state.market_weeks_waited += 1;
                        self.state.port_activities.push(activity);
                        self.state.phase = VoyagePhase::InPort { leg, days_left: 7 };
                        return DayOutcome {
                            date: self.state.date,
                            note: format!("Holding at {} for a better market", info.name),
                            finished: false,
                        };
                    }
                }
            }
        }

        self.state.market_weeks_waited = 0;
        self.state.port_activities.push(activity);

        if at_final {
            self.finalize();
            DayOutcome {
                date: self.state.date,
                note: "Voyage complete".to_string(),
                finished: true,
            }
        } else {
            self.begin_leg(leg + 1);
            DayOutcome {
                date: self.state.date,
                note: format!("Cleared {} for sea", info.name),
                finished: false,
            }
        }
    }

    fn begin_port_activity(&mut self, info: &geography::PortInfo, days: i32) -> PortActivity {
        PortActivity {
            port_id: info.id.clone(),
            port_name: info.name.clone(),
            arrival_date: self.state.date,
            days_in_port: days,
            entrance_fee: 0,
            pilot_fee: 0,
            moorage: port::Moorage::Anchor,
            moorage_fee: 0,
            trading: Vec::new(),
            activity: Vec::new(),
        }
    }

    fn pay_port_fees(&mut self, activity: &mut PortActivity) {
        let fees = port::assess_port_fees(
            &mut self.dice,
            self.state.ship.hull.max,
            self.state.ship.hull.damage_pct(),
            activity.days_in_port,
        );
        activity.entrance_fee = fees.entrance;
        activity.pilot_fee = fees.pilot;
        activity.moorage = fees.moorage;
        activity.moorage_fee = fees.moorage_cost;

        self.record_expense(
            format!("Port fees at {} ({})", activity.port_name, fees.moorage),
            fees.total(),
            ExpenseKind::Fees,
        );
    }

    /// Returns extra days the chosen repair adds to the stay.
    fn offer_repairs(&mut self, info: &geography::PortInfo, activity: &mut PortActivity) -> i32 {
        let damage = self.state.ship.hull.damage();
        if damage == 0 || !info.size.offers_repairs() {
            return 0;
        }

        let professional = port::professional_repair(damage);
        let drydock = port::drydock_repair(damage, self.state.ship.hull.max, info.size);
        let carpenter = port::self_repair(
            &mut self.dice,
            damage,
            self.state.ship.hull.max,
            &self.state.config.captain,
            self.state.config.lieutenant.as_ref(),
            self.state.config.crew_quality,
            self.state.total_days,
        );

        let damage_pct = self.state.ship.hull.damage_pct();
        let recommended = (self.state.config.auto_repair
            && port::auto_repair_choice(damage_pct, self.state.treasury, professional.cost))
        .then_some(RepairMethod::Professional);

        let mut options = vec![professional.clone(), drydock.clone()];
        if let Some(plan) = carpenter.clone() {
            options.push(plan);
        }
        let reply = self.decisions.decide(&DecisionRequest::Repair {
            damage,
            damage_pct,
            treasury: self.state.treasury,
            options,
            recommended,
        });

        let chosen = match reply {
            DecisionReply::Repair(Some(method)) => match method {
                RepairMethod::Professional => Some(professional),
                RepairMethod::Drydock => Some(drydock),
                RepairMethod::SelfRepair => carpenter,
            },
            _ => None,
        };

        let Some(plan) = chosen else {
            activity
                .activity
                .push(format!("Repairs deferred ({damage} damage)"));
            return 0;
        };
        if self.state.treasury < plan.cost {
            activity
                .activity
                .push(format!("Repairs deferred; {} gp beyond reach", plan.cost));
            return 0;
        }

        self.apply_repair_plan(&plan, activity);
        plan.days
    }

    fn apply_repair_plan(&mut self, plan: &RepairPlan, activity: &mut PortActivity) {
        self.record_expense(
            format!(
                "{} repairs at {} ({} points)",
                plan.method, activity.port_name, plan.points_restored
            ),
            plan.cost,
            ExpenseKind::Repairs,
        );
        self.state.ship.hull.value =
            (self.state.ship.hull.value + plan.points_restored).min(self.state.ship.hull.max);
        self.state.temporary_repairs.extend(plan.temporary.iter());
        self.state.repair_log.push(RepairRecord {
            date: self.state.date,
            port_id: activity.port_id.clone(),
            method: plan.method,
            points: plan.points_restored,
            cost: plan.cost,
            days: plan.days,
        });
        activity.activity.push(format!(
            "{} repair: {} points for {} gp over {} days",
            plan.method, plan.points_restored, plan.cost, plan.days
        ));
    }

    fn offer_hiring(&mut self, info: &geography::PortInfo, activity: &mut PortActivity) {
        if !port::hiring_allowed(info.size, self.state.ship.hull.max) {
            return;
        }
        let template = ship::ship_template(&self.state.config.ship_id).expect("validated");
        let shortfall = self.state.ship.shortfall(template);
        let shortfall_total: i32 = shortfall.iter().map(|(_, n)| n).sum();
        if shortfall_total == 0 {
            return;
        }
        let required_total: i32 = template.crew.iter().map(|unit| unit.count).sum();

        let recommended = port::should_auto_hire(shortfall_total, required_total);
        let reply = self.decisions.decide(&DecisionRequest::Hire {
            shortfall_total,
            required_total,
            recommended,
        });
        if reply != DecisionReply::Hire(true) {
            return;
        }

        for (role, count) in shortfall {
            self.state.ship.add_crew(role, count, 1);
            activity
                .activity
                .push(format!("Hired {count} {role}(s)"));
        }
    }

    fn offer_passengers(
        &mut self,
        info: &geography::PortInfo,
        position: usize,
        activity: &mut PortActivity,
    ) {
        let remaining: i32 = self.downstream_distances(position).last().copied().unwrap_or(0);
        let count = port::passengers_available(&mut self.dice, info.size);
        if count > 0 {
            let revenue = port::passenger_revenue(count, remaining);
            self.record_income(
                format!("{count} passengers boarded at {}", info.name),
                revenue,
            );
            self.state.passenger_manifest.push(PassengerRecord {
                date: self.state.date,
                port_id: info.id.clone(),
                passengers: count,
                revenue,
                note: format!("passage toward {}", self.state.leg_ports[self.state.final_position()]),
            });
            activity
                .activity
                .push(format!("Boarded {count} passengers for {revenue} gp"));
        }

        if let Some(offer) = port::charter_opportunity(&mut self.dice) {
            let reply = self.decisions.decide(&DecisionRequest::Charter {
                offer,
                recommended: true,
            });
            if reply == DecisionReply::Charter(true) {
                self.record_income(
                    format!("Charter contract out of {}", info.name),
                    offer.fee,
                );
                self.state.passenger_manifest.push(PassengerRecord {
                    date: self.state.date,
                    port_id: info.id.clone(),
                    passengers: 0,
                    revenue: offer.fee,
                    note: format!("charter, {} miles", offer.distance_mi),
                });
                activity
                    .activity
                    .push(format!("Charter accepted for {} gp", offer.fee));
            }
        }
    }

    // === Trading ===

    fn trade_buy(&mut self, position: usize, week: i32, activity: &mut PortActivity) -> MarketVisit {
        let mut visit = MarketVisit::default();
        let port_id = self.state.leg_ports[position].clone();
        let info = geography::port(&port_id).expect("route ports exist");
        let downstream = self.downstream_distances(position);
        if downstream.is_empty() {
            return visit;
        }

        let total_merchants =
            market::merchants_available(&mut self.dice, info.size, &self.state.config.captain);
        let this_week = market::merchants_in_week(total_merchants, week);
        activity.trading.push(format!(
            "{this_week} of {total_merchants} merchants trading in week {week}"
        ));

        let agent = self.hire_agent_if_needed();
        for _ in 0..this_week {
            let offer = {
                let trader = make_trader(&self.state.config, agent);
                market::merchant_offer(&mut self.dice, info.size, &trader)
            };
            visit.last_price_per_load = Some(offer.price_per_load);
            let recommended = strategy::decide_buy(
                &strategy::BuyOffer {
                    price_per_load: offer.price_per_load,
                    base_value: offer.base_value,
                    loads_available: offer.loads_available,
                },
                &downstream,
                self.state.ship.cargo_capacity - self.state.cargo.loads,
                self.state.treasury,
            );
            let reason = match &recommended {
                BuyDecision::Buy { reason, .. } | BuyDecision::Refuse { reason } => reason.clone(),
            };
            let reply = self.decisions.decide(&DecisionRequest::Purchase {
                offer: offer.clone(),
                recommended,
            });
            let DecisionReply::Purchase { loads } = reply else {
                continue;
            };
            let loads = loads.min(offer.loads_available);
            if loads <= 0 {
                activity.trading.push(format!(
                    "Passed on {} at {} gp/load: {reason}",
                    offer.category, offer.price_per_load
                ));
                continue;
            }

            let cost = i64::from(loads) * i64::from(offer.price_per_load);
            self.record_expense(
                format!(
                    "Bought {loads} loads of {} at {} gp/load",
                    offer.category, offer.price_per_load
                ),
                cost,
                ExpenseKind::Cargo,
            );
            self.state.cargo.stow(
                offer.category,
                loads,
                offer.price_per_load,
                position as i32 - 1,
            );
            self.state.distance_since_purchase = 0;
            activity.trading.push(format!(
                "Bought {loads} loads of {} ({reason})",
                offer.category
            ));
            visit.bought = true;
            break;
        }
        visit
    }

    fn trade_sell(
        &mut self,
        info: &geography::PortInfo,
        position: usize,
        at_final: bool,
        activity: &mut PortActivity,
    ) {
        let Some(category) = self.state.cargo.category else {
            return;
        };
        let next_leg_distance = if at_final {
            0
        } else {
            self.leg_lane(position).distance_mi
        };
        let recommended = strategy::decide_sell(
            at_final,
            self.state.distance_since_purchase,
            next_leg_distance,
        );
        let reply = self.decisions.decide(&DecisionRequest::Sell {
            cargo: self.state.cargo.clone(),
            recommended: recommended.clone(),
        });
        if reply != DecisionReply::Sell(true) {
            if let SellDecision::Hold { reason } = recommended {
                activity.trading.push(format!("Holding cargo: {reason}"));
            }
            return;
        }

        let loads = self.state.cargo.loads;
        let purchase_total =
            i64::from(self.state.cargo.purchase_price_per_load) * i64::from(loads);
        let agent = self.hire_agent_if_needed();
        let sale = {
            let trader = make_trader(&self.state.config, agent);
            market::resolve_sale(
                &mut self.dice,
                &trader,
                category,
                loads,
                self.state.distance_since_purchase,
                info.size,
            )
        };

        if sale.loads_spoiled > 0 {
            self.push_event(EventDetail::CargoSpoilage {
                loads_lost: sale.loads_spoiled,
                loads_remaining: sale.loads_sold,
                note: format!(
                    "{} haul past its keeping threshold",
                    sale.distance_category
                ),
            });
        }
        if sale.skipped {
            activity.trading.push(sale.note.clone());
            self.state.cargo.remove(loads);
            self.state.distance_since_purchase = 0;
            return;
        }

        let agent_fee = agent
            .map(|agent| sale.total * i64::from(agent.fee_pct) / 100)
            .unwrap_or(0);
        let split = market::speculation_split(sale.total, purchase_total, agent_fee);
        self.record_income(
            format!(
                "Sold {} loads of {category} at {} ({} gp/load)",
                sale.loads_sold, info.name, sale.price_per_load
            ),
            split.owner_income,
        );
        self.state.crew_earnings_from_trade += split.crew_share;
        activity.trading.push(sale.note.clone());
        if let Some(agent) = agent {
            activity.trading.push(format!(
                "Port agent took {agent_fee} gp ({}%)",
                agent.fee_pct
            ));
        }

        // The customs house assesses the sold cargo at base value.
        let cargo_value = i64::from(category.base_value()) * i64::from(sale.loads_sold);
        let customs = {
            let trader = make_trader(&self.state.config, agent);
            market::assess_customs(
                &mut self.dice,
                &trader,
                cargo_value,
                self.state.config.automate_trading,
            )
        };
        if customs.tax > 0 {
            self.record_expense(
                format!("Customs at {}: {}", info.name, customs.note),
                customs.tax,
                ExpenseKind::Taxes,
            );
        }
        activity.trading.push(customs.note.clone());

        self.state.cargo.remove(loads);
        self.state.distance_since_purchase = 0;
    }

    fn load_consignment(&mut self, activity: &mut PortActivity) {
        let size_mod = geography::port(&self.state.leg_ports[0])
            .map(|info| info.size.market_modifier())
            .unwrap_or(0);
        let roll = (self.dice.dice(3, 6) + size_mod).clamp(3, 20);
        let category = CargoCategory::from_determination_roll(roll);
        let loads = self.state.ship.cargo_capacity;
        let route_distance: i32 = self.downstream_distances(0).last().copied().unwrap_or(0);
        let total_fee = market::transport_fee(route_distance, loads);
        let upfront = total_fee / 2;

        self.state.cargo.stow(category, loads, 0, -1);
        self.state.distance_since_purchase = 0;
        self.state.consignment = Some(ConsignmentContract {
            category,
            loads,
            total_fee,
            upfront_paid: upfront,
        });
        self.record_income(
            format!("Consignment freight loaded: {loads} loads of {category}"),
            upfront,
        );
        activity.trading.push(format!(
            "Took {loads} loads of {category} on consignment; {upfront} gp up front"
        ));
    }

    fn deliver_consignment(&mut self, info: &geography::PortInfo, activity: &mut PortActivity) {
        let Some(contract) = self.state.consignment.clone() else {
            return;
        };
        let loads = self.state.cargo.loads;
        let sale = {
            let trader = make_trader(&self.state.config, None);
            market::resolve_sale(
                &mut self.dice,
                &trader,
                contract.category,
                loads,
                self.state.distance_since_purchase,
                info.size,
            )
        };

        if sale.loads_spoiled > 0 {
            self.push_event(EventDetail::CargoSpoilage {
                loads_lost: sale.loads_spoiled,
                loads_remaining: sale.loads_sold,
                note: "consignment freight spoiled in transit".to_string(),
            });
        }

        if !sale.skipped {
            let commission =
                market::consignment_commission(sale.total, self.state.config.commission_rate);
            self.state.crew_earnings_from_trade += commission;
            activity.trading.push(format!(
                "Delivered consignment: {} sold for {} gp, crew commission {commission} gp",
                sale.loads_sold, sale.total
            ));
        } else {
            activity.trading.push(sale.note.clone());
        }

        let balance_due = contract.total_fee - contract.upfront_paid;
        self.record_income(
            format!("Transport fee balance at {}", info.name),
            balance_due,
        );
        self.state.cargo.remove(loads);
        self.state.consignment = None;
    }

    // === Money plumbing ===

    fn accrue_daily_cost(&mut self) {
        let wages = i64::from((self.state.ship.monthly_wage() + 29) / 30);
        let food = i64::from((self.state.ship.total_souls() + 4) / 5);
        self.state.daily_operational_cost = wages + food;
        self.state.leg_wages_accrued += wages;
        self.state.leg_food_accrued += food;
        self.state.leg_accumulated_cost += wages + food;
    }

    fn flush_accrued(&mut self, description: &str) {
        let total = self.state.leg_accumulated_cost;
        if total == 0 {
            return;
        }
        self.state.breakdown.add(ExpenseKind::Wages, self.state.leg_wages_accrued);
        self.state.breakdown.add(ExpenseKind::Food, self.state.leg_food_accrued);
        self.state.treasury = self.state.ledger.record(
            self.state.date,
            format!("{description}: crew and provisions"),
            0,
            total,
        );
        self.state.leg_accumulated_cost = 0;
        self.state.leg_wages_accrued = 0;
        self.state.leg_food_accrued = 0;
    }

    fn record_expense(&mut self, description: String, amount: i64, kind: ExpenseKind) {
        if amount <= 0 {
            return;
        }
        self.state.breakdown.add(kind, amount);
        self.state.treasury = self
            .state
            .ledger
            .record(self.state.date, description, 0, amount);
    }

    fn record_income(&mut self, description: String, amount: i64) {
        if amount <= 0 {
            return;
        }
        self.state.treasury = self
            .state
            .ledger
            .record(self.state.date, description, amount, 0);
    }

    // === Day plumbing ===

    fn day_weather(&mut self) -> WeatherRecord {
        match self.weather.as_mut() {
            Some(adapter) => adapter.generate_day_weather(),
            None => {
                if !self.state.warned_missing_weather {
                    self.state.warned_missing_weather = true;
                    self.push_event(EventDetail::Warning {
                        message: "no weather adapter; using fallback weather".to_string(),
                    });
                }
                WeatherRecord::fallback(&mut self.dice)
            }
        }
    }

    fn advance_calendar(&mut self) {
        self.state.date.advance_day();
        self.state.total_days += 1;
        if let Some(calendar) = self.calendar.as_mut() {
            calendar.advance_day();
        }
    }

    fn push_event(&mut self, detail: EventDetail) {
        self.state.events.push(Event {
            date: self.state.date,
            voyage_day: self.state.total_days,
            detail,
        });
    }

    // === Endings ===

    fn finalize(&mut self) {
        self.flush_accrued("Final port stay");
        self.state.phase = VoyagePhase::Final;
        self.state.finished = true;
        self.state.in_port = true;
        self.state.at_sea = false;
        debug_assert!(self.state.ledger.reconciles());
        self.notifier.info(&format!(
            "{} completes the {}: {} days, {} miles, {:+} gp",
            self.state.ship.name,
            self.state.route.name,
            self.state.total_days,
            self.state.total_distance,
            self.state.treasury - self.state.starting_capital,
        ));
    }

    /// The failure notice posted when the hull gives out.
    pub fn failure_summary(&self) -> String {
        format!(
            "The {} was lost at sea on {} after {} days; {} gp went down with her",
            self.state.ship.name, self.state.date, self.state.total_days, self.state.treasury
        )
    }

    /// Build the structured report for a finished voyage.
    pub fn build_report(&self) -> VoyageReport {
        let state = &self.state;
        VoyageReport {
            voyage_id: state.id.clone(),
            ship_name: state.ship.name.clone(),
            ship_type: state.ship.ship_type.clone(),
            route_name: state.route.name.clone(),
            captain: state.config.captain.name.clone(),
            lieutenant: state.config.lieutenant.as_ref().map(|lt| lt.name.clone()),
            start_date: state.config.start_date,
            end_date: state.date,
            total_days: state.total_days,
            total_distance: state.total_distance,
            final_hull: state.ship.hull.value,
            hull_max: state.ship.hull.max,
            starting_capital: state.starting_capital,
            treasury: state.treasury,
            revenue_total: state.revenue_total(),
            expense_total: state.expense_total(),
            crew_earnings_from_trade: state.crew_earnings_from_trade,
            breakdown: state.breakdown,
            ports_visited: state.ports_visited.clone(),
            port_activities: state.port_activities.clone(),
            repair_log: state.repair_log.clone(),
            passenger_manifest: state.passenger_manifest.clone(),
            ledger: state.ledger.entries().to_vec(),
            events: state.events.clone(),
            succeeded: state.phase == VoyagePhase::Final,
        }
    }
}

/// Build the trader for a transaction from the configuration and an
/// optional contracted agent. Free-standing so the borrow of the
/// configuration stays disjoint from the engine's dice.
fn make_trader(config: &VoyageConfig, agent: Option<PortAgent>) -> Trader<'_> {
    match agent {
        Some(agent) => Trader::Agent(agent),
        None => Trader::Captain {
            captain: &config.captain,
            lieutenant: config.lieutenant.as_ref(),
            crew_quality: config.crew_quality,
        },
    }
}
