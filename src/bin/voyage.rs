//! # Voyage Runner
//!
//! Command-line driver for an automated voyage: build a configuration
//! from the arguments, run the engine to completion, and print the
//! report. Usage:
//!
//! ```text
//! voyage [ship_id] [route_id] [starting_gold] [seed]
//! ```

use voyagesim::adapters::MemoryStore;
use voyagesim::config::VoyageConfig;
use voyagesim::officer::{Abilities, Officer};
use voyagesim::skills::Skill;
use voyagesim::voyage::VoyageEngine;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let ship_id = args.next().unwrap_or_else(|| "caravel".to_string());
    let route_id = args.next().unwrap_or_else(|| "spice-circuit".to_string());
    let starting_gold = args
        .next()
        .and_then(|arg| arg.parse::<i64>().ok())
        .unwrap_or(20_000);
    let seed = args.next().and_then(|arg| arg.parse::<u64>().ok());

    let abilities = Abilities {
        strength: 12,
        dexterity: 13,
        constitution: 12,
        intelligence: 13,
        wisdom: 16,
        charisma: 14,
    };
    let config = VoyageConfig {
        ship_id,
        route_id,
        starting_gold,
        captain: Officer::new("Aldra Venn", abilities).with_skills([
            Skill::Piloting,
            Skill::Bargaining,
            Skill::Appraisal,
            Skill::Trade,
            Skill::Seamanship,
        ]),
        enable_rowing: true,
        ..Default::default()
    };

    let mut engine = match VoyageEngine::new(config, seed) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("bad voyage configuration: {e}");
            std::process::exit(1);
        }
    };

    let mut store = MemoryStore::new();
    match engine.run_to_completion(Some(&mut store)) {
        Some(report) => print!("{report}"),
        None => eprintln!("{}", engine.failure_summary()),
    }
}
