extern crate asteroid_hover as hover;
extern crate log;
extern crate pretty_env_logger as pel;

use hover::dynamics::Drift;
use hover::io::{ConfigRepr, ScenarioSerde};
use hover::md::Simulator;

use std::env;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    pel::init();

    // The scenario defaults to the one next to this file, any other YAML scenario may be provided instead.
    let path = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        [env!("CARGO_MANIFEST_DIR"), "demos", "hover", "scenario.yaml"]
            .iter()
            .collect()
    });
    let scenario = ScenarioSerde::load(&path)?;

    let (mut sim, initial) = Simulator::from_scenario(&scenario)?;
    println!("{}", sim.asteroid());
    println!("start: {initial:.3}");

    // Without any thrust, the spacecraft only feels the gravity and the apparent forces of the rotating frame
    let result = sim.run(initial, scenario.duration, &mut Drift)?;

    if let Some(final_state) = result.final_state() {
        println!("end:   {final_state:.3}");
    }
    let first = result.heights.first().map(|h| h.norm()).unwrap_or(f64::NAN);
    let last = result.heights.last().map(|h| h.norm()).unwrap_or(f64::NAN);
    println!(
        "height went from {first:.1} m to {last:.1} m over {} samples (lowest {:.1} m)",
        result.len(),
        result.min_height_m().unwrap_or(f64::NAN)
    );
    println!("fuel used: {:.3} kg", result.fuel_used_kg());

    Ok(())
}
