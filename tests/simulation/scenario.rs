use crate::hover::cosmic::AsteroidError;
use crate::hover::io::{ConfigError, ConfigRepr, ScenarioSerde};
use crate::hover::md::Simulator;
use crate::hover::time::Unit;
use crate::hover::HoverError;
use crate::na::Vector3;
use std::path::PathBuf;

fn demo_scenario() -> ScenarioSerde {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "demos", "hover", "scenario.yaml"]
        .iter()
        .collect();
    ScenarioSerde::load(path).unwrap()
}

#[test]
fn load_demo_scenario() {
    let _ = pel::try_init();
    let scenario = demo_scenario();
    assert_eq!(scenario.duration, 10 * Unit::Minute);
    assert_eq!(scenario.simulator.seed, 2024);

    let (sim, initial) = Simulator::from_scenario(&scenario).unwrap();
    assert_eq!(sim.asteroid().semi_axes(), Vector3::new(4000.0, 2000.0, 1000.0));
    assert_eq!(sim.config().minimum_mass_kg, 300.0);
    assert_eq!(sim.control_interval(), 100 * Unit::Millisecond);
    assert_eq!(initial.position, Vector3::new(6000.0, 500.0, 500.0));
    assert_eq!(initial.mass_kg, 450.0);
    // No velocity provided: at rest in the inertial frame
    let omega = sim.asteroid().angular_velocity_at_time(0.0).unwrap();
    assert!((initial.velocity + omega.cross(&initial.position)).norm() < 1e-15);
}

#[test]
fn sampled_start() {
    let mut scenario = demo_scenario();
    scenario.spacecraft.position_m = None;
    scenario.spacecraft.velocity_m_s = Some([0.1, 0.2, 0.3]);

    let (sim, initial) = Simulator::from_scenario(&scenario).unwrap();
    let axes = sim.asteroid().semi_axes();
    let level = initial.position.component_div(&axes).norm_squared();
    assert!((1.0..=1.5 * 1.5 + 1e-12).contains(&level), "{initial} is not in the band");
    assert_eq!(initial.velocity, Vector3::new(0.1, 0.2, 0.3));

    // The sampled start only depends on the seed
    let (_, again) = Simulator::from_scenario(&scenario).unwrap();
    assert_eq!(again, initial);
    scenario.simulator.seed += 1;
    let (_, other) = Simulator::from_scenario(&scenario).unwrap();
    assert_ne!(other.position, initial.position);
}

#[test]
fn invalid_scenarios() {
    let mut scenario = demo_scenario();
    scenario.spacecraft.mass_kg = 250.0;
    assert!(matches!(
        Simulator::from_scenario(&scenario),
        Err(HoverError::InvalidSimulator { .. })
    ));

    let mut scenario = demo_scenario();
    scenario.spacecraft.position_m = None;
    scenario.spacecraft.band_scale = 0.9;
    assert!(matches!(
        Simulator::from_scenario(&scenario),
        Err(HoverError::MonteCarlo { .. })
    ));

    let mut scenario = demo_scenario();
    scenario.asteroid.angular_velocity_rad_s = [2.9565e-4, 0.0, 0.0];
    assert!(matches!(
        Simulator::from_scenario(&scenario),
        Err(HoverError::Config {
            source: ConfigError::InvalidAsteroid(AsteroidError::InvalidConfiguration { .. })
        })
    ));
}

#[test]
fn scenarios_from_yaml_documents() {
    let yaml = r#"
asteroid:
  parameterization: by_inertia
  inertia_kg_m2: [2.0e15, 3.0e15, 4.0e15]
  density_kg_m3: 2500.0
  angular_velocity_rad_s: [1.0e-4, 0.0, 5.0e-4]
spacecraft:
  position_m: [0.0, 0.0, 3000.0]
  mass_kg: 500.0
duration: 30 s
---
asteroid:
  parameterization: by_axes
  semi_axes_m: [1000.0, 2000.0, 4000.0]
  density_kg_m3: 2000.0
  angular_velocity_rad_s: [1.0e-5, 0.0, 2.9565e-4]
spacecraft:
  mass_kg: 500.0
  band_scale: 2.0
simulator:
  control_frequency_hz: 1.0
duration: 1 h
"#;
    let scenarios = ScenarioSerde::loads_many(yaml).unwrap();
    assert_eq!(scenarios.len(), 2);
    assert_eq!(scenarios[0].duration, 30 * Unit::Second);
    assert_eq!(scenarios[1].duration, 1 * Unit::Hour);
    for scenario in &scenarios {
        let (sim, initial) = Simulator::from_scenario(scenario).unwrap();
        assert!(sim.asteroid().height_at_position(&initial.position).is_ok());
    }
    let (sim, _) = Simulator::from_scenario(&scenarios[1]).unwrap();
    assert_eq!(sim.control_interval(), 1 * Unit::Second);
}
