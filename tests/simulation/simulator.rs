use crate::hover::cosmic::STD_GRAVITY;
use crate::hover::dynamics::{ConstantThrust, Drift, DynamicsError, Thruster};
use crate::hover::md::{Simulator, SimulatorConfig};
use crate::hover::propagators::PropagationError;
use crate::hover::time::{Duration, Unit};
use crate::hover::{Asteroid, HoverError, SpacecraftState};
use crate::na::Vector3;
use rstest::*;
use std::sync::Arc;

#[fixture]
fn asteroid() -> Arc<Asteroid> {
    Arc::new(crate::elongated_asteroid())
}

fn hovering_start(asteroid: &Asteroid) -> SpacecraftState {
    let position = Vector3::new(6000.0, 500.0, 500.0);
    let velocity = Simulator::hovering_velocity(asteroid, &position).unwrap();
    SpacecraftState::new(position, velocity, 450.0)
}

#[rstest]
fn drift_history(asteroid: Arc<Asteroid>) {
    let _ = pel::try_init();
    let initial = hovering_start(&asteroid);
    let mut sim = Simulator::new(asteroid, SimulatorConfig::default()).unwrap();

    let result = sim.run(initial, 10 * Unit::Second, &mut Drift).unwrap();
    assert_eq!(result.len(), 101);
    assert_eq!(result.times[0], Duration::ZERO);
    assert_eq!(result.times[100], 10 * Unit::Second);
    for (k, epoch) in result.times.iter().enumerate() {
        assert_eq!(*epoch, (k as i64) * 100 * Unit::Millisecond);
    }
    assert!(result.masses.iter().all(|m| *m == 450.0));
    assert_eq!(result.fuel_used_kg(), 0.0);

    let last = result.final_state().unwrap();
    assert_eq!(last.elapsed, 10 * Unit::Second);
    assert_eq!(last.position, result.positions[100]);
    // Started about 2 km above the surface and barely moved
    let min_height = result.min_height_m().unwrap();
    assert!(min_height > 1500.0 && min_height < 2200.0, "{min_height}");
}

#[rstest]
fn partial_intervals_are_dropped(asteroid: Arc<Asteroid>) {
    let initial = hovering_start(&asteroid);
    let mut sim = Simulator::new(asteroid, SimulatorConfig::default()).unwrap();
    let result = sim.run(initial, 1050 * Unit::Millisecond, &mut Drift).unwrap();
    assert_eq!(result.len(), 11);
    assert_eq!(result.times[10], 1 * Unit::Second);

    let result = sim.run(initial, Duration::ZERO, &mut Drift).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.final_state(), Some(initial));

    assert!(matches!(
        sim.run(initial, -1 * Unit::Second, &mut Drift),
        Err(HoverError::InvalidSimulator { .. })
    ));
}

#[rstest]
fn seeded_runs_are_reproducible(asteroid: Arc<Asteroid>) {
    let initial = hovering_start(&asteroid);
    let config = SimulatorConfig::builder().perturbation_noise(1e-4).seed(7).build();
    let mut controller = ConstantThrust::new(Vector3::new(1.0, 0.0, 0.0));

    let first = Simulator::new(asteroid.clone(), config)
        .unwrap()
        .run(initial, 5 * Unit::Second, &mut controller)
        .unwrap();
    let second = Simulator::new(asteroid.clone(), config)
        .unwrap()
        .run(initial, 5 * Unit::Second, &mut controller)
        .unwrap();
    assert_eq!(first, second);

    let config = SimulatorConfig::builder().perturbation_noise(1e-4).seed(8).build();
    let third = Simulator::new(asteroid, config)
        .unwrap()
        .run(initial, 5 * Unit::Second, &mut controller)
        .unwrap();
    assert_ne!(first.positions, third.positions);
    assert_ne!(first.masses, third.masses);
}

#[rstest]
fn fuel_consumption(asteroid: Arc<Asteroid>) {
    let initial = hovering_start(&asteroid);
    let thruster = Thruster {
        thrust_N: 5.0,
        isp_s: 300.0,
    };
    let nominal_rate = 5.0 / (300.0 * STD_GRAVITY);

    // Without engine noise, the requested thrust is clamped to 5 N on x and the mass decreases linearly
    let config = SimulatorConfig::builder().thruster(thruster).engine_noise(0.0).build();
    let mut sim = Simulator::new(asteroid.clone(), config).unwrap();
    let mut controller = ConstantThrust::new(Vector3::new(20.0, 0.0, 0.0));
    let result = sim.run(initial, 10 * Unit::Second, &mut controller).unwrap();
    assert!((result.fuel_used_kg() - nominal_rate * 10.0).abs() < 1e-9);
    for (k, mass) in result.masses.iter().enumerate() {
        assert!((initial.mass_kg - mass - nominal_rate * 0.1 * k as f64).abs() < 1e-9);
    }

    // With engine noise, the consumption varies around the nominal value
    let config = SimulatorConfig::builder().thruster(thruster).seed(3).build();
    let mut sim = Simulator::new(asteroid.clone(), config).unwrap();
    let noisy = sim.run(initial, 10 * Unit::Second, &mut controller).unwrap();
    assert_ne!(noisy.fuel_used_kg(), result.fuel_used_kg());
    assert!((noisy.fuel_used_kg() / result.fuel_used_kg() - 1.0).abs() < 0.1);

    // No fuel usage
    let config = SimulatorConfig::builder().thruster(thruster).fuel_usage(false).build();
    let mut sim = Simulator::new(asteroid, config).unwrap();
    let free = sim.run(initial, 10 * Unit::Second, &mut controller).unwrap();
    assert_eq!(free.fuel_used_kg(), 0.0);
}

#[rstest]
fn aborts_on_depletion(asteroid: Arc<Asteroid>) {
    let initial = hovering_start(&asteroid);
    let config = SimulatorConfig::builder().minimum_mass_kg(449.95).build();
    let mut sim = Simulator::new(asteroid, config).unwrap();
    let mut controller = ConstantThrust::new(Vector3::new(21.0, 21.0, 21.0));

    match sim.run(initial, 1 * Unit::Minute, &mut controller) {
        Err(HoverError::Propagation { source, state }) => {
            assert!(matches!(
                source,
                PropagationError::Dynamics {
                    source: DynamicsError::FuelExhausted { .. }
                }
            ));
            // The state the failing interval started from
            assert!(state.mass_kg > 449.95);
            assert!(state.elapsed > Duration::ZERO && state.elapsed < 1 * Unit::Minute);
        }
        other => panic!("expected a fuel exhaustion, got {other:?}"),
    }
}

#[rstest]
fn aborts_on_crash(asteroid: Arc<Asteroid>) {
    let initial = SpacecraftState::new(Vector3::new(0.0, 0.0, 1050.0), Vector3::new(0.0, 0.0, -30.0), 450.0);
    let mut sim = Simulator::new(asteroid, SimulatorConfig::default()).unwrap();
    let err = sim.run(initial, 1 * Unit::Minute, &mut Drift).unwrap_err();
    assert!(matches!(
        err,
        HoverError::Propagation {
            source: PropagationError::Dynamics {
                source: DynamicsError::DynamicsAsteroid { .. }
            },
            ..
        }
    ));
}
