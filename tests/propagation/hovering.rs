use crate::hover::cosmic::STD_GRAVITY;
use crate::hover::dynamics::{DynamicsError, HoveringDynamics, Thruster};
use crate::hover::md::Simulator;
use crate::hover::propagators::{PropagationError, Propagator};
use crate::hover::time::{Duration, Unit};
use crate::hover::{Asteroid, SpacecraftState};
use crate::na::Vector3;
use rstest::*;
use std::sync::Arc;

#[fixture]
fn asteroid() -> Arc<Asteroid> {
    Arc::new(crate::elongated_asteroid())
}

/// At rest in the inertial frame, 2 km above the tip of the long axis.
fn initial_state(asteroid: &Asteroid) -> SpacecraftState {
    let position = Vector3::new(6000.0, 500.0, 500.0);
    let velocity = Simulator::hovering_velocity(asteroid, &position).unwrap();
    SpacecraftState::new(position, velocity, 450.0)
}

#[rstest]
fn integrators_agree(asteroid: Arc<Asteroid>) {
    let _ = pel::try_init();
    let initial = initial_state(&asteroid);
    let dynamics = HoveringDynamics::new(asteroid.clone(), Thruster::default());

    let ck = Propagator::default(dynamics.clone())
        .with(initial)
        .for_duration(1 * Unit::Minute)
        .unwrap();
    let dp = Propagator::default_dp45(dynamics.clone())
        .with(initial)
        .for_duration(1 * Unit::Minute)
        .unwrap();
    let rk4 = Propagator::rk4_fixed(dynamics, 500 * Unit::Millisecond)
        .with(initial)
        .for_duration(1 * Unit::Minute)
        .unwrap();

    for other in [dp, rk4] {
        assert_eq!(other.elapsed, ck.elapsed);
        assert!((other.position - ck.position).norm() < 1e-4, "{other} vs {ck}");
        assert!((other.velocity - ck.velocity).norm() < 1e-6, "{other} vs {ck}");
    }
    // Drifting does not consume fuel
    assert_eq!(ck.mass_kg, initial.mass_kg);
    // The spacecraft falls towards the asteroid
    assert!(ck.position.norm() < initial.position.norm());
}

#[rstest]
fn forward_then_backward(asteroid: Arc<Asteroid>) {
    let initial = initial_state(&asteroid);
    let prop = Propagator::default(HoveringDynamics::new(asteroid, Thruster::default()));
    let mut instance = prop.with(initial);

    let forward = instance.for_duration(2 * Unit::Minute).unwrap();
    assert_eq!(forward.elapsed, 2 * Unit::Minute);
    let back = instance.for_duration(-2 * Unit::Minute).unwrap();
    assert_eq!(back.elapsed, Duration::ZERO);
    assert!((back.position - initial.position).norm() < 1e-6, "{back} vs {initial}");
    assert!((back.velocity - initial.velocity).norm() < 1e-8, "{back} vs {initial}");
}

#[rstest]
fn until_elapsed_is_exact(asteroid: Arc<Asteroid>) {
    let initial = initial_state(&asteroid);
    let prop = Propagator::default(HoveringDynamics::new(asteroid, Thruster::default()));
    let mut instance = prop.with(initial);

    let first = instance.until_elapsed(30 * Unit::Second).unwrap();
    assert_eq!(first.elapsed, 30 * Unit::Second);
    let second = instance.until_elapsed(90 * Unit::Second).unwrap();
    assert_eq!(second.elapsed, 90 * Unit::Second);

    // Same as going there in one go
    let direct = prop.with(initial).for_duration(90 * Unit::Second).unwrap();
    assert!((direct.position - second.position).norm() < 1e-6);
}

#[rstest]
fn constant_thrust_fuel(asteroid: Arc<Asteroid>) {
    let initial = initial_state(&asteroid);
    let thrust = Vector3::new(10.0, 0.0, 0.0);
    let dynamics = HoveringDynamics::new(asteroid.clone(), Thruster::default()).with_thrust(thrust);
    let drift = HoveringDynamics::new(asteroid, Thruster::default());

    let thrusting = Propagator::default(dynamics).with(initial).for_duration(1 * Unit::Minute).unwrap();
    let drifting = Propagator::default(drift).with(initial).for_duration(1 * Unit::Minute).unwrap();

    let expected_fuel = 10.0 / (200.0 * STD_GRAVITY) * 60.0;
    assert!((initial.mass_kg - thrusting.mass_kg - expected_fuel).abs() < 1e-9);
    // Pushed outward along x compared to drifting
    assert!(thrusting.position.x > drifting.position.x);

    // Without fuel usage the mass is constant
    let no_fuel = HoveringDynamics::new(Arc::new(crate::elongated_asteroid()), Thruster::default())
        .with_thrust(thrust)
        .with_fuel_usage(false);
    let state = Propagator::default(no_fuel).with(initial).for_duration(1 * Unit::Minute).unwrap();
    assert_eq!(state.mass_kg, initial.mass_kg);
    assert!((state.position - thrusting.position).norm() > 0.0);
}

#[rstest]
fn fuel_exhaustion(asteroid: Arc<Asteroid>) {
    let initial = initial_state(&asteroid);
    let dynamics = HoveringDynamics::new(asteroid, Thruster::default())
        .with_thrust(Vector3::new(0.0, 0.0, 21.0))
        .with_minimum_mass(449.99);
    let err = Propagator::default(dynamics)
        .with(initial)
        .for_duration(1 * Unit::Minute)
        .unwrap_err();
    assert!(matches!(
        err,
        PropagationError::Dynamics {
            source: DynamicsError::FuelExhausted { .. }
        }
    ));
}

#[rstest]
fn crash(asteroid: Arc<Asteroid>) {
    let initial = SpacecraftState::new(Vector3::new(4100.0, 0.0, 0.0), Vector3::new(-50.0, 0.0, 0.0), 450.0);
    let err = Propagator::default(HoveringDynamics::new(asteroid, Thruster::default()))
        .with(initial)
        .for_duration(1 * Unit::Minute)
        .unwrap_err();
    assert!(matches!(
        err,
        PropagationError::Dynamics {
            source: DynamicsError::DynamicsAsteroid { .. }
        }
    ));
}

#[rstest]
fn zero_step_is_rejected(asteroid: Arc<Asteroid>) {
    let initial = initial_state(&asteroid);
    let prop = Propagator::default(HoveringDynamics::new(asteroid, Thruster::default()));
    let mut instance = prop.with(initial);
    instance.set_step(Duration::ZERO, true);
    assert!(matches!(
        instance.for_duration(1 * Unit::Second),
        Err(PropagationError::InvalidStep { .. })
    ));
    // Nothing to do for a null duration
    assert_eq!(instance.for_duration(Duration::ZERO).unwrap(), initial);
}
