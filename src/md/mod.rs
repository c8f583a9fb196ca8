/*
    asteroid-hover, rotating asteroid dynamics and hovering simulation
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use crate::cosmic::{Asteroid, SpacecraftState};
use crate::dynamics::{Controller, HoveringDynamics, Thruster};
use crate::errors::{
    AsteroidSnafu, ConfigSnafu, HoverError, InvalidSimulatorSnafu, MonteCarloSnafu, PropagationSnafu,
};
use crate::io::{Configurable, ScenarioSerde, SimulatorSerde};
use crate::linalg::Vector3;
use crate::mc::helpers::sample_point_outside_ellipsoid;
use crate::mc::{NoiseModel, Pcg64Mcg};
use crate::propagators::{CashKarp45, PropOpts, Propagator, RSSCartesianStep};
use crate::time::{Duration, Unit};
use rand::SeedableRng;
use snafu::prelude::*;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Settings of the hovering simulator.
#[derive(Copy, Clone, Debug, TypedBuilder)]
#[builder(doc)]
pub struct SimulatorConfig {
    /// Number of control intervals per second. Thrust and perturbation are constant over each interval.
    #[builder(default = 10.0)]
    pub control_frequency_hz: f64,
    /// Standard deviation of the perturbing acceleration, per axis, in m/s²
    #[builder(default = 1e-7)]
    pub perturbation_noise: f64,
    /// Standard deviation of the relative error on the specific impulse
    #[builder(default = 0.05)]
    pub engine_noise: f64,
    #[builder(default)]
    pub thruster: Thruster,
    /// Set to false to keep the mass constant
    #[builder(default = true)]
    pub fuel_usage: bool,
    #[builder(default = 0.0)]
    pub minimum_mass_kg: f64,
    /// Seed of the pseudo random generator of the noises
    #[builder(default = 0)]
    pub seed: u64,
    #[builder(default)]
    pub prop_opts: PropOpts<RSSCartesianStep>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl From<&SimulatorSerde> for SimulatorConfig {
    fn from(cfg: &SimulatorSerde) -> Self {
        Self {
            control_frequency_hz: cfg.control_frequency_hz,
            perturbation_noise: cfg.perturbation_noise,
            engine_noise: cfg.engine_noise,
            thruster: cfg.thruster,
            fuel_usage: cfg.fuel_usage,
            minimum_mass_kg: cfg.minimum_mass_kg,
            seed: cfg.seed,
            prop_opts: PropOpts::with_tolerance(cfg.tolerance),
        }
    }
}

/// History of a simulation, one entry per control interval boundary, initial state included.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationResult {
    pub times: Vec<Duration>,
    pub positions: Vec<Vector3<f64>>,
    pub velocities: Vec<Vector3<f64>>,
    pub masses: Vec<f64>,
    /// Vector from the nearest surface point to the spacecraft
    pub heights: Vec<Vector3<f64>>,
}

impl SimulationResult {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
            velocities: Vec::with_capacity(capacity),
            masses: Vec::with_capacity(capacity),
            heights: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, state: &SpacecraftState, height: Vector3<f64>) {
        self.times.push(state.elapsed);
        self.positions.push(state.position);
        self.velocities.push(state.velocity);
        self.masses.push(state.mass_kg);
        self.heights.push(height);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Last recorded state, if any.
    pub fn final_state(&self) -> Option<SpacecraftState> {
        let idx = self.len().checked_sub(1)?;
        Some(
            SpacecraftState::new(self.positions[idx], self.velocities[idx], self.masses[idx])
                .with_elapsed(self.times[idx]),
        )
    }

    /// Smallest recorded height in meters, if any.
    pub fn min_height_m(&self) -> Option<f64> {
        self.heights.iter().map(|h| h.norm()).reduce(f64::min)
    }

    /// Fuel used over the simulation, in kilograms.
    pub fn fuel_used_kg(&self) -> f64 {
        match (self.masses.first(), self.masses.last()) {
            (Some(first), Some(last)) => first - last,
            _ => 0.0,
        }
    }
}

/// Simulates a spacecraft hovering about an asteroid, one control interval at a time.
#[derive(Clone, Debug)]
pub struct Simulator {
    asteroid: Arc<Asteroid>,
    config: SimulatorConfig,
    noise: NoiseModel,
    rng: Pcg64Mcg,
}

impl Simulator {
    pub fn new(asteroid: Arc<Asteroid>, config: SimulatorConfig) -> Result<Self, HoverError> {
        ensure!(
            config.control_frequency_hz.is_finite() && config.control_frequency_hz > 0.0,
            InvalidSimulatorSnafu {
                reason: format!(
                    "control frequency must be strictly positive, got {} Hz",
                    config.control_frequency_hz
                )
            }
        );
        // Durations have a nanosecond resolution
        let interval = (1.0 / config.control_frequency_hz) * Unit::Second;
        ensure!(
            interval > Duration::ZERO,
            InvalidSimulatorSnafu {
                reason: format!(
                    "control frequency of {} Hz is too high, the control interval rounds to zero",
                    config.control_frequency_hz
                )
            }
        );
        ensure!(
            config.thruster.thrust_N >= 0.0 && config.thruster.isp_s > 0.0,
            InvalidSimulatorSnafu {
                reason: format!("invalid thruster {:?}", config.thruster)
            }
        );
        ensure!(
            config.minimum_mass_kg.is_finite() && config.minimum_mass_kg >= 0.0,
            InvalidSimulatorSnafu {
                reason: format!("invalid minimum mass {} kg", config.minimum_mass_kg)
            }
        );

        let noise =
            NoiseModel::new(config.perturbation_noise, config.engine_noise).context(MonteCarloSnafu)?;

        Ok(Self {
            asteroid,
            config,
            noise,
            rng: Pcg64Mcg::seed_from_u64(config.seed),
        })
    }

    /// Builds the simulator and the initial spacecraft state of a scenario.
    pub fn from_scenario(scenario: &ScenarioSerde) -> Result<(Self, SpacecraftState), HoverError> {
        let asteroid = Asteroid::from_config(&scenario.asteroid).context(ConfigSnafu)?;
        let mut me = Self::new(Arc::new(asteroid), SimulatorConfig::from(&scenario.simulator))?;

        let sc = &scenario.spacecraft;
        ensure!(
            sc.mass_kg.is_finite() && sc.mass_kg > me.config.minimum_mass_kg,
            InvalidSimulatorSnafu {
                reason: format!(
                    "spacecraft mass {} kg must be greater than the minimum mass {} kg",
                    sc.mass_kg, me.config.minimum_mass_kg
                )
            }
        );

        let position = match sc.position_m {
            Some(position) => Vector3::from(position),
            None => {
                let semi_axes = me.asteroid.semi_axes();
                sample_point_outside_ellipsoid(&semi_axes, sc.band_scale, &mut me.rng)
                    .context(MonteCarloSnafu)?
            }
        };
        let velocity = match sc.velocity_m_s {
            Some(velocity) => Vector3::from(velocity),
            None => Self::hovering_velocity(&me.asteroid, &position)?,
        };

        Ok((me, SpacecraftState::new(position, velocity, sc.mass_kg)))
    }

    /// Velocity in the body-fixed frame of a point at rest in the inertial frame at the start of the simulation.
    pub fn hovering_velocity(
        asteroid: &Asteroid,
        position: &Vector3<f64>,
    ) -> Result<Vector3<f64>, HoverError> {
        let omega = asteroid.angular_velocity_at_time(0.0).context(AsteroidSnafu)?;
        Ok(-omega.cross(position))
    }

    pub fn asteroid(&self) -> &Arc<Asteroid> {
        &self.asteroid
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Duration over which thrust and perturbation are held constant.
    pub fn control_interval(&self) -> Duration {
        (1.0 / self.config.control_frequency_hz) * Unit::Second
    }

    /// Integrates one control interval with the provided thrust (clamped to the thruster) and perturbing
    /// acceleration. The engine noise is sampled here.
    #[allow(non_snake_case)]
    pub fn next_state(
        &mut self,
        state: &SpacecraftState,
        thrust_N: &Vector3<f64>,
        perturbation_m_s2: &Vector3<f64>,
    ) -> Result<SpacecraftState, HoverError> {
        let thrust_N = self.config.thruster.clamp(thrust_N);
        let isp_error = self.noise.sample_isp_error(&mut self.rng);

        let dynamics = HoveringDynamics::new(self.asteroid.clone(), self.config.thruster)
            .with_thrust(thrust_N)
            .with_perturbation(*perturbation_m_s2)
            .with_isp_error(isp_error)
            .with_fuel_usage(self.config.fuel_usage)
            .with_minimum_mass(self.config.minimum_mass_kg);

        let prop = Propagator::new::<CashKarp45>(dynamics, self.config.prop_opts);
        prop.with(*state)
            .for_duration(self.control_interval())
            .context(PropagationSnafu { state: *state })
    }

    /// Runs the simulation for the provided duration, rounded down to a whole number of control intervals.
    ///
    /// The run aborts on the first error, which is returned along with the state it was propagated from.
    pub fn run<C: Controller + ?Sized>(
        &mut self,
        initial: SpacecraftState,
        duration: Duration,
        controller: &mut C,
    ) -> Result<SimulationResult, HoverError> {
        let interval = self.control_interval();
        ensure!(
            duration >= Duration::ZERO,
            InvalidSimulatorSnafu {
                reason: format!("cannot simulate a negative duration ({duration})")
            }
        );
        let iterations = (duration.total_nanoseconds() / interval.total_nanoseconds()) as usize;

        info!(
            "Simulating {iterations} control intervals of {interval} with {controller} from {initial}"
        );

        let mut result = SimulationResult::with_capacity(iterations + 1);
        result.push(&initial, self.height(&initial)?);

        let mut state = initial;
        for _ in 0..iterations {
            let thrust_N = controller.thrust(&state);
            let perturbation = self.noise.sample_perturbation(&mut self.rng);
            state = self.next_state(&state, &thrust_N, &perturbation)?;
            result.push(&state, self.height(&state)?);
        }

        info!(
            "Simulation done at {state}, used {:.3} kg of fuel",
            result.fuel_used_kg()
        );
        Ok(result)
    }

    fn height(&self, state: &SpacecraftState) -> Result<Vector3<f64>, HoverError> {
        self.asteroid
            .height_at_position(&state.position)
            .context(AsteroidSnafu)
            .map_err(|e| {
                error!("{e} at {state}");
                e
            })
    }
}
