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

use super::guidance::Thruster;
use super::{Dynamics, DynamicsAsteroidSnafu, DynamicsError};
use crate::cosmic::{Asteroid, SpacecraftState};
use crate::linalg::{Const, OVector, Vector3};
use crate::utils::tilde_matrix;
use snafu::ResultExt;
use std::fmt;
use std::sync::Arc;

/// Translational dynamics of a spacecraft in the body-fixed (rotating) frame of an asteroid.
///
/// The state vector is the position, the velocity relative to the rotating frame and the mass. The acceleration is
/// a = p + g(r) + T/m - 2ω×v - ω̇×r - ω×(ω×r)
/// where p is an external perturbation, g the gravity of the asteroid and T the thrust. The last three terms are
/// the Coriolis, Euler and centrifugal accelerations of the rotating frame.
/// The thrust and perturbation are constant over an instance of these dynamics, i.e. over a control interval.
#[allow(non_snake_case)]
#[derive(Clone, Debug)]
pub struct HoveringDynamics {
    pub asteroid: Arc<Asteroid>,
    pub thruster: Thruster,
    /// Thrust in Newtons, in the body-fixed frame
    pub thrust_N: Vector3<f64>,
    /// Perturbing acceleration in m/s², in the body-fixed frame
    pub perturbation_m_s2: Vector3<f64>,
    /// Relative error on the Isp of the thruster
    pub isp_error: f64,
    /// Set to true to decrement the mass when thrusting
    pub fuel_usage: bool,
    /// The dynamics fail if the mass reaches this value
    pub minimum_mass_kg: f64,
}

#[allow(non_snake_case)]
impl HoveringDynamics {
    /// Initializes drifting dynamics (no thrust, no perturbation) with fuel usage enabled.
    pub fn new(asteroid: Arc<Asteroid>, thruster: Thruster) -> Self {
        Self {
            asteroid,
            thruster,
            thrust_N: Vector3::zeros(),
            perturbation_m_s2: Vector3::zeros(),
            isp_error: 0.0,
            fuel_usage: true,
            minimum_mass_kg: 0.0,
        }
    }

    pub fn with_thrust(mut self, thrust_N: Vector3<f64>) -> Self {
        self.thrust_N = thrust_N;
        self
    }

    pub fn with_perturbation(mut self, perturbation_m_s2: Vector3<f64>) -> Self {
        self.perturbation_m_s2 = perturbation_m_s2;
        self
    }

    pub fn with_isp_error(mut self, isp_error: f64) -> Self {
        self.isp_error = isp_error;
        self
    }

    pub fn with_fuel_usage(mut self, fuel_usage: bool) -> Self {
        self.fuel_usage = fuel_usage;
        self
    }

    pub fn with_minimum_mass(mut self, minimum_mass_kg: f64) -> Self {
        self.minimum_mass_kg = minimum_mass_kg;
        self
    }

    /// Acceleration relative to the rotating frame at the provided time (s) and state.
    pub fn acceleration(
        &self,
        time: f64,
        position: &Vector3<f64>,
        velocity: &Vector3<f64>,
        mass_kg: f64,
    ) -> Result<Vector3<f64>, DynamicsError> {
        let (omega, omega_dot) = self
            .asteroid
            .angular_velocity_and_acceleration_at_time(time)
            .context(DynamicsAsteroidSnafu)?;
        let gravity = self
            .asteroid
            .gravity_at_position(position)
            .context(DynamicsAsteroidSnafu)?;

        let omega_tilde = tilde_matrix(&omega);
        let coriolis = 2.0 * omega_tilde * velocity;
        let euler = tilde_matrix(&omega_dot) * position;
        let centrifugal = omega_tilde * omega_tilde * position;

        Ok(self.perturbation_m_s2 + gravity + self.thrust_N / mass_kg
            - coriolis
            - euler
            - centrifugal)
    }

    /// Mass rate in kg/s (negative or null).
    pub fn mass_rate(&self) -> f64 {
        if self.fuel_usage {
            -self.thruster.mass_flow_kg_s(&self.thrust_N, self.isp_error)
        } else {
            0.0
        }
    }
}

impl fmt::Display for HoveringDynamics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hovering about {} with thrust [{}, {}, {}] N",
            self.asteroid, self.thrust_N.x, self.thrust_N.y, self.thrust_N.z
        )
    }
}

impl Dynamics for HoveringDynamics {
    type StateType = SpacecraftState;

    fn eom(
        &self,
        delta_t: f64,
        state_vec: &OVector<f64, Const<7>>,
        state_ctx: &SpacecraftState,
    ) -> Result<OVector<f64, Const<7>>, DynamicsError> {
        let position = state_vec.fixed_rows::<3>(0).into_owned();
        let velocity = state_vec.fixed_rows::<3>(3).into_owned();
        let mass_kg = state_vec[6];

        if mass_kg <= self.minimum_mass_kg {
            return Err(DynamicsError::FuelExhausted {
                mass_kg,
                minimum_mass_kg: self.minimum_mass_kg,
            });
        }

        let time = state_ctx.elapsed.to_seconds() + delta_t;
        let acceleration = self.acceleration(time, &position, &velocity, mass_kg)?;

        let mut d_x = OVector::<f64, Const<7>>::zeros();
        d_x.fixed_rows_mut::<3>(0).copy_from(&velocity);
        d_x.fixed_rows_mut::<3>(3).copy_from(&acceleration);
        d_x[6] = self.mass_rate();
        Ok(d_x)
    }

    fn finally(&self, next_state: SpacecraftState) -> Result<SpacecraftState, DynamicsError> {
        if !next_state.is_finite() {
            return Err(DynamicsError::NonFiniteState {
                action: "integrating the hovering dynamics",
            });
        }
        if next_state.mass_kg <= self.minimum_mass_kg {
            return Err(DynamicsError::FuelExhausted {
                mass_kg: next_state.mass_kg,
                minimum_mass_kg: self.minimum_mass_kg,
            });
        }
        Ok(next_state)
    }
}
