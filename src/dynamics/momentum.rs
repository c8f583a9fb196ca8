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

use super::{Dynamics, DynamicsError};
use crate::cosmic::asteroid::euler_rates;
use crate::linalg::{Const, OVector, Vector3};
use crate::time::Duration;
use crate::State;
use std::fmt;

/// Angular velocity of a rigid body, in its principal axes frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AngularVelocityState {
    /// Angular velocity, in radians per second
    pub omega: Vector3<f64>,
    pub elapsed: Duration,
}

impl AngularVelocityState {
    pub fn new(omega: Vector3<f64>) -> Self {
        Self {
            omega,
            elapsed: Duration::ZERO,
        }
    }
}

impl State for AngularVelocityState {
    type Size = Const<3>;

    fn to_vector(&self) -> OVector<f64, Const<3>> {
        self.omega
    }

    fn set(&mut self, elapsed: Duration, vector: &OVector<f64, Const<3>>) {
        self.elapsed = elapsed;
        self.omega = *vector;
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl fmt::Display for AngularVelocityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ω = [{:e}, {:e}, {:e}] rad/s",
            self.elapsed, self.omega.x, self.omega.y, self.omega.z
        )
    }
}

/// Torque-free rotation of a rigid body, i.e. Euler's equations.
///
/// Throughout this documentation [I] refers to the inertia tensor and ω to the angular velocity.
/// This is the numerical counterpart of the analytical rotation of the `Asteroid`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EulerRotation {
    /// Principal moments of inertia
    pub inertia: Vector3<f64>,
}

impl EulerRotation {
    pub fn new(inertia: Vector3<f64>) -> Self {
        Self { inertia }
    }

    /// Returns the angular momentum of the system, i.e. [I]ω
    pub fn momentum(&self, state: &AngularVelocityState) -> Vector3<f64> {
        self.inertia.component_mul(&state.omega)
    }

    /// Returns twice the rotational kinetic energy, i.e. ω·[I]ω
    pub fn energy_mul2(&self, state: &AngularVelocityState) -> f64 {
        self.momentum(state).dot(&state.omega)
    }
}

impl Dynamics for EulerRotation {
    type StateType = AngularVelocityState;

    /// Computes the instantaneous equations of motion of the angular velocity of a tensor (i.e. the angular acceleration).
    /// [I]̲̇ω = -[̃ω][I]̲ω
    fn eom(
        &self,
        _delta_t: f64,
        state_vec: &OVector<f64, Const<3>>,
        _state_ctx: &AngularVelocityState,
    ) -> Result<OVector<f64, Const<3>>, DynamicsError> {
        Ok(euler_rates(&self.inertia, state_vec))
    }

    fn finally(&self, next_state: AngularVelocityState) -> Result<AngularVelocityState, DynamicsError> {
        if next_state.omega.iter().all(|w| w.is_finite()) {
            Ok(next_state)
        } else {
            Err(DynamicsError::NonFiniteState {
                action: "integrating Euler's equations",
            })
        }
    }
}
