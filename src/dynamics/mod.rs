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

use crate::cosmic::AsteroidError;
use crate::linalg::allocator::Allocator;
use crate::linalg::{DefaultAllocator, OVector};
use crate::State;
use snafu::Snafu;

/// Translational dynamics of a spacecraft hovering in the rotating frame of an asteroid.
pub mod hovering;
pub use self::hovering::HoveringDynamics;

/// Torque-free rotational dynamics, integrated numerically.
pub mod momentum;
pub use self::momentum::{AngularVelocityState, EulerRotation};

/// Thrusters and the controllers driving them.
pub mod guidance;
pub use self::guidance::{ConstantThrust, Controller, Drift, Thruster};

/// A trait for models with equations of motion that can be integrated.
///
/// This trait is designed for composition: the propagator only relies on the state vector and on a state context
/// to rebuild the state from that vector.
pub trait Dynamics: Clone + Sync + Send
where
    DefaultAllocator: Allocator<<Self::StateType as State>::Size>,
{
    type StateType: State;

    /// Defines the equations of motion.
    ///
    /// - `delta_t`: Time in seconds past the context's elapsed time.
    /// - `state_vec`: The state vector, which changes at each integration step.
    /// - `state_ctx`: The state context, used to rebuild the state from the state vector.
    fn eom(
        &self,
        delta_t: f64,
        state_vec: &OVector<f64, <Self::StateType as State>::Size>,
        state_ctx: &Self::StateType,
    ) -> Result<OVector<f64, <Self::StateType as State>::Size>, DynamicsError>;

    /// Performs final changes after each successful integration step.
    ///
    /// Also called before the first integration step to update the initial state if needed.
    fn finally(&self, next_state: Self::StateType) -> Result<Self::StateType, DynamicsError> {
        Ok(next_state)
    }
}

/// Dynamical model errors.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DynamicsError {
    /// The spacecraft mass reached the minimum (dry) mass.
    #[snafu(display("fuel exhausted: mass is {mass_kg} kg but the dry mass is {minimum_mass_kg} kg"))]
    FuelExhausted { mass_kg: f64, minimum_mass_kg: f64 },
    /// Asteroid model error.
    #[snafu(display("dynamical model encountered an asteroid error: {source}"))]
    DynamicsAsteroid { source: AsteroidError },
    /// The integrated state is no longer finite.
    #[snafu(display("non-finite state when {action}"))]
    NonFiniteState { action: &'static str },
}
