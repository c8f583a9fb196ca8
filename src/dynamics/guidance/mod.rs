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

use crate::cosmic::{SpacecraftState, STD_GRAVITY};
use crate::linalg::Vector3;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Defines a thruster with a maximum isp and a maximum thrust.
///
/// The hovering spacecraft carries one such thruster pair per body axis, so the maximum thrust applies per axis.
#[allow(non_snake_case)]
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thruster {
    /// The thrust is to be provided in Newtons
    pub thrust_N: f64,
    /// The Isp is to be provided in seconds
    pub isp_s: f64,
}

#[allow(non_snake_case)]
impl Thruster {
    /// Returns the exhaust velocity v_e in meters per second
    pub fn exhaust_velocity_m_s(&self) -> f64 {
        self.isp_s * STD_GRAVITY
    }

    /// Clamps each component of the requested thrust to the capability of the thruster.
    pub fn clamp(&self, thrust_N: &Vector3<f64>) -> Vector3<f64> {
        thrust_N.map(|t| t.clamp(-self.thrust_N, self.thrust_N))
    }

    /// Mass flow rate (kg/s, positive) when delivering the provided thrust, with a relative error on the Isp.
    pub fn mass_flow_kg_s(&self, thrust_N: &Vector3<f64>, isp_error: f64) -> f64 {
        thrust_N.norm() / (self.exhaust_velocity_m_s() * (1.0 + isp_error))
    }
}

impl Default for Thruster {
    /// A 21 N thruster with an Isp of 200 s.
    fn default() -> Self {
        Self {
            thrust_N: 21.0,
            isp_s: 200.0,
        }
    }
}

/// The `Controller` trait computes the thrust to apply over the next control interval.
pub trait Controller: fmt::Display + Send {
    /// Returns the requested thrust in Newtons, in the body-fixed frame of the asteroid.
    fn thrust(&mut self, state: &SpacecraftState) -> Vector3<f64>;
}

/// No thrust at all, the spacecraft drifts in the gravity field.
#[derive(Copy, Clone, Debug, Default)]
pub struct Drift;

impl Controller for Drift {
    fn thrust(&mut self, _state: &SpacecraftState) -> Vector3<f64> {
        Vector3::zeros()
    }
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drift")
    }
}

/// A constant thrust vector, in Newtons.
#[allow(non_snake_case)]
#[derive(Copy, Clone, Debug)]
pub struct ConstantThrust {
    pub thrust_N: Vector3<f64>,
}

#[allow(non_snake_case)]
impl ConstantThrust {
    pub fn new(thrust_N: Vector3<f64>) -> Self {
        Self { thrust_N }
    }
}

impl Controller for ConstantThrust {
    fn thrust(&mut self, _state: &SpacecraftState) -> Vector3<f64> {
        self.thrust_N
    }
}

impl fmt::Display for ConstantThrust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "constant thrust [{}, {}, {}] N",
            self.thrust_N.x, self.thrust_N.y, self.thrust_N.z
        )
    }
}
