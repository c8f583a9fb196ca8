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

use super::State;
use crate::linalg::{Const, OVector, Vector3};
use crate::time::Duration;
use std::fmt;

/// State of the hovering spacecraft, expressed in the body-fixed frame of the asteroid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SpacecraftState {
    /// Position, in meters
    pub position: Vector3<f64>,
    /// Velocity relative to the rotating frame, in meters per second
    pub velocity: Vector3<f64>,
    /// Total mass, in kilograms
    pub mass_kg: f64,
    /// Time since the start of the simulation
    pub elapsed: Duration,
}

impl SpacecraftState {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, mass_kg: f64) -> Self {
        Self {
            position,
            velocity,
            mass_kg,
            elapsed: Duration::ZERO,
        }
    }

    /// Returns a copy of this state with the provided elapsed time.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Returns whether all of the components of this state are finite.
    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|v| v.is_finite())
            && self.mass_kg.is_finite()
    }
}

impl State for SpacecraftState {
    type Size = Const<7>;

    /// Position, velocity and mass
    fn to_vector(&self) -> OVector<f64, Const<7>> {
        let mut vector = OVector::<f64, Const<7>>::zeros();
        vector.fixed_rows_mut::<3>(0).copy_from(&self.position);
        vector.fixed_rows_mut::<3>(3).copy_from(&self.velocity);
        vector[6] = self.mass_kg;
        vector
    }

    fn set(&mut self, elapsed: Duration, vector: &OVector<f64, Const<7>>) {
        self.elapsed = elapsed;
        self.position = vector.fixed_rows::<3>(0).into_owned();
        self.velocity = vector.fixed_rows::<3>(3).into_owned();
        self.mass_kg = vector[6];
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl fmt::Display for SpacecraftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(3);
        write!(
            f,
            "[{}] r = [{:.*}, {:.*}, {:.*}] m  v = [{:.*e}, {:.*e}, {:.*e}] m/s  mass = {:.*} kg",
            self.elapsed,
            prec,
            self.position.x,
            prec,
            self.position.y,
            prec,
            self.position.z,
            prec,
            self.velocity.x,
            prec,
            self.velocity.y,
            prec,
            self.velocity.z,
            prec,
            self.mass_kg,
        )
    }
}
