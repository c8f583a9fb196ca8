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

use crate::linalg::allocator::Allocator;
use crate::linalg::{DefaultAllocator, DimName, OVector};
use crate::time::Duration;
use std::fmt;

/// The triaxial ellipsoidal asteroid: rotation, gravity field and surface geometry.
pub mod asteroid;
pub use self::asteroid::{Asteroid, AsteroidConfig, AsteroidError, Parameterization, SurfaceCase};

mod spacecraft;
pub use self::spacecraft::SpacecraftState;

/// A trait for propagated states.
///
/// The elapsed time is counted from the start of the simulation, in the asteroid's own time scale
/// (i.e. before the addition of the asteroid's time bias).
pub trait State: Copy + PartialEq + fmt::Display + Send + Sync
where
    Self: Sized,
    DefaultAllocator: Allocator<Self::Size>,
{
    /// Size of the propagated state vector
    type Size: DimName;

    /// Return this state as a vector for the propagation
    fn to_vector(&self) -> OVector<f64, Self::Size>;

    /// Set this state
    fn set(&mut self, elapsed: Duration, vector: &OVector<f64, Self::Size>);

    /// Time elapsed since the start of the simulation
    fn elapsed(&self) -> Duration;
}

/// Newton's gravitational constant, in m^3 kg^-1 s^-2 (CODATA 2014).
pub const GRAVITATIONAL_CONSTANT: f64 = 6.67408e-11;

/// From NIST special publication 330, 2008 edition, in meters per second squared
pub const STD_GRAVITY: f64 = 9.80665;
