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


/*! # asteroid-hover

Dynamics of a spacecraft hovering about a rotating triaxial ellipsoidal asteroid: analytical torque-free rotation,
closed form gravity field of a homogeneous ellipsoid, nearest point on the surface, and a simulator integrating
the motion of the spacecraft in the body-fixed frame of the asteroid.

```no_run
use asteroid_hover::dynamics::Drift;
use asteroid_hover::linalg::Vector3;
use asteroid_hover::md::{Simulator, SimulatorConfig};
use asteroid_hover::time::Unit;
use asteroid_hover::{Asteroid, SpacecraftState};
use std::sync::Arc;

let asteroid = Arc::new(
    Asteroid::by_axes(
        Vector3::new(4000.0, 2000.0, 1000.0),
        2000.0,
        Vector3::new(2.9565e-4, 0.0, 1e-5),
        0.0,
    )
    .unwrap(),
);
let position = Vector3::new(6000.0, 0.0, 0.0);
let velocity = Simulator::hovering_velocity(&asteroid, &position).unwrap();
let mut sim = Simulator::new(asteroid, SimulatorConfig::default()).unwrap();
let result = sim
    .run(SpacecraftState::new(position, velocity, 450.0), 10 * Unit::Minute, &mut Drift)
    .unwrap();
println!("lowest height: {:?} m", result.min_height_m());
```
*/

/// Provides the explicit Runge Kutta propagators used to integrate the dynamics.
pub mod propagators;

/// Provides the hovering dynamics, the numerical rotational dynamics, and the thrusters and controllers.
pub mod dynamics;

/// Provides the asteroid model and the propagated states.
pub mod cosmic;

/// Utility functions shared by different modules, and which may be useful to engineers.
pub mod utils;

mod errors;
/// Functions which may fail return an error, never panic.
pub use self::errors::HoverError;

/// Serializable scenarios, loaded from YAML.
pub mod io;

/// The hovering simulator.
pub mod md;

/// Elliptic integrals and functions, and cubic roots.
pub mod tools;

/// Random sampling of initial conditions and noises.
pub mod mc;

#[macro_use]
extern crate log;
extern crate hifitime;
extern crate nalgebra as na;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Re-export some useful things
pub use self::cosmic::{Asteroid, SpacecraftState, State};
