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

use crate::cosmic::{AsteroidError, SpacecraftState};
use crate::io::ConfigError;
use crate::mc::McError;
use crate::propagators::PropagationError;
use snafu::prelude::*;

/// Errors of the hovering simulation, wrapping the error of the component which failed.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum HoverError {
    #[snafu(display("asteroid error: {source}"))]
    Asteroid { source: AsteroidError },
    #[snafu(display("propagation from {state} failed: {source}"))]
    Propagation {
        source: PropagationError,
        state: SpacecraftState,
    },
    #[snafu(display("configuration error: {source}"))]
    Config { source: ConfigError },
    #[snafu(display("sampling error: {source}"))]
    MonteCarlo { source: McError },
    #[snafu(display("invalid simulator setup: {reason}"))]
    InvalidSimulator { reason: String },
}
