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

use rand_distr::{Distribution, Normal, Uniform};
pub use rand_pcg::Pcg64Mcg;
use snafu::prelude::*;

/// Sampling helpers for initial conditions.
pub mod helpers;

mod noise;
pub use noise::NoiseModel;

/// Errors of the random sampling setup.
#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum McError {
    #[snafu(display("band scale must be at least one, got {band_scale}"))]
    InvalidBand { band_scale: f64 },
    #[snafu(display("standard deviation of the {what} must be finite and non-negative, got {std_dev}"))]
    InvalidNoise { what: &'static str, std_dev: f64 },
}
