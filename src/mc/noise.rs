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

use super::{Distribution, InvalidNoiseSnafu, McError, Normal};
use crate::linalg::Vector3;
use rand::Rng;
use snafu::ensure;

/// Zero mean Gaussian noise on the environment and on the engine.
#[derive(Copy, Clone, Debug)]
pub struct NoiseModel {
    perturbation: Normal<f64>,
    engine: Normal<f64>,
}

impl NoiseModel {
    /// Builds the noise model from the standard deviation of the perturbing acceleration (m/s², per axis)
    /// and of the relative error on the specific impulse.
    pub fn new(perturbation_std: f64, engine_std: f64) -> Result<Self, McError> {
        Ok(Self {
            perturbation: normal("perturbation", perturbation_std)?,
            engine: normal("engine noise", engine_std)?,
        })
    }

    /// Samples a perturbing acceleration, independently on each axis.
    pub fn sample_perturbation<R: Rng>(&self, rng: &mut R) -> Vector3<f64> {
        Vector3::from_fn(|_, _| self.perturbation.sample(rng))
    }

    /// Samples a relative specific impulse error.
    pub fn sample_isp_error<R: Rng>(&self, rng: &mut R) -> f64 {
        self.engine.sample(rng)
    }
}

fn normal(what: &'static str, std_dev: f64) -> Result<Normal<f64>, McError> {
    ensure!(
        std_dev.is_finite() && std_dev >= 0.0,
        InvalidNoiseSnafu { what, std_dev }
    );
    Normal::new(0.0, std_dev).map_err(|_| McError::InvalidNoise { what, std_dev })
}
