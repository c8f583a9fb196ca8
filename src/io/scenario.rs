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

use super::{duration_from_str, duration_to_str, ConfigError, ConfigRepr, Configurable};
use crate::cosmic::{Asteroid, AsteroidConfig, Parameterization};
use crate::dynamics::Thruster;
use crate::linalg::Vector3;
use crate::time::Duration;
use serde_derive::{Deserialize, Serialize};

/// Serializable asteroid. Only the semi-axes or the moments of inertia are needed, depending on the parameterization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AsteroidSerde {
    pub parameterization: Parameterization,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semi_axes_m: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inertia_kg_m2: Option<[f64; 3]>,
    pub density_kg_m3: f64,
    /// Angular velocity when the time plus the time bias is zero
    pub angular_velocity_rad_s: [f64; 3],
    #[serde(default)]
    pub time_bias_s: f64,
    #[serde(default)]
    pub config: AsteroidConfig,
}

impl ConfigRepr for AsteroidSerde {}

impl Configurable for Asteroid {
    type IntermediateRepr = AsteroidSerde;

    fn from_config(cfg: &AsteroidSerde) -> Result<Self, ConfigError> {
        let omega = Vector3::from(cfg.angular_velocity_rad_s);
        match cfg.parameterization {
            Parameterization::ByAxes => {
                let semi_axes = cfg.semi_axes_m.ok_or_else(|| {
                    ConfigError::InvalidConfig(
                        "`semi_axes_m` is required for the `by_axes` parameterization".to_string(),
                    )
                })?;
                Asteroid::by_axes_with_config(
                    Vector3::from(semi_axes),
                    cfg.density_kg_m3,
                    omega,
                    cfg.time_bias_s,
                    cfg.config,
                )
            }
            Parameterization::ByInertia => {
                let inertia = cfg.inertia_kg_m2.ok_or_else(|| {
                    ConfigError::InvalidConfig(
                        "`inertia_kg_m2` is required for the `by_inertia` parameterization".to_string(),
                    )
                })?;
                Asteroid::by_inertia_with_config(
                    Vector3::from(inertia),
                    cfg.density_kg_m3,
                    omega,
                    cfg.time_bias_s,
                    cfg.config,
                )
            }
        }
        .map_err(ConfigError::InvalidAsteroid)
    }

    fn to_config(&self) -> Result<AsteroidSerde, ConfigError> {
        let omega = self.angular_velocity_at_time(-self.time_bias())?;

        let (semi_axes_m, inertia_kg_m2) = match self.parameterization() {
            Parameterization::ByAxes => (Some(self.semi_axes().into()), None),
            Parameterization::ByInertia => (None, Some(self.inertia().into())),
        };

        Ok(AsteroidSerde {
            parameterization: self.parameterization(),
            semi_axes_m,
            inertia_kg_m2,
            density_kg_m3: self.density(),
            angular_velocity_rad_s: omega.into(),
            time_bias_s: self.time_bias(),
            config: self.config(),
        })
    }
}

/// Initial state of the spacecraft.
///
/// A missing position is sampled outside the asteroid, within `band_scale` times its semi-axes. A missing velocity
/// is the one of a point at rest in the inertial frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpacecraftSerde {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_m: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity_m_s: Option<[f64; 3]>,
    pub mass_kg: f64,
    #[serde(default = "default_band_scale")]
    pub band_scale: f64,
}

fn default_band_scale() -> f64 {
    1.5
}

impl ConfigRepr for SpacecraftSerde {}

/// Settings of the hovering simulator. Any missing field takes its default value.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSerde {
    pub control_frequency_hz: f64,
    /// Standard deviation of the perturbing acceleration, per axis, in m/s²
    pub perturbation_noise: f64,
    /// Standard deviation of the relative error on the specific impulse
    pub engine_noise: f64,
    pub thruster: Thruster,
    pub fuel_usage: bool,
    pub minimum_mass_kg: f64,
    pub seed: u64,
    /// Tolerance of the adaptive integrator
    pub tolerance: f64,
}

impl Default for SimulatorSerde {
    fn default() -> Self {
        Self {
            control_frequency_hz: 10.0,
            perturbation_noise: 1e-7,
            engine_noise: 0.05,
            thruster: Thruster::default(),
            fuel_usage: true,
            minimum_mass_kg: 0.0,
            seed: 0,
            tolerance: 1e-12,
        }
    }
}

impl ConfigRepr for SimulatorSerde {}

/// A complete hovering scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSerde {
    pub asteroid: AsteroidSerde,
    pub spacecraft: SpacecraftSerde,
    #[serde(default)]
    pub simulator: SimulatorSerde,
    /// Simulated duration, e.g. "10 min"
    #[serde(serialize_with = "duration_to_str", deserialize_with = "duration_from_str")]
    pub duration: Duration,
}

impl ConfigRepr for ScenarioSerde {}
