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

use super::GRAVITATIONAL_CONSTANT;
use crate::linalg::Vector3;
use crate::tools::elliptic::complete_first_kind;
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::f64::consts::PI;
use std::fmt;
use std::sync::Mutex;
use typed_builder::TypedBuilder;

mod gravity;
mod rotation;
mod surface;

pub use self::rotation::euler_rates;
use self::rotation::RotationalState;
pub use self::surface::SurfaceCase;

#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AsteroidError {
    /// The asteroid cannot be built from the provided physical parameters.
    #[snafu(display("invalid asteroid configuration: {reason}"))]
    InvalidConfiguration { reason: String },
    /// A query could not be answered with finite values.
    #[snafu(display("numerical degeneracy when {action}: {details}"))]
    NumericalDegeneracy {
        action: &'static str,
        details: String,
    },
}

/// How the asteroid was initially described. Both lead to the same internal representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameterization {
    ByAxes,
    ByInertia,
}

/// Numerical settings of the asteroid queries.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
#[serde(default)]
pub struct AsteroidConfig {
    /// Reuse the last angular velocity if queried again at the same time
    #[builder(default = true)]
    pub cache_angular_velocity: bool,
    /// Two times closer than this (scaled by the magnitude of the time) hit the cache, in seconds
    #[builder(default = 1e-12)]
    pub cache_tolerance_s: f64,
    /// Maximum number of bisection steps of the nearest surface point search
    #[builder(default = 1200)]
    pub max_bisection_iterations: usize,
    /// Relative tolerance on the ellipsoidal coordinate under which a point is considered on the surface
    #[builder(default = 1e-9)]
    pub surface_tolerance: f64,
    /// Relative tolerance on negative radicands of the rotation constants, which are clamped to zero
    #[builder(default = 1e-10)]
    pub radicand_tolerance: f64,
}

impl Default for AsteroidConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Permutation of the body axes which sorts the semi-axes in descending order.
///
/// The gravity and surface computations work in this frame, where `a >= b >= c`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct AxisOrder {
    /// `perm[k]` is the body axis of the k-th largest semi-axis
    perm: [usize; 3],
}

impl AxisOrder {
    fn descending(semi_axes: &Vector3<f64>) -> Self {
        let mut perm = [0, 1, 2];
        perm.sort_by(|&i, &j| semi_axes[j].total_cmp(&semi_axes[i]));
        Self { perm }
    }

    pub(crate) fn to_sorted(self, v: &Vector3<f64>) -> Vector3<f64> {
        Vector3::new(v[self.perm[0]], v[self.perm[1]], v[self.perm[2]])
    }

    pub(crate) fn from_sorted(self, v: &Vector3<f64>) -> Vector3<f64> {
        let mut out = Vector3::zeros();
        for (k, axis) in self.perm.iter().enumerate() {
            out[*axis] = v[k];
        }
        out
    }
}

/// A homogeneous triaxial ellipsoidal asteroid in torque-free rotation about its center of mass.
///
/// All vectors are expressed in the body-fixed principal axes frame, in SI units.
/// The angular velocity follows the analytical solution of Euler's equations with Jacobi elliptic functions
/// (Landau & Lifshitz, Mechanics, §37), hence the y axis must be the axis of intermediate moment of inertia.
/// The gravity field is the exact field of a homogeneous ellipsoid (MacMillan, The Theory of the Potential, §38).
#[derive(Debug)]
pub struct Asteroid {
    semi_axes: Vector3<f64>,
    inertia: Vector3<f64>,
    density: f64,
    mass: f64,
    parameterization: Parameterization,
    rotation: RotationalState,
    axis_order: AxisOrder,
    config: AsteroidConfig,
    cache: Mutex<Option<(f64, Vector3<f64>)>>,
}

impl Asteroid {
    /// Builds an asteroid from its principal moments of inertia (kg·m²), its density (kg/m³), its angular velocity
    /// at the reference time (rad/s) and the time bias (s) added to every queried time.
    pub fn by_inertia(
        inertia: Vector3<f64>,
        density: f64,
        angular_velocity: Vector3<f64>,
        time_bias: f64,
    ) -> Result<Self, AsteroidError> {
        Self::by_inertia_with_config(
            inertia,
            density,
            angular_velocity,
            time_bias,
            AsteroidConfig::default(),
        )
    }

    /// Builds an asteroid from its principal moments of inertia, with specific numerical settings.
    pub fn by_inertia_with_config(
        inertia: Vector3<f64>,
        density: f64,
        angular_velocity: Vector3<f64>,
        time_bias: f64,
        config: AsteroidConfig,
    ) -> Result<Self, AsteroidError> {
        check_positive("inertia", &inertia, density)?;
        let (ix, iy, iz) = (inertia.x, inertia.y, inertia.z);
        let p = Vector3::new(iy + iz - ix, ix + iz - iy, ix + iy - iz);
        ensure!(
            p.iter().all(|v| *v > 0.0),
            InvalidConfigurationSnafu {
                reason: format!(
                    "principal moments {inertia:?} violate the triangle inequality, no ellipsoid has them"
                )
            }
        );
        // With s = 5 / (2 M): a² = s (Iy + Iz - Ix), and M = 4/3 π ρ abc
        let s = (15.0 / (8.0 * PI * density * (p.x * p.y * p.z).sqrt())).powf(0.4);
        let semi_axes = p.map(|v| (s * v).sqrt());

        Self::new(
            semi_axes,
            inertia,
            density,
            angular_velocity,
            time_bias,
            Parameterization::ByInertia,
            config,
        )
    }

    /// Builds an asteroid from its semi-axes (m), its density (kg/m³), its angular velocity at the reference time (rad/s)
    /// and the time bias (s) added to every queried time.
    pub fn by_axes(
        semi_axes: Vector3<f64>,
        density: f64,
        angular_velocity: Vector3<f64>,
        time_bias: f64,
    ) -> Result<Self, AsteroidError> {
        Self::by_axes_with_config(
            semi_axes,
            density,
            angular_velocity,
            time_bias,
            AsteroidConfig::default(),
        )
    }

    /// Builds an asteroid from its semi-axes, with specific numerical settings.
    pub fn by_axes_with_config(
        semi_axes: Vector3<f64>,
        density: f64,
        angular_velocity: Vector3<f64>,
        time_bias: f64,
        config: AsteroidConfig,
    ) -> Result<Self, AsteroidError> {
        check_positive("semi-axes", &semi_axes, density)?;
        let mass = ellipsoid_mass(&semi_axes, density);
        let sq = semi_axes.component_mul(&semi_axes);
        let inertia = Vector3::new(sq.y + sq.z, sq.x + sq.z, sq.x + sq.y) * (mass / 5.0);

        Self::new(
            semi_axes,
            inertia,
            density,
            angular_velocity,
            time_bias,
            Parameterization::ByAxes,
            config,
        )
    }

    fn new(
        semi_axes: Vector3<f64>,
        inertia: Vector3<f64>,
        density: f64,
        angular_velocity: Vector3<f64>,
        time_bias: f64,
        parameterization: Parameterization,
        config: AsteroidConfig,
    ) -> Result<Self, AsteroidError> {
        ensure!(
            inertia.x != inertia.y && inertia.y != inertia.z && inertia.x != inertia.z,
            InvalidConfigurationSnafu {
                reason: format!(
                    "principal moments {inertia:?} must be pairwise distinct, symmetric tops are not supported"
                )
            }
        );
        ensure!(
            (inertia.x - inertia.y) * (inertia.y - inertia.z) > 0.0,
            InvalidConfigurationSnafu {
                reason: format!(
                    "the y axis must be the axis of intermediate inertia (got {inertia:?})"
                )
            }
        );
        ensure!(
            angular_velocity.iter().all(|w| w.is_finite()) && time_bias.is_finite(),
            InvalidConfigurationSnafu {
                reason: format!(
                    "angular velocity {angular_velocity:?} and time bias {time_bias} must be finite"
                )
            }
        );
        ensure!(
            angular_velocity.x != 0.0 && angular_velocity.z != 0.0,
            InvalidConfigurationSnafu {
                reason: format!(
                    "angular velocity {angular_velocity:?} must have non-zero x and z components"
                )
            }
        );

        let rotation = RotationalState::new(
            &inertia,
            &angular_velocity,
            time_bias,
            config.radicand_tolerance,
        )?;

        let me = Self {
            semi_axes,
            inertia,
            density,
            mass: ellipsoid_mass(&semi_axes, density),
            parameterization,
            rotation,
            axis_order: AxisOrder::descending(&semi_axes),
            config,
            cache: Mutex::new(None),
        };
        debug!("built {me}");
        Ok(me)
    }

    /// Returns a copy of this asteroid with different numerical settings.
    ///
    /// The rotation constants are not recomputed: the radicand tolerance only applies at construction.
    pub fn with_config(&self, config: AsteroidConfig) -> Self {
        let mut me = self.clone();
        me.config = config;
        me
    }

    /// Semi-axes along the body x, y and z axes, in meters
    pub fn semi_axes(&self) -> Vector3<f64> {
        self.semi_axes
    }

    /// Principal moments of inertia, in kg·m²
    pub fn inertia(&self) -> Vector3<f64> {
        self.inertia
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Gravitational parameter, in m³/s²
    pub fn gm(&self) -> f64 {
        GRAVITATIONAL_CONSTANT * self.mass
    }

    pub fn parameterization(&self) -> Parameterization {
        self.parameterization
    }

    pub fn config(&self) -> AsteroidConfig {
        self.config
    }

    /// Twice the rotational kinetic energy, Σ I_i ω_i², in kg·m²/s²
    pub fn energy_mul2(&self) -> f64 {
        self.rotation.energy_mul2
    }

    /// Squared norm of the angular momentum, Σ I_i² ω_i²
    pub fn momentum_pow2(&self) -> f64 {
        self.rotation.momentum_pow2
    }

    /// Parameter m = k² of the Jacobi elliptic functions of the rotation
    pub fn elliptic_modulus(&self) -> f64 {
        self.rotation.modulus
    }

    /// Time scale of the rotation: the argument of the elliptic functions is (t + time bias) · tau
    pub fn elliptic_tau(&self) -> f64 {
        self.rotation.tau
    }

    /// Signed amplitudes of the angular velocity components
    pub fn elliptic_coefficients(&self) -> Vector3<f64> {
        self.rotation.coefficients
    }

    /// Period of the angular velocity in the body frame, 4K(m) / tau, in seconds.
    ///
    /// Fails on the separatrix (m = 1), where the rotation is not periodic.
    pub fn rotation_period(&self) -> Result<f64, AsteroidError> {
        let k = complete_first_kind(self.rotation.modulus).map_err(|e| AsteroidError::NumericalDegeneracy {
            action: "computing the rotation period",
            details: e.to_string(),
        })?;
        Ok(4.0 * k / self.rotation.tau)
    }

    pub fn time_bias(&self) -> f64 {
        self.rotation.time_bias
    }

    /// True when the rotation circulates about the x axis, i.e. when the x component follows `dn`.
    pub fn inversion(&self) -> bool {
        self.rotation.inversion
    }

    /// Angular velocity of the body frame at time `time` (s), in rad/s.
    pub fn angular_velocity_at_time(&self, time: f64) -> Result<Vector3<f64>, AsteroidError> {
        ensure!(
            time.is_finite(),
            NumericalDegeneracySnafu {
                action: "computing the angular velocity",
                details: format!("time {time} is not finite")
            }
        );

        if self.config.cache_angular_velocity {
            // A poisoned lock only disables the cache
            if let Ok(guard) = self.cache.lock() {
                if let Some((cached_time, cached_w)) = *guard {
                    if (cached_time - time).abs() <= self.config.cache_tolerance_s * time.abs().max(1.0) {
                        return Ok(cached_w);
                    }
                }
            }
        }

        let w = self.rotation.angular_velocity(time)?;
        trace!("ω({time}) = {w:?}");

        if self.config.cache_angular_velocity {
            if let Ok(mut guard) = self.cache.lock() {
                *guard = Some((time, w));
            }
        }
        Ok(w)
    }

    /// Angular acceleration of the body frame at time `time` (s), in rad/s², from Euler's equations.
    pub fn angular_acceleration_at_time(&self, time: f64) -> Result<Vector3<f64>, AsteroidError> {
        Ok(self.angular_velocity_and_acceleration_at_time(time)?.1)
    }

    /// Angular velocity and acceleration at the same time, from a single evaluation of the elliptic functions.
    pub fn angular_velocity_and_acceleration_at_time(
        &self,
        time: f64,
    ) -> Result<(Vector3<f64>, Vector3<f64>), AsteroidError> {
        let w = self.angular_velocity_at_time(time)?;
        Ok((w, euler_rates(&self.inertia, &w)))
    }
}

impl Clone for Asteroid {
    /// The clone starts with an empty cache.
    fn clone(&self) -> Self {
        Self {
            semi_axes: self.semi_axes,
            inertia: self.inertia,
            density: self.density,
            mass: self.mass,
            parameterization: self.parameterization,
            rotation: self.rotation,
            axis_order: self.axis_order,
            config: self.config,
            cache: Mutex::new(None),
        }
    }
}

impl fmt::Display for Asteroid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "asteroid ({:?}) semi-axes [{:.3}, {:.3}, {:.3}] m, ρ = {} kg/m³, M = {:.6e} kg, m = {:.6}, τ = {:.6e}{}",
            self.parameterization,
            self.semi_axes.x,
            self.semi_axes.y,
            self.semi_axes.z,
            self.density,
            self.mass,
            self.rotation.modulus,
            self.rotation.tau,
            if self.rotation.inversion {
                " (inverted)"
            } else {
                ""
            }
        )
    }
}

fn ellipsoid_mass(semi_axes: &Vector3<f64>, density: f64) -> f64 {
    4.0 / 3.0 * PI * semi_axes.x * semi_axes.y * semi_axes.z * density
}

fn check_positive(what: &str, values: &Vector3<f64>, density: f64) -> Result<(), AsteroidError> {
    ensure!(
        values.iter().all(|v| v.is_finite() && *v > 0.0),
        InvalidConfigurationSnafu {
            reason: format!("{what} {values:?} must be finite and strictly positive")
        }
    );
    ensure!(
        density.is_finite() && density > 0.0,
        InvalidConfigurationSnafu {
            reason: format!("density {density} must be finite and strictly positive")
        }
    );
    Ok(())
}
