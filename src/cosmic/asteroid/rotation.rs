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

use super::{AsteroidError, InvalidConfigurationSnafu, NumericalDegeneracySnafu};
use crate::linalg::Vector3;
use crate::tools::elliptic::jacobi;
use snafu::prelude::*;

/// Torque-free Euler equations for a diagonal inertia tensor: returns dω/dt.
///
/// Source: Schaub & Junkins, 3th ed., eq. 4.32, with no external torque.
pub fn euler_rates(inertia: &Vector3<f64>, omega: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(
        (inertia.y - inertia.z) / inertia.x * omega.y * omega.z,
        (inertia.z - inertia.x) / inertia.y * omega.z * omega.x,
        (inertia.x - inertia.y) / inertia.z * omega.x * omega.y,
    )
}

/// Constants of the analytical torque-free rotation (Landau & Lifshitz, Mechanics, eq. 37.8 to 37.10).
///
/// The y component always follows `sn`. Of the x and z axes, the one whose moment of inertia is on the same
/// side of I_y as L²/(2E) follows `dn` (the axis the rotation circulates about) and the other one follows `cn`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct RotationalState {
    /// 2E = Σ I_i ω_i²
    pub energy_mul2: f64,
    /// L² = Σ I_i² ω_i²
    pub momentum_pow2: f64,
    /// Signed amplitudes, indexed by body axis
    pub coefficients: Vector3<f64>,
    /// Parameter m = k² of the elliptic functions
    pub modulus: f64,
    pub tau: f64,
    /// True when the rotation circulates about the x axis (x follows `dn`, z follows `cn`)
    pub inversion: bool,
    pub time_bias: f64,
}

impl RotationalState {
    pub(crate) fn new(
        inertia: &Vector3<f64>,
        omega: &Vector3<f64>,
        time_bias: f64,
        radicand_tolerance: f64,
    ) -> Result<Self, AsteroidError> {
        let energy_mul2 = inertia.component_mul(omega).dot(omega);
        let momentum_pow2 = inertia.component_mul(omega).norm_squared();

        let (ix, iy, iz) = (inertia.x, inertia.y, inertia.z);
        let inversion = (momentum_pow2 - energy_mul2 * iy) * (iz - ix) <= 0.0;
        // Axis following cn, axis following dn
        let (c, d) = if inversion { (2, 0) } else { (0, 2) };
        let (i_c, i_d) = (inertia[c], inertia[d]);

        // Both are of the sign of (I_d - I_c) for any physical motion, up to round-off
        let orientation = (i_d - i_c).signum();
        let energy_d = clamp_radicand(
            orientation * (energy_mul2 * i_d - momentum_pow2),
            momentum_pow2,
            radicand_tolerance,
            "2E·I_d - L²",
        )?;
        let energy_c = clamp_radicand(
            orientation * (momentum_pow2 - energy_mul2 * i_c),
            momentum_pow2,
            radicand_tolerance,
            "L² - 2E·I_c",
        )?;

        let amp_c = (energy_d / (i_c * (i_d - i_c).abs())).sqrt();
        let amp_y = (energy_d / (iy * (i_d - iy).abs())).sqrt();
        let amp_d = (energy_c / (i_d * (i_d - i_c).abs())).sqrt();

        let tau = ((i_d - iy).abs() * energy_c / (i_c * iy * i_d)).sqrt();
        let modulus = ((iy - i_c).abs() * energy_d) / ((i_d - iy).abs() * energy_c);

        ensure!(
            tau.is_finite() && tau > 0.0,
            InvalidConfigurationSnafu {
                reason: format!("rotation time scale {tau} is not strictly positive")
            }
        );
        ensure!(
            modulus.is_finite() && (0.0..1.0).contains(&modulus),
            InvalidConfigurationSnafu {
                reason: format!(
                    "elliptic parameter {modulus} is not in [0, 1): the rotation is on the separatrix (L² = 2E·I_y)"
                )
            }
        );

        let mut coefficients = Vector3::zeros();
        coefficients[c] = omega[c].signum() * amp_c;
        coefficients[1] = ((iz - ix) * omega.x * omega.z).signum() * amp_y;
        coefficients[d] = omega[d].signum() * amp_d;

        let me = Self {
            energy_mul2,
            momentum_pow2,
            coefficients,
            modulus,
            tau,
            inversion,
            time_bias,
        };

        debug!(
            "rotation constants: 2E = {energy_mul2:e}, L² = {momentum_pow2:e}, coefficients = {coefficients:?}, m = {modulus}, tau = {tau:e}, inversion = {inversion}"
        );

        Ok(me)
    }

    /// Angular velocity at `time`, in seconds.
    pub(crate) fn angular_velocity(&self, time: f64) -> Result<Vector3<f64>, AsteroidError> {
        let u = (time + self.time_bias) * self.tau;
        let f = jacobi(u, self.modulus).map_err(|e| AsteroidError::NumericalDegeneracy {
            action: "evaluating the Jacobi elliptic functions",
            details: e.to_string(),
        })?;

        let (c, d) = if self.inversion { (2, 0) } else { (0, 2) };
        let mut w = Vector3::zeros();
        w[c] = self.coefficients[c] * f.cn;
        w[1] = self.coefficients[1] * f.sn;
        w[d] = self.coefficients[d] * f.dn;

        ensure!(
            w.iter().all(|v| v.is_finite()),
            NumericalDegeneracySnafu {
                action: "computing the angular velocity",
                details: format!("non-finite ω = {w:?} at time {time}")
            }
        );
        Ok(w)
    }
}

/// Negative radicands within the relative tolerance are round-off and clamped to zero.
fn clamp_radicand(
    value: f64,
    scale: f64,
    tolerance: f64,
    what: &'static str,
) -> Result<f64, AsteroidError> {
    ensure!(
        value.is_finite() && value >= -tolerance * scale,
        InvalidConfigurationSnafu {
            reason: format!("radicand {what} = {value:e} is negative")
        }
    );
    if value < 0.0 {
        warn!("clamping {what} = {value:e} to zero");
        Ok(0.0)
    } else {
        Ok(value)
    }
}
