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

use super::{Asteroid, AsteroidError, NumericalDegeneracySnafu};
use crate::linalg::Vector3;
use crate::tools::cubic::largest_real_root;
use crate::tools::elliptic::{carlson_rd, EllipticError};
use snafu::prelude::*;

impl Asteroid {
    /// Gravitational acceleration (m/s²) at a body-fixed position (m) on or outside the surface.
    ///
    /// The exterior field of a homogeneous ellipsoid is expressed with the largest root κ of
    /// x²/(a²+κ) + y²/(b²+κ) + z²/(c²+κ) = 1 as g_x = -GM x R_D(b²+κ, c²+κ, a²+κ), and likewise for y and z
    /// with their own semi-axis in the last slot of Carlson's R_D.
    /// This is the Legendre form of Cersosimo (2011, eq. 3.11) rewritten with F(φ|m) - E(φ|m) = (m/3) sin³φ R_D,
    /// which has no difference of nearly equal semi-axes, so it stays accurate when two of them almost coincide.
    ///
    /// Returns a `NumericalDegeneracy` if the point is inside the body or if any intermediate value is not finite.
    pub fn gravity_at_position(&self, position: &Vector3<f64>) -> Result<Vector3<f64>, AsteroidError> {
        const ACTION: &str = "computing the gravity field";

        ensure!(
            position.iter().all(|v| v.is_finite()),
            NumericalDegeneracySnafu {
                action: ACTION,
                details: format!("position {position:?} is not finite")
            }
        );

        let axes2 = self.axis_order.to_sorted(&self.semi_axes.component_mul(&self.semi_axes));
        let p = self.axis_order.to_sorted(position);
        let p2 = p.component_mul(&p);
        // Cubic in κ, solved in units of a² to keep the coefficients of order one
        let scale = axes2.x;
        let (a2, b2, c2) = (axes2.x / scale, axes2.y / scale, axes2.z / scale);
        let (x2, y2, z2) = (p2.x / scale, p2.y / scale, p2.z / scale);

        let coeff2 = a2 + b2 + c2 - x2 - y2 - z2;
        let coeff1 = a2 * b2 + a2 * c2 + b2 * c2 - (b2 + c2) * x2 - (a2 + c2) * y2 - (a2 + b2) * z2;
        let coeff0 = a2 * b2 * c2 - b2 * c2 * x2 - a2 * c2 * y2 - a2 * b2 * z2;

        let kappa_scaled = largest_real_root(coeff2, coeff1, coeff0).map_err(|e| {
            AsteroidError::NumericalDegeneracy {
                action: ACTION,
                details: e.to_string(),
            }
        })?;

        ensure!(
            kappa_scaled >= -self.config.surface_tolerance,
            NumericalDegeneracySnafu {
                action: ACTION,
                details: format!("position {position:?} is inside the asteroid (κ = {:e} m²)", kappa_scaled * scale)
            }
        );
        // Points on the surface up to round-off
        let kappa = kappa_scaled.max(0.0) * scale;
        let shifted = axes2.add_scalar(kappa);

        let rd = |x: f64, y: f64, z: f64| {
            carlson_rd(x, y, z).map_err(|e: EllipticError| AsteroidError::NumericalDegeneracy {
                action: ACTION,
                details: e.to_string(),
            })
        };
        let g_sorted = -self.gm()
            * Vector3::new(
                p.x * rd(shifted.y, shifted.z, shifted.x)?,
                p.y * rd(shifted.x, shifted.z, shifted.y)?,
                p.z * rd(shifted.x, shifted.y, shifted.z)?,
            );

        ensure!(
            g_sorted.iter().all(|v| v.is_finite()),
            NumericalDegeneracySnafu {
                action: ACTION,
                details: format!("non-finite gravity {g_sorted:?} at {position:?} (κ = {kappa:e} m²)")
            }
        );

        let gravity = self.axis_order.from_sorted(&g_sorted);
        trace!("g({position:?}) = {gravity:?}");
        Ok(gravity)
    }
}
