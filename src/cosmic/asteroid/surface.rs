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
use crate::linalg::{Vector2, Vector3};
use snafu::prelude::*;

const ACTION: &str = "searching for the nearest surface point";

/// Location of a first octant query point with respect to the symmetry planes of the ellipsoid,
/// in the frame where the semi-axes are sorted in descending order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SurfaceCase {
    /// All coordinates strictly positive: three dimensional root finding.
    Generic,
    /// On the plane of the two smallest axes (largest axis coordinate is zero).
    OnYzPlane,
    /// On the plane of the largest and smallest axes (middle axis coordinate is zero).
    OnXzPlane,
    /// On the smallest axis.
    OnZAxis,
    /// On the plane of the two largest axes (smallest axis coordinate is zero), including the origin.
    OnXyPlane,
}

impl SurfaceCase {
    /// Classifies a point given by its absolute coordinates in the sorted frame.
    pub fn classify(y: &Vector3<f64>) -> Self {
        if y.z > 0.0 {
            match (y.x > 0.0, y.y > 0.0) {
                (true, true) => Self::Generic,
                (false, true) => Self::OnYzPlane,
                (true, false) => Self::OnXzPlane,
                (false, false) => Self::OnZAxis,
            }
        } else {
            Self::OnXyPlane
        }
    }
}

impl Asteroid {
    /// Distance (m) from a body-fixed position to the surface, and the nearest surface point (m).
    ///
    /// The search is done in the first octant of the frame where the semi-axes are in descending order, then the
    /// signs and axis order of the query are restored on the surface point. Valid for points inside the body too.
    /// Source: Eberly, "Distance from a Point to an Ellipse, an Ellipsoid, or a Hyperellipsoid", 2013.
    pub fn distance_to_surface_at_position(
        &self,
        position: &Vector3<f64>,
    ) -> Result<(f64, Vector3<f64>), AsteroidError> {
        ensure!(
            position.iter().all(|v| v.is_finite()),
            NumericalDegeneracySnafu {
                action: ACTION,
                details: format!("position {position:?} is not finite")
            }
        );

        let e = self.axis_order.to_sorted(&self.semi_axes);
        let p = self.axis_order.to_sorted(position);
        // copysign keeps the sign of negative zeros
        let signs = p.map(|v| 1.0_f64.copysign(v));
        let y = p.abs();

        let case = SurfaceCase::classify(&y);
        let x = self.nearest_in_first_octant(&e, &y, case)?;

        let point = self.axis_order.from_sorted(&x.component_mul(&signs));
        let distance = (position - point).norm();
        trace!("{case:?} nearest surface point to {position:?} is {point:?} ({distance} m)");
        Ok((distance, point))
    }

    /// Vector from the nearest surface point to the position, i.e. what an altimeter would measure.
    pub fn height_at_position(&self, position: &Vector3<f64>) -> Result<Vector3<f64>, AsteroidError> {
        let (_, point) = self.distance_to_surface_at_position(position)?;
        Ok(position - point)
    }

    fn nearest_in_first_octant(
        &self,
        e: &Vector3<f64>,
        y: &Vector3<f64>,
        case: SurfaceCase,
    ) -> Result<Vector3<f64>, AsteroidError> {
        let maxiter = self.config.max_bisection_iterations;
        match case {
            SurfaceCase::Generic => {
                let t = bisect(
                    &[e.x * y.x, e.y * y.y, e.z * y.z],
                    &[e.x * e.x, e.y * e.y, e.z * e.z],
                    maxiter,
                )?;
                Ok(Vector3::new(
                    e.x * e.x * y.x / (t + e.x * e.x),
                    e.y * e.y * y.y / (t + e.y * e.y),
                    e.z * e.z * y.z / (t + e.z * e.z),
                ))
            }
            SurfaceCase::OnYzPlane => {
                let x = nearest_on_ellipse(e.y, e.z, y.y, y.z, maxiter)?;
                Ok(Vector3::new(0.0, x.x, x.y))
            }
            SurfaceCase::OnXzPlane => {
                let x = nearest_on_ellipse(e.x, e.z, y.x, y.z, maxiter)?;
                Ok(Vector3::new(x.x, 0.0, x.y))
            }
            SurfaceCase::OnZAxis => Ok(Vector3::new(0.0, 0.0, e.z)),
            SurfaceCase::OnXyPlane => {
                let denom0 = e.x * e.x - e.z * e.z;
                let denom1 = e.y * e.y - e.z * e.z;
                let numer0 = e.x * y.x;
                let numer1 = e.y * y.y;
                if numer0 < denom0 && numer1 < denom1 {
                    // The nearest point may leave the plane for points close to the center
                    let xde0 = numer0 / denom0;
                    let xde1 = numer1 / denom1;
                    let discr = 1.0 - xde0 * xde0 - xde1 * xde1;
                    if discr > 0.0 {
                        return Ok(Vector3::new(e.x * xde0, e.y * xde1, e.z * discr.sqrt()));
                    }
                }
                let x = nearest_on_ellipse(e.x, e.y, y.x, y.y, maxiter)?;
                Ok(Vector3::new(x.x, x.y, 0.0))
            }
        }
    }
}

/// Nearest point of the ellipse (x/e0)² + (y/e1)² = 1, with e0 >= e1, to a first quadrant point.
fn nearest_on_ellipse(
    e0: f64,
    e1: f64,
    y0: f64,
    y1: f64,
    maxiter: usize,
) -> Result<Vector2<f64>, AsteroidError> {
    if y1 > 0.0 {
        if y0 > 0.0 {
            let t = bisect(&[e0 * y0, e1 * y1], &[e0 * e0, e1 * e1], maxiter)?;
            Ok(Vector2::new(
                e0 * e0 * y0 / (t + e0 * e0),
                e1 * e1 * y1 / (t + e1 * e1),
            ))
        } else {
            Ok(Vector2::new(0.0, e1))
        }
    } else {
        let numer0 = e0 * y0;
        let denom0 = e0 * e0 - e1 * e1;
        if numer0 < denom0 {
            let xde0 = numer0 / denom0;
            Ok(Vector2::new(e0 * xde0, e1 * (1.0 - xde0 * xde0).sqrt()))
        } else {
            Ok(Vector2::new(e0, 0.0))
        }
    }
}

/// Finds the root t of F(t) = Σ (e_i y_i / (t + e_i²))² - 1 by bisection, where `ey[i] = e_i y_i > 0`
/// and `e2[i] = e_i²` is in descending order.
///
/// F is strictly decreasing for t > -e_min², and the root lies in [-e_min² + e_min y_min, -e_min² + |e∘y|].
/// The bisection stops when the midpoint is no longer distinct from the bounds in floating point.
fn bisect(ey: &[f64], e2: &[f64], maxiter: usize) -> Result<f64, AsteroidError> {
    let n = e2.len() - 1;
    let f = |t: f64| -> f64 {
        ey.iter()
            .zip(e2)
            .map(|(num, den)| (num / (t + den)).powi(2))
            .sum::<f64>()
            - 1.0
    };

    let mut t0 = -e2[n] + ey[n];
    let mut t1 = -e2[n] + ey.iter().map(|v| v * v).sum::<f64>().sqrt();

    for _ in 0..maxiter {
        let t = 0.5 * (t0 + t1);
        if t == t0 || t == t1 {
            return Ok(t);
        }
        let value = f(t);
        ensure!(
            value.is_finite(),
            NumericalDegeneracySnafu {
                action: ACTION,
                details: format!("root function is not finite at t = {t:e}")
            }
        );
        if value > 0.0 {
            t0 = t;
        } else if value < 0.0 {
            t1 = t;
        } else {
            return Ok(t);
        }
    }

    Err(AsteroidError::NumericalDegeneracy {
        action: ACTION,
        details: format!("bisection did not converge in {maxiter} iterations (bracket [{t0:e}, {t1:e}])"),
    })
}
