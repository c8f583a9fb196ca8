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

use snafu::prelude::*;
use std::f64::consts::PI;

/// Maximum number of Newton iterations used to polish a root.
const MAX_POLISH_ITERATIONS: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CubicError {
    #[snafu(display("cubic x³ + {c2:e}x² + {c1:e}x + {c0:e} has non-finite coefficients"))]
    NonFiniteCoefficients { c2: f64, c1: f64, c0: f64 },
}

/// Returns the real roots of the monic cubic `x³ + c2·x² + c1·x + c0`, in ascending order.
///
/// A cubic always has at least one real root, so the returned vector holds either one or three values
/// (a double root is returned twice).
/// Source: Numerical Recipes, 3rd ed., §5.6.
pub fn real_roots(c2: f64, c1: f64, c0: f64) -> Result<Vec<f64>, CubicError> {
    ensure!(
        c2.is_finite() && c1.is_finite() && c0.is_finite(),
        NonFiniteCoefficientsSnafu { c2, c1, c0 }
    );

    let q = (c2 * c2 - 3.0 * c1) / 9.0;
    let r = (2.0 * c2.powi(3) - 9.0 * c2 * c1 + 27.0 * c0) / 54.0;
    let shift = c2 / 3.0;

    let q3 = q.powi(3);
    let mut roots = if r * r < q3 {
        let theta = (r / q3.sqrt()).clamp(-1.0, 1.0).acos();
        let scale = -2.0 * q.sqrt();
        vec![
            scale * (theta / 3.0).cos() - shift,
            scale * ((theta + 2.0 * PI) / 3.0).cos() - shift,
            scale * ((theta - 2.0 * PI) / 3.0).cos() - shift,
        ]
    } else {
        let a = -r.signum() * (r.abs() + (r * r - q3).sqrt()).cbrt();
        let b = if a == 0.0 { 0.0 } else { q / a };
        vec![a + b - shift]
    };

    for root in roots.iter_mut() {
        *root = polish(c2, c1, c0, *root);
    }
    roots.sort_by(|a, b| a.total_cmp(b));
    Ok(roots)
}

/// Returns the largest real root of the monic cubic `x³ + c2·x² + c1·x + c0`.
pub fn largest_real_root(c2: f64, c1: f64, c0: f64) -> Result<f64, CubicError> {
    let roots = real_roots(c2, c1, c0)?;
    // There is always at least one real root
    Ok(roots.last().copied().unwrap_or(f64::NAN))
}

/// Newton polishing of a root of the monic cubic, stops when the correction no longer reduces the residual.
fn polish(c2: f64, c1: f64, c0: f64, mut x: f64) -> f64 {
    let eval = |x: f64| ((x + c2) * x + c1) * x + c0;
    let mut residual = eval(x).abs();
    for _ in 0..MAX_POLISH_ITERATIONS {
        if residual == 0.0 {
            break;
        }
        let slope = (3.0 * x + 2.0 * c2) * x + c1;
        if slope == 0.0 || !slope.is_finite() {
            break;
        }
        let candidate = x - eval(x) / slope;
        let candidate_residual = eval(candidate).abs();
        if candidate_residual.is_nan() || candidate_residual >= residual {
            break;
        }
        x = candidate;
        residual = candidate_residual;
    }
    x
}
