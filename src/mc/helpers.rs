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

use super::{Distribution, InvalidBandSnafu, McError, Uniform};
use crate::linalg::Vector3;
use rand::Rng;
use snafu::ensure;
use std::f64::consts::{PI, TAU};

/// Samples a point in the band between the ellipsoid of the provided semi-axes and the same ellipsoid scaled by
/// `band_scale`, e.g. 1.5 for up to fifty percent above the surface.
///
/// The longitude and colatitude are uniform in [0, 2π) and [0, π], and each coordinate uses its own radius
/// uniform in [e_i, e_i·band_scale], so the point is never inside the ellipsoid. The distribution is not
/// uniform in volume.
pub fn sample_point_outside_ellipsoid<R: Rng>(
    semi_axes: &Vector3<f64>,
    band_scale: f64,
    rng: &mut R,
) -> Result<Vector3<f64>, McError> {
    ensure!(band_scale.is_finite() && band_scale >= 1.0, InvalidBandSnafu { band_scale });

    let u = Uniform::new(0.0, TAU).sample(rng);
    let v = Uniform::new_inclusive(0.0, PI).sample(rng);
    let mut radii = Vector3::zeros();
    for (radius, axis) in radii.iter_mut().zip(semi_axes.iter()) {
        *radius = Uniform::new_inclusive(*axis, axis * band_scale).sample(rng);
    }

    Ok(Vector3::new(
        radii.x * u.cos() * v.sin(),
        radii.y * u.sin() * v.sin(),
        radii.z * v.cos(),
    ))
}
