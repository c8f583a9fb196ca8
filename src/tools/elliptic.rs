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

//! All functions of this module use the *parameter* convention: `m = k²` where `k` is the elliptic modulus.
//! This is the convention of Abramowitz & Stegun (chapters 16 and 17) and of most numerical libraries.

use snafu::prelude::*;
use std::f64::consts::FRAC_PI_2;

/// Maximum number of duplication steps in the Carlson integrals.
/// Convergence is typically reached in less than a dozen steps.
const MAX_ITERATIONS: usize = 100;
/// Maximum number of arithmetic-geometric mean steps for the Jacobi elliptic functions.
const MAX_AGM_ITERATIONS: usize = 16;

/// Carlson's R_F error tolerance: the truncation error scales as ERRTOL^6.
const RF_ERRTOL: f64 = 0.0008;
/// Carlson's R_D error tolerance: the truncation error scales as ERRTOL^6.
const RD_ERRTOL: f64 = 0.0005;

const TINY: f64 = 1.5e-38;
const BIG: f64 = 3.0e37;

#[derive(Copy, Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EllipticError {
    #[snafu(display("{function} is not defined for arguments {args:?}"))]
    Domain {
        function: &'static str,
        args: [f64; 3],
    },
    #[snafu(display("{function} did not converge after {maxiter} iterations"))]
    MaxIterations {
        function: &'static str,
        maxiter: usize,
    },
}

/// Values of the three Jacobi elliptic functions at the same argument.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JacobiEllipticFunctions {
    pub sn: f64,
    pub cn: f64,
    pub dn: f64,
    /// Amplitude, i.e. `am(u|m)` such that `sn = sin(am)` and `cn = cos(am)`.
    pub am: f64,
}

/// Carlson's elliptic integral of the first kind, R_F(x, y, z).
///
/// At most one of the arguments may be zero, all must be non-negative.
/// Source: Carlson, "Numerical computation of real or complex elliptic integrals", 1995, via Numerical Recipes §6.11.
pub fn carlson_rf(x: f64, y: f64, z: f64) -> Result<f64, EllipticError> {
    const C1: f64 = 1.0 / 24.0;
    const C2: f64 = 0.1;
    const C3: f64 = 3.0 / 44.0;
    const C4: f64 = 1.0 / 14.0;

    ensure!(
        x.min(y).min(z) >= 0.0
            && (x + y).min(x + z).min(y + z) >= TINY
            && x.max(y).max(z) <= BIG,
        DomainSnafu {
            function: "R_F",
            args: [x, y, z]
        }
    );

    let (mut xt, mut yt, mut zt) = (x, y, z);
    for _ in 0..MAX_ITERATIONS {
        let (sqrtx, sqrty, sqrtz) = (xt.sqrt(), yt.sqrt(), zt.sqrt());
        let alamb = sqrtx * (sqrty + sqrtz) + sqrty * sqrtz;
        xt = 0.25 * (xt + alamb);
        yt = 0.25 * (yt + alamb);
        zt = 0.25 * (zt + alamb);
        let ave = (xt + yt + zt) / 3.0;
        let delx = (ave - xt) / ave;
        let dely = (ave - yt) / ave;
        let delz = (ave - zt) / ave;
        if delx.abs().max(dely.abs()).max(delz.abs()) <= RF_ERRTOL {
            let e2 = delx * dely - delz * delz;
            let e3 = delx * dely * delz;
            return Ok((1.0 + (C1 * e2 - C2 - C3 * e3) * e2 + C4 * e3) / ave.sqrt());
        }
    }

    Err(EllipticError::MaxIterations {
        function: "R_F",
        maxiter: MAX_ITERATIONS,
    })
}

/// Carlson's elliptic integral of the second kind, R_D(x, y, z).
///
/// `x` and `y` must be non-negative and at most one of them zero, `z` must be strictly positive.
pub fn carlson_rd(x: f64, y: f64, z: f64) -> Result<f64, EllipticError> {
    const C1: f64 = 3.0 / 14.0;
    const C2: f64 = 1.0 / 6.0;
    const C3: f64 = 9.0 / 22.0;
    const C4: f64 = 3.0 / 26.0;
    const C5: f64 = 0.25 * C3;
    const C6: f64 = 1.5 * C4;

    ensure!(
        x.min(y) >= 0.0 && (x + y).min(z) >= TINY && x.max(y).max(z) <= BIG,
        DomainSnafu {
            function: "R_D",
            args: [x, y, z]
        }
    );

    let (mut xt, mut yt, mut zt) = (x, y, z);
    let mut sum = 0.0;
    let mut fac = 1.0;
    for _ in 0..MAX_ITERATIONS {
        let (sqrtx, sqrty, sqrtz) = (xt.sqrt(), yt.sqrt(), zt.sqrt());
        let alamb = sqrtx * (sqrty + sqrtz) + sqrty * sqrtz;
        sum += fac / (sqrtz * (zt + alamb));
        fac *= 0.25;
        xt = 0.25 * (xt + alamb);
        yt = 0.25 * (yt + alamb);
        zt = 0.25 * (zt + alamb);
        let ave = 0.2 * (xt + yt + 3.0 * zt);
        let delx = (ave - xt) / ave;
        let dely = (ave - yt) / ave;
        let delz = (ave - zt) / ave;
        if delx.abs().max(dely.abs()).max(delz.abs()) <= RD_ERRTOL {
            let ea = delx * dely;
            let eb = delz * delz;
            let ec = ea - eb;
            let ed = ea - 6.0 * eb;
            let ee = ed + ec + ec;
            return Ok(3.0 * sum
                + fac
                    * (1.0
                        + ed * (-C1 + C5 * ed - C6 * delz * ee)
                        + delz * (C2 * ee + delz * (-C3 * ec + delz * C4 * ea)))
                    / (ave * ave.sqrt()));
        }
    }

    Err(EllipticError::MaxIterations {
        function: "R_D",
        maxiter: MAX_ITERATIONS,
    })
}

/// Complete elliptic integral of the first kind K(m), for 0 <= m < 1.
pub fn complete_first_kind(m: f64) -> Result<f64, EllipticError> {
    ensure!(
        (0.0..1.0).contains(&m),
        DomainSnafu {
            function: "K",
            args: [m, f64::NAN, f64::NAN]
        }
    );
    carlson_rf(0.0, 1.0 - m, 1.0)
}

/// Jacobi elliptic functions sn, cn, dn and the amplitude of argument `u` and parameter `m`, with 0 <= m <= 1.
///
/// Uses the descending Landen transformation (arithmetic-geometric mean) for the general case,
/// with series expansions when `m` is within 1e-9 of zero or within 1e-10 of one.
/// Source: Abramowitz & Stegun, §16.4 and §16.13–16.15 (Cephes `ellpj`).
pub fn jacobi(u: f64, m: f64) -> Result<JacobiEllipticFunctions, EllipticError> {
    ensure!(
        u.is_finite() && (0.0..=1.0).contains(&m),
        DomainSnafu {
            function: "ellipj",
            args: [u, m, f64::NAN]
        }
    );

    if m < 1e-9 {
        let (t, b) = u.sin_cos();
        let ai = 0.25 * m * (u - t * b);
        return Ok(JacobiEllipticFunctions {
            sn: t - ai * b,
            cn: b + ai * t,
            dn: 1.0 - 0.5 * m * t * t,
            am: u - ai,
        });
    }

    if m >= 0.999_999_999_9 {
        let mut ai = 0.25 * (1.0 - m);
        let b = u.cosh();
        let t = u.tanh();
        let phi = 1.0 / b;
        let twon = b * u.sinh();
        let sn = t + ai * (twon - u) / (b * b);
        let am = 2.0 * u.exp().atan() - FRAC_PI_2 + ai * (twon - u) / b;
        ai *= t * phi;
        return Ok(JacobiEllipticFunctions {
            sn,
            cn: phi - ai * (twon - u),
            dn: phi + ai * (twon + u),
            am,
        });
    }

    let mut a = [0.0; MAX_AGM_ITERATIONS + 1];
    let mut c = [0.0; MAX_AGM_ITERATIONS + 1];
    a[0] = 1.0;
    c[0] = m.sqrt();
    let mut b = (1.0 - m).sqrt();
    let mut twon = 1.0;
    let mut i = 0;
    while (c[i] / a[i]).abs() > f64::EPSILON {
        ensure!(
            i < MAX_AGM_ITERATIONS,
            MaxIterationsSnafu {
                function: "ellipj",
                maxiter: MAX_AGM_ITERATIONS
            }
        );
        let ai = a[i];
        i += 1;
        c[i] = 0.5 * (ai - b);
        let t = (ai * b).sqrt();
        a[i] = 0.5 * (ai + b);
        b = t;
        twon *= 2.0;
    }

    // Backward recurrence on the amplitude
    let mut phi = twon * a[i] * u;
    let mut prev_phi = phi;
    while i > 0 {
        let t = c[i] * phi.sin() / a[i];
        prev_phi = phi;
        phi = 0.5 * (t.asin() + phi);
        i -= 1;
    }

    let (sn, cn) = phi.sin_cos();
    Ok(JacobiEllipticFunctions {
        sn,
        cn,
        dn: cn / (phi - prev_phi).cos(),
        am: phi,
    })
}
