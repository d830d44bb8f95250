//! Relativistic velocity kick and trapezoidal drift
//!
//! Advances body velocities with Lorentz-style velocity addition instead of
//! naive summation, so sustained acceleration can never push a speed past
//! the propagation limit, then drifts positions with the average of the
//! pre- and post-kick velocities.
//!
//! The kick increment is `0.5 * (accel + accel_prev) * dt` - the midpoint
//! of this step's and the previous step's accumulated accelerations, a
//! leapfrog-like choice for second-order accuracy.

use super::params::SimParams;
use super::states::{NVec3, System};

/// Compose an existing velocity `u` with an increment `dv` using the
/// relativistic velocity-addition rule for propagation speed `c`.
///
/// `u` is split into components collinear and orthogonal to `dv`; the
/// collinear part composes with the scalar Lorentz formula while the
/// orthogonal part is contracted by `sqrt(1 - |dv|^2 / c^2)`:
///
/// `v' = (u_par + dv + u_perp * sqrt(1 - |dv|^2/c^2)) / (1 + dv . u_par / c^2)`
///
/// Requires `|u| < c`. An increment at or above `c` is rescaled to just
/// below it first so the square root stays real.
pub fn relativistic_add(u: NVec3, dv: NVec3, c: f64) -> NVec3 {
    let dv2 = dv.norm_squared();
    if dv2 == 0.0 {
        return u;
    }

    debug_assert!(u.norm_squared() < c * c, "prior speed must be below c");

    let inv_c2 = 1.0 / (c * c);

    // A close encounter can produce an increment at or past c, which would
    // make the contraction factor imaginary; pull it just inside the limit
    // instead of propagating NaN. The cap rescale below still applies.
    let (dv, dv2) = if dv2 * inv_c2 >= 1.0 {
        let scaled = dv * (0.999 * c / dv2.sqrt());
        (scaled, scaled.norm_squared())
    } else {
        (dv, dv2)
    };

    let u_par = dv * (u.dot(&dv) / dv2);
    let u_perp = u - u_par;
    let contraction = (1.0 - dv2 * inv_c2).sqrt();

    (u_par + dv + u_perp * contraction) / (1.0 + dv.dot(&u_par) * inv_c2)
}

/// Advance every body by one step of length `dt`: relativistic kick from
/// the midpoint acceleration, hard speed cap, trapezoidal position update.
/// Must run only after all pair accelerations for this step are accumulated.
pub fn advance_bodies(sys: &mut System, dt: f64, params: &SimParams) {
    let c = params.light_speed;
    let cap = params.max_speed_cap();

    for body in sys.bodies.iter_mut() {
        let v0 = body.v;
        let dv = 0.5 * (body.accel + body.accel_prev) * dt;

        if dv.norm_squared() > 0.0 {
            body.v = relativistic_add(v0, dv, c);

            // The composition keeps |v| < c but roundoff can still creep
            // past the configured cap; rescale uniformly onto it.
            let speed2 = body.v.norm_squared();
            if speed2 > cap * cap {
                body.v *= cap / speed2.sqrt();
            }

            debug_assert!(body.v.norm() < c, "post-kick speed must stay below c");
        }

        // Trapezoidal drift with the average of old and new velocity.
        body.x += dt * 0.5 * (v0 + body.v);
        body.accel_prev = body.accel;
    }
}
