//! Retarded Newtonian gravity with softening
//!
//! The classic pairwise attraction, except each target body pulls toward
//! every other body's *retarded* position as resolved by the light-cone
//! search, not its instantaneous one. The loop visits every directed pair
//! (target, source) exactly once per step, so unlike the symmetric
//! instantaneous case the two directions of a pair resolve independently:
//! each sees the other at a different past moment.

use super::history::HistoryStore;
use super::lightcone::{resolve_retarded, PairCache, PairCursor};
use super::params::SimParams;
use super::states::{NVec3, System};

/// Directed pairwise retarded gravity.
///
/// Accumulation is the first phase of a step: it only reads body positions
/// (frozen as of step start) and the history, and writes `out[target]`, so
/// no body state mutates until every pair has been resolved.
pub struct RetardedGravity {
    pub grav_const: f64, // gravitational constant G
    pub softening: f64, // epsilon added to d^3, keeps near-zero separations finite
}

impl RetardedGravity {
    pub fn from_params(params: &SimParams) -> Self {
        Self {
            grav_const: params.grav_const,
            softening: params.softening,
        }
    }

    /// Accumulate accelerations for all bodies at time `now` into `out`.
    /// `out` is zeroed first; pairs without a causally valid sample (cold
    /// start, degenerate bracket) contribute nothing this step.
    pub fn accumulate(
        &self,
        sys: &System,
        history: &HistoryStore,
        cache: &mut PairCache,
        params: &SimParams,
        now: f64,
        out: &mut [NVec3],
    ) {
        let n = sys.bodies.len();
        debug_assert_eq!(out.len(), n);

        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }

        for target in 0..n {
            let p_t = sys.bodies[target].x;

            for source in 0..n {
                if source == target {
                    continue;
                }

                let resolved = resolve_retarded(
                    history,
                    source,
                    p_t,
                    now,
                    params.light_speed,
                    params.interp_refine_steps,
                    cache.get(target, source),
                );

                let Some(ret) = resolved else {
                    continue;
                };
                cache.set(
                    target,
                    source,
                    PairCursor {
                        last_record_idx: ret.record_idx,
                        alpha: ret.alpha,
                    },
                );

                // a += G * m_s * (p_s - p_t) / (d^3 + eps)
                //
                // The softened denominator bounds the attraction when the
                // retarded position lands on top of the target.
                let r = ret.position - p_t;
                let d = r.norm();
                let coef = self.grav_const * sys.bodies[source].m / (d * d * d + self.softening);

                out[target] += coef * r;
            }
        }
    }
}
