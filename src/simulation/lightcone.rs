//! Light-cone search: retarded positions over recorded trajectories
//!
//! For a target body at position `p_t` and simulation time `t`, a source
//! body's *retarded* position is where the source was when a signal moving
//! at `light_speed` would have left it to arrive at the target now. With the
//! source's trajectory stored as discrete records, the crossing sits between
//! two adjacent records and is found with the signed weight
//!
//! `w(r) = (c * (t - time[r]))^2 - |p_t - pos[r]|^2`
//!
//! which is positive for records whose signal has already arrived (old
//! enough) and negative for records it has not (too recent). The crossing is
//! the bracket `[r, r+1]` where `w` changes sign.
//!
//! `PairCache` remembers the last bracket per ordered (target, source) pair
//! so the per-step search is a one-or-two slot slide instead of a fresh
//! bisection (amortized O(1) per pair per step).

use super::history::HistoryStore;
use super::states::NVec3;

/// Denominator floor below which a secant step is considered degenerate.
const WEIGHT_EPS: f64 = 1.0e-12;

/// Cached search state for one ordered (target, source) pair.
#[derive(Debug, Clone, Copy)]
pub struct PairCursor {
    pub last_record_idx: usize, // lower slot of the last resolved bracket
    pub alpha: f64, // fraction in [0,1] between that slot and the next
}

/// Per-ordered-pair cursor table, keyed by `target * n + source`.
/// Entries are created lazily on first resolution and live until the next
/// `respawn` resizes the table.
#[derive(Debug, Clone)]
pub struct PairCache {
    cursors: Vec<Option<PairCursor>>,
    body_count: usize,
}

impl PairCache {
    pub fn new(body_count: usize) -> Self {
        Self {
            cursors: vec![None; body_count * body_count],
            body_count,
        }
    }

    pub fn get(&self, target: usize, source: usize) -> Option<PairCursor> {
        self.cursors[target * self.body_count + source]
    }

    pub fn set(&mut self, target: usize, source: usize, cursor: PairCursor) {
        self.cursors[target * self.body_count + source] = Some(cursor);
    }
}

/// A resolved retarded observation of a source body.
#[derive(Debug, Clone, Copy)]
pub struct Retarded {
    pub position: NVec3, // interpolated retarded position
    pub record_idx: usize, // lower slot of the bracket used
    pub alpha: f64, // interpolation fraction within the bracket
}

/// Resolve the retarded position of `source` as seen from `target_pos` at
/// time `now`.
///
/// Returns `None` when the pair has no causally valid sample this step:
/// empty history, a cold start where no recorded signal has arrived yet, or
/// a degenerate bracket whose interpolation would not be finite. Callers
/// treat `None` as a zero acceleration contribution.
pub fn resolve_retarded(
    history: &HistoryStore,
    source: usize,
    target_pos: NVec3,
    now: f64,
    light_speed: f64,
    refine_steps: u32,
    cursor: Option<PairCursor>,
) -> Option<Retarded> {
    if history.is_empty() {
        return None;
    }

    let floor = history.floor_index();
    let last = history.last_index();

    let weight = |r: usize| -> f64 {
        let past = now - history.time_at(r);
        let dist2 = (target_pos - history.position_at(source, r)).norm_squared();
        (light_speed * past).powi(2) - dist2
    };

    // Even the oldest retained record is still outside the light cone: the
    // crossing lies in evicted (or never-recorded) history. Transient near
    // simulation start, permanent only if the window is far too shallow.
    if weight(floor) <= 0.0 {
        return None;
    }

    // Every record has already been overtaken by its signal; the crossing is
    // between the newest record and now. Clamp to the newest sample.
    if weight(last) > 0.0 {
        return Some(Retarded {
            position: history.position_at(source, last),
            record_idx: last,
            alpha: 1.0,
        });
    }

    // Locate the lower bracket slot: the newest record with w > 0.
    let lower = match cursor {
        // Warm path: slide the cached bracket. Between steps the crossing
        // moves by at most a few slots, forward in the common case and
        // backward when a large dt overshot the cursor.
        Some(c) if c.last_record_idx >= floor => {
            let mut lo = c.last_record_idx.min(last - 1);
            while lo + 1 < last && weight(lo + 1) > 0.0 {
                lo += 1;
            }
            while lo > floor && weight(lo) <= 0.0 {
                lo -= 1;
            }
            if weight(lo) <= 0.0 {
                return None;
            }
            lo
        }
        // Cold path: the predicate "signal already arrived" is monotone
        // along the window, so bisect for the first record where it fails.
        _ => bisect_first(floor + 1, last, |r| weight(r) <= 0.0) - 1,
    };
    debug_assert!(lower >= floor && lower < last);

    // Secant interpolation of the zero crossing inside [lower, lower+1].
    // Anchors are fractions within the bracket together with their weights;
    // w is positive on the lower anchor and non-positive on the upper one.
    let t_lo = history.time_at(lower);
    let t_hi = history.time_at(lower + 1);
    let p_lo = history.position_at(source, lower);
    let p_hi = history.position_at(source, lower + 1);

    let weight_at = |f: f64| -> f64 {
        let t = t_lo + (t_hi - t_lo) * f;
        let p = p_lo + (p_hi - p_lo) * f;
        (light_speed * (now - t)).powi(2) - (target_pos - p).norm_squared()
    };

    let mut f_lo = 0.0;
    let mut w_lo = weight(lower);
    let mut f_hi = 1.0;
    let mut w_hi = weight(lower + 1);

    let mut alpha = secant(f_lo, w_lo, f_hi, w_hi)?;
    for _ in 0..refine_steps {
        let w_a = weight_at(alpha);
        if w_a > 0.0 {
            f_lo = alpha;
            w_lo = w_a;
        } else {
            f_hi = alpha;
            w_hi = w_a;
        }
        match secant(f_lo, w_lo, f_hi, w_hi) {
            Some(a) => alpha = a,
            None => break, // bracket contracted to numerical noise; keep last alpha
        }
    }

    if !alpha.is_finite() {
        return None;
    }
    let alpha = alpha.clamp(0.0, 1.0);

    // lower has not reached `last`, so the cursor can only ratchet within
    // the valid range and the retarded sample stays causally consistent.
    Some(Retarded {
        position: p_lo + (p_hi - p_lo) * alpha,
        record_idx: lower,
        alpha,
    })
}

/// One secant step toward the zero of the weight between two anchors.
/// `None` when the weights are too close for the division to be meaningful.
fn secant(f_lo: f64, w_lo: f64, f_hi: f64, w_hi: f64) -> Option<f64> {
    let denom = w_lo - w_hi;
    if denom.abs() < WEIGHT_EPS || !denom.is_finite() {
        return None;
    }
    Some(f_lo + (f_hi - f_lo) * w_lo / denom)
}

/// Smallest index in `[start, end]` where `pred` holds, or `end + 1` if it
/// never does. `pred` must be monotone (false.. then true..) on the range.
fn bisect_first(start: usize, end: usize, pred: impl Fn(usize) -> bool) -> usize {
    let mut lo = start;
    let mut hi = end + 1;
    while lo != hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}
