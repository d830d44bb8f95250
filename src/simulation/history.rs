//! Fixed-depth trajectory history for the light-cone search
//!
//! `HistoryStore` is a ring buffer over *logical record indices*: record 0 is
//! the first sample ever taken, record k the k-th, and only the newest
//! `capacity` records stay retrievable. Storage is two parallel arenas
//! addressed modulo capacity:
//! - one shared `times` array (simulation time each record was taken),
//! - one position array per body.
//!
//! Contract:
//! - `times` is non-decreasing along logical record index
//! - valid reads span `[floor_index(), last_index()]`; the eviction policy
//!   is overwrite-oldest, and call sites clamp indices to the floor rather
//!   than treating an evicted read as an error
//!
//! Recording is decimated by the driver: one record every
//! `record_step_interval` integration steps, so all steps between two record
//! boundaries share one sample.

use super::states::NVec3;

#[derive(Debug, Clone)]
pub struct HistoryStore {
    capacity: usize, // ring depth (max retained records)
    times: Vec<f64>, // times[r % capacity] = sim time of record r
    positions: Vec<Vec<NVec3>>, // positions[body][r % capacity]
    record_count: usize, // logical records written so far
}

impl HistoryStore {
    /// Empty store sized for `body_count` bodies and `capacity` records each.
    pub fn new(body_count: usize, capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            capacity,
            times: vec![0.0; capacity],
            positions: vec![vec![NVec3::zeros(); capacity]; body_count],
            record_count: 0,
        }
    }

    /// Number of bodies this store tracks.
    pub fn body_count(&self) -> usize {
        self.positions.len()
    }

    /// Ring depth.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Logical records written so far (not capped by capacity).
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// True before the first `record` call.
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Newest valid logical record index. Call only when non-empty.
    pub fn last_index(&self) -> usize {
        debug_assert!(!self.is_empty());
        self.record_count - 1
    }

    /// Oldest still-retained logical record index.
    pub fn floor_index(&self) -> usize {
        self.record_count.saturating_sub(self.capacity)
    }

    /// Append one observation for every body at the next logical record
    /// index, evicting the oldest record when the ring is full.
    /// `positions` must yield exactly `body_count()` items in body order.
    pub fn record(&mut self, time: f64, positions: impl IntoIterator<Item = NVec3>) {
        let slot = self.record_count % self.capacity;
        debug_assert!(self.is_empty() || time >= self.times[(self.record_count - 1) % self.capacity]);

        self.times[slot] = time;
        let mut written = 0;
        for (body, pos) in self.positions.iter_mut().zip(positions) {
            body[slot] = pos;
            written += 1;
        }
        debug_assert_eq!(written, self.positions.len());

        self.record_count += 1;
    }

    /// Simulation time of logical record `index`, clamped into the retained
    /// window. Reads older than the floor return the floor sample.
    pub fn time_at(&self, index: usize) -> f64 {
        self.times[self.slot_of(index)]
    }

    /// Recorded position of `body` at logical record `index`, clamped into
    /// the retained window.
    pub fn position_at(&self, body: usize, index: usize) -> NVec3 {
        self.positions[body][self.slot_of(index)]
    }

    fn slot_of(&self, index: usize) -> usize {
        debug_assert!(!self.is_empty());
        let clamped = index.clamp(self.floor_index(), self.last_index());
        clamped % self.capacity
    }
}
