//! Satellite registry.
//!
//! A fixed-capacity arena of tracked-object slots. The bound is a
//! compile-time constant so steady-state tracking never allocates, and the
//! registry is an explicitly constructed value passed by reference rather
//! than process-global state.

use crate::propagation::Satellite;
use crate::{EciPosition, GroundTrackError, GroundTrackResult};

/// Maximum number of tracked objects.
pub const MAX_TRACKED: usize = 3;

/// Outcome of one batch propagation.
///
/// `slots` is the number of entries written to the output buffer (the
/// registry's high-water mark at call time). `failed[i]` marks slots whose
/// propagation failed this batch; their output entry holds a zero vector and
/// the presentation layer is expected to skip them for the cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOutcome {
    pub slots: usize,
    pub failed: [bool; MAX_TRACKED],
}

/// Fixed-capacity collection of satellite handles.
///
/// Each slot either owns exactly one handle or is empty. `count` is the
/// high-water mark of occupied indices, not a dense count: indices >= count
/// are always empty, but indices below it may be empty after a `take`.
/// Slot reuse is by first-empty-slot scan, never compaction, so an object's
/// index stays stable for its whole registration.
pub struct SatRegistry<S> {
    slots: [Option<S>; MAX_TRACKED],
    count: usize,
}

impl<S> Default for SatRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SatRegistry<S> {
    pub fn new() -> Self {
        SatRegistry {
            slots: std::array::from_fn(|_| None),
            count: 0,
        }
    }

    /// High-water mark of occupied slot indices.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Registers a handle in the first empty slot, transferring ownership to
    /// the registry. Returns the slot index, or `NoFreeSlots` at capacity.
    pub fn add(&mut self, sat: S) -> GroundTrackResult<usize> {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(sat);
                self.count = self.count.max(index + 1);
                return Ok(index);
            }
        }
        Err(GroundTrackError::NoFreeSlots)
    }

    /// Bounds-checked lookup. An empty slot or out-of-range index is absent,
    /// not an error.
    pub fn get(&self, index: usize) -> Option<&S> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Transfers ownership of a handle back out, leaving a hole. The
    /// high-water mark is unchanged; the slot is reused by the next `add`.
    pub fn take(&mut self, index: usize) -> Option<S> {
        self.slots.get_mut(index).and_then(|slot| slot.take())
    }

    /// Empties every slot, dropping all owned handles.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.count = 0;
    }
}

impl<S: Satellite> SatRegistry<S> {
    /// Propagates every occupied slot below the high-water mark for the
    /// given instant, writing one ECI position per slot into `out`.
    ///
    /// Empty slots produce a zero vector. A slot whose propagation fails is
    /// recorded in the outcome's `failed` mask (with a zero vector written)
    /// and the batch continues with the remaining slots; a single decayed or
    /// diverging object must not stall the rest of the cycle. Zero
    /// registered objects is success with zero entries written.
    ///
    /// Fails with `InvalidSize` when `out` holds fewer than `count` entries.
    pub fn propagate_all(
        &self,
        unix_time_sec: i64,
        out: &mut [EciPosition],
    ) -> GroundTrackResult<BatchOutcome> {
        if out.len() < self.count {
            return Err(GroundTrackError::InvalidSize {
                needed: self.count,
                got: out.len(),
            });
        }

        let mut outcome = BatchOutcome {
            slots: self.count,
            ..BatchOutcome::default()
        };

        for index in 0..self.count {
            out[index] = EciPosition::ZERO;
            let Some(sat) = self.get(index) else {
                continue;
            };
            match sat.position_at(unix_time_sec) {
                Ok(eci) => out[index] = eci,
                Err(e) => {
                    log::warn!("Propagation failed for slot {index}: {e}");
                    outcome.failed[index] = true;
                }
            }
        }

        Ok(outcome)
    }
}
