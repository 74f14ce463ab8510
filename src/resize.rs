//! Resize policy: load-factor thresholds and rebuild-by-reinsertion.
//!
//! Load is measured in whole percent, `count * 100 / size`. Before an insert a
//! load above `grow_above` doubles `base_size`; before a delete a load below
//! `shrink_below` halves it. Requests under `min_base_size` are ignored, so the
//! table never shrinks below `next_prime(min_base_size)` slots.
//!
//! A rebuild reinserts every live entry into a fresh prime-sized array, which
//! rehashes them for the new size and drops all tombstones. It is planned
//! before anything moves: the fresh array is allocated and every target slot
//! is reserved first, so an allocation or probing failure leaves the table
//! exactly as it was.

use crate::error::TableError;
use crate::hash::KeyBytes;
use crate::slot::{alloc_slots, slot_count, Slot};
use crate::table::Table;
use log::{debug, trace};

/// Capacity floor; the smallest `base_size` a table is ever built with.
pub const INITIAL_BASE_SIZE: usize = 53;
/// Shrink when load drops below this percentage.
pub const SHRINK_BELOW_PERCENT: usize = 10;
/// Grow when load exceeds this percentage.
pub const GROW_ABOVE_PERCENT: usize = 70;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResizePolicy {
    min_base_size: usize,
    shrink_below: usize,
    grow_above: usize,
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self {
            min_base_size: INITIAL_BASE_SIZE,
            shrink_below: SHRINK_BELOW_PERCENT,
            grow_above: GROW_ABOVE_PERCENT,
        }
    }
}

impl ResizePolicy {
    /// Thresholds must leave room between them: after a grow the load roughly
    /// halves and after a shrink it roughly doubles, so `shrink_below * 2` has to
    /// stay under `grow_above` or the table would oscillate.
    pub fn new(
        min_base_size: usize,
        shrink_below: usize,
        grow_above: usize,
    ) -> Result<Self, TableError> {
        if min_base_size < 2 || grow_above >= 100 || shrink_below * 2 >= grow_above {
            return Err(TableError::InvalidPolicy {
                min_base_size,
                shrink_below,
                grow_above,
            });
        }
        Ok(Self {
            min_base_size,
            shrink_below,
            grow_above,
        })
    }

    pub fn min_base_size(&self) -> usize {
        self.min_base_size
    }

    pub fn shrink_below(&self) -> usize {
        self.shrink_below
    }

    pub fn grow_above(&self) -> usize {
        self.grow_above
    }

    /// Target `base_size` to rebuild at before an insert, if any. Growth wins;
    /// otherwise a table clogged with tombstones is rebuilt at its current base.
    pub(crate) fn before_insert(
        &self,
        count: usize,
        tombstones: usize,
        size: usize,
        base_size: usize,
    ) -> Option<usize> {
        if load_percent(count, size) > self.grow_above {
            return Some(base_size.saturating_mul(2));
        }
        if load_percent(count + tombstones, size) > self.grow_above {
            return Some(base_size);
        }
        None
    }

    pub(crate) fn before_delete(&self, count: usize, size: usize, base_size: usize) -> Option<usize> {
        if load_percent(count, size) < self.shrink_below {
            return Some(base_size / 2);
        }
        None
    }
}

pub(crate) fn load_percent(count: usize, size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    count.saturating_mul(100) / size
}

impl<K, V> Table<K, V> {
    /// Rebuild the table at `next_prime(new_base_size)` slots.
    ///
    /// Requests below the policy's floor are ignored. Fails without touching
    /// the table if the new array cannot be allocated (including sizes no
    /// allocator could satisfy) or cannot hold every live entry.
    pub fn resize(&mut self, new_base_size: usize) -> Result<(), TableError>
    where
        K: KeyBytes,
    {
        if new_base_size < self.policy.min_base_size() {
            trace!(
                "ignoring resize to base {} (floor {})",
                new_base_size,
                self.policy.min_base_size()
            );
            return Ok(());
        }
        let new_size = slot_count::<K, V>(new_base_size)?;
        let mut fresh: Vec<Slot<K, V>> = alloc_slots(new_size)?;
        let mut plan: Vec<(usize, usize)> = Vec::new();
        plan.try_reserve_exact(self.count)
            .map_err(|_| TableError::AllocationFailed { slots: self.count })?;

        // Keys are unique, so each entry takes the first empty slot of its new
        // probe sequence. Reserved slots are marked with tombstones until the
        // move below fills them.
        for (from, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied(entry) = slot {
                let to = self
                    .hasher
                    .probe_seq(&entry.key, new_size)
                    .find(|&i| matches!(fresh[i], Slot::Empty))
                    .ok_or(TableError::ProbeExhausted { size: new_size })?;
                fresh[to] = Slot::Tombstone;
                plan.push((from, to));
            }
        }

        for (from, to) in plan {
            fresh[to] = std::mem::take(&mut self.slots[from]);
        }

        debug!(
            "resized table: size {} -> {}, base {} -> {}, {} entries, {} tombstones dropped",
            self.slots.len(),
            new_size,
            self.base_size,
            new_base_size,
            self.count,
            self.tombstones
        );
        self.slots = fresh;
        self.base_size = new_base_size;
        self.tombstones = 0;
        Ok(())
    }
}
