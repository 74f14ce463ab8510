//! Entry and slot representation.

use crate::error::TableError;
use crate::prime::next_prime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
}

/// State of one cell in the slot array. A `Tombstone` marks a deleted entry so
/// probe chains running through it stay intact until the next rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied(Entry<K, V>),
}

impl<K, V> Default for Slot<K, V> {
    fn default() -> Self {
        Slot::Empty
    }
}

/// Largest slot array the allocator could ever hand out for this entry type.
pub(crate) fn max_slots<K, V>() -> usize {
    isize::MAX as usize / core::mem::size_of::<Slot<K, V>>().max(1)
}

/// Prime slot count for `base_size`. Requests that could never be allocated
/// are rejected before the prime search runs.
pub(crate) fn slot_count<K, V>(base_size: usize) -> Result<usize, TableError> {
    let too_big = TableError::AllocationFailed { slots: base_size };
    if base_size > max_slots::<K, V>() {
        return Err(too_big);
    }
    next_prime(base_size).ok_or(too_big)
}

/// `len` empty slots, allocated infallibly like any std collection.
pub(crate) fn empty_slots<K, V>(len: usize) -> Vec<Slot<K, V>> {
    let mut slots = Vec::with_capacity(len);
    slots.resize_with(len, Slot::default);
    slots
}

/// Allocate `len` empty slots, reporting allocation failure instead of aborting.
pub(crate) fn alloc_slots<K, V>(len: usize) -> Result<Vec<Slot<K, V>>, TableError> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(len)
        .map_err(|_| TableError::AllocationFailed { slots: len })?;
    slots.resize_with(len, Slot::default);
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_slots_are_empty() {
        let slots: Vec<Slot<String, String>> = alloc_slots(53).unwrap();
        assert_eq!(slots.len(), 53);
        assert!(slots.iter().all(|s| *s == Slot::Empty));
    }

    #[test]
    fn slot_count_rejects_impossible_requests() {
        assert_eq!(slot_count::<String, String>(106), Ok(107));
        assert_eq!(
            slot_count::<String, String>(usize::MAX),
            Err(TableError::AllocationFailed { slots: usize::MAX })
        );
        let over = max_slots::<String, String>() + 1;
        assert_eq!(
            slot_count::<String, String>(over),
            Err(TableError::AllocationFailed { slots: over })
        );
    }

    #[test]
    fn oversized_allocation_reports_error() {
        let res: Result<Vec<Slot<String, String>>, _> = alloc_slots(usize::MAX / 2);
        assert_eq!(
            res,
            Err(TableError::AllocationFailed {
                slots: usize::MAX / 2
            })
        );
    }
}
