//! Error type shared by table construction and mutation.
//!
//! A missing key is never an error: `search` returns `None` and `delete`
//! returns `Ok(None)`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The slot array for a (re)allocation could not be reserved. The table
    /// keeps its previous contents.
    #[error("allocation failed: could not reserve {slots} slots")]
    AllocationFailed { slots: usize },

    /// Probing visited `size` slots without finding a free one. Only reachable
    /// when the double-hashing step is broken; distinct from a missing key.
    #[error("probe bound exceeded after {size} attempts; hashing step is degenerate")]
    ProbeExhausted { size: usize },

    #[error("invalid hash multipliers ({prime_1}, {prime_2}): both must be distinct primes")]
    InvalidMultipliers { prime_1: usize, prime_2: usize },

    #[error(
        "invalid resize policy (min base {min_base_size}, shrink below {shrink_below}%, \
         grow above {grow_above}%)"
    )]
    InvalidPolicy {
        min_base_size: usize,
        shrink_below: usize,
        grow_above: usize,
    },
}
