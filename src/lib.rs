//! dh-table: a single-threaded open-addressing hash table using double
//! hashing, tombstone deletion and prime-sized resizing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small associative store whose probing and resizing rules are
//!   easy to check by hand.
//! - Layers, leaves first:
//!   - `prime`: `next_prime` turns a requested capacity into a prime slot
//!     count.
//!   - `hash`: two polynomial byte hashes with distinct prime multipliers
//!     give each key a start slot and a stride (`DoubleHash`).
//!   - `slot`: `Slot::{Empty, Tombstone, Occupied}`; the table owns every
//!     entry outright.
//!   - `table`: `Table<K, V>` with insert / search / delete.
//!   - `resize`: `ResizePolicy` thresholds and the rebuild that reinserts
//!     live entries into a fresh array.
//!
//! Constraints
//! - Single-threaded: mutation takes `&mut self`; share across threads only
//!   behind external locking such as a `Mutex`.
//! - Unique keys: inserting an existing key overwrites its value.
//! - Capacity is always prime and never below `next_prime(INITIAL_BASE_SIZE)`.
//! - Load (`len * 100 / size`) is pulled back into the policy band before
//!   each mutation: above 70% doubles the base size before an insert, below
//!   10% halves it before a delete.
//!
//! Probing
//! - Attempt `i` for a key lands on `(hash_a + i * (hash_b + 1)) mod size`.
//!   `hash_b` is reduced modulo `size - 1`, so the stride is in
//!   `[1, size - 1]`; with a prime size the first `size` attempts visit each
//!   slot exactly once. Probing is bounded at `size` attempts and an insert
//!   that finds no free slot returns `TableError::ProbeExhausted`.
//! - Search skips tombstones and stops at the first empty slot. Insert keeps
//!   scanning past tombstones until it finds the key or an empty slot, then
//!   reuses the first tombstone it passed.
//!
//! Resizing
//! - Rebuilds are stop-the-world and proportional to `len`. The fresh array
//!   is allocated and every entry's target slot reserved before anything
//!   moves, so an `AllocationFailed` leaves the table untouched.
//! - Tombstones are dropped by every rebuild. A table whose live entries plus
//!   tombstones exceed the grow threshold is rebuilt at its current size.
//!
//! Keys
//! - Hashing reads a stable byte view of the key (`KeyBytes`); equality
//!   comes from `Eq`. `String`, `str`, `Box<str>`, `Vec<u8>` and `[u8]`
//!   implement it, and lookups accept borrowed forms through `Borrow`.
//!   The default instantiation is `Table<String, String>`.
//!
//! Notes and non-goals
//! - No iteration, persistence, or concurrent access.
//! - Dropping the table releases every entry and the slot array.

pub mod error;
pub mod hash;
pub mod prime;
pub mod resize;
mod slot;
pub mod table;
mod table_proptest;

// Public surface
pub use error::TableError;
pub use hash::{DoubleHash, KeyBytes, PRIME_1, PRIME_2};
pub use prime::next_prime;
pub use resize::{ResizePolicy, INITIAL_BASE_SIZE};
pub use table::Table;
