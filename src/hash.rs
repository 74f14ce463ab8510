//! Polynomial string hashing and the double-hashing probe sequence.
//!
//! Two polynomial hashes over the key's bytes, using distinct prime
//! multipliers, give a start slot (`hash_a`) and a key-dependent stride
//! (`hash_b + 1`). `hash_b` is reduced modulo `num_buckets - 1`, so the stride
//! lies in `[1, num_buckets - 1]`: it is never congruent to zero, and for a
//! prime `num_buckets` it is coprime with it, so the first `num_buckets`
//! attempts visit every slot exactly once.

use crate::error::TableError;
use crate::prime::is_prime;

/// Multiplier for the start-slot hash.
pub const PRIME_1: usize = 151;
/// Multiplier for the stride hash. Must differ from `PRIME_1`.
pub const PRIME_2: usize = 163;

/// Stable byte view of a key. Equal keys must expose equal bytes, and the
/// bytes of a key must not change while it is stored.
pub trait KeyBytes {
    fn key_bytes(&self) -> &[u8];
}

impl KeyBytes for str {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl KeyBytes for String {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl KeyBytes for Box<str> {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl KeyBytes for [u8] {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl KeyBytes for Vec<u8> {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        self
    }
}

impl<T: KeyBytes + ?Sized> KeyBytes for &T {
    #[inline]
    fn key_bytes(&self) -> &[u8] {
        (**self).key_bytes()
    }
}

/// `Σ byte_i * multiplier^(len-1-i) mod modulus`, reduced at every step.
/// Returns 0 when `modulus` is 0 or 1.
pub fn hash(bytes: &[u8], multiplier: usize, modulus: usize) -> usize {
    if modulus <= 1 {
        return 0;
    }
    let m = modulus as u128;
    let a = multiplier as u128 % m;
    let mut h: u128 = 0;
    for &b in bytes {
        h = (h * a + b as u128) % m;
    }
    h as usize
}

/// The pair of multipliers driving the probe sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DoubleHash {
    prime_1: usize,
    prime_2: usize,
}

impl Default for DoubleHash {
    fn default() -> Self {
        Self {
            prime_1: PRIME_1,
            prime_2: PRIME_2,
        }
    }
}

impl DoubleHash {
    /// Both multipliers must be prime and distinct; small illustrative pairs
    /// such as `(1, 2)` are rejected.
    pub fn new(prime_1: usize, prime_2: usize) -> Result<Self, TableError> {
        if prime_1 == prime_2 || !is_prime(prime_1) || !is_prime(prime_2) {
            return Err(TableError::InvalidMultipliers { prime_1, prime_2 });
        }
        Ok(Self { prime_1, prime_2 })
    }

    pub fn prime_1(&self) -> usize {
        self.prime_1
    }

    pub fn prime_2(&self) -> usize {
        self.prime_2
    }

    #[inline]
    fn start_and_step(&self, bytes: &[u8], num_buckets: usize) -> (usize, usize) {
        let start = hash(bytes, self.prime_1, num_buckets);
        let step = hash(bytes, self.prime_2, num_buckets.saturating_sub(1).max(1)) + 1;
        (start, step)
    }

    /// Slot index for the `attempt`-th probe of `key` in a table of
    /// `num_buckets` slots.
    pub fn probe<Q>(&self, key: &Q, num_buckets: usize, attempt: usize) -> usize
    where
        Q: ?Sized + KeyBytes,
    {
        if num_buckets == 0 {
            return 0;
        }
        let (start, step) = self.start_and_step(key.key_bytes(), num_buckets);
        let n = num_buckets as u128;
        ((start as u128 + (attempt as u128 % n) * step as u128) % n) as usize
    }

    /// The first `num_buckets` probe indices for `key`, hashing it once.
    pub fn probe_seq<Q>(&self, key: &Q, num_buckets: usize) -> ProbeSeq
    where
        Q: ?Sized + KeyBytes,
    {
        let (start, step) = if num_buckets == 0 {
            (0, 1)
        } else {
            self.start_and_step(key.key_bytes(), num_buckets)
        };
        ProbeSeq {
            pos: start,
            step: step % num_buckets.max(1),
            size: num_buckets,
            remaining: num_buckets,
        }
    }
}

/// Iterator over a key's probe indices; yields at most `size` items.
#[derive(Clone, Debug)]
pub struct ProbeSeq {
    pos: usize,
    step: usize,
    size: usize,
    remaining: usize,
}

impl Iterator for ProbeSeq {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let cur = self.pos;
        // pos and step are both < size, so the sum cannot overflow past 2*size.
        self.pos = cur + self.step;
        if self.pos >= self.size {
            self.pos -= self.size;
        }
        Some(cur)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSeq {}
