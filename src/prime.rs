//! Prime capacities for the slot array.

/// Trial division by odd divisors up to `sqrt(n)`.
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3usize;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Smallest prime `>= n`, or `None` if it does not fit in a `usize`.
/// Requests below 2 yield 2.
pub fn next_prime(n: usize) -> Option<usize> {
    let mut p = n.max(2);
    while !is_prime(p) {
        p = p.checked_add(1)?;
    }
    Some(p)
}
