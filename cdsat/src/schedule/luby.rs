//! The Luby sequence, used to scale restart and forget intervals.

/// The `i`-th term (1-based) of the Luby sequence.
///
/// Defined recursively: if `i + 1` is a power of two, `2^k`, the term is `2^(k-1)`; otherwise it
/// is the same as term `i - 2^(k-1) + 1`, where `2^k` is the smallest power of two greater than
/// `i`.
///
/// The first terms are `1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, ...`.
pub fn luby(i: u64) -> u64 {
    debug_assert!(i >= 1);

    let mut k = 1u32;
    while (1u64 << k) < i + 1 {
        k += 1;
    }

    if i + 1 == (1u64 << k) {
        1u64 << (k - 1)
    } else {
        luby(i - (1u64 << (k - 1)) + 1)
    }
}
