//! Walsh–Hadamard transform over ±1 truth tables.
//!
//! With `f` indexed by row and a subset `S` encoded as a mask over the same
//! bit positions, `W(S) = Σ_r f[r]·(-1)^{popcount(r & S)}` and the Fourier
//! coefficient is `W(S) / 2^n`.

use rayon::prelude::*;

/// Table length from which butterfly stages run on the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 1 << 14;

/// In-place unnormalised fast Walsh–Hadamard transform, `O(n·2^n)`.
///
/// `values.len()` must be a power of two.
///
/// ```
/// use boolean_spectral_core::spectral::walsh::fast_walsh_hadamard;
///
/// let mut xor = vec![1, -1, -1, 1];
/// fast_walsh_hadamard(&mut xor);
/// assert_eq!(xor, vec![0, 0, 0, 4]);
/// ```
pub fn fast_walsh_hadamard(values: &mut [i64]) {
    let len = values.len();
    debug_assert!(len.is_power_of_two(), "transform length must be 2^n");

    let mut half = 1;
    while half < len {
        let block = half * 2;
        if len >= PARALLEL_THRESHOLD {
            values
                .par_chunks_mut(block)
                .for_each(|chunk| butterfly(chunk, half));
        } else {
            values
                .chunks_mut(block)
                .for_each(|chunk| butterfly(chunk, half));
        }
        half = block;
    }
}

#[inline]
fn butterfly(chunk: &mut [i64], half: usize) {
    let (lo, hi) = chunk.split_at_mut(half);
    for (a, b) in lo.iter_mut().zip(hi.iter_mut()) {
        let (x, y) = (*a, *b);
        *a = x + y;
        *b = x - y;
    }
}

/// Character sign `χ_S` at `row`.
#[inline]
pub fn character(subset: usize, row: usize) -> i64 {
    if (subset & row).count_ones() % 2 == 0 {
        1
    } else {
        -1
    }
}

/// Closed-form `Σ_x f(x)·χ_S(x)` for a single subset, `O(2^n)`.
pub fn walsh_sum(outputs: &[i8], subset: usize) -> i64 {
    outputs
        .iter()
        .enumerate()
        .map(|(row, &value)| value as i64 * character(subset, row))
        .sum()
}
