//! BLR linearity testing.
//!
//! Estimates `Pr[f(x)·f(y) = f(x·y)]` over uniform `x, y ∈ {-1,+1}^n` by
//! evaluating the Fourier expansion. The probability is exactly 1 when `f` is
//! a signed character `±χ_S` and strictly smaller otherwise.
//!
//! Grid points are drawn as row indices: row `r` is the point whose variable
//! `i` is bit `n-1-i` of `r` (`0 → +1`), and the coordinatewise product of two
//! points is the row `r_x ^ r_y`.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::One;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::Serialize;

use crate::logging;
use crate::spectral::FourierPolynomial;

pub const DEFAULT_SAMPLES: usize = 10;
pub const DEFAULT_SEED: u64 = 42;

/// Fraction of `samples` random trials in which `f(x)·f(y) = f(x·y)`.
///
/// Pairs are drawn sequentially from `rng`, so a seeded generator gives a
/// reproducible estimate; the trials themselves are evaluated in parallel.
/// `samples == 0` returns `0.0`.
///
/// ```
/// use boolean_spectral_core::{linearity::test_linearity, BooleanFunction, FourierPolynomial};
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256PlusPlus;
///
/// let xor = BooleanFunction::from_bits(&[0, 1, 1, 0], 2).unwrap();
/// let poly = FourierPolynomial::from_function(&xor);
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
/// assert_eq!(test_linearity(&poly, 25, &mut rng), 1.0);
/// ```
pub fn test_linearity<R: Rng>(poly: &FourierPolynomial, samples: usize, rng: &mut R) -> f64 {
    if samples == 0 {
        return 0.0;
    }
    accepted_trials(poly, samples, rng) as f64 / samples as f64
}

fn accepted_trials<R: Rng>(poly: &FourierPolynomial, samples: usize, rng: &mut R) -> usize {
    let rows = poly.len();
    let pairs: Vec<(usize, usize)> = (0..samples)
        .map(|_| (rng.random_range(0..rows), rng.random_range(0..rows)))
        .collect();

    pairs
        .par_iter()
        .filter(|&&(x, y)| blr_holds(poly, x, y))
        .count()
}

/// `f(x)·f(y) = f(x·y)`, checked on values scaled by `2^n`.
fn blr_holds(poly: &FourierPolynomial, x: usize, y: usize) -> bool {
    let fx = poly.evaluate_row_scaled(x);
    let fy = poly.evaluate_row_scaled(y);
    let fxy = poly.evaluate_row_scaled(x ^ y);
    fx * fy == fxy * poly.len() as i128
}

/// Whether the expansion is a single signed character `±χ_S`.
pub fn is_character(poly: &FourierPolynomial) -> bool {
    let full = poly.len() as i64;
    let mut nonzero = poly.walsh_values().iter().filter(|&&w| w != 0);
    matches!(
        (nonzero.next(), nonzero.next()),
        (Some(&w), None) if w.abs() == full
    )
}

/// Exact BLR acceptance probability `1/2 + 1/2·Σ_S f̂(S)^3`.
pub fn exact_linearity_acceptance(poly: &FourierPolynomial) -> BigRational {
    let half = BigRational::new(BigInt::one(), BigInt::from(2));
    let cube_scale = BigInt::one() << (3 * poly.num_variables());
    half.clone() + half * BigRational::new(BigInt::from(cube_sum(poly)), cube_scale)
}

/// `Σ_S W(S)^3`, i.e. `8^n·Σ_S f̂(S)^3`.
fn cube_sum(poly: &FourierPolynomial) -> i128 {
    poly.walsh_values()
        .par_iter()
        .map(|&w| {
            let w = w as i128;
            w * w * w
        })
        .sum()
}

/// Seeded Monte-Carlo linearity tester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinearityTester {
    pub samples: usize,
    pub seed: u64,
}

impl LinearityTester {
    pub fn new(samples: usize, seed: u64) -> Self {
        Self { samples, seed }
    }

    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run with a fresh generator seeded from [`LinearityTester::seed`].
    pub fn run(&self, poly: &FourierPolynomial) -> f64 {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        self.run_with_rng(poly, &mut rng)
    }

    pub fn run_with_rng<R: Rng>(&self, poly: &FourierPolynomial, rng: &mut R) -> f64 {
        test_linearity(poly, self.samples, rng)
    }

    /// Estimate alongside the exact acceptance probability.
    pub fn report(&self, poly: &FourierPolynomial) -> LinearityReport {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        let accepted = accepted_trials(poly, self.samples, &mut rng);
        let estimate = if self.samples == 0 {
            0.0
        } else {
            accepted as f64 / self.samples as f64
        };
        let cubes = cube_sum(poly) as f64 / 2f64.powi(3 * poly.num_variables() as i32);

        let report = LinearityReport {
            samples: self.samples,
            seed: self.seed,
            accepted,
            estimate,
            exact: 0.5 + 0.5 * cubes,
            is_character: is_character(poly),
        };
        logging::record("linearity_test", &report);
        report
    }
}

impl Default for LinearityTester {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            seed: DEFAULT_SEED,
        }
    }
}

/// Outcome of [`LinearityTester::report`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearityReport {
    pub samples: usize,
    pub seed: u64,
    pub accepted: usize,
    pub estimate: f64,
    pub exact: f64,
    pub is_character: bool,
}
