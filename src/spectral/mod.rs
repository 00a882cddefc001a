//! Fourier–Walsh analysis of Boolean functions.
//!
//! Builds the multilinear expansion of a ±1 truth table with a fast
//! Walsh–Hadamard transform and derives weight, influence, variance and noise
//! sensitivity statistics from it.

pub mod polynomial;
pub mod statistics;
pub mod walsh;

pub use polynomial::FourierPolynomial;
pub use statistics::{
    influence, influence_at_order, noise_sensitivity, parseval_sum, total_influence,
    total_influence_by_degree, variance, weight_at_degree, weight_spectrum, NoisePoint,
    SpectralStatistics, SpectralSummary,
};
pub use walsh::fast_walsh_hadamard;
