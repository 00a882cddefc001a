//! Spectral statistics derived from a Fourier expansion.
//!
//! Every quantity is a sum of squared coefficients. Squares are accumulated as
//! exact integers `W(S)^2` over the common denominator `4^n` and only turned
//! into a [`BigRational`] (or an `f64`) at the end.
//!
//! The free functions walk the coefficient table for each query.
//! [`SpectralStatistics`] makes one pass and answers every query from the
//! accumulated masses.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::json;

use super::polynomial::FourierPolynomial;
use crate::error::{AnalysisError, AnalysisResult};
use crate::logging;

/// Sum of squared coefficients over all subsets of size `degree`.
///
/// `degree > n` has no subsets and yields zero.
pub fn weight_at_degree(poly: &FourierPolynomial, degree: usize) -> BigRational {
    let mass = squared_mass(poly, |subset| subset.count_ones() as usize == degree);
    exact(poly, mass)
}

/// Influence of `variable` restricted to subsets `{variable} ∪ T` with
/// `|T| = order`.
///
/// `order >= n` admits no such subset and returns zero.
pub fn influence_at_order(
    poly: &FourierPolynomial,
    variable: usize,
    order: usize,
) -> AnalysisResult<BigRational> {
    let bit = poly.variable_bit(variable)?;
    if order >= poly.num_variables() {
        return Ok(BigRational::zero());
    }
    let mass = squared_mass(poly, |subset| {
        subset & bit != 0 && subset.count_ones() as usize == order + 1
    });
    Ok(exact(poly, mass))
}

/// `Inf_i = Σ_{S ∋ i} f̂(S)^2`, summed order by order over `0..=n`.
pub fn influence(poly: &FourierPolynomial, variable: usize) -> AnalysisResult<BigRational> {
    (0..=poly.num_variables()).try_fold(BigRational::zero(), |acc, order| {
        Ok(acc + influence_at_order(poly, variable, order)?)
    })
}

/// `Σ_i Inf_i`.
pub fn total_influence(poly: &FourierPolynomial) -> BigRational {
    let mass: u128 = (0..poly.num_variables())
        .map(|shift| squared_mass(poly, |subset| subset & (1usize << shift) != 0))
        .sum();
    exact(poly, mass)
}

/// `Σ_d d·W[d]`; equal to [`total_influence`].
pub fn total_influence_by_degree(poly: &FourierPolynomial) -> BigRational {
    (1..=poly.num_variables())
        .map(|degree| weight_at_degree(poly, degree) * BigInt::from(degree))
        .fold(BigRational::zero(), |acc, w| acc + w)
}

/// Mass off the constant term, `Σ_{d≥1} W[d]`.
pub fn variance(poly: &FourierPolynomial) -> BigRational {
    (1..=poly.num_variables())
        .map(|degree| weight_at_degree(poly, degree))
        .fold(BigRational::zero(), |acc, w| acc + w)
}

/// `0.5 · Σ_{d=0}^{n} (1 - (1-2p)^d)·W[d]` at noise level `p`.
pub fn noise_sensitivity(poly: &FourierPolynomial, noise_level: f64) -> f64 {
    let weights: Vec<f64> = (0..=poly.num_variables())
        .map(|degree| {
            let mass = squared_mass(poly, |subset| subset.count_ones() as usize == degree);
            mass_to_f64(mass, poly.num_variables())
        })
        .collect();
    sensitivity_from_weights(&weights, noise_level)
}

/// `[W[0], …, W[n]]`.
pub fn weight_spectrum(poly: &FourierPolynomial) -> Vec<BigRational> {
    (0..=poly.num_variables())
        .map(|degree| weight_at_degree(poly, degree))
        .collect()
}

/// `Σ_S f̂(S)^2`, which is 1 for every ±1-valued function.
pub fn parseval_sum(poly: &FourierPolynomial) -> BigRational {
    exact(poly, squared_mass(poly, |_| true))
}

fn squared_mass<F>(poly: &FourierPolynomial, keep: F) -> u128
where
    F: Fn(usize) -> bool + Sync,
{
    poly.walsh_values()
        .par_iter()
        .enumerate()
        .filter(|(subset, _)| keep(*subset))
        .map(|(_, &w)| (w as i128 * w as i128) as u128)
        .sum()
}

fn exact(poly: &FourierPolynomial, mass: u128) -> BigRational {
    exact_mass(mass, poly.num_variables())
}

fn exact_mass(mass: u128, num_variables: usize) -> BigRational {
    BigRational::new(BigInt::from(mass), BigInt::one() << (2 * num_variables))
}

fn mass_to_f64(mass: u128, num_variables: usize) -> f64 {
    mass as f64 / 2f64.powi(2 * num_variables as i32)
}

fn sensitivity_from_weights(weights: &[f64], noise_level: f64) -> f64 {
    let rho = 1.0 - 2.0 * noise_level;
    let sum: f64 = weights
        .iter()
        .enumerate()
        .map(|(degree, w)| (1.0 - rho.powi(degree as i32)) * w)
        .sum();
    0.5 * sum
}

/// One-pass spectral statistics for a single expansion.
///
/// Squared Walsh values are grouped by subset size and, per variable, by the
/// size of the rest of the subset. All queries are answered from those
/// integer masses.
///
/// ```
/// use boolean_spectral_core::{BooleanFunction, FourierPolynomial, SpectralStatistics};
///
/// let xor = BooleanFunction::from_bits(&[0, 1, 1, 0], 2).unwrap();
/// let stats = SpectralStatistics::new(&FourierPolynomial::from_function(&xor));
/// assert_eq!(stats.weight_at_degree_f64(2), 1.0);
/// assert_eq!(stats.total_influence_f64(), 2.0);
/// assert!((stats.noise_sensitivity(0.1) - 0.18).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectralStatistics {
    num_variables: usize,
    degree_mass: Vec<u128>,
    /// `order_mass[i * n + k]`: mass on subsets containing `i` with `|S| = k + 1`.
    order_mass: Vec<u128>,
}

impl SpectralStatistics {
    pub fn new(poly: &FourierPolynomial) -> Self {
        let n = poly.num_variables();
        let masses = poly
            .walsh_values()
            .par_iter()
            .enumerate()
            .fold(
                || MassAccumulator::new(n),
                |mut acc, (subset, &w)| {
                    acc.add(subset, w);
                    acc
                },
            )
            .reduce(|| MassAccumulator::new(n), MassAccumulator::merge);

        let stats = Self {
            num_variables: n,
            degree_mass: masses.degree,
            order_mass: masses.order,
        };
        logging::record(
            "spectral_statistics",
            &json!({
                "num_variables": n,
                "total_influence": stats.total_influence_f64(),
                "variance": stats.variance_f64(),
            }),
        );
        stats
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn weight_at_degree(&self, degree: usize) -> BigRational {
        exact_mass(self.degree(degree), self.num_variables)
    }

    pub fn weight_at_degree_f64(&self, degree: usize) -> f64 {
        mass_to_f64(self.degree(degree), self.num_variables)
    }

    pub fn weight_spectrum(&self) -> Vec<BigRational> {
        (0..=self.num_variables)
            .map(|d| self.weight_at_degree(d))
            .collect()
    }

    pub fn weight_spectrum_f64(&self) -> Vec<f64> {
        (0..=self.num_variables)
            .map(|d| self.weight_at_degree_f64(d))
            .collect()
    }

    pub fn influence_at_order(&self, variable: usize, order: usize) -> AnalysisResult<BigRational> {
        self.check_variable(variable)?;
        Ok(exact_mass(
            self.order(variable, order),
            self.num_variables,
        ))
    }

    pub fn influence(&self, variable: usize) -> AnalysisResult<BigRational> {
        self.check_variable(variable)?;
        Ok(exact_mass(self.influence_mass(variable), self.num_variables))
    }

    pub fn influence_f64(&self, variable: usize) -> AnalysisResult<f64> {
        self.check_variable(variable)?;
        Ok(mass_to_f64(self.influence_mass(variable), self.num_variables))
    }

    /// Per-variable influences `[Inf_0, …, Inf_{n-1}]`.
    pub fn influences(&self) -> Vec<BigRational> {
        (0..self.num_variables)
            .map(|var| exact_mass(self.influence_mass(var), self.num_variables))
            .collect()
    }

    pub fn influences_f64(&self) -> Vec<f64> {
        (0..self.num_variables)
            .map(|var| mass_to_f64(self.influence_mass(var), self.num_variables))
            .collect()
    }

    /// `Σ_i Inf_i`.
    pub fn total_influence(&self) -> BigRational {
        exact_mass(self.total_influence_mass(), self.num_variables)
    }

    pub fn total_influence_f64(&self) -> f64 {
        mass_to_f64(self.total_influence_mass(), self.num_variables)
    }

    /// `Σ_d d·W[d]`.
    pub fn total_influence_by_degree(&self) -> BigRational {
        let mass: u128 = self
            .degree_mass
            .iter()
            .enumerate()
            .map(|(degree, &m)| degree as u128 * m)
            .sum();
        exact_mass(mass, self.num_variables)
    }

    pub fn variance(&self) -> BigRational {
        exact_mass(self.variance_mass(), self.num_variables)
    }

    pub fn variance_f64(&self) -> f64 {
        mass_to_f64(self.variance_mass(), self.num_variables)
    }

    pub fn parseval_sum(&self) -> BigRational {
        exact_mass(self.degree_mass.iter().sum(), self.num_variables)
    }

    /// `0.5 · Σ_d (1 - (1-2p)^d)·W[d]`.
    pub fn noise_sensitivity(&self, noise_level: f64) -> f64 {
        sensitivity_from_weights(&self.weight_spectrum_f64(), noise_level)
    }

    /// Floating-point report of every statistic at the given noise levels.
    pub fn summary(&self, noise_levels: &[f64]) -> SpectralSummary {
        SpectralSummary {
            num_variables: self.num_variables,
            total_influence: self.total_influence_f64(),
            weights: self.weight_spectrum_f64(),
            influences: self.influences_f64(),
            variance: self.variance_f64(),
            noise_sensitivity: noise_levels
                .iter()
                .map(|&level| NoisePoint {
                    level,
                    value: self.noise_sensitivity(level),
                })
                .collect(),
        }
    }

    fn check_variable(&self, variable: usize) -> AnalysisResult<()> {
        if variable >= self.num_variables {
            return Err(AnalysisError::invalid_input(format!(
                "variable {variable} out of range for {} variables",
                self.num_variables
            )));
        }
        Ok(())
    }

    fn degree(&self, degree: usize) -> u128 {
        self.degree_mass.get(degree).copied().unwrap_or(0)
    }

    fn order(&self, variable: usize, order: usize) -> u128 {
        if order >= self.num_variables {
            return 0;
        }
        self.order_mass[variable * self.num_variables + order]
    }

    fn influence_mass(&self, variable: usize) -> u128 {
        (0..=self.num_variables)
            .map(|order| self.order(variable, order))
            .sum()
    }

    fn total_influence_mass(&self) -> u128 {
        (0..self.num_variables)
            .map(|var| self.influence_mass(var))
            .sum()
    }

    fn variance_mass(&self) -> u128 {
        self.degree_mass.iter().skip(1).sum()
    }
}

struct MassAccumulator {
    n: usize,
    degree: Vec<u128>,
    order: Vec<u128>,
}

impl MassAccumulator {
    fn new(n: usize) -> Self {
        Self {
            n,
            degree: vec![0; n + 1],
            order: vec![0; n * n],
        }
    }

    fn add(&mut self, subset: usize, w: i64) {
        if w == 0 {
            return;
        }
        let square = (w as i128 * w as i128) as u128;
        let size = subset.count_ones() as usize;
        self.degree[size] += square;

        let mut rest = subset;
        while rest != 0 {
            let bit = rest.trailing_zeros() as usize;
            let var = self.n - 1 - bit;
            self.order[var * self.n + size - 1] += square;
            rest &= rest - 1;
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for (a, b) in self.degree.iter_mut().zip(other.degree) {
            *a += b;
        }
        for (a, b) in self.order.iter_mut().zip(other.order) {
            *a += b;
        }
        self
    }
}

/// Serializable snapshot of [`SpectralStatistics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectralSummary {
    pub num_variables: usize,
    pub total_influence: f64,
    pub weights: Vec<f64>,
    pub influences: Vec<f64>,
    pub variance: f64,
    pub noise_sensitivity: Vec<NoisePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoisePoint {
    pub level: f64,
    pub value: f64,
}
