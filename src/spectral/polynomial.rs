//! The Fourier–Walsh expansion of a Boolean function.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::json;

use super::walsh::{self, character, PARALLEL_THRESHOLD};
use crate::error::{AnalysisError, AnalysisResult};
use crate::logging;
use crate::truth_table::{codec::table_len, row_of_point, BooleanFunction};

/// Multilinear polynomial `Σ_S f̂(S)·χ_S` stored as integer Walsh sums.
///
/// Index `S` is a subset mask in row-bit positions: variable `i` is bit
/// `n-1-i`. The coefficient of `χ_S` is the dyadic rational `W(S) / 2^n`.
///
/// # Example
///
/// ```
/// use boolean_spectral_core::{BooleanFunction, FourierPolynomial};
/// use num_rational::BigRational;
/// use num_traits::One;
///
/// let xor = BooleanFunction::from_bits(&[0, 1, 1, 0], 2).unwrap();
/// let poly = FourierPolynomial::from_function(&xor);
/// let both = poly.subset_mask(&[0, 1]).unwrap();
/// assert_eq!(poly.coefficient(both), BigRational::one());
/// assert_eq!(poly.to_string(), "x0*x1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FourierPolynomial {
    num_variables: usize,
    walsh: Vec<i64>,
}

impl FourierPolynomial {
    /// Expand a ±1 output vector of length `2^n` with the fast transform.
    pub fn from_outputs(outputs: &[i8], num_variables: usize) -> AnalysisResult<Self> {
        let values = validated_values(outputs, num_variables)?;
        Ok(Self::expand(values, num_variables))
    }

    /// Expand by evaluating `Σ_x f(x)·χ_S(x)` separately for every subset.
    ///
    /// `O(4^n)`; kept as the reference the fast transform is checked against.
    pub fn from_outputs_naive(outputs: &[i8], num_variables: usize) -> AnalysisResult<Self> {
        validated_values(outputs, num_variables)?;
        let walsh = (0..outputs.len())
            .into_par_iter()
            .map(|subset| walsh::walsh_sum(outputs, subset))
            .collect();
        Ok(Self {
            num_variables,
            walsh,
        })
    }

    pub fn from_function(function: &BooleanFunction) -> Self {
        let values = function.outputs().iter().map(|&v| v as i64).collect();
        Self::expand(values, function.num_variables())
    }

    fn expand(mut walsh: Vec<i64>, num_variables: usize) -> Self {
        walsh::fast_walsh_hadamard(&mut walsh);
        let poly = Self {
            num_variables,
            walsh,
        };
        logging::record(
            "fourier_expand",
            &json!({
                "num_variables": num_variables,
                "nonzero_terms": poly.walsh.iter().filter(|w| **w != 0).count(),
            }),
        );
        poly
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Number of monomials, `2^n`.
    pub fn len(&self) -> usize {
        self.walsh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walsh.is_empty()
    }

    /// Unnormalised Walsh sums `2^n·f̂(S)` in subset-mask order.
    pub fn walsh_values(&self) -> &[i64] {
        &self.walsh
    }

    /// `2^n·f̂(S)`; zero for masks naming variables the function lacks.
    pub fn walsh_value(&self, subset: usize) -> i64 {
        self.walsh.get(subset).copied().unwrap_or(0)
    }

    /// Exact coefficient `f̂(S)`.
    pub fn coefficient(&self, subset: usize) -> BigRational {
        BigRational::new(BigInt::from(self.walsh_value(subset)), self.scale())
    }

    pub fn coefficient_f64(&self, subset: usize) -> f64 {
        self.walsh_value(subset) as f64 / self.len() as f64
    }

    /// Constant term `f̂(∅)`, the mean of the function.
    pub fn constant_term(&self) -> BigRational {
        self.coefficient(0)
    }

    /// Common denominator `2^n`.
    pub fn scale(&self) -> BigInt {
        BigInt::one() << self.num_variables
    }

    /// Bit that represents `variable` in a subset mask.
    pub fn variable_bit(&self, variable: usize) -> AnalysisResult<usize> {
        if variable >= self.num_variables {
            return Err(AnalysisError::invalid_input(format!(
                "variable {variable} out of range for {} variables",
                self.num_variables
            )));
        }
        Ok(1usize << (self.num_variables - 1 - variable))
    }

    /// Subset mask for a list of variable indices.
    pub fn subset_mask(&self, variables: &[usize]) -> AnalysisResult<usize> {
        variables
            .iter()
            .try_fold(0usize, |mask, &var| Ok(mask | self.variable_bit(var)?))
    }

    /// Variable indices named by a subset mask, ascending.
    pub fn subset_variables(&self, subset: usize) -> Vec<usize> {
        (0..self.num_variables)
            .filter(|&var| subset & (1usize << (self.num_variables - 1 - var)) != 0)
            .collect()
    }

    /// Non-zero `(subset, f̂(S))` pairs in mask order.
    pub fn terms(&self) -> impl Iterator<Item = (usize, BigRational)> + '_ {
        self.walsh
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0)
            .map(move |(subset, _)| (subset, self.coefficient(subset)))
    }

    /// Largest `|S|` with a non-zero coefficient.
    pub fn degree(&self) -> usize {
        self.walsh
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0)
            .map(|(subset, _)| subset.count_ones() as usize)
            .max()
            .unwrap_or(0)
    }

    /// Exact value `Σ_S f̂(S)·χ_S(x)` at a ±1 point.
    pub fn evaluate(&self, point: &[i8]) -> AnalysisResult<BigRational> {
        let scaled = self.evaluate_scaled(point)?;
        Ok(BigRational::new(BigInt::from(scaled), self.scale()))
    }

    /// `2^n` times the value at a ±1 point, summed monomial by monomial.
    pub(crate) fn evaluate_scaled(&self, point: &[i8]) -> AnalysisResult<i128> {
        let row = row_of_point(point, self.num_variables)?;
        Ok(self.evaluate_row_scaled(row))
    }

    /// `2^n` times the value at the grid point enumerated as `row`.
    pub(crate) fn evaluate_row_scaled(&self, row: usize) -> i128 {
        let term = |(subset, &w): (usize, &i64)| w as i128 * character(subset, row) as i128;
        if self.walsh.len() >= PARALLEL_THRESHOLD {
            self.walsh.par_iter().enumerate().map(term).sum()
        } else {
            self.walsh.iter().enumerate().map(term).sum()
        }
    }

    /// Value of the multilinear extension at an arbitrary real point.
    pub fn evaluate_real(&self, point: &[f64]) -> AnalysisResult<f64> {
        if point.len() != self.num_variables {
            return Err(AnalysisError::invalid_input(format!(
                "point has {} coordinates, polynomial has {} variables",
                point.len(),
                self.num_variables
            )));
        }
        if let Some(bad) = point.iter().find(|x| !x.is_finite()) {
            return Err(AnalysisError::invalid_input(format!(
                "coordinate {bad} is not finite"
            )));
        }

        // monomial[S] = Π_{i∈S} x_i, built from S minus its lowest set bit.
        let n = self.num_variables;
        let mut monomial = vec![1.0f64; self.walsh.len()];
        for subset in 1..monomial.len() {
            let low = subset.trailing_zeros() as usize;
            monomial[subset] = monomial[subset & (subset - 1)] * point[n - 1 - low];
        }

        let sum: f64 = self
            .walsh
            .iter()
            .zip(&monomial)
            .map(|(&w, &m)| w as f64 * m)
            .sum();
        Ok(sum / self.walsh.len() as f64)
    }
}

fn validated_values(outputs: &[i8], num_variables: usize) -> AnalysisResult<Vec<i64>> {
    let expected = table_len(num_variables)?;
    if outputs.len() != expected {
        return Err(AnalysisError::function_size(
            expected,
            outputs.len(),
            "fourier expansion",
        ));
    }
    outputs
        .iter()
        .enumerate()
        .map(|(row, &value)| match value {
            1 | -1 => Ok(value as i64),
            other => Err(AnalysisError::invalid_input(format!(
                "output {other} at row {row} is not +1 or -1"
            ))),
        })
        .collect()
}

impl fmt::Display for FourierPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut terms: Vec<(usize, BigRational)> = self.terms().collect();
        if terms.is_empty() {
            return write!(f, "0");
        }
        terms.sort_by_key(|(subset, _)| {
            let vars = self.subset_variables(*subset);
            (std::cmp::Reverse(vars.len()), vars)
        });

        for (idx, (subset, coeff)) in terms.iter().enumerate() {
            let magnitude = coeff.abs();
            if idx == 0 {
                if coeff.is_negative() {
                    write!(f, "-")?;
                }
            } else if coeff.is_negative() {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }

            let vars = self.subset_variables(*subset);
            let monomial = vars
                .iter()
                .map(|var| format!("x{var}"))
                .collect::<Vec<_>>()
                .join("*");
            match (monomial.is_empty(), magnitude.is_one()) {
                (true, _) => write!(f, "{magnitude}")?,
                (false, true) => write!(f, "{monomial}")?,
                (false, false) => write!(f, "{magnitude}*{monomial}")?,
            }
        }
        Ok(())
    }
}
