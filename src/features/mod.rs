//! Fixed-order spectral feature vectors for downstream learning pipelines.
//!
//! One function becomes one record:
//! `[total_influence, weight_0, …, weight_n, variance, ns_0.1, ns_0.2, ns_0.3, ns_0.4]`.
//! [`FeatureTable`] stacks many records of the same arity into a matrix.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::json;

use crate::error::{AnalysisError, AnalysisResult};
use crate::logging;
use crate::spectral::{FourierPolynomial, SpectralStatistics};
use crate::truth_table::BooleanFunction;

/// Noise levels reported by [`compute_features`].
pub const DEFAULT_NOISE_LEVELS: [f64; 4] = [0.1, 0.2, 0.3, 0.4];

/// Spectral features of one Boolean function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    num_variables: usize,
    noise_levels: Vec<f64>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn noise_levels(&self) -> &[f64] {
        &self.noise_levels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn total_influence(&self) -> f64 {
        self.values[0]
    }

    /// `[W[0], …, W[n]]`.
    pub fn weights(&self) -> &[f64] {
        &self.values[1..self.num_variables + 2]
    }

    pub fn variance(&self) -> f64 {
        self.values[self.num_variables + 2]
    }

    /// Noise sensitivity at each of [`FeatureVector::noise_levels`].
    pub fn noise_sensitivity(&self) -> &[f64] {
        &self.values[self.num_variables + 3..]
    }

    /// Column labels matching [`FeatureVector::values`].
    pub fn names(&self) -> Vec<String> {
        feature_names(self.num_variables, &self.noise_levels)
    }
}

/// Column labels for an `n`-variable feature vector.
pub fn feature_names(num_variables: usize, noise_levels: &[f64]) -> Vec<String> {
    let mut names = Vec::with_capacity(num_variables + 3 + noise_levels.len());
    names.push("total_influence".to_string());
    names.extend((0..=num_variables).map(|d| format!("weight_{d}")));
    names.push("variance".to_string());
    names.extend(
        noise_levels
            .iter()
            .map(|level| format!("noise_sensitivity_{level}")),
    );
    names
}

/// Features of the function whose truth table is `bits` (`n = log2(len)`).
///
/// # Example
///
/// ```
/// use boolean_spectral_core::compute_features;
///
/// // AND
/// let features = compute_features(&[0, 0, 0, 1]).unwrap();
/// assert_eq!(features.len(), 2 + 7);
/// assert_eq!(features.total_influence(), 1.0);
/// assert_eq!(features.weights(), &[0.25, 0.5, 0.25]);
/// assert_eq!(features.variance(), 0.75);
/// ```
pub fn compute_features(bits: &[u8]) -> AnalysisResult<FeatureVector> {
    let function = BooleanFunction::from_bitcode(bits)?;
    Ok(features_of(&function, &DEFAULT_NOISE_LEVELS))
}

/// Features of an already decoded function at caller-chosen noise levels.
pub fn features_of(function: &BooleanFunction, noise_levels: &[f64]) -> FeatureVector {
    let poly = FourierPolynomial::from_function(function);
    compute_features_with(&poly, noise_levels)
}

/// Features of an expansion at caller-chosen noise levels.
pub fn compute_features_with(poly: &FourierPolynomial, noise_levels: &[f64]) -> FeatureVector {
    let stats = SpectralStatistics::new(poly);
    let n = stats.num_variables();

    let mut values = Vec::with_capacity(n + 3 + noise_levels.len());
    values.push(stats.total_influence_f64());
    values.extend(stats.weight_spectrum_f64());
    values.push(stats.variance_f64());
    values.extend(noise_levels.iter().map(|&p| stats.noise_sensitivity(p)));

    FeatureVector {
        num_variables: n,
        noise_levels: noise_levels.to_vec(),
        values,
    }
}

/// Feature records for many functions of one arity, one row per function.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    num_variables: usize,
    columns: Vec<String>,
    data: Array2<f64>,
}

impl FeatureTable {
    /// Compute features for every bitcode in parallel at the default levels.
    pub fn from_bitcodes(bitcodes: &[Vec<u8>]) -> AnalysisResult<Self> {
        Self::from_bitcodes_with(bitcodes, &DEFAULT_NOISE_LEVELS)
    }

    pub fn from_bitcodes_with(bitcodes: &[Vec<u8>], noise_levels: &[f64]) -> AnalysisResult<Self> {
        let first = bitcodes
            .first()
            .ok_or_else(|| AnalysisError::invalid_input("feature table needs at least one bitcode"))?;
        let expected = first.len();
        if let Some(bad) = bitcodes.iter().find(|bits| bits.len() != expected) {
            return Err(AnalysisError::function_size(
                expected,
                bad.len(),
                "feature table rows must share one arity",
            ));
        }

        let rows = bitcodes
            .par_iter()
            .map(|bits| {
                let function = BooleanFunction::from_bitcode(bits)?;
                Ok(features_of(&function, noise_levels))
            })
            .collect::<AnalysisResult<Vec<FeatureVector>>>()?;

        let num_variables = rows[0].num_variables();
        let columns = feature_names(num_variables, noise_levels);
        let flat: Vec<f64> = rows.into_iter().flat_map(FeatureVector::into_values).collect();
        let data = Array2::from_shape_vec((bitcodes.len(), columns.len()), flat)
            .map_err(|err| AnalysisError::invalid_input(format!("feature matrix: {err}")))?;

        logging::record(
            "feature_table",
            &json!({
                "rows": data.nrows(),
                "columns": data.ncols(),
                "num_variables": num_variables,
            }),
        );

        Ok(Self {
            num_variables,
            columns,
            data,
        })
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.data.nrows()).then(|| self.data.row(index))
    }

    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.columns
            .iter()
            .position(|column| column == name)
            .map(|idx| self.data.column(idx))
    }

    /// Mean of every column.
    pub fn column_means(&self) -> Array1<f64> {
        self.data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(self.columns.len()))
    }

    /// Header line plus one comma-separated line per row.
    pub fn to_csv(&self) -> String {
        let mut out = self.columns.join(",");
        out.push('\n');
        for row in self.data.rows() {
            let line = row
                .iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}
