//! # Boolean Spectral Core
//!
//! Fourier–Walsh analysis of Boolean functions `f: {-1,+1}^n → {-1,+1}`.
//! Truth tables are expanded into exact multilinear polynomials, from which
//! weight spectra, influences, variance, noise sensitivity and BLR linearity
//! estimates are derived.
//!
//! ## Quick Start
//!
//! ```rust
//! use boolean_spectral_core::{compute_features, BooleanFunction, FourierPolynomial, SpectralStatistics};
//!
//! // Majority of three
//! let maj = BooleanFunction::from_bitcode(&[0, 0, 0, 1, 0, 1, 1, 1]).unwrap();
//! let poly = FourierPolynomial::from_function(&maj);
//!
//! let stats = SpectralStatistics::new(&poly);
//! assert_eq!(stats.total_influence_f64(), 1.5);
//! assert_eq!(stats.weight_spectrum_f64(), vec![0.0, 0.75, 0.0, 0.25]);
//!
//! let features = compute_features(&[0, 0, 0, 1, 0, 1, 1, 1]).unwrap();
//! println!("features: {:?}", features.values());
//! ```
//!
//! ## Core Modules
//!
//! - [`truth_table`] - Bitcode decoding and ±1 truth tables
//! - [`spectral`] - Walsh–Hadamard transform, expansions and statistics
//! - [`features`] - Fixed-order feature vectors and tables
//! - [`linearity`] - BLR linearity testing
//! - [`config`] - Analysis configuration via TOML
//! - [`logging`] - JSON line-delimited logging

pub mod config;
pub mod error;
pub mod features;
pub mod linearity;
pub mod logging;
pub mod spectral;
pub mod truth_table;

pub use config::{AnalysisConfig, ConfigError};
pub use error::{AnalysisError, AnalysisResult};
pub use features::{compute_features, FeatureTable, FeatureVector};
pub use linearity::{test_linearity, LinearityReport, LinearityTester};
pub use spectral::{FourierPolynomial, SpectralStatistics, SpectralSummary};
pub use truth_table::BooleanFunction;
