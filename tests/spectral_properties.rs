use boolean_spectral_core::linearity::{exact_linearity_acceptance, is_character, test_linearity};
use boolean_spectral_core::spectral::{self, FourierPolynomial, SpectralStatistics};
use boolean_spectral_core::truth_table::{encode, grid_point};
use boolean_spectral_core::{compute_features, BooleanFunction, LinearityTester};
use num_rational::BigRational;
use num_traits::{One, Zero};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

fn bitcode() -> impl Strategy<Value = Vec<u8>> {
    (1usize..=6).prop_flat_map(|n| prop::collection::vec(0u8..=1, 1 << n))
}

fn expand(bits: &[u8]) -> FourierPolynomial {
    FourierPolynomial::from_function(&BooleanFunction::from_bitcode(bits).unwrap())
}

fn ratio(num: i64, den: i64) -> BigRational {
    BigRational::new(num.into(), den.into())
}

proptest! {
    #[test]
    fn parseval_holds_exactly(bits in bitcode()) {
        let poly = expand(&bits);
        prop_assert_eq!(spectral::parseval_sum(&poly), BigRational::one());
        let weights: BigRational = spectral::weight_spectrum(&poly)
            .into_iter()
            .fold(BigRational::zero(), |acc, w| acc + w);
        prop_assert_eq!(weights, BigRational::one());
    }

    #[test]
    fn influence_views_agree(bits in bitcode()) {
        let poly = expand(&bits);
        let stats = SpectralStatistics::new(&poly);
        let per_variable = (0..poly.num_variables())
            .map(|var| spectral::influence(&poly, var).unwrap())
            .fold(BigRational::zero(), |acc, inf| acc + inf);

        prop_assert_eq!(&per_variable, &spectral::total_influence(&poly));
        prop_assert_eq!(&per_variable, &spectral::total_influence_by_degree(&poly));
        prop_assert_eq!(&per_variable, &stats.total_influence());
        for var in 0..poly.num_variables() {
            prop_assert_eq!(stats.influence(var).unwrap(), spectral::influence(&poly, var).unwrap());
        }
    }

    #[test]
    fn variance_is_mass_off_the_constant(bits in bitcode()) {
        let poly = expand(&bits);
        let expected = BigRational::one() - spectral::weight_at_degree(&poly, 0);
        prop_assert_eq!(spectral::variance(&poly), expected);
    }

    #[test]
    fn expansion_reproduces_the_truth_table(bits in bitcode()) {
        let function = BooleanFunction::from_bitcode(&bits).unwrap();
        let poly = FourierPolynomial::from_function(&function);
        let n = function.num_variables();
        for row in 0..function.len() {
            let value = poly.evaluate(&grid_point(row, n)).unwrap();
            prop_assert_eq!(value, BigRational::from_integer(function.outputs()[row].into()));
        }
        prop_assert_eq!(encode(function.outputs()).unwrap(), bits.clone());
        prop_assert_eq!(
            BooleanFunction::from_integer(&function.to_integer(), n).unwrap(),
            function
        );
    }

    #[test]
    fn fast_transform_matches_naive_sum(bits in bitcode()) {
        let function = BooleanFunction::from_bitcode(&bits).unwrap();
        let n = function.num_variables();
        let fast = FourierPolynomial::from_outputs(function.outputs(), n).unwrap();
        let naive = FourierPolynomial::from_outputs_naive(function.outputs(), n).unwrap();
        prop_assert_eq!(fast, naive);
    }

    #[test]
    fn noise_sensitivity_stays_bounded(bits in bitcode(), p in 0.0f64..=1.0) {
        let poly = expand(&bits);
        let ns = spectral::noise_sensitivity(&poly, p);
        prop_assert!((0.0..=1.0 + 1e-12).contains(&ns));
        let cached = SpectralStatistics::new(&poly).noise_sensitivity(p);
        prop_assert!((ns - cached).abs() < 1e-12);
    }

    #[test]
    fn linearity_estimate_is_a_probability(bits in bitcode(), seed in any::<u64>()) {
        let poly = expand(&bits);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let estimate = test_linearity(&poly, 32, &mut rng);
        prop_assert!((0.0..=1.0).contains(&estimate));
        if is_character(&poly) {
            prop_assert_eq!(estimate, 1.0);
            prop_assert_eq!(exact_linearity_acceptance(&poly), BigRational::one());
        } else {
            prop_assert!(exact_linearity_acceptance(&poly) < BigRational::one());
        }
    }
}

#[test]
fn constant_function_has_all_weight_at_degree_zero() {
    let poly = expand(&[0, 0, 0, 0]);
    assert_eq!(spectral::weight_at_degree(&poly, 0), BigRational::one());
    assert!(spectral::weight_at_degree(&poly, 1).is_zero());
    assert!(spectral::weight_at_degree(&poly, 2).is_zero());
    assert!(spectral::total_influence(&poly).is_zero());
    assert!(spectral::variance(&poly).is_zero());
    for p in [0.0, 0.1, 0.25, 0.5, 1.0] {
        assert_eq!(spectral::noise_sensitivity(&poly, p), 0.0);
    }
}

#[test]
fn xor_concentrates_on_the_top_degree() {
    let poly = expand(&[0, 1, 1, 0]);
    assert_eq!(
        spectral::weight_spectrum(&poly),
        vec![BigRational::zero(), BigRational::zero(), BigRational::one()]
    );
    assert_eq!(spectral::total_influence(&poly), ratio(2, 1));
    assert_eq!(spectral::variance(&poly), BigRational::one());
    assert!((spectral::noise_sensitivity(&poly, 0.1) - 0.18).abs() < 1e-12);
}

#[test]
fn xor_passes_every_linearity_trial() {
    let poly = expand(&[0, 1, 1, 0]);
    for samples in [1, 2, 7, 100, 1000] {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(samples as u64 * 31);
        assert_eq!(test_linearity(&poly, samples, &mut rng), 1.0);
    }
}

#[test]
fn nonlinear_functions_fail_some_trials() {
    // AND, majority of three and a 4-variable bent function
    let codes: [&[u8]; 3] = [
        &[0, 0, 0, 1],
        &[0, 0, 0, 1, 0, 1, 1, 1],
        &[0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 1, 1, 1, 0],
    ];
    let tester = LinearityTester::new(2000, 5);
    for bits in codes {
        let poly = expand(bits);
        assert!(!is_character(&poly));
        let report = tester.report(&poly);
        assert!(report.estimate < 1.0, "{bits:?} estimate {}", report.estimate);
        assert!((report.estimate - report.exact).abs() < 0.1);
    }
}

#[test]
fn bent_function_has_flat_spectrum() {
    let poly = expand(&[0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 1, 1, 1, 1, 0]);
    assert!(poly.walsh_values().iter().all(|w| w.abs() == 4));
    // Σ f̂^3 = 4 · (1/4)^3
    assert_eq!(exact_linearity_acceptance(&poly), ratio(17, 32));
}

#[test]
fn majority_influences_are_equal() {
    let poly = expand(&[0, 0, 0, 1, 0, 1, 1, 1]);
    for var in 0..3 {
        assert_eq!(spectral::influence(&poly, var).unwrap(), ratio(1, 2));
        assert_eq!(
            spectral::influence_at_order(&poly, var, 0).unwrap(),
            ratio(1, 4)
        );
        assert_eq!(
            spectral::influence_at_order(&poly, var, 2).unwrap(),
            ratio(1, 4)
        );
        assert!(spectral::influence_at_order(&poly, var, 3).unwrap().is_zero());
    }
    assert!(spectral::influence(&poly, 3).is_err());
}

#[test]
fn features_follow_the_statistics() {
    let bits = [1, 0, 1, 1, 0, 0, 1, 0];
    let poly = expand(&bits);
    let stats = SpectralStatistics::new(&poly);
    let features = compute_features(&bits).unwrap();
    assert_eq!(features.total_influence(), stats.total_influence_f64());
    assert_eq!(features.weights(), stats.weight_spectrum_f64().as_slice());
    assert_eq!(features.variance(), stats.variance_f64());
    assert_eq!(features.noise_sensitivity()[2], stats.noise_sensitivity(0.3));
}
