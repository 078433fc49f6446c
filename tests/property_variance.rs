//! Property-based variance tests (proptest).

use chrono::NaiveDate;
use proptest::prelude::*;

use erpsim::{request_seed, Engine, GeneratorSettings, Value, Variance};

proptest! {
    #[test]
    fn perturb_stays_within_band(
        base in -1.0e6f64..1.0e6,
        seed in any::<u64>(),
        band in 0.0f64..0.5,
    ) {
        let variance = Variance::new(band);
        let value = variance.perturb(base, seed);
        prop_assert!(variance.within_band(base, value), "{value} outside {band} of {base}");
    }

    #[test]
    fn perturb_is_deterministic(base in -1.0e6f64..1.0e6, seed in any::<u64>()) {
        let variance = Variance::default();
        prop_assert_eq!(variance.perturb(base, seed), variance.perturb(base, seed));
    }

    #[test]
    fn factor_is_bounded(seed in any::<u64>()) {
        let variance = Variance::default();
        let factor = variance.factor(seed);
        prop_assert!((0.9..=1.1).contains(&factor));
    }

    #[test]
    fn zero_band_is_identity(base in -1.0e6f64..1.0e6, seed in any::<u64>()) {
        prop_assert_eq!(Variance::new(0.0).perturb(base, seed), base);
    }

    #[test]
    fn perturbed_count_is_near_count(count in 0usize..100_000, seed in any::<u64>()) {
        let variance = Variance::default();
        let value = variance.perturb_count(count, seed) as f64;
        // Rounding to a whole number can add half a unit
        prop_assert!((value - count as f64).abs() <= count as f64 * variance.band() + 0.5);
    }

    #[test]
    fn request_seed_depends_on_part_boundaries(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        let joined = format!("{a}{b}");
        prop_assert_ne!(request_seed(&[a.as_str(), b.as_str()]), request_seed(&[joined.as_str()]));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn count_aggregate_within_band_for_any_master_seed(master_seed in any::<u64>()) {
        let settings = GeneratorSettings {
            master_seed,
            anchor: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            window_days: 365,
        };
        let engine = Engine::new(settings, Variance::default(), 100).unwrap();
        let true_count = engine.store().rows_for("orders").unwrap().len() as f64;

        let result = engine.execute("SELECT COUNT(*) FROM orders").unwrap();
        let aggregate = result.summary.aggregate.unwrap();

        let Value::Integer(count) = aggregate.value else {
            return Err(TestCaseError::fail("COUNT must be an integer"));
        };
        prop_assert!((count as f64 - true_count).abs() <= true_count * 0.10 + 0.5);
    }
}
