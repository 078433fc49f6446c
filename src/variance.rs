//! Seeded variance.
//!
//! `perturb(base, seed)` scales a value by a factor drawn from
//! `[1 - band, 1 + band]` using an RNG seeded only by `seed`. There is no
//! shared random state: the same `(base, seed)` always gives the same result,
//! and different logical requests get different seeds from [`request_seed`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Default perturbation band (±10%)
pub const DEFAULT_BAND: f64 = 0.10;

/// Separator between seed parts, so `("ab", "c")` and `("a", "bc")` differ
const PART_SEPARATOR: u8 = 0x1f;

/// Derive a seed from the parts identifying a logical request.
pub fn request_seed<S: AsRef<[u8]>>(parts: &[S]) -> u64 {
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update([PART_SEPARATOR]);
        }
        hasher.update(part.as_ref());
    }
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Bounded, deterministic perturbation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variance {
    band: f64,
}

impl Variance {
    /// Create with a band in `[0, 1)`. Out-of-range bands are clamped.
    pub fn new(band: f64) -> Self {
        let band = if band.is_finite() {
            band.clamp(0.0, 0.99)
        } else {
            DEFAULT_BAND
        };
        Variance { band }
    }

    pub fn band(&self) -> f64 {
        self.band
    }

    /// Multiplicative factor for a seed, in `[1 - band, 1 + band]`
    pub fn factor(&self, seed: u64) -> f64 {
        if self.band == 0.0 {
            return 1.0;
        }
        let mut rng = StdRng::seed_from_u64(seed);
        1.0 + rng.gen_range(-self.band..=self.band)
    }

    pub fn perturb(&self, base: f64, seed: u64) -> f64 {
        base * self.factor(seed)
    }

    /// Perturb a count and round to a whole number
    pub fn perturb_count(&self, count: usize, seed: u64) -> u64 {
        self.perturb(count as f64, seed).round().max(0.0) as u64
    }

    /// Whether `value` lies within the band around `base`
    pub fn within_band(&self, base: f64, value: f64) -> bool {
        let slack = base.abs() * self.band + 1e-9;
        (value - base).abs() <= slack
    }
}

impl Default for Variance {
    fn default() -> Self {
        Variance::new(DEFAULT_BAND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perturb_is_deterministic() {
        let v = Variance::default();
        assert_eq!(v.perturb(1234.5, 99), v.perturb(1234.5, 99));
    }

    #[test]
    fn test_different_seeds_differ() {
        let v = Variance::default();
        let distinct: std::collections::HashSet<u64> = (0..50)
            .map(|seed| v.perturb(1000.0, seed).to_bits())
            .collect();
        assert!(distinct.len() > 45);
    }

    #[test]
    fn test_perturb_stays_in_band() {
        let v = Variance::new(0.1);
        for seed in 0..500 {
            let p = v.perturb(200.0, seed);
            assert!((180.0..=220.0).contains(&p), "seed {seed} gave {p}");
        }
    }

    #[test]
    fn test_zero_band_is_identity() {
        let v = Variance::new(0.0);
        assert_eq!(v.perturb(42.0, 7), 42.0);
        assert_eq!(v.perturb_count(80, 7), 80);
    }

    #[test]
    fn test_band_is_clamped() {
        assert_eq!(Variance::new(-1.0).band(), 0.0);
        assert_eq!(Variance::new(5.0).band(), 0.99);
        assert_eq!(Variance::new(f64::NAN).band(), DEFAULT_BAND);
    }

    #[test]
    fn test_request_seed_is_stable_and_separated() {
        assert_eq!(request_seed(&["week", "revenue"]), request_seed(&["week", "revenue"]));
        assert_ne!(request_seed(&["week", "revenue"]), request_seed(&["week", "orders"]));
        assert_ne!(request_seed(&["ab", "c"]), request_seed(&["a", "bc"]));
    }

    #[test]
    fn test_within_band() {
        let v = Variance::new(0.1);
        assert!(v.within_band(100.0, 110.0));
        assert!(!v.within_band(100.0, 111.0));
    }
}
