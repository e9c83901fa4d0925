//! Random reading generation.
//!
//! All randomness in the simulator flows through a [`SimRng`], so a fixed
//! seed gives a reproducible session.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use viot_types::{DeviceType, ReadingRange};

use crate::error::Result;

/// RNG used by the stores.
pub type SimRng = StdRng;

/// Create the simulation RNG, seeded from `seed` when given or from the OS.
pub fn sim_rng(seed: Option<u64>) -> SimRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Uniform integer in `[range.min(), range.max()]`.
///
/// When both bounds are equal that value is returned.
pub fn generate_reading<R: Rng + ?Sized>(rng: &mut R, range: ReadingRange) -> i32 {
    rng.random_range(range.min()..=range.max())
}

/// Bernoulli trial with probability `p`.
///
/// Values at or below 0 (and NaN) never succeed; values at or above 1 always do.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    if p.is_nan() || p <= 0.0 {
        false
    } else if p >= 1.0 {
        true
    } else {
        rng.random_bool(p)
    }
}

/// Uniform integer in `[min, max]`, validating the bounds first.
///
/// # Example
///
/// ```
/// use viot_core::generator::{generate_in, sim_rng};
///
/// let mut rng = sim_rng(Some(1));
/// assert_eq!(generate_in(&mut rng, 4, 4).unwrap(), 4);
/// assert!(generate_in(&mut rng, 5, 1).is_err());
/// ```
pub fn generate_in<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> Result<i32> {
    let range = ReadingRange::new(min, max)?;
    Ok(generate_reading(rng, range))
}

/// A fresh reading for a device of the given type.
pub fn reading_for<R: Rng + ?Sized>(rng: &mut R, device_type: DeviceType) -> i32 {
    generate_reading(rng, device_type.reading_range())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_equal_bounds_return_value() {
        let mut rng = sim_rng(Some(3));
        for _ in 0..50 {
            assert_eq!(generate_in(&mut rng, -2, -2).unwrap(), -2);
        }
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut rng = sim_rng(Some(3));
        let err = generate_in(&mut rng, 10, 0).unwrap_err();
        assert_eq!(err, crate::Error::InvalidRange { min: 10, max: 0 });
    }

    #[test]
    fn test_both_bounds_reachable() {
        let mut rng = sim_rng(Some(11));
        let range = ReadingRange::new(0, 1).unwrap();
        let draws: Vec<i32> = (0..200).map(|_| generate_reading(&mut rng, range)).collect();
        assert!(draws.contains(&0));
        assert!(draws.contains(&1));
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = sim_rng(Some(42));
        let mut b = sim_rng(Some(42));
        for kind in DeviceType::ALL {
            assert_eq!(reading_for(&mut a, kind), reading_for(&mut b, kind));
        }
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = sim_rng(Some(4));
        for _ in 0..100 {
            assert!(!chance(&mut rng, 0.0));
            assert!(!chance(&mut rng, f64::NAN));
            assert!(chance(&mut rng, 1.0));
            assert!(chance(&mut rng, 3.0));
        }
    }

    proptest! {
        #[test]
        fn reading_stays_in_type_range(seed in any::<u64>(), index in 0usize..6) {
            let kind = DeviceType::ALL[index];
            let mut rng = sim_rng(Some(seed));
            let value = reading_for(&mut rng, kind);
            prop_assert!(kind.reading_range().contains(value));
        }

        #[test]
        fn reading_stays_in_arbitrary_range(seed in any::<u64>(), a in -5000i32..5000, b in -5000i32..5000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let mut rng = sim_rng(Some(seed));
            let value = generate_in(&mut rng, lo, hi).unwrap();
            prop_assert!(value >= lo && value <= hi);
        }
    }
}
