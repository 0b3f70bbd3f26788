use rand::Rng;
use rand::distr::uniform::SampleUniform;
use serde::{Deserialize, Serialize};

/// A tuning value that is either fixed or drawn uniformly from an inclusive range.
///
/// Serializes untagged, so TOML/JSON accept either `1.2` or `[1.0, 1.4]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SampledRange<T> {
    Fixed(T),
    Between(T, T),
}

impl<T> SampledRange<T>
where
    T: SampleUniform + PartialOrd + Copy,
{
    /// Lower and upper bound, ordered.
    pub fn bounds(&self) -> (T, T) {
        match *self {
            SampledRange::Fixed(v) => (v, v),
            SampledRange::Between(a, b) if b < a => (b, a),
            SampledRange::Between(a, b) => (a, b),
        }
    }

    /// Draw a value. Reversed bounds are swapped, equal bounds return the value
    /// without touching the RNG.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let (lo, hi) = self.bounds();
        if lo == hi {
            return lo;
        }
        rng.random_range(lo..=hi)
    }

    pub fn contains(&self, value: T) -> bool {
        let (lo, hi) = self.bounds();
        value >= lo && value <= hi
    }
}

impl<T> From<T> for SampledRange<T> {
    fn from(value: T) -> Self {
        SampledRange::Fixed(value)
    }
}

impl<T> From<(T, T)> for SampledRange<T> {
    fn from((lo, hi): (T, T)) -> Self {
        SampledRange::Between(lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn fixed_always_returns_value() {
        let mut rng = StdRng::seed_from_u64(1);
        let r = SampledRange::Fixed(1.25f32);
        for _ in 0..10 {
            assert_eq!(r.sample(&mut rng), 1.25);
        }
    }

    #[test]
    fn reversed_bounds_are_swapped() {
        let r = SampledRange::Between(5u32, 2u32);
        assert_eq!(r.bounds(), (2, 5));
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let v = r.sample(&mut rng);
            assert!((2..=5).contains(&v));
        }
    }

    #[test]
    fn deserializes_scalar_or_pair() {
        let fixed: SampledRange<f32> = serde_json::from_str("0.5").unwrap();
        assert_eq!(fixed, SampledRange::Fixed(0.5));
        let pair: SampledRange<f32> = serde_json::from_str("[0.35, 0.5]").unwrap();
        assert_eq!(pair, SampledRange::Between(0.35, 0.5));
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn sample_stays_in_bounds(seed in any::<u64>(), a in -100.0f32..100.0, b in -100.0f32..100.0) {
                let mut rng = StdRng::seed_from_u64(seed);
                let r = SampledRange::Between(a, b);
                let v = r.sample(&mut rng);
                prop_assert!(r.contains(v), "{v} outside {:?}", r.bounds());
            }
        }
    }
}
