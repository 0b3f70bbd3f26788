use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Amount `width_min` backs off from `width_max` when the range is degenerate.
const WIDTH_RANGE_FALLBACK: u32 = 20;
/// Amount `gap_max` is pushed past `gap_min` when the range is degenerate.
const GAP_RANGE_FALLBACK: u32 = 20;
/// Tallest standing jump a profile may describe. Corridors never exceed the screen.
pub const MAX_APEX_HEIGHT: f32 = 2_000.0;
/// Largest step multiplier either bias may carry.
pub const MAX_BIAS: f32 = 10.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("gravity must be finite and > 0, got {0}")]
    Gravity(f32),
    #[error("jump strength must be finite and > 0, got {0}")]
    JumpStrength(f32),
    #[error("{name} minimum must be > 0")]
    ZeroRangeMinimum { name: &'static str },
    #[error("jump apex must be finite and <= {max}, got {apex}")]
    ApexHeight { apex: f32, max: f32 },
    #[error("{name} must be within [0, {max}], got {value}")]
    Bias {
        name: &'static str,
        value: f32,
        max: f32,
    },
    #[error("lives must be >= 1")]
    NoLives,
}

/// Inclusive integer range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: u32,
    pub max: u32,
}

impl Span {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Uniform draw from `[min, max]`. A reversed span yields `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

/// Parameters a dimension is generated and played with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Downward acceleration per tick.
    pub gravity: f32,
    /// Upward velocity applied by a jump.
    pub jump_strength: f32,
    pub gap_range: Span,
    pub width_range: Span,
    pub vertical_bias: f32,
    pub horizontal_bias: f32,
    pub wall_jump: bool,
    pub lives: u32,
}

impl DifficultyProfile {
    /// Peak height of a standing jump: `jump_strength² / (2·gravity)`.
    pub fn apex_height(&self) -> f32 {
        self.jump_strength * self.jump_strength / (2.0 * self.gravity)
    }

    /// Check the profile and return a copy with degenerate ranges corrected.
    pub fn validate(&self) -> Result<Self, ProfileError> {
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(ProfileError::Gravity(self.gravity));
        }
        if !(self.jump_strength.is_finite() && self.jump_strength > 0.0) {
            return Err(ProfileError::JumpStrength(self.jump_strength));
        }
        let apex = self.apex_height();
        if !(apex.is_finite() && apex <= MAX_APEX_HEIGHT) {
            return Err(ProfileError::ApexHeight {
                apex,
                max: MAX_APEX_HEIGHT,
            });
        }
        if self.gap_range.min == 0 {
            return Err(ProfileError::ZeroRangeMinimum { name: "gap_range" });
        }
        if self.width_range.min == 0 {
            return Err(ProfileError::ZeroRangeMinimum {
                name: "width_range",
            });
        }
        for (name, value) in [
            ("vertical_bias", self.vertical_bias),
            ("horizontal_bias", self.horizontal_bias),
        ] {
            if !(0.0..=MAX_BIAS).contains(&value) {
                return Err(ProfileError::Bias {
                    name,
                    value,
                    max: MAX_BIAS,
                });
            }
        }
        if self.lives == 0 {
            return Err(ProfileError::NoLives);
        }

        let mut profile = self.clone();
        if profile.width_range.min >= profile.width_range.max {
            profile.width_range.min = profile
                .width_range
                .max
                .saturating_sub(WIDTH_RANGE_FALLBACK)
                .max(1);
        }
        if profile.gap_range.min >= profile.gap_range.max {
            profile.gap_range.max = profile.gap_range.min.saturating_add(GAP_RANGE_FALLBACK);
        }
        Ok(profile)
    }
}

#[cfg(test)]
pub(crate) fn sample_profile() -> DifficultyProfile {
    DifficultyProfile {
        gravity: 0.6,
        jump_strength: 9.0,
        gap_range: Span::new(60, 120),
        width_range: Span::new(120, 220),
        vertical_bias: 1.0,
        horizontal_bias: 1.0,
        wall_jump: false,
        lives: 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apex_height_matches_formula() {
        let p = sample_profile();
        assert!((p.apex_height() - 67.5).abs() < 1e-4);
    }

    #[test]
    fn valid_profile_passes_unchanged() {
        let p = sample_profile();
        assert_eq!(p.validate().unwrap(), p);
    }

    #[test]
    fn rejects_non_positive_gravity() {
        let mut p = sample_profile();
        p.gravity = 0.0;
        assert_eq!(p.validate(), Err(ProfileError::Gravity(0.0)));
        p.gravity = f32::NAN;
        assert!(matches!(p.validate(), Err(ProfileError::Gravity(_))));
    }

    #[test]
    fn rejects_non_positive_jump() {
        let mut p = sample_profile();
        p.jump_strength = -1.0;
        assert_eq!(p.validate(), Err(ProfileError::JumpStrength(-1.0)));
    }

    #[test]
    fn rejects_zero_minimums_and_lives() {
        let mut p = sample_profile();
        p.gap_range.min = 0;
        assert!(matches!(
            p.validate(),
            Err(ProfileError::ZeroRangeMinimum { name: "gap_range" })
        ));

        let mut p = sample_profile();
        p.lives = 0;
        assert_eq!(p.validate(), Err(ProfileError::NoLives));
    }

    #[test]
    fn rejects_negative_bias() {
        let mut p = sample_profile();
        p.horizontal_bias = -0.5;
        assert!(matches!(
            p.validate(),
            Err(ProfileError::Bias {
                name: "horizontal_bias",
                ..
            })
        ));
    }

    #[test]
    fn rejects_absurd_bias() {
        let mut p = sample_profile();
        p.vertical_bias = 1e30;
        assert!(matches!(
            p.validate(),
            Err(ProfileError::Bias {
                name: "vertical_bias",
                ..
            })
        ));
        p.vertical_bias = f32::INFINITY;
        assert!(p.validate().is_err());
        p.vertical_bias = MAX_BIAS;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn rejects_runaway_apex() {
        let mut p = sample_profile();
        p.jump_strength = 1e20;
        p.gravity = 1.0;
        assert!(matches!(
            p.validate(),
            Err(ProfileError::ApexHeight { apex, .. }) if apex.is_infinite()
        ));

        p.jump_strength = 1e3;
        assert!(matches!(p.validate(), Err(ProfileError::ApexHeight { .. })));

        // Tiny gravity also blows the apex up.
        let mut p = sample_profile();
        p.gravity = 1e-30;
        assert!(matches!(p.validate(), Err(ProfileError::ApexHeight { .. })));
    }

    #[test]
    fn degenerate_width_range_is_corrected() {
        let mut p = sample_profile();
        p.width_range = Span::new(200, 150);
        let fixed = p.validate().unwrap();
        assert_eq!(fixed.width_range, Span::new(130, 150));

        p.width_range = Span::new(10, 10);
        assert_eq!(p.validate().unwrap().width_range, Span::new(1, 10));
    }

    #[test]
    fn degenerate_gap_range_is_corrected() {
        let mut p = sample_profile();
        p.gap_range = Span::new(90, 90);
        assert_eq!(p.validate().unwrap().gap_range, Span::new(90, 110));
    }

    #[test]
    fn span_sample_is_inclusive() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let span = Span::new(4, 6);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let v = span.sample(&mut rng);
            assert!(span.contains(v));
            seen[(v - 4) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "every value in the span should appear");
    }
}
