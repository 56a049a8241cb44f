//! Validated generation parameters consumed by the record generator.

use chrono::NaiveDate;
use rand::Rng;

use crate::error::ConfigError;

/// Inclusive age range for generated people.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    min: u16,
    max: u16,
}

impl AgeRange {
    /// Creates a range from `min` to `max` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvertedAgeRange`] if `min > max`.
    ///
    /// # Example
    ///
    /// ```
    /// use population_data::AgeRange;
    ///
    /// let ages = AgeRange::new(24, 71).expect("valid range");
    /// assert!(ages.contains(24));
    /// assert!(ages.contains(71));
    /// assert!(!ages.contains(72));
    /// assert!(AgeRange::new(40, 30).is_err());
    /// ```
    pub const fn new(min: u16, max: u16) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvertedAgeRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Returns the lowest age.
    #[must_use]
    pub const fn min(self) -> u16 {
        self.min
    }

    /// Returns the highest age.
    #[must_use]
    pub const fn max(self) -> u16 {
        self.max
    }

    /// Returns `true` if `age` lies within the range.
    #[must_use]
    pub const fn contains(self, age: u16) -> bool {
        self.min <= age && age <= self.max
    }

    /// Draws an age uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> u16 {
        rng.random_range(self.min..=self.max)
    }
}

/// A percentage in `0..=100` used for threshold draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chance(u8);

impl Chance {
    /// Always true.
    pub const ALWAYS: Self = Self(100);
    /// Always false.
    pub const NEVER: Self = Self(0);

    /// Validates a percentage.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ChanceOutOfRange`] if `percent > 100`;
    /// `setting` names the offending value in the error.
    pub const fn new(setting: &'static str, percent: u8) -> Result<Self, ConfigError> {
        if percent > 100 {
            return Err(ConfigError::ChanceOutOfRange {
                setting,
                value: percent,
            });
        }
        Ok(Self(percent))
    }

    /// Returns the percentage.
    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }

    /// Draws an integer in `0..100` and reports whether it falls below the
    /// percentage. `100` always succeeds and `0` never does.
    pub fn roll<R: Rng + ?Sized>(self, rng: &mut R) -> bool {
        rng.random_range(0..100_u8) < self.0
    }
}

/// Parameters of the record generator for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Probability that a person is male.
    pub male_chance: Chance,
    /// Probability that a person's gender is recorded as transgender.
    pub trans_chance: Chance,
    /// Ages to draw from.
    pub ages: AgeRange,
    /// Date ages are measured against.
    pub reference_date: NaiveDate,
    /// Two-digit landline prefix of the locality.
    pub phone_prefix: String,
    /// Province written into every record.
    pub province: String,
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, true)]
    #[case(65, true)]
    #[case(100, true)]
    #[case(101, false)]
    #[case(255, false)]
    fn validates_chance(#[case] percent: u8, #[case] valid: bool) {
        assert_eq!(Chance::new("male_chance", percent).is_ok(), valid);
    }

    #[test]
    fn extreme_chances_are_deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1_000 {
            assert!(Chance::ALWAYS.roll(&mut rng));
            assert!(!Chance::NEVER.roll(&mut rng));
        }
    }

    #[test]
    fn sampled_ages_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let ages = AgeRange::new(18, 20).expect("valid range");
        let samples: Vec<u16> = (0..500).map(|_| ages.sample(&mut rng)).collect();

        assert!(samples.iter().all(|age| ages.contains(*age)));
        assert!(samples.contains(&18));
        assert!(samples.contains(&20));
    }

    #[test]
    fn single_age_range_is_allowed() {
        let ages = AgeRange::new(30, 30).expect("valid range");
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        assert_eq!(ages.sample(&mut rng), 30);
    }

    #[test]
    fn inverted_age_range_is_rejected() {
        assert_eq!(
            AgeRange::new(71, 24),
            Err(ConfigError::InvertedAgeRange { min: 71, max: 24 })
        );
    }
}
