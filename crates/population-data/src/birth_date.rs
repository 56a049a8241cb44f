//! Birth date derivation from an age and a reference date.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use tracing::debug;

use crate::config::AgeRange;
use crate::error::GenerationError;

/// Picks a random birth date for someone aged `age` at `reference`.
///
/// The birth year is `reference.year() - age`; the day is uniform over that
/// whole calendar year, so the result does not account for whether the
/// birthday has already passed at `reference`.
///
/// An `age` outside `ages` is replaced by a fresh draw from `ages`. The
/// record generator always passes an in-range age.
///
/// # Errors
///
/// Returns [`GenerationError::BirthYearOutOfRange`] if the birth year cannot
/// be represented.
///
/// # Example
///
/// ```
/// use chrono::{Datelike, NaiveDate};
/// use population_data::{AgeRange, derive_birth_date};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let ages = AgeRange::new(24, 71).expect("valid range");
/// let reference = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
///
/// let born = derive_birth_date(&mut rng, 30, ages, reference).expect("in range");
/// assert_eq!(born.year(), 1994);
/// ```
pub fn derive_birth_date<R: Rng + ?Sized>(
    rng: &mut R,
    age: u16,
    ages: AgeRange,
    reference: NaiveDate,
) -> Result<NaiveDate, GenerationError> {
    let effective_age = if ages.contains(age) {
        age
    } else {
        let substitute = ages.sample(rng);
        debug!(age, substitute, "age outside configured range replaced");
        substitute
    };

    let year = reference.year() - i32::from(effective_age);
    let out_of_range = || GenerationError::BirthYearOutOfRange { year };
    let last_day = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(out_of_range)?;
    let ordinal = rng.random_range(1..=last_day.ordinal());
    NaiveDate::from_yo_opt(year, ordinal).ok_or_else(out_of_range)
}
