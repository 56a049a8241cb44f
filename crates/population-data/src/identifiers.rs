//! Phone number and national ID generation with run-scoped uniqueness.
//!
//! Both identifiers end in six distinct digits drawn from `0..=8` in random
//! order, so each leading pattern admits only 9!/3! = 60 480 suffixes.
//! [`IssuedIdentifiers`] tracks what a run has handed out and redraws until
//! a candidate is new.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::{GenerationError, IdentifierKind};

/// Check letters indexed by the national ID body modulo 23.
pub const CHECK_LETTERS: [char; 23] = [
    'T', 'R', 'W', 'A', 'G', 'M', 'Y', 'F', 'P', 'D', 'X', 'B', 'N', 'J', 'Z', 'S', 'Q', 'V', 'H',
    'L', 'C', 'K', 'E',
];

/// Digits the random suffix is drawn from. `9` is never used.
const SUFFIX_DIGITS: [u8; 9] = [0, 1, 2, 3, 4, 5, 6, 7, 8];

/// Length of the random suffix.
const SUFFIX_LEN: usize = 6;

/// Ordered draws of six distinct digits out of nine.
pub const SUFFIX_PERMUTATIONS: usize = 60_480;

/// Distinct phone numbers for one prefix: three lead digits times the suffixes.
pub const PHONE_CAPACITY: usize = 3 * SUFFIX_PERMUTATIONS;

/// Distinct national IDs: three second digits times the suffixes.
pub const NATIONAL_ID_CAPACITY: usize = 3 * SUFFIX_PERMUTATIONS;

/// Returns the check letter for an eight-digit national ID body.
///
/// # Examples
///
/// ```
/// use population_data::national_id_letter;
///
/// assert_eq!(national_id_letter(0), 'T');
/// assert_eq!(national_id_letter(12_345_678), 'Z');
/// ```
#[must_use]
#[expect(
    clippy::integer_division_remainder_used,
    reason = "the check letter is defined by the remainder modulo 23"
)]
#[expect(
    clippy::indexing_slicing,
    reason = "a remainder modulo the table length is always in bounds"
)]
pub const fn national_id_letter(body: u32) -> char {
    CHECK_LETTERS[(body % 23) as usize]
}

/// Returns `true` if `id` is eight digits followed by the matching check letter.
///
/// # Examples
///
/// ```
/// use population_data::is_valid_national_id;
///
/// assert!(is_valid_national_id("12345678Z"));
/// assert!(!is_valid_national_id("12345678A"));
/// assert!(!is_valid_national_id("1234567Z"));
/// ```
#[must_use]
pub fn is_valid_national_id(id: &str) -> bool {
    let mut chars = id.chars();
    let Some(letter) = chars.next_back() else {
        return false;
    };
    let body = chars.as_str();
    body.len() == 8
        && body.bytes().all(|b| b.is_ascii_digit())
        && body
            .parse::<u32>()
            .is_ok_and(|value| national_id_letter(value) == letter)
}

/// Draws a candidate phone number: prefix, a digit in `6..=8`, then the suffix.
///
/// Uniqueness is not checked; see [`IssuedIdentifiers::issue_phone`].
pub fn generate_phone<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> String {
    let mut phone = String::with_capacity(prefix.len() + 1 + SUFFIX_LEN);
    phone.push_str(prefix);
    phone.push(digit_char(rng.random_range(6..=8)));
    for digit in draw_suffix(rng) {
        phone.push(digit_char(digit));
    }
    phone
}

/// Draws a candidate national ID: `0`, a digit in `7..=9`, the suffix and the
/// check letter.
///
/// Uniqueness is not checked; see [`IssuedIdentifiers::issue_national_id`].
pub fn generate_national_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let second: u8 = rng.random_range(7..=9);
    let mut id = String::with_capacity(9);
    let mut body = 0_u32;
    for digit in [0, second].into_iter().chain(draw_suffix(rng)) {
        id.push(digit_char(digit));
        body = body * 10 + u32::from(digit);
    }
    id.push(national_id_letter(body));
    id
}

fn draw_suffix<R: Rng + ?Sized>(rng: &mut R) -> [u8; SUFFIX_LEN] {
    let mut pool = SUFFIX_DIGITS;
    let (picked, _) = pool.partial_shuffle(rng, SUFFIX_LEN);
    let mut suffix = [0; SUFFIX_LEN];
    suffix.copy_from_slice(picked);
    suffix
}

fn digit_char(digit: u8) -> char {
    char::from(b'0' + digit)
}

/// Identifiers already handed out during one run.
///
/// Phone numbers are tracked per prefix, each with its own
/// [`PHONE_CAPACITY`].
#[derive(Debug, Clone, Default)]
pub struct IssuedIdentifiers {
    phones: HashMap<String, HashSet<String>>,
    national_ids: HashSet<String>,
}

impl IssuedIdentifiers {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws phone numbers until one has not been issued, then records it.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::IdentifierSpaceExhausted`] once every
    /// possible number for `prefix` has been issued. Numbers issued under
    /// other prefixes do not count towards that limit.
    pub fn issue_phone<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        prefix: &str,
    ) -> Result<String, GenerationError> {
        let issued = self.phones.entry(prefix.to_owned()).or_default();
        issue_unique(issued, IdentifierKind::Phone, PHONE_CAPACITY, || {
            generate_phone(rng, prefix)
        })
    }

    /// Draws national IDs until one has not been issued, then records it.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::IdentifierSpaceExhausted`] once every
    /// possible ID has been issued.
    pub fn issue_national_id<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<String, GenerationError> {
        issue_unique(
            &mut self.national_ids,
            IdentifierKind::NationalId,
            NATIONAL_ID_CAPACITY,
            || generate_national_id(rng),
        )
    }

    /// Returns how many phone numbers have been issued.
    #[must_use]
    pub fn phone_count(&self) -> usize {
        self.phones.values().map(HashSet::len).sum()
    }

    /// Returns how many national IDs have been issued.
    #[must_use]
    pub fn national_id_count(&self) -> usize {
        self.national_ids.len()
    }
}

fn issue_unique<F>(
    issued: &mut HashSet<String>,
    kind: IdentifierKind,
    capacity: usize,
    mut draw: F,
) -> Result<String, GenerationError>
where
    F: FnMut() -> String,
{
    if issued.len() >= capacity {
        return Err(GenerationError::IdentifierSpaceExhausted { kind, capacity });
    }

    let mut attempts = 1_usize;
    loop {
        let candidate = draw();
        if !issued.contains(&candidate) {
            if attempts > 1 {
                debug!(%kind, attempts, "redrew colliding identifier");
            }
            issued.insert(candidate.clone());
            return Ok(candidate);
        }
        attempts += 1;
    }
}
