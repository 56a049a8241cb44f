//! Person record generation from reference lists.
//!
//! A [`PopulationGenerator`] owns the random number generator and the set of
//! identifiers issued so far, so uniqueness holds across every record it
//! produces. Seeding the RNG makes a run reproducible.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::birth_date::derive_birth_date;
use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::identifiers::IssuedIdentifiers;
use crate::record::{Gender, PersonRecord, Sex};
use crate::reference::ReferenceData;

const MALE_NAMES: &str = "male names";
const FEMALE_NAMES: &str = "female names";
const SURNAMES: &str = "surnames";
const ADDRESSES: &str = "addresses";

/// Generates person records for one run.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use population_data::{
///     AddressEntry, AgeRange, Chance, GeneratorConfig, PopulationGenerator, ReferenceData,
/// };
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let reference = ReferenceData::new(
///     vec!["ANTONIO".to_owned()],
///     vec!["MARIA".to_owned()],
///     vec!["GARCIA".to_owned(), "LOPEZ".to_owned()],
///     vec![AddressEntry {
///         locality: "Madrid".to_owned(),
///         raw_house_number: "5".to_owned(),
///         postcode: "28013".to_owned(),
///         region: String::new(),
///         raw_street: "Calle Mayor".to_owned(),
///     }],
/// );
/// let config = GeneratorConfig {
///     male_chance: Chance::new("male_chance", 65).expect("valid"),
///     trans_chance: Chance::new("trans_chance", 1).expect("valid"),
///     ages: AgeRange::new(24, 71).expect("valid"),
///     reference_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid"),
///     phone_prefix: "91".to_owned(),
///     province: "Madrid".to_owned(),
/// };
///
/// let mut generator =
///     PopulationGenerator::new(&reference, config, ChaCha8Rng::seed_from_u64(42))
///         .expect("reference lists are populated");
/// let person = generator.generate().expect("record generated");
///
/// assert_eq!(person.street, "Calle Mayor");
/// assert!(person.phone.starts_with("91"));
/// ```
#[derive(Debug)]
pub struct PopulationGenerator<'a, R> {
    reference: &'a ReferenceData,
    config: GeneratorConfig,
    issued: IssuedIdentifiers,
    rng: R,
}

impl<'a, R: Rng> PopulationGenerator<'a, R> {
    /// Creates a generator with an empty identifier history.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::EmptyReferenceData`] if a list that can be
    /// drawn from is empty.
    ///
    /// Only reachable lists are checked. The female name list may be empty
    /// when `male_chance` is 100, and the male name list may be empty when it
    /// is 0, because no record will ever draw from them. Surnames and
    /// addresses are always required.
    pub fn new(
        reference: &'a ReferenceData,
        config: GeneratorConfig,
        rng: R,
    ) -> Result<Self, GenerationError> {
        if config.male_chance.percent() > 0 {
            require_entries(reference.male_names(), MALE_NAMES)?;
        }
        if config.male_chance.percent() < 100 {
            require_entries(reference.female_names(), FEMALE_NAMES)?;
        }
        require_entries(reference.surnames(), SURNAMES)?;
        require_entries(reference.addresses(), ADDRESSES)?;

        Ok(Self {
            reference,
            config,
            issued: IssuedIdentifiers::new(),
            rng,
        })
    }

    /// Generates the next record.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if an identifier space is exhausted or the
    /// birth date cannot be represented.
    pub fn generate(&mut self) -> Result<PersonRecord, GenerationError> {
        let rng = &mut self.rng;
        let reference = self.reference;

        let (sex, names, names_label) = if self.config.male_chance.roll(rng) {
            (Sex::Male, reference.male_names(), MALE_NAMES)
        } else {
            (Sex::Female, reference.female_names(), FEMALE_NAMES)
        };
        let given_name = pick(rng, names, names_label)?;
        let first_surname = pick(rng, reference.surnames(), SURNAMES)?;
        let second_surname = pick(rng, reference.surnames(), SURNAMES)?;
        let address = pick(rng, reference.addresses(), ADDRESSES)?;
        let age = self.config.ages.sample(rng);

        let phone = self.issued.issue_phone(rng, &self.config.phone_prefix)?;
        let national_id = self.issued.issue_national_id(rng)?;

        let gender = if self.config.trans_chance.roll(rng) {
            Gender::Transgender
        } else {
            Gender::from(sex)
        };
        let birth_date = derive_birth_date(rng, age, self.config.ages, self.config.reference_date)?;

        Ok(PersonRecord {
            given_name: given_name.clone(),
            surnames: format!("{first_surname} {second_surname}"),
            street: address.street().to_owned(),
            house_number: address.house_number().to_owned(),
            postcode: address.postcode.clone(),
            locality: address.locality.clone(),
            province: self.config.province.clone(),
            age,
            sex,
            gender,
            birth_date,
            national_id,
            phone,
        })
    }

    /// Returns a lazy iterator over the next `count` records.
    ///
    /// Records are produced on demand, so output sinks can stream them.
    pub fn records(
        &mut self,
        count: usize,
    ) -> impl Iterator<Item = Result<PersonRecord, GenerationError>> + '_ {
        (0..count).map(move |_| self.generate())
    }

    /// Returns the identifiers issued so far.
    #[must_use]
    pub const fn issued(&self) -> &IssuedIdentifiers {
        &self.issued
    }
}

/// Generates `count` records into memory.
///
/// # Errors
///
/// Returns [`GenerationError`] if the generator cannot be created or a
/// record cannot be generated.
pub fn generate_population<R: Rng>(
    reference: &ReferenceData,
    config: GeneratorConfig,
    rng: R,
    count: usize,
) -> Result<Vec<PersonRecord>, GenerationError> {
    let mut generator = PopulationGenerator::new(reference, config, rng)?;
    generator.records(count).collect()
}

fn require_entries<T>(list: &[T], label: &'static str) -> Result<(), GenerationError> {
    if list.is_empty() {
        return Err(GenerationError::EmptyReferenceData { list: label });
    }
    Ok(())
}

fn pick<'a, T, R: Rng + ?Sized>(
    rng: &mut R,
    list: &'a [T],
    label: &'static str,
) -> Result<&'a T, GenerationError> {
    list.choose(rng)
        .ok_or(GenerationError::EmptyReferenceData { list: label })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{Datelike, NaiveDate};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::address::AddressEntry;
    use crate::config::{AgeRange, Chance};
    use crate::identifiers::is_valid_national_id;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    fn address(street: &str, number: &str) -> AddressEntry {
        AddressEntry {
            locality: "Alcalá de Henares".to_owned(),
            raw_house_number: number.to_owned(),
            postcode: "28801".to_owned(),
            region: "Comunidad de Madrid".to_owned(),
            raw_street: street.to_owned(),
        }
    }

    #[fixture]
    fn reference() -> ReferenceData {
        ReferenceData::new(
            names(&["ANTONIO", "JOSE", "MANUEL"]),
            names(&["MARIA", "CARMEN", "JOSEFA"]),
            names(&["GARCIA", "RODRIGUEZ", "GONZALEZ", "FERNANDEZ"]),
            vec![
                address("Calle Mayor;Plaza de Cervantes", "12-14"),
                address("Calle de Libreros", "3,5"),
            ],
        )
    }

    #[fixture]
    fn config() -> GeneratorConfig {
        GeneratorConfig {
            male_chance: Chance::new("male_chance", 65).expect("valid chance"),
            trans_chance: Chance::new("trans_chance", 1).expect("valid chance"),
            ages: AgeRange::new(24, 71).expect("valid range"),
            reference_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            phone_prefix: "91".to_owned(),
            province: "Madrid".to_owned(),
        }
    }

    fn generate(reference: &ReferenceData, config: GeneratorConfig, count: usize) -> Vec<PersonRecord> {
        generate_population(reference, config, ChaCha8Rng::seed_from_u64(42), count)
            .expect("generation should succeed")
    }

    #[rstest]
    fn generates_requested_count(reference: ReferenceData, config: GeneratorConfig) {
        assert_eq!(generate(&reference, config, 25).len(), 25);
    }

    #[rstest]
    fn generation_is_deterministic_for_a_seed(reference: ReferenceData, config: GeneratorConfig) {
        let first = generate(&reference, config.clone(), 50);
        let second = generate(&reference, config, 50);

        assert_eq!(first, second);
    }

    #[rstest]
    fn records_satisfy_field_invariants(reference: ReferenceData, config: GeneratorConfig) {
        let records = generate(&reference, config, 500);

        for person in &records {
            assert!((24..=71).contains(&person.age));
            assert_eq!(person.birth_date.year(), 2024 - i32::from(person.age));
            assert!(is_valid_national_id(&person.national_id));
            assert!(person.phone.starts_with("91"));
            assert!(matches!(person.phone.get(2..3), Some("6" | "7" | "8")));
            assert!(["Calle Mayor", "Calle de Libreros"].contains(&person.street.as_str()));
            assert!(["12", "3"].contains(&person.house_number.as_str()));
            assert_eq!(person.province, "Madrid");
            assert_eq!(person.locality, "Alcalá de Henares");
            assert_eq!(person.surnames.split(' ').count(), 2);
            if person.gender != Gender::Transgender {
                assert_eq!(person.gender, Gender::from(person.sex));
            }
        }
    }

    #[rstest]
    fn given_name_matches_sex(reference: ReferenceData, config: GeneratorConfig) {
        for person in generate(&reference, config, 300) {
            let list = match person.sex {
                Sex::Male => reference.male_names(),
                Sex::Female => reference.female_names(),
            };
            assert!(list.contains(&person.given_name), "{person:?}");
        }
    }

    #[rstest]
    fn identifiers_are_unique_within_a_run(reference: ReferenceData, config: GeneratorConfig) {
        let records = generate(&reference, config, 3_000);
        let phones: HashSet<_> = records.iter().map(|p| p.phone.as_str()).collect();
        let ids: HashSet<_> = records.iter().map(|p| p.national_id.as_str()).collect();

        assert_eq!(phones.len(), records.len());
        assert_eq!(ids.len(), records.len());
    }

    #[rstest]
    #[case::always_male(100, Sex::Male)]
    #[case::always_female(0, Sex::Female)]
    fn extreme_male_chance_fixes_sex(
        reference: ReferenceData,
        mut config: GeneratorConfig,
        #[case] percent: u8,
        #[case] expected: Sex,
    ) {
        config.male_chance = Chance::new("male_chance", percent).expect("valid chance");

        assert!(generate(&reference, config, 200).iter().all(|p| p.sex == expected));
    }

    #[rstest]
    fn full_trans_chance_marks_every_record(reference: ReferenceData, mut config: GeneratorConfig) {
        config.trans_chance = Chance::ALWAYS;

        assert!(
            generate(&reference, config, 100)
                .iter()
                .all(|p| p.gender == Gender::Transgender)
        );
    }

    #[rstest]
    fn unused_name_list_may_be_empty(mut config: GeneratorConfig) {
        let reference = ReferenceData::new(
            names(&["ANTONIO"]),
            Vec::new(),
            names(&["GARCIA"]),
            vec![address("Calle Mayor", "1")],
        );
        config.male_chance = Chance::ALWAYS;

        let records = generate(&reference, config, 3);
        assert!(records.iter().all(|p| p.surnames == "GARCIA GARCIA"));
    }

    #[rstest]
    #[case::male_names(ReferenceData::new(Vec::new(), names(&["M"]), names(&["S"]), vec![address("C", "1")]), "male names")]
    #[case::female_names(ReferenceData::new(names(&["H"]), Vec::new(), names(&["S"]), vec![address("C", "1")]), "female names")]
    #[case::surnames(ReferenceData::new(names(&["H"]), names(&["M"]), Vec::new(), vec![address("C", "1")]), "surnames")]
    #[case::addresses(ReferenceData::new(names(&["H"]), names(&["M"]), names(&["S"]), Vec::new()), "addresses")]
    fn empty_reference_list_fails_fast(
        config: GeneratorConfig,
        #[case] reference: ReferenceData,
        #[case] list: &'static str,
    ) {
        let result = PopulationGenerator::new(&reference, config, ChaCha8Rng::seed_from_u64(1));

        assert!(matches!(
            result,
            Err(GenerationError::EmptyReferenceData { list: found }) if found == list
        ));
    }

    #[rstest]
    fn generator_tracks_issued_identifiers(reference: ReferenceData, config: GeneratorConfig) {
        let mut generator =
            PopulationGenerator::new(&reference, config, ChaCha8Rng::seed_from_u64(5))
                .expect("generator");
        let records: Vec<_> = generator
            .records(10)
            .collect::<Result<_, _>>()
            .expect("records");

        assert_eq!(records.len(), 10);
        assert_eq!(generator.issued().phone_count(), 10);
        assert_eq!(generator.issued().national_id_count(), 10);
    }
}
