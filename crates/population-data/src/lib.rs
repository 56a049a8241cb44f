//! Synthetic population records for test and demonstration databases.
//!
//! This crate generates fictitious Spanish residents of a chosen locality:
//! given names and surnames drawn from reference lists, real street
//! addresses from OpenStreetMap exports, ages and birth dates, national ID
//! numbers with a valid check letter and landline phone numbers with the
//! locality prefix. Identifiers are unique within a run and a seeded run is
//! fully reproducible.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Loading name, surname and street reference lists from CSV files
//! - A built-in locality registry, replaceable by a versioned JSON file
//! - Streaming records into CSV, JSON or SQLite output
//! - Layered settings from CLI flags, `POPULATION_*` variables and files
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use population_data::{
//!     AddressEntry, AgeRange, Chance, GeneratorConfig, ReferenceData, Sex,
//!     generate_population, is_valid_national_id,
//! };
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let reference = ReferenceData::new(
//!     vec!["ANTONIO".to_owned(), "JOSE".to_owned()],
//!     vec!["MARIA".to_owned()],
//!     vec!["GARCIA".to_owned(), "SANCHEZ".to_owned()],
//!     vec![AddressEntry {
//!         locality: "Alcalá de Henares".to_owned(),
//!         raw_house_number: "12-14".to_owned(),
//!         postcode: "28801".to_owned(),
//!         region: "Comunidad de Madrid".to_owned(),
//!         raw_street: "Calle Mayor;Plaza de Cervantes".to_owned(),
//!     }],
//! );
//! let config = GeneratorConfig {
//!     male_chance: Chance::ALWAYS,
//!     trans_chance: Chance::NEVER,
//!     ages: AgeRange::new(30, 30).expect("valid range"),
//!     reference_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
//!     phone_prefix: "91".to_owned(),
//!     province: "Madrid".to_owned(),
//! };
//!
//! let people = generate_population(&reference, config, ChaCha8Rng::seed_from_u64(7), 5)
//!     .expect("generation succeeds");
//!
//! assert_eq!(people.len(), 5);
//! for person in &people {
//!     assert_eq!(person.sex, Sex::Male);
//!     assert_eq!(person.street, "Calle Mayor");
//!     assert_eq!(person.house_number, "12");
//!     assert!(is_valid_national_id(&person.national_id));
//! }
//! ```

mod address;
mod app;
mod birth_date;
mod config;
mod error;
mod generator;
mod identifiers;
mod locality;
mod record;
mod reference;
mod settings;
pub mod sink;
mod validation;

pub use address::{AddressEntry, AddressField, normalize_address_field};
pub use app::run;
pub use birth_date::derive_birth_date;
pub use config::{AgeRange, Chance, GeneratorConfig};
pub use error::{
    ConfigError, GenerationError, IdentifierKind, LocalityError, PopulationError,
    ReferenceDataError, SinkError,
};
pub use generator::{PopulationGenerator, generate_population};
pub use identifiers::{
    CHECK_LETTERS, IssuedIdentifiers, NATIONAL_ID_CAPACITY, PHONE_CAPACITY, SUFFIX_PERMUTATIONS,
    generate_national_id, generate_phone, is_valid_national_id, national_id_letter,
};
pub use locality::{DEFAULT_PROVINCE, Locality, LocalityRegistry};
pub use record::{FIELD_COUNT, FIELD_NAMES, Gender, PersonRecord, Sex};
pub use reference::{
    ADDRESS_DIR, FEMALE_NAMES_FILE, MALE_NAMES_FILE, ReferenceData, SURNAMES_FILE,
    read_addresses, read_column,
};
pub use settings::{GenerationPlan, PopulationSettings};
pub use sink::{OutputFormat, OutputTarget, WriteSummary, output_file_name, write_population};
pub use validation::{
    PHONE_PREFIX_LEN, TABLE_NAME_MAX, is_valid_phone_prefix, is_valid_table_name,
};
