//! Run settings loaded via OrthoConfig.
//!
//! Every value can come from a CLI flag, a `POPULATION_*` environment
//! variable or a configuration file. Unset values fall back to defaults
//! through accessors, and [`PopulationSettings::resolve`] validates the
//! whole set into a [`GenerationPlan`] before any file is touched.

use std::path::PathBuf;

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::config::{AgeRange, Chance};
use crate::error::ConfigError;
use crate::sink::OutputFormat;
use crate::validation::is_valid_table_name;

const DEFAULT_LOCALITY: &str = "HENARES";
const DEFAULT_MALE_CHANCE: u8 = 65;
const DEFAULT_TRANS_CHANCE: u8 = 1;
const DEFAULT_MIN_AGE: u16 = 24;
const DEFAULT_MAX_AGE: u16 = 71;
const DEFAULT_REFERENCE_DATE: &str = "2024-01-01";
const DEFAULT_COUNT: usize = 1000;
const DEFAULT_FORMAT: &str = "CSV";
const DEFAULT_TABLE_NAME: &str = "personas";
const DEFAULT_DIR: &str = ".";

/// Configuration values controlling one generation run.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "POPULATION")]
pub struct PopulationSettings {
    /// Locality code to generate people for.
    pub locality: Option<String>,
    /// Keep street rows whose postcode is empty.
    #[ortho_config(default = false)]
    pub allow_empty_postcode: bool,
    /// Percentage of people generated as male.
    pub male_chance: Option<u8>,
    /// Percentage of people whose gender is recorded as transgender.
    pub trans_chance: Option<u8>,
    /// Youngest age generated.
    pub min_age: Option<u16>,
    /// Oldest age generated.
    pub max_age: Option<u16>,
    /// Date ages are measured against, as `YYYY-MM-DD`.
    pub reference_date: Option<String>,
    /// Number of records to generate.
    pub count: Option<usize>,
    /// Output format: CSV, JSON or SQLITE.
    pub format: Option<String>,
    /// Table written by the SQLITE format.
    pub table_name: Option<String>,
    /// Directory holding the `nombres/` and `csv/` reference data.
    pub data_dir: Option<PathBuf>,
    /// Directory the output artifact is written into.
    pub output_dir: Option<PathBuf>,
    /// Locality registry JSON file replacing the built-in registry.
    pub locality_registry: Option<PathBuf>,
    /// Seed for reproducible runs.
    pub seed: Option<u64>,
}

impl PopulationSettings {
    /// Return the configured locality code, falling back to the default.
    #[must_use]
    pub fn locality(&self) -> &str {
        self.locality.as_deref().unwrap_or(DEFAULT_LOCALITY)
    }

    /// Return the configured male percentage, falling back to the default.
    #[must_use]
    pub fn male_chance(&self) -> u8 {
        self.male_chance.unwrap_or(DEFAULT_MALE_CHANCE)
    }

    /// Return the configured transgender percentage, falling back to the default.
    #[must_use]
    pub fn trans_chance(&self) -> u8 {
        self.trans_chance.unwrap_or(DEFAULT_TRANS_CHANCE)
    }

    /// Return the configured minimum age, falling back to the default.
    #[must_use]
    pub fn min_age(&self) -> u16 {
        self.min_age.unwrap_or(DEFAULT_MIN_AGE)
    }

    /// Return the configured maximum age, falling back to the default.
    #[must_use]
    pub fn max_age(&self) -> u16 {
        self.max_age.unwrap_or(DEFAULT_MAX_AGE)
    }

    /// Return the configured reference date text, falling back to the default.
    #[must_use]
    pub fn reference_date(&self) -> &str {
        self.reference_date
            .as_deref()
            .unwrap_or(DEFAULT_REFERENCE_DATE)
    }

    /// Return the configured record count, falling back to the default.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.unwrap_or(DEFAULT_COUNT)
    }

    /// Return the configured format name, falling back to the default.
    #[must_use]
    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_FORMAT)
    }

    /// Return the configured table name, falling back to the default.
    #[must_use]
    pub fn table_name(&self) -> &str {
        self.table_name.as_deref().unwrap_or(DEFAULT_TABLE_NAME)
    }

    /// Return the configured data directory, falling back to the working directory.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR))
    }

    /// Return the configured output directory, falling back to the working directory.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIR))
    }

    /// Validates the settings into a plan.
    ///
    /// The locality code is only normalized here; whether it exists is
    /// checked against the registry when the run starts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a percentage exceeds 100, the age range is
    /// inverted, the reference date or format cannot be parsed, the table
    /// name is not a plain identifier, or a directory is not valid UTF-8.
    pub fn resolve(&self) -> Result<GenerationPlan, ConfigError> {
        let male_chance = Chance::new("male_chance", self.male_chance())?;
        let trans_chance = Chance::new("trans_chance", self.trans_chance())?;
        let ages = AgeRange::new(self.min_age(), self.max_age())?;
        let reference_date = parse_reference_date(self.reference_date())?;
        let format = self.format().parse::<OutputFormat>()?;

        let table_name = self.table_name();
        if !is_valid_table_name(table_name) {
            return Err(ConfigError::InvalidTableName {
                value: table_name.to_owned(),
            });
        }

        Ok(GenerationPlan {
            locality_code: self.locality().trim().to_uppercase(),
            allow_empty_postcode: self.allow_empty_postcode,
            male_chance,
            trans_chance,
            ages,
            reference_date,
            count: self.count(),
            format,
            table_name: table_name.to_owned(),
            data_dir: utf8_dir(self.data_dir())?,
            output_dir: utf8_dir(self.output_dir())?,
            locality_registry: self.locality_registry.clone(),
            seed: self.seed,
        })
    }
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    /// Upper-case locality code.
    pub locality_code: String,
    /// Keep street rows whose postcode is empty.
    pub allow_empty_postcode: bool,
    /// Probability that a person is male.
    pub male_chance: Chance,
    /// Probability that a gender is recorded as transgender.
    pub trans_chance: Chance,
    /// Ages to draw from.
    pub ages: AgeRange,
    /// Date ages are measured against.
    pub reference_date: NaiveDate,
    /// Number of records to generate.
    pub count: usize,
    /// Output serialization.
    pub format: OutputFormat,
    /// Table written by the SQLite format.
    pub table_name: String,
    /// Directory holding the reference data.
    pub data_dir: Utf8PathBuf,
    /// Directory the artifact is written into.
    pub output_dir: Utf8PathBuf,
    /// Registry file replacing the built-in registry.
    pub locality_registry: Option<PathBuf>,
    /// Seed for reproducible runs.
    pub seed: Option<u64>,
}

fn parse_reference_date(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|err| {
        ConfigError::InvalidReferenceDate {
            value: value.to_owned(),
            message: err.to_string(),
        }
    })
}

fn utf8_dir(path: PathBuf) -> Result<Utf8PathBuf, ConfigError> {
    Utf8PathBuf::from_path_buf(path).map_err(|raw| ConfigError::NonUtf8Path { path: raw })
}
