//! Error types for the population-data crate.
//!
//! Each concern has its own semantic error enum built with `thiserror`.
//! Variants carry owned context rather than foreign error values so that
//! every error is `Clone + PartialEq` and can be asserted directly in tests.

use std::path::PathBuf;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while resolving run settings into a generation plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The settings layers (CLI, environment, files) could not be merged.
    #[error("failed to load settings: {message}")]
    Load {
        /// Description of the loader failure.
        message: String,
    },

    /// A percentage setting exceeds 100.
    #[error("{setting} must be between 0 and 100, found {value}")]
    ChanceOutOfRange {
        /// Name of the offending setting.
        setting: &'static str,
        /// Value supplied.
        value: u8,
    },

    /// The minimum age is greater than the maximum age.
    #[error("minimum age {min} is greater than maximum age {max}")]
    InvertedAgeRange {
        /// Configured minimum age.
        min: u16,
        /// Configured maximum age.
        max: u16,
    },

    /// The reference date is not an ISO calendar date.
    #[error("invalid reference date '{value}': {message}")]
    InvalidReferenceDate {
        /// Raw value supplied.
        value: String,
        /// Parser error message.
        message: String,
    },

    /// The output format is not one of CSV, JSON or SQLITE.
    #[error("unknown output format '{value}': expected CSV, JSON or SQLITE")]
    UnknownFormat {
        /// Raw value supplied.
        value: String,
    },

    /// The table name is not a plain SQL identifier.
    #[error("invalid table name '{value}'")]
    InvalidTableName {
        /// Raw value supplied.
        value: String,
    },

    /// A configured directory is not valid UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Offending path.
        path: PathBuf,
    },
}

/// Errors raised while loading or querying the locality registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalityError {
    /// The registry file could not be read.
    #[error("failed to read locality registry at '{path}': {message}")]
    IoError {
        /// Path to the registry file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The registry JSON is malformed or missing required fields.
    #[error("invalid locality registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported locality registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// The registry defines no localities.
    #[error("locality registry contains no localities")]
    EmptyLocalities,

    /// Two entries share a code.
    #[error("locality '{code}' is defined more than once")]
    DuplicateLocality {
        /// Duplicated code.
        code: String,
    },

    /// A phone prefix is not exactly two digits.
    #[error("locality '{code}' has invalid phone prefix '{value}'")]
    InvalidPhonePrefix {
        /// Locality code.
        code: String,
        /// The invalid prefix.
        value: String,
    },

    /// An address file entry is not a bare file name.
    #[error("locality '{code}' has invalid address file '{value}'")]
    InvalidAddressFile {
        /// Locality code.
        code: String,
        /// The invalid file name.
        value: String,
    },

    /// A display name is blank.
    #[error("locality '{code}' has a blank display name")]
    BlankDisplayName {
        /// Locality code.
        code: String,
    },

    /// The configured locality is not defined in the registry.
    #[error("locality '{code}' is not defined in the locality registry")]
    UnknownLocality {
        /// The code that was not found.
        code: String,
    },
}

/// Errors raised while reading reference lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceDataError {
    /// A reference file or directory could not be opened or read.
    #[error("failed to read reference data at '{path}': {message}")]
    IoError {
        /// Path of the file or directory.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// A reference file is not well-formed CSV.
    #[error("invalid CSV in '{path}': {message}")]
    ParseError {
        /// Path of the file.
        path: Utf8PathBuf,
        /// Parser error message.
        message: String,
    },

    /// A reference file lacks a required column.
    #[error("'{path}' has no '{column}' column")]
    MissingColumn {
        /// Path of the file.
        path: Utf8PathBuf,
        /// Column that was expected.
        column: &'static str,
    },
}

/// Identifier families that must be unique within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// Landline phone numbers.
    Phone,
    /// National ID numbers.
    NationalId,
}

impl std::fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Phone => f.write_str("phone number"),
            Self::NationalId => f.write_str("national ID"),
        }
    }
}

/// Errors raised while generating person records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A reference list needed for selection is empty.
    #[error("reference list '{list}' is empty")]
    EmptyReferenceData {
        /// Name of the empty list.
        list: &'static str,
    },

    /// Every possible identifier of a kind has already been issued.
    #[error("all {capacity} possible {kind} values have been issued")]
    IdentifierSpaceExhausted {
        /// Identifier family.
        kind: IdentifierKind,
        /// Number of distinct values the generator can produce.
        capacity: usize,
    },

    /// The derived birth year cannot be represented as a calendar date.
    #[error("birth year {year} is outside the supported calendar range")]
    BirthYearOutOfRange {
        /// Derived year.
        year: i32,
    },
}

/// Errors raised while writing the output artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The output file or directory could not be opened or written.
    #[error("failed to write output at '{path}': {message}")]
    IoError {
        /// Path of the output.
        path: Utf8PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// CSV serialization failed.
    #[error("CSV output error: {message}")]
    Csv {
        /// Serializer error message.
        message: String,
    },

    /// JSON serialization failed.
    #[error("JSON output error: {message}")]
    Json {
        /// Serializer error message.
        message: String,
    },

    /// The SQLite database rejected a statement.
    #[error("database output error: {message}")]
    Database {
        /// Database error message.
        message: String,
    },

    /// A record could not be generated while streaming.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl From<diesel::result::Error> for SinkError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Database {
            message: err.to_string(),
        }
    }
}

/// Any failure of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PopulationError {
    /// Settings were invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The locality registry was invalid or lacked the locality.
    #[error("configuration error: {0}")]
    Locality(#[from] LocalityError),
    /// Reference data could not be loaded.
    #[error("reference data error: {0}")]
    ReferenceData(#[from] ReferenceDataError),
    /// Record generation failed.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    /// The output could not be written.
    #[error("output error: {0}")]
    Sink(#[from] SinkError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_locality_formats_correctly() {
        let err = PopulationError::from(LocalityError::UnknownLocality {
            code: "NOWHERE".to_owned(),
        });
        assert_eq!(
            err.to_string(),
            "configuration error: locality 'NOWHERE' is not defined in the locality registry"
        );
    }

    #[test]
    fn chance_out_of_range_formats_correctly() {
        let err = ConfigError::ChanceOutOfRange {
            setting: "male_chance",
            value: 140,
        };
        assert_eq!(
            err.to_string(),
            "male_chance must be between 0 and 100, found 140"
        );
    }

    #[test]
    fn missing_column_formats_correctly() {
        let err = ReferenceDataError::MissingColumn {
            path: Utf8PathBuf::from("nombres/apellidos.csv"),
            column: "apellido",
        };
        assert_eq!(
            err.to_string(),
            "'nombres/apellidos.csv' has no 'apellido' column"
        );
    }

    #[test]
    fn empty_reference_data_formats_correctly() {
        let err = GenerationError::EmptyReferenceData { list: "surnames" };
        assert_eq!(err.to_string(), "reference list 'surnames' is empty");
    }

    #[test]
    fn identifier_exhaustion_formats_correctly() {
        let err = GenerationError::IdentifierSpaceExhausted {
            kind: IdentifierKind::NationalId,
            capacity: 181_440,
        };
        assert_eq!(
            err.to_string(),
            "all 181440 possible national ID values have been issued"
        );
    }

    #[test]
    fn sink_error_wraps_generation_transparently() {
        let err = SinkError::from(GenerationError::BirthYearOutOfRange { year: -300_000 });
        assert_eq!(
            err.to_string(),
            "birth year -300000 is outside the supported calendar range"
        );
    }
}
