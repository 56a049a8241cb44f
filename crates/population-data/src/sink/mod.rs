//! Output sinks for generated populations.
//!
//! A run writes exactly one artifact named `PERSONAS_<CODE>_<YEAR>.<ext>`
//! into the output directory. CSV and JSON files are replaced; SQLite
//! databases are opened and appended to.

mod csv_output;
mod json_output;
mod sqlite_output;

use std::fmt;
use std::io::BufWriter;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use tracing::info;

pub use self::csv_output::write_csv;
pub use self::json_output::write_json;
pub use self::sqlite_output::write_sqlite;
use crate::error::{ConfigError, GenerationError, SinkError};
use crate::record::PersonRecord;

/// Serialization of the output artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// A JSON document listing the field names and the records.
    Json,
    /// A SQLite database table.
    Sqlite,
}

impl OutputFormat {
    /// Returns the file extension written for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Sqlite => "db",
        }
    }

    /// Returns the canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
            Self::Sqlite => "SQLITE",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    /// Parses a format name, ignoring case and surrounding whitespace.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "CSV" => Ok(Self::Csv),
            "JSON" => Ok(Self::Json),
            "SQLITE" => Ok(Self::Sqlite),
            _ => Err(ConfigError::UnknownFormat {
                value: value.to_owned(),
            }),
        }
    }
}

/// Builds the artifact file name for a locality, reference year and format.
///
/// # Examples
///
/// ```
/// use population_data::{OutputFormat, output_file_name};
///
/// assert_eq!(
///     output_file_name("HENARES", 2024, OutputFormat::Csv),
///     "PERSONAS_HENARES_2024.csv"
/// );
/// assert_eq!(
///     output_file_name("ALCALA", 2023, OutputFormat::Sqlite),
///     "PERSONAS_ALCALA_2023.db"
/// );
/// ```
#[must_use]
pub fn output_file_name(locality_code: &str, year: i32, format: OutputFormat) -> String {
    format!("PERSONAS_{locality_code}_{year}.{}", format.extension())
}

/// Where and how one run writes its artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTarget {
    /// Directory the artifact is written into. It must already exist.
    pub directory: Utf8PathBuf,
    /// Artifact file name.
    pub file_name: String,
    /// Serialization.
    pub format: OutputFormat,
    /// Table written by the SQLite format.
    pub table_name: String,
}

impl OutputTarget {
    /// Returns the full path of the artifact.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Outcome of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    /// Path of the artifact.
    pub path: Utf8PathBuf,
    /// Number of records written.
    pub records: usize,
}

/// Streams `records` into the artifact described by `target`.
///
/// # Errors
///
/// Returns [`SinkError`] if the artifact cannot be created or written, or if
/// a record cannot be generated.
pub fn write_population<I>(target: &OutputTarget, records: I) -> Result<WriteSummary, SinkError>
where
    I: IntoIterator<Item = Result<PersonRecord, GenerationError>>,
{
    let path = target.path();
    let written = match target.format {
        OutputFormat::Csv => write_csv(create_file(target)?, records)?,
        OutputFormat::Json => write_json(create_file(target)?, records)?,
        OutputFormat::Sqlite => {
            require_directory(&target.directory)?;
            write_sqlite(&path, &target.table_name, records)?
        }
    };
    info!(path = %path, format = %target.format, records = written, "population written");
    Ok(WriteSummary {
        path,
        records: written,
    })
}

fn open_directory(directory: &Utf8Path) -> Result<Dir, SinkError> {
    Dir::open_ambient_dir(directory, ambient_authority()).map_err(|err| SinkError::IoError {
        path: directory.to_path_buf(),
        message: err.to_string(),
    })
}

fn require_directory(directory: &Utf8Path) -> Result<(), SinkError> {
    open_directory(directory).map(drop)
}

fn create_file(target: &OutputTarget) -> Result<BufWriter<cap_std::fs::File>, SinkError> {
    let dir = open_directory(&target.directory)?;
    let file = dir
        .create(&target.file_name)
        .map_err(|err| SinkError::IoError {
            path: target.path(),
            message: err.to_string(),
        })?;
    Ok(BufWriter::new(file))
}
