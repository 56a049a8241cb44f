//! Reference list loading.
//!
//! Reference lists are CSV files with a header row, read once at startup:
//!
//! - `nombres/hombres.csv` and `nombres/mujeres.csv` (column `nombre`)
//! - `nombres/apellidos.csv` (column `apellido`)
//! - `csv/<address file>` (columns `addr:city`, `addr:housenumber`,
//!   `addr:postcode`, `addr:state`, `addr:street`)
//!
//! Files are opened through a capability handle on the data directory so
//! registry-supplied names cannot escape it.

use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use csv::StringRecord;
use tracing::{debug, info};

use crate::address::AddressEntry;
use crate::error::ReferenceDataError;
use crate::locality::Locality;

/// Male given names, relative to the data directory.
pub const MALE_NAMES_FILE: &str = "nombres/hombres.csv";
/// Female given names, relative to the data directory.
pub const FEMALE_NAMES_FILE: &str = "nombres/mujeres.csv";
/// Surnames, relative to the data directory.
pub const SURNAMES_FILE: &str = "nombres/apellidos.csv";
/// Directory holding per-locality street data, relative to the data directory.
pub const ADDRESS_DIR: &str = "csv";

const NAME_COLUMN: &str = "nombre";
const SURNAME_COLUMN: &str = "apellido";
const CITY_COLUMN: &str = "addr:city";
const HOUSE_NUMBER_COLUMN: &str = "addr:housenumber";
const POSTCODE_COLUMN: &str = "addr:postcode";
const STATE_COLUMN: &str = "addr:state";
const STREET_COLUMN: &str = "addr:street";

/// Immutable reference lists for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    male_names: Vec<String>,
    female_names: Vec<String>,
    surnames: Vec<String>,
    addresses: Vec<AddressEntry>,
}

impl ReferenceData {
    /// Builds reference data from already loaded lists.
    #[must_use]
    pub const fn new(
        male_names: Vec<String>,
        female_names: Vec<String>,
        surnames: Vec<String>,
        addresses: Vec<AddressEntry>,
    ) -> Self {
        Self {
            male_names,
            female_names,
            surnames,
            addresses,
        }
    }

    /// Loads every reference list for `locality` from `data_dir`.
    ///
    /// A missing or unreadable address file is fatal, as is any other
    /// missing list.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDataError`] if a file cannot be opened, is not
    /// valid CSV, or lacks a required column.
    pub fn load(
        data_dir: &Utf8Path,
        locality: &Locality,
        allow_empty_postcode: bool,
    ) -> Result<Self, ReferenceDataError> {
        let dir = Dir::open_ambient_dir(data_dir, ambient_authority()).map_err(|e| {
            ReferenceDataError::IoError {
                path: data_dir.to_path_buf(),
                message: e.to_string(),
            }
        })?;

        let male_names = load_column(&dir, Utf8Path::new(MALE_NAMES_FILE), NAME_COLUMN)?;
        let female_names = load_column(&dir, Utf8Path::new(FEMALE_NAMES_FILE), NAME_COLUMN)?;
        let surnames = load_column(&dir, Utf8Path::new(SURNAMES_FILE), SURNAME_COLUMN)?;

        let address_path = Utf8Path::new(ADDRESS_DIR).join(locality.address_file());
        info!(path = %address_path, locality = locality.code(), "opening street data");
        let file = open_file(&dir, &address_path)?;
        let addresses = read_addresses(
            file,
            &address_path,
            locality.display_name(),
            allow_empty_postcode,
        )?;
        info!(path = %address_path, count = addresses.len(), "loaded address entries");

        Ok(Self::new(male_names, female_names, surnames, addresses))
    }

    /// Returns the male given names.
    #[must_use]
    pub fn male_names(&self) -> &[String] {
        &self.male_names
    }

    /// Returns the female given names.
    #[must_use]
    pub fn female_names(&self) -> &[String] {
        &self.female_names
    }

    /// Returns the surnames.
    #[must_use]
    pub fn surnames(&self) -> &[String] {
        &self.surnames
    }

    /// Returns the usable address entries.
    #[must_use]
    pub fn addresses(&self) -> &[AddressEntry] {
        &self.addresses
    }
}

fn load_column(
    dir: &Dir,
    path: &Utf8Path,
    column: &'static str,
) -> Result<Vec<String>, ReferenceDataError> {
    let file = open_file(dir, path)?;
    let values = read_column(file, path, column)?;
    info!(path = %path, count = values.len(), "loaded reference list");
    Ok(values)
}

fn open_file(dir: &Dir, path: &Utf8Path) -> Result<cap_std::fs::File, ReferenceDataError> {
    dir.open(path).map_err(|e| ReferenceDataError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Reads the non-blank values of one column from CSV data with a header.
///
/// `path` is only used for error context.
///
/// # Errors
///
/// Returns [`ReferenceDataError`] if the data is not valid CSV or has no
/// `column` header.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use population_data::read_column;
///
/// let csv = "nombre,frec\nLUCIA,100\nMARTA,90\n";
/// let names = read_column(csv.as_bytes(), Utf8Path::new("mujeres.csv"), "nombre")
///     .expect("valid csv");
/// assert_eq!(names, ["LUCIA", "MARTA"]);
/// ```
pub fn read_column<R: Read>(
    reader: R,
    path: &Utf8Path,
    column: &'static str,
) -> Result<Vec<String>, ReferenceDataError> {
    let mut csv_reader = csv_reader(reader);
    let index = column_index(&mut csv_reader, path, column)?;

    let mut values = Vec::new();
    let mut skipped = 0_usize;
    for row in csv_reader.records() {
        let record = row.map_err(|e| parse_error(path, &e))?;
        match cell(&record, index) {
            "" => skipped += 1,
            value => values.push(value.to_owned()),
        }
    }
    if skipped > 0 {
        debug!(path = %path, skipped, "skipped blank reference values");
    }
    Ok(values)
}

/// Reads usable address entries from street data CSV.
///
/// Rows with an empty house number are always dropped. Rows with an empty
/// postcode are dropped unless `allow_empty_postcode` is set. An empty city
/// is replaced by `fallback_locality`.
///
/// # Errors
///
/// Returns [`ReferenceDataError`] if the data is not valid CSV or lacks one
/// of the address columns.
pub fn read_addresses<R: Read>(
    reader: R,
    path: &Utf8Path,
    fallback_locality: &str,
    allow_empty_postcode: bool,
) -> Result<Vec<AddressEntry>, ReferenceDataError> {
    let mut csv_reader = csv_reader(reader);
    let city = column_index(&mut csv_reader, path, CITY_COLUMN)?;
    let house_number = column_index(&mut csv_reader, path, HOUSE_NUMBER_COLUMN)?;
    let postcode = column_index(&mut csv_reader, path, POSTCODE_COLUMN)?;
    let state = column_index(&mut csv_reader, path, STATE_COLUMN)?;
    let street = column_index(&mut csv_reader, path, STREET_COLUMN)?;

    let mut entries = Vec::new();
    let mut skipped = 0_usize;
    for row in csv_reader.records() {
        let record = row.map_err(|e| parse_error(path, &e))?;
        let raw_house_number = cell(&record, house_number);
        let raw_postcode = cell(&record, postcode);
        if raw_house_number.is_empty() || (raw_postcode.is_empty() && !allow_empty_postcode) {
            skipped += 1;
            continue;
        }
        let locality = match cell(&record, city) {
            "" => fallback_locality,
            value => value,
        };
        entries.push(AddressEntry {
            locality: locality.to_owned(),
            raw_house_number: raw_house_number.to_owned(),
            postcode: raw_postcode.to_owned(),
            region: cell(&record, state).to_owned(),
            raw_street: cell(&record, street).to_owned(),
        });
    }
    debug!(path = %path, kept = entries.len(), skipped, "filtered address rows");
    Ok(entries)
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().flexible(true).from_reader(reader)
}

fn column_index<R: Read>(
    reader: &mut csv::Reader<R>,
    path: &Utf8Path,
    column: &'static str,
) -> Result<usize, ReferenceDataError> {
    let headers = reader.headers().map_err(|e| parse_error(path, &e))?;
    headers
        .iter()
        .position(|header| header.trim() == column)
        .ok_or_else(|| ReferenceDataError::MissingColumn {
            path: path.to_path_buf(),
            column,
        })
}

fn cell(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or_default()
}

fn parse_error(path: &Utf8Path, err: &csv::Error) -> ReferenceDataError {
    ReferenceDataError::ParseError {
        path: Utf8PathBuf::from(path),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const STREETS: &str = "\
addr:city,addr:housenumber,addr:postcode,addr:state,addr:street,building
Alcalá de Henares,12,28801,Comunidad de Madrid,Calle Mayor,yes
,3-5,28802,,Calle de Libreros;Calle Nueva,yes
Alcalá de Henares,,28803,,Calle sin número,yes
Alcalá de Henares,7,,,Calle sin código,yes
";

    fn path() -> &'static Utf8Path {
        Utf8Path::new("csv/test.csv")
    }

    #[test]
    fn reads_named_column_regardless_of_position() {
        let csv = "frec,apellido\n10,GARCIA\n5,\n3,LOPEZ\n";
        let values = read_column(csv.as_bytes(), path(), "apellido").expect("valid csv");

        assert_eq!(values, ["GARCIA", "LOPEZ"]);
    }

    #[test]
    fn reports_missing_column() {
        let csv = "name\nLUCIA\n";
        let result = read_column(csv.as_bytes(), path(), "nombre");

        assert_eq!(
            result,
            Err(ReferenceDataError::MissingColumn {
                path: path().to_path_buf(),
                column: "nombre",
            })
        );
    }

    #[rstest]
    #[case::postcode_required(false, 2)]
    #[case::postcode_optional(true, 3)]
    fn filters_address_rows(#[case] allow_empty_postcode: bool, #[case] expected: usize) {
        let entries = read_addresses(STREETS.as_bytes(), path(), "Alcalá", allow_empty_postcode)
            .expect("valid csv");

        assert_eq!(entries.len(), expected);
        assert!(entries.iter().all(|e| !e.raw_house_number.is_empty()));
    }

    #[test]
    fn empty_city_falls_back_to_display_name() {
        let entries =
            read_addresses(STREETS.as_bytes(), path(), "Alcalá", false).expect("valid csv");
        let second = entries.get(1).expect("second entry");

        assert_eq!(second.locality, "Alcalá");
        assert_eq!(second.street(), "Calle de Libreros");
        assert_eq!(second.house_number(), "3");
    }

    #[test]
    fn reports_missing_address_column() {
        let csv = "addr:city,addr:housenumber,addr:postcode,addr:street\n";
        let result = read_addresses(csv.as_bytes(), path(), "Alcalá", false);

        assert_eq!(
            result,
            Err(ReferenceDataError::MissingColumn {
                path: path().to_path_buf(),
                column: "addr:state",
            })
        );
    }

    #[test]
    fn load_reports_missing_data_dir() {
        let registry = crate::LocalityRegistry::builtin();
        let locality = registry.find_locality("ALCALA").expect("builtin");
        let missing = Utf8Path::new("target/population-data-tests/does-not-exist");

        let result = ReferenceData::load(missing, locality, false);

        assert!(matches!(
            result,
            Err(ReferenceDataError::IoError { path: err_path, .. }) if err_path.as_path() == missing
        ));
    }
}
