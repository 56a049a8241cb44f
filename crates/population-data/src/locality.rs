//! Locality registry types and JSON parsing.
//!
//! A locality is a named place for which street data exists. The registry
//! maps each locality code to its display name, the street data file, the
//! landline phone prefix and the province written into generated records.
//! A built-in registry covers the bundled localities; a JSON registry file
//! can replace it.

use std::collections::HashSet;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;

use crate::error::LocalityError;
use crate::validation::{is_valid_address_file, is_valid_phone_prefix};

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// Province used when a registry entry does not name one.
pub const DEFAULT_PROVINCE: &str = "Madrid";

/// A locality registry.
///
/// # Example
///
/// ```
/// use population_data::LocalityRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "localities": [
///         {"code": "GETAFE", "displayName": "Getafe", "addressFile": "getafe.csv", "phonePrefix": "91"}
///     ]
/// }"#;
///
/// let registry = LocalityRegistry::from_json(json).expect("valid registry");
/// let getafe = registry.find_locality("getafe").expect("locality exists");
/// assert_eq!(getafe.province(), "Madrid");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalityRegistry {
    version: u32,
    localities: Vec<Locality>,
}

impl LocalityRegistry {
    /// Returns the registry bundled with the crate.
    ///
    /// It defines `ALCALA` (Alcalá de Henares) and `HENARES` (the Henares
    /// corridor including Madrid), both with the `91` prefix.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            version: SUPPORTED_VERSION,
            localities: vec![
                Locality::builtin("ALCALA", "Alcalá de Henares", "alcaladh2.csv"),
                Locality::builtin("HENARES", "Madrid", "chenares.csv"),
            ],
        }
    }

    /// Parses a locality registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`LocalityError`] if:
    /// - The JSON is malformed or misses required fields
    /// - The version is unsupported
    /// - The registry is empty or repeats a code
    /// - An entry has an invalid phone prefix, address file or display name
    pub fn from_json(json: &str) -> Result<Self, LocalityError> {
        let raw: RawLocalityRegistry =
            serde_json::from_str(json).map_err(|e| LocalityError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a locality registry from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`LocalityError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, LocalityError> {
        let io_error = |message: String| LocalityError::IoError {
            path: path.to_path_buf(),
            message,
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error("registry path must be a file".to_owned()))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|e| io_error(e.to_string()))?;
        let contents = dir
            .read_to_string(Path::new(file_name))
            .map_err(|e| io_error(e.to_string()))?;

        Self::from_json(&contents)
    }

    fn from_raw(raw: RawLocalityRegistry) -> Result<Self, LocalityError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(LocalityError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        if raw.localities.is_empty() {
            return Err(LocalityError::EmptyLocalities);
        }

        let mut seen = HashSet::new();
        let localities = raw
            .localities
            .into_iter()
            .map(|entry| {
                let locality = Locality::from_raw(entry)?;
                if !seen.insert(locality.code.clone()) {
                    return Err(LocalityError::DuplicateLocality {
                        code: locality.code,
                    });
                }
                Ok(locality)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version: raw.version,
            localities,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns all localities.
    #[must_use]
    pub fn localities(&self) -> &[Locality] {
        &self.localities
    }

    /// Finds a locality by code, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`LocalityError::UnknownLocality`] if no entry matches.
    pub fn find_locality(&self, code: &str) -> Result<&Locality, LocalityError> {
        let wanted = canonical_code(code);
        self.localities
            .iter()
            .find(|l| l.code == wanted)
            .ok_or(LocalityError::UnknownLocality { code: wanted })
    }
}

/// A locality definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locality {
    code: String,
    display_name: String,
    address_file: String,
    phone_prefix: String,
    province: String,
}

impl Locality {
    fn builtin(code: &str, display_name: &str, address_file: &str) -> Self {
        Self {
            code: code.to_owned(),
            display_name: display_name.to_owned(),
            address_file: address_file.to_owned(),
            phone_prefix: "91".to_owned(),
            province: DEFAULT_PROVINCE.to_owned(),
        }
    }

    fn from_raw(raw: RawLocality) -> Result<Self, LocalityError> {
        let code = canonical_code(&raw.code);
        if raw.display_name.trim().is_empty() {
            return Err(LocalityError::BlankDisplayName { code });
        }
        if !is_valid_phone_prefix(&raw.phone_prefix) {
            return Err(LocalityError::InvalidPhonePrefix {
                code,
                value: raw.phone_prefix,
            });
        }
        if !is_valid_address_file(&raw.address_file) {
            return Err(LocalityError::InvalidAddressFile {
                code,
                value: raw.address_file,
            });
        }

        Ok(Self {
            code,
            display_name: raw.display_name,
            address_file: raw.address_file,
            phone_prefix: raw.phone_prefix,
            province: raw
                .province
                .unwrap_or_else(|| DEFAULT_PROVINCE.to_owned()),
        })
    }

    /// Returns the upper-case locality code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the display name used when an address row has no city.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the street data file name, relative to the `csv` directory.
    #[must_use]
    pub fn address_file(&self) -> &str {
        &self.address_file
    }

    /// Returns the two-digit landline prefix.
    #[must_use]
    pub fn phone_prefix(&self) -> &str {
        &self.phone_prefix
    }

    /// Returns the province written into generated records.
    #[must_use]
    pub fn province(&self) -> &str {
        &self.province
    }
}

fn canonical_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocalityRegistry {
    version: u32,
    localities: Vec<RawLocality>,
}

/// Raw JSON representation of a locality.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocality {
    code: String,
    display_name: String,
    address_file: String,
    phone_prefix: String,
    province: Option<String>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const VALID_JSON: &str = r#"{
        "version": 1,
        "localities": [
            {"code": "ALCALA", "displayName": "Alcalá de Henares", "addressFile": "alcaladh2.csv", "phonePrefix": "91"},
            {"code": "toledo", "displayName": "Toledo", "addressFile": "toledo.csv", "phonePrefix": "92", "province": "Toledo"}
        ]
    }"#;

    #[test]
    fn parses_valid_registry() {
        let registry = LocalityRegistry::from_json(VALID_JSON).expect("valid registry");

        assert_eq!(registry.version(), 1);
        assert_eq!(registry.localities().len(), 2);
    }

    #[test]
    fn finds_locality_ignoring_case() {
        let registry = LocalityRegistry::from_json(VALID_JSON).expect("valid registry");
        let toledo = registry.find_locality(" Toledo ").expect("locality found");

        assert_eq!(toledo.code(), "TOLEDO");
        assert_eq!(toledo.display_name(), "Toledo");
        assert_eq!(toledo.address_file(), "toledo.csv");
        assert_eq!(toledo.phone_prefix(), "92");
        assert_eq!(toledo.province(), "Toledo");
    }

    #[test]
    fn province_defaults_when_omitted() {
        let registry = LocalityRegistry::from_json(VALID_JSON).expect("valid registry");
        let alcala = registry.find_locality("ALCALA").expect("locality found");

        assert_eq!(alcala.province(), DEFAULT_PROVINCE);
    }

    #[rstest]
    #[case::alcala("ALCALA", "Alcalá de Henares", "alcaladh2.csv")]
    #[case::henares("HENARES", "Madrid", "chenares.csv")]
    fn builtin_registry_defines_bundled_localities(
        #[case] code: &str,
        #[case] display_name: &str,
        #[case] address_file: &str,
    ) {
        let registry = LocalityRegistry::builtin();
        let locality = registry.find_locality(code).expect("builtin locality");

        assert_eq!(locality.display_name(), display_name);
        assert_eq!(locality.address_file(), address_file);
        assert_eq!(locality.phone_prefix(), "91");
    }

    #[test]
    fn returns_error_for_unknown_locality() {
        let registry = LocalityRegistry::builtin();
        let result = registry.find_locality("nowhere");

        assert_eq!(
            result,
            Err(LocalityError::UnknownLocality {
                code: "NOWHERE".to_owned()
            })
        );
    }

    #[rstest]
    #[case::malformed_json("not valid json")]
    #[case::missing_phone_prefix(
        r#"{"version": 1, "localities": [{"code": "A", "displayName": "A", "addressFile": "a.csv"}]}"#
    )]
    fn rejects_json_with_parse_error(#[case] json: &str) {
        let result = LocalityRegistry::from_json(json);
        assert!(matches!(result, Err(LocalityError::ParseError { .. })));
    }

    #[rstest]
    #[case::unsupported_version(
        r#"{"version": 2, "localities": []}"#,
        LocalityError::UnsupportedVersion { expected: 1, actual: 2 }
    )]
    #[case::empty_localities(r#"{"version": 1, "localities": []}"#, LocalityError::EmptyLocalities)]
    #[case::duplicate_code(
        r#"{"version": 1, "localities": [
            {"code": "A", "displayName": "A", "addressFile": "a.csv", "phonePrefix": "91"},
            {"code": "a", "displayName": "B", "addressFile": "b.csv", "phonePrefix": "91"}
        ]}"#,
        LocalityError::DuplicateLocality { code: "A".to_owned() }
    )]
    #[case::invalid_prefix(
        r#"{"version": 1, "localities": [{"code": "A", "displayName": "A", "addressFile": "a.csv", "phonePrefix": "918"}]}"#,
        LocalityError::InvalidPhonePrefix { code: "A".to_owned(), value: "918".to_owned() }
    )]
    #[case::nested_address_file(
        r#"{"version": 1, "localities": [{"code": "A", "displayName": "A", "addressFile": "../a.csv", "phonePrefix": "91"}]}"#,
        LocalityError::InvalidAddressFile { code: "A".to_owned(), value: "../a.csv".to_owned() }
    )]
    #[case::blank_display_name(
        r#"{"version": 1, "localities": [{"code": "A", "displayName": " ", "addressFile": "a.csv", "phonePrefix": "91"}]}"#,
        LocalityError::BlankDisplayName { code: "A".to_owned() }
    )]
    fn rejects_invalid_registry(#[case] json: &str, #[case] expected: LocalityError) {
        let result = LocalityRegistry::from_json(json);
        assert_eq!(result, Err(expected));
    }
}
