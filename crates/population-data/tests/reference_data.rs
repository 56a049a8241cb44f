//! Integration tests for loading the bundled reference data and registry.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use camino::Utf8PathBuf;
use population_data::{LocalityRegistry, ReferenceData, ReferenceDataError};
use rstest::{fixture, rstest};

#[fixture]
fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

#[rstest]
fn registry_file_matches_builtin_registry(fixtures_dir: Utf8PathBuf) {
    let from_file = LocalityRegistry::from_file(fixtures_dir.join("localities.json").as_std_path())
        .expect("registry file should load");

    assert_eq!(from_file, LocalityRegistry::builtin());
}

#[rstest]
#[case::postcodes_required("HENARES", false, 5)]
#[case::postcodes_optional("HENARES", true, 6)]
#[case::alcala("ALCALA", false, 4)]
fn loads_usable_addresses(
    fixtures_dir: Utf8PathBuf,
    #[case] code: &str,
    #[case] allow_empty_postcode: bool,
    #[case] expected: usize,
) {
    let registry = LocalityRegistry::builtin();
    let locality = registry.find_locality(code).expect("builtin locality");

    let reference = ReferenceData::load(&fixtures_dir, locality, allow_empty_postcode)
        .expect("reference data should load");

    assert_eq!(reference.addresses().len(), expected);
    assert!(
        reference
            .addresses()
            .iter()
            .all(|entry| !entry.house_number().is_empty())
    );
    assert_eq!(reference.male_names().len(), 10);
    assert_eq!(reference.female_names().len(), 10);
    assert_eq!(reference.surnames().len(), 12);
}

#[rstest]
fn multi_valued_cells_are_normalized(fixtures_dir: Utf8PathBuf) {
    let registry = LocalityRegistry::builtin();
    let locality = registry.find_locality("HENARES").expect("builtin locality");
    let reference = ReferenceData::load(&fixtures_dir, locality, false).expect("reference data");

    let streets: Vec<_> = reference.addresses().iter().map(|a| a.street()).collect();
    let numbers: Vec<_> = reference
        .addresses()
        .iter()
        .map(|a| a.house_number())
        .collect();

    assert!(streets.contains(&"Calle de San Bernardo"));
    assert!(numbers.contains(&"3"));
    assert!(numbers.contains(&"18"));
    assert_eq!(
        reference.addresses().first().map(|a| a.locality.as_str()),
        Some("Madrid")
    );
}

#[rstest]
fn missing_address_file_is_fatal(fixtures_dir: Utf8PathBuf) {
    let registry = LocalityRegistry::from_json(
        r#"{"version": 1, "localities": [
            {"code": "GETAFE", "displayName": "Getafe", "addressFile": "getafe.csv", "phonePrefix": "91"}
        ]}"#,
    )
    .expect("valid registry");
    let locality = registry.find_locality("GETAFE").expect("locality");

    let result = ReferenceData::load(&fixtures_dir, locality, false);

    assert!(
        matches!(&result, Err(ReferenceDataError::IoError { path, .. }) if path.as_str() == "csv/getafe.csv"),
        "unexpected result: {result:?}"
    );
}
