//! Validation rules for configuration values.
//!
//! # Validation Rules
//!
//! - Phone prefix: exactly [`PHONE_PREFIX_LEN`] ASCII digits
//! - Table name: an ASCII letter or underscore followed by letters, digits
//!   or underscores, at most [`TABLE_NAME_MAX`] characters
//! - Address file: a single relative file name with no path separators

/// Number of digits in a locality phone prefix.
pub const PHONE_PREFIX_LEN: usize = 2;

/// Maximum allowed length for an output table name.
pub const TABLE_NAME_MAX: usize = 64;

/// Validates a locality phone prefix.
///
/// # Examples
///
/// ```
/// use population_data::is_valid_phone_prefix;
///
/// assert!(is_valid_phone_prefix("91"));
/// assert!(!is_valid_phone_prefix("9"));
/// assert!(!is_valid_phone_prefix("9a"));
/// ```
#[must_use]
pub fn is_valid_phone_prefix(prefix: &str) -> bool {
    prefix.len() == PHONE_PREFIX_LEN && prefix.bytes().all(|b| b.is_ascii_digit())
}

/// Validates an output table name.
///
/// Table names are interpolated into SQL statements, so only plain
/// identifiers are accepted.
///
/// # Examples
///
/// ```
/// use population_data::is_valid_table_name;
///
/// assert!(is_valid_table_name("personas"));
/// assert!(is_valid_table_name("_staging_2024"));
/// assert!(!is_valid_table_name("2024"));
/// assert!(!is_valid_table_name("personas; DROP TABLE x"));
/// ```
#[must_use]
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= TABLE_NAME_MAX
        && (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validates an address file name from the locality registry.
#[must_use]
pub(crate) fn is_valid_address_file(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
