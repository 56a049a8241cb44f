//! Address entries and field normalization.
//!
//! Street data exported from OpenStreetMap often packs several values into
//! one cell (`"Calle Mayor;Plaza Mayor"`, `"12,14"`, `"3-5"`). Generated
//! records need a single usable token, which [`normalize_address_field`]
//! extracts.

/// Which raw address column is being normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    /// `addr:street`: cut at the first comma, then the first semicolon.
    Street,
    /// `addr:housenumber`: cut at the first comma, the first semicolon,
    /// then the first hyphen.
    HouseNumber,
}

/// Reduces a multi-valued address cell to its first value.
///
/// The rule is applied in order: keep the text before the first `,`, then
/// the text before the first `;`, and for house numbers the text before the
/// first `-`. Whitespace is preserved and empty segments stay empty.
///
/// # Examples
///
/// ```
/// use population_data::{AddressField, normalize_address_field};
///
/// assert_eq!(normalize_address_field("Calle Mayor;Plaza", AddressField::Street), "Calle Mayor");
/// assert_eq!(normalize_address_field("3-5", AddressField::HouseNumber), "3");
/// assert_eq!(normalize_address_field("Travesía Sur-Este", AddressField::Street), "Travesía Sur-Este");
/// ```
#[must_use]
pub fn normalize_address_field(raw: &str, field: AddressField) -> &str {
    let first_value = before(before(raw, ','), ';');
    match field {
        AddressField::Street => first_value,
        AddressField::HouseNumber => before(first_value, '-'),
    }
}

fn before(value: &str, delimiter: char) -> &str {
    value.split_once(delimiter).map_or(value, |(head, _)| head)
}

/// One usable row of a locality's street data.
///
/// Fields hold the raw cell values; [`AddressEntry::street`] and
/// [`AddressEntry::house_number`] apply normalization on access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressEntry {
    /// Locality display name, already defaulted when the source cell was empty.
    pub locality: String,
    /// Raw `addr:housenumber` value.
    pub raw_house_number: String,
    /// Postal code.
    pub postcode: String,
    /// Raw `addr:state` value.
    pub region: String,
    /// Raw `addr:street` value.
    pub raw_street: String,
}

impl AddressEntry {
    /// Returns the normalized street name.
    #[must_use]
    pub fn street(&self) -> &str {
        normalize_address_field(&self.raw_street, AddressField::Street)
    }

    /// Returns the normalized house number.
    #[must_use]
    pub fn house_number(&self) -> &str {
        normalize_address_field(&self.raw_house_number, AddressField::HouseNumber)
    }
}
