//! Generated person record types.
//!
//! A [`PersonRecord`] has a fixed field set. The serialized field names and
//! their order are given by [`FIELD_NAMES`], which every output sink shares.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of fields in a serialized [`PersonRecord`].
pub const FIELD_COUNT: usize = 13;

/// Serialized field names of a [`PersonRecord`], in output order.
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "nombre",
    "apellidos",
    "calle",
    "numero",
    "cp",
    "localidad",
    "provincia",
    "edad",
    "sexo",
    "genero",
    "nacimiento",
    "dni",
    "telefono",
];

/// Biological sex drawn for a generated person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// Serialized as `Hombre`.
    #[serde(rename = "Hombre")]
    Male,
    /// Serialized as `Mujer`.
    #[serde(rename = "Mujer")]
    Female,
}

impl Sex {
    /// Returns the serialized label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Hombre",
            Self::Female => "Mujer",
        }
    }
}

/// Gender recorded for a generated person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Serialized as `Hombre`.
    #[serde(rename = "Hombre")]
    Male,
    /// Serialized as `Mujer`.
    #[serde(rename = "Mujer")]
    Female,
    /// Serialized as `Transgénero`.
    #[serde(rename = "Transgénero")]
    Transgender,
}

impl Gender {
    /// Returns the serialized label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Hombre",
            Self::Female => "Mujer",
            Self::Transgender => "Transgénero",
        }
    }
}

impl From<Sex> for Gender {
    fn from(sex: Sex) -> Self {
        match sex {
            Sex::Male => Self::Male,
            Sex::Female => Self::Female,
        }
    }
}

/// A generated synthetic person.
///
/// Field declaration order matches [`FIELD_NAMES`]; serializers rely on it.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use population_data::{Gender, PersonRecord, Sex};
///
/// let person = PersonRecord {
///     given_name: "Lucía".to_owned(),
///     surnames: "García López".to_owned(),
///     street: "Calle Mayor".to_owned(),
///     house_number: "12".to_owned(),
///     postcode: "28801".to_owned(),
///     locality: "Alcalá de Henares".to_owned(),
///     province: "Madrid".to_owned(),
///     age: 40,
///     sex: Sex::Female,
///     gender: Gender::Female,
///     birth_date: NaiveDate::from_ymd_opt(1984, 3, 9).expect("valid date"),
///     national_id: "07123456Z".to_owned(),
///     phone: "916123456".to_owned(),
/// };
///
/// assert_eq!(person.sex.as_str(), "Mujer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Given name.
    #[serde(rename = "nombre")]
    pub given_name: String,
    /// Two surnames separated by a single space.
    #[serde(rename = "apellidos")]
    pub surnames: String,
    /// Normalized street name.
    #[serde(rename = "calle")]
    pub street: String,
    /// Normalized house number.
    #[serde(rename = "numero")]
    pub house_number: String,
    /// Postal code as found in the address data.
    #[serde(rename = "cp")]
    pub postcode: String,
    /// Locality display name.
    #[serde(rename = "localidad")]
    pub locality: String,
    /// Province of the configured locality.
    #[serde(rename = "provincia")]
    pub province: String,
    /// Age in whole years at the reference date.
    #[serde(rename = "edad")]
    pub age: u16,
    /// Sex.
    #[serde(rename = "sexo")]
    pub sex: Sex,
    /// Gender.
    #[serde(rename = "genero")]
    pub gender: Gender,
    /// Birth date, serialized as `YYYY-MM-DD`.
    #[serde(rename = "nacimiento")]
    pub birth_date: NaiveDate,
    /// National ID: eight digits followed by the checksum letter.
    #[serde(rename = "dni")]
    pub national_id: String,
    /// Nine-digit phone number.
    #[serde(rename = "telefono")]
    pub phone: String,
}
