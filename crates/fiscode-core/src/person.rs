//! Validated person records.
//!
//! [`PersonFields`] is the raw, borrowed caller input. [`PersonRecord::new`]
//! checks every field against a [`ValidationConfig`] and either returns a
//! fully valid, immutable record or the first error found. There is no
//! partially-valid state in between.
use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{Field, FiscalCodeError};
use crate::newtypes::ProvinceCode;

/// Earliest accepted birth year by default: 125 years before fiscal codes
/// were introduced in 1973.
pub const DEFAULT_MIN_BIRTH_YEAR: u16 = 1848;

/// Sex as encoded in the day block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    /// Day is encoded unchanged.
    Male,
    /// Day is encoded plus 40.
    Female,
}

impl Sex {
    /// Single-letter marker, `M` or `F`.
    pub fn marker(self) -> char {
        match self {
            Self::Male => 'M',
            Self::Female => 'F',
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("male"),
            Self::Female => f.write_str("female"),
        }
    }
}

impl FromStr for Sex {
    type Err = FiscalCodeError;

    /// Accepts `m`/`f` in either case, and the words `male`/`female`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Self::Male),
            "f" | "female" => Ok(Self::Female),
            _ => Err(FiscalCodeError::invalid(
                Field::Sex,
                format!("expected M or F, got {s:?}"),
            )),
        }
    }
}

/// Bounds applied while validating a [`PersonRecord`].
///
/// The birth-year range is enforced only in [`PersonRecord::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Earliest accepted birth year (inclusive).
    pub min_birth_year: u16,
    /// Latest accepted birth year (inclusive).
    pub max_birth_year: u16,
}

impl Default for ValidationConfig {
    /// [`DEFAULT_MIN_BIRTH_YEAR`] up to the current calendar year.
    fn default() -> Self {
        Self {
            min_birth_year: DEFAULT_MIN_BIRTH_YEAR,
            max_birth_year: current_year(),
        }
    }
}

impl ValidationConfig {
    /// Replaces the lower birth-year bound.
    pub fn with_min_birth_year(mut self, year: u16) -> Self {
        self.min_birth_year = year;
        self
    }

    /// Replaces the upper birth-year bound.
    pub fn with_max_birth_year(mut self, year: u16) -> Self {
        self.max_birth_year = year;
        self
    }
}

fn current_year() -> u16 {
    u16::try_from(chrono::Local::now().year()).unwrap_or(u16::MAX)
}

/// Raw input for one fiscal code, as supplied by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonFields<'a> {
    /// Family name.
    pub surname: &'a str,
    /// Given name(s).
    pub name: &'a str,
    /// Birth year, four digits.
    pub birth_year: i32,
    /// Birth month, 1–12.
    pub birth_month: u32,
    /// Birth day, 1–31.
    pub birth_day: u32,
    /// Sex marker (`M`, `F`, `male`, `female`).
    pub sex: &'a str,
    /// Birth municipality name.
    pub municipality: &'a str,
    /// Two-letter province code.
    pub province: &'a str,
}

/// A person whose fields have all passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    surname: String,
    name: String,
    birth_year: u16,
    birth_month: u8,
    birth_day: u8,
    sex: Sex,
    municipality: String,
    province: ProvinceCode,
}

impl PersonRecord {
    /// Validates `fields` and builds a record.
    ///
    /// Fields are checked in declaration order and the first failure is
    /// returned. Text fields are trimmed. The day is checked against 1–31
    /// only; whether it exists in the given month is decided when the code
    /// is built.
    ///
    /// # Errors
    ///
    /// Returns [`FiscalCodeError::InvalidField`] naming the offending field.
    pub fn new(fields: &PersonFields<'_>, config: &ValidationConfig) -> Result<Self, FiscalCodeError> {
        let surname = non_blank(fields.surname, Field::Surname)?;
        let name = non_blank(fields.name, Field::Name)?;
        let birth_year = birth_year(fields.birth_year, config)?;
        let birth_month = in_range(fields.birth_month, 1, 12, Field::BirthMonth)?;
        let birth_day = in_range(fields.birth_day, 1, 31, Field::BirthDay)?;
        let sex = fields.sex.parse::<Sex>()?;
        let municipality = non_blank(fields.municipality, Field::Municipality)?;
        let province = ProvinceCode::try_from(fields.province)
            .map_err(|e| FiscalCodeError::invalid(Field::Province, e.to_string()))?;

        Ok(Self {
            surname,
            name,
            birth_year,
            birth_month,
            birth_day,
            sex,
            municipality,
            province,
        })
    }

    /// Trimmed surname.
    pub fn surname(&self) -> &str {
        &self.surname
    }

    /// Trimmed given name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Birth year.
    pub fn birth_year(&self) -> u16 {
        self.birth_year
    }

    /// Birth month, 1–12.
    pub fn birth_month(&self) -> u8 {
        self.birth_month
    }

    /// Birth day, 1–31.
    pub fn birth_day(&self) -> u8 {
        self.birth_day
    }

    /// Sex.
    pub fn sex(&self) -> Sex {
        self.sex
    }

    /// Trimmed municipality name, as supplied (not normalized).
    pub fn municipality(&self) -> &str {
        &self.municipality
    }

    /// Upper-case province code.
    pub fn province(&self) -> &ProvinceCode {
        &self.province
    }
}

fn non_blank(value: &str, field: Field) -> Result<String, FiscalCodeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FiscalCodeError::invalid(
            field,
            "must not be empty or only whitespace",
        ));
    }
    Ok(trimmed.to_owned())
}

fn birth_year(year: i32, config: &ValidationConfig) -> Result<u16, FiscalCodeError> {
    let (min, max) = (config.min_birth_year, config.max_birth_year);
    u16::try_from(year)
        .ok()
        .filter(|y| (min..=max).contains(y))
        .ok_or_else(|| {
            FiscalCodeError::invalid(
                Field::BirthYear,
                format!("must be between {min} and {max}, got {year}"),
            )
        })
}

fn in_range(value: u32, min: u8, max: u8, field: Field) -> Result<u8, FiscalCodeError> {
    u8::try_from(value)
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or_else(|| {
            FiscalCodeError::invalid(field, format!("must be between {min} and {max}, got {value}"))
        })
}
