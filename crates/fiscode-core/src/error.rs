//! Error types for fiscal code generation and municipality table loading.
use std::fmt;

use crate::newtypes::NewtypeError;

/// An input field of [`crate::PersonFields`], used to say which one was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Family name.
    Surname,
    /// Given name.
    Name,
    /// Four-digit birth year.
    BirthYear,
    /// Birth month, 1–12.
    BirthMonth,
    /// Birth day of month, 1–31.
    BirthDay,
    /// Sex marker.
    Sex,
    /// Birth municipality name.
    Municipality,
    /// Two-letter province code.
    Province,
}

impl Field {
    /// Returns the human-readable field name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Surname => "surname",
            Self::Name => "name",
            Self::BirthYear => "birth year",
            Self::BirthMonth => "birth month",
            Self::BirthDay => "birth day",
            Self::Sex => "sex",
            Self::Municipality => "municipality",
            Self::Province => "province code",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned while validating input or building a fiscal code.
///
/// Generation stops at the first error; no partial code is ever produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FiscalCodeError {
    /// A field is blank, out of range, or malformed.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The offending field.
        field: Field,
        /// What was wrong with it.
        reason: String,
    },

    /// The day does not exist in the given month and year.
    #[error("invalid date: {year:04}-{month:02}-{day:02} does not exist")]
    InvalidDate {
        /// Birth year.
        year: u16,
        /// Birth month.
        month: u8,
        /// Birth day.
        day: u8,
    },

    /// No entry matches the municipality and province.
    #[error("municipality not found: {municipality:?} in province {province}")]
    MunicipalityNotFound {
        /// The municipality name as supplied by the caller.
        municipality: String,
        /// The province code as validated.
        province: String,
    },

    /// An assembled or parsed code failed shape or control-letter checks.
    #[error(transparent)]
    Format(#[from] NewtypeError),
}

impl FiscalCodeError {
    pub(crate) fn invalid(field: Field, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the input field this error is about, if any.
    ///
    /// Date errors point at the day; lookup failures at the municipality.
    pub fn field(&self) -> Option<Field> {
        match self {
            Self::InvalidField { field, .. } => Some(*field),
            Self::InvalidDate { .. } => Some(Field::BirthDay),
            Self::MunicipalityNotFound { .. } => Some(Field::Municipality),
            Self::Format(_) => None,
        }
    }
}

/// Errors produced while loading a municipality table.
#[derive(Debug, thiserror::Error)]
pub enum IndexLoadError {
    /// The underlying CSV reader failed (I/O or malformed quoting).
    #[error("failed to read municipality table: {0}")]
    Csv(#[from] csv::Error),

    /// A record does not have the `municipality,province,cadastral` shape.
    #[error("line {line}: {detail}")]
    MalformedRecord {
        /// 1-based line number in the source.
        line: u64,
        /// What was wrong with the record.
        detail: String,
    },

    /// The same municipality and province map to two different codes.
    #[error(
        "line {line}: {municipality:?} ({province}) is already mapped to {existing}, got {conflicting}"
    )]
    DuplicateEntry {
        /// 1-based line number of the second occurrence.
        line: u64,
        /// Normalized municipality name.
        municipality: String,
        /// Province code.
        province: String,
        /// Code from the first occurrence.
        existing: String,
        /// Code from the second occurrence.
        conflicting: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_field_message_names_field() {
        let err = FiscalCodeError::invalid(Field::Surname, "must not be blank");
        assert_eq!(err.to_string(), "invalid surname: must not be blank");
        assert_eq!(err.field(), Some(Field::Surname));
    }

    #[test]
    fn invalid_date_message_is_zero_padded() {
        let err = FiscalCodeError::InvalidDate {
            year: 2023,
            month: 2,
            day: 29,
        };
        assert_eq!(err.to_string(), "invalid date: 2023-02-29 does not exist");
    }

    #[test]
    fn municipality_not_found_message() {
        let err = FiscalCodeError::MunicipalityNotFound {
            municipality: "Nonexistent".to_owned(),
            province: "RM".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"Nonexistent\""), "message: {msg}");
        assert!(msg.contains("RM"), "message: {msg}");
    }

    #[test]
    fn field_names_are_distinct() {
        let all = [
            Field::Surname,
            Field::Name,
            Field::BirthYear,
            Field::BirthMonth,
            Field::BirthDay,
            Field::Sex,
            Field::Municipality,
            Field::Province,
        ];
        let names: std::collections::HashSet<_> = all.iter().copied().map(Field::as_str).collect();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn duplicate_entry_message() {
        let err = IndexLoadError::DuplicateEntry {
            line: 7,
            municipality: "ROMA".to_owned(),
            province: "RM".to_owned(),
            existing: "H501".to_owned(),
            conflicting: "H502".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("line 7:"), "message: {msg}");
        assert!(msg.contains("H501") && msg.contains("H502"), "message: {msg}");
    }
}
