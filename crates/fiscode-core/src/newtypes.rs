/// Validated newtype wrappers for province codes, cadastral codes and fiscal
/// codes.
///
/// Each newtype enforces its shape at construction time via
/// [`TryFrom<&str>`]. Input is trimmed and upper-cased before checking, and
/// the stored value is always the canonical upper-case form. Once
/// constructed, the inner value is immutable (no `DerefMut`). Serde
/// `Deserialize` impls re-run validation so invalid data cannot enter the
/// type system from untrusted JSON.
use std::fmt;
use std::ops::Deref;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::check_digits;
use crate::date_sex::{FEMALE_DAY_OFFSET, month_from_letter};
use crate::person::Sex;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when constructing a validated newtype from an invalid string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewtypeError {
    /// The string did not match the expected format.
    InvalidFormat {
        /// Name of the type that rejected the input.
        type_name: &'static str,
        /// A human-readable description of the expected format.
        expected: &'static str,
        /// The input that was rejected.
        got: String,
    },

    /// A fiscal code is well-formed but its last letter is not the control
    /// letter of the first fifteen characters.
    CheckLetterMismatch {
        /// The code as supplied (upper-cased).
        code: String,
        /// The control letter the first fifteen characters produce.
        expected: char,
        /// The letter actually found in position sixteen.
        found: char,
    },
}

impl fmt::Display for NewtypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat {
                type_name,
                expected,
                got,
            } => write!(f, "invalid {type_name}: expected {expected}, got {got:?}"),
            Self::CheckLetterMismatch {
                code,
                expected,
                found,
            } => write!(
                f,
                "invalid FiscalCode: control letter of {code:?} should be {expected:?}, found {found:?}"
            ),
        }
    }
}

impl std::error::Error for NewtypeError {}

// ---------------------------------------------------------------------------
// Regex statics
//
// All patterns are compile-time string literals; Regex::new never returns Err
// for them. The fallback exists because the workspace bans expect() and
// unwrap(); "a^" never matches and is always valid.
// ---------------------------------------------------------------------------

/// Matches two upper-case ASCII letters.
static PROVINCE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}$").unwrap_or_else(|_| {
        Regex::new("a^").unwrap_or_else(|_| unreachable!("regex engine broken"))
    })
});

/// Matches one upper-case letter followed by three digits.
static CADASTRAL_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][0-9]{3}$").unwrap_or_else(|_| {
        Regex::new("a^").unwrap_or_else(|_| unreachable!("regex engine broken"))
    })
});

/// Matches the block layout of a non-omocodic fiscal code.
static FISCAL_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{6}[0-9]{2}[ABCDEHLMPRST][0-9]{2}[A-Z][0-9]{3}[A-Z]$").unwrap_or_else(|_| {
        Regex::new("a^").unwrap_or_else(|_| unreachable!("regex engine broken"))
    })
});

fn canonical(s: &str) -> String {
    s.trim().to_ascii_uppercase()
}

// ---------------------------------------------------------------------------
// ProvinceCode
// ---------------------------------------------------------------------------

/// Italian province abbreviation: exactly two ASCII letters, stored upper-case.
///
/// No lookup against the official province list is performed; an unknown
/// province simply fails municipality resolution later.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProvinceCode(String);

impl TryFrom<&str> for ProvinceCode {
    type Error = NewtypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let value = canonical(s);
        if PROVINCE_CODE_RE.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(NewtypeError::InvalidFormat {
                type_name: "ProvinceCode",
                expected: "two ASCII letters (e.g. RM, MI)",
                got: s.to_owned(),
            })
        }
    }
}

impl Deref for ProvinceCode {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProvinceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ProvinceCode {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProvinceCode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::try_from(s.as_str()).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// CadastralCode
// ---------------------------------------------------------------------------

/// Cadastral (Belfiore) code of a municipality or foreign state: one letter
/// and three digits, e.g. `H501` for Rome.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CadastralCode(String);

impl TryFrom<&str> for CadastralCode {
    type Error = NewtypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let value = canonical(s);
        if CADASTRAL_CODE_RE.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(NewtypeError::InvalidFormat {
                type_name: "CadastralCode",
                expected: "one letter followed by three digits (e.g. H501)",
                got: s.to_owned(),
            })
        }
    }
}

impl Deref for CadastralCode {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CadastralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CadastralCode {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CadastralCode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::try_from(s.as_str()).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// FiscalCode
// ---------------------------------------------------------------------------

/// A complete 16-character fiscal code with a verified control letter.
///
/// Layout:
///
/// | chars | block                         |
/// |-------|-------------------------------|
/// | 1–3   | surname                       |
/// | 4–6   | given name                    |
/// | 7–8   | birth year (last two digits)  |
/// | 9     | birth month letter            |
/// | 10–11 | birth day, +40 for females    |
/// | 12–15 | cadastral code                |
/// | 16    | control letter                |
///
/// Omocodic variants (digits replaced by letters to resolve collisions) are
/// rejected.
///
/// The birth month and the raw day block are decoded once during validation
/// and stored alongside the text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FiscalCode {
    value: String,
    month: u8,
    day_sex: u8,
}

impl TryFrom<&str> for FiscalCode {
    type Error = NewtypeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let value = canonical(s);
        if !FISCAL_CODE_RE.is_match(&value) {
            return Err(NewtypeError::InvalidFormat {
                type_name: "FiscalCode",
                expected: "16 characters laid out as AAAAAA99A99A999A",
                got: s.to_owned(),
            });
        }
        let Some(month) = value
            .as_bytes()
            .get(8)
            .and_then(|&b| month_from_letter(char::from(b)))
        else {
            return Err(NewtypeError::InvalidFormat {
                type_name: "FiscalCode",
                expected: "a month letter in ABCDEHLMPRST at position 9",
                got: s.to_owned(),
            });
        };
        let day_sex = match value.get(9..11).map(str::parse::<u8>) {
            Some(Ok(day_sex @ (1..=31 | 41..=71))) => day_sex,
            _ => {
                return Err(NewtypeError::InvalidFormat {
                    type_name: "FiscalCode",
                    expected: "day block in 01-31 (male) or 41-71 (female)",
                    got: s.to_owned(),
                });
            }
        };
        let code = Self {
            value,
            month,
            day_sex,
        };
        let expected = code
            .get(..check_digits::PREFIX_LEN)
            .and_then(check_digits::check_letter);
        match expected {
            Some(expected) if expected == code.check_letter() => Ok(code),
            Some(expected) => Err(NewtypeError::CheckLetterMismatch {
                found: code.check_letter(),
                code: code.value,
                expected,
            }),
            None => Err(NewtypeError::InvalidFormat {
                type_name: "FiscalCode",
                expected: "15 characters of [0-9A-Z] before the control letter",
                got: s.to_owned(),
            }),
        }
    }
}

impl FiscalCode {
    /// Appends the control letter to a 15-character prefix and validates the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`NewtypeError::InvalidFormat`] when the prefix is not 15
    /// characters of `[0-9A-Z]` or does not follow the block layout.
    pub fn from_prefix(prefix: &str) -> Result<Self, NewtypeError> {
        let Some(letter) = check_digits::check_letter(prefix) else {
            return Err(NewtypeError::InvalidFormat {
                type_name: "FiscalCode",
                expected: "15 characters of [0-9A-Z] before the control letter",
                got: prefix.to_owned(),
            });
        };
        let mut full = String::with_capacity(check_digits::CODE_LEN);
        full.push_str(prefix);
        full.push(letter);
        Self::try_from(full.as_str())
    }

    /// Characters 1–3.
    pub fn surname_block(&self) -> &str {
        self.slice(0, 3)
    }

    /// Characters 4–6.
    pub fn name_block(&self) -> &str {
        self.slice(3, 6)
    }

    /// Characters 7–8.
    pub fn year_digits(&self) -> &str {
        self.slice(6, 8)
    }

    /// Character 9.
    pub fn month_letter(&self) -> char {
        self.char_at(8)
    }

    /// Characters 10–11.
    pub fn day_sex_digits(&self) -> &str {
        self.slice(9, 11)
    }

    /// Characters 12–15.
    pub fn cadastral_code(&self) -> &str {
        self.slice(11, 15)
    }

    /// Character 16.
    pub fn check_letter(&self) -> char {
        self.char_at(15)
    }

    /// Birth month decoded from the month letter, 1–12.
    pub fn birth_month(&self) -> u8 {
        self.month
    }

    /// Birth day with the female offset removed, 1–31.
    pub fn birth_day(&self) -> u8 {
        if self.day_sex > FEMALE_DAY_OFFSET {
            self.day_sex - FEMALE_DAY_OFFSET
        } else {
            self.day_sex
        }
    }

    /// Sex encoded in the day block.
    pub fn sex(&self) -> Sex {
        if self.day_sex > FEMALE_DAY_OFFSET {
            Sex::Female
        } else {
            Sex::Male
        }
    }

    fn slice(&self, start: usize, end: usize) -> &str {
        self.value.get(start..end).unwrap_or_default()
    }

    fn char_at(&self, idx: usize) -> char {
        self.value.as_bytes().get(idx).copied().map_or('?', char::from)
    }
}

impl Deref for FiscalCode {
    type Target = str;
    fn deref(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for FiscalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl Serialize for FiscalCode {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for FiscalCode {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::try_from(s.as_str()).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
