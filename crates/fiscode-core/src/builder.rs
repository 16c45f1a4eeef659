//! Assembles the fiscal code from a validated person record.
//!
//! The order of work is fixed: date check, municipality lookup, block
//! concatenation, control letter. The first failure aborts; nothing partial
//! is returned.
use tracing::debug;

use crate::check_digits::CODE_LEN;
use crate::date_sex::{day_sex_block, days_in_month, month_letter, year_block};
use crate::error::{Field, FiscalCodeError};
use crate::letters::{name_block, surname_block};
use crate::municipality::{MunicipalitySource, resolve};
use crate::newtypes::FiscalCode;
use crate::person::{PersonFields, PersonRecord, ValidationConfig};

/// Checks that `day` exists in `month` of `year`.
///
/// April, June, September and November have 30 days; February has 29 in a
/// leap year and 28 otherwise; every other month has 31.
///
/// # Errors
///
/// Returns [`FiscalCodeError::InvalidDate`] for a day past the end of the
/// month (or a day of 0), and [`FiscalCodeError::InvalidField`] for a month
/// outside 1–12.
pub fn validate_date(year: u16, month: u8, day: u8) -> Result<(), FiscalCodeError> {
    let last = days_in_month(year, month).ok_or_else(|| {
        FiscalCodeError::invalid(
            Field::BirthMonth,
            format!("must be between 1 and 12, got {month}"),
        )
    })?;
    if day == 0 || day > last {
        return Err(FiscalCodeError::InvalidDate { year, month, day });
    }
    Ok(())
}

/// Builds the fiscal code for an already-validated person.
///
/// # Errors
///
/// - [`FiscalCodeError::InvalidDate`] if the birth day does not exist.
/// - [`FiscalCodeError::MunicipalityNotFound`] if `municipalities` has no
///   entry for the birth place.
pub fn build<S>(person: &PersonRecord, municipalities: &S) -> Result<FiscalCode, FiscalCodeError>
where
    S: MunicipalitySource + ?Sized,
{
    validate_date(person.birth_year(), person.birth_month(), person.birth_day())?;
    let cadastral = resolve(municipalities, person.municipality(), person.province())?;
    let month = month_letter(person.birth_month()).ok_or_else(|| {
        FiscalCodeError::invalid(
            Field::BirthMonth,
            format!("must be between 1 and 12, got {}", person.birth_month()),
        )
    })?;

    let mut prefix = String::with_capacity(CODE_LEN);
    prefix.push_str(&surname_block(person.surname()));
    prefix.push_str(&name_block(person.name()));
    prefix.push_str(&year_block(person.birth_year()));
    prefix.push(month);
    prefix.push_str(&day_sex_block(person.birth_day(), person.sex()));
    prefix.push_str(&cadastral);

    let code = FiscalCode::from_prefix(&prefix)?;
    debug!(%code, "generated fiscal code");
    Ok(code)
}

/// Validates raw input and builds its fiscal code.
///
/// This is the single entry point for callers holding unvalidated fields.
///
/// # Errors
///
/// Any error from [`PersonRecord::new`] or [`build`].
///
/// # Examples
///
/// ```
/// use fiscode_core::{MunicipalityIndex, PersonFields, ValidationConfig, generate_fiscal_code};
///
/// let index = MunicipalityIndex::from_csv_str("ROMA,RM,H501\n").unwrap();
/// let fields = PersonFields {
///     surname: "Rossi",
///     name: "Mario",
///     birth_year: 1980,
///     birth_month: 1,
///     birth_day: 1,
///     sex: "M",
///     municipality: "Roma",
///     province: "RM",
/// };
/// let code = generate_fiscal_code(&fields, &index, &ValidationConfig::default()).unwrap();
/// assert_eq!(code.to_string(), "RSSMRA80A01H501U");
/// ```
pub fn generate_fiscal_code<S>(
    fields: &PersonFields<'_>,
    municipalities: &S,
    config: &ValidationConfig,
) -> Result<FiscalCode, FiscalCodeError>
where
    S: MunicipalitySource + ?Sized,
{
    let person = PersonRecord::new(fields, config)?;
    build(&person, municipalities)
}
