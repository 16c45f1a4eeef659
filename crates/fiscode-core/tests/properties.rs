//! Property-based tests for fiscal code generation.
//!
//! Draws random names, dates and sexes against a small fixed municipality
//! table and checks the structural guarantees every generated code carries.
#![allow(clippy::expect_used)]

use fiscode_core::{
    FiscalCode, FiscalCodeError, MunicipalityIndex, PersonFields, ValidationConfig,
    check_digits::check_letter, date_sex::is_leap_year, generate_fiscal_code, verify,
};
use proptest::prelude::*;

const TABLE: &str = "ROMA,RM,H501\nMILANO,MI,F205\n";

fn index() -> MunicipalityIndex {
    MunicipalityIndex::from_csv_str(TABLE).expect("valid table")
}

fn config() -> ValidationConfig {
    ValidationConfig::default()
        .with_min_birth_year(1900)
        .with_max_birth_year(2025)
}

fn person<'a>(
    surname: &'a str,
    name: &'a str,
    (year, month, day): (i32, u32, u32),
    sex: &'a str,
) -> PersonFields<'a> {
    PersonFields {
        surname,
        name,
        birth_year: year,
        birth_month: month,
        birth_day: day,
        sex,
        municipality: "Roma",
        province: "RM",
    }
}

fn generate(fields: &PersonFields<'_>) -> Result<FiscalCode, FiscalCodeError> {
    generate_fiscal_code(fields, &index(), &config())
}

/// Dates that exist in every month, so generation never fails on the day.
fn safe_date() -> impl Strategy<Value = (i32, u32, u32)> {
    (1900i32..=2025, 1u32..=12, 1u32..=28)
}

fn name_text() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z' ]{0,15}"
}

fn sex() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("M"), Just("F")]
}

proptest! {
    #[test]
    fn generated_code_is_sixteen_uppercase_alphanumerics(
        surname in name_text(),
        name in name_text(),
        date in safe_date(),
        sex in sex(),
    ) {
        let code = generate(&person(&surname, &name, date, sex)).expect("valid input");
        prop_assert_eq!(code.len(), 16);
        prop_assert!(code.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        prop_assert!(verify(&code));
        prop_assert_eq!(FiscalCode::try_from(&*code).expect("reparses"), code);
    }

    #[test]
    fn generation_is_deterministic(
        surname in name_text(),
        name in name_text(),
        date in safe_date(),
        sex in sex(),
    ) {
        let fields = person(&surname, &name, date, sex);
        let first = generate(&fields).expect("valid input");
        let second = generate(&fields).expect("valid input");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn female_day_block_is_male_plus_forty(
        surname in name_text(),
        name in name_text(),
        date in safe_date(),
    ) {
        let male = generate(&person(&surname, &name, date, "M")).expect("valid input");
        let female = generate(&person(&surname, &name, date, "F")).expect("valid input");

        let male_day: u8 = male.day_sex_digits().parse().expect("digits");
        let female_day: u8 = female.day_sex_digits().parse().expect("digits");
        prop_assert_eq!(female_day, male_day + 40);
        prop_assert_eq!(&male[..9], &female[..9]);
        prop_assert_eq!(male.cadastral_code(), female.cadastral_code());
        prop_assert_eq!(male.birth_day(), female.birth_day());
    }

    #[test]
    fn year_block_is_last_two_digits(year in 1900i32..=2025) {
        let code = generate(&person("Rossi", "Mario", (year, 1, 1), "M")).expect("valid input");
        prop_assert_eq!(code.year_digits(), format!("{:02}", year % 100));
    }

    #[test]
    fn feb_29_accepted_only_in_leap_years(year in 1900u16..=2025) {
        let result = generate(&person("Rossi", "Mario", (i32::from(year), 2, 29), "M"));
        if is_leap_year(year) {
            prop_assert!(result.is_ok(), "{year} is a leap year");
        } else {
            let rejected = matches!(result, Err(FiscalCodeError::InvalidDate { .. }));
            prop_assert!(rejected, "{year} is not a leap year");
        }
    }

    #[test]
    fn substituting_one_letter_changes_check_letter(
        position in prop::sample::select(vec![0usize, 1, 2, 3, 4, 5, 8, 11]),
        replacement in prop::char::range('A', 'Z'),
    ) {
        let prefix = "RSSMRA80A01H501";
        let original = prefix.as_bytes()[position];
        prop_assume!(replacement as u8 != original);

        let mut mutated = prefix.as_bytes().to_vec();
        mutated[position] = replacement as u8;
        let mutated = String::from_utf8(mutated).expect("ASCII");

        prop_assert_ne!(check_letter(prefix), check_letter(&mutated));
    }

    #[test]
    fn substituting_one_digit_changes_check_letter(
        position in prop::sample::select(vec![6usize, 7, 9, 10, 12, 13, 14]),
        replacement in prop::char::range('0', '9'),
    ) {
        let prefix = "RSSMRA80A01H501";
        let original = prefix.as_bytes()[position];
        prop_assume!(replacement as u8 != original);

        let mut mutated = prefix.as_bytes().to_vec();
        mutated[position] = replacement as u8;
        let mutated = String::from_utf8(mutated).expect("ASCII");

        prop_assert_ne!(check_letter(prefix), check_letter(&mutated));
    }
}

#[test]
fn golden_code() {
    let code = generate(&person("Rossi", "Mario", (1980, 1, 1), "M")).expect("valid input");
    assert_eq!(code.to_string(), "RSSMRA80A01H501U");
}
