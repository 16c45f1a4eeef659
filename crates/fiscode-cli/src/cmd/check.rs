//! Implementation of `fiscode check <CODE>`.
//!
//! Verifies the block layout and control letter of a fiscal code and prints
//! its decoded parts. When a municipality table is available the cadastral
//! code is also mapped back to the municipality name(s).
//!
//! Exit codes: 0 = valid, 1 = invalid code.
use std::io::Write;

use fiscode_core::{CadastralCode, FiscalCode, MunicipalityIndex, ProvinceCode, Sex};
use serde::Serialize;

use super::{stdout_error, write_json};
use crate::OutputFormat;
use crate::error::CliError;

/// A birthplace recovered from the cadastral code.
#[derive(Debug, Serialize)]
pub struct Birthplace<'a> {
    /// Normalized municipality name.
    pub municipality: &'a str,
    /// Province code.
    pub province: &'a ProvinceCode,
}

/// The decoded blocks of a valid fiscal code.
#[derive(Debug, Serialize)]
pub struct Decoded<'a> {
    /// The code itself.
    pub fiscal_code: &'a FiscalCode,
    /// Three-letter surname block.
    pub surname_block: &'a str,
    /// Three-letter name block.
    pub name_block: &'a str,
    /// Last two digits of the birth year.
    pub birth_year_digits: &'a str,
    /// Birth month, 1-12.
    pub birth_month: u8,
    /// Birth day of month, 1-31.
    pub birth_day: u8,
    /// Sex recovered from the day block.
    pub sex: Sex,
    /// Cadastral code of the birth municipality.
    pub cadastral_code: &'a str,
    /// Control letter.
    pub check_letter: char,
    /// Matching municipalities; absent when no table was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthplaces: Option<Vec<Birthplace<'a>>>,
}

impl<'a> Decoded<'a> {
    /// Decodes `code`, looking up its birthplace in `municipalities` if given.
    pub fn new(code: &'a FiscalCode, municipalities: Option<&'a MunicipalityIndex>) -> Self {
        let birthplaces = municipalities.map(|index| {
            CadastralCode::try_from(code.cadastral_code())
                .map(|cadastral| {
                    index
                        .municipalities_for(&cadastral)
                        .into_iter()
                        .map(|(municipality, province)| Birthplace {
                            municipality,
                            province,
                        })
                        .collect()
                })
                .unwrap_or_default()
        });

        Self {
            fiscal_code: code,
            surname_block: code.surname_block(),
            name_block: code.name_block(),
            birth_year_digits: code.year_digits(),
            birth_month: code.birth_month(),
            birth_day: code.birth_day(),
            sex: code.sex(),
            cadastral_code: code.cadastral_code(),
            check_letter: code.check_letter(),
            birthplaces,
        }
    }
}

/// Runs the `check` command.
///
/// # Errors
///
/// Returns [`CliError::InvalidFiscalCode`] (exit code 1) if `code` has the
/// wrong layout or control letter.
pub fn run(
    code: &str,
    municipalities: Option<&MunicipalityIndex>,
    format: OutputFormat,
) -> Result<(), CliError> {
    let code = parse(code)?;
    let decoded = Decoded::new(&code, municipalities);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Human => print_human(&mut out, &decoded),
        OutputFormat::Json => write_json(&mut out, &decoded),
    }
    .map_err(|e| stdout_error(&e))
}

/// Parses and verifies a fiscal code. Case and surrounding whitespace are
/// ignored.
///
/// # Errors
///
/// See [`run`].
pub fn parse(code: &str) -> Result<FiscalCode, CliError> {
    FiscalCode::try_from(code).map_err(|e| CliError::InvalidFiscalCode {
        detail: e.to_string(),
    })
}

fn print_human<W: Write>(w: &mut W, decoded: &Decoded<'_>) -> std::io::Result<()> {
    writeln!(w, "fiscal_code:   {}", decoded.fiscal_code)?;
    writeln!(w, "surname:       {}", decoded.surname_block)?;
    writeln!(w, "name:          {}", decoded.name_block)?;
    writeln!(w, "birth_year:    {}", decoded.birth_year_digits)?;
    writeln!(
        w,
        "birth_month:   {} ({})",
        decoded.birth_month,
        decoded.fiscal_code.month_letter()
    )?;
    writeln!(w, "birth_day:     {}", decoded.birth_day)?;
    writeln!(w, "sex:           {}", decoded.sex)?;
    writeln!(w, "cadastral:     {}", decoded.cadastral_code)?;
    if let Some(birthplaces) = &decoded.birthplaces {
        if birthplaces.is_empty() {
            writeln!(w, "municipality:  (not in table)")?;
        }
        for place in birthplaces {
            writeln!(w, "municipality:  {} ({})", place.municipality, place.province)?;
        }
    }
    writeln!(w, "check_letter:  {}", decoded.check_letter)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn index() -> MunicipalityIndex {
        MunicipalityIndex::from_csv_str("Roma,RM,H501\nMilano,MI,F205\n").expect("valid table")
    }

    fn human(decoded: &Decoded<'_>) -> String {
        let mut buf = Vec::new();
        print_human(&mut buf, decoded).expect("write");
        String::from_utf8(buf).expect("utf-8")
    }

    #[test]
    fn decodes_golden_code() {
        let code = parse("RSSMRA80A01H501U").expect("valid code");
        let decoded = Decoded::new(&code, None);
        assert_eq!(decoded.surname_block, "RSS");
        assert_eq!(decoded.name_block, "MRA");
        assert_eq!(decoded.birth_year_digits, "80");
        assert_eq!(decoded.birth_month, 1);
        assert_eq!(decoded.birth_day, 1);
        assert_eq!(decoded.sex, Sex::Male);
        assert_eq!(decoded.cadastral_code, "H501");
        assert_eq!(decoded.check_letter, 'U');
        assert!(decoded.birthplaces.is_none());
    }

    #[test]
    fn decodes_female_day() {
        let code = parse("RSSMRA80A55H501M").expect("valid code");
        let decoded = Decoded::new(&code, None);
        assert_eq!(decoded.birth_day, 15);
        assert_eq!(decoded.sex, Sex::Female);
    }

    #[test]
    fn lowercase_input_is_accepted() {
        let code = parse("  rssmra80a01h501u ").expect("valid code");
        assert_eq!(code.to_string(), "RSSMRA80A01H501U");
    }

    #[test]
    fn wrong_check_letter_is_rejected() {
        let err = parse("RSSMRA80A01H501Z").expect_err("bad control letter");
        assert_eq!(err.exit_code(), 1);
        assert!(matches!(err, CliError::InvalidFiscalCode { .. }));
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = parse("RSSMRA80A01H501").expect_err("too short");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn birthplace_from_table() {
        let index = index();
        let code = parse("RSSMRA80A01H501U").expect("valid code");
        let decoded = Decoded::new(&code, Some(&index));
        let places = decoded.birthplaces.as_ref().expect("table given");
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].municipality, "ROMA");
        assert_eq!(&**places[0].province, "RM");

        let out = human(&decoded);
        assert!(out.contains("municipality:  ROMA (RM)"), "{out}");
    }

    #[test]
    fn birthplace_missing_from_table() {
        let index = MunicipalityIndex::from_csv_str("Milano,MI,F205\n").expect("valid table");
        let code = parse("RSSMRA80A01H501U").expect("valid code");
        let decoded = Decoded::new(&code, Some(&index));
        assert_eq!(decoded.birthplaces.as_ref().map(Vec::len), Some(0));
        assert!(human(&decoded).contains("(not in table)"));
    }

    #[test]
    fn human_output_lists_blocks() {
        let code = parse("RSSMRA80A01H501U").expect("valid code");
        let out = human(&Decoded::new(&code, None));
        assert!(out.contains("birth_month:   1 (A)"), "{out}");
        assert!(out.contains("sex:           male"), "{out}");
        assert!(out.ends_with("check_letter:  U\n"), "{out}");
        assert!(!out.contains("municipality"), "{out}");
    }

    #[test]
    fn json_output_omits_birthplaces_without_table() {
        let code = parse("RSSMRA80A01H501U").expect("valid code");
        let value = serde_json::to_value(Decoded::new(&code, None)).expect("serialize");
        assert_eq!(value["fiscal_code"], "RSSMRA80A01H501U");
        assert_eq!(value["sex"], "male");
        assert_eq!(value["birth_day"], 1);
        assert!(value.get("birthplaces").is_none());
    }
}
