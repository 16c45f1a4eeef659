//! Implementation of `fiscode generate`.
//!
//! Validates the person fields, resolves the birth municipality against the
//! loaded table, and prints the fiscal code. In `--format json` mode a single
//! `{"fiscal_code": ...}` object is emitted.
//!
//! Exit codes: 0 = success, 1 = invalid input or unknown municipality.
use std::io::Write;

use fiscode_core::{
    FiscalCode, MunicipalitySource, PersonFields, ValidationConfig, generate_fiscal_code,
};
use serde::Serialize;
use tracing::info;

use super::{stdout_error, write_json};
use crate::OutputFormat;
use crate::cli::GenerateArgs;
use crate::error::CliError;

#[derive(Serialize)]
struct GenerateOutput<'a> {
    fiscal_code: &'a FiscalCode,
}

/// Runs the `generate` command.
///
/// # Errors
///
/// Returns [`CliError`] with exit code 1 if any field is invalid, the date
/// does not exist, or the municipality is not in `municipalities`.
pub fn run<S>(args: &GenerateArgs, municipalities: &S, format: OutputFormat) -> Result<(), CliError>
where
    S: MunicipalitySource + ?Sized,
{
    let code = generate(args, municipalities)?;
    info!(%code, "fiscal code generated");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_output(&mut out, &code, format).map_err(|e| stdout_error(&e))
}

/// Builds the fiscal code described by `args`.
///
/// # Errors
///
/// See [`run`].
pub fn generate<S>(args: &GenerateArgs, municipalities: &S) -> Result<FiscalCode, CliError>
where
    S: MunicipalitySource + ?Sized,
{
    let fields = PersonFields {
        surname: &args.surname,
        name: &args.name,
        birth_year: args.year,
        birth_month: args.month,
        birth_day: args.day,
        sex: &args.sex,
        municipality: &args.municipality,
        province: &args.province,
    };
    let config = ValidationConfig::default().with_min_birth_year(args.min_birth_year);
    Ok(generate_fiscal_code(&fields, municipalities, &config)?)
}

fn write_output<W: Write>(w: &mut W, code: &FiscalCode, format: OutputFormat) -> std::io::Result<()> {
    match format {
        OutputFormat::Human => writeln!(w, "{code}"),
        OutputFormat::Json => write_json(w, &GenerateOutput { fiscal_code: code }),
    }
}
