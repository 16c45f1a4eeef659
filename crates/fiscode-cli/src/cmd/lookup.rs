//! Implementation of `fiscode lookup --municipality <NAME> --province <PR>`.
//!
//! Exit codes: 0 = found, 1 = bad province code or municipality not found.
use std::io::Write;

use fiscode_core::{CadastralCode, MunicipalitySource, ProvinceCode, resolve};
use serde::Serialize;

use super::{stdout_error, write_json};
use crate::OutputFormat;
use crate::error::CliError;

#[derive(Serialize)]
struct LookupOutput<'a> {
    municipality: &'a str,
    province: &'a ProvinceCode,
    cadastral_code: &'a CadastralCode,
}

/// Runs the `lookup` command.
///
/// # Errors
///
/// Returns [`CliError`] with exit code 1 if `province` is not a two-letter
/// code or the municipality is not in `municipalities`.
pub fn run<S>(
    municipality: &str,
    province: &str,
    municipalities: &S,
    format: OutputFormat,
) -> Result<(), CliError>
where
    S: MunicipalitySource + ?Sized,
{
    let province = ProvinceCode::try_from(province).map_err(|e| CliError::InvalidInput {
        detail: e.to_string(),
    })?;
    let code = resolve(municipalities, municipality, &province)?;

    let output = LookupOutput {
        municipality: municipality.trim(),
        province: &province,
        cadastral_code: &code,
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_output(&mut out, &output, format).map_err(|e| stdout_error(&e))
}

fn write_output<W: Write>(
    w: &mut W,
    output: &LookupOutput<'_>,
    format: OutputFormat,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Human => writeln!(w, "{}", output.cadastral_code),
        OutputFormat::Json => write_json(w, output),
    }
}
