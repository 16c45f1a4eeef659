/// Command module for the `fiscode` CLI.
///
/// Each submodule implements one subcommand. The `run` function in each
/// module takes the parsed arguments and returns `Ok(())` on success or
/// a [`crate::error::CliError`] on failure.
pub mod check;
pub mod generate;
pub mod lookup;

use std::io::Write;
use std::path::Path;

use fiscode_core::MunicipalityIndex;
use serde::Serialize;

use crate::error::CliError;
use crate::io::read_text;

/// Reads and parses the municipality table at `path`.
///
/// # Errors
///
/// Returns [`CliError`] (exit code 2) if the file cannot be read or any of
/// its rows is malformed.
pub fn load_index(path: &Path, max_size: u64) -> Result<MunicipalityIndex, CliError> {
    let text = read_text(path, max_size)?;
    MunicipalityIndex::from_csv_str(&text).map_err(|e| CliError::MalformedTable {
        source: path.display().to_string(),
        detail: e.to_string(),
    })
}

/// Like [`load_index`], for commands that cannot run without a table.
///
/// # Errors
///
/// Returns [`CliError::MissingMunicipalityTable`] if `path` is `None`.
pub fn require_index(path: Option<&Path>, max_size: u64) -> Result<MunicipalityIndex, CliError> {
    let path = path.ok_or(CliError::MissingMunicipalityTable)?;
    load_index(path, max_size)
}

/// Writes `value` as pretty JSON followed by a newline.
fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *w, value).map_err(std::io::Error::from)?;
    writeln!(w)
}

fn stdout_error(e: &std::io::Error) -> CliError {
    CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    }
}
