/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `fiscode` binary. Every
/// variant maps to a stable exit code via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The municipality table could not be
///   found, read, or parsed, so no fiscal code work was attempted.
/// - Exit code **1**: logical failure. The inputs were readable but the
///   person data is invalid, the birthplace is unknown, or a checked code is
///   wrong.
use std::fmt;
use std::path::PathBuf;

use fiscode_core::FiscalCodeError;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `fiscode` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// The municipality table path does not exist.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read the table.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The table exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// The table path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The size reported by the filesystem.
        actual: u64,
    },

    /// The table bytes are not valid UTF-8.
    InvalidUtf8 {
        /// The table path.
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// Any other I/O error, including failures writing to stdout.
    IoError {
        /// What was being read or written.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// A command that needs the municipality table was run without one.
    MissingMunicipalityTable,

    /// The municipality table was read but could not be parsed.
    MalformedTable {
        /// The table path.
        source: String,
        /// The parser's description of the problem.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// A person field or the birth date was rejected.
    InvalidInput {
        /// The validation message.
        detail: String,
    },

    /// The municipality and province are not in the table.
    MunicipalityNotFound {
        /// Municipality name as given.
        municipality: String,
        /// Province code.
        province: String,
    },

    /// `check` was given a code with a bad layout or control letter.
    InvalidFiscalCode {
        /// Why the code was rejected.
        detail: String,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::IoError { .. }
            | Self::MissingMunicipalityTable
            | Self::MalformedTable { .. } => 2,

            Self::InvalidInput { .. }
            | Self::MunicipalityNotFound { .. }
            | Self::InvalidFiscalCode { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual,
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::MissingMunicipalityTable => "error: no municipality table given; \
                 pass --municipalities or set FISCODE_MUNICIPALITIES"
                .to_owned(),
            Self::MalformedTable { source, detail } => {
                format!("error: malformed municipality table {source}: {detail}")
            }
            Self::InvalidInput { detail } => format!("error: {detail}"),
            Self::MunicipalityNotFound {
                municipality,
                province,
            } => {
                format!("error: municipality not found: {municipality:?} in province {province}")
            }
            Self::InvalidFiscalCode { detail } => format!("error: {detail}"),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

impl From<FiscalCodeError> for CliError {
    fn from(err: FiscalCodeError) -> Self {
        match err {
            FiscalCodeError::MunicipalityNotFound {
                municipality,
                province,
            } => Self::MunicipalityNotFound {
                municipality,
                province,
            },
            FiscalCodeError::InvalidField { .. } | FiscalCodeError::InvalidDate { .. } => {
                Self::InvalidInput {
                    detail: err.to_string(),
                }
            }
            FiscalCodeError::Format(inner) => Self::InvalidFiscalCode {
                detail: inner.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use fiscode_core::{Field, FiscalCode};

    use super::*;

    #[test]
    fn input_failures_exit_2() {
        let errors = [
            CliError::FileNotFound {
                path: PathBuf::from("comuni.csv"),
            },
            CliError::PermissionDenied {
                path: PathBuf::from("comuni.csv"),
            },
            CliError::FileTooLarge {
                source: "comuni.csv".to_owned(),
                limit: 10,
                actual: 20,
            },
            CliError::InvalidUtf8 {
                source: "comuni.csv".to_owned(),
                byte_offset: 3,
            },
            CliError::IoError {
                source: "stdout".to_owned(),
                detail: "broken pipe".to_owned(),
            },
            CliError::MissingMunicipalityTable,
            CliError::MalformedTable {
                source: "comuni.csv".to_owned(),
                detail: "line 2: expected 3 fields".to_owned(),
            },
        ];
        for err in &errors {
            assert_eq!(err.exit_code(), 2, "{err}");
        }
    }

    #[test]
    fn logical_failures_exit_1() {
        let errors = [
            CliError::InvalidInput {
                detail: "invalid surname: must not be blank".to_owned(),
            },
            CliError::MunicipalityNotFound {
                municipality: "Atlantide".to_owned(),
                province: "RM".to_owned(),
            },
            CliError::InvalidFiscalCode {
                detail: "bad control letter".to_owned(),
            },
        ];
        for err in &errors {
            assert_eq!(err.exit_code(), 1, "{err}");
        }
    }

    #[test]
    fn messages_start_with_error_prefix() {
        let err = CliError::FileTooLarge {
            source: "comuni.csv".to_owned(),
            limit: 10,
            actual: 20,
        };
        let msg = err.message();
        assert!(msg.starts_with("error: "), "{msg}");
        assert!(msg.contains("20 bytes"), "{msg}");
        assert_eq!(err.to_string(), msg);
    }

    #[test]
    fn missing_table_message_names_flag_and_env() {
        let msg = CliError::MissingMunicipalityTable.message();
        assert!(msg.contains("--municipalities"), "{msg}");
        assert!(msg.contains("FISCODE_MUNICIPALITIES"), "{msg}");
    }

    #[test]
    fn invalid_date_maps_to_invalid_input() {
        let err = CliError::from(FiscalCodeError::InvalidDate {
            year: 2023,
            month: 2,
            day: 29,
        });
        assert_eq!(err.exit_code(), 1);
        assert!(err.message().contains("2023-02-29"), "{}", err.message());
    }

    #[test]
    fn not_found_keeps_municipality_and_province() {
        let err = CliError::from(FiscalCodeError::MunicipalityNotFound {
            municipality: "Atlantide".to_owned(),
            province: "RM".to_owned(),
        });
        let msg = err.message();
        assert!(msg.contains("Atlantide"), "{msg}");
        assert!(msg.contains("RM"), "{msg}");
    }

    #[test]
    fn format_error_maps_to_invalid_code() {
        let parse_err = FiscalCode::try_from("RSSMRA80A01H501Z").expect_err("wrong letter");
        let err = CliError::from(FiscalCodeError::from(parse_err));
        assert!(matches!(err, CliError::InvalidFiscalCode { .. }));
        assert!(err.message().contains("'U'"), "{}", err.message());
    }

    #[test]
    fn field_errors_keep_the_field_name() {
        let core_err = "X".parse::<fiscode_core::Sex>().expect_err("bad sex");
        assert_eq!(core_err.field(), Some(Field::Sex));
        let err = CliError::from(core_err);
        assert!(err.message().contains("sex"), "{}", err.message());
    }
}
