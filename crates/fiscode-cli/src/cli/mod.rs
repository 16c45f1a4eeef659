//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fiscode_core::DEFAULT_MIN_BIRTH_YEAR;

/// Output format for CLI commands.
///
/// `Human` prints aligned `key: value` lines to stdout. `Json` prints a
/// single JSON object to stdout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default).
    Human,
    /// Structured JSON output.
    Json,
}

/// Arguments for `fiscode generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Family name (accents and apostrophes are allowed).
    #[arg(long)]
    pub surname: String,
    /// Given name(s).
    #[arg(long)]
    pub name: String,
    /// Four-digit birth year.
    #[arg(long, allow_negative_numbers = true)]
    pub year: i32,
    /// Birth month, 1-12.
    #[arg(long)]
    pub month: u32,
    /// Birth day, 1-31.
    #[arg(long)]
    pub day: u32,
    /// Sex: M or F.
    #[arg(long)]
    pub sex: String,
    /// Birth municipality name, as listed in the municipality table.
    #[arg(long)]
    pub municipality: String,
    /// Two-letter province code of the birth municipality.
    #[arg(long)]
    pub province: String,
    /// Earliest accepted birth year.
    ///
    /// Can also be set via the `FISCODE_MIN_BIRTH_YEAR` environment variable.
    #[arg(long, env = "FISCODE_MIN_BIRTH_YEAR", default_value_t = DEFAULT_MIN_BIRTH_YEAR)]
    pub min_birth_year: u16,
}

/// All top-level subcommands exposed by the `fiscode` binary.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate the fiscal code for a person.
    Generate(GenerateArgs),

    /// Check a fiscal code's layout and control letter and decode its blocks.
    Check {
        /// The 16-character code to check (case-insensitive).
        #[arg(value_name = "CODE")]
        code: String,
    },

    /// Print the cadastral code of a municipality.
    Lookup {
        /// Municipality name (case- and accent-insensitive).
        #[arg(long)]
        municipality: String,
        /// Two-letter province code.
        #[arg(long)]
        province: String,
    },
}

/// Root CLI struct for the `fiscode` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser, Debug)]
#[command(
    name = "fiscode",
    version,
    about = "Italian fiscal code generator",
    long_about = "Generates, checks and decodes Italian fiscal codes (codice fiscale).\n\
                  Birth municipalities are resolved through a CSV table with rows of\n\
                  municipality,province,cadastral_code."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Municipality table (CSV: municipality,province,cadastral_code).
    ///
    /// Required by `generate` and `lookup`; optional for `check`, where it
    /// adds the birth municipality to the decoded output.
    #[arg(long, short = 'm', global = true, env = "FISCODE_MUNICIPALITIES")]
    pub municipalities: Option<PathBuf>,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Suppress all stderr output except errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log lookups and table loading to stderr (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum municipality table size in bytes.
    ///
    /// Can also be set via the `FISCODE_MAX_FILE_SIZE` environment variable.
    /// Default: 67108864 (64 MiB).
    #[arg(
        long,
        global = true,
        env = "FISCODE_MAX_FILE_SIZE",
        default_value = "67108864"
    )]
    pub max_file_size: u64,
}
