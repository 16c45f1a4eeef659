use std::process;

use clap::Parser;
use tracing::debug;

mod cli;
mod cmd;
mod error;
mod io;
mod logging;

pub use cli::{Cli, Command, OutputFormat};
use error::CliError;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.quiet, cli.verbose);
    debug!(core = fiscode_core::version(), "fiscode starting");

    if let Err(e) = run(&cli) {
        eprintln!("{}", e.message());
        process::exit(e.exit_code());
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let table = cli.municipalities.as_deref();
    match &cli.command {
        Command::Generate(args) => {
            let index = cmd::require_index(table, cli.max_file_size)?;
            cmd::generate::run(args, &index, cli.format)
        }
        Command::Check { code } => {
            let index = table
                .map(|path| cmd::load_index(path, cli.max_file_size))
                .transpose()?;
            cmd::check::run(code, index.as_ref(), cli.format)
        }
        Command::Lookup {
            municipality,
            province,
        } => {
            let index = cmd::require_index(table, cli.max_file_size)?;
            cmd::lookup::run(municipality, province, &index, cli.format)
        }
    }
}
