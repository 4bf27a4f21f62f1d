//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use wayfare_cli::CliError;

fn main() -> eyre::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match wayfare_cli::run() {
        Ok(()) => Ok(()),
        // Let clap print help, version and usage errors with its own exit codes.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => Err(err.into()),
    }
}
