// Entrypoint for the CLI application.
// - Keeps `main` small: parse the configuration, set up logging and run
//   the pipeline once.
// - All failure paths end here with one message and exit code 1.

use clap::Parser;
use printful_sync::{cli::Args, pipeline};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = pipeline::run(&args) {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
