//! # streetfood command-line entry point
//!
//! ```bash
//! streetfood countries --file street_food.csv
//! streetfood view --file street_food.csv --country Lebanon
//! streetfood clean --file street_food.csv --output cleaned.csv
//! ```
//!
//! Set `RUST_LOG=debug` to see cache hits and filter sizes.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    streetfood::logging::init(cli.log_file)?;
    cli::run_command(cli)
}
