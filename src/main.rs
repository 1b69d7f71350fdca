//! rLodge main entrypoint.

use clap::Parser;
use rlodge::cli::parser::Cli;
use rlodge::errors::AppError;
use rlodge::run;
use rlodge::ui::messages::{error, error_list};

fn main() {
    let cli = Cli::parse();

    println!();
    if let Err(e) = run(cli) {
        match &e {
            AppError::Validation(items) => error_list("Invalid input:", items),
            _ => error(format!("Error: {}", e)),
        }
        std::process::exit(1);
    }
}
