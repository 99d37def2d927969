//! # Folio Entry Point
//!
//! ```text
//! folio --password scope add --title Dune --author "Frank Herbert" ...
//! folio buy 12 3
//! folio report --from 2024-03-01 --to 2024-03-31 --type sales --export pdf --out march.pdf
//! ```
//!
//! Setup lives in `lib.rs` so it can be tested.

use std::process::ExitCode;

use clap::Parser;
use folio_cli::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    folio_cli::run(Cli::parse()).await
}
