//! # Command Line Interface
//!
//! clap definitions for the `folio` binary.
//!
//! ## Command Map
//! ```text
//! folio [--db PATH] [--password PW] [--json] [-v|-vv] <COMMAND>
//!
//!   login                          check the shop password
//!   passwd   --new-password PW     change the shop password
//!   add      --title .. --stock .. add a record
//!   search   [--title] [--author]  full-text search
//!   list                           every record
//!   show     <SERIAL>              one record
//!   update   <SERIAL> [fields]     partial update
//!   delete   <SERIAL>              remove a record
//!   buy      <SERIAL> <QUANTITY>   sell copies
//!   low-stock                      records below the threshold
//!   browse   [--title] [--author]  interactive pager (stdin)
//!   report   --from --to [--type]  report rows, optional CSV/PDF export
//! ```
//!
//! Numeric fields are taken as text and parsed by `folio_core::validation`
//! so that a typo produces the same message in every command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use folio_core::TransactionType;

use crate::export::ExportFormat;

#[derive(Debug, Parser)]
#[command(
    name = "folio",
    version,
    about = "Bookshop inventory manager: stock, purchases and transaction reports"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Database file (overrides FOLIO_DB_PATH and the platform default)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Shop password; prompted on stdin when absent
    #[arg(long, global = true, env = "FOLIO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Print command results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check the shop password and exit
    Login,

    /// Change the shop password
    Passwd {
        #[arg(long)]
        new_password: String,
    },

    /// Add a book to the inventory
    Add(AddArgs),

    /// Full-text search by title and/or author
    Search(SearchArgs),

    /// List every record
    List,

    /// Show one record
    Show { serial: i64 },

    /// Change fields of a record
    Update(UpdateArgs),

    /// Remove a record
    Delete { serial: i64 },

    /// Sell copies of a record
    Buy { serial: i64, quantity: String },

    /// Records that need restocking
    LowStock,

    /// Step through records interactively
    Browse(SearchArgs),

    /// Transaction report for a date range
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub author: String,

    #[arg(long)]
    pub publisher: String,

    /// Shelf or room the copies are kept in
    #[arg(long)]
    pub location: String,

    #[arg(long)]
    pub stock: String,

    /// Unit price, e.g. 9.99
    #[arg(long)]
    pub price: String,

    /// Date the stock arrived (YYYY-MM-DD or RFC 3339); defaults to now
    #[arg(long)]
    pub date: Option<String>,

    /// PNG cover image
    #[arg(long)]
    pub cover: Option<PathBuf>,
}

#[derive(Debug, Args, Default)]
pub struct SearchArgs {
    #[arg(long, default_value = "")]
    pub title: String,

    #[arg(long, default_value = "")]
    pub author: String,

    /// Maximum number of records (defaults to FOLIO_PAGE_SIZE)
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Debug, Args, Default)]
pub struct UpdateArgs {
    pub serial: i64,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long)]
    pub publisher: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub stock: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    /// Replace the cover with this PNG
    #[arg(long, conflicts_with = "clear_cover")]
    pub cover: Option<PathBuf>,

    /// Remove the stored cover
    #[arg(long)]
    pub clear_cover: bool,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// First day (YYYY-MM-DD, local time) or RFC 3339 instant
    #[arg(long)]
    pub from: String,

    /// Last day, inclusive (YYYY-MM-DD, local time) or RFC 3339 instant
    #[arg(long)]
    pub to: String,

    /// all, sales, updates, deletions or additions
    #[arg(long = "type", default_value = "all")]
    pub transaction_type: TransactionType,

    /// Also write the report to a file
    #[arg(long, value_enum, requires = "out")]
    pub export: Option<ExportFormat>,

    /// Export destination
    #[arg(long, requires = "export")]
    pub out: Option<PathBuf>,
}
