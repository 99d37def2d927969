//! # Folio Command Line Library
//!
//! Everything behind the `folio` binary. `main.rs` only parses arguments
//! and hands them to [`run`].
//!
//! ## Module Organization
//! ```text
//! folio_cli/
//! ├── lib.rs          ◄─── You are here (startup, login gate, dispatch)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState (database + config)
//! │   └── config.rs   ◄─── AppConfig from env and flags
//! ├── commands/
//! │   ├── book.rs     ◄─── add/search/list/show/update/delete/low-stock
//! │   ├── purchase.rs ◄─── buy
//! │   ├── report.rs   ◄─── transaction reports
//! │   └── session.rs  ◄─── login gate, password change
//! ├── browse.rs       ◄─── interactive pager
//! ├── export/         ◄─── CSV and PDF report files
//! ├── render.rs       ◄─── text / JSON output
//! └── error.rs        ◄─── AppError and exit codes
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize logging (stderr, -v / RUST_LOG)                         │
//! │  2. Load AppConfig (FOLIO_* env, then --db)                            │
//! │  3. Open database, run pending migrations                              │
//! │  4. Login gate (--password, FOLIO_PASSWORD or a stdin prompt)          │
//! │  5. Run one command, print the result                                  │
//! │  6. Close the pool                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod browse;
pub mod cli;
pub mod commands;
pub mod error;
pub mod export;
pub mod render;
pub mod state;

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Instant;

use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Command};
use commands::{book, purchase, report, session};
use error::{AppError, ErrorCode};
use folio_db::{Database, DbConfig};
use render::emit;
use state::{AppConfig, AppState};

/// Runs one `folio` invocation and returns the process exit code.
///
/// Errors are printed here: as JSON on stdout with `--json`, otherwise
/// as `Error: ...` on stderr.
pub async fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.global.verbose);

    let json = cli.global.json;
    let mut stdout = io::stdout().lock();

    match execute(&cli, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json {
                let _ = serde_json::to_writer_pretty(&mut stdout, &err);
                let _ = writeln!(stdout);
            } else {
                eprintln!("Error: {}", err.message);
            }
            err.exit_code()
        }
    }
}

/// Opens the database, passes the login gate and runs the command,
/// writing its result to `out`.
pub async fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<(), AppError> {
    let start = Instant::now();
    let config = AppConfig::from_env().with_db_path(cli.global.db.clone());

    let db = open_database(&config).await?;
    let state = AppState::new(db, config);

    let result = gate_and_dispatch(&state, cli, out).await;
    state.db().close().await;

    debug!(
        command = command_name(&cli.command),
        elapsed_ms = start.elapsed().as_millis() as u64,
        ok = result.is_ok(),
        "Command finished"
    );
    result
}

async fn gate_and_dispatch<W: Write>(state: &AppState, cli: &Cli, out: &mut W) -> Result<(), AppError> {
    let password = match &cli.global.password {
        Some(password) => password.clone(),
        None => session::prompt_password(io::stdin().lock(), io::stderr())?,
    };
    session::authenticate(state, &password).await?;

    dispatch(state, &cli.command, cli.global.json, out).await
}

async fn dispatch<W: Write>(state: &AppState, command: &Command, json: bool, out: &mut W) -> Result<(), AppError> {
    let config = state.config();

    match command {
        Command::Login => emit(&session::login(), json, config, out),
        Command::Passwd { new_password } => {
            emit(&session::change_password(state, new_password).await?, json, config, out)
        }
        Command::Add(args) => emit(&book::add(state, args).await?, json, config, out),
        Command::Search(args) => emit(&book::search(state, args).await?, json, config, out),
        Command::List => emit(&book::list(state).await?, json, config, out),
        Command::Show { serial } => emit(&book::show(state, *serial).await?, json, config, out),
        Command::Update(args) => emit(&book::update(state, args).await?, json, config, out),
        Command::Delete { serial } => emit(&book::delete(state, *serial).await?, json, config, out),
        Command::Buy { serial, quantity } => {
            emit(&purchase::buy(state, *serial, quantity).await?, json, config, out)
        }
        Command::LowStock => emit(&book::low_stock(state).await?, json, config, out),
        Command::Browse(args) => {
            // Keep stdout clean for the JSON summary
            let summary = if json {
                browse::browse(state, args, io::stdin().lock(), io::stderr()).await?
            } else {
                browse::browse(state, args, io::stdin().lock(), &mut *out).await?
            };
            emit(&summary, json, config, out)
        }
        Command::Report(args) => emit(&report::report(state, args).await?, json, config, out),
    }
}

async fn open_database(config: &AppConfig) -> Result<Database, AppError> {
    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::new(
                    ErrorCode::DatabaseError,
                    format!("Could not create {}: {}", parent.display(), e),
                )
            })?;
        }
    }

    info!(db_path = %config.db_path.display(), "Opening database");
    let db = Database::new(DbConfig::new(config.db_path.clone())).await?;
    Ok(db)
}

/// Installs the stderr logger.
///
/// ## Log Levels
/// - default: warnings only, so command output stays readable
/// - `-v`: info for the folio crates
/// - `-vv`: debug for the folio crates, SQL kept at warn
/// - `RUST_LOG` overrides all of the above
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "warn,folio_cli=info,folio_db=info,folio_core=info",
        _ => "info,folio_cli=debug,folio_db=debug,folio_core=debug,sqlx=warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init();
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Login => "login",
        Command::Passwd { .. } => "passwd",
        Command::Add(_) => "add",
        Command::Search(_) => "search",
        Command::List => "list",
        Command::Show { .. } => "show",
        Command::Update(_) => "update",
        Command::Delete { .. } => "delete",
        Command::Buy { .. } => "buy",
        Command::LowStock => "low-stock",
        Command::Browse(_) => "browse",
        Command::Report(_) => "report",
    }
}
