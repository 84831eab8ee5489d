///
/// squeal CLI - Run prepared SQL statements against SQLite
///
/// Commands:
/// - squeal query <db> <sql>: prepare, bind parameters, print every row
/// - squeal exec <db> <sql>: run statements that return no rows
///
/// Positional parameters (`-p`) bind in order starting at 1; named
/// parameters (`-n NAME=VALUE`) bind by name afterwards. Logs go to stderr;
/// repeat `-v` for more detail.
///

mod error;
mod output;
mod params;
mod settings;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use squeal_sqlite3::{ConnectionConfig, SqliteConnection};
use tracing::{info, Level};

use crate::error::CliError;
use crate::settings::{OutputFormat, Settings};

#[derive(Parser)]
#[command(name = "squeal")]
#[command(author, version, about = "Run prepared SQL statements against SQLite", long_about = None)]
struct Cli {
    /// Settings file with [connection] and [output] tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare one statement, bind parameters and print its rows
    Query {
        /// Database file, or :memory:
        database: PathBuf,

        /// SQL text; only the first statement runs
        sql: String,

        /// Positional parameter value (repeatable)
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,

        /// Named parameter as NAME=VALUE (repeatable)
        #[arg(short = 'n', long = "named")]
        named: Vec<String>,

        /// Output format, overriding the settings file
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Open the database read-only
        #[arg(long)]
        read_only: bool,
    },

    /// Run one or more statements and print the change count of the last
    Exec {
        /// Database file, or :memory:
        database: PathBuf,

        /// SQL text, `;`-separated
        sql: String,
    },
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(log_level(cli.verbose))
        .init();

    let settings = Settings::load(cli.config.as_deref()).map_err(CliError::from)?;

    match cli.command {
        Commands::Query {
            database,
            sql,
            params,
            named,
            format,
            read_only,
        } => {
            let mut settings = settings;
            if let Some(format) = format {
                settings.output.format = format;
            }
            let config = connection_config(&settings, database, read_only);
            run_query(&settings, &config, &sql, &params, &named)?;
        }
        Commands::Exec { database, sql } => {
            let config = connection_config(&settings, database, false);
            run_exec(&config, &sql)?;
        }
    }
    Ok(())
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn connection_config(settings: &Settings, database: PathBuf, read_only: bool) -> ConnectionConfig {
    let mut config = settings.connection.clone();
    config.path = database;
    if read_only {
        config = config.read_only(true);
    }
    config
}

fn run_query(
    settings: &Settings,
    config: &ConnectionConfig,
    sql: &str,
    params: &[String],
    named: &[String],
) -> Result<(), CliError> {
    config.validate()?;
    let connection = SqliteConnection::open_with_config(config)?;
    let mut statement = connection.prepare(sql)?;

    for (offset, raw) in params.iter().enumerate() {
        let value = params::parse_value(raw)?;
        statement.bind_value(offset + 1, value.as_ref())?;
    }
    for raw in named {
        let (name, value) = params::parse_named(raw)?;
        statement.bind_value_named(&name, value.as_ref())?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let rows = output::render(&mut statement, &settings.output, &mut out)?;
    out.flush()?;
    info!(rows, "query finished");

    statement.finalize()?;
    connection.close()?;
    Ok(())
}

fn run_exec(config: &ConnectionConfig, sql: &str) -> Result<(), CliError> {
    config.validate()?;
    let connection = SqliteConnection::open_with_config(config)?;
    connection.execute_batch(sql)?;
    let changes = connection.changes();
    info!(changes, "batch finished");
    writeln!(io::stdout(), "{}", changes)?;
    connection.close()?;
    Ok(())
}
