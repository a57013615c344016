//! CLI argument definitions for bondval.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `value` | Value every bond listed in a CSV portfolio |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--verbose` | `false` | Log every request attempt to stderr |
//!
//! Settings not given on the command line fall back to the `BONDVAL_*`
//! environment variables, then to built-in defaults.
//!
//! # Examples
//!
//! ```bash
//! # Value a portfolio and print a table
//! bondval value bonds.csv
//!
//! # JSON for scripting, four requests at a time
//! bondval value bonds.csv --format json --pretty --max-concurrency 4
//!
//! # Series I bonds with a two minute batch deadline
//! bondval value ibonds.csv --series I --dispatch-timeout-ms 120000
//! ```

use std::path::PathBuf;

use bondval_core::BondSeries;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Savings bond redemption values from the Treasury calculator.
#[derive(Debug, Parser)]
#[command(
    name = "bondval",
    author,
    version,
    about = "Value a portfolio of paper savings bonds",
    long_about = "bondval asks the Treasury's savings bond calculator for the current \
redemption value of every bond in a CSV portfolio, in parallel, and prints the \
results ordered by issue month.\n\
\n\
Bonds that cannot be valued are listed separately with the reason; the rest \
of the portfolio is still reported."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Log request attempts and retries (RUST_LOG takes precedence).
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for terminal display.
    Table,
    /// Single JSON object with valuations, failures and summary.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Value every bond in a CSV portfolio.
    ///
    /// The file needs a header row, then one bond per row with face value,
    /// issue date (MM/YYYY) and serial number.
    ///
    /// # Examples
    ///
    ///   bondval value bonds.csv
    ///   bondval value bonds.csv --retries 4 --requests-per-second 5
    Value(ValueArgs),
}

/// Arguments for the `value` command.
#[derive(Debug, Args)]
pub struct ValueArgs {
    /// CSV file with columns: face value, issue date, serial number.
    pub input: PathBuf,

    /// Bond series submitted to the calculator (EE, I or E).
    #[arg(long)]
    pub series: Option<BondSeries>,

    /// Maximum valuations in flight; 0 removes the bound.
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Per-request timeout in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Deadline for the whole batch in milliseconds; 0 disables it.
    #[arg(long)]
    pub dispatch_timeout_ms: Option<u64>,

    /// Retries after a transport or service failure.
    #[arg(long)]
    pub retries: Option<u32>,

    /// Requests per second across all workers; 0 removes the limit.
    #[arg(long)]
    pub requests_per_second: Option<u32>,

    /// Calculator endpoint URL.
    #[arg(long)]
    pub endpoint: Option<String>,
}
