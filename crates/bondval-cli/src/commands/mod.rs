mod value;

use bondval_core::ValuationReport;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<ValuationReport, CliError> {
    match &cli.command {
        Command::Value(args) => value::run(args).await,
    }
}
