//! Renders a valuation report to stdout.

use std::io::{self, Write};

use bondval_core::{BondValuation, ReportSummary, ValuationFailure, ValuationReport};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    valuations: &'a [BondValuation],
    failures: &'a [ValuationFailure],
    summary: ReportSummary,
}

pub fn render(report: &ValuationReport, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_report(&mut handle, report, format, pretty)?;
    handle.flush()?;
    Ok(())
}

fn write_report<W: Write>(
    writer: &mut W,
    report: &ValuationReport,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(writer, report, pretty),
        OutputFormat::Table => write_table(writer, report).map_err(CliError::from),
    }
}

fn write_json<W: Write>(writer: &mut W, report: &ValuationReport, pretty: bool) -> Result<(), CliError> {
    let document = JsonReport {
        valuations: &report.valuations,
        failures: &report.failures,
        summary: report.summary(),
    };

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &document)?;
    } else {
        serde_json::to_writer(&mut *writer, &document)?;
    }
    writeln!(writer)?;
    Ok(())
}

const HEADERS: [&str; 8] = [
    "Issued",
    "Denom",
    "Issue Price",
    "Interest",
    "Rate",
    "Value",
    "Next Accrual",
    "Maturity",
];

fn write_table<W: Write>(writer: &mut W, report: &ValuationReport) -> io::Result<()> {
    let rows = report
        .valuations
        .iter()
        .map(|valuation| {
            [
                valuation.issue_date.to_string(),
                format!("${}", valuation.denomination),
                money(valuation.issue_price),
                valuation.gain_amount.clone(),
                format!("{:.2}%", valuation.interest_rate * Decimal::ONE_HUNDRED),
                money(valuation.current_value),
                valuation.next_accrual_date.clone(),
                valuation.final_maturity_date.clone(),
            ]
        })
        .collect::<Vec<_>>();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    write_row(writer, HEADERS.as_slice(), &widths)?;
    for row in &rows {
        write_row(writer, row.as_slice(), &widths)?;
    }

    let summary = report.summary();
    writeln!(writer)?;
    writeln!(
        writer,
        "Total: {} valued of {}, issue price {}, current value {}",
        summary.valued,
        summary.requested,
        total(summary.total_issue_price),
        total(summary.total_current_value),
    )?;

    if !report.failures.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Failures ({}):", report.failures.len())?;
        for failure in &report.failures {
            writeln!(
                writer,
                "  row {}: {} [{}] {}",
                failure.index + 1,
                failure.descriptor,
                failure.cause.code(),
                failure.detail
            )?;
        }
    }

    Ok(())
}

fn write_row<W: Write, S: AsRef<str>>(writer: &mut W, cells: &[S], widths: &[usize]) -> io::Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(writer, "{}", line.trim_end())
}

fn money(amount: Decimal) -> String {
    format!("${amount:.2}")
}

fn total(amount: Option<Decimal>) -> String {
    amount.map_or_else(|| String::from("overflow"), money)
}
