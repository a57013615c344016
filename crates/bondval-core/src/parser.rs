//! Extracts a [`BondValuation`] from the calculator's HTML results page.
//!
//! The page is treated as a schema rather than a bag of cells: the results
//! table and the valuation row are located by their CSS classes, the row must
//! belong to the requested serial number and carry enough cells, and every
//! converted cell names its field when it fails.
//! A shape change therefore surfaces as
//! [`ValuationError::UnexpectedResponseFormat`] instead of a misread number.

use std::str::FromStr;

use rust_decimal::Decimal;
use scraper::{ElementRef, Html, Selector};

use crate::outcome::ValuationError;
use crate::{BondValuation, IssueMonth, SerialNumber, ValidationError};

/// Number of cells that carry valuation data, in field order.
pub const VALUATION_CELL_COUNT: usize = 8;

/// Where the valuation lives in the results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSchema {
    pub table_selector: &'static str,
    pub row_selector: &'static str,
    pub cell_selector: &'static str,
    /// Cells before the first valuation cell (serial number and series columns).
    pub leading_cells: usize,
    /// Leading cell that echoes the submitted serial number.
    pub serial_cell: usize,
}

impl ResponseSchema {
    pub const TREASURY: Self = Self {
        table_selector: "table.bnddata",
        row_selector: "tr.altrow1",
        cell_selector: "td",
        leading_cells: 2,
        serial_cell: 0,
    };

    pub const fn min_cells(&self) -> usize {
        self.leading_cells + VALUATION_CELL_COUNT
    }
}

impl Default for ResponseSchema {
    fn default() -> Self {
        Self::TREASURY
    }
}

/// Compiled selectors for one [`ResponseSchema`].
#[derive(Debug, Clone)]
pub struct ResponseParser {
    schema: ResponseSchema,
    table: Selector,
    row: Selector,
    cell: Selector,
}

impl ResponseParser {
    pub fn new(schema: ResponseSchema) -> Result<Self, ValidationError> {
        if schema.serial_cell >= schema.leading_cells {
            return Err(ValidationError::InvalidConfig {
                key: "serial_cell",
                message: format!(
                    "cell {} is not one of the {} leading cells",
                    schema.serial_cell, schema.leading_cells
                ),
            });
        }

        Ok(Self {
            table: compile("table_selector", schema.table_selector)?,
            row: compile("row_selector", schema.row_selector)?,
            cell: compile("cell_selector", schema.cell_selector)?,
            schema,
        })
    }

    /// Parses a full response body for the bond with `serial`.
    ///
    /// A row echoing any other serial number is rejected rather than
    /// attributed to this bond.
    pub fn parse(&self, body: &str, serial: &SerialNumber) -> Result<BondValuation, ValuationError> {
        let document = Html::parse_document(body);

        let table = document.select(&self.table).next().ok_or_else(|| {
            ValuationError::unexpected_format(format!(
                "results table '{}' not found",
                self.schema.table_selector
            ))
        })?;

        let row = table.select(&self.row).next().ok_or_else(|| {
            ValuationError::unexpected_format(format!(
                "valuation row '{}' not found in results table",
                self.schema.row_selector
            ))
        })?;

        let cells = row.select(&self.cell).map(cell_text).collect::<Vec<_>>();
        if cells.len() < self.schema.min_cells() {
            return Err(ValuationError::unexpected_format(format!(
                "valuation row has {} cells, expected at least {}",
                cells.len(),
                self.schema.min_cells()
            )));
        }

        let echoed = cells[self.schema.serial_cell].as_str();
        if !echoed.eq_ignore_ascii_case(serial.as_str()) {
            return Err(ValuationError::unexpected_format(format!(
                "valuation row is for serial '{echoed}', requested '{serial}'"
            )));
        }

        let start = self.schema.leading_cells;
        parse_cells(&cells[start..start + VALUATION_CELL_COUNT])
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new(ResponseSchema::TREASURY).expect("built-in response schema selectors are valid")
    }
}

/// Converts the eight valuation cells, in calculator order, into a record.
pub fn parse_cells<S: AsRef<str>>(cells: &[S]) -> Result<BondValuation, ValuationError> {
    let [denomination, issue_date, next_accrual, final_maturity, issue_price, gain, rate, value] =
        cells
    else {
        return Err(ValuationError::unexpected_format(format!(
            "expected {VALUATION_CELL_COUNT} valuation cells, found {}",
            cells.len()
        )));
    };

    Ok(BondValuation {
        denomination: parse_face_value(denomination.as_ref())?,
        issue_date: IssueMonth::parse(issue_date.as_ref())
            .map_err(|_| ValuationError::field_parse("issue_date", issue_date.as_ref()))?,
        next_accrual_date: next_accrual.as_ref().trim().to_owned(),
        final_maturity_date: final_maturity.as_ref().trim().to_owned(),
        issue_price: parse_money("issue_price", issue_price.as_ref())?,
        gain_amount: gain.as_ref().trim().to_owned(),
        interest_rate: parse_percent("interest_rate", rate.as_ref())?,
        current_value: parse_money("current_value", value.as_ref())?,
    })
}

fn compile(key: &'static str, selector: &str) -> Result<Selector, ValidationError> {
    Selector::parse(selector).map_err(|error| ValidationError::InvalidConfig {
        key,
        message: format!("'{selector}': {error}"),
    })
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_owned()
}

fn strip_currency(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .trim()
        .replace(',', "")
}

fn parse_face_value(raw: &str) -> Result<u32, ValuationError> {
    strip_currency(raw)
        .parse::<u32>()
        .map_err(|_| ValuationError::field_parse("denomination", raw))
}

fn parse_money(field: &'static str, raw: &str) -> Result<Decimal, ValuationError> {
    Decimal::from_str(&strip_currency(raw)).map_err(|_| ValuationError::field_parse(field, raw))
}

fn parse_percent(field: &'static str, raw: &str) -> Result<Decimal, ValuationError> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    let percent = Decimal::from_str(number).map_err(|_| ValuationError::field_parse(field, raw))?;
    Ok(percent / Decimal::ONE_HUNDRED)
}
