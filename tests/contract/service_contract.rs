//! Contract tests for the redemption calculator
//!
//! The request side pins the form the calculator expects; the response side
//! pins which cells of the results table become which valuation fields.

#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;

use bondval_core::{
    BondDescriptor, BondSeries, BondValuator, ResponseParser, ResponseSchema, SerialNumber,
    ValuationErrorKind, ValuationRequest, DEFAULT_ENDPOINT,
};
use rust_decimal_macros::dec;
use support::{client, form_fields, FakeCalculator, Script};

const RECORDED_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Savings Bond Calculator</title></head>
<body>
<form method="post" action="/BC/SBCPrice">
<table class="bnddata">
  <tr>
    <th>Serial No.</th><th>Series</th><th>Denom</th><th>Issue Date</th>
    <th>Next Accrual</th><th>Final Maturity</th><th>Issue Price</th>
    <th>Interest</th><th>Interest Rate</th><th>Value</th><th>Note</th>
  </tr>
  <tr class="altrow1">
    <td>L123456789EE</td><td>EE</td><td>$1,000</td><td>01/2010</td>
    <td>07/2024</td><td>01/2040</td><td>$500.00</td><td>$241.20</td>
    <td>2.30%</td><td>$741.20</td><td>&nbsp;</td>
  </tr>
  <tr class="altrow2">
    <td>L999EE</td><td>EE</td><td>$50</td><td>02/2011</td>
    <td>08/2024</td><td>02/2041</td><td>$25.00</td><td>$1.00</td>
    <td>0.10%</td><td>$26.00</td><td>&nbsp;</td>
  </tr>
</table>
</form>
</body>
</html>"#;

// =============================================================================
// Request contract
// =============================================================================

#[test]
fn contract_request_posts_form_fields_to_the_calculator() {
    let request = ValuationRequest::from_descriptor(
        &BondDescriptor::new(" $1,000 ", "01/2010", "l123456789ee"),
        BondSeries::Ee,
    )
    .expect("descriptor should validate");

    let http = request.to_http(DEFAULT_ENDPOINT, 2_500);
    assert_eq!(http.url, DEFAULT_ENDPOINT);
    assert_eq!(http.timeout_ms, 2_500);
    assert_eq!(
        http.headers.get("content-type").map(String::as_str),
        Some("application/x-www-form-urlencoded")
    );

    let form = form_fields(http.body.as_deref().unwrap_or_default());
    assert_eq!(form.get("Series").map(String::as_str), Some("EE"));
    assert_eq!(form.get("btnAdd.x").map(String::as_str), Some("CALCULATE"));
    assert_eq!(form.get("IssueDate").map(String::as_str), Some("01/2010"));
    assert_eq!(form.get("Denomination").map(String::as_str), Some("1000"));
    assert_eq!(form.get("SerialNumber").map(String::as_str), Some("L123456789EE"));
    assert_eq!(form.len(), 5);
}

#[tokio::test]
async fn contract_client_submits_configured_series_and_endpoint() {
    let calculator = Arc::new(FakeCalculator::new());
    let client = client(calculator.clone(), 0)
        .with_series(BondSeries::I)
        .with_endpoint("http://calculator.test/price");

    client
        .valuate(&BondDescriptor::new("100", "05/2003", "I42"))
        .await
        .expect("fake calculator answers");

    let requests = calculator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "http://calculator.test/price");
    let form = form_fields(requests[0].body.as_deref().unwrap_or_default());
    assert_eq!(form.get("Series").map(String::as_str), Some("I"));
}

// =============================================================================
// Response contract
// =============================================================================

#[test]
fn contract_response_maps_first_valuation_row_cells_to_fields() {
    let serial = SerialNumber::parse("L123456789EE").expect("valid serial");
    let valuation = ResponseParser::default()
        .parse(RECORDED_PAGE, &serial)
        .expect("recorded page parses");

    assert_eq!(valuation.denomination, 1_000);
    assert_eq!(valuation.issue_date.to_string(), "01/2010");
    assert_eq!(valuation.next_accrual_date, "07/2024");
    assert_eq!(valuation.final_maturity_date, "01/2040");
    assert_eq!(valuation.issue_price, dec!(500.00));
    assert_eq!(valuation.gain_amount, "$241.20");
    assert_eq!(valuation.interest_rate, dec!(0.023));
    assert_eq!(valuation.current_value, dec!(741.20));
}

#[test]
fn contract_response_schema_matches_the_calculator_layout() {
    let schema = ResponseSchema::TREASURY;
    assert_eq!(schema.table_selector, "table.bnddata");
    assert_eq!(schema.row_selector, "tr.altrow1");
    assert_eq!(schema.leading_cells, 2);
    assert_eq!(schema.serial_cell, 0);
    assert_eq!(schema.min_cells(), 10);
}

#[tokio::test]
async fn contract_response_without_results_table_is_an_unexpected_format() {
    let calculator = Arc::new(FakeCalculator::new().script(
        "C1",
        Script {
            body: Some("<html><body><p>The calculator is down for maintenance.</p></body></html>".into()),
            ..Script::default()
        },
    ));

    let error = client(calculator.clone(), 3)
        .valuate(&BondDescriptor::new("50", "01/2010", "C1"))
        .await
        .expect_err("maintenance page has no results");

    assert_eq!(error.kind(), ValuationErrorKind::UnexpectedResponseFormat);
    assert_eq!(calculator.calls(), 1, "format errors are not retried");
}

#[tokio::test]
async fn contract_response_for_a_different_serial_is_never_attributed_to_the_request() {
    let calculator = Arc::new(FakeCalculator::new().script(
        "C1",
        Script {
            body: Some(support::results_page("50", "01/2010", "Z999999999EE")),
            ..Script::default()
        },
    ));

    let error = client(calculator.clone(), 2)
        .valuate(&BondDescriptor::new("$1,000", "06/2001", "C1"))
        .await
        .expect_err("the row belongs to another bond");

    assert_eq!(error.kind(), ValuationErrorKind::UnexpectedResponseFormat);
    assert!(error.to_string().contains("Z999999999EE"), "{error}");
    assert_eq!(calculator.calls(), 1, "a mismatched row is not retried");
}
