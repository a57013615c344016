//! Behavior-driven tests for error handling
//!
//! A bad row, a broken page or an unreachable calculator must only ever cost
//! the bond it belongs to. These tests check that failures stay isolated and
//! arrive classified.

#[path = "support/mod.rs"]
mod support;

use std::sync::Arc;

use bondval_core::{
    valuate_with, BondDescriptor, BondValuator, ValidationError, ValuationError,
    ValuationErrorKind, ValuationFuture,
};
use support::{client, results_page, unbounded, FakeCalculator, Script};

// =============================================================================
// Isolation
// =============================================================================

#[tokio::test]
async fn when_bonds_fail_in_different_ways_system_keeps_the_others_valued() {
    // Given: A portfolio mixing healthy bonds with every kind of per-bond failure
    let bonds = vec![
        BondDescriptor::new("50", "01/2010", "C0"),
        BondDescriptor::new("50", "2010-01", "C1"),
        BondDescriptor::new("50", "02/2010", "C2"),
        BondDescriptor::new("50", "03/2010", "C3"),
        BondDescriptor::new("50", "04/2010", "C4"),
        BondDescriptor::new("50", "05/2010", "C5"),
    ];
    let calculator = Arc::new(
        FakeCalculator::new()
            .script("C2", Script { status: Some(503), ..Script::default() })
            .script(
                "C3",
                Script {
                    body: Some(results_page("50", "03/2010", "C3").replace("$50.00", "n/a")),
                    ..Script::default()
                },
            )
            .script(
                "C4",
                Script {
                    body: Some("<html><body>Session expired</body></html>".into()),
                    ..Script::default()
                },
            ),
    );

    // When: The portfolio is valued with a retry budget of two
    let report = valuate_with(Arc::new(client(calculator.clone(), 2)), &bonds, unbounded()).await;

    // Then: Healthy bonds are valued and each failure carries its own cause
    let valued = report
        .valuations
        .iter()
        .map(|v| v.issue_date.to_string())
        .collect::<Vec<_>>();
    assert_eq!(valued, vec!["01/2010", "05/2010"]);

    let causes = report
        .failures
        .iter()
        .map(|f| (f.index, f.cause))
        .collect::<Vec<_>>();
    assert_eq!(
        causes,
        vec![
            (1, ValuationErrorKind::InvalidDescriptor),
            (2, ValuationErrorKind::Service),
            (3, ValuationErrorKind::FieldParse),
            (4, ValuationErrorKind::UnexpectedResponseFormat),
        ]
    );

    // And: Only the service failure was retried, the invalid row never left the process
    assert_eq!(calculator.attempts_for("C1"), 0);
    assert_eq!(calculator.attempts_for("C2"), 3);
    assert_eq!(calculator.attempts_for("C3"), 1);
    assert_eq!(calculator.attempts_for("C4"), 1);
}

#[tokio::test]
async fn when_a_failure_is_reported_user_sees_the_offending_descriptor_and_reason() {
    // Given: A bond with a face value the series never issued
    let bonds = vec![BondDescriptor::new("$30", "01/2010", "C9")];
    let calculator = Arc::new(FakeCalculator::new());

    // When: It is valued
    let report = valuate_with(Arc::new(client(calculator, 0)), &bonds, unbounded()).await;

    // Then: The failure names the raw input and the accepted denominations
    let failure = &report.failures[0];
    assert_eq!(failure.descriptor, bonds[0]);
    assert_eq!(failure.cause.code(), "valuation.invalid_descriptor");
    assert!(failure.detail.contains("denomination 30"), "{}", failure.detail);
    assert!(failure.detail.contains("10000"), "{}", failure.detail);
}

#[tokio::test]
async fn when_calculator_is_unreachable_system_gives_up_after_the_retry_budget() {
    // Given: A calculator that drops every connection for one bond
    let calculator = Arc::new(FakeCalculator::new().script(
        "C1",
        Script {
            transport_failures: usize::MAX,
            ..Script::default()
        },
    ));

    // When: The bond is valued with one retry
    let error = client(calculator.clone(), 1)
        .valuate(&BondDescriptor::new("100", "01/2001", "C1"))
        .await
        .expect_err("calculator never answers");

    // Then: A transport error after exactly two attempts
    assert_eq!(error.kind(), ValuationErrorKind::Transport);
    assert!(error.retryable());
    assert_eq!(calculator.attempts_for("C1"), 2);
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn when_descriptor_fields_are_malformed_user_gets_a_specific_validation_error() {
    let calculator = Arc::new(FakeCalculator::new());
    let client = client(calculator.clone(), 2);

    let cases = [
        (BondDescriptor::new("", "01/2010", "C1"), ValidationError::EmptyDenomination),
        (
            BondDescriptor::new("50", "13/2010", "C1"),
            ValidationError::InvalidIssueDate { value: "13/2010".into() },
        ),
        (BondDescriptor::new("50", "01/2010", "  "), ValidationError::EmptySerialNumber),
        (
            BondDescriptor::new("50", "01/2010", "C-1"),
            ValidationError::SerialNumberInvalidChar { ch: '-', index: 1 },
        ),
    ];

    for (descriptor, expected) in cases {
        let error = client
            .valuate(&descriptor)
            .await
            .expect_err("malformed descriptor must be rejected");
        assert_eq!(error, ValuationError::InvalidDescriptor(expected));
    }
    assert_eq!(calculator.calls(), 0);
}

// =============================================================================
// Worker failures
// =============================================================================

struct PanickingValuator;

impl BondValuator for PanickingValuator {
    fn valuate<'a>(&'a self, descriptor: &'a BondDescriptor) -> ValuationFuture<'a> {
        Box::pin(async move {
            if descriptor.serial_number == "BOOM" {
                panic!("valuator bug");
            }
            Err(ValuationError::Service { status: 500 })
        })
    }
}

#[tokio::test]
async fn when_a_worker_panics_system_reports_an_internal_failure_for_that_bond_only() {
    // Given: A valuator that panics on one bond
    let bonds = vec![
        BondDescriptor::new("50", "01/2010", "OK1"),
        BondDescriptor::new("50", "01/2010", "BOOM"),
        BondDescriptor::new("50", "01/2010", "OK2"),
    ];

    // When: The batch is dispatched
    let report = valuate_with(Arc::new(PanickingValuator), &bonds, unbounded()).await;

    // Then: The panicking bond is an internal failure and the rest are unaffected
    let causes = report
        .failures
        .iter()
        .map(|f| (f.index, f.cause))
        .collect::<Vec<_>>();
    assert_eq!(
        causes,
        vec![
            (0, ValuationErrorKind::Service),
            (1, ValuationErrorKind::Internal),
            (2, ValuationErrorKind::Service),
        ]
    );
}
