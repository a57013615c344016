//! Shared fakes for the integration tests: an in-process stand-in for the
//! redemption calculator that answers from the submitted form fields.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bondval_core::{
    BondDescriptor, DispatchConfig, HttpClient, HttpError, HttpRequest, HttpResponse,
    RetryConfig, ValuationClient,
};

/// How the fake calculator treats one serial number.
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Transport failures served before the first real answer.
    pub transport_failures: usize,
    /// Status served instead of a page, on every attempt.
    pub status: Option<u16>,
    /// Replaces the results page on every attempt.
    pub body: Option<String>,
    /// Latency before answering.
    pub delay: Duration,
}

/// Fake calculator keyed by serial number. Unscripted serials get a valid page.
#[derive(Default)]
pub struct FakeCalculator {
    scripts: HashMap<String, Script>,
    attempts: Mutex<HashMap<String, usize>>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
}

impl FakeCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, serial: &str, script: Script) -> Self {
        self.scripts.insert(serial.to_owned(), script);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn attempts_for(&self, serial: &str) -> usize {
        self.attempts
            .lock()
            .expect("attempts lock")
            .get(serial)
            .copied()
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    fn answer(&self, request: HttpRequest) -> (Duration, Result<HttpResponse, HttpError>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let form = form_fields(request.body.as_deref().unwrap_or_default());
        self.requests.lock().expect("requests lock").push(request);

        let serial = form.get("SerialNumber").cloned().unwrap_or_default();
        let attempt = {
            let mut attempts = self.attempts.lock().expect("attempts lock");
            let count = attempts.entry(serial.clone()).or_default();
            *count += 1;
            *count
        };

        let script = self.scripts.get(&serial).cloned().unwrap_or_default();
        if attempt <= script.transport_failures {
            return (script.delay, Err(HttpError::connect("connection reset by peer")));
        }
        if let Some(status) = script.status {
            return (script.delay, Ok(HttpResponse::new(status, "Service Unavailable")));
        }

        let body = script.body.unwrap_or_else(|| {
            results_page(
                form.get("Denomination").map(String::as_str).unwrap_or("50"),
                form.get("IssueDate").map(String::as_str).unwrap_or("01/2000"),
                &serial,
            )
        });
        (script.delay, Ok(HttpResponse::ok_html(body)))
    }
}

impl HttpClient for FakeCalculator {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>,
    > {
        Box::pin(async move {
            let (delay, response) = self.answer(request);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            response
        })
    }
}

/// Decodes an `application/x-www-form-urlencoded` body.
pub fn form_fields(body: &str) -> HashMap<String, String> {
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| {
            (
                urlencoding::decode(name).expect("utf-8 name").into_owned(),
                urlencoding::decode(value).expect("utf-8 value").into_owned(),
            )
        })
        .collect()
}

/// Results page in the calculator's layout: two leading cells, then the
/// eight valuation cells. Current value is twice the issue price.
pub fn results_page(denomination: &str, issue_date: &str, serial: &str) -> String {
    let face: u32 = denomination.parse().unwrap_or(50);
    let issue_price = f64::from(face) / 2.0;
    format!(
        r#"<html><body>
<table class="bnddata">
  <tr><th>Serial</th><th>Series</th><th>Denom</th><th>Issue Date</th><th>Next Accrual</th>
      <th>Final Maturity</th><th>Issue Price</th><th>Interest</th><th>Rate</th><th>Value</th></tr>
  <tr class="altrow1">
    <td>{serial}</td><td>EE</td><td>${face}</td><td>{issue_date}</td><td>07/2024</td>
    <td>01/2040</td><td>${issue_price:.2}</td><td>${issue_price:.2}</td><td>2.30%</td>
    <td>${current:.2}</td>
  </tr>
</table>
</body></html>"#,
        current = issue_price * 2.0,
    )
}

/// Client over the fake calculator that retries immediately.
pub fn client(calculator: Arc<FakeCalculator>, max_retries: u32) -> ValuationClient {
    ValuationClient::with_http_client(calculator)
        .with_retry(RetryConfig::fixed(Duration::ZERO, max_retries))
}

pub fn unbounded() -> DispatchConfig {
    DispatchConfig::default()
}

/// `count` valid EE descriptors with serials `C0..`, issued in descending months.
pub fn portfolio(count: usize) -> Vec<BondDescriptor> {
    (0..count)
        .map(|i| {
            let month = 12 - (i % 12);
            let year = 2010 - (i / 12);
            BondDescriptor::new("100", format!("{month:02}/{year}"), format!("C{i}"))
        })
        .collect()
}
