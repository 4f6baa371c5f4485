//! Batch orchestration tests: ordering, per-URL isolation, timeouts and
//! the concurrency cap, exercised through a stub fetcher.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use a11yscan::scanner::fetch::FetchResult;
use a11yscan::{IssueType, PageFetcher, ScanConfig, ScanError, ScanStatus, Scanner};

#[derive(Clone)]
enum Stub {
    Html(&'static str),
    Hang,
    Error(&'static str),
}

struct StubFetcher {
    pages: HashMap<&'static str, Stub>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubFetcher {
    fn new(pages: HashMap<&'static str, Stub>) -> Self {
        Self {
            pages,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn peak_concurrency(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl PageFetcher for StubFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = FetchResult> + Send + 'a>> {
        Box::pin(async move {
            let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(current, Ordering::SeqCst);
            // let parallel pipelines overlap so the peak is observable
            tokio::time::sleep(Duration::from_millis(50)).await;

            let result = match self.pages.get(url) {
                Some(Stub::Html(html)) => Ok(html.to_string()),
                Some(Stub::Hang) => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(String::new())
                }
                Some(Stub::Error(reason)) => Err(ScanError::Fetch {
                    url: url.to_string(),
                    reason: reason.to_string(),
                }),
                None => Err(ScanError::Fetch {
                    url: url.to_string(),
                    reason: "no stub".to_string(),
                }),
            };
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        })
    }
}

const TWO_ISSUE_PAGE: &str = r#"<html><head><title>A</title></head><body><main>
    <h1>T</h1>
    <img src="one.png">
    <img src="two.png">
    </main></body></html>"#;

const CLEAN_PAGE: &str = r#"<html><head><title>C</title></head><body><main>
    <h1>T</h1><p>fine</p>
    </main></body></html>"#;

fn scanner_with(timeout_secs: u64, max_concurrency: usize) -> Arc<Scanner> {
    Arc::new(Scanner::new(ScanConfig {
        timeout_secs,
        max_concurrency,
        ..ScanConfig::default()
    }))
}

#[tokio::test]
async fn test_success_and_timeout_in_input_order() {
    let fetcher = Arc::new(StubFetcher::new(HashMap::from([
        ("https://a.example", Stub::Html(TWO_ISSUE_PAGE)),
        ("https://b.example", Stub::Hang),
    ])));

    let results = scanner_with(1, 3)
        .scan_urls(
            fetcher,
            vec![
                "https://a.example".to_string(),
                "https://b.example".to_string(),
            ],
        )
        .await;

    assert_eq!(results.len(), 2);
    // input order preserved
    assert_eq!(results[0].url, "https://a.example");
    assert_eq!(results[1].url, "https://b.example");

    assert_eq!(results[0].status, ScanStatus::Completed);
    assert_eq!(
        results[0].issues_by_type(IssueType::MissingAltText).len(),
        2
    );

    assert_eq!(results[1].status, ScanStatus::Failed);
    let reason = results[1].error_message.as_deref().unwrap();
    assert!(reason.contains("timed out"), "reason was: {}", reason);
}

#[tokio::test]
async fn test_one_failure_does_not_poison_siblings() {
    let fetcher = Arc::new(StubFetcher::new(HashMap::from([
        ("https://a.example", Stub::Html(CLEAN_PAGE)),
        ("https://b.example", Stub::Error("connection refused")),
        ("https://c.example", Stub::Html(TWO_ISSUE_PAGE)),
    ])));

    let results = scanner_with(5, 2)
        .scan_urls(
            fetcher,
            vec![
                "https://a.example".to_string(),
                "https://b.example".to_string(),
                "https://c.example".to_string(),
            ],
        )
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].status, ScanStatus::Completed);
    assert_eq!(results[0].total_issues(), 0);
    assert_eq!(results[1].status, ScanStatus::Failed);
    assert!(results[1]
        .error_message
        .as_deref()
        .unwrap()
        .contains("connection refused"));
    assert_eq!(results[2].status, ScanStatus::Completed);
    assert_eq!(results[2].total_issues(), 2);
}

#[tokio::test]
async fn test_concurrency_cap_respected() {
    let pages: HashMap<&'static str, Stub> = [
        ("https://u1.example", Stub::Html(CLEAN_PAGE)),
        ("https://u2.example", Stub::Html(CLEAN_PAGE)),
        ("https://u3.example", Stub::Html(CLEAN_PAGE)),
        ("https://u4.example", Stub::Html(CLEAN_PAGE)),
        ("https://u5.example", Stub::Html(CLEAN_PAGE)),
        ("https://u6.example", Stub::Html(CLEAN_PAGE)),
    ]
    .into();
    let fetcher = Arc::new(StubFetcher::new(pages));
    let urls: Vec<String> = (1..=6).map(|i| format!("https://u{}.example", i)).collect();

    let results = scanner_with(5, 2)
        .scan_urls(Arc::clone(&fetcher) as Arc<dyn PageFetcher>, urls)
        .await;

    assert_eq!(results.len(), 6);
    assert!(results.iter().all(|r| r.status == ScanStatus::Completed));
    assert!(
        fetcher.peak_concurrency() <= 2,
        "peak concurrency {} exceeded the cap",
        fetcher.peak_concurrency()
    );
}

#[tokio::test]
async fn test_empty_batch() {
    let fetcher = Arc::new(StubFetcher::new(HashMap::new()));
    let results = scanner_with(5, 3).scan_urls(fetcher, Vec::new()).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_failed_entry_is_distinct_from_zero_issues() {
    let fetcher = Arc::new(StubFetcher::new(HashMap::from([
        ("https://clean.example", Stub::Html(CLEAN_PAGE)),
        ("https://down.example", Stub::Error("HTTP 503")),
    ])));

    let results = scanner_with(5, 2)
        .scan_urls(
            fetcher,
            vec![
                "https://clean.example".to_string(),
                "https://down.example".to_string(),
            ],
        )
        .await;

    let clean = &results[0];
    let down = &results[1];
    assert_eq!(clean.status, ScanStatus::Completed);
    assert!(clean.error_message.is_none());
    assert_eq!(down.status, ScanStatus::Failed);
    assert!(down.error_message.is_some());
    // both have zero issues; only the status field tells them apart
    assert_eq!(clean.total_issues(), down.total_issues());
}
