//! Scan orchestration
//!
//! Runs every registered check against one document snapshot and returns a
//! finalized result. The orchestrator is a pure function of a snapshot: no
//! timers, no polling. Re-scan scheduling (and debouncing) belongs to the
//! caller that owns the document lifecycle, e.g. the watch layer.

pub mod dedup;
pub mod fetch;
pub mod watch;

pub use fetch::{HttpFetcher, PageFetcher};
pub use watch::{DocumentWatcher, WatcherHandle};

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::time::{timeout, Duration};
use tracing::{info, warn};

use crate::checks::{build_checks, Check};
use crate::config::ScanConfig;
use crate::document::Document;
use crate::error::ScanError;
use crate::models::{Issue, ScanResult};

pub struct Scanner {
    checks: Vec<Box<dyn Check>>,
    config: ScanConfig,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        let checks = build_checks(&config);
        Self { checks, config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Run all registered checks against one parsed snapshot.
    pub fn scan(&self, doc: &Document, url: &str) -> ScanResult {
        let started = Instant::now();
        let mut issues: Vec<Issue> = Vec::new();

        for check in &self.checks {
            let found = check.run(doc, url);
            issues.extend(found);
        }

        if self.config.dedup_enabled {
            issues = dedup::consolidate(issues);
        }

        let duration = started.elapsed().as_secs_f64();
        info!(url, issues = issues.len(), duration, "scan complete");
        ScanResult::completed(
            url.to_string(),
            issues,
            doc.title().unwrap_or_default(),
            duration,
        )
    }

    /// Parse and scan an HTML string.
    pub fn scan_html(&self, html: &str, url: &str) -> ScanResult {
        let doc = Document::parse(html);
        self.scan(&doc, url)
    }

    /// Scan a local HTML file.
    pub fn scan_file(&self, path: &Path) -> Result<ScanResult, ScanError> {
        let html = std::fs::read_to_string(path)?;
        Ok(self.scan_html(&html, &path.display().to_string()))
    }

    /// Fetch one URL and scan it. Fetch problems come back as a failed
    /// result, not an error: in a batch, one bad URL must not look
    /// different from the caller's perspective than any other entry.
    pub async fn scan_url(&self, fetcher: &dyn PageFetcher, url: &str) -> ScanResult {
        let deadline = Duration::from_secs(self.config.timeout_secs);
        match timeout(deadline, fetcher.fetch(url)).await {
            Err(_) => {
                let reason = ScanError::Timeout {
                    url: url.to_string(),
                    secs: self.config.timeout_secs,
                }
                .to_string();
                warn!(url, "fetch timed out");
                ScanResult::failed(url.to_string(), reason)
            }
            Ok(Err(e)) => {
                warn!(url, error = %e, "fetch failed");
                ScanResult::failed(url.to_string(), e.to_string())
            }
            Ok(Ok(html)) => self.scan_html(&html, url),
        }
    }

    /// Scan many URLs concurrently, bounded by `max_concurrency`.
    ///
    /// Results come back in the caller's input order. A failure in one
    /// URL's pipeline (timeout, network error) is captured in that URL's
    /// entry and never cancels or corrupts the others.
    pub async fn scan_urls(
        self: Arc<Self>,
        fetcher: Arc<dyn PageFetcher>,
        urls: Vec<String>,
    ) -> Vec<ScanResult> {
        info!(count = urls.len(), "starting batch scan");
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));

        let mut handles = Vec::with_capacity(urls.len());
        for url in urls.iter().cloned() {
            let scanner = Arc::clone(&self);
            let fetcher = Arc::clone(&fetcher);
            let semaphore = Arc::clone(&semaphore);
            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return ScanResult::failed(url, "scanner shut down".to_string());
                    }
                };
                scanner.scan_url(fetcher.as_ref(), &url).await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (url, handle) in urls.into_iter().zip(handles) {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(url = %url, error = %e, "scan task panicked");
                    results.push(ScanResult::failed(url, format!("scan task failed: {}", e)));
                }
            }
        }
        info!(count = results.len(), "batch scan complete");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IssueType;

    const MESSY_PAGE: &str = r#"<html><head><title>Messy</title></head><body>
        <div>
        <img src="logo.png">
        <h1>Title</h1>
        <h3>Jumped</h3>
        <a href="/a">click here</a>
        <a href="/b">click here</a>
        <input type="text" name="q">
        </div>
        </body></html>"#;

    #[test]
    fn test_scan_aggregates_across_checks() {
        let scanner = Scanner::new(ScanConfig::default());
        let result = scanner.scan_html(MESSY_PAGE, "https://example.com");
        assert_eq!(result.page_title, "Messy");
        let types: Vec<IssueType> = result.issues.iter().map(|i| i.issue_type).collect();
        assert!(types.contains(&IssueType::MissingAltText));
        assert!(types.contains(&IssueType::ImproperHeadingHierarchy));
        assert!(types.contains(&IssueType::NonDescriptiveLink));
        assert!(types.contains(&IssueType::MissingFormLabel));
        assert!(types.contains(&IssueType::MissingLandmark));
    }

    #[test]
    fn test_dedup_collapses_repeated_vague_links() {
        let scanner = Scanner::new(ScanConfig::default());
        let result = scanner.scan_html(MESSY_PAGE, "https://example.com");
        let links = result.issues_by_type(IssueType::NonDescriptiveLink);
        assert_eq!(links.len(), 1);
        assert!(links[0].description.contains("2 occurrences"));
    }

    #[test]
    fn test_dedup_can_be_disabled() {
        let config = ScanConfig {
            dedup_enabled: false,
            ..ScanConfig::default()
        };
        let scanner = Scanner::new(config);
        let result = scanner.scan_html(MESSY_PAGE, "https://example.com");
        assert_eq!(result.issues_by_type(IssueType::NonDescriptiveLink).len(), 2);
    }

    #[test]
    fn test_fixable_issues_agree_with_fix_engine() {
        let scanner = Scanner::new(ScanConfig::default());
        let result = scanner.scan_html(MESSY_PAGE, "https://example.com");
        for issue in &result.issues {
            if issue.fixable {
                assert!(
                    crate::fix_engine::FixEngine::supports(issue.issue_type),
                    "{:?} marked fixable but engine has no remediation",
                    issue.issue_type
                );
            }
        }
    }

    #[test]
    fn test_clean_page_yields_no_issues() {
        let scanner = Scanner::new(ScanConfig::default());
        let html = r#"<html><head><title>Clean</title></head><body>
            <header><nav><a href="/about">About this project</a></nav></header>
            <main>
            <h1>Welcome</h1>
            <h2>Details</h2>
            <img src="logo.png" alt="Project logo, a stylized compass">
            <form><label for="q">Search</label><input type="text" id="q"></form>
            </main>
            <footer><p>All rights reserved</p></footer>
            </body></html>"#;
        let result = scanner.scan_html(html, "https://example.com");
        assert_eq!(result.issues.len(), 0, "{:?}", result.issues);
    }

    #[test]
    fn test_scan_of_same_snapshot_is_deterministic() {
        let scanner = Scanner::new(ScanConfig::default());
        let a = scanner.scan_html(MESSY_PAGE, "https://example.com");
        let b = scanner.scan_html(MESSY_PAGE, "https://example.com");
        let types_a: Vec<IssueType> = a.issues.iter().map(|i| i.issue_type).collect();
        let types_b: Vec<IssueType> = b.issues.iter().map(|i| i.issue_type).collect();
        assert_eq!(types_a, types_b);
    }
}
