use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::issue::{Issue, IssueType, Severity};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "failed")]
    Failed,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Completed => "completed",
            ScanStatus::Failed => "failed",
        }
    }
}

/// The outcome of one scan over one document snapshot.
///
/// Immutable once produced; a re-scan builds a fresh result rather than
/// mutating an old one. A failed fetch pipeline is also represented here,
/// with `status = Failed` and `error_message` set, so batch callers can
/// report failures distinctly from "zero issues found".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanResult {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub issues: Vec<Issue>,
    pub page_title: String,
    pub status: ScanStatus,
    pub error_message: Option<String>,
    /// Wall-clock duration of the scan in seconds
    pub scan_duration: f64,
}

impl ScanResult {
    pub fn completed(url: String, issues: Vec<Issue>, page_title: String, duration: f64) -> Self {
        Self {
            url,
            timestamp: Utc::now(),
            issues,
            page_title,
            status: ScanStatus::Completed,
            error_message: None,
            scan_duration: duration,
        }
    }

    pub fn failed(url: String, reason: String) -> Self {
        Self {
            url,
            timestamp: Utc::now(),
            issues: Vec::new(),
            page_title: String::new(),
            status: ScanStatus::Failed,
            error_message: Some(reason),
            scan_duration: 0.0,
        }
    }

    pub fn total_issues(&self) -> usize {
        self.issues.len()
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    pub fn issues_by_type(&self, issue_type: IssueType) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.issue_type == issue_type)
            .collect()
    }

    /// Weighted accessibility score in the range 0–100 (higher is better).
    ///
    /// Critical issues weigh 3, moderate 2, low 1, normalized against the
    /// worst case where every issue were critical.
    pub fn accessibility_score(&self) -> f64 {
        if self.issues.is_empty() {
            return 100.0;
        }
        let critical = self.count_by_severity(Severity::Critical) as f64;
        let moderate = self.count_by_severity(Severity::Moderate) as f64;
        let low = self.count_by_severity(Severity::Low) as f64;

        let weighted = critical * 3.0 + moderate * 2.0 + low;
        let max_weight = self.issues.len() as f64 * 3.0;
        let score = (100.0 - (weighted / max_weight) * 100.0).max(0.0);
        (score * 10.0).round() / 10.0
    }
}

impl std::fmt::Display for ScanResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            ScanStatus::Completed => write!(
                f,
                "{} - {} issues (score: {})",
                self.url,
                self.total_issues(),
                self.accessibility_score()
            ),
            ScanStatus::Failed => write!(
                f,
                "{} - failed: {}",
                self.url,
                self.error_message.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

/// Aggregate over a batch of scan results, in caller order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanSummary {
    pub total_urls_scanned: usize,
    pub successful_scans: usize,
    pub failed_scans: usize,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub moderate_issues: usize,
    pub low_issues: usize,
    pub average_accessibility_score: f64,
    pub scan_duration: f64,
}

impl ScanSummary {
    pub fn from_results(results: &[ScanResult]) -> Self {
        let successful: Vec<&ScanResult> = results
            .iter()
            .filter(|r| r.status == ScanStatus::Completed)
            .collect();
        let failed = results.len() - successful.len();

        let total_issues = successful.iter().map(|r| r.total_issues()).sum();
        let critical_issues = successful
            .iter()
            .map(|r| r.count_by_severity(Severity::Critical))
            .sum();
        let moderate_issues = successful
            .iter()
            .map(|r| r.count_by_severity(Severity::Moderate))
            .sum();
        let low_issues = successful
            .iter()
            .map(|r| r.count_by_severity(Severity::Low))
            .sum();

        let average_accessibility_score = if successful.is_empty() {
            0.0
        } else {
            let sum: f64 = successful.iter().map(|r| r.accessibility_score()).sum();
            ((sum / successful.len() as f64) * 10.0).round() / 10.0
        };

        Self {
            total_urls_scanned: results.len(),
            successful_scans: successful.len(),
            failed_scans: failed,
            total_issues,
            critical_issues,
            moderate_issues,
            low_issues,
            average_accessibility_score,
            scan_duration: results.iter().map(|r| r.scan_duration).sum(),
        }
    }
}
