//! Report rendering
//!
//! Serializes batch scan results into the formats the CLI exposes. The
//! JSON form is the machine interface (everything the models carry, plus
//! computed summaries); csv/text/html are presentation conveniences over
//! the same data.

use std::path::Path;

use serde_json::json;

use crate::error::ScanError;
use crate::models::{AppliedFix, ScanResult, ScanStatus, ScanSummary, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Json,
    Csv,
    Text,
    Html,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Text => "text",
            ReportFormat::Html => "html",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "text" | "txt" => Some(ReportFormat::Text),
            "html" => Some(ReportFormat::Html),
            _ => None,
        }
    }
}

pub struct ReportGenerator;

impl ReportGenerator {
    pub fn render(
        results: &[ScanResult],
        applied_fixes: &[AppliedFix],
        format: ReportFormat,
    ) -> String {
        match format {
            ReportFormat::Json => Self::render_json(results, applied_fixes),
            ReportFormat::Csv => Self::render_csv(results),
            ReportFormat::Text => Self::render_text(results),
            ReportFormat::Html => Self::render_html(results),
        }
    }

    pub fn write_to_file(
        results: &[ScanResult],
        applied_fixes: &[AppliedFix],
        format: ReportFormat,
        path: &Path,
    ) -> Result<(), ScanError> {
        let rendered = Self::render(results, applied_fixes, format);
        std::fs::write(path, rendered)?;
        Ok(())
    }

    fn render_json(results: &[ScanResult], applied_fixes: &[AppliedFix]) -> String {
        let entries: Vec<serde_json::Value> = results
            .iter()
            .map(|result| {
                json!({
                    "url": result.url,
                    "timestamp": result.timestamp,
                    "status": result.status,
                    "error_message": result.error_message,
                    "page_title": result.page_title,
                    "scan_duration": result.scan_duration,
                    "issues": result.issues,
                    "summary": {
                        "total_issues": result.total_issues(),
                        "critical_issues": result.count_by_severity(Severity::Critical),
                        "moderate_issues": result.count_by_severity(Severity::Moderate),
                        "low_issues": result.count_by_severity(Severity::Low),
                        "accessibility_score": result.accessibility_score(),
                    },
                })
            })
            .collect();

        let report = json!({
            "summary": ScanSummary::from_results(results),
            "results": entries,
            "applied_fixes": applied_fixes,
        });
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    fn render_csv(results: &[ScanResult]) -> String {
        let mut out = String::from(
            "url,status,total_issues,critical_issues,moderate_issues,low_issues,accessibility_score\n",
        );
        for result in results {
            out.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                csv_field(&result.url),
                result.status.as_str(),
                result.total_issues(),
                result.count_by_severity(Severity::Critical),
                result.count_by_severity(Severity::Moderate),
                result.count_by_severity(Severity::Low),
                result.accessibility_score(),
            ));
        }
        out
    }

    fn render_text(results: &[ScanResult]) -> String {
        let summary = ScanSummary::from_results(results);
        let mut out = String::new();
        out.push_str("Accessibility scan summary\n");
        out.push_str("==========================\n");
        out.push_str(&format!("URLs scanned:   {}\n", summary.total_urls_scanned));
        out.push_str(&format!("Successful:     {}\n", summary.successful_scans));
        out.push_str(&format!("Failed:         {}\n", summary.failed_scans));
        out.push_str(&format!(
            "Issues:         {} ({} critical, {} moderate, {} low)\n",
            summary.total_issues,
            summary.critical_issues,
            summary.moderate_issues,
            summary.low_issues
        ));
        out.push_str(&format!(
            "Average score:  {}/100\n\n",
            summary.average_accessibility_score
        ));

        for result in results {
            match result.status {
                ScanStatus::Completed => {
                    out.push_str(&format!(
                        "{} - {} issues (score {})\n",
                        result.url,
                        result.total_issues(),
                        result.accessibility_score()
                    ));
                    for issue in &result.issues {
                        out.push_str(&format!(
                            "  [{}] {} - {}\n",
                            issue.severity.as_str(),
                            issue.issue_type.as_str(),
                            issue.description
                        ));
                    }
                }
                ScanStatus::Failed => {
                    out.push_str(&format!(
                        "{} - FAILED: {}\n",
                        result.url,
                        result.error_message.as_deref().unwrap_or("unknown error")
                    ));
                }
            }
        }
        out
    }

    fn render_html(results: &[ScanResult]) -> String {
        let summary = ScanSummary::from_results(results);
        let mut body = String::new();
        body.push_str(&format!(
            "<p>{} URLs scanned, {} issues found, average score {}/100.</p>\n",
            summary.total_urls_scanned, summary.total_issues, summary.average_accessibility_score
        ));

        for result in results {
            body.push_str(&format!("<h2>{}</h2>\n", html_escape(&result.url)));
            match result.status {
                ScanStatus::Failed => {
                    body.push_str(&format!(
                        "<p class=\"failed\">Scan failed: {}</p>\n",
                        html_escape(result.error_message.as_deref().unwrap_or("unknown error"))
                    ));
                }
                ScanStatus::Completed if result.issues.is_empty() => {
                    body.push_str("<p>No issues found.</p>\n");
                }
                ScanStatus::Completed => {
                    body.push_str("<table>\n<tr><th>Severity</th><th>Type</th><th>Description</th><th>Suggested fix</th></tr>\n");
                    for issue in &result.issues {
                        body.push_str(&format!(
                            "<tr class=\"{sev}\"><td>{sev}</td><td>{ty}</td><td>{desc}</td><td>{fix}</td></tr>\n",
                            sev = issue.severity.as_str(),
                            ty = issue.issue_type.as_str(),
                            desc = html_escape(&issue.description),
                            fix = html_escape(&issue.suggested_fix),
                        ));
                    }
                    body.push_str("</table>\n");
                }
            }
        }

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>Accessibility report</title>\
             <style>body{{font-family:sans-serif;margin:2rem}}table{{border-collapse:collapse}}\
             td,th{{border:1px solid #999;padding:0.4rem;text-align:left}}\
             .critical td:first-child{{color:#b00020;font-weight:bold}}</style>\
             </head><body>\n<header><h1>Accessibility report</h1></header>\n<main>\n{}</main>\n</body></html>\n",
            body
        )
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn html_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Issue, IssueType};

    fn sample_results() -> Vec<ScanResult> {
        vec![
            ScanResult::completed(
                "https://a.example".to_string(),
                vec![Issue::new(
                    IssueType::MissingAltText,
                    "Image missing alt text: x.png".to_string(),
                    "<img src=\"x.png\">".to_string(),
                    None,
                    "<body>".to_string(),
                    "Add alt text".to_string(),
                )],
                "A".to_string(),
                0.2,
            ),
            ScanResult::failed("https://b.example".to_string(), "timed out".to_string()),
        ]
    }

    #[test]
    fn test_json_report_shape() {
        let rendered =
            ReportGenerator::render(&sample_results(), &[], ReportFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["summary"]["total_urls_scanned"], 2);
        assert_eq!(parsed["results"][0]["summary"]["critical_issues"], 1);
        assert_eq!(parsed["results"][1]["status"], "failed");
        assert!(parsed["applied_fixes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_csv_has_row_per_result() {
        let rendered = ReportGenerator::render(&sample_results(), &[], ReportFormat::Csv);
        let lines: Vec<&str> = rendered.trim().lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("https://a.example,completed,1,1,0,0"));
        assert!(lines[2].starts_with("https://b.example,failed"));
    }

    #[test]
    fn test_text_report_distinguishes_failure_from_clean() {
        let results = vec![
            ScanResult::completed("https://clean.example".to_string(), vec![], String::new(), 0.1),
            ScanResult::failed("https://broken.example".to_string(), "timed out".to_string()),
        ];
        let rendered = ReportGenerator::render(&results, &[], ReportFormat::Text);
        assert!(rendered.contains("https://clean.example - 0 issues"));
        assert!(rendered.contains("https://broken.example - FAILED: timed out"));
    }

    #[test]
    fn test_html_report_escapes_content() {
        let results = vec![ScanResult::completed(
            "https://a.example".to_string(),
            vec![Issue::new(
                IssueType::NonDescriptiveLink,
                "Link text '<script>' does not describe its destination".to_string(),
                "<a>".to_string(),
                None,
                String::new(),
                String::new(),
            )],
            String::new(),
            0.1,
        )];
        let rendered = ReportGenerator::render(&results, &[], ReportFormat::Html);
        assert!(rendered.contains("&lt;script&gt;"));
        assert!(!rendered.contains("'<script>'"));
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(ReportFormat::from_str("json"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::from_str("txt"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::from_str("pdf"), None);
    }
}
