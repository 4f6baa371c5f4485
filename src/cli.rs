//! CLI argument parsing and command implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::ScanConfig;
use crate::document::Document;
use crate::error::ScanError;
use crate::fix_engine::FixEngine;
use crate::models::{IssueType, ScanResult, ScanStatus, Severity};
use crate::reports::{ReportFormat, ReportGenerator};
use crate::scanner::{DocumentWatcher, HttpFetcher, Scanner};

#[derive(Parser)]
#[command(
    name = "a11yscan",
    version,
    about = "Scan web pages for accessibility defects and apply reversible fixes",
    long_about = "a11yscan inspects rendered pages for accessibility defects (missing alt \
                  text, poor contrast, broken heading structure, unlabeled controls, vague \
                  links, invalid ARIA, missing landmarks, keyboard traps) and can apply \
                  reversible attribute-level remediations to local files.\n\nFindings are \
                  advisory and should be human-reviewed; a clean scan is not a conformance \
                  proof.",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan one or more URLs or local HTML files
    #[command(
        after_help = "Exit codes:\n  0  scan clean (no critical issues, no failures)\n  1  critical issues found\n  2  at least one URL failed to scan"
    )]
    Scan {
        /// URLs or local file paths to scan
        targets: Vec<String>,
        /// File containing targets to scan, one per line
        #[arg(long)]
        urls_file: Option<PathBuf>,
        /// Report format: text|json|csv|html
        #[arg(long, default_value = "text")]
        output: String,
        /// Write the report to this path instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Per-URL timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,
        /// Concurrent URL pipelines (overrides config)
        #[arg(long)]
        max_concurrency: Option<usize>,
        /// Drop issues below this severity: low|moderate|critical
        #[arg(long)]
        min_severity: Option<String>,
    },
    /// Apply automated fixes to a local HTML file
    Fix {
        /// HTML file to remediate
        file: PathBuf,
        /// Where to write the remediated document (default: <file>.fixed.html)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Only fix these issue types (comma-separated, e.g. missing_alt_text)
        #[arg(long)]
        types: Option<String>,
        /// List the fixes without writing anything
        #[arg(long, action = clap::ArgAction::SetTrue)]
        dry_run: bool,
        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Re-scan a local HTML file whenever it changes
    Watch {
        /// HTML file to watch
        file: PathBuf,
        /// Quiet window before a re-scan, in milliseconds
        #[arg(long, default_value_t = 300)]
        debounce_ms: u64,
        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    match path {
        Some(path) => ScanConfig::load(path)
            .with_context(|| format!("load config {}", path.display())),
        None => Ok(ScanConfig::default()),
    }
}

fn parse_min_severity(value: Option<&str>) -> Result<Option<Severity>> {
    match value {
        None => Ok(None),
        Some(raw) => match Severity::from_str(raw) {
            Some(severity) => Ok(Some(severity)),
            None => bail!(ScanError::Config(format!(
                "unknown severity '{}' (expected low, moderate or critical)",
                raw
            ))),
        },
    }
}

fn parse_issue_types(raw: &str) -> Result<Vec<IssueType>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| {
            IssueType::from_str(name)
                .ok_or_else(|| ScanError::UnknownIssueType(name.to_string()).into())
        })
        .collect()
}

fn read_targets_file(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read targets file {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn filter_by_severity(mut results: Vec<ScanResult>, min: Option<Severity>) -> Vec<ScanResult> {
    let Some(min) = min else {
        return results;
    };
    for result in &mut results {
        result
            .issues
            .retain(|issue| issue.severity.numeric_value() >= min.numeric_value());
    }
    results
}

pub async fn cmd_scan(
    targets: Vec<String>,
    urls_file: Option<PathBuf>,
    output: String,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
    timeout: Option<u64>,
    max_concurrency: Option<usize>,
    min_severity: Option<String>,
) -> Result<u8> {
    let mut cfg = load_config(config.as_deref())?;
    if let Some(timeout) = timeout {
        cfg.timeout_secs = timeout;
    }
    if let Some(limit) = max_concurrency {
        cfg.max_concurrency = limit;
    }
    let format = ReportFormat::from_str(&output)
        .ok_or_else(|| ScanError::Config(format!("unknown output format '{}'", output)))?;
    let min_severity = parse_min_severity(min_severity.as_deref())?;

    let mut all_targets = targets;
    if let Some(path) = urls_file {
        all_targets.extend(read_targets_file(&path)?);
    }
    if all_targets.is_empty() {
        bail!("no targets given; pass URLs or --urls-file");
    }

    let scanner = Arc::new(Scanner::new(cfg));
    let (files, urls): (Vec<String>, Vec<String>) = all_targets
        .iter()
        .cloned()
        .partition(|t| Path::new(t).exists());

    let mut results: Vec<ScanResult> = Vec::new();
    for file in &files {
        match scanner.scan_file(Path::new(file)) {
            Ok(result) => results.push(result),
            Err(e) => results.push(ScanResult::failed(file.clone(), e.to_string())),
        }
    }
    if !urls.is_empty() {
        let fetcher = Arc::new(HttpFetcher::new(
            &scanner.config().user_agent,
            Duration::from_secs(scanner.config().timeout_secs),
        )?);
        let url_results = Arc::clone(&scanner).scan_urls(fetcher, urls).await;
        results.extend(url_results);
    }

    let results = filter_by_severity(results, min_severity);
    let rendered = ReportGenerator::render(&results, &[], format);
    match out {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("write report {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{}", rendered),
    }

    let any_failed = results.iter().any(|r| r.status == ScanStatus::Failed);
    let any_critical = results
        .iter()
        .any(|r| r.count_by_severity(Severity::Critical) > 0);
    Ok(if any_failed {
        2
    } else if any_critical {
        1
    } else {
        0
    })
}

pub fn cmd_fix(
    file: PathBuf,
    out: Option<PathBuf>,
    types: Option<String>,
    dry_run: bool,
    config: Option<PathBuf>,
) -> Result<u8> {
    let cfg = load_config(config.as_deref())?;
    let wanted = types.as_deref().map(parse_issue_types).transpose()?;

    let html = std::fs::read_to_string(&file)
        .with_context(|| format!("read {}", file.display()))?;
    let mut doc = Document::parse(&html);
    let scanner = Scanner::new(cfg);
    let result = scanner.scan(&doc, &file.display().to_string());

    let selected: Vec<_> = result
        .issues
        .iter()
        .filter(|issue| issue.fixable)
        .filter(|issue| {
            wanted
                .as_ref()
                .map_or(true, |types| types.contains(&issue.issue_type))
        })
        .cloned()
        .collect();

    if dry_run {
        println!("{} fixable issues:", selected.len());
        for issue in &selected {
            println!("  [{}] {}", issue.issue_type.as_str(), issue.description);
        }
        return Ok(0);
    }

    let mut engine = FixEngine::new();
    let applied = engine.apply_fixes(&mut doc, &selected);

    let out_path = out.unwrap_or_else(|| {
        let mut path = file.clone();
        path.set_extension("fixed.html");
        path
    });
    std::fs::write(&out_path, doc.to_html())
        .with_context(|| format!("write {}", out_path.display()))?;

    println!(
        "Applied {} of {} selected fixes; remediated document written to {}",
        applied.len(),
        selected.len(),
        out_path.display()
    );
    for fix in &applied {
        let changed: Vec<&str> = fix.changes.iter().map(|c| c.name.as_str()).collect();
        println!(
            "  [{}] <{}> ({})",
            fix.issue_type.as_str(),
            fix.target.tag,
            changed.join(", ")
        );
    }
    Ok(0)
}

pub async fn cmd_watch(file: PathBuf, debounce_ms: u64, config: Option<PathBuf>) -> Result<u8> {
    let cfg = load_config(config.as_deref())?;
    let scanner = Scanner::new(cfg);

    let report = |result: &ScanResult| {
        println!(
            "{}: {} issues ({} critical, {} moderate, {} low), score {}",
            result.url,
            result.total_issues(),
            result.count_by_severity(Severity::Critical),
            result.count_by_severity(Severity::Moderate),
            result.count_by_severity(Severity::Low),
            result.accessibility_score()
        );
    };

    let initial = scanner.scan_file(&file)?;
    report(&initial);

    let handle = DocumentWatcher::new().watch_file(&file).await?;
    println!("Watching {} for changes (ctrl-c to stop)", file.display());
    while let Some(_path) = handle.recv_debounced(Duration::from_millis(debounce_ms)).await {
        match scanner.scan_file(&file) {
            Ok(result) => report(&result),
            Err(e) => eprintln!("re-scan failed: {}", e),
        }
    }
    Ok(0)
}
