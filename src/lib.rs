// a11yscan - rule-based web accessibility scanner with reversible fixes
// Module re-exports

pub mod checks;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod fix_engine;
pub mod models;
pub mod reports;
pub mod scanner;

// Re-export commonly used types
pub use config::ScanConfig;
pub use document::{Document, NodeId};
pub use error::ScanError;
pub use fix_engine::{FixEngine, FixLedger};
pub use models::{
    classify, AppliedFix, AttrChange, Category, Issue, IssueType, NodeHandle, ScanResult,
    ScanStatus, ScanSummary, Severity,
};
pub use reports::{ReportFormat, ReportGenerator};
pub use scanner::{DocumentWatcher, HttpFetcher, PageFetcher, Scanner};
