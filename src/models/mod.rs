// a11yscan data models

pub mod fix;
pub mod issue;
pub mod scan;

// Re-exports for convenience
pub use fix::{AppliedFix, AttrChange};
pub use issue::{classify, Category, Classification, Issue, IssueType, NodeHandle, Severity};
pub use scan::{ScanResult, ScanStatus, ScanSummary};
