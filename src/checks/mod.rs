//! Accessibility check engines
//!
//! One module per rule. Every check is an independent, read-only pass over
//! a document snapshot: no shared state, no ordering dependency between
//! checks, and a malformed node degrades by skipping that instance rather
//! than aborting the scan.

pub mod alt_text;
pub mod aria;
pub mod color_contrast;
pub mod forms;
pub mod headings;
pub mod keyboard;
pub mod landmarks;
pub mod links;
pub mod media;

pub use alt_text::AltTextCheck;
pub use aria::AriaRoleCheck;
pub use color_contrast::ColorContrastCheck;
pub use forms::FormLabelCheck;
pub use headings::HeadingHierarchyCheck;
pub use keyboard::KeyboardNavCheck;
pub use landmarks::LandmarkCheck;
pub use links::LinkTextCheck;
pub use media::MediaCaptionsCheck;

use crate::config::ScanConfig;
use crate::document::Document;
use crate::models::{Issue, IssueType};

/// Contract for a single accessibility check.
///
/// Implementations inspect one document snapshot and produce zero or more
/// issues. They must not mutate the document and must not panic on
/// unexpected structure. Output order is stable within one check for a
/// given document.
pub trait Check: Send + Sync {
    fn name(&self) -> &'static str;

    /// The issue type this check reports, used for enable/disable filtering.
    fn issue_type(&self) -> IssueType;

    fn run(&self, doc: &Document, url: &str) -> Vec<Issue>;
}

/// Build the registered checks in presentation order, honoring the
/// configuration's enabled set.
pub fn build_checks(config: &ScanConfig) -> Vec<Box<dyn Check>> {
    let all: Vec<Box<dyn Check>> = vec![
        Box::new(AltTextCheck::new()),
        Box::new(ColorContrastCheck::new(
            config.contrast_thresholds.normal,
            config.contrast_thresholds.large,
        )),
        Box::new(HeadingHierarchyCheck::new()),
        Box::new(FormLabelCheck::new()),
        Box::new(LinkTextCheck::new(config.vague_link_phrases.clone())),
        Box::new(AriaRoleCheck::new()),
        Box::new(LandmarkCheck::new()),
        Box::new(KeyboardNavCheck::new()),
        Box::new(MediaCaptionsCheck::new()),
    ];

    match &config.enabled_checks {
        None => all,
        Some(enabled) => all
            .into_iter()
            .filter(|check| enabled.contains(&check.issue_type()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_checks_registered_by_default() {
        let config = ScanConfig::default();
        let checks = build_checks(&config);
        assert_eq!(checks.len(), 9);
    }

    #[test]
    fn test_enabled_checks_filter() {
        let config = ScanConfig {
            enabled_checks: Some(vec![IssueType::MissingAltText, IssueType::MissingLandmark]),
            ..ScanConfig::default()
        };
        let checks = build_checks(&config);
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].issue_type(), IssueType::MissingAltText);
        assert_eq!(checks[1].issue_type(), IssueType::MissingLandmark);
    }
}
