//! Landmark check
//!
//! A page with zero semantic landmarks (main/nav/header/footer/aside or
//! their role equivalents) gets exactly one page-level issue. Pages with at
//! least one landmark pass.

use tracing::debug;

use super::Check;
use crate::document::Document;
use crate::models::{Issue, IssueType};

const LANDMARK_TAGS: [&str; 5] = ["main", "nav", "header", "footer", "aside"];
const LANDMARK_ROLES: [&str; 5] = ["main", "navigation", "banner", "contentinfo", "complementary"];

pub struct LandmarkCheck;

impl LandmarkCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Check for LandmarkCheck {
    fn name(&self) -> &'static str {
        "landmarks"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::MissingLandmark
    }

    fn run(&self, doc: &Document, url: &str) -> Vec<Issue> {
        let has_landmark = doc.all_nodes().any(|node| {
            LANDMARK_TAGS.contains(&doc.tag(node))
                || doc
                    .attr(node, "role")
                    .is_some_and(|role| LANDMARK_ROLES.contains(&role))
        });

        let issues = if has_landmark {
            Vec::new()
        } else {
            vec![Issue::new(
                IssueType::MissingLandmark,
                "Page defines no landmark regions".to_string(),
                "<body>".to_string(),
                None,
                "entire page".to_string(),
                "Wrap the primary content in <main> and use <nav>, <header> and \
                 <footer> so assistive technology can jump between page regions."
                    .to_string(),
            )]
        };

        debug!(check = self.name(), url, found = issues.len(), "check complete");
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> Vec<Issue> {
        let doc = Document::parse(html);
        LandmarkCheck::new().run(&doc, "https://example.com")
    }

    #[test]
    fn test_no_landmarks_yields_exactly_one_issue() {
        let issues = run(r#"<html><body><div><p>content</p></div></body></html>"#);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].target.is_none());
        assert!(!issues[0].fixable);
    }

    #[test]
    fn test_single_landmark_passes() {
        let issues = run(r#"<html><body><main><p>content</p></main></body></html>"#);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_role_equivalent_counts_as_landmark() {
        let issues = run(r#"<html><body><div role="main"><p>content</p></div></body></html>"#);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_each_landmark_tag_counts() {
        for tag in LANDMARK_TAGS {
            let html = format!("<html><body><{tag}>x</{tag}></body></html>");
            assert!(run(&html).is_empty(), "{} should count as a landmark", tag);
        }
    }
}
