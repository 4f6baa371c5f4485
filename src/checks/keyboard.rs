//! Keyboard reachability check
//!
//! Interactive elements must be reachable by keyboard. Two patterns are
//! flagged: anchors with no destination (no href, no tabindex), which never
//! enter the tab order, and interactive controls opted out of it with a
//! negative tabindex. The remediation sets tabindex="0".

use tracing::debug;

use super::Check;
use crate::document::{Document, NodeId};
use crate::models::{Issue, IssueType, NodeHandle};

const INTERACTIVE_TAGS: [&str; 5] = ["a", "button", "input", "select", "textarea"];

pub struct KeyboardNavCheck;

impl KeyboardNavCheck {
    pub fn new() -> Self {
        Self
    }

    fn negative_tabindex(doc: &Document, node: NodeId) -> bool {
        doc.attr(node, "tabindex")
            .and_then(|v| v.trim().parse::<i32>().ok())
            .is_some_and(|v| v < 0)
    }
}

impl Check for KeyboardNavCheck {
    fn name(&self) -> &'static str {
        "keyboard"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::KeyboardNavigationIssue
    }

    fn run(&self, doc: &Document, url: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        for node in doc.nodes_by_tags(&INTERACTIVE_TAGS) {
            if !doc.is_visible(node) {
                continue;
            }
            let tag = doc.tag(node);

            let description = if tag == "a"
                && !doc.has_attr(node, "href")
                && !doc.has_attr(node, "tabindex")
            {
                format!(
                    "Link '{}' has no destination and is unreachable by keyboard",
                    doc.text(node)
                )
            } else if Self::negative_tabindex(doc, node) {
                format!("<{}> is removed from the tab order by a negative tabindex", tag)
            } else {
                continue;
            };

            issues.push(Issue::new(
                IssueType::KeyboardNavigationIssue,
                description,
                doc.snippet(node),
                Some(NodeHandle {
                    id: node,
                    tag: tag.to_string(),
                }),
                doc.context(node),
                "Make the element focusable: give anchors a real href, or set \
                 tabindex=\"0\" on controls that must stay in the tab order."
                    .to_string(),
            ));
        }

        debug!(check = self.name(), url, found = issues.len(), "check complete");
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> Vec<Issue> {
        let doc = Document::parse(html);
        KeyboardNavCheck::new().run(&doc, "https://example.com")
    }

    #[test]
    fn test_anchor_without_destination_flagged() {
        let issues = run(r#"<html><body><a onclick="go()">Open</a></body></html>"#);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::KeyboardNavigationIssue);
        assert!(issues[0].fixable);
    }

    #[test]
    fn test_anchor_with_href_passes() {
        let issues = run(r#"<html><body><a href="/next">Open</a></body></html>"#);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_anchor_with_tabindex_passes() {
        let issues = run(r#"<html><body><a tabindex="0" onclick="go()">Open</a></body></html>"#);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_negative_tabindex_on_button_flagged() {
        let issues = run(r#"<html><body><button tabindex="-1">Save</button></body></html>"#);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].description.contains("tab order"));
    }

    #[test]
    fn test_zero_tabindex_passes() {
        let issues = run(r#"<html><body><button tabindex="0">Save</button></body></html>"#);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_unparsable_tabindex_is_skipped() {
        let issues = run(r#"<html><body><button tabindex="first">Save</button></body></html>"#);
        assert!(issues.is_empty());
    }
}
