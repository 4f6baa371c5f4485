//! Heading hierarchy check
//!
//! Walks headings in document order tracking the previous level and flags
//! any heading that jumps more than one level deeper (H1 followed by H3
//! skips H2). Also reports pages with no headings, pages missing an H1,
//! and pages with more than one H1.

use tracing::debug;

use super::Check;
use crate::document::Document;
use crate::models::{Issue, IssueType, NodeHandle};

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

pub struct HeadingHierarchyCheck;

impl HeadingHierarchyCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Check for HeadingHierarchyCheck {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::ImproperHeadingHierarchy
    }

    fn run(&self, doc: &Document, url: &str) -> Vec<Issue> {
        let mut issues = Vec::new();
        let headings = doc.nodes_by_tags(&HEADING_TAGS);

        if headings.is_empty() {
            issues.push(
                Issue::new(
                    IssueType::ImproperHeadingHierarchy,
                    "Page has no heading elements".to_string(),
                    "<body>".to_string(),
                    None,
                    "entire page".to_string(),
                    "Structure the content with headings, starting from an h1 that names \
                     the page's main topic."
                        .to_string(),
                )
                .not_fixable(),
            );
            return issues;
        }

        let h1_count = headings.iter().filter(|id| doc.tag(**id) == "h1").count();
        if h1_count == 0 {
            issues.push(
                Issue::new(
                    IssueType::ImproperHeadingHierarchy,
                    "Page is missing an h1 heading".to_string(),
                    "<body>".to_string(),
                    None,
                    "entire page".to_string(),
                    "Add a single h1 that describes the main topic of the page.".to_string(),
                )
                .not_fixable(),
            );
        } else if h1_count > 1 {
            issues.push(
                Issue::new(
                    IssueType::ImproperHeadingHierarchy,
                    format!("Page has {} h1 headings (should have only one)", h1_count),
                    "multiple <h1> elements".to_string(),
                    None,
                    "entire page".to_string(),
                    "Keep one h1 per page; demote the others to h2 or h3 as fits the \
                     content hierarchy."
                        .to_string(),
                )
                .not_fixable(),
            );
        }

        let mut previous_level: u32 = 0;
        for heading in headings {
            let level = match doc.tag(heading)[1..].parse::<u32>() {
                Ok(level) => level,
                Err(_) => continue,
            };
            if level > previous_level + 1 && previous_level != 0 {
                let text = doc.text(heading);
                let excerpt: String = text.chars().take(50).collect();
                issues.push(Issue::new(
                    IssueType::ImproperHeadingHierarchy,
                    format!(
                        "Heading level jumps from {} to {} (skipping levels)",
                        previous_level, level
                    ),
                    format!("<{}>{}</{}>", doc.tag(heading), excerpt, doc.tag(heading)),
                    Some(NodeHandle {
                        id: heading,
                        tag: doc.tag(heading).to_string(),
                    }),
                    doc.context(heading),
                    format!(
                        "After a level-{} heading the next heading should be level {} at \
                         most.",
                        previous_level,
                        previous_level + 1
                    ),
                ));
            }
            previous_level = level;
        }

        debug!(check = self.name(), url, found = issues.len(), "check complete");
        issues
    }
}
