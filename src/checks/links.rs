//! Link text check
//!
//! Flags anchors whose normalized text matches a configurable set of vague
//! phrases ("click here", "read more", ...), and anchors with no content at
//! all. Neither case is auto-fixable; rewording a link needs human
//! judgment.

use std::collections::HashSet;

use tracing::debug;

use super::Check;
use crate::document::Document;
use crate::models::{Issue, IssueType, NodeHandle};

pub struct LinkTextCheck {
    vague_phrases: HashSet<String>,
}

impl LinkTextCheck {
    pub fn new(phrases: Vec<String>) -> Self {
        Self {
            vague_phrases: phrases.iter().map(|p| normalize(p)).collect(),
        }
    }
}

/// Lowercase, squash punctuation and runs of whitespace to single spaces.
fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut last_was_space = true;
    for ch in lowered.chars() {
        if ch.is_alphanumeric() {
            out.push(ch);
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    out.trim_end().to_string()
}

impl Check for LinkTextCheck {
    fn name(&self) -> &'static str {
        "links"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::NonDescriptiveLink
    }

    fn run(&self, doc: &Document, url: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        for link in doc.nodes_by_tag("a") {
            if !doc.is_visible(link) {
                continue;
            }
            let text = doc.text(link);
            let handle = NodeHandle {
                id: link,
                tag: "a".to_string(),
            };

            if text.is_empty() {
                let has_image = doc
                    .children(link)
                    .iter()
                    .any(|child| doc.tag(*child) == "img");
                let has_aria = doc
                    .attr(link, "aria-label")
                    .is_some_and(|v| !v.trim().is_empty());
                if !has_image && !has_aria {
                    issues.push(Issue::new(
                        IssueType::NonDescriptiveLink,
                        format!(
                            "Link to '{}' has no text content",
                            doc.attr(link, "href").unwrap_or("?")
                        ),
                        doc.snippet(link),
                        Some(handle),
                        doc.context(link),
                        "Give the link visible text or an aria-label describing its \
                         destination."
                            .to_string(),
                    ));
                }
                continue;
            }

            if self.vague_phrases.contains(&normalize(&text)) {
                issues.push(Issue::new(
                    IssueType::NonDescriptiveLink,
                    format!("Link text '{}' does not describe its destination", text),
                    format!("<a>{}</a>", text),
                    Some(handle),
                    doc.context(link),
                    "Reword the link so it makes sense out of context, e.g. 'read the \
                     2024 annual report' instead of 'read more'."
                        .to_string(),
                ));
            }
        }

        debug!(check = self.name(), url, found = issues.len(), "check complete");
        issues
    }
}
