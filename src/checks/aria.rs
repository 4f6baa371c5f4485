//! ARIA role check
//!
//! Any element declaring a `role` outside the fixed allow-list of valid
//! ARIA roles is flagged. The remediation removes the bogus role so
//! assistive technology falls back to the element's native semantics.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use tracing::debug;

use super::Check;
use crate::document::Document;
use crate::models::{Issue, IssueType, NodeHandle};

static VALID_ROLES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "alert",
        "alertdialog",
        "application",
        "article",
        "banner",
        "button",
        "cell",
        "checkbox",
        "columnheader",
        "combobox",
        "complementary",
        "contentinfo",
        "definition",
        "dialog",
        "directory",
        "document",
        "feed",
        "figure",
        "form",
        "grid",
        "gridcell",
        "group",
        "heading",
        "img",
        "link",
        "list",
        "listbox",
        "listitem",
        "log",
        "main",
        "marquee",
        "math",
        "menu",
        "menubar",
        "menuitem",
        "menuitemcheckbox",
        "menuitemradio",
        "navigation",
        "none",
        "note",
        "option",
        "presentation",
        "progressbar",
        "radio",
        "radiogroup",
        "region",
        "row",
        "rowgroup",
        "rowheader",
        "scrollbar",
        "search",
        "searchbox",
        "separator",
        "slider",
        "spinbutton",
        "status",
        "switch",
        "tab",
        "table",
        "tablist",
        "tabpanel",
        "term",
        "textbox",
        "timer",
        "toolbar",
        "tooltip",
        "tree",
        "treegrid",
        "treeitem",
    ]
    .into_iter()
    .collect()
});

pub struct AriaRoleCheck;

impl AriaRoleCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Check for AriaRoleCheck {
    fn name(&self) -> &'static str {
        "aria"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::InvalidAria
    }

    fn run(&self, doc: &Document, url: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        for node in doc.all_nodes() {
            let Some(role) = doc.attr(node, "role") else {
                continue;
            };
            // role can hold a space-separated fallback list
            let invalid: Vec<&str> = role
                .split_whitespace()
                .filter(|token| !VALID_ROLES.contains(token.to_lowercase().as_str()))
                .collect();
            if invalid.is_empty() {
                continue;
            }

            issues.push(Issue::new(
                IssueType::InvalidAria,
                format!(
                    "Invalid ARIA role '{}' on <{}>",
                    invalid.join(" "),
                    doc.tag(node)
                ),
                doc.snippet(node),
                Some(NodeHandle {
                    id: node,
                    tag: doc.tag(node).to_string(),
                }),
                doc.context(node),
                "Use a role from the ARIA specification, or remove the attribute and \
                 rely on the element's native semantics."
                    .to_string(),
            ));
        }

        debug!(check = self.name(), url, found = issues.len(), "check complete");
        issues
    }
}
