//! Form label check
//!
//! Every form control (except hidden inputs) needs one of: a `label[for]`
//! pointing at its id, a wrapping `<label>`, an `aria-label`, or an
//! `aria-labelledby` reference. Controls with none of the four are flagged.

use std::collections::HashSet;

use tracing::debug;

use super::Check;
use crate::document::{Document, NodeId};
use crate::models::{Issue, IssueType, NodeHandle};

pub struct FormLabelCheck;

impl FormLabelCheck {
    pub fn new() -> Self {
        Self
    }

    fn labelled_ids(doc: &Document) -> HashSet<String> {
        doc.nodes_by_tag("label")
            .into_iter()
            .filter_map(|label| doc.attr(label, "for").map(str::to_string))
            .collect()
    }

    fn wrapped_in_label(doc: &Document, control: NodeId) -> bool {
        let mut current = doc.parent(control);
        while let Some(node) = current {
            if doc.tag(node) == "label" {
                return true;
            }
            current = doc.parent(node);
        }
        false
    }

    fn has_accessible_label(doc: &Document, control: NodeId, labelled: &HashSet<String>) -> bool {
        if let Some(id) = doc.attr(control, "id") {
            if labelled.contains(id) {
                return true;
            }
        }
        if Self::wrapped_in_label(doc, control) {
            return true;
        }
        if doc.attr(control, "aria-label").is_some_and(|v| !v.trim().is_empty()) {
            return true;
        }
        doc.attr(control, "aria-labelledby")
            .is_some_and(|v| !v.trim().is_empty())
    }

    fn describe(doc: &Document, control: NodeId) -> String {
        let tag = doc.tag(control);
        match (doc.attr(control, "name"), doc.attr(control, "type")) {
            (Some(name), _) => format!("Form {} '{}' has no accessible label", tag, name),
            (None, Some(ty)) => format!("Form {} of type '{}' has no accessible label", tag, ty),
            (None, None) => format!("Form {} has no accessible label", tag),
        }
    }
}

impl Check for FormLabelCheck {
    fn name(&self) -> &'static str {
        "forms"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::MissingFormLabel
    }

    fn run(&self, doc: &Document, url: &str) -> Vec<Issue> {
        let mut issues = Vec::new();
        let labelled = Self::labelled_ids(doc);

        for control in doc.nodes_by_tags(&["input", "select", "textarea"]) {
            if doc.tag(control) == "input" && doc.attr(control, "type") == Some("hidden") {
                continue;
            }
            if !doc.is_visible(control) {
                continue;
            }
            if Self::has_accessible_label(doc, control, &labelled) {
                continue;
            }

            issues.push(Issue::new(
                IssueType::MissingFormLabel,
                Self::describe(doc, control),
                doc.snippet(control),
                Some(NodeHandle {
                    id: control,
                    tag: doc.tag(control).to_string(),
                }),
                doc.context(control),
                "Associate a visible <label for=\"...\"> with the control, wrap it in a \
                 label, or add an aria-label."
                    .to_string(),
            ));
        }

        debug!(check = self.name(), url, found = issues.len(), "check complete");
        issues
    }
}
