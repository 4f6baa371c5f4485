//! Fix engine
//!
//! Applies one reversible remediation per fixable issue type and records
//! enough prior state to undo everything. Every remediation is
//! attribute-shaped (set or remove a single attribute, or extend an inline
//! style), so one revert path restores exact pre-fix state for all of them.
//!
//! The engine is scoped to one document session: handles in its ledger are
//! only meaningful against the document the issues were scanned from.

pub mod ledger;

pub use ledger::FixLedger;

use tracing::{debug, info};

use crate::document::{Document, NodeId};
use crate::models::{AppliedFix, AttrChange, Issue, IssueType};

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

#[derive(Debug, Default)]
pub struct FixEngine {
    ledger: FixLedger,
    applied: Vec<AppliedFix>,
}

impl FixEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this engine carries a remediation for the given issue type.
    /// Mirrors the dispatch in [`apply_fixes`](Self::apply_fixes) exactly.
    pub fn supports(issue_type: IssueType) -> bool {
        issue_type.auto_fixable()
    }

    /// Remediations applied since construction or the last full revert.
    pub fn applied_fixes(&self) -> &[AppliedFix] {
        &self.applied
    }

    pub fn has_pending_fixes(&self) -> bool {
        !self.ledger.is_empty()
    }

    /// Apply a remediation for every fixable issue in the slice.
    ///
    /// An issue whose target cannot be re-located (removed since the scan,
    /// or the handle no longer matches the recorded tag) is skipped; the
    /// returned list simply omits it. Non-fixable issues are ignored.
    pub fn apply_fixes(&mut self, doc: &mut Document, issues: &[Issue]) -> Vec<AppliedFix> {
        let mut applied_now = Vec::new();

        for issue in issues {
            if !issue.fixable {
                debug!(issue_type = issue.issue_type.as_str(), "not auto-fixable, skipping");
                continue;
            }
            let Some(handle) = &issue.target else {
                continue;
            };
            if !doc.contains(handle.id) || doc.tag(handle.id) != handle.tag {
                debug!(
                    issue_type = issue.issue_type.as_str(),
                    "target no longer present, skipping fix"
                );
                continue;
            }

            let changes = match issue.issue_type {
                IssueType::MissingAltText => self.fix_alt_text(doc, handle.id),
                IssueType::PoorColorContrast => self.fix_color_contrast(doc, handle.id),
                IssueType::ImproperHeadingHierarchy => self.fix_heading_level(doc, handle.id),
                IssueType::MissingFormLabel => self.fix_form_label(doc, handle.id),
                IssueType::InvalidAria => self.fix_aria_role(doc, handle.id),
                IssueType::KeyboardNavigationIssue => self.fix_tabindex(doc, handle.id),
                // every other type reports fixable = false
                _ => Vec::new(),
            };

            if changes.is_empty() {
                continue;
            }
            let fix = AppliedFix::new(issue.issue_type, handle.clone(), changes);
            self.applied.push(fix.clone());
            applied_now.push(fix);
        }

        info!(applied = applied_now.len(), requested = issues.len(), "fixes applied");
        applied_now
    }

    /// Restore every mutated node to its recorded pre-fix state and clear
    /// the ledger. Safe to call with nothing applied.
    pub fn revert_fixes(&mut self, doc: &mut Document) -> bool {
        let entries = self.ledger.drain();
        for (node, snapshot) in entries {
            if !doc.contains(node) {
                debug!(node = node.0, "node gone, nothing to restore");
                continue;
            }
            for (attr, prior) in snapshot {
                match prior {
                    Some(value) => {
                        doc.set_attr(node, &attr, &value);
                    }
                    None => {
                        doc.remove_attr(node, &attr);
                    }
                }
            }
        }
        let reverted = self.applied.len();
        self.applied.clear();
        info!(reverted, "fixes reverted");
        true
    }

    /// Set an attribute, recording its pre-mutation value in the ledger.
    fn set_tracked(&mut self, doc: &mut Document, node: NodeId, attr: &str, value: String) -> AttrChange {
        let prior = doc.set_attr(node, attr, &value);
        self.ledger.record(node, attr, prior.clone());
        AttrChange {
            name: attr.to_string(),
            prior,
            new: Some(value),
        }
    }

    /// Remove an attribute, recording its pre-mutation value in the ledger.
    fn remove_tracked(&mut self, doc: &mut Document, node: NodeId, attr: &str) -> Option<AttrChange> {
        let prior = doc.remove_attr(node, attr)?;
        self.ledger.record(node, attr, Some(prior.clone()));
        Some(AttrChange {
            name: attr.to_string(),
            prior: Some(prior),
            new: None,
        })
    }

    /// Generated alt text: nearby text, then class name, then filename,
    /// then a literal fallback.
    fn fix_alt_text(&mut self, doc: &mut Document, img: NodeId) -> Vec<AttrChange> {
        let alt = Self::generate_alt_text(doc, img);
        vec![self.set_tracked(doc, img, "alt", alt)]
    }

    fn generate_alt_text(doc: &Document, img: NodeId) -> String {
        if let Some(parent) = doc.parent(img) {
            let nearby = doc.text(parent);
            if !nearby.is_empty() {
                return truncate(&nearby, 80);
            }
        }
        if let Some(class) = doc.classes(img).first() {
            return humanize(class);
        }
        if let Some(src) = doc.attr(img, "src") {
            let stem = src
                .rsplit('/')
                .next()
                .unwrap_or(src)
                .split('.')
                .next()
                .unwrap_or("");
            if !stem.is_empty() {
                return humanize(stem);
            }
        }
        "Image".to_string()
    }

    /// Append a high-contrast override to the inline style. Later
    /// declarations win, so prior properties are preserved in the string
    /// and the whole attribute restores on revert.
    fn fix_color_contrast(&mut self, doc: &mut Document, node: NodeId) -> Vec<AttrChange> {
        let override_style = "color: #000000; background-color: #ffffff; border-color: #000000";
        let new_style = match doc.attr(node, "style") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{}; {}", existing.trim_end_matches([' ', ';']), override_style)
            }
            _ => override_style.to_string(),
        };
        vec![self.set_tracked(doc, node, "style", new_style)]
    }

    /// Expose the expected heading level through `aria-level` rather than
    /// swapping the element for a different tag. The expected level is
    /// recomputed from the live document, so a stale issue against a
    /// now-correct heading becomes a no-op.
    fn fix_heading_level(&mut self, doc: &mut Document, heading: NodeId) -> Vec<AttrChange> {
        let mut previous_level: u32 = 0;
        for candidate in doc.nodes_by_tags(&HEADING_TAGS) {
            let level = match doc.tag(candidate)[1..].parse::<u32>() {
                Ok(level) => level,
                Err(_) => continue,
            };
            if candidate == heading {
                if previous_level != 0 && level > previous_level + 1 {
                    let expected = previous_level + 1;
                    return vec![self.set_tracked(
                        doc,
                        heading,
                        "aria-level",
                        expected.to_string(),
                    )];
                }
                return Vec::new();
            }
            previous_level = level;
        }
        Vec::new()
    }

    /// Generated label: placeholder, then field name, then input type.
    fn fix_form_label(&mut self, doc: &mut Document, control: NodeId) -> Vec<AttrChange> {
        let label = if let Some(placeholder) = doc.attr(control, "placeholder") {
            placeholder.to_string()
        } else if let Some(name) = doc.attr(control, "name") {
            humanize(name)
        } else if let Some(ty) = doc.attr(control, "type") {
            format!("{} field", ty)
        } else {
            format!("{} field", doc.tag(control))
        };
        vec![self.set_tracked(doc, control, "aria-label", label)]
    }

    fn fix_aria_role(&mut self, doc: &mut Document, node: NodeId) -> Vec<AttrChange> {
        self.remove_tracked(doc, node, "role").into_iter().collect()
    }

    fn fix_tabindex(&mut self, doc: &mut Document, node: NodeId) -> Vec<AttrChange> {
        vec![self.set_tracked(doc, node, "tabindex", "0".to_string())]
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        text.chars().take(max).collect()
    }
}

/// Turn an identifier like `hero-banner_2` into `hero banner 2`.
fn humanize(raw: &str) -> String {
    raw.replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
