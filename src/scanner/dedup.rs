//! Issue consolidation
//!
//! Post-processing over the raw issue list, independent of any single
//! check. Two passes: exact duplicates (same type, same element reference)
//! are dropped, then repetitive vague-link findings are collapsed into one
//! summary entry per distinct link text.

use std::collections::{HashMap, HashSet};

use crate::models::{Issue, IssueType};

/// Key identifying "the same defect on the same element".
fn issue_key(issue: &Issue) -> (IssueType, String) {
    let reference = match &issue.target {
        Some(handle) => format!("#{}:{}", handle.id.0, handle.tag),
        None => issue.element.trim().to_lowercase(),
    };
    (issue.issue_type, reference)
}

/// Drop duplicates and collapse repeated vague-link findings.
///
/// Order is preserved: each surviving issue keeps the position of its first
/// occurrence.
pub fn consolidate(issues: Vec<Issue>) -> Vec<Issue> {
    let mut seen: HashSet<(IssueType, String)> = HashSet::new();
    let mut unique: Vec<Issue> = Vec::new();
    for issue in issues {
        if seen.insert(issue_key(&issue)) {
            unique.push(issue);
        }
    }
    collapse_vague_links(unique)
}

/// Many links sharing the same vague text ("read more" on every card) say
/// one thing, not twenty. Keep the first as a summary entry with a count.
fn collapse_vague_links(issues: Vec<Issue>) -> Vec<Issue> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for issue in &issues {
        if issue.issue_type == IssueType::NonDescriptiveLink {
            *counts.entry(issue.description.clone()).or_default() += 1;
        }
    }

    let mut emitted: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for mut issue in issues {
        if issue.issue_type != IssueType::NonDescriptiveLink {
            out.push(issue);
            continue;
        }
        let count = counts.get(&issue.description).copied().unwrap_or(1);
        if !emitted.insert(issue.description.clone()) {
            continue;
        }
        if count > 1 {
            issue.description = format!("{} ({} occurrences)", issue.description, count);
            issue.target = None;
        }
        out.push(issue);
    }
    out
}
