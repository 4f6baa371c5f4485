use serde::{Deserialize, Serialize};

use super::issue::{IssueType, NodeHandle};

/// One attribute mutation performed by a remediation.
///
/// `None` on either side means the attribute is absent in that state; an
/// empty string means present-but-empty. The distinction matters on revert:
/// restoring `alt=""` and removing `alt` entirely are different documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttrChange {
    pub name: String,
    pub prior: Option<String>,
    pub new: Option<String>,
}

/// A remediation that was actually applied to a live document.
///
/// This is the unit of reversal: every attribute the fix touched is listed
/// with its pre-fix value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedFix {
    pub issue_type: IssueType,
    pub target: NodeHandle,
    pub changes: Vec<AttrChange>,
}

impl AppliedFix {
    pub fn new(issue_type: IssueType, target: NodeHandle, changes: Vec<AttrChange>) -> Self {
        Self {
            issue_type,
            target,
            changes,
        }
    }
}
