use serde::{Deserialize, Serialize};

use crate::document::NodeId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[serde(rename = "critical")]
    Critical,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "low")]
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Moderate => "moderate",
            Severity::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "critical" => Some(Severity::Critical),
            "moderate" => Some(Severity::Moderate),
            "low" => Some(Severity::Low),
            _ => None,
        }
    }

    pub fn numeric_value(&self) -> i32 {
        match self {
            Severity::Critical => 3,
            Severity::Moderate => 2,
            Severity::Low => 1,
        }
    }
}

/// Coarse grouping of issue types, used for presentation and filtering only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Visual,
    Auditory,
    Cognitive,
    Keyboard,
    Forms,
    Content,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Visual => "visual",
            Category::Auditory => "auditory",
            Category::Cognitive => "cognitive",
            Category::Keyboard => "keyboard",
            Category::Forms => "forms",
            Category::Content => "content",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    MissingAltText,
    PoorColorContrast,
    ImproperHeadingHierarchy,
    MissingFormLabel,
    NonDescriptiveLink,
    InvalidAria,
    MissingLandmark,
    KeyboardNavigationIssue,
    MissingMediaCaptions,
}

impl IssueType {
    pub const ALL: [IssueType; 9] = [
        IssueType::MissingAltText,
        IssueType::PoorColorContrast,
        IssueType::ImproperHeadingHierarchy,
        IssueType::MissingFormLabel,
        IssueType::NonDescriptiveLink,
        IssueType::InvalidAria,
        IssueType::MissingLandmark,
        IssueType::KeyboardNavigationIssue,
        IssueType::MissingMediaCaptions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::MissingAltText => "missing_alt_text",
            IssueType::PoorColorContrast => "poor_color_contrast",
            IssueType::ImproperHeadingHierarchy => "improper_heading_hierarchy",
            IssueType::MissingFormLabel => "missing_form_label",
            IssueType::NonDescriptiveLink => "non_descriptive_link",
            IssueType::InvalidAria => "invalid_aria",
            IssueType::MissingLandmark => "missing_landmark",
            IssueType::KeyboardNavigationIssue => "keyboard_navigation_issue",
            IssueType::MissingMediaCaptions => "missing_media_captions",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "missing_alt_text" => Some(IssueType::MissingAltText),
            "poor_color_contrast" => Some(IssueType::PoorColorContrast),
            "improper_heading_hierarchy" => Some(IssueType::ImproperHeadingHierarchy),
            "missing_form_label" => Some(IssueType::MissingFormLabel),
            "non_descriptive_link" => Some(IssueType::NonDescriptiveLink),
            "invalid_aria" => Some(IssueType::InvalidAria),
            "missing_landmark" => Some(IssueType::MissingLandmark),
            "keyboard_navigation_issue" => Some(IssueType::KeyboardNavigationIssue),
            "missing_media_captions" => Some(IssueType::MissingMediaCaptions),
            _ => None,
        }
    }

    /// Whether the fix engine carries an automated remediation for this type.
    ///
    /// This is the single source of truth for the fix dispatch table; the
    /// engine's `apply` match covers exactly the types that return true here.
    pub fn auto_fixable(&self) -> bool {
        matches!(
            self,
            IssueType::MissingAltText
                | IssueType::PoorColorContrast
                | IssueType::ImproperHeadingHierarchy
                | IssueType::MissingFormLabel
                | IssueType::InvalidAria
                | IssueType::KeyboardNavigationIssue
        )
    }
}

/// Default severity and category for an issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub severity: Severity,
    pub category: Category,
}

/// Pure, total lookup from issue type to its default classification.
///
/// Checks that scale severity with violation magnitude (color contrast,
/// inadequate alt text) override the severity on the issue itself; the
/// category always comes from here.
pub fn classify(issue_type: IssueType) -> Classification {
    let (severity, category) = match issue_type {
        IssueType::MissingAltText => (Severity::Critical, Category::Visual),
        IssueType::PoorColorContrast => (Severity::Moderate, Category::Visual),
        IssueType::ImproperHeadingHierarchy => (Severity::Moderate, Category::Cognitive),
        IssueType::MissingFormLabel => (Severity::Critical, Category::Forms),
        IssueType::NonDescriptiveLink => (Severity::Moderate, Category::Content),
        IssueType::InvalidAria => (Severity::Moderate, Category::Cognitive),
        IssueType::MissingLandmark => (Severity::Moderate, Category::Cognitive),
        IssueType::KeyboardNavigationIssue => (Severity::Moderate, Category::Keyboard),
        IssueType::MissingMediaCaptions => (Severity::Moderate, Category::Auditory),
    };
    Classification { severity, category }
}

/// Locator for the node an issue refers to.
///
/// The id is an opaque handle into the document's node arena, stable for the
/// lifetime of that document session. The tag is recorded at scan time and
/// re-validated before any fix touches the node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    pub id: NodeId,
    pub tag: String,
}

/// A single accessibility defect detected on a page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub issue_type: IssueType,
    pub severity: Severity,
    pub category: Category,
    pub description: String,
    /// Serialized fragment of the offending markup, for human review
    pub element: String,
    /// Locator for re-finding the node; absent for page-level issues
    pub target: Option<NodeHandle>,
    /// Short structural context, e.g. the enclosing tag chain
    pub context: String,
    pub suggested_fix: String,
    pub fixable: bool,
}

impl Issue {
    /// Build an issue with severity, category and fixability derived from
    /// the issue type. Element-level checks pass a target handle; page-level
    /// issues pass `None`.
    pub fn new(
        issue_type: IssueType,
        description: String,
        element: String,
        target: Option<NodeHandle>,
        context: String,
        suggested_fix: String,
    ) -> Self {
        let Classification { severity, category } = classify(issue_type);
        Self {
            issue_type,
            severity,
            category,
            description,
            element,
            target,
            context,
            suggested_fix,
            fixable: issue_type.auto_fixable(),
        }
    }

    /// Override the default severity (used by magnitude-scaled checks).
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Mark a normally-fixable issue type as requiring human judgment for
    /// this particular instance.
    pub fn not_fixable(mut self) -> Self {
        self.fixable = false;
        self
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.severity.as_str().to_uppercase(),
            self.issue_type.as_str(),
            self.description
        )
    }
}
