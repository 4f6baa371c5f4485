//! Alternative text check
//!
//! Every image must carry a non-empty `alt` attribute unless it is
//! explicitly marked decorative. A present-but-generic alt ("image",
//! "photo") is reported at lower severity and left for a human to reword.

use tracing::debug;

use super::Check;
use crate::document::{Document, NodeId};
use crate::models::{Issue, IssueType, NodeHandle, Severity};

const GENERIC_ALT_TERMS: [&str; 10] = [
    "image",
    "photo",
    "picture",
    "img",
    "graphic",
    "icon",
    "click here",
    "read more",
    "learn more",
    "more info",
];

const DECORATIVE_CLASSES: [&str; 5] = ["decorative", "ornamental", "background", "bg", "decoration"];

pub struct AltTextCheck;

impl AltTextCheck {
    pub fn new() -> Self {
        Self
    }

    /// Explicitly marked as decorative: skipped entirely.
    fn is_decorative(doc: &Document, img: NodeId) -> bool {
        if matches!(doc.attr(img, "role"), Some("presentation") | Some("none")) {
            return true;
        }
        if doc
            .classes(img)
            .iter()
            .any(|c| DECORATIVE_CLASSES.iter().any(|d| c.to_lowercase().contains(d)))
        {
            return true;
        }
        // tiny fixed-size images are treated as ornaments
        if let (Some(w), Some(h)) = (doc.attr(img, "width"), doc.attr(img, "height")) {
            if let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) {
                if w <= 32 && h <= 32 {
                    return true;
                }
            }
        }
        false
    }

    fn is_generic_alt(alt: &str) -> bool {
        let lowered = alt.to_lowercase();
        let trimmed = lowered.trim();
        if trimmed.len() < 3 {
            return true;
        }
        GENERIC_ALT_TERMS.iter().any(|term| trimmed == *term)
    }
}

impl Check for AltTextCheck {
    fn name(&self) -> &'static str {
        "alt_text"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::MissingAltText
    }

    fn run(&self, doc: &Document, url: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        for img in doc.nodes_by_tag("img") {
            if !doc.is_visible(img) || Self::is_decorative(doc, img) {
                continue;
            }
            let src = doc.attr(img, "src").unwrap_or("");
            let handle = NodeHandle {
                id: img,
                tag: doc.tag(img).to_string(),
            };

            match doc.attr(img, "alt") {
                None | Some("") => {
                    issues.push(Issue::new(
                        IssueType::MissingAltText,
                        format!("Image missing alt text: {}", src),
                        doc.snippet(img),
                        Some(handle),
                        doc.context(img),
                        "Add descriptive alt text to the image. For decorative images, \
                         use alt=\"\" so screen readers skip them."
                            .to_string(),
                    ));
                }
                Some(alt) if Self::is_generic_alt(alt) => {
                    issues.push(
                        Issue::new(
                            IssueType::MissingAltText,
                            format!("Generic alt text '{}' for image {}", alt, src),
                            doc.snippet(img),
                            Some(handle),
                            doc.context(img),
                            "Describe what the image shows and why it matters in context; \
                             avoid placeholder words like 'image' or 'photo'."
                                .to_string(),
                        )
                        .with_severity(Severity::Moderate)
                        .not_fixable(),
                    );
                }
                Some(_) => {}
            }
        }

        debug!(check = self.name(), url, found = issues.len(), "check complete");
        issues
    }
}
