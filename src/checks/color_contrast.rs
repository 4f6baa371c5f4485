//! Color contrast check
//!
//! Computes the WCAG relative-luminance contrast ratio for text-bearing
//! elements whose foreground and background colors can both be resolved
//! from inline styles (on the element or inherited from an ancestor).
//! External stylesheets are not cascaded, so this is an approximation of
//! rendered contrast, not a full computed-style evaluation. Severity scales
//! with how far the ratio falls below the required threshold.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::Check;
use crate::document::style::{contrast_ratio, parse_color, Color};
use crate::document::{Document, NodeId};
use crate::models::{Issue, IssueType, NodeHandle, Severity};

const TEXT_TAGS: [&str; 15] = [
    "p", "span", "div", "a", "h1", "h2", "h3", "h4", "h5", "h6", "li", "td", "th", "label",
    "button",
];

static FONT_SIZE_PX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)(?:\.\d+)?\s*px$").expect("font size pattern"));

pub struct ColorContrastCheck {
    normal_threshold: f64,
    large_threshold: f64,
}

impl ColorContrastCheck {
    pub fn new(normal_threshold: f64, large_threshold: f64) -> Self {
        Self {
            normal_threshold,
            large_threshold,
        }
    }

    fn foreground(doc: &Document, id: NodeId) -> Option<Color> {
        doc.effective_style(id, "color")
            .and_then(|v| parse_color(&v))
    }

    fn background(doc: &Document, id: NodeId) -> Option<Color> {
        if let Some(v) = doc.effective_style(id, "background-color") {
            return parse_color(&v);
        }
        // `background` shorthand: first token may be a color
        doc.effective_style(id, "background")
            .and_then(|v| parse_color(v.split_whitespace().next().unwrap_or("")))
    }

    /// Font size in px, from inline style or heading defaults.
    fn font_size(doc: &Document, id: NodeId) -> u32 {
        if let Some(value) = doc.effective_style(id, "font-size") {
            if let Some(captures) = FONT_SIZE_PX.captures(value.trim()) {
                if let Ok(size) = captures[1].parse::<u32>() {
                    return size;
                }
            }
        }
        match doc.tag(id) {
            "h1" => 32,
            "h2" => 24,
            "h3" => 20,
            "h4" => 18,
            "h5" => 16,
            "h6" => 14,
            _ => 16,
        }
    }

    fn is_bold(doc: &Document, id: NodeId) -> bool {
        if matches!(doc.tag(id), "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "strong" | "b") {
            return true;
        }
        match doc.effective_style(id, "font-weight").as_deref() {
            Some("bold") | Some("700") | Some("800") | Some("900") => true,
            _ => false,
        }
    }

    /// Large text gets the relaxed threshold: >= 18px, or >= 14px bold.
    fn required_ratio(&self, doc: &Document, id: NodeId) -> f64 {
        let size = Self::font_size(doc, id);
        let large = if Self::is_bold(doc, id) {
            size >= 14
        } else {
            size >= 18
        };
        if large {
            self.large_threshold
        } else {
            self.normal_threshold
        }
    }

    fn severity_for(shortfall: f64) -> Severity {
        if shortfall > 2.0 {
            Severity::Critical
        } else if shortfall > 1.0 {
            Severity::Moderate
        } else {
            Severity::Low
        }
    }
}

impl Check for ColorContrastCheck {
    fn name(&self) -> &'static str {
        "color_contrast"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::PoorColorContrast
    }

    fn run(&self, doc: &Document, url: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        for id in doc.nodes_by_tags(&TEXT_TAGS) {
            if !doc.is_visible(id) || doc.direct_text(id).is_empty() {
                continue;
            }
            let (Some(fg), Some(bg)) = (Self::foreground(doc, id), Self::background(doc, id))
            else {
                // unresolvable colors: skip the instance, never guess
                continue;
            };

            let ratio = contrast_ratio(fg, bg);
            let required = self.required_ratio(doc, id);
            if ratio >= required {
                continue;
            }

            let rounded = (ratio * 100.0).round() / 100.0;
            let text = doc.text(id);
            let excerpt: String = text.chars().take(50).collect();
            issues.push(
                Issue::new(
                    IssueType::PoorColorContrast,
                    format!(
                        "Insufficient color contrast: {}:1 (requires {}:1)",
                        rounded, required
                    ),
                    format!("<{}>{}</{}>", doc.tag(id), excerpt, doc.tag(id)),
                    Some(NodeHandle {
                        id,
                        tag: doc.tag(id).to_string(),
                    }),
                    doc.context(id),
                    format!(
                        "Raise the contrast ratio to at least {}:1; current colors are \
                         foreground rgb({},{},{}) on background rgb({},{},{}).",
                        required, fg.r, fg.g, fg.b, bg.r, bg.g, bg.b
                    ),
                )
                .with_severity(Self::severity_for(required - ratio)),
            );
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
        ColorContrastCheck::new(4.5, 3.0).run(&doc, "https://example.com")
    }

    #[test]
    fn test_low_contrast_pair_is_flagged() {
        let issues = run(
            r#"<html><body>
            <p style="color: #cccccc; background-color: #ffffff;">hard to read</p>
            </body></html>"#,
        );
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::PoorColorContrast);
        assert!(issues[0].fixable);
    }

    #[test]
    fn test_high_contrast_pair_passes() {
        let issues = run(
            r#"<html><body>
            <p style="color: #000000; background-color: #ffffff;">plenty of contrast</p>
            </body></html>"#,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_colors_inherited_from_ancestor() {
        let issues = run(
            r#"<html><body>
            <div style="color: #777777; background-color: #888888;">
            <p>inherits a bad pair</p>
            </div></body></html>"#,
        );
        // only the p carries text directly; the wrapping div is not flagged
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_unparsable_color_skips_instance() {
        let issues = run(
            r#"<html><body>
            <p style="color: var(--ink); background-color: #ffffff;">tokens ignored</p>
            </body></html>"#,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_large_text_uses_relaxed_threshold() {
        // #8a8a8a on white is ~3.1:1 - fails normal text (4.5) but passes large (3.0)
        let html_normal = r#"<html><body>
            <p style="color: #8a8a8a; background-color: #ffffff;">normal sized</p>
            </body></html>"#;
        let html_large = r#"<html><body>
            <p style="color: #8a8a8a; background-color: #ffffff; font-size: 24px">large sized</p>
            </body></html>"#;
        assert_eq!(run(html_normal).len(), 1);
        assert!(run(html_large).is_empty());
    }

    #[test]
    fn test_severity_scales_with_shortfall() {
        // #808080 on white is ~3.5:1, under half a point short -> low
        let near = run(
            r#"<html><body>
            <p style="color: #808080; background-color: #ffffff;">close call</p>
            </body></html>"#,
        );
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].severity, Severity::Low);

        let far = run(
            r#"<html><body>
            <p style="color: #ffffff; background-color: #fefefe;">invisible</p>
            </body></html>"#,
        );
        assert_eq!(far.len(), 1);
        assert_eq!(far[0].severity, Severity::Critical);
    }
}
