//! Media captions check
//!
//! Videos need a caption or subtitle track for users who cannot hear the
//! audio. A `<video>` without a `<track kind="captions">` (or subtitles)
//! child is flagged. Generating captions is not something a scanner can do,
//! so this is never auto-fixed.

use tracing::debug;

use super::Check;
use crate::document::Document;
use crate::models::{Issue, IssueType, NodeHandle};

pub struct MediaCaptionsCheck;

impl MediaCaptionsCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Check for MediaCaptionsCheck {
    fn name(&self) -> &'static str {
        "media"
    }

    fn issue_type(&self) -> IssueType {
        IssueType::MissingMediaCaptions
    }

    fn run(&self, doc: &Document, url: &str) -> Vec<Issue> {
        let mut issues = Vec::new();

        for video in doc.nodes_by_tag("video") {
            let has_captions = doc.children(video).iter().any(|child| {
                doc.tag(*child) == "track"
                    && matches!(
                        doc.attr(*child, "kind"),
                        Some("captions") | Some("subtitles")
                    )
            });
            if has_captions {
                continue;
            }

            issues.push(Issue::new(
                IssueType::MissingMediaCaptions,
                format!(
                    "Video '{}' has no caption track",
                    doc.attr(video, "src").unwrap_or("inline source")
                ),
                doc.snippet(video),
                Some(NodeHandle {
                    id: video,
                    tag: "video".to_string(),
                }),
                doc.context(video),
                "Add a <track kind=\"captions\"> element with a WebVTT file covering \
                 the spoken audio."
                    .to_string(),
            ));
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
        MediaCaptionsCheck::new().run(&doc, "https://example.com")
    }

    #[test]
    fn test_video_without_track_flagged() {
        let issues = run(r#"<html><body><video src="talk.mp4"></video></body></html>"#);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].fixable);
    }

    #[test]
    fn test_caption_track_passes() {
        let issues = run(
            r#"<html><body><video src="talk.mp4">
            <track kind="captions" src="talk.vtt" srclang="en">
            </video></body></html>"#,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_subtitles_track_passes() {
        let issues = run(
            r#"<html><body><video src="talk.mp4">
            <track kind="subtitles" src="talk.en.vtt" srclang="en">
            </video></body></html>"#,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_chapters_track_does_not_count() {
        let issues = run(
            r#"<html><body><video src="talk.mp4">
            <track kind="chapters" src="chapters.vtt">
            </video></body></html>"#,
        );
        assert_eq!(issues.len(), 1);
    }
}
