//! URL classification.
//!
//! Decides whether a user-supplied URL is usable and which loader should
//! handle it. Pure string work, no network access.

use reqwest::Url;
use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use thiserror::Error;

/// Host patterns that mark a URL as a video link.
const VIDEO_HOST_PATTERNS: &[&str] = &["youtube.com", "youtu.be"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// What kind of content a URL points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContentKind {
    /// A video hosting link, loaded through the video metadata extractor
    #[serde(rename = "video")]
    VideoLink,
    /// Anything else, loaded as a web page
    #[serde(rename = "web")]
    WebLink,
}

impl ContentKind {
    pub fn is_video(self) -> bool {
        matches!(self, ContentKind::VideoLink)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::VideoLink => write!(f, "video"),
            ContentKind::WebLink => write!(f, "web"),
        }
    }
}

/// Validate `url` and classify it as a video or web link.
pub fn classify(url: &str) -> Result<ContentKind, ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::InvalidUrl("URL is required".to_string()));
    }

    validate(url)?;

    if is_video_url(url) {
        Ok(ContentKind::VideoLink)
    } else {
        Ok(ContentKind::WebLink)
    }
}

/// Check scheme and host the way a browser address bar would accept them
fn validate(raw: &str) -> Result<(), ValidationError> {
    let parsed = Url::parse(raw).map_err(|e| ValidationError::InvalidUrl(format!("{raw}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::InvalidUrl(format!(
                "unsupported scheme '{other}'"
            )))
        }
    }

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ValidationError::InvalidUrl(format!("{raw}: missing host")))?;

    if is_ip_host(host) || host.eq_ignore_ascii_case("localhost") {
        return Ok(());
    }

    let labels: Vec<&str> = host.trim_end_matches('.').split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(ValidationError::InvalidUrl(format!(
            "{raw}: host '{host}' is not a domain name"
        )));
    }

    Ok(())
}

fn is_ip_host(host: &str) -> bool {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok()
}

fn is_video_url(url: &str) -> bool {
    let lowered = url.to_ascii_lowercase();
    VIDEO_HOST_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_links_are_videos() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "http://m.youtube.com/watch?v=abc",
            "https://WWW.YOUTUBE.COM/shorts/xyz",
        ] {
            assert_eq!(classify(url), Ok(ContentKind::VideoLink), "{url}");
        }
    }

    #[test]
    fn other_links_are_web() {
        for url in [
            "https://example.com",
            "http://blog.rust-lang.org/2024/01/01/post.html",
            "http://localhost:8080/page",
            "http://127.0.0.1/index.html",
            "https://vimeo.com/12345",
        ] {
            assert_eq!(classify(url), Ok(ContentKind::WebLink), "{url}");
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(
            classify("  https://youtu.be/abc \n"),
            Ok(ContentKind::VideoLink)
        );
    }

    #[test]
    fn rejects_non_urls() {
        for input in [
            "",
            "   ",
            "not a url",
            "youtube.com/watch?v=abc",
            "ftp://example.com/file",
            "https://",
            "https://localhostish",
            "mailto:someone@example.com",
        ] {
            assert!(
                matches!(classify(input), Err(ValidationError::InvalidUrl(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn kind_display() {
        assert_eq!(ContentKind::VideoLink.to_string(), "video");
        assert_eq!(ContentKind::WebLink.to_string(), "web");
        assert!(ContentKind::VideoLink.is_video());
        assert!(!ContentKind::WebLink.is_video());
    }
}
