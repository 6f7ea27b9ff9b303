//! Video metadata extraction through `yt-dlp`.
//!
//! Only metadata is requested; nothing is downloaded.

use super::LoadError;
use crate::document::ExtractedDocument;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";

/// Arguments for a quiet, metadata-only extraction
const YT_DLP_ARGS: &[&str] = &[
    "--dump-single-json",
    "--skip-download",
    "--no-playlist",
    "--no-warnings",
    "--quiet",
];

/// The subset of extractor output we care about. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VideoInfo {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
}

#[async_trait]
pub trait VideoMetadataSource: Send + Sync {
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo, LoadError>;
}

/// Runs the `yt-dlp` executable.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[async_trait]
impl VideoMetadataSource for YtDlp {
    async fn fetch_info(&self, url: &str) -> Result<VideoInfo, LoadError> {
        debug!(program = %self.program, url, "running video extractor");

        let output = Command::new(&self.program)
            .args(YT_DLP_ARGS)
            .arg(url)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| LoadError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                format!("{} exited with {}", self.program, output.status)
            } else {
                stderr
            };
            return Err(LoadError::Video(detail));
        }

        parse_info(&output.stdout)
    }
}

/// Parse the JSON document printed by the extractor
pub fn parse_info(raw: &[u8]) -> Result<VideoInfo, LoadError> {
    serde_json::from_slice(raw).map_err(|e| LoadError::MalformedResponse(e.to_string()))
}

/// Build the single document describing a video
pub fn video_document(url: &str, info: VideoInfo) -> ExtractedDocument {
    let title = non_empty(info.title).unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    let channel = non_empty(info.uploader).unwrap_or_else(|| UNKNOWN_CHANNEL.to_string());

    ExtractedDocument::new(info.description.unwrap_or_default())
        .with_metadata("title", title)
        .with_metadata("channel", channel)
        .with_metadata("url", url)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
