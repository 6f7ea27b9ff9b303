//! Content loading.
//!
//! Turns a classified URL into [`ExtractedDocument`]s, either through the
//! video metadata extractor or the web page fetcher.

pub mod video;
pub mod web;

use crate::classify::ContentKind;
use crate::config::FetchConfig;
use crate::document::ExtractedDocument;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

pub use video::{video_document, VideoInfo, VideoMetadataSource, YtDlp};
pub use web::{PageFetcher, WebFetcher};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),
    #[error("{url} answered with HTTP {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("video extraction failed: {0}")]
    Video(String),
    #[error("malformed extractor response: {0}")]
    MalformedResponse(String),
    #[error("no content extracted")]
    NoContent,
}

/// Anything that can load documents for a classified URL.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn load(
        &self,
        url: &str,
        kind: ContentKind,
    ) -> Result<Vec<ExtractedDocument>, LoadError>;
}

/// Dispatches video links to a [`VideoMetadataSource`] and everything else
/// to a [`PageFetcher`].
pub struct ContentLoader<V = YtDlp, P = WebFetcher> {
    video: V,
    pages: P,
}

impl ContentLoader {
    /// Build the production loader from configuration
    pub fn from_config(config: &FetchConfig) -> Result<Self, LoadError> {
        Ok(Self::new(
            YtDlp::new(config.yt_dlp.clone()),
            WebFetcher::new(config)?,
        ))
    }
}

impl<V, P> ContentLoader<V, P>
where
    V: VideoMetadataSource,
    P: PageFetcher,
{
    pub fn new(video: V, pages: P) -> Self {
        Self { video, pages }
    }
}

#[async_trait]
impl<V, P> ContentSource for ContentLoader<V, P>
where
    V: VideoMetadataSource,
    P: PageFetcher,
{
    async fn load(
        &self,
        url: &str,
        kind: ContentKind,
    ) -> Result<Vec<ExtractedDocument>, LoadError> {
        match kind {
            ContentKind::VideoLink => {
                debug!(url, "extracting video metadata");
                let info = self.video.fetch_info(url).await?;
                Ok(vec![video_document(url, info)])
            }
            ContentKind::WebLink => {
                debug!(url, "fetching web page");
                let docs = self.pages.fetch(&[url.to_string()]).await?;
                if docs.is_empty() {
                    return Err(LoadError::NoContent);
                }
                info!(url, documents = docs.len(), "web page loaded");
                Ok(docs)
            }
        }
    }
}
