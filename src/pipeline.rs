//! The summarisation pipeline: validate, load, summarise.
//!
//! Each run is a single pass `Idle -> Validating -> Loading -> Summarizing ->
//! Done`, dropping to `Failed` from any working stage. Nothing is retried
//! and nothing is kept between runs.

use crate::agent::{self, CompletionModel, GroqClient, SummarizationError, WordRange};
use crate::classify::{classify, ValidationError};
use crate::config::Config;
use crate::loader::{ContentLoader, ContentSource, LoadError};
use crate::summary::Summary;
use chrono::Utc;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Everything the caller supplies for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub url: String,
    pub credential: String,
    pub target_words: u32,
}

impl SummaryRequest {
    pub fn new(url: impl Into<String>, credential: impl Into<String>, target_words: u32) -> Self {
        Self {
            url: url.into(),
            credential: credential.into(),
            target_words,
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidUrl(#[from] ValidationError),
    #[error("API credential is required")]
    MissingCredential,
    #[error("target length {target} is outside {min}..={max} words")]
    TargetOutOfRange { target: u32, min: u32, max: u32 },
    #[error("failed to load content")]
    Load(#[from] LoadError),
    #[error("failed to summarise content")]
    Summarization(#[from] SummarizationError),
}

impl PipelineError {
    /// Short message for the user; the underlying cause is the error's `source()`
    pub fn headline(&self) -> &'static str {
        match self {
            PipelineError::InvalidUrl(_) => {
                "Invalid URL. Please provide a valid YouTube or website link."
            }
            PipelineError::MissingCredential => {
                "Please enter both the Groq API key and a valid URL to continue."
            }
            PipelineError::TargetOutOfRange { .. } => "Requested summary length is out of range.",
            PipelineError::Load(_) => "An error occurred while fetching the content.",
            PipelineError::Summarization(_) => "An error occurred while generating the summary.",
        }
    }
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Validating,
    Loading,
    Summarizing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Validating => "validating",
            Stage::Loading => "loading",
            Stage::Summarizing => "summarizing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Wires a content source to a completion model.
pub struct Pipeline<S = ContentLoader, M = GroqClient> {
    source: S,
    model: M,
    range: WordRange,
}

impl Pipeline {
    /// Build the production pipeline: yt-dlp and HTTP loaders, Groq model
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let source = ContentLoader::from_config(&config.fetch)?;
        let model = GroqClient::new(
            &config.model,
            Duration::from_secs(config.fetch.timeout_secs),
        )?;
        Ok(Self::new(source, model, config.word_range()))
    }
}

impl<S, M> Pipeline<S, M>
where
    S: ContentSource,
    M: CompletionModel,
{
    pub fn new(source: S, model: M, range: WordRange) -> Self {
        Self {
            source,
            model,
            range,
        }
    }

    pub fn range(&self) -> WordRange {
        self.range
    }

    /// Run the whole chain for one request
    pub async fn run(&self, request: &SummaryRequest) -> Result<Summary, PipelineError> {
        let mut stage = Stage::Idle;
        let result = self.execute(request, &mut stage).await;

        match &result {
            Ok(summary) => {
                advance(&mut stage, Stage::Done);
                info!(url = %summary.url, kind = %summary.kind, "summary ready");
            }
            Err(e) => {
                warn!(failed_in = %stage, error = %e, "pipeline failed");
                advance(&mut stage, Stage::Failed);
            }
        }

        result
    }

    async fn execute(
        &self,
        request: &SummaryRequest,
        stage: &mut Stage,
    ) -> Result<Summary, PipelineError> {
        advance(stage, Stage::Validating);
        let url = request.url.trim();
        let kind = classify(url)?;
        let credential = request.credential.trim();
        if credential.is_empty() {
            return Err(PipelineError::MissingCredential);
        }
        if !self.range.contains(request.target_words) {
            return Err(PipelineError::TargetOutOfRange {
                target: request.target_words,
                min: self.range.min,
                max: self.range.max,
            });
        }

        advance(stage, Stage::Loading);
        let docs = self.source.load(url, kind).await?;

        advance(stage, Stage::Summarizing);
        let text = agent::summarize(
            &self.model,
            &docs,
            request.target_words,
            credential,
            self.range,
        )
        .await?;

        let metadata = if kind.is_video() {
            docs.first().map(|doc| doc.metadata.clone())
        } else {
            None
        };

        Ok(Summary {
            text,
            kind,
            url: url.to_string(),
            target_words: request.target_words,
            metadata,
            generated_at: Utc::now(),
        })
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "stage");
    *stage = next;
}
