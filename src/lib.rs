//! # Linksum
//!
//! Summarise a web page or YouTube video with a hosted LLM.
//!
//! ## Pipeline
//!
//! - **classify**: validates the URL and decides between video and web links
//! - **loader**: pulls text from `yt-dlp` metadata or from the page HTML
//! - **agent**: stuffs the text into one prompt and asks the completion model
//!
//! [`Pipeline`] ties the three together; [`ui`] renders the result on the terminal.

pub mod agent;
pub mod classify;
pub mod config;
pub mod document;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod summary;
pub mod ui;

pub use classify::{classify, ContentKind};
pub use config::Config;
pub use document::ExtractedDocument;
pub use pipeline::{Pipeline, PipelineError, SummaryRequest};
pub use summary::Summary;
