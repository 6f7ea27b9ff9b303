//! Web page fetching and text extraction.
//!
//! Uses reqwest for fetching and scraper for HTML parsing.

use super::LoadError;
use crate::config::FetchConfig;
use crate::document::ExtractedDocument;
use async_trait::async_trait;
use lazy_static::lazy_static;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

/// Text blocks shorter than this are navigation noise
const MIN_BLOCK_CHARS: usize = 20;

/// Regions that usually hold the readable part of a page, in order of preference
const MAIN_SELECTORS: &[&str] = &["article", "main", "[role='main']", ".content", "#content"];

lazy_static! {
    static ref TITLE: Selector = Selector::parse("title").unwrap();
    static ref H1: Selector = Selector::parse("h1").unwrap();
    static ref BLOCKS: Selector = Selector::parse("p, h1, h2, h3, h4, h5, h6, li").unwrap();
    static ref MAIN_REGIONS: Vec<Selector> = MAIN_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect();
}

/// Fetches a list of pages and turns each into a document.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, urls: &[String]) -> Result<Vec<ExtractedDocument>, LoadError>;
}

/// HTTP page fetcher. Certificate verification is off so that sites with
/// broken TLS setups can still be summarised.
#[derive(Debug, Clone)]
pub struct WebFetcher {
    client: Client,
}

impl WebFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, LoadError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for WebFetcher {
    async fn fetch(&self, urls: &[String]) -> Result<Vec<ExtractedDocument>, LoadError> {
        let mut docs = Vec::with_capacity(urls.len());

        for url in urls {
            let response = self.client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(LoadError::HttpStatus {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }

            let html = response.text().await?;
            match extract_document(url, &html) {
                Some(doc) => docs.push(doc),
                None => warn!(url, "page has no readable text"),
            }
        }

        Ok(docs)
    }
}

/// Extract a document from raw HTML, or `None` if the page has no readable text
pub fn extract_document(url: &str, html: &str) -> Option<ExtractedDocument> {
    let document = Html::parse_document(html);
    let mut doc = ExtractedDocument::new(extract_text(&document));

    if doc.is_blank() {
        return None;
    }
    debug!(url, chars = doc.text.len(), "extracted page text");

    doc = doc.with_metadata("source", url);
    if let Some(title) = extract_title(&document) {
        doc = doc.with_metadata("title", title);
    }
    Some(doc)
}

/// Extract the page title from <title> or <h1>
fn extract_title(document: &Html) -> Option<String> {
    [&*TITLE, &*H1].into_iter().find_map(|selector| {
        document
            .select(selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|title| !title.is_empty())
    })
}

/// Extract readable text, preferring the main content region
fn extract_text(document: &Html) -> String {
    for selector in MAIN_REGIONS.iter() {
        if let Some(region) = document.select(selector).next() {
            let text = collect_blocks(region);
            if !text.trim().is_empty() {
                return text;
            }
        }
    }

    collect_blocks(document.root_element())
}

/// Join paragraphs, headings and list items found below `root`.
/// Blocks nested inside another block are covered by the outer one.
fn collect_blocks(root: ElementRef<'_>) -> String {
    root.select(&BLOCKS)
        .filter(|element| !inside_block(element, &root))
        .map(|element| {
            element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|block| block.len() > MIN_BLOCK_CHARS)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Whether a block element sits within another block below `root`
fn inside_block(element: &ElementRef<'_>, root: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .take_while(|node| node.id() != root.id())
        .filter_map(ElementRef::wrap)
        .any(|ancestor| BLOCKS.matches(&ancestor))
}
