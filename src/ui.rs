//! Terminal presentation: result rendering and the interactive session.
//!
//! The session collects the API key once, then asks for a URL and a summary
//! length until an empty URL is entered. A failed run prints the error and
//! goes back to the URL prompt.

use crate::agent::{CompletionModel, WordRange};
use crate::config::Config;
use crate::loader::ContentSource;
use crate::pipeline::{Pipeline, PipelineError, SummaryRequest};
use crate::summary::Summary;
use colored::Colorize;
use dialoguer::{Input, Password, Select};
use std::error::Error;

/// Whether we can ask the user questions
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin) && atty::is(atty::Stream::Stdout)
}

/// Pick the API key: explicit flag first, then config/environment.
pub fn resolve_credential(flag: Option<String>, config: &Config) -> Option<String> {
    flag.or_else(|| config.api.groq_key.clone())
        .filter(|key| !key.trim().is_empty())
}

/// Ask for the API key without echoing it, until a non-blank one is given
pub fn prompt_credential() -> dialoguer::Result<String> {
    Password::new()
        .with_prompt("Groq API key")
        .validate_with(|key: &String| check_credential(key))
        .interact()
}

fn check_credential(key: &str) -> Result<(), &'static str> {
    if key.trim().is_empty() {
        Err("the API key cannot be empty")
    } else {
        Ok(())
    }
}

/// Run the interactive session until the user enters an empty URL
pub async fn run<S, M>(
    pipeline: &Pipeline<S, M>,
    config: &Config,
    credential: Option<String>,
) -> anyhow::Result<()>
where
    S: ContentSource,
    M: CompletionModel,
{
    println!("{}", "Summarize YouTube or Website Content".bold());
    println!(
        "{}",
        format!(
            "Paste a YouTube link or website URL to get a concise summary from {}.",
            config.model.name
        )
        .dimmed()
    );

    let mut credential = match credential {
        Some(key) => key,
        None => prompt_credential()?,
    };

    let range = pipeline.range();
    let mut words = config.summary.default_words;

    loop {
        let url: String = Input::new()
            .with_prompt("YouTube or website URL (empty to quit)")
            .allow_empty(true)
            .interact_text()?;
        if url.trim().is_empty() {
            break;
        }

        words = pick_length(range, words)?;

        println!("{}", "⏳ Fetching and summarising...".dimmed());
        let request = SummaryRequest::new(url, credential.clone(), words);
        match pipeline.run(&request).await {
            Ok(summary) => print_summary(&summary)?,
            Err(e) => {
                print_error(&e);
                if matches!(e, PipelineError::MissingCredential) {
                    credential = prompt_credential()?;
                }
            }
        }
        println!();
    }

    Ok(())
}

fn pick_length(range: WordRange, current: u32) -> dialoguer::Result<u32> {
    let choices = range.choices();
    let labels: Vec<String> = choices.iter().map(|n| format!("{n} words")).collect();
    let default = default_choice(&choices, current);

    let index = Select::new()
        .with_prompt("Summary length")
        .items(labels.as_slice())
        .default(default)
        .interact()?;

    Ok(choices[index])
}

/// Index of the choice closest to `current`
fn default_choice(choices: &[u32], current: u32) -> usize {
    choices
        .iter()
        .enumerate()
        .min_by_key(|(_, n)| n.abs_diff(current))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Print a summary, with the video info block for video links
pub fn print_summary(summary: &Summary) -> serde_json::Result<()> {
    println!("{}", "✅ Summary generated successfully!".green().bold());
    println!(
        "{}",
        format!(
            "{} words (asked for about {})",
            summary.word_count(),
            summary.target_words
        )
        .dimmed()
    );
    println!();
    println!("{}", summary.text.trim());

    if let Some(metadata) = &summary.metadata {
        println!();
        println!("{}", "🎬 Video Info".bold());
        println!("{}", serde_json::to_string_pretty(metadata)?);
    }

    Ok(())
}

/// Print the user-facing headline followed by the underlying cause chain
pub fn print_error(error: &PipelineError) {
    eprintln!("{} {}", "✗".red().bold(), error.headline().red().bold());
    eprintln!("  {}", error);

    let mut cause = error.source();
    while let Some(inner) = cause {
        eprintln!("  caused by: {}", inner);
        cause = inner.source();
    }
}
