//! Linksum CLI - summarise web pages and YouTube videos
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use linksum::{logging, ui, Config, Pipeline, SummaryRequest};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "linksum")]
#[command(author, version, about = "Summarise web pages and YouTube videos with an LLM", long_about = None)]
struct Cli {
    /// Path to a linksum.toml config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a web page or video by URL
    Summarise {
        /// URL to summarise
        url: String,
        /// Approximate summary length in words
        #[arg(short, long)]
        words: Option<u32>,
        /// Groq API key (defaults to GROQ_API_KEY or the config file)
        #[arg(long)]
        api_key: Option<String>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print shell completions
    Completions {
        shell: Shell,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Some(Commands::Summarise {
            url,
            words,
            api_key,
            json,
        }) => {
            let credential = match ui::resolve_credential(api_key, &config) {
                Some(key) => key,
                None if ui::is_interactive() => ui::prompt_credential()?,
                None => String::new(),
            };
            let words = words.unwrap_or(config.summary.default_words);

            let pipeline = Pipeline::from_config(&config)?;
            let request = SummaryRequest::new(url, credential, words);

            match pipeline.run(&request).await {
                Ok(summary) if json => println!("{}", summary.to_json()?),
                Ok(summary) => ui::print_summary(&summary)?,
                Err(e) => {
                    ui::print_error(&e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "linksum", &mut std::io::stdout());
        }
        Some(Commands::Config) => {
            print!("{}", config.to_toml()?);
        }
        None => {
            if !ui::is_interactive() {
                anyhow::bail!("no terminal attached; use `linksum summarise <URL>`");
            }
            let pipeline = Pipeline::from_config(&config)?;
            let credential = ui::resolve_credential(None, &config);
            ui::run(&pipeline, &config, credential).await?;
        }
    }

    Ok(())
}
