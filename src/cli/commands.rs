//! CLI commands implementation.

use std::path::{Path, PathBuf};

use anyhow::bail;
use clap::{Parser, Subcommand};
use console::style;
use tracing::info;

use crate::analysis::{extract_hints, WordData};
use crate::config::{AnswerMode, Settings};
use crate::llm::CompletionClient;
use crate::ocr::TextExtractor;
use crate::qa::{AnswerProvider, RuleBasedEngine};

#[derive(Parser)]
#[command(name = "reportqa")]
#[command(about = "Grounded question answering over OCR-extracted report text")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a report and print structured layout hints
    Analyze {
        /// Image or plain-text file to analyze
        file: PathBuf,
    },

    /// Answer a question about a report's content
    Ask {
        /// Image or plain-text file containing the report
        file: PathBuf,
        /// The question to answer
        question: String,
        /// Answer strategy: "rules" or "remote" (overrides settings)
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Check availability of external OCR tools
    Tools,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze { file } => analyze(&file),
        Commands::Ask {
            file,
            question,
            mode,
        } => ask(&settings, &file, &question, mode.as_deref()).await,
        Commands::Tools => tools(),
    }
}

/// Load document text, running OCR for image files.
fn load_document(path: &Path) -> anyhow::Result<(String, Option<WordData>)> {
    if TextExtractor::is_supported_image(path) {
        info!("running OCR on {}", path.display());
        let result = TextExtractor::new().extract_image(path)?;
        Ok((result.text, result.words))
    } else {
        Ok((std::fs::read_to_string(path)?, None))
    }
}

fn analyze(file: &Path) -> anyhow::Result<()> {
    let (text, words) = load_document(file)?;
    let hints = extract_hints(&text, words.as_ref());

    println!("{}", style("Extracted text:").bold());
    println!("{}", text.trim_end());
    println!();
    println!("{}", style("Structured hints:").bold());
    println!("{}", serde_json::to_string_pretty(&hints)?);
    Ok(())
}

async fn ask(
    settings: &Settings,
    file: &Path,
    question: &str,
    mode: Option<&str>,
) -> anyhow::Result<()> {
    let mode = match mode {
        Some(raw) => match AnswerMode::from_str(raw) {
            Some(mode) => mode,
            None => bail!("unknown answer mode: {} (expected \"rules\" or \"remote\")", raw),
        },
        None => settings.mode,
    };

    let (text, _) = load_document(file)?;

    let provider: Box<dyn AnswerProvider> = match mode {
        AnswerMode::Rules => Box::new(RuleBasedEngine::new()),
        AnswerMode::Remote => Box::new(CompletionClient::new(settings.completion.clone())),
    };

    let answer = provider.answer(&text, question).await;
    println!("{} {}", style("Answer:").bold().green(), answer);
    Ok(())
}

fn tools() -> anyhow::Result<()> {
    for (tool, available) in TextExtractor::check_tools() {
        let status = if available {
            style("found").green()
        } else {
            style("missing").red()
        };
        println!("{}: {}", tool, status);
    }
    Ok(())
}
