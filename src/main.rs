//! # Codebook CLI
//!
//! Answers coding prompts from curated example books, streaming each answer
//! chunk by chunk the way a live model would.
//!
//! Usage:
//!   codebook ask "print hello world"        # One-shot, Ctrl-C cancels
//!   codebook ask -l python "sort a list"    # Restrict to one language
//!   codebook chat                           # Interactive session
//!   codebook books                          # Browse the loaded corpus
//!   codebook tokens "some text"             # Token estimate

use std::io::Write as _;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use codebook_core::{CodebookConfig, ProgressSink};
use codebook_core::types::ChatMessage;
use codebook_engine::ChatService;
use tokio::io::AsyncBufReadExt;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "codebook",
    version,
    about = "📚 Codebook — answer coding prompts from curated example books"
)]
struct Cli {
    /// Path to config file (default: ~/.codebook/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Corpus directory override
    #[arg(long)]
    corpus_dir: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a single prompt and stream the answer
    Ask {
        /// The prompt text
        prompt: Vec<String>,
        /// Restrict matching to one language tag (e.g. "python")
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Interactive chat session (/reload, /tokens, /quit)
    Chat {
        /// Restrict matching to one language tag
        #[arg(short, long)]
        language: Option<String>,
    },
    /// List the books, sections, and chapters of the corpus
    Books,
    /// Estimate the token count of a text
    Tokens {
        /// The text to estimate
        text: Vec<String>,
    },
}

/// Streams chunks straight to stdout as they arrive.
struct StdoutSink;

#[async_trait]
impl ProgressSink for StdoutSink {
    async fn report(&self, chunk: &str) {
        print!("{chunk}");
        let _ = std::io::stdout().flush();
    }
}

fn expand_path(p: &str) -> String {
    shellexpand::tilde(p).to_string()
}

fn load_config(cli: &Cli) -> Result<CodebookConfig> {
    let mut config = match &cli.config {
        Some(path) => CodebookConfig::load_from(std::path::Path::new(&expand_path(path)))?,
        None => CodebookConfig::load()?,
    };
    if let Some(dir) = &cli.corpus_dir {
        config.corpus.dir = expand_path(dir);
    }
    Ok(config)
}

/// Cancel the token on Ctrl-C, leaving already-emitted chunks on screen.
fn cancel_on_ctrl_c(cancel: &CancellationToken) {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
}

async fn run_ask(service: &ChatService, prompt: String, language: Option<String>) {
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(&cancel);

    let messages = [ChatMessage::user(&prompt)];
    service
        .respond(&messages, language.as_deref(), &cancel, &StdoutSink)
        .await;
    println!();
}

async fn run_chat(service: &ChatService, language: Option<String>) -> Result<()> {
    let index = service.ensure_loaded().await;
    println!(
        "Codebook chat — {} example(s) loaded{}. /reload, /tokens <text>, /quit",
        index.len(),
        language
            .as_deref()
            .map(|l| format!(", scope: {l}"))
            .unwrap_or_default()
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();

        match line.as_str() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reload" => {
                let report = service.reload().await;
                println!("Reloaded: {} example(s)", report.records);
                for diagnostic in &report.diagnostics {
                    println!("  skipped {}: {}", diagnostic.file, diagnostic.message);
                }
                continue;
            }
            _ => {}
        }

        if let Some(text) = line.strip_prefix("/tokens ") {
            println!("≈ {} token(s)", ChatService::estimate_tokens(text));
            continue;
        }

        let cancel = CancellationToken::new();
        cancel_on_ctrl_c(&cancel);
        let messages = [ChatMessage::user(&line)];
        service
            .respond(&messages, language.as_deref(), &cancel, &StdoutSink)
            .await;
        println!();
    }

    Ok(())
}

fn run_books(service: &ChatService) {
    let books = service.books();
    if books.is_empty() {
        println!("No books found. Point --corpus-dir (or [corpus] dir) at your book JSON files.");
        return;
    }
    for book in &books {
        println!("📖 {} ({} section(s))", book.title, book.sections.len());
        for section in &book.sections {
            println!("  {}", section.title);
            for chapter in &section.chapters {
                println!(
                    "    {} — {} example(s)",
                    chapter.title,
                    chapter.examples.len()
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "codebook=debug,codebook_corpus=debug,codebook_engine=debug"
    } else {
        "codebook=info,codebook_corpus=warn,codebook_engine=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = load_config(&cli)?;
    let service = ChatService::new(&config);

    match cli.command {
        Command::Ask { prompt, language } => {
            run_ask(&service, prompt.join(" "), language).await;
        }
        Command::Chat { language } => {
            run_chat(&service, language).await?;
        }
        Command::Books => {
            run_books(&service);
        }
        Command::Tokens { text } => {
            println!("{}", ChatService::estimate_tokens(&text.join(" ")));
        }
    }

    Ok(())
}
