use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tokio::runtime::Handle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_parser::config::Config;
use resume_parser::input::read_document;
use resume_parser::llm_client::{self, LlmClient};
use resume_parser::sections::cache::HeaderCache;
use resume_parser::sections::llm_fallback::LlmSectionClassifier;
use resume_parser::{HeaderClassifier, ParsedResume, ResumeParser};

/// Recover canonical sections and job entries from resume text.
#[derive(Debug, Parser)]
#[command(name = "resume-parser", version)]
struct Args {
    /// Resume files (.txt, .text, .md, .pdf). `-` reads standard input.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Include parse diagnostics in the JSON output.
    #[arg(long)]
    trace: bool,

    /// Never consult the LLM for unknown headers.
    #[arg(long)]
    no_fallback: bool,

    /// Header cache file. Overrides HEADER_CACHE_PATH.
    #[arg(long, value_name = "PATH")]
    cache: Option<PathBuf>,
}

#[derive(Serialize)]
struct FileOutput {
    file: String,
    #[serde(flatten)]
    resume: ParsedResume,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    let args = Args::parse();

    // stdout carries JSON only; logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume-parser v{}", env!("CARGO_PKG_VERSION"));

    let cache_path = args.cache.clone().or_else(|| config.header_cache_path.clone());
    let cache = match &cache_path {
        Some(path) => HeaderCache::load(path)
            .with_context(|| format!("Failed to load header cache from {}", path.display()))?,
        None => HeaderCache::new(),
    };

    let mut classifier = HeaderClassifier::new(Arc::new(cache));
    match (&config.anthropic_api_key, args.no_fallback) {
        (Some(api_key), false) => {
            let llm = LlmClient::new(api_key.clone())?;
            info!(
                "LLM header fallback enabled (model: {}, timeout: {:?})",
                llm_client::MODEL,
                config.classifier_timeout
            );
            let fallback =
                LlmSectionClassifier::new(llm, Handle::current(), config.classifier_timeout);
            classifier = classifier.with_fallback(Arc::new(fallback));
        }
        (Some(_), true) => info!("LLM header fallback disabled by --no-fallback"),
        (None, _) => info!("ANTHROPIC_API_KEY not set; unknown headers resolve to 'other'"),
    }
    let parser = ResumeParser::new(classifier);

    // One blocking worker per document. The fallback classifier drives its
    // async call on this runtime, so parsing must stay off the async workers.
    let workers: Vec<_> = args
        .files
        .iter()
        .cloned()
        .map(|path| {
            let parser = parser.clone();
            tokio::task::spawn_blocking(move || -> Result<FileOutput> {
                let text = read_document(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Ok(FileOutput {
                    file: path.display().to_string(),
                    resume: parser.parse(&text),
                })
            })
        })
        .collect();

    let total = workers.len();
    let mut outputs = Vec::with_capacity(total);
    for worker in workers {
        match worker.await.context("Parser worker panicked")? {
            Ok(mut output) => {
                if !args.trace {
                    output.resume.trace.clear();
                }
                info!(
                    "{}: {} sections, {} jobs",
                    output.file,
                    output.resume.sections.len(),
                    output.resume.jobs.len()
                );
                outputs.push(output);
            }
            Err(e) => warn!("{e:#}"),
        }
    }

    let json = match outputs.as_slice() {
        [single] if total == 1 => serde_json::to_string_pretty(&single.resume)?,
        _ => serde_json::to_string_pretty(&outputs)?,
    };
    println!("{json}");

    if let Some(path) = &cache_path {
        parser
            .classifier()
            .cache()
            .persist(path)
            .with_context(|| format!("Failed to persist header cache to {}", path.display()))?;
    }

    let failed = total - outputs.len();
    if failed > 0 {
        bail!("{failed} of {total} documents could not be read");
    }
    Ok(())
}
