//! `sage`: index your study materials, then ask questions against them.
//!
//! Three commands:
//!
//! - `sage index`: scan a directory, chunk and embed every supported
//!   file, and swap in a fresh index generation
//! - `sage chat`: the interactive question loop
//! - `sage inspect`: show what the index currently holds

mod output;
mod session;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use sage_ingest::LoadError;
use sage_model::OllamaGenerator;
use sage_rag::{
    JsonFileVectorStore, OllamaEmbeddingProvider, PromptAssembler, RagConfig, RagError,
    RagPipeline, VectorStore,
};
use tracing_subscriber::EnvFilter;

use crate::session::{ChatSession, is_exit_word};

#[derive(Parser)]
#[command(name = "sage", version, about = "Answer questions from your own study materials")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the vector index from a directory of documents
    Index {
        /// Directory holding .pdf, .docx, and .txt source files
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
        /// Directory the index generation is persisted into
        #[arg(long, default_value = "./index")]
        index_dir: PathBuf,
        /// Ollama server address
        #[arg(long, default_value = "http://localhost:11434")]
        base_url: String,
        /// Embedding model name
        #[arg(long, default_value = "all-minilm")]
        embed_model: String,
        /// Maximum chunk size in characters
        #[arg(long, default_value_t = 300)]
        chunk_size: usize,
        /// Overlap between consecutive chunks in characters
        #[arg(long, default_value_t = 50)]
        chunk_overlap: usize,
    },
    /// Ask questions against the indexed materials
    Chat {
        /// Directory the index generation was persisted into
        #[arg(long, default_value = "./index")]
        index_dir: PathBuf,
        /// Ollama server address
        #[arg(long, default_value = "http://localhost:11434")]
        base_url: String,
        /// Generation model name
        #[arg(long, default_value = "phi3")]
        model: String,
        /// Embedding model name (must match the one used at index time)
        #[arg(long, default_value = "all-minilm")]
        embed_model: String,
        /// Number of chunks retrieved per question
        #[arg(long, default_value_t = 3)]
        top_k: usize,
    },
    /// Show entry count and a preview of the stored chunks
    Inspect {
        /// Directory the index generation was persisted into
        #[arg(long, default_value = "./index")]
        index_dir: PathBuf,
        /// Number of chunks to preview
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Index { data_dir, index_dir, base_url, embed_model, chunk_size, chunk_overlap } => {
            run_index(data_dir, index_dir, base_url, embed_model, chunk_size, chunk_overlap).await
        }
        Command::Chat { index_dir, base_url, model, embed_model, top_k } => {
            run_chat(index_dir, base_url, model, embed_model, top_k).await
        }
        Command::Inspect { index_dir, limit } => run_inspect(index_dir, limit).await,
    }
}

/// The full rebuild entry point: scan → chunk → embed → swap generations.
async fn run_index(
    data_dir: PathBuf,
    index_dir: PathBuf,
    base_url: String,
    embed_model: String,
    chunk_size: usize,
    chunk_overlap: usize,
) -> anyhow::Result<()> {
    output::step(&format!("Scanning {}", data_dir.display()))?;
    let documents = match sage_ingest::load_documents(&data_dir) {
        Ok(documents) => documents,
        Err(e @ LoadError::NoSupportedFiles(_)) => {
            output::error_with_hint(
                &e.to_string(),
                "Add PDF, DOCX, or TXT files to the data directory.",
            )?;
            bail!("index build failed");
        }
        Err(e @ LoadError::DirectoryNotFound(_)) => {
            output::error_with_hint(&e.to_string(), "Create the directory or pass --data-dir.")?;
            bail!("index build failed");
        }
        Err(e) => return Err(e.into()),
    };
    output::step(&format!("Loaded {} document parts", documents.len()))?;

    let config = RagConfig::builder()
        .chunk_size(chunk_size)
        .chunk_overlap(chunk_overlap)
        .build()?;
    let provider = OllamaEmbeddingProvider::new().with_base_url(base_url).with_model(embed_model);
    let store = JsonFileVectorStore::open(&index_dir)?;
    let pipeline = RagPipeline::builder()
        .config(config)
        .embedding_provider(Arc::new(provider))
        .vector_store(Arc::new(store))
        .build()?;

    output::step("Embedding chunks and swapping in the new index generation")?;
    match pipeline.rebuild_index(&documents).await {
        Ok(report) => {
            output::build_report(&report)?;
            Ok(())
        }
        Err(e) => {
            output::error_with_hint(
                &e.to_string(),
                "Is Ollama running (`ollama serve`)? Is the embedding model pulled \
                 (`ollama pull all-minilm`)?",
            )?;
            bail!("index build failed");
        }
    }
}

/// The interactive question loop.
async fn run_chat(
    index_dir: PathBuf,
    base_url: String,
    model: String,
    embed_model: String,
    top_k: usize,
) -> anyhow::Result<()> {
    let store = JsonFileVectorStore::open(&index_dir)?;

    // Fail early with the build hint rather than on the first question.
    let chunks = match store.count().await {
        Ok(count) => count,
        Err(RagError::IndexUnavailable) => {
            output::error_with_hint(
                "no index has been built yet",
                &format!("Build one first: sage index --index-dir {}", index_dir.display()),
            )?;
            bail!("no index");
        }
        Err(e) => return Err(e.into()),
    };

    let config = RagConfig::builder().top_k(top_k).build()?;
    let provider = OllamaEmbeddingProvider::new()
        .with_base_url(base_url.clone())
        .with_model(embed_model);
    let generator = OllamaGenerator::new(model).with_base_url(base_url);
    let pipeline = RagPipeline::builder()
        .config(config)
        .embedding_provider(Arc::new(provider))
        .vector_store(Arc::new(store))
        .build()?;
    let session = ChatSession::new(pipeline, PromptAssembler::default(), Box::new(generator));

    output::banner(session.model_name(), chunks)?;

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("question> ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    output::empty_input_nudge()?;
                    continue;
                }
                if is_exit_word(&line) {
                    output::goodbye()?;
                    break;
                }
                let _ = rl.add_history_entry(&line);
                output::thinking()?;
                match session.ask(&line).await {
                    Ok(answer) => output::answer(&answer)?,
                    // Turn errors are reported and the loop keeps going.
                    Err(e) => output::turn_error(&e)?,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::goodbye()?;
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Index diagnostics: entry count plus a short preview.
async fn run_inspect(index_dir: PathBuf, limit: usize) -> anyhow::Result<()> {
    let store = JsonFileVectorStore::open(&index_dir)?;
    match store.count().await {
        Ok(count) => {
            output::step(&format!("Index at {} holds {count} chunks", index_dir.display()))?;
            for (i, chunk) in store.sample(limit).await?.iter().enumerate() {
                let page = chunk.page.map(|p| format!(", page {p}")).unwrap_or_default();
                let preview: String = chunk.text.chars().take(200).collect();
                output::step(&format!(
                    "  {}. {}{}: {}",
                    i + 1,
                    output::sanitize(&chunk.source),
                    page,
                    output::sanitize(&preview)
                ))?;
            }
            Ok(())
        }
        Err(RagError::IndexUnavailable) => {
            output::error_with_hint("no index has been built yet", "Run `sage index` first.")?;
            bail!("no index");
        }
        Err(e) => Err(e.into()),
    }
}
