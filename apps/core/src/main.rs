// EcoSea command-line front end
// Ask questions against a knowledge-base file without any host application.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use futures::stream::{self, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ecosea_core::actors::{ChatSupervisor, RagActorHandle};
use ecosea_core::models::{ChatRequest, ChatResponse};
use ecosea_core::rag::Chunker;
use ecosea_core::{RagConfig, SharedEngine};

/// Lines answered at the same time in `repl`.
const REPL_CONCURRENCY: usize = 4;

#[derive(Parser)]
#[command(name = "ecosea")]
#[command(about = "Offline answers about beach cleanliness from a knowledge-base file")]
struct Cli {
    /// Knowledge-base text file (overrides RAG_KB_PATH)
    #[arg(long, global = true)]
    kb: Option<PathBuf>,

    /// Passages retrieved per question (overrides RAG_TOP_K)
    #[arg(long, global = true)]
    top_k: Option<usize>,

    /// Maximum chunk length in characters (overrides RAG_CHUNK_SIZE)
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Sliding-window overlap in characters (overrides RAG_CHUNK_OVERLAP)
    #[arg(long, global = true)]
    chunk_overlap: Option<usize>,

    /// Keep words broken by hard line wraps as they are
    #[arg(long, global = true)]
    no_rejoin: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer one question
    Ask {
        question: String,

        /// Print the passages the reply was grounded on
        #[arg(long)]
        show_contexts: bool,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the chunks produced from the knowledge base
    Chunk,
    /// Print scored passages for a query
    Search {
        query: String,

        #[arg(short, long)]
        k: Option<usize>,
    },
    /// Answer questions read line by line from stdin
    Repl,
}

impl Cli {
    fn config(&self) -> anyhow::Result<RagConfig> {
        let mut config = RagConfig::from_env().context("reading RAG_* environment")?;
        if let Some(kb) = &self.kb {
            config.kb_path = kb.clone();
        }
        if let Some(top_k) = self.top_k {
            config.top_k = top_k;
        }
        if let Some(size) = self.chunk_size {
            config.chunk_size = size;
        }
        if let Some(overlap) = self.chunk_overlap {
            config.chunk_overlap = overlap;
        }
        if self.no_rejoin {
            config.rejoin_split_words = false;
        }
        Ok(config.normalized())
    }
}

fn init_tracing(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("ecosea_core=info"))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs)?;

    let config = cli.config()?;
    info!("Using knowledge base {:?}", config.kb_path);
    let shared = Arc::new(SharedEngine::new(config));

    match cli.command {
        Command::Ask {
            question,
            show_contexts,
            json,
        } => {
            let result = shared.answer(&question, None)?;
            let response = ChatResponse {
                reply: result.reply,
                contexts: result.contexts,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_response(&response, show_contexts);
            }
        }
        Command::Chunk => {
            let engine = shared.get()?;
            let chunker = Chunker::from_config(engine.config());
            for chunk in engine.chunks() {
                println!("--- {} ({} chars) ---", chunk.id, chunk.text.chars().count());
                println!("{}\n", chunk.text);
            }
            info!(
                "{} chunks (size {}, overlap {})",
                engine.chunks().len(),
                chunker.chunk_size(),
                chunker.chunk_overlap()
            );
        }
        Command::Search { query, k } => {
            let engine = shared.get()?;
            let hits = engine.search(&query, k);
            if hits.is_empty() {
                println!("No results found.");
            }
            for (rank, hit) in hits.iter().enumerate() {
                println!("{}. {} | score: {:.3}", rank + 1, hit.chunk.id, hit.score);
                println!("   {}", preview(&hit.chunk.text, 240));
            }
        }
        Command::Repl => repl(shared).await?,
    }

    Ok(())
}

async fn repl(shared: Arc<SharedEngine>) -> anyhow::Result<()> {
    let supervisor = ChatSupervisor::new(Arc::new(RagActorHandle::new(shared)));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let questions = stream::unfold(&mut lines, |lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            _ => None,
        }
    });

    let mut replies = Box::pin(
        questions
            .map(|line| {
                let supervisor = supervisor.clone();
                async move { supervisor.handle(ChatRequest::new(line)).await }
            })
            .buffered(REPL_CONCURRENCY),
    );

    while let Some(reply) = replies.next().await {
        match reply {
            Ok(response) => print_response(&response, false),
            Err(failure) => match failure.detail {
                Some(detail) => eprintln!("{}: {}", failure.message, detail),
                None => eprintln!("{}", failure.message),
            },
        }
    }
    Ok(())
}

fn print_response(response: &ChatResponse, show_contexts: bool) {
    println!("{}", response.reply);
    if show_contexts {
        for (i, context) in response.contexts.iter().enumerate() {
            println!("\n[{}] {}", i + 1, preview(context, 240));
        }
    }
    println!();
}

fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
