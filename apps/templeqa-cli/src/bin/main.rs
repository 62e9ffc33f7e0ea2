use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use templeqa_core::config::{Config, LlmSettings};
use templeqa_core::data_processor::DataProcessor;
use templeqa_core::error::Error;
use templeqa_core::traits::VectorIndexer;
use templeqa_llm::GroqClient;
use templeqa_rag::{AnswerGenerator, RagContext};
use templeqa_web::{create_router, AppState};

#[derive(Parser)]
#[command(name = "templeqa", about = "Question answering over the Annavaram temple guide")]
struct Cli {
    /// Directory holding config.toml and the environment overlays
    #[arg(long, global = true, default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the chat web server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Answer a single question and exit
    Ask { question: String },
    /// Print how the document is chunked
    Chunks,
}

fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,templeqa=info")))
        .init();
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env file"),
    }

    let config = Config::load_from(&cli.config_dir).map_err(|e| {
        eprintln!("Error loading config: {e}");
        e
    })?;

    match cli.command {
        Command::Serve { host, port } => serve(&config, host, port),
        Command::Ask { question } => {
            let llm = require_llm(&config.settings().llm);
            let generator = AnswerGenerator::new(Arc::new(RagContext::build(&config)?), Arc::new(llm));
            let answer = generator.answer(&question)?;
            println!("{}", answer.text());
            Ok(())
        }
        Command::Chunks => {
            let processor = DataProcessor::with_config(config.settings().chunking.clone())?;
            let chunks = processor.process_pdf(&config.document_path())?;
            println!("{} chunks", chunks.len());
            for chunk in &chunks {
                println!("{:>5}  {:>5} chars", chunk.id, chunk.content.chars().count());
            }
            Ok(())
        }
    }
}

/// Exit before touching the document when the credential is absent.
fn require_llm(settings: &LlmSettings) -> GroqClient {
    match GroqClient::from_env(settings) {
        Ok(client) => client,
        Err(Error::MissingApiKey(var)) => {
            eprintln!("Error: {var} not found in environment variables!");
            eprintln!("Please export {var} before starting templeqa");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn serve(config: &Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let settings = config.settings();
    let llm = require_llm(&settings.llm);
    let context = RagContext::build(config)?;
    let state = AppState::new(AnswerGenerator::new(Arc::new(context), Arc::new(llm)));
    let app = create_router(state.clone());

    let addr = format!(
        "{}:{}",
        host.unwrap_or_else(|| settings.server.host.clone()),
        port.unwrap_or(settings.server.port)
    );
    let chunks = state.generator.context().index().len();
    // `state` outlives the runtime so the blocking HTTP client is dropped outside it.
    tokio::runtime::Runtime::new()?.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(%addr, chunks, "serving");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
            .await?;
        anyhow::Ok(())
    })?;
    drop(state);
    Ok(())
}

/// Resolve once `signal` fires. A listener that cannot be installed is logged
/// and the server keeps running until killed.
async fn shutdown_signal<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "cannot listen for ctrl-c; stop the server by killing the process");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn shutdown_follows_the_signal() {
        let done = tokio::time::timeout(Duration::from_secs(1), shutdown_signal(async { Ok(()) })).await;
        assert!(done.is_ok());
    }

    #[tokio::test]
    async fn failed_signal_listener_keeps_serving() {
        let failing = async { Err(std::io::Error::other("no signal support")) };
        let done = tokio::time::timeout(Duration::from_millis(100), shutdown_signal(failing)).await;
        assert!(done.is_err(), "server must not stop when the listener fails");
    }
}
