use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kb_chat::chat::ChatSession;
use kb_chat::config::{load_config, AppConfig};
use kb_chat::retriever::RetrievalEngine;
use kb_chat::server;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Answers questions from a CSV knowledge base.
#[derive(Parser)]
#[command(name = "kb-chat", version)]
struct Cli {
    /// TOML configuration file with [engine] and [server] sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CSV dataset, overrides engine.data_path
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Minimum similarity for a match, overrides engine.threshold
    #[arg(long, global = true)]
    threshold: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask { query: String },
    /// Interactive chat on stdin/stdout
    Chat,
    /// Serve the HTTP chat endpoint
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(data) = &cli.data {
        config.engine.data_path = data.clone();
    }
    if let Some(threshold) = cli.threshold {
        config.engine.threshold = threshold;
    }
    config.engine.validate().context("Invalid engine settings")?;
    Ok(config)
}

/// Loads the engine once. Failure is reported here and never retried.
fn load_engine(config: &AppConfig) -> Option<RetrievalEngine> {
    match RetrievalEngine::load(&config.engine) {
        Ok(engine) => Some(engine),
        Err(e) => {
            error!("Error initializing knowledge base: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let mut config = resolve_config(&cli)?;

    match cli.command {
        Commands::Ask { query } => {
            let response = match load_engine(&config) {
                Some(engine) => engine.get_response(&query),
                None => config.server.unavailable_reply.clone(),
            };
            println!("{}", response);
        }
        Commands::Chat => {
            let engine = RetrievalEngine::load(&config.engine)
                .with_context(|| "Failed to load knowledge base")?;
            println!("Knowledge base ready ({} entries). Type 'exit' to quit.", engine.len());

            let stdin = std::io::stdin();
            ChatSession::new(&engine).run(stdin.lock(), std::io::stdout())?;
        }
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let engine = load_engine(&config).map(Arc::new);
            server::run_server(engine, &config.server).await?;
        }
    }

    Ok(())
}
