//! PlainTag CLI
//!
//! Registers the demo component, loads and optionally unloads it against an
//! in-memory document, and prints the resulting HTML.
//!
//! Run with: cargo run -p plaintag_cli -- --props '{"name":"World"}' --count 2

mod config;
mod demo;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use plaintag_core::{CollectingSink, ComponentManager, Position, Props, Severity};
use plaintag_dom::Document;
use tracing_subscriber::EnvFilter;

use crate::config::PlaintagConfig;

#[derive(Parser, Debug)]
#[command(name = "plaintag", version, about = "Mount components into a document")]
struct Cli {
    /// Config file or directory containing plaintag.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Component to load
    #[arg(long, default_value = demo::COMPONENT_NAME)]
    component: String,

    /// Props as JSON
    #[arg(long)]
    props: Option<String>,

    /// Parent selector (defaults to the configured parent)
    #[arg(long)]
    parent: Option<String>,

    /// Insert position (defaults to the configured position)
    #[arg(long)]
    position: Option<String>,

    /// Number of instances to load
    #[arg(long, default_value_t = 1)]
    count: usize,

    /// Unload after loading
    #[arg(long)]
    unload: bool,

    /// Unload every instance instead of the first
    #[arg(long, requires = "unload")]
    unload_all: bool,

    /// Start without a body and attach it after this many milliseconds
    #[arg(long)]
    deferred_body: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PlaintagConfig::load(path)?,
        None => PlaintagConfig::default(),
    };

    let level = if cli.verbose { "debug" } else { config.log.level.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let props: Option<Props> = cli
        .props
        .as_deref()
        .map(serde_json::from_str::<Props>)
        .transpose()
        .context("Failed to parse --props as JSON")?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start runtime")?;

    let html = runtime.block_on(run(&cli, config, props))?;
    println!("{html}");
    Ok(())
}

async fn run(cli: &Cli, config: PlaintagConfig, props: Option<Props>) -> Result<String> {
    let document = match cli.deferred_body {
        Some(_) => Document::loading(),
        None => Document::new(),
    }
    .into_shared();

    let sink = CollectingSink::new();
    let mut manager = ComponentManager::new(document.clone())
        .with_config(config.lifecycle)
        .with_sink(sink.clone());
    demo::register(&mut manager);

    let attach = cli.deferred_body.map(|delay| {
        let document = document.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if let Ok(mut doc) = document.lock() {
                doc.attach_body();
            }
        })
    });

    let parent = cli
        .parent
        .clone()
        .unwrap_or_else(|| manager.config().parent.clone());
    let position = cli
        .position
        .clone()
        .map(Position::from)
        .unwrap_or_else(|| manager.config().position.clone());

    for _ in 0..cli.count {
        manager
            .load(&cli.component, props.clone(), &parent, position.clone())
            .await;
    }

    if cli.unload {
        manager.unload(&cli.component, cli.unload_all);
    }

    if let Some(attach) = attach {
        attach.abort();
    }

    let diagnostics = sink.diagnostics();
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    tracing::info!(
        mounted = manager.mounted(&cli.component).len(),
        diagnostics = diagnostics.len(),
        errors,
        "done"
    );

    let html = document
        .lock()
        .map(|doc| doc.to_html())
        .map_err(|_| anyhow::anyhow!("document lock poisoned"))?;
    Ok(html)
}
