//! Ghostline CLI - drive the autocomplete engine from the terminal
//!
//! Types the given text into an in-memory editor one keystroke at a time,
//! waits for the debounce and fetch to settle, then prints the text with the
//! ghost suggestion dimmed after the cursor.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use ghostline_autocomplete::{
    AutocompleteConfig, AutocompletePlugin, ConfigLoader, CredentialProvider, EndpointConfig,
    HttpSuggestionFetcher, MemoryEditor, StaticCredential, StaticSuggestionSource,
    SuggestionFetcher,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Vocabulary served when no endpoint or word list is given
const DEFAULT_VOCABULARY: &[&str] = &[
    "MRI LUMBO-SACRAL SPINE",
    "Sagittal and Axial T1 and T2 W sequences",
    "Coronal and Sagittal STIR sequences",
    "Screening sagittal T1W sequence through cervico-dorsal spine",
    "Anterior wedge compression of L1 vertebral body noted with loss of up to 40% height",
    "Marginal osteophytes are noted at multiple levels",
    "Fecalarthropathy noted with ligamentum flavum thickening of lower lumbar levels",
];

/// Extra idle time on top of the debounce delay before giving up on a fetch
const SETTLE_MARGIN: Duration = Duration::from_millis(1_500);

/// Ghostline - inline ghost-text autocomplete
#[derive(Parser, Debug)]
#[command(name = "ghostline")]
#[command(about = "Type text into an in-memory editor and show the inline suggestion")]
#[command(version)]
struct Cli {
    /// Text to type, one keystroke per character
    #[arg(value_name = "TEXT")]
    text: String,

    /// Configuration file (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Suggestion endpoint base URL; overrides the configuration file
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Bearer credential sent to the endpoint
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Newline-separated vocabulary used instead of the built-in one
    #[arg(long, value_name = "FILE", conflicts_with = "endpoint")]
    words: Option<PathBuf>,

    /// Press the accept key once the suggestion is shown
    #[arg(short, long)]
    accept: bool,

    /// Print the final suggestion state as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;
    let fetcher = build_fetcher(&cli, &config)?;
    let settle = config.debounce() + SETTLE_MARGIN;

    let plugin = AutocompletePlugin::new(config, fetcher)?;
    let mut editor = MemoryEditor::new(plugin);

    for c in cli.text.chars() {
        editor.type_text(&c.to_string());
    }
    let handled = editor.settle(settle).await;
    tracing::debug!("Settled after {} autocomplete events", handled);

    println!("{}", render(&editor));

    if cli.accept {
        let accept_key = editor.plugin().config().accept_key.clone();
        if editor.press_key(&accept_key) {
            println!("{}", render(&editor));
        } else {
            println!("{} no suggestion to accept", "✗".red());
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&editor.state().get())?);
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<AutocompleteConfig> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_path(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => AutocompleteConfig::default(),
    };

    if let Some(base_url) = &cli.endpoint {
        let timeout_ms = config
            .endpoint
            .as_ref()
            .map_or(ghostline_autocomplete::config::DEFAULT_TIMEOUT_MS, |e| e.timeout_ms);
        config.endpoint = Some(EndpointConfig {
            base_url: base_url.clone(),
            timeout_ms,
        });
        config.validate()?;
    }

    Ok(config)
}

fn build_fetcher(cli: &Cli, config: &AutocompleteConfig) -> Result<Arc<dyn SuggestionFetcher>> {
    if let Some(words) = &cli.words {
        let source = StaticSuggestionSource::new(read_vocabulary(words)?);
        tracing::info!("Serving {} words from {}", source.entries().len(), words.display());
        return Ok(Arc::new(source));
    }

    match &config.endpoint {
        Some(endpoint) => {
            let credentials = cli
                .token
                .clone()
                .map(|token| Arc::new(StaticCredential::new(token)) as Arc<dyn CredentialProvider>);
            let fetcher = HttpSuggestionFetcher::new(endpoint, credentials)?;
            tracing::info!("Fetching suggestions from {}", fetcher.endpoint());
            Ok(Arc::new(fetcher))
        }
        None => Ok(Arc::new(StaticSuggestionSource::new(
            DEFAULT_VOCABULARY.iter().copied(),
        ))),
    }
}

fn read_vocabulary(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read word list {}", path.display()))?;
    Ok(parse_vocabulary(&content))
}

fn parse_vocabulary(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn render(editor: &MemoryEditor) -> String {
    editor
        .decorations()
        .overlay(editor.text(), |ghost| ghost.text.dimmed().to_string())
}
