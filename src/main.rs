//! biopubs - Bioscience publication catalog and AI prompt proxy
//!
//! A Rust microservice that derives a browsable catalog from a publication
//! export and relays summary, translation and chat prompts to an AI gateway.
//!
//! ## Usage
//!
//! ### CLI Mode
//! ```bash
//! biopubs list --search microgravity --topic "Bone & Skeletal"
//! biopubs summarize "Bone density loss in microgravity" --language hi
//! ```
//!
//! ### HTTP Server Mode
//! ```bash
//! biopubs serve --port 3000
//! ```

use anyhow::{Context, Result};
use biopubs::{
    catalog::{self, CatalogFilter, DEFAULT_PAGE_SIZE},
    config::AppConfig,
    gateway::{ChatMessage, GatewayClient},
    languages,
    prompts::{summary_request, RequestType},
    proxy::{self, AppState},
    publications::{self, DataSource, Publication},
};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Bioscience publication catalog and AI prompt proxy
#[derive(Parser)]
#[command(name = "biopubs")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Publication export: file path or http(s) URL (overrides PUBLICATIONS_SOURCE)
    #[arg(long, global = true)]
    source: Option<String>,

    /// AI gateway base URL (overrides AI_GATEWAY_URL)
    #[arg(long, global = true)]
    gateway_url: Option<String>,

    /// AI model name (overrides AI_GATEWAY_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog entries
    List {
        /// Case-insensitive title search
        #[arg(short, long)]
        search: Option<String>,

        /// Year filter (2020-2024 or "all")
        #[arg(long)]
        year: Option<String>,

        /// Topic filter (e.g. "Plant Science" or "all")
        #[arg(long)]
        topic: Option<String>,

        /// Number of records to skip
        #[arg(long, default_value = "0")]
        offset: usize,

        /// Maximum records to show
        #[arg(short, long, default_value_t = DEFAULT_PAGE_SIZE)]
        limit: usize,

        /// Write all matching records to a CSV file in this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report lines that could not be parsed
        #[arg(long)]
        report: bool,
    },

    /// Ask the AI gateway for a summary of a publication title
    Summarize {
        /// Publication title
        title: String,

        /// Output language code (e.g. "hi", "es")
        #[arg(short, long, default_value = "en")]
        language: String,
    },

    /// Send a single message through the assistant
    Ask {
        /// Message text
        message: String,

        /// Request type
        #[arg(long, value_enum, default_value_t = Kind::Chat)]
        kind: Kind,

        /// Output language code (e.g. "ta", "fr")
        #[arg(short, long, default_value = "en")]
        language: String,
    },

    /// List supported output languages
    Languages,

    /// Run as HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Chat,
    Summary,
    Translation,
}

impl From<Kind> for RequestType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Chat => RequestType::Chat,
            Kind::Summary => RequestType::Summary,
            Kind::Translation => RequestType::Translation,
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    if cli.json_logs {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .init();
    }

    AppConfig::load_dotenv();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::List {
            search,
            year,
            topic,
            offset,
            limit,
            output,
            report,
        } => {
            let filter = CatalogFilter { search, year, topic };
            run_list(&config, &filter, offset, limit, output, report).await
        }
        Commands::Summarize { title, language } => run_summarize(&config, &title, &language).await,
        Commands::Ask {
            message,
            kind,
            language,
        } => run_ask(&config, &message, kind.into(), &language).await,
        Commands::Languages => {
            for lang in languages::LANGUAGES {
                println!("{:<5} {:<14} {}", lang.code, lang.name, lang.native);
            }
            Ok(())
        }
        Commands::Serve { port, host } => run_server(config, host, port).await,
    }
}

/// Environment configuration with global CLI flags applied on top.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::from_env().context("Invalid configuration")?;

    if let Some(source) = &cli.source {
        config.source = DataSource::parse(source).context("Invalid --source")?;
    }
    if let Some(url) = &cli.gateway_url {
        config.gateway.base_url = url.clone();
    }
    if let Some(model) = &cli.model {
        config.gateway.model = model.clone();
    }

    Ok(config)
}

// ============================================================================
// Catalog Listing
// ============================================================================

async fn run_list(
    config: &AppConfig,
    filter: &CatalogFilter,
    offset: usize,
    limit: usize,
    output_dir: Option<PathBuf>,
    report: bool,
) -> Result<()> {
    let client = reqwest::Client::new();

    let pubs: Vec<Publication> = if report {
        let derivation = publications::load_with_report(&config.source, &client).await;
        for skipped in &derivation.skipped {
            println!("Skipped line {}: {}", skipped.line, skipped.content);
        }
        println!("{} line(s) skipped", derivation.skipped.len());
        derivation.publications
    } else {
        publications::load_publications(&config.source, &client).await
    };

    if pubs.is_empty() {
        println!("No publications available from {}", config.source);
        return Ok(());
    }

    if !filter.has_known_selectors() {
        warn!(year = ?filter.year, topic = ?filter.topic, "Unknown year or topic; nothing will match");
    }

    let page = catalog::page(&pubs, filter, offset, limit);
    for publication in &page.items {
        println!(
            "[{:>4}] {} | {} | {} | {}\n       {}",
            publication.id,
            publication.year,
            publication.topic,
            publication.impact,
            publication.title,
            publication.link
        );
    }
    println!(
        "\nShowing {} of {} publications (Total: {})",
        page.items.len(),
        page.matched,
        page.total
    );
    if page.remaining() > 0 {
        println!("{} more; use --offset {}", page.remaining(), offset + page.items.len());
    }

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(&dir).context("Failed to create output directory")?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let path = dir.join(format!("publications_{}.csv", timestamp));
        let matched = catalog::filter(&pubs, filter);
        publications::save_csv(&path, &matched).context("Failed to write CSV")?;
        println!("Saved: {:?}", path);
    }

    Ok(())
}

// ============================================================================
// AI Requests
// ============================================================================

async fn run_summarize(config: &AppConfig, title: &str, language_code: &str) -> Result<()> {
    let language = resolve_language(language_code);
    let gateway = GatewayClient::new(config.gateway.clone())?;

    println!("Generating summary in {}...", language);
    let summary = gateway
        .respond(RequestType::Summary, Some(language), &[summary_request(title)])
        .await
        .context("Summary request failed")?;

    println!("\n{}", summary);
    Ok(())
}

async fn run_ask(
    config: &AppConfig,
    message: &str,
    request_type: RequestType,
    language_code: &str,
) -> Result<()> {
    let language = resolve_language(language_code);
    let gateway = GatewayClient::new(config.gateway.clone())?;

    let reply = gateway
        .respond(request_type, Some(language), &[ChatMessage::user(message)])
        .await
        .context("Assistant request failed")?;

    println!("{}", reply);
    Ok(())
}

/// English language name for a code; unknown codes fall back to English.
fn resolve_language(code: &str) -> &'static str {
    if languages::find(code).is_none() {
        warn!(code = code, "Unknown language code, using English");
    }
    languages::name_for_code(code)
}

// ============================================================================
// HTTP Server
// ============================================================================

async fn run_server(config: AppConfig, host: String, port: u16) -> Result<()> {
    info!(host = %host, port = port, "Starting HTTP server");
    config.log_summary();

    let client = reqwest::Client::new();
    let pubs = publications::load_publications(&config.source, &client).await;
    if pubs.is_empty() {
        warn!(source = %config.source, "Serving an empty catalog");
    }

    let gateway = GatewayClient::new(config.gateway)?;
    let app = proxy::router(AppState::new(gateway, pubs));

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid host:port")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
