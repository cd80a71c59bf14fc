//! Keyword Surprise CLI - one random image or link for a keyword.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use keyword_surprise::{
    ErrorKind, ErrorResponse, ProviderId, ProviderPreference, Search, SearchConfig, SearchError,
    SearchRecord, SearchResponse,
};

/// Keyword Surprise - one random search result for a keyword
#[derive(Parser)]
#[command(name = "keyword-surprise")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a keyword and print one random result
    Search(SearchArgs),

    /// List providers and whether they are configured
    Providers,
}

#[derive(Parser)]
struct SearchArgs {
    /// Search query
    query: String,

    /// Result type: image or link
    #[arg(short = 'T', long = "type", default_value = "image")]
    result_type: String,

    /// Provider: auto, google, serpapi or duckduckgo
    #[arg(short, long, default_value = "auto")]
    provider: String,

    /// Request timeout in seconds (overrides SEARCH_TIMEOUT_SECS)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// The JSON response object
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::Search(args) => run_search(args).await,
        Commands::Providers => list_providers(),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = match e.downcast_ref::<SearchError>().map(SearchError::kind) {
                Some(ErrorKind::Validation) => 2,
                _ => 1,
            };
            let body = match e.downcast_ref::<SearchError>() {
                Some(err) => ErrorResponse::from(err),
                None => ErrorResponse { error: e.to_string() },
            };
            eprintln!("{}", serde_json::to_string(&body).unwrap_or_else(|_| e.to_string()));
            ExitCode::from(code)
        }
    }
}

fn list_providers() -> Result<()> {
    let config = SearchConfig::from_env()?;
    let search = Search::from_config(&config)?;
    let selector = search.selector();

    println!("Available providers:\n");
    for id in ProviderId::ALL {
        let status = if selector.is_configured(id) {
            "ready"
        } else {
            "missing credentials"
        };
        println!("  {:<11} - {} ({})", id.as_str(), id.display_name(), status);
    }
    println!();
    println!("  auto        -> {}", selector.resolve(ProviderPreference::Auto));
    println!();
    println!("Usage: keyword-surprise search \"cats\" --type image --provider auto");
    Ok(())
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let mut config = SearchConfig::from_env()?;
    if let Some(timeout) = args.timeout {
        config = config.with_timeout(timeout);
    }

    let search = Search::from_config(&config)?;
    let response = search
        .search(&args.query, &args.result_type, &args.provider)
        .await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => print_text(&response),
    }

    Ok(())
}

fn print_text(response: &SearchResponse) {
    println!(
        "Provider: {} - {} results found\n",
        response.provider, response.count
    );

    match &response.result {
        None => println!("No result found. Try another keyword."),
        Some(SearchRecord::Image(image)) => {
            println!("{}", image.title.as_deref().unwrap_or("Image result"));
            let image_url = image
                .source_url
                .as_deref()
                .or(image.context_url.as_deref())
                .or(image.thumbnail_url.as_deref());
            if let Some(url) = image_url {
                println!("   Image: {}", url);
            }
            if let Some(url) = &image.context_url {
                println!("   Source: {}", url);
            }
        }
        Some(SearchRecord::Link(link)) => {
            println!("{}", link.title);
            println!("   URL: {}", link.link);
            if !link.snippet_text().is_empty() {
                println!("   {}", link.snippet_text());
            }
        }
    }
}
