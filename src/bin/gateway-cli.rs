use acitracker_gateway::cache::X_CACHE;
use acitracker_gateway::routing::Route;
use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Query the AciTracker gateway's allowlisted routes", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:10000")]
    url: String,

    /// Bearer token; falls back to GATEWAY_BEARER_TOKEN.
    #[arg(short, long)]
    token: Option<String>,

    /// Print status, content type and cache marker before the body
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upstream health
    Health,
    /// Latest report (markdown)
    Report,
    /// Report manifest
    Manifest,
    /// New items (CSV)
    New,
    /// Must-read list
    MustReads {
        /// Markdown rendering instead of JSON
        #[arg(long)]
        markdown: bool,
    },
    /// Summaries
    Summaries,
}

impl Commands {
    fn route(&self) -> Route {
        match self {
            Commands::Health => Route::Health,
            Commands::Report => Route::Report,
            Commands::Manifest => Route::Manifest,
            Commands::New => Route::New,
            Commands::MustReads { markdown: false } => Route::MustReads,
            Commands::MustReads { markdown: true } => Route::MustReadsMarkdown,
            Commands::Summaries => Route::Summaries,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let token = cli
        .token
        .or_else(|| std::env::var("GATEWAY_BEARER_TOKEN").ok())
        .ok_or("no token given: pass --token or set GATEWAY_BEARER_TOKEN")?;

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))?,
    );

    let route = cli.command.route();
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}{}", cli.url.trim_end_matches('/'), route.public_path()))
        .headers(headers)
        .send()
        .await?;

    print_response(res, cli.verbose).await
}

async fn print_response(
    res: reqwest::Response,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let header = |name| {
        res.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string()
    };
    let content_type = header(CONTENT_TYPE);
    let cache = header(X_CACHE);

    if verbose || !status.is_success() {
        eprintln!("Status: {}", status);
        eprintln!("Content-Type: {}", content_type);
        eprintln!("X-Cache: {}", cache);
    }

    let body = res.text().await?;
    if content_type.starts_with("application/json") {
        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
            Err(_) => println!("{}", body),
        }
    } else {
        println!("{}", body);
    }

    if !status.is_success() {
        return Err(format!("gateway returned status {}", status).into());
    }
    Ok(())
}
