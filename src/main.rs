use clap::{Arg, Command};
use std::env;
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};

mod http;
mod openai;
mod pipeline;
mod utils;

use http::{build_router, AppState};
use openai::{OpenAiClient, Summarizer, SummaryProfile};

const DEFAULT_PORT: u16 = 7897;
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

#[tokio::main]
async fn main() {
    // Load .env before reading any configuration
    dotenvy::dotenv().ok();

    let matches = Command::new("extrato-api")
        .version(env!("CARGO_PKG_VERSION"))
        .about("HTTP API that analyzes PDF bank statements with OpenAI")
        .long_about(
            "This service exposes three endpoints:\n\
            - GET /: API description\n\
            - GET /status: liveness indicator\n\
            - POST /resumir: downloads a PDF bank statement from a URL, \
            extracts its text and generates a detailed financial report",
        )
        .arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .help("Port to listen on (overrides the PORT environment variable)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .value_name("MODEL")
                .help("OpenAI model identifier (overrides OPENAI_MODEL)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .value_name("PROFILE")
                .help("Summary profile: 'bank-statement' (default) or 'generic'")
                .action(clap::ArgAction::Set),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let port_raw = matches
        .get_one::<String>("port")
        .cloned()
        .or_else(|| env::var("PORT").ok());
    let port = match port_raw {
        Some(raw) => match raw.parse::<u16>() {
            Ok(port) => port,
            Err(_) => {
                error!("Invalid port value: {}", raw);
                process::exit(1);
            }
        },
        None => DEFAULT_PORT,
    };

    let model = matches
        .get_one::<String>("model")
        .cloned()
        .or_else(|| env::var("OPENAI_MODEL").ok())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let profile = match matches.get_one::<String>("profile").map(String::as_str) {
        None | Some("bank-statement") => SummaryProfile::BankStatement,
        Some("generic") => SummaryProfile::Generic,
        Some(other) => {
            error!("Unknown summary profile: {}", other);
            process::exit(1);
        }
    };

    // Startup is allowed without a key; /resumir requests will fail with a
    // summarization error until OPENAI_API_KEY is configured.
    let api_key = env::var("OPENAI_API_KEY").ok().filter(|key| !key.is_empty());
    if api_key.is_none() {
        warn!("OpenAI API key not found - check the OPENAI_API_KEY environment variable");
    }

    let mut client = OpenAiClient::new(api_key);
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        client = client.with_base_url(base_url);
    }
    let summarizer = Summarizer::new(Arc::new(client), model.clone(), profile);
    let app = build_router(AppState {
        summarizer: Arc::new(summarizer),
    });

    let addr = format!("0.0.0.0:{}", port);
    info!(model = %model, profile = ?profile, "Starting HTTP server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        process::exit(1);
    }
}
