mod config;
mod converter;
mod gemini;
mod models;
mod request_id;
mod router;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use config::RelayConfig;
use gemini::GeminiClient;
use router::{chat_turn, index, AppState};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, Level};

// Large enough to admit a base64-encoded image in the request body.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "gemini-relay")]
#[command(about = "A stateless chat relay for the Gemini generateContent API")]
struct Args {
    #[arg(short, long, default_value = "0.0.0.0")]
    ip: String,

    #[arg(short, long, default_value = "4000")]
    port: u16,

    /// Gemini model to forward chat turns to
    #[arg(short, long, default_value = config::DEFAULT_MODEL)]
    model: String,

    #[arg(long, default_value = config::DEFAULT_API_BASE)]
    api_base: String,

    /// API key; falls back to the GEMINI_API_KEY environment variable
    #[arg(long)]
    api_key: Option<String>,

    /// trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Do not inject a default prompt when a turn carries only an image
    #[arg(long)]
    no_image_fallback: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = Level::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using INFO level.", args.log_level);
        Level::INFO
    });
    tracing_subscriber::fmt().with_max_level(log_level).init();

    // Missing credential is fatal before the listener is bound.
    let config = RelayConfig::new(
        args.api_base,
        args.api_key,
        args.model,
        args.no_image_fallback,
    )?;

    let http_client = Arc::new(reqwest::Client::new());
    let client = Arc::new(GeminiClient::new(
        http_client,
        config.api_base.clone(),
        config.api_key.clone(),
        config.model.clone(),
    ));

    let app_state = AppState {
        client,
        fallback_prompt: config.fallback_prompt.clone(),
    };

    let app = Router::new()
        .route("/api/chat", post(chat_turn))
        .route("/", get(index))
        .layer(axum::middleware::from_fn(request_id::inject_request_id))
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state);

    let bind_address = format!("{}:{}", args.ip, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(
        "Relay for model {} started on http://{}",
        config.model, bind_address
    );

    axum::serve(listener, app).await?;
    Ok(())
}
