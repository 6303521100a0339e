use anyhow::{Context, Result};
use clap::Parser;
use precis::api::app_api_loop;
use precis::llm::GeminiClient;
use precis::logging::configure_logging;
use precis::Config;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Summarize text into abstracts, LinkedIn posts and Twitter threads", long_about = None)]
struct Args {
    /// Address to listen on (overrides HOST)
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Directory for rolling log files (overrides LOG_DIR)
    #[arg(long)]
    log_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(log_dir) = args.log_dir {
        config.log_dir = log_dir;
    }

    configure_logging(&config.log_dir);

    info!(
        "Using model {} at {}",
        config.gemini_model, config.gemini_base_url
    );
    if config.client_api_key.is_none() {
        info!("CLIENT_API_KEY not set, summarize endpoint is open");
    }

    let generator = GeminiClient::with_endpoint(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_base_url.clone(),
    )
    .context("Failed to build upstream client")?;

    app_api_loop(config, Arc::new(generator)).await
}
