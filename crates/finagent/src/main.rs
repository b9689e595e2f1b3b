use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use finagent::sources::{Credentials, ReqwestTransport};
use finagent::Family;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "finagent", about = "Financial assistant tool handlers")]
struct Cli {
    /// Handler family to run: technical, fundamental or market
    #[arg(short, long)]
    family: Family,

    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read the invocation JSON from a file instead of stdin
    #[arg(short, long)]
    input: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env file is fine; keys may come from the real environment.
    dotenvy::dotenv().ok();

    // Respects RUST_LOG
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = finagent::load_config(cli.config.as_deref())?;
    let credentials = Credentials::from_env(&config);
    let transport = Arc::new(ReqwestTransport::new().context("Failed to build HTTP client")?);
    let dispatcher = finagent::build_dispatcher(cli.family, &config, credentials, transport);

    let event = if let Some(input_path) = &cli.input {
        std::fs::read_to_string(input_path)
            .with_context(|| format!("Failed to read input: {input_path}"))?
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    };

    info!(family = %cli.family, "Dispatching invocation");
    let response = finagent::invoke(&dispatcher, &event).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");

    Ok(())
}
