//! Report server
//!
//! Serves `POST /api/report`, forwarding market data to the completion API.
//!
//! # Usage
//!
//! ```bash
//! export OPENAI_API_KEY="sk-..."
//! # optional: OPENAI_API_BASE, OPENAI_MODEL, REPORT_SERVER_ADDR, RUST_LOG
//!
//! cargo run --bin report-server -p stock-report -- --addr 0.0.0.0:3000
//! ```

use clap::Parser;
use report_llm::providers::{OpenAIConfig, OpenAIProvider};
use report_utils::{LogFormat, init_tracing_with};
use std::sync::Arc;
use stock_report::{ReportConfig, ReportService, server};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "report-server")]
#[command(about = "HTTP endpoint that turns market data into a stock report", long_about = None)]
struct Args {
    /// Address to bind (overrides REPORT_SERVER_ADDR)
    #[arg(short, long)]
    addr: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing_with("info,stock_report=debug", format);

    let mut builder = ReportConfig::builder();
    if let Some(addr) = args.addr {
        builder = builder.server_addr(addr);
    }
    let config = builder.with_env().build()?;

    let openai_config = OpenAIConfig::new(config.require_openai_key()?)
        .with_api_base(config.openai_api_base.clone())
        .with_timeout(config.completion_timeout.as_secs());
    let provider = Arc::new(OpenAIProvider::with_config(openai_config)?);

    info!(
        model = %config.completion.model,
        api_base = %config.openai_api_base,
        "Completion provider ready"
    );

    let service = ReportService::new(provider, config.completion.clone())?;
    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;

    server::serve(listener, Arc::new(service)).await?;
    Ok(())
}
