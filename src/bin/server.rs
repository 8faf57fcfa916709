//! mcp-mem0 MCP server
//!
//! Run with: mcp-mem0-server

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use mcp_mem0::auth::AccessGate;
use mcp_mem0::config::{EngineConfig, EngineSettings, Transport};
use mcp_mem0::engine::{Mem0Client, SessionContext};
use mcp_mem0::error::Result;
use mcp_mem0::mcp::{MemoryToolHandler, StdioServer, SSE_PATH};

#[derive(Parser)]
#[command(name = "mcp-mem0-server")]
#[command(about = "MCP server for long term memory storage and retrieval with mem0")]
#[command(version)]
struct Args {
    /// Transport to serve MCP over
    #[arg(long, env = "TRANSPORT", value_enum, default_value_t = Transport::Sse)]
    transport: Transport,

    /// Address to bind (sse transport)
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to bind (sse transport)
    #[arg(long, env = "PORT", default_value = "8050")]
    port: u16,

    /// Bearer token required on the session endpoint; unset disables auth
    #[arg(long, env = "MCP_SERVER_AUTH_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Log output format (text or json)
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    log_format: String,

    #[command(flatten)]
    engine: EngineSettings,
}

fn init_logging(format: &str) {
    let fmt_layer = match format {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();

    // Logs go to stderr (stdout carries the protocol in stdio mode)
    init_logging(&args.log_format);

    if let Err(e) = dotenv {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let config = EngineConfig::resolve(&args.engine)?;
    let client = Mem0Client::connect(&args.engine, &config).await?;
    let session = SessionContext::new(Arc::new(client));

    match args.transport {
        Transport::Sse => {
            let gate = AccessGate::new(args.auth_token, SSE_PATH);
            let addr = SocketAddr::new(args.host, args.port);
            tracing::info!("mcp-mem0 starting SSE transport on {}", addr);
            mcp_mem0::server::serve(addr, session, gate).await?;
        }
        Transport::Stdio => {
            tracing::info!("mcp-mem0 starting stdio transport");
            StdioServer::new(MemoryToolHandler::new(session)).run().await?;
        }
    }

    Ok(())
}
