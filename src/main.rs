use anyhow::Result;
use clap::{Parser, Subcommand};
use http_stubs::cli;
use http_stubs::config::{DEFAULT_PORT, ServerConfig};
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stubsrv", version, about = "HTTP stub server with canned JSON responses")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve stub mappings over HTTP until Ctrl-C
    Serve {
        #[arg(long, env = "STUBSRV_HOST", default_value = "127.0.0.1")]
        host: IpAddr,
        #[arg(short, long, env = "STUBSRV_PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Mapping file or directory of *.json mappings
        #[arg(short, long, env = "STUBSRV_MAPPINGS")]
        mappings: Option<PathBuf>,
        /// Preload the built-in ReqRes fixtures
        #[arg(long)]
        reqres: bool,
        /// Keep at most this many journaled requests
        #[arg(long)]
        journal_limit: Option<usize>,
    },
    /// Validate mapping files without serving them
    Check { path: PathBuf },
    /// Call an endpoint and print selected JSON fields
    Call {
        method: String,
        url: String,
        #[arg(short, long)]
        body: Option<String>,
        /// JSON path to print, e.g. data.name (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Serve {
            host,
            port,
            mappings,
            reqres,
            journal_limit,
        } => {
            let config = ServerConfig {
                host,
                port,
                journal_limit,
                mappings,
                reqres_fixtures: reqres,
            };
            cli::serve_stubs(config).await
        }
        Command::Check { path } => cli::check_mappings(&path),
        Command::Call {
            method,
            url,
            body,
            fields,
        } => cli::call_endpoint(&method, &url, body.as_deref(), &fields).await,
    }
}
