use anyhow::Result;
use clap::Parser;
use janus_matcher::config::MatcherConfig;
use janus_matcher::matching::{MatchOutcome, MatchTableBuilder, RequestContext};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "janus",
    about = "Resolve a request path and host against an endpoint table"
)]
struct Cli {
    /// Path to the endpoint config file (.toml or .json)
    #[arg(short, long, default_value = "endpoints.toml")]
    config: PathBuf,

    /// Request path to match
    #[arg(short, long)]
    path: String,

    /// Request Host header value (may include a port)
    #[arg(long, default_value = "")]
    host: String,

    /// Treat the request as HTTPS (default port 443 instead of 80)
    #[arg(long)]
    secure: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = MatcherConfig::load(&cli.config)?;
    let endpoints = config.build_endpoints()?;
    let table = MatchTableBuilder::new().build(&endpoints);

    let request = RequestContext::new(&cli.path, &cli.host, cli.secure);
    match table.match_request(&request) {
        MatchOutcome::Selected(endpoint) => {
            println!("matched: {} ({})", endpoint.name(), endpoint.pattern().raw());
            Ok(())
        }
        MatchOutcome::Ambiguous(endpoints) => {
            let names: Vec<&str> = endpoints.iter().map(|e| e.name()).collect();
            anyhow::bail!("ambiguous match between: {}", names.join(", "))
        }
        MatchOutcome::NoMatch => anyhow::bail!("no endpoint matched"),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false),
        )
        .init();
}
