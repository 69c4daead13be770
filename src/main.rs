//! mocktree - CLI entry point.

use anyhow::Result;
use clap::Parser;
use mocktree::{load_endpoints, MockServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "mocktree",
    about = "Directory-driven mock HTTP server - declarative endpoint stubs with request interpolation",
    version
)]
struct Args {
    /// Directory containing endpoint definition files
    #[arg(short, long, default_value = "mocks")]
    dir: PathBuf,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, default_value = "info")]
    log_level: Level,

    /// Load definitions, print a summary, and exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // A missing root directory is the one fatal load failure.
    let outcome = load_endpoints(&args.dir)?;

    for diagnostic in &outcome.diagnostics {
        warn!(source = %diagnostic.source, "Skipped: {}", diagnostic.detail);
    }

    if args.validate {
        println!(
            "Loaded {} endpoints from {} ({} items skipped)",
            outcome.endpoints.len(),
            args.dir.display(),
            outcome.diagnostics.len()
        );
        return Ok(());
    }

    if outcome.endpoints.is_empty() {
        warn!(dir = %args.dir.display(), "No endpoint definitions found; every request will 404");
    }

    let server = MockServer::new(outcome.endpoints);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, routes = server.route_count(), "Mock server listening");

    server.serve(listener).await?;

    Ok(())
}
