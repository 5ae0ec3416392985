use std::io;
use std::process;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod error;
pub mod model;
pub mod scanner;
pub mod session;

fn main() {
    let search_args = args::Search::parse();

    init_tracing(search_args.verbose);

    if let Err(error) = run(search_args) {
        eprintln!("{}", diagnostic(&error));
        process::exit(1);
    }
}

/// The whole cause chain on one line.
fn diagnostic(error: &anyhow::Error) -> String {
    format!("Error: {error:#}")
}

fn run(search_args: args::Search) -> Result<()> {

    let endpoint = search_args.endpoint.clone();
    let timeout = Duration::from_secs(search_args.timeout);
    let request = model::SearchRequest::try_from(search_args)?;

    debug!(?request, "search request");

    let opened_at = Instant::now();
    let session = session::HttpSession::open(endpoint, timeout)?;
    debug!(elapsed = ?opened_at.elapsed(), endpoint = %session.endpoint(), "session opened");

    let stdout = io::stdout();
    let summary = scanner::scan(&session, &request, &mut stdout.lock())?;

    info!(
        entries = summary.entries,
        deals = summary.deals,
        "scan finished"
    );

    Ok(())
}

/// Logs go to stderr; stdout is reserved for deal blocks.
fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "cheapflight=debug"
    } else {
        "cheapflight=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
