// Market Cap Comparison - Web Server
// REST API + rendered comparison page with Axum

use anyhow::{Context, Result};
use clap::Parser;
use mcap_compare::api::{router, AppState};
use mcap_compare::{init_logging, ComparisonState, LogArgs, SourceArgs, Sources};

#[derive(Debug, Parser)]
#[command(name = "mcap-server", version, about = "Serve the market cap comparison over HTTP")]
struct ServerCli {
    #[command(flatten)]
    sources: SourceArgs,

    #[command(flatten)]
    log: LogArgs,

    /// Address to listen on
    #[arg(long, env = "MCAP_ADDR", default_value = "0.0.0.0:3000")]
    addr: String,
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ServerCli::parse();
    init_logging(cli.log);

    println!("🌐 Market Cap Comparison - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let sources = Sources::new(
        &cli.sources.market_url,
        cli.sources.table.clone(),
        cli.sources.timeout(),
    )?;

    let mut comparison = ComparisonState::new(cli.sources.window());
    sources
        .refresh_into(&mut comparison)
        .await
        .context("Initial load failed")?;

    match comparison.selection() {
        Some(sel) => println!("✓ Current comparison: {}", sel.chosen.label),
        None => println!("⚠ No comparison yet (POST /api/refresh to retry)"),
    }

    let state = AppState::new(
        comparison,
        Some(sources),
        &cli.sources.subject,
        &cli.sources.subject_url,
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&cli.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", cli.addr))?;

    println!("\n🚀 Server running on http://{}", cli.addr);
    println!("   API: http://{}/api/comparison", cli.addr);
    println!("   UI:  http://{}", cli.addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .context("Server stopped with an error")?;

    Ok(())
}
