use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;

use mcap_compare::format::{format_entry_value, today};
use mcap_compare::{init_logging, render_text, ComparisonState, LogArgs, SourceArgs, Sources};

#[derive(Debug, Parser)]
#[command(name = "mcap-compare", version, about = "What is the market cap worth today?")]
struct Cli {
    #[command(flatten)]
    sources: SourceArgs,

    #[command(flatten)]
    log: LogArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Interactive terminal view (default)
    Tui,
    /// Print the comparison once and exit
    Show {
        /// Emit the view as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the loaded reference table
    Table,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log);

    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let sources = Sources::new(
        &cli.sources.market_url,
        cli.sources.table.clone(),
        cli.sources.timeout(),
    )?;

    match cli.command.clone().unwrap_or(Command::Tui) {
        Command::Tui => run_ui_mode(&cli.sources, &runtime, sources)?,
        Command::Show { json } => run_show(&cli.sources, &runtime, &sources, json)?,
        Command::Table => run_table(&runtime, &sources)?,
    }

    Ok(())
}

fn load_state(args: &SourceArgs, runtime: &Runtime, sources: &Sources) -> Result<ComparisonState> {
    let mut state = ComparisonState::new(args.window());
    runtime.block_on(sources.refresh_into(&mut state))?;
    Ok(state)
}

fn run_show(args: &SourceArgs, runtime: &Runtime, sources: &Sources, json: bool) -> Result<()> {
    let state = load_state(args, runtime, sources)?;

    let Some(view) = state.view(today(), &args.subject, &args.subject_url) else {
        eprintln!("❌ No comparison available");
        eprintln!("   The market value is missing or the table is empty.");
        std::process::exit(1);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_text(&view));
    }

    Ok(())
}

fn run_table(runtime: &Runtime, sources: &Sources) -> Result<()> {
    println!("📂 Loading table from {}...", sources.table_source().describe());
    let report = runtime.block_on(sources.table())?;

    for (i, entry) in report.table.iter().enumerate() {
        println!(
            "{:>4}  {:<32} {:>22}  {}",
            i,
            entry.label,
            format_entry_value(entry.value),
            entry.category
        );
    }

    println!("\n✓ {}", report.summary());
    for rejected in &report.rejected {
        println!("  ⚠ {}", rejected);
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(args: &SourceArgs, runtime: &Runtime, sources: Sources) -> Result<()> {
    println!("🖥️  Loading comparison...\n");
    let state = load_state(args, runtime, &sources)?;

    let handle = runtime.handle().clone();
    let refresh = Box::new(move || handle.block_on(sources.live_value()));

    let mut app = mcap_compare::ui::App::new(
        state,
        &args.subject,
        &args.subject_url,
        today(),
        refresh,
    );
    mcap_compare::ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_args: &SourceArgs, _runtime: &Runtime, _sources: Sources) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print once: mcap-compare show");
    std::process::exit(1);
}
