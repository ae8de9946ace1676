//! CLI administration tool for shortstat.
//!
//! Works directly on the store file, so stop the server before running
//! commands that write (`shorten`, `reset`); the server keeps its own
//! in-memory copy and would overwrite changes on its next write.
//!
//! # Usage
//!
//! ```bash
//! # Show the most visited links
//! cargo run --bin shortstat-admin -- stats --limit 10
//!
//! # Inspect a code without counting a visit
//! cargo run --bin shortstat-admin -- lookup aB3x_Q
//!
//! # Shorten a URL offline
//! cargo run --bin shortstat-admin -- shorten https://example.com/page
//!
//! # Delete the whole store
//! cargo run --bin shortstat-admin -- reset
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_PATH` (optional): store file, overridden by `--store`
//! - `BASE_URL` (optional): used to print full short URLs

use shortstat::application::services::LinkService;
use shortstat::infrastructure::persistence::JsonFileEntryRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// CLI tool for managing a shortstat store.
#[derive(Parser)]
#[command(name = "shortstat-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the store file
    #[arg(long, env = "STORE_PATH", default_value = "url_stats.json")]
    store: PathBuf,

    /// Public base URL used when printing short URLs
    #[arg(long, env = "BASE_URL", default_value = "http://localhost:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show links sorted by visits
    Stats {
        /// Show at most this many links
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a single link without counting a visit
    Lookup {
        /// Short code
        code: String,
    },

    /// Shorten a URL (or show its existing code)
    Shorten {
        /// Absolute URL to shorten
        url: String,
    },

    /// Delete the store file and every link in it
    Reset {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { limit } => {
            let service = open_service(&cli.store).await?;
            show_stats(&service, &cli.base_url, limit).await?
        }
        Commands::Lookup { code } => {
            let service = open_service(&cli.store).await?;
            lookup(&service, &cli.base_url, &code).await?
        }
        Commands::Shorten { url } => {
            let service = open_service(&cli.store).await?;
            shorten(&service, &cli.base_url, &url).await?
        }
        Commands::Reset { yes } => reset_store(&cli.store, yes).await?,
    }

    Ok(())
}

/// Opens the store file behind a link service.
async fn open_service(path: &Path) -> Result<LinkService<JsonFileEntryRepository>> {
    let repository = JsonFileEntryRepository::open(path)
        .await
        .with_context(|| format!("Failed to open store {}", path.display()))?;
    Ok(LinkService::new(Arc::new(repository)))
}

/// Prints links sorted by visits.
///
/// # Output Format
///
/// ```text
/// 📊 Statistics
///
///   Code    Visits  Original URL
///   ─────────────────────────────────────────────
///   aB3x_Q      12  https://example.com/page
/// ```
async fn show_stats(
    service: &LinkService<JsonFileEntryRepository>,
    base_url: &str,
    limit: Option<usize>,
) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let entries = service
        .stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read store: {}", e))?;

    if entries.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<8} {:>7}  {}",
        "Code".bright_white().bold(),
        "Visits".bright_white().bold(),
        "Original URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(60).bright_black());

    let total_visits: u64 = entries.iter().map(|e| e.visits).sum();
    let shown = limit.unwrap_or(entries.len());

    for entry in entries.iter().take(shown) {
        println!(
            "  {:<8} {:>7}  {}",
            entry.code.cyan(),
            entry.visits.to_string().bright_green(),
            entry.original_url
        );
    }

    println!();
    println!(
        "  Links: {}   Visits: {}",
        entries.len().to_string().bright_white().bold(),
        total_visits.to_string().bright_white().bold()
    );
    println!(
        "  Short URLs look like {}",
        service.short_url(base_url, "<code>").bright_black()
    );
    println!();

    Ok(())
}

/// Prints one link.
async fn lookup(
    service: &LinkService<JsonFileEntryRepository>,
    base_url: &str,
    code: &str,
) -> Result<()> {
    let entry = service
        .get(code)
        .await
        .with_context(|| format!("No link with code '{}'", code))?;

    println!("  Code:      {}", entry.code.cyan());
    println!("  Short URL: {}", service.short_url(base_url, &entry.code).bright_yellow());
    println!("  Target:    {}", entry.original_url);
    println!("  Visits:    {}", entry.visits.to_string().bright_green().bold());

    Ok(())
}

/// Shortens a URL through the link service, reusing an existing code.
async fn shorten(
    service: &LinkService<JsonFileEntryRepository>,
    base_url: &str,
    url: &str,
) -> Result<()> {
    let outcome = service
        .shorten_or_reuse(url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    if outcome.reused {
        println!("{}", "ℹ️  This URL already has a short code".yellow());
    } else {
        println!("{}", "✅ Short URL created".green().bold());
    }
    println!(
        "  {}",
        service.short_url(base_url, &outcome.code).bright_yellow()
    );

    Ok(())
}

/// Deletes the store file after confirmation.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes`
/// - A missing file is reported, not treated as an error
async fn reset_store(path: &Path, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Reset Store".bright_blue().bold());
    println!();

    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        println!("{}", format!("  No store at {}", path.display()).yellow());
        return Ok(());
    }

    println!("  Store: {}", path.display().to_string().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete every link and visit count?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    tokio::fs::remove_file(path)
        .await
        .with_context(|| format!("Failed to delete {}", path.display()))?;

    println!("{}", "✅ Store deleted".green().bold());
    Ok(())
}
