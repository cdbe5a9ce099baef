//! Command-line runner for link-repair.
//!
//! Validates the hyperlinks of a JSON document and optionally repairs their
//! display text.
//!
//! # Usage
//!
//! ```bash
//! # Validate every hyperlink and print a summary
//! cargo run -- validate document.json
//!
//! # Also print the full results as JSON
//! cargo run -- validate document.json --json
//!
//! # Validate, then rewrite stale display text as tracked changes
//! cargo run -- repair document.json --track-changes
//!
//! # Same, without the confirmation prompt, into a new file
//! cargo run -- repair document.json --yes --output repaired.json
//! ```
//!
//! # Environment Variables
//!
//! See [`link_repair::config`]. `TEST_MODE=1` runs without network access.

use link_repair::AppState;
use link_repair::config::{self, Config};
use link_repair::domain::entities::{Document, LinkStatus, ValidationResult};
use link_repair::domain::progress::ValidationProgress;
use link_repair::infrastructure::retry::{RetryContext, RetryExecutor, RetryObserver};
use link_repair::utils::title::repair_display_text;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Validates and repairs hyperlinks in documents.
#[derive(Parser)]
#[command(name = "link-repair")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every hyperlink in a document
    Validate {
        /// Path to the document (JSON)
        path: PathBuf,

        /// Print the full results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate, then repair stale hyperlink display text
    Repair {
        /// Path to the document (JSON)
        path: PathBuf,

        /// Record edits as tracked deletions and insertions
        #[arg(long)]
        track_changes: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Write the repaired document here instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    init_tracing(&config);
    config.print_summary();

    let retry = RetryExecutor::with_observer(Arc::new(ConsoleRetryObserver));
    let state = AppState::from_config(&config, retry).context("Failed to build pipeline")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    match cli.command {
        Commands::Validate { path, json } => run_validate(&state, &path, json, &cancel).await?,
        Commands::Repair {
            path,
            track_changes,
            yes,
            output,
        } => {
            let output = output.unwrap_or_else(|| path.clone());
            run_repair(&state, &path, &output, track_changes, yes, &cancel).await?
        }
    }

    Ok(())
}

/// Installs the global subscriber; logs go to stderr so stdout stays clean.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Prints a notice on stderr whenever a remote call is retried.
struct ConsoleRetryObserver;

impl RetryObserver for ConsoleRetryObserver {
    fn on_retry(&self, context: &RetryContext) {
        eprintln!(
            "  {} {} attempt {}/{} failed ({}), retrying in {}ms",
            "↻".yellow(),
            context.policy_name.bright_black(),
            context.attempt,
            context.max_attempts,
            context.last_error,
            context.delay.as_millis()
        );
    }
}

async fn load_document(state: &AppState, path: &Path, cancel: &CancellationToken) -> Result<Document> {
    state
        .store
        .load(path, cancel)
        .await
        .with_context(|| format!("Failed to load document {}", path.display()))
}

/// Validates every hyperlink of `document`; results follow document order.
async fn validate_document(
    state: &AppState,
    document: &Document,
    cancel: &CancellationToken,
) -> Vec<ValidationResult> {
    let hyperlinks = document.hyperlinks();
    let order: HashMap<String, usize> = hyperlinks
        .iter()
        .enumerate()
        .map(|(i, h)| (h.id.clone(), i))
        .collect();

    let (tx, rx) = mpsc::channel(64);
    let reporter = tokio::spawn(report_progress(rx));

    let mut results = state.batch.run(hyperlinks, cancel, Some(tx)).await;
    reporter.await.ok();

    results.sort_by_key(|r| order.get(&r.hyperlink_id).copied().unwrap_or(usize::MAX));
    results
}

async fn report_progress(mut rx: mpsc::Receiver<ValidationProgress>) {
    while let Some(event) = rx.recv().await {
        eprintln!(
            "  {} {} {}",
            format!("[{}/{}]", event.completed, event.total).bright_black(),
            event.hyperlink_id.cyan(),
            colored_status(event.status)
        );
    }
}

fn colored_status(status: LinkStatus) -> ColoredString {
    match status {
        LinkStatus::Valid => status.as_str().green(),
        LinkStatus::Expired => status.as_str().yellow(),
        LinkStatus::NotFound | LinkStatus::Invalid => status.as_str().red(),
        LinkStatus::Error => status.as_str().red().bold(),
    }
}

/// Validates a document and prints a summary table.
async fn run_validate(
    state: &AppState,
    path: &Path,
    json: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    println!("{}", "🔎 Validate Hyperlinks".bright_blue().bold());
    println!();

    let document = load_document(state, path, cancel).await?;
    let results = validate_document(state, &document, cancel).await;

    print_results(&results);

    if json {
        println!();
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    Ok(())
}

fn print_results(results: &[ValidationResult]) {
    println!();

    if results.is_empty() {
        println!("{}", "  No hyperlinks found".yellow());
        return;
    }

    println!(
        "  {:<12} {:<20} {:<8} {:<10} {}",
        "ID".bright_white().bold(),
        "Lookup ID".bright_white().bold(),
        "Content".bright_white().bold(),
        "Status".bright_white().bold(),
        "Note".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for result in results {
        let note = if result.requires_update {
            "needs update".yellow().to_string()
        } else {
            result.error_message.clone().unwrap_or_default()
        };

        println!(
            "  {:<12} {:<20} {:<8} {:<10} {}",
            result.hyperlink_id.cyan(),
            result.lookup_id,
            result.content_id.bright_black(),
            colored_status(result.status),
            note
        );
    }

    let count = |status: LinkStatus| results.iter().filter(|r| r.status == status).count();
    let needs_update = results.iter().filter(|r| r.requires_update).count();

    println!();
    println!(
        "  Total: {}  {} {}  {} {}  {} {}  {} {}",
        results.len().to_string().bright_white().bold(),
        "valid".green(),
        count(LinkStatus::Valid),
        "expired".yellow(),
        count(LinkStatus::Expired),
        "broken".red(),
        count(LinkStatus::NotFound) + count(LinkStatus::Invalid),
        "errors".red().bold(),
        count(LinkStatus::Error)
    );
    println!(
        "  Needing update: {}",
        needs_update.to_string().bright_yellow().bold()
    );
}

/// Validates a document, shows the planned edits and applies them.
///
/// # Flow
///
/// 1. Load and validate the document
/// 2. List every hyperlink whose display text would change
/// 3. Confirm (unless `--yes`)
/// 4. Apply the repairs and save
async fn run_repair(
    state: &AppState,
    path: &Path,
    output: &Path,
    track_changes: bool,
    skip_confirm: bool,
    cancel: &CancellationToken,
) -> Result<()> {
    println!("{}", "🔧 Repair Hyperlinks".bright_blue().bold());
    println!();

    let mut document = load_document(state, path, cancel).await?;
    let results = validate_document(state, &document, cancel).await;
    print_results(&results);

    let current_text: HashMap<&str, String> = document
        .hyperlinks
        .iter()
        .map(|h| (h.id.as_str(), h.display_text()))
        .collect();

    let planned: Vec<(&ValidationResult, String)> = results
        .iter()
        .filter(|r| r.requires_update && r.status != LinkStatus::Error)
        .filter_map(|r| {
            let comparison = r.title_comparison.as_ref()?;
            let new_text = repair_display_text(&comparison.api_title, &r.content_id);
            (current_text.get(r.hyperlink_id.as_str()) != Some(&new_text)).then_some((r, new_text))
        })
        .collect();

    println!();
    if planned.is_empty() {
        println!("{}", "✅ Nothing to repair".green().bold());
        return Ok(());
    }

    println!("{}", "Planned changes:".bright_white().bold());
    for (result, new_text) in &planned {
        let old_text = current_text
            .get(result.hyperlink_id.as_str())
            .cloned()
            .unwrap_or_default();
        println!(
            "  {}: {} → {}",
            result.hyperlink_id.cyan(),
            old_text.bright_black(),
            new_text.bright_white()
        );
    }
    println!();

    if !skip_confirm {
        let prompt = if track_changes {
            format!("Apply {} repairs as tracked changes?", planned.len())
        } else {
            format!("Apply {} repairs?", planned.len())
        };
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let repaired = state
        .repair
        .apply_repairs(&mut document, &results, track_changes)
        .context("Failed to apply repairs")?;

    state
        .store
        .save(output, &document, cancel)
        .await
        .with_context(|| format!("Failed to save document {}", output.display()))?;

    println!();
    println!(
        "{} {} hyperlinks repaired, saved to {}",
        "✅".green(),
        repaired.to_string().bright_white().bold(),
        output.display().to_string().cyan()
    );
    println!();

    Ok(())
}
