// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava Sync CLI
//!
//! Mirrors the authorized athlete's Strava data into a local SQLite store
//! that read-only tools can query.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use strava_sync::{
    build_sync_service,
    config::Config,
    db::{Database, TokenStore},
    error::Result,
    services::PageLimit,
    time_utils::{format_unix_rfc3339, unix_now},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "strava-sync", version, about = "Sync Strava data to a local database")]
struct Cli {
    /// Path to the SQLite database (overrides STRAVA_DB_PATH)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Emit JSON log lines instead of human-readable ones
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sync athlete profile, stats, gear and activities
    Sync {
        /// Limit to this many pages of activities (100 per page)
        #[arg(long, conflicts_with = "full", value_parser = clap::value_parser!(u32).range(1..))]
        pages: Option<u32>,

        /// Fetch all activities
        #[arg(long)]
        full: bool,
    },
    /// Fetch detailed data for one activity
    Activity {
        /// Strava activity ID
        id: i64,
    },
    /// Print the Strava consent URL that yields an authorization code
    AuthUrl,
    /// Exchange an authorization code (see `auth-url`) for the first credential
    ExchangeCode {
        /// The `code` parameter from the OAuth redirect
        code: String,
    },
    /// Show the stored credential's validity (no network)
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Sync failed");
            eprintln!("Error: {}", e);
            if e.requires_reauthorization() {
                eprintln!("Re-run the setup tool to authorize this installation again.");
            } else if e.is_retryable() {
                eprintln!("This looks transient; run the command again later.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // `status` only reads the local store.
    if let Command::Status = cli.command {
        let db_path = match cli.db_path {
            Some(path) => path,
            None => Config::db_path_from_env()?,
        };
        return print_status(&Database::open(&db_path)?);
    }

    let mut config = Config::from_env()?;
    if let Some(path) = cli.db_path {
        config.db_path = path;
    }

    if let Command::AuthUrl = cli.command {
        println!("Open this URL, approve access, then run `strava-sync exchange-code <CODE>`:");
        println!("{}", config.authorize_url()?);
        return Ok(());
    }

    tracing::info!(path = %config.db_path.display(), "Connecting to database");
    let db = Database::open(&config.db_path)?;

    match cli.command {
        Command::Status | Command::AuthUrl => {}
        Command::Sync { pages, full } => {
            let limit = if full {
                PageLimit::Unlimited
            } else {
                PageLimit::Limited(pages.unwrap_or(config.page_limit))
            };

            let mut service = build_sync_service(&config, db)?;
            let summary = service.sync(limit).await?;

            println!("\nSync complete!");
            println!("Athlete: {}", summary.athlete_name);
            println!(
                "Activities: {} fetched, {} saved, {} skipped",
                summary.activities_fetched, summary.activities.written, summary.activities.skipped
            );
            println!("Gear: {} saved", summary.gear.written);
            if !summary.stats_synced {
                println!("Athlete stats: not updated (see log)");
            }
            println!(
                "Access token valid until: {}",
                format_unix_rfc3339(summary.token_expires_at)
            );
            println!("Database: {}", config.db_path.display());
        }
        Command::Activity { id } => {
            let mut service = build_sync_service(&config, db)?;
            let row = service.sync_one_activity(id).await?;
            println!("Saved detailed data for activity {} ({})", row.id, row.name);
        }
        Command::ExchangeCode { code } => {
            let mut service = build_sync_service(&config, db)?;
            let exchange = service.authorize(&code).await?;
            println!(
                "Authorized. Access token valid until: {}",
                format_unix_rfc3339(exchange.credential.expires_at)
            );
        }
    }

    Ok(())
}

fn print_status(db: &Database) -> Result<()> {
    match db.get_current()? {
        Some(credential) => {
            let state = if credential.is_usable_at(unix_now()) {
                "valid"
            } else {
                "expired (will refresh on next sync)"
            };
            println!("Stored credential: {}", state);
            println!(
                "Expires at: {}",
                format_unix_rfc3339(credential.expires_at)
            );
        }
        None => println!("No stored credential; the configured refresh token will be used."),
    }
    Ok(())
}

/// Initialize logging to stderr, human-readable or flattened JSON.
fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("strava_sync=debug,info"));

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
