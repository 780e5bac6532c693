//! pictionbridge: drain pending Piction updates to disk.
//!
//! Invoked once per polling cycle by an external scheduler (cron or similar);
//! deciding *when* to run is the caller's job. Configuration comes from the
//! environment, see [`BridgeConfig`].

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;

use pictionbridge_cli::{count_outcomes, init_tracing, CycleReport, UpdateReport};
use pictionbridge_core::{BridgeConfig, UpdateSource};
use pictionbridge_db::UpdateRepository;
use pictionbridge_storage::BinaryStore;

#[derive(Parser)]
#[command(name = "pictionbridge", about = "Bridge pending Piction updates to the archival work directory")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the number of pending updates in the interface table
    Status,
    /// Run one polling cycle: fetch, extract binaries, delete processed rows
    Drain {
        /// Maximum number of updates to process this cycle
        #[arg(long)]
        limit: Option<i64>,
        /// Leave processed rows in the interface table
        #[arg(long)]
        keep_rows: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let config = BridgeConfig::from_env()?;
    config.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let store = BinaryStore::new(&config.work_path).await?;
    let source = UpdateRepository::new(pool, config.interface_table.as_str(), store)?;

    match cli.command {
        Commands::Status => {
            let pending = source.update_count().await?;
            println!(
                "{}",
                serde_json::json!({ "pending": pending, "has_updates": pending > 0 })
            );
        }
        Commands::Drain { limit, keep_rows } => {
            let limit = limit.or(config.batch_limit);
            let updates = source.get_updates(limit).await?;
            let (extracted, failed) = count_outcomes(&updates);

            let mut deleted = 0;
            if !keep_rows {
                // Rows whose extraction failed stay in the table for the next
                // cycle; only successfully materialized updates are consumed.
                for update in updates.iter().filter(|u| u.binary.is_extracted()) {
                    source.delete_update(update).await?;
                    deleted += 1;
                }
            }

            let remaining = source.update_count().await?;

            tracing::info!(
                fetched = updates.len(),
                extracted,
                failed,
                deleted,
                remaining,
                "drain cycle finished"
            );

            let report = CycleReport {
                fetched: updates.len(),
                extracted,
                failed,
                deleted,
                remaining,
                updates: updates.iter().map(UpdateReport::from).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
