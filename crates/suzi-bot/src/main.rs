//! Suzi Poo chat bot.
//!
//! Reads inbound messages as JSON lines on stdin, writes replies and
//! reminders as JSON lines on stdout, and logs to stderr.
//!
//! Run with: cargo run -p suzi-bot
//!
//! Configuration via .env file or environment variables:
//!   SUZI_BOT_USERNAME  - Bot username (required)
//!   SUZI_BOT_ID        - Bot numeric user ID (required)
//!   SQLITE_PATH        - Database file or sqlite: URL (default: ./data/suzi.db)
//!   SUZI_ADMIN_IDS     - Comma-separated admin user IDs
//!   RUST_LOG           - Log filter (default: info)

mod config;
mod transport;

use std::sync::Arc;

use database::Database;
use markov_brain::MarkovBrain;
use orchestrator::{Orchestrator, ReminderScheduler};
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::BotConfig;
use crate::transport::{read_inbound, LineSender};

/// Capacity of the inbound message queue.
const INBOUND_QUEUE: usize = 64;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };
    info!(bot = %config.orchestrator.bot.username, "Starting Suzi");

    if let Some(dir) = config.database_dir() {
        tokio::fs::create_dir_all(dir).await?;
    }
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let sender = Arc::new(LineSender::new(tokio::io::stdout(), config.admin_ids.clone()));
    let brain = MarkovBrain::new(db.clone(), config.brain.clone());
    let orchestrator = Orchestrator::new(db.clone(), brain, sender.clone(), config.orchestrator.clone());
    let scheduler = ReminderScheduler::new(db.clone(), sender)
        .with_poll_interval(config.orchestrator.reminder_interval);

    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let scheduler_task = tokio::spawn(async move {
        scheduler
            .run_with_shutdown(async move {
                let _ = shutdown_rx.changed().await;
            })
            .await;
    });

    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_QUEUE);
    // Blocking stdin reads cannot be cancelled, so the reader is left
    // detached when the process exits.
    std::thread::spawn(move || read_inbound(std::io::stdin().lock(), inbound_tx));

    orchestrator
        .run_with_shutdown(inbound_rx, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = scheduler_task.await {
        error!("Reminder scheduler task failed: {}", e);
    }

    db.close().await;
    info!("Suzi stopped");
    Ok(())
}
