//! Blog worker
//!
//! Runs migrations and the scheduled publication job. `publish-scheduled`
//! performs a single run and prints the report as JSON, for cron setups that
//! prefer an external timer over the built-in scheduler.

use anyhow::{Context, Result};
use blog_core::domains::blogs::activities::publish_scheduled_posts;
use blog_core::kernel::{start_scheduler, BlogDeps};
use blog_core::Config;
use chrono::Utc;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blog_worker")]
#[command(about = "Blog migrations and scheduled post publication")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,

    /// Publish due scheduled posts once and print the report
    PublishScheduled {
        /// Override PUBLISH_BATCH_LIMIT for this run
        #[arg(long)]
        limit: Option<i64>,
    },

    /// Run migrations, then publish on PUBLISH_SCHEDULE until Ctrl-C
    Scheduler,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,blog_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = connect(&config).await?;

    match cli.command {
        Commands::Migrate => migrate(&pool).await,
        Commands::PublishScheduled { limit } => cmd_publish_scheduled(pool, &config, limit).await,
        Commands::Scheduler => cmd_scheduler(pool, &config).await,
    }
}

async fn connect(config: &Config) -> Result<PgPool> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");
    Ok(pool)
}

async fn migrate(pool: &PgPool) -> Result<()> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");
    Ok(())
}

// ============================================================================
// Commands
// ============================================================================

async fn cmd_publish_scheduled(pool: PgPool, config: &Config, limit: Option<i64>) -> Result<()> {
    let deps = BlogDeps::new(pool, config);
    let batch_limit = limit.unwrap_or(deps.publish_batch_limit);

    let report =
        publish_scheduled_posts(deps.publication_store.as_ref(), batch_limit, Utc::now()).await;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(e) = report.scan_error {
        anyhow::bail!("Scheduled publication scan failed: {}", e);
    }
    Ok(())
}

async fn cmd_scheduler(pool: PgPool, config: &Config) -> Result<()> {
    migrate(&pool).await?;

    let deps = BlogDeps::new(pool, config);
    let mut scheduler = start_scheduler(deps, &config.publish_schedule)
        .await
        .context("Failed to start scheduler")?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    tracing::info!("Shutting down scheduler");
    scheduler.shutdown().await?;
    Ok(())
}
