use anyhow::Context;
use chrono::{Local, NaiveDate};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use internship_sync::jobs::{sync, RunSummary};
use internship_sync::{AppError, Config};

async fn run(today: NaiveDate) -> Result<RunSummary, AppError> {
    let config = Config::from_env()?;
    sync(&config, today).await
}

// One pass per invocation; scheduling is left to cron or CI.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // INFO by default, RUST_LOG overrides
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,sea_orm=warn"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    run(Local::now().date_naive())
        .await
        .context("internship sync failed")?;

    Ok(())
}
