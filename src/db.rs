use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")?;
    info!("database pool established");
    Ok(pool)
}

/// Bootstraps `profiles` and `user_analyses` for local databases. Managed
/// deployments already have them, so a failure here is not fatal.
pub async fn run_migrations(pool: &PgPool) {
    if let Err(e) = sqlx::migrate!("./migrations").run(pool).await {
        warn!(error = %e, "migration failed; continuing");
    }
}
