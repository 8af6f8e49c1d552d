//! Database connection pool management and schema bootstrap

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::error::{sanitize_url, DatabaseError, DatabaseOperation, Result};

/// Breeders table, created on startup if missing
const CREATE_BREEDERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS breeders (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    breeder_city TEXT NOT NULL,
    breeder_country TEXT NOT NULL,
    price_level SMALLINT NOT NULL CHECK (price_level BETWEEN 1 AND 5),
    breeder_address TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_ORDER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS breeders_created_at_idx ON breeders (created_at, id)";

/// Create a PostgreSQL connection pool, retrying with exponential backoff
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let mut attempt = 0;
    let base_delay = Duration::from_secs(config.retry_delay_secs);

    loop {
        match try_create_pool(config).await {
            Ok(pool) => {
                if attempt > 0 {
                    tracing::info!(
                        "Database connection established after {} attempt(s)",
                        attempt + 1
                    );
                } else {
                    tracing::info!(
                        "Database connection pool created: max={}, min={}",
                        config.max_connections,
                        config.min_connections
                    );
                }
                return Ok(pool);
            }
            Err(e) => {
                attempt += 1;

                if attempt > config.max_retries || !e.is_retriable() {
                    tracing::error!(
                        "Failed to connect to database after {} attempt(s): {}",
                        attempt,
                        e
                    );
                    return Err(e.into());
                }

                let delay = base_delay.saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)));
                tracing::warn!(
                    "Database connection attempt {} failed: {}. Retrying in {:?}...",
                    attempt,
                    e,
                    delay
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Attempt to create a database pool (single try)
async fn try_create_pool(config: &DatabaseConfig) -> std::result::Result<PgPool, DatabaseError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| {
            DatabaseError::from(e)
                .during(DatabaseOperation::Connect)
                .add_context(sanitize_url(&config.url))
        })
}

/// Create the breeders table and its ordering index when absent
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in [CREATE_BREEDERS_TABLE, CREATE_ORDER_INDEX] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DatabaseError::from(e).during(DatabaseOperation::Schema))?;
    }
    tracing::debug!("breeders schema ensured");
    Ok(())
}
