// src/db.rs

use std::str::FromStr;
use std::time::Duration;

use sqlx::query::Query;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::{config::Config, error::AppError};

/// A value bound to a `?` placeholder. Never spliced into statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Int(i64),
    Text(String),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

/// Handle to the relational store.
///
/// Acquired once at startup and passed explicitly to every domain service.
/// Cloning is cheap; all clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects with a bounded retry loop.
    ///
    /// Gives up with `ConnectionFailure` once `config.connect_retries` is exhausted.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| AppError::ConnectionFailure(e.to_string()))?
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(config.acquire_timeout_secs.max(1)));

        let mut retry_count = 0;
        let pool = loop {
            match SqlitePoolOptions::new()
                .max_connections(config.max_connections.max(1))
                .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
                .connect_with(options.clone())
                .await
            {
                Ok(pool) => break pool,
                Err(e) => {
                    retry_count += 1;
                    if retry_count > config.connect_retries {
                        return Err(AppError::ConnectionFailure(format!(
                            "failed to connect after {} retries: {}",
                            config.connect_retries, e
                        )));
                    }
                    tracing::warn!(
                        "Database not ready, retrying in {}s... (Attempt {})",
                        config.retry_delay_secs,
                        retry_count
                    );
                    tokio::time::sleep(Duration::from_secs(config.retry_delay_secs)).await;
                }
            }
        };

        tracing::info!("Database connected...");
        Ok(Self { pool })
    }

    /// Applies the embedded schema. Safe to run on every startup.
    pub async fn migrate(&self) -> Result<(), AppError> {
        tracing::info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Migrations applied successfully.");
        Ok(())
    }

    /// Typed route for statements `Param` cannot carry (JSON columns, optional
    /// values, typed row mapping). Callers still bind every value.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, AppError> {
        Ok(self.pool.begin().await?)
    }

    /// Runs a write statement and returns the number of affected rows.
    pub async fn execute(&self, statement: &str, params: &[Param]) -> Result<u64, AppError> {
        let result = bind_params(sqlx::query(statement), params)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Statement failed: {:?}", e);
                AppError::from(e)
            })?;
        Ok(result.rows_affected())
    }

    /// Runs a read statement and returns every row.
    pub async fn query(
        &self,
        statement: &str,
        params: &[Param],
    ) -> Result<Vec<SqliteRow>, AppError> {
        let rows = bind_params(sqlx::query(statement), params)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Query failed: {:?}", e);
                AppError::from(e)
            })?;
        Ok(rows)
    }

    /// Releases every pooled connection. Later calls fail with `ConnectionFailure`.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed.");
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [Param],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Param::Int(value) => query.bind(*value),
            Param::Text(value) => query.bind(value.as_str()),
        };
    }
    query
}
