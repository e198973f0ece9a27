//! Startup helpers: database creation and connection pooling.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgConnection, PgPool};

use crate::config::DatabaseConfig;
use crate::error::ServiceError;

/// Maintenance database every Postgres cluster has.
const ADMIN_DATABASE: &str = "postgres";

/// Creates `dbname` through the maintenance database if it does not exist.
///
/// Returns `true` when the database was created.
///
/// # Errors
///
/// Returns a [`ServiceError::Database`] if the server is unreachable or
/// the statement fails.
pub async fn ensure_database(
    options: &PgConnectOptions,
    dbname: &str,
) -> Result<bool, ServiceError> {
    let admin = options.clone().database(ADMIN_DATABASE);
    let mut conn = PgConnection::connect_with(&admin).await?;

    let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(dbname)
        .fetch_optional(&mut conn)
        .await?
        .is_some();

    if !exists {
        sqlx::query(&format!("CREATE DATABASE {}", quote_identifier(dbname)))
            .execute(&mut conn)
            .await?;
        tracing::info!(dbname, "created database");
    }

    conn.close().await?;
    Ok(!exists)
}

/// Opens the application connection pool, creating the database first when
/// configured to.
///
/// # Errors
///
/// Returns a [`ServiceError`] if the options are invalid or the database
/// cannot be reached.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, ServiceError> {
    let options = config
        .connect_options()
        .map_err(|e| ServiceError::Internal(format!("{e:#}")))?;
    connect_with(config, options).await
}

/// Same as [`connect`], with connection options supplied by the caller.
/// Pool sizing, timeouts and `create_if_missing` still come from `config`.
///
/// # Errors
///
/// Returns a [`ServiceError`] if the database cannot be created or reached.
pub async fn connect_with(
    config: &DatabaseConfig,
    options: PgConnectOptions,
) -> Result<PgPool, ServiceError> {
    if config.create_if_missing {
        if let Some(dbname) = options.get_database().map(str::to_string) {
            if dbname != ADMIN_DATABASE {
                ensure_database(&options, &dbname).await?;
            }
        }
    }

    let pool = pool_options(config).connect_with(options).await?;
    Ok(pool)
}

/// Pool sizing and timeouts from configuration.
fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout())
}

/// Quotes a Postgres identifier, doubling embedded quotes.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
