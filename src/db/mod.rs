// PostgreSQL-backed repositories

mod logs;
mod recipes;

use crate::config::DatabaseConfig;
use crate::error::ApiError;
use deadpool_postgres::{Config, Object, Pool, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tracing::{error, info, warn};

const SCHEMA: &[(&str, &str)] = &[
    (
        "recipes table",
        r#"
            CREATE TABLE IF NOT EXISTS recipes (
                id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
                name TEXT NOT NULL,
                directions TEXT[] NOT NULL DEFAULT '{}'
            )
        "#,
    ),
    (
        "ingredients table",
        r#"
            CREATE TABLE IF NOT EXISTS ingredients (
                id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
                recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                amount DOUBLE PRECISION NOT NULL,
                measurement TEXT NOT NULL,
                name TEXT NOT NULL
            )
        "#,
    ),
    (
        "ingredients recipe index",
        "CREATE INDEX IF NOT EXISTS idx_ingredients_recipe_id ON ingredients(recipe_id, position)",
    ),
    (
        "logs table",
        r#"
            CREATE TABLE IF NOT EXISTS logs (
                id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
                recipe_id BIGINT NOT NULL REFERENCES recipes(id),
                date_of_event DATE NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                rating INTEGER NOT NULL
            )
        "#,
    ),
    (
        "logs recipe index",
        "CREATE INDEX IF NOT EXISTS idx_logs_recipe_id ON logs(recipe_id)",
    ),
];

/// Process-wide handle on the PostgreSQL connection pool.
/// Implements both repository traits; see `recipes.rs` and `logs.rs`.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Build the pool and check that a connection can actually be made.
    pub async fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!("Creating PostgreSQL connection pool for host: {}:{}", config.host, config.port);

        let pool = Self::create_pool(config)?;

        let db = Database { pool };
        db.health_check().await?;

        Ok(db)
    }

    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        let mut pg_config = Config::new();

        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = config.password;

        pg_config.ssl_mode = Some(match config.ssl_mode.as_str() {
            "disable" => deadpool_postgres::SslMode::Disable,
            "require" => deadpool_postgres::SslMode::Require,
            "prefer" => deadpool_postgres::SslMode::Prefer,
            other => {
                warn!("Unknown SSL mode '{}', defaulting to 'prefer'", other);
                deadpool_postgres::SslMode::Prefer
            }
        });

        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        let mut pool_config = deadpool_postgres::PoolConfig::new(config.max_connections as usize);
        pool_config.timeouts.wait = Some(config.connection_timeout);
        pool_config.timeouts.create = Some(config.connection_timeout);
        pg_config.pool = Some(pool_config);

        let tls_connector = TlsConnector::builder().build().map_err(|e| {
            error!("Failed to create TLS connector: {}", e);
            ApiError::Database(format!("TLS connector creation failed: {}", e))
        })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls).map_err(|e| {
            error!("Failed to create connection pool: {}", e);
            ApiError::Database(format!("Connection pool creation failed: {}", e))
        })
    }

    async fn get_connection(&self) -> Result<Object, ApiError> {
        self.pool.get().await.map_err(ApiError::from)
    }

    pub async fn health_check(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[]).await.map_err(|e| {
            error!("Database health check failed: {}", e);
            ApiError::Database(format!("Health check failed: {}", e))
        })?;

        info!("Database health check successful");
        Ok(())
    }

    /// Create the recipes, ingredients and logs tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<(), ApiError> {
        info!("Running database migrations");

        let client = self.get_connection().await?;

        for (what, statement) in SCHEMA {
            client.execute(*statement, &[]).await.map_err(|e| {
                error!("Failed to create {}: {}", what, e);
                ApiError::Database(format!("Creating {} failed: {}", what, e))
            })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Stop handing out connections and drop the idle ones.
    pub fn close(&self) {
        self.pool.close();
        info!("Database connection pool closed");
    }
}

/// Ids are BIGINT identities; anything that does not parse cannot name a row.
fn parse_id(id: &str, not_found: fn(&str) -> ApiError) -> Result<i64, ApiError> {
    id.trim().parse::<i64>().map_err(|_| not_found(id))
}
