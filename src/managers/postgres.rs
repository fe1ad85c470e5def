//! # PostgreSQL Manager
//!
//! Manager wrapping a lazily connected `sqlx` PostgreSQL pool. No connection is
//! opened until the first query, so building the manager never blocks; it must
//! however be built inside a Tokio runtime.
//!
//! Configuration (`config` in a manager definition):
//!
//! | key                  | default                 |
//! |----------------------|-------------------------|
//! | `url`                | `$DATABASE_URL`         |
//! | `max_connections`    | `10`                    |
//! | `min_connections`    | `0`                     |
//! | `acquire_timeout_ms` | `5000`                  |

use crate::error::{Result, StorehouseError};
use crate::factory::{ManagerArgs, ManagerType};
use crate::manager::{Connection, ConnectionStatus, HealthCheck, HealthCheckResult, Manager};
use async_trait::async_trait;
use serde::Deserialize;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PostgresManagerConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_ms: u64,
}

impl Default for PostgresManagerConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            min_connections: 0,
            acquire_timeout_ms: 5000,
        }
    }
}

impl PostgresManagerConfig {
    /// Explicit `url`, falling back to `DATABASE_URL`
    fn database_url(&self) -> Result<String> {
        match &self.url {
            Some(url) => Ok(url.clone()),
            None => std::env::var("DATABASE_URL").map_err(|_| {
                StorehouseError::InvalidManagerConfig(
                    "postgres manager requires config.url or DATABASE_URL".to_string(),
                )
            }),
        }
    }
}

#[derive(Debug)]
pub struct PostgresManager {
    name: String,
    pool: PgPool,
}

impl PostgresManager {
    /// Wrap an existing pool
    pub fn with_pool(name: impl Into<String>, pool: PgPool) -> Self {
        Self {
            name: name.into(),
            pool,
        }
    }

    /// Create a lazily connected pool from configuration
    pub fn connect_lazy(name: impl Into<String>, config: &PostgresManagerConfig) -> Result<Self> {
        let name = name.into();
        let url = config.database_url()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms))
            .connect_lazy(&url)?;

        info!(
            manager = %name,
            max_connections = config.max_connections,
            "PostgreSQL pool configured (lazy)"
        );
        Ok(Self::with_pool(name, pool))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Manager for PostgresManager {
    /// Hands out a clone of the pool (`PgPool` is reference counted)
    fn get_connection(&self) -> Option<Connection> {
        Some(Arc::new(self.pool.clone()))
    }

    async fn close_connection(&self) -> Result<()> {
        self.pool.close().await;
        debug!(manager = %self.name, "PostgreSQL pool closed");
        Ok(())
    }

    fn manager_type(&self) -> &str {
        "postgres"
    }

    fn as_connection_status(&self) -> Option<&dyn ConnectionStatus> {
        Some(self)
    }

    fn as_health_check(&self) -> Option<&dyn HealthCheck> {
        Some(self)
    }
}

impl ConnectionStatus for PostgresManager {
    fn is_connected(&self) -> bool {
        !self.pool.is_closed()
    }
}

#[async_trait]
impl HealthCheck for PostgresManager {
    async fn health_check(&self) -> Result<HealthCheckResult> {
        let started = Instant::now();

        let result = match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(_) => HealthCheckResult::healthy(),
            Err(e) => {
                warn!(manager = %self.name, error = %e, "PostgreSQL health check query failed");
                HealthCheckResult::unhealthy(format!("Database query failed: {e}"))
            }
        };

        Ok(result
            .with_latency(started.elapsed())
            .with_detail("pool_size", self.pool.size())
            .with_detail("idle_connections", self.pool.num_idle()))
    }
}

impl ManagerType for PostgresManager {
    const TYPE: Option<&'static str> = Some("postgres");

    fn from_args(args: ManagerArgs) -> Result<Self> {
        let config: PostgresManagerConfig = args.config_as()?;
        let name = args.name.unwrap_or_else(|| "postgres".to_string());
        Self::connect_lazy(name, &config)
    }
}
