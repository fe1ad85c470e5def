//! # Memory Manager
//!
//! Process-local manager keeping models as concurrent key/value collections.
//! Useful as a cache tier and as a stand-in for real backends in tests.
//!
//! Configuration (`config` in a manager definition):
//!
//! | key         | default | meaning                                   |
//! |-------------|---------|-------------------------------------------|
//! | `connected` | `true`  | start in the connected state               |
//! | `models`    | `[]`    | model names created eagerly at startup     |

use crate::error::Result;
use crate::factory::{ManagerArgs, ManagerType};
use crate::manager::{
    Connection, ConnectionStatus, HealthCheck, HealthCheckResult, Manager, Model, ModelProvider,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// A single in-memory model: document id → JSON document
pub type MemoryModel = DashMap<String, Value>;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryManagerConfig {
    pub connected: bool,
    pub models: Vec<String>,
}

impl Default for MemoryManagerConfig {
    fn default() -> Self {
        Self {
            connected: true,
            models: Vec::new(),
        }
    }
}

/// Connection object handed out by [`MemoryManager::get_connection`]
#[derive(Debug, Clone)]
pub struct MemoryConnection {
    pub manager: String,
    pub opened_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct MemoryManager {
    name: String,
    connection: Arc<MemoryConnection>,
    connected: AtomicBool,
    models: DashMap<String, Arc<MemoryModel>>,
}

impl MemoryManager {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, MemoryManagerConfig::default())
    }

    pub fn with_config(name: impl Into<String>, config: MemoryManagerConfig) -> Self {
        let name = name.into();
        let models = DashMap::new();
        for model in config.models {
            models.insert(model, Arc::new(MemoryModel::new()));
        }

        Self {
            connection: Arc::new(MemoryConnection {
                manager: name.clone(),
                opened_at: Utc::now(),
            }),
            name,
            connected: AtomicBool::new(config.connected),
            models,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Typed access to a model, created on first use
    pub fn model(&self, name: &str) -> Arc<MemoryModel> {
        self.models
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryModel::new()))
            .clone()
    }

    pub fn model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// Mark the manager connected again after a close
    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Manager for MemoryManager {
    /// `None` once the connection has been closed
    fn get_connection(&self) -> Option<Connection> {
        if self.connected.load(Ordering::SeqCst) {
            Some(self.connection.clone())
        } else {
            None
        }
    }

    async fn close_connection(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        debug!(manager = %self.name, "Memory connection closed");
        Ok(())
    }

    fn manager_type(&self) -> &str {
        "memory"
    }

    fn as_model_provider(&self) -> Option<&dyn ModelProvider> {
        Some(self)
    }

    fn as_connection_status(&self) -> Option<&dyn ConnectionStatus> {
        Some(self)
    }

    fn as_health_check(&self) -> Option<&dyn HealthCheck> {
        Some(self)
    }
}

impl ModelProvider for MemoryManager {
    fn get_model(&self, name: &str) -> Option<Model> {
        Some(self.model(name))
    }
}

impl ConnectionStatus for MemoryManager {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthCheck for MemoryManager {
    async fn health_check(&self) -> Result<HealthCheckResult> {
        let started = Instant::now();
        let result = if self.is_connected() {
            HealthCheckResult::healthy()
        } else {
            HealthCheckResult::unhealthy("Connection closed")
        };

        Ok(result
            .with_latency(started.elapsed())
            .with_detail("models", self.models.len())
            .with_detail("opened_at", self.connection.opened_at.to_rfc3339()))
    }
}

impl ManagerType for MemoryManager {
    const TYPE: Option<&'static str> = Some("memory");

    fn from_args(args: ManagerArgs) -> Result<Self> {
        let config: MemoryManagerConfig = args.config_as()?;
        let name = args.name.unwrap_or_else(|| "memory".to_string());
        Ok(Self::with_config(name, config))
    }
}
