//! Configurable managers for exercising registry behavior.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use storehouse_core::{
    Connection, ConnectionStatus, HealthCheck, HealthCheckResult, Manager, Model, ModelProvider,
    Result, StorehouseError,
};

/// Shared, ordered record of manager calls (`"<name>:close"`, ...)
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Connection object handed out by [`TestManager`]
#[derive(Debug, Clone, PartialEq)]
pub struct TestConnection {
    pub ok: bool,
    pub manager: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthMode {
    /// No health check capability
    Unsupported,
    Healthy,
    Unhealthy,
    /// `health_check` returns an error
    Error,
    /// `health_check` panics
    Panic,
}

pub struct TestManager {
    name: String,
    log: CallLog,
    fail_close: bool,
    with_status: bool,
    health: HealthMode,
    models: Option<HashMap<String, Model>>,
    connected: AtomicBool,
    closes: AtomicUsize,
}

impl TestManager {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            log: call_log(),
            fail_close: false,
            with_status: true,
            health: HealthMode::Healthy,
            models: None,
            connected: AtomicBool::new(true),
            closes: AtomicUsize::new(0),
        }
    }

    pub fn with_log(mut self, log: &CallLog) -> Self {
        self.log = log.clone();
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn without_status(mut self) -> Self {
        self.with_status = false;
        self
    }

    pub fn with_health(mut self, health: HealthMode) -> Self {
        self.health = health;
        self
    }

    /// Expose models; each model is an `Arc<String>` holding `"<manager>.<model>"`
    pub fn with_models(mut self, names: &[&str]) -> Self {
        let models = names
            .iter()
            .map(|model| {
                let handle: Model = Arc::new(format!("{}.{}", self.name, model));
                (model.to_string(), handle)
            })
            .collect();
        self.models = Some(models);
        self
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Manager for TestManager {
    fn get_connection(&self) -> Option<Connection> {
        self.log.lock().push(format!("{}:get_connection", self.name));
        Some(Arc::new(TestConnection {
            ok: true,
            manager: self.name.clone(),
        }))
    }

    async fn close_connection(&self) -> Result<()> {
        self.log.lock().push(format!("{}:close", self.name));
        self.closes.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if self.fail_close {
            return Err(StorehouseError::connection(format!("{} refused to close", self.name)));
        }
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn manager_type(&self) -> &str {
        "test"
    }

    fn as_model_provider(&self) -> Option<&dyn ModelProvider> {
        self.models.as_ref().map(|_| self as &dyn ModelProvider)
    }

    fn as_connection_status(&self) -> Option<&dyn ConnectionStatus> {
        if self.with_status {
            Some(self)
        } else {
            None
        }
    }

    fn as_health_check(&self) -> Option<&dyn HealthCheck> {
        match self.health {
            HealthMode::Unsupported => None,
            _ => Some(self),
        }
    }
}

impl ModelProvider for TestManager {
    fn get_model(&self, name: &str) -> Option<Model> {
        self.models.as_ref()?.get(name).cloned()
    }
}

impl ConnectionStatus for TestManager {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthCheck for TestManager {
    async fn health_check(&self) -> Result<HealthCheckResult> {
        self.log.lock().push(format!("{}:health_check", self.name));
        match self.health {
            HealthMode::Healthy | HealthMode::Unsupported => {
                Ok(HealthCheckResult::healthy().with_message(format!("{} ok", self.name)))
            }
            HealthMode::Unhealthy => Ok(HealthCheckResult::unhealthy("degraded")),
            HealthMode::Error => Err(StorehouseError::connection("probe failed")),
            HealthMode::Panic => panic!("health probe exploded"),
        }
    }
}
