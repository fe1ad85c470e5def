//! Health check results produced by managers.

use crate::constants::HEALTH_CHECK_ERROR_PREFIX;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Result returned by health check operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Whether the connection is healthy
    pub healthy: bool,
    /// Human-readable status message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Additional diagnostic information
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
    /// Response time in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<u64>,
    /// Unix timestamp in milliseconds when the check was performed
    pub timestamp: i64,
}

impl HealthCheckResult {
    pub fn healthy() -> Self {
        Self::with_status(true)
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::with_status(false).with_message(message)
    }

    /// Synthetic result for a health check that failed instead of reporting
    pub fn from_failure(cause: impl std::fmt::Display) -> Self {
        Self::unhealthy(format!("{HEALTH_CHECK_ERROR_PREFIX}: {cause}"))
    }

    fn with_status(healthy: bool) -> Self {
        Self {
            healthy,
            message: None,
            details: None,
            latency: None,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_latency(mut self, elapsed: Duration) -> Self {
        self.latency = Some(elapsed.as_millis() as u64);
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}
