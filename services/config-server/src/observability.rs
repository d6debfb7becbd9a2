//! Observability: request counters and structured config events

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Metrics collector for tracking API activity
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<RwLock<MetricsInner>>,
}

struct MetricsInner {
    counters: HashMap<String, u64>,
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsInner {
                counters: HashMap::new(),
                start_time: Instant::now(),
            })),
        }
    }

    /// Increment a counter
    pub async fn increment(&self, name: &str, value: u64) {
        let mut inner = self.inner.write().await;
        let counter = inner.counters.entry(name.to_string()).or_insert(0);
        *counter += value;
    }

    /// Get all metrics as JSON-serializable format
    pub async fn snapshot(&self) -> MetricsSnapshot {
        let inner = self.inner.read().await;
        MetricsSnapshot {
            counters: inner.counters.clone(),
            uptime_secs: inner.start_time.elapsed().as_secs(),
        }
    }

    /// Get specific counter
    pub async fn get_counter(&self, name: &str) -> u64 {
        let inner = self.inner.read().await;
        inner.counters.get(name).copied().unwrap_or(0)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub counters: HashMap<String, u64>,
    pub uptime_secs: u64,
}

/// Structured logger for config mutations
pub struct Logger;

impl Logger {
    /// Log a config change
    pub fn config_event(kind: &str, id: &str, action: &str, username: &str) {
        tracing::info!(
            kind = %kind,
            config_id = %id,
            action = %action,
            username = %username,
            "config_event"
        );
    }

    /// Log a login attempt outcome
    pub fn login_event(username: &str, outcome: &str) {
        tracing::info!(
            username = %username,
            outcome = %outcome,
            "login_event"
        );
    }
}

/// Predefined metric names
pub mod metrics {
    // Config reads
    pub const CONFIG_LIST: &str = "config_list_total";
    pub const CONFIG_GET: &str = "config_get_total";

    // Config mutations
    pub const CONFIG_CREATED: &str = "config_created_total";
    pub const CONFIG_UPDATED: &str = "config_updated_total";
    pub const CONFIG_DELETED: &str = "config_deleted_total";
    pub const CONFIG_REJECTED: &str = "config_rejected_total";

    // Auth
    pub const LOGIN_SUCCESS: &str = "login_success_total";
    pub const LOGIN_FAILED: &str = "login_failed_total";
    pub const LOGIN_RATE_LIMITED: &str = "login_rate_limited_total";
}
