//! Handler for erpsim
//!
//! Request-level wrapper around the engine, used by the REST API. The engine
//! is immutable and shared as `Arc<Engine>`; the only mutable state is the
//! document list (`parking_lot::RwLock`) and the `AtomicU64` counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use crate::analytics::AnalyticsResult;
use crate::engine::Engine;
use crate::error::EngineResult;
use crate::nl2sql::Nl2SqlResult;
use crate::query::{DescribeResult, ExecuteResult};
use crate::Config;

use super::documents::DocumentStore;

pub struct Handler {
    engine: Arc<Engine>,
    documents: DocumentStore,
    start_time: Instant,
    started_unix: f64,
    request_count: AtomicU64,
    error_count: AtomicU64,
}

impl Handler {
    /// Create a handler around an existing engine.
    pub fn new(engine: Arc<Engine>) -> Self {
        let started_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64());
        Self {
            engine,
            documents: DocumentStore::new(),
            start_time: Instant::now(),
            started_unix,
            request_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
        }
    }

    /// Create a handler from configuration, generating the row store.
    pub fn from_config(config: Config) -> Result<Self, String> {
        let engine =
            Engine::from_config(&config).map_err(|e| format!("Failed to generate data: {e}"))?;
        Ok(Self::new(Arc::new(engine)))
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// Get uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Server start as unix seconds, for client reload detection.
    pub fn started_unix(&self) -> f64 {
        self.started_unix
    }

    /// Engine calls made, successful or not.
    pub fn total_requests(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Engine calls that returned an error.
    pub fn total_errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    fn track<T>(&self, result: EngineResult<T>) -> EngineResult<T> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        if result.is_err() {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        result
    }

    /// `document_id` is accepted for compatibility and only logged.
    fn note_document(document_id: Option<&str>) {
        if let Some(id) = document_id {
            tracing::debug!(document_id = id, "document_scope_ignored");
        }
    }

    pub fn describe_schema(
        &self,
        query: &str,
        document_id: Option<&str>,
    ) -> EngineResult<DescribeResult> {
        Self::note_document(document_id);
        self.track(self.engine.describe_schema(query))
    }

    pub fn generate_sql(
        &self,
        question: &str,
        schema_hint: Option<&str>,
        document_id: Option<&str>,
    ) -> EngineResult<Nl2SqlResult> {
        Self::note_document(document_id);
        self.track(self.engine.generate_sql(question, schema_hint))
    }

    pub fn execute_sql(&self, sql: &str) -> EngineResult<ExecuteResult> {
        self.track(self.engine.execute(sql))
    }

    pub fn analytics(&self, period: &str, metric: &str) -> EngineResult<AnalyticsResult> {
        self.track(self.engine.analytics(period, metric))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::GeneratorSettings;
    use crate::variance::Variance;
    use chrono::NaiveDate;

    fn handler() -> Handler {
        let settings = GeneratorSettings {
            master_seed: 42,
            anchor: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            window_days: 365,
        };
        Handler::new(Arc::new(
            Engine::new(settings, Variance::default(), 100).unwrap(),
        ))
    }

    #[test]
    fn test_counters_track_errors() {
        let handler = handler();
        assert!(handler.execute_sql("SELECT COUNT(*) FROM orders").is_ok());
        assert!(handler.execute_sql("SELECT 1").is_err());
        assert!(handler.describe_schema("orders", Some("sim-1")).is_ok());
        assert_eq!(handler.total_requests(), 3);
        assert_eq!(handler.total_errors(), 1);
    }

    #[test]
    fn test_unknown_document_id_is_not_an_error() {
        let handler = handler();
        assert!(handler
            .generate_sql("how many orders", None, Some("no-such-doc"))
            .is_ok());
    }

    #[test]
    fn test_fresh_handler_has_seeded_documents() {
        let handler = handler();
        assert_eq!(handler.documents().len(), 2);
        assert!(handler.started_unix() > 0.0);
    }

    #[test]
    fn test_from_config_reports_generation_failure() {
        let mut config = Config::default();
        config.data.window_days = 0;
        let err = Handler::from_config(config).err().unwrap();
        assert!(err.contains("window_days"));
    }
}
