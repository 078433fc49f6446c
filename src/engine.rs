//! # Engine
//!
//! The four operations callers use, wired over a row store generated once at
//! startup:
//!
//! ```text
//! Config ─► GeneratorSettings ─► RowStore (read-only) ─┬─► QuerySimulator  (describe_schema, execute)
//!                                                      ├─► Nl2Sql          (generate_sql)
//!                                                      └─► Analytics       (analytics)
//! ```
//!
//! The engine holds no mutable state and is shared as `Arc<Engine>`.

use std::sync::Arc;

use crate::analytics::{Analytics, AnalyticsResult};
use crate::config::Config;
use crate::error::EngineResult;
use crate::nl2sql::{Nl2Sql, Nl2SqlResult};
use crate::query::{DescribeResult, ExecuteResult, QuerySimulator};
use crate::schema::SchemaCatalog;
use crate::storage::{GenerationResult, GeneratorSettings, RowStore};
use crate::variance::Variance;

#[derive(Debug)]
pub struct Engine {
    store: Arc<RowStore>,
    simulator: QuerySimulator,
    settings: GeneratorSettings,
    variance: Variance,
}

impl Engine {
    /// Generate the row store from config. Fails only on a broken generator.
    pub fn from_config(config: &Config) -> GenerationResult<Self> {
        Self::new(
            config.generator_settings(),
            Variance::new(config.variance.band),
            config.query.max_rows,
        )
    }

    pub fn new(
        settings: GeneratorSettings,
        variance: Variance,
        max_rows: usize,
    ) -> GenerationResult<Self> {
        let catalog = Arc::new(SchemaCatalog::erp());
        let store = Arc::new(RowStore::generate(catalog, &settings)?);
        let simulator = QuerySimulator::new(
            Arc::clone(&store),
            variance,
            max_rows,
            settings.master_seed,
        );
        tracing::info!(
            seed = settings.master_seed,
            anchor = %settings.anchor,
            window_days = settings.window_days,
            band = variance.band(),
            "engine_ready"
        );
        Ok(Engine {
            store,
            simulator,
            settings,
            variance,
        })
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        self.store.catalog()
    }

    pub fn store(&self) -> &RowStore {
        &self.store
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Schema snippets relevant to free text
    pub fn describe_schema(&self, query: &str) -> EngineResult<DescribeResult> {
        self.simulator.describe_schema(query)
    }

    /// Canned SQL for a natural-language question
    pub fn generate_sql(&self, question: &str, schema_hint: Option<&str>) -> EngineResult<Nl2SqlResult> {
        Nl2Sql::new(self.catalog()).generate(question, schema_hint)
    }

    /// Simulated execution of pseudo-SQL
    pub fn execute(&self, sql: &str) -> EngineResult<ExecuteResult> {
        self.simulator.execute(sql)
    }

    /// KPIs and time series for `period` and `metric`
    pub fn analytics(&self, period: &str, metric: &str) -> EngineResult<AnalyticsResult> {
        Analytics::new(
            &self.store,
            self.variance,
            self.settings.window_start(),
            self.settings.anchor,
            self.settings.master_seed,
        )
        .compute(period, metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn engine() -> Engine {
        let settings = GeneratorSettings {
            master_seed: 42,
            anchor: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            window_days: 365,
        };
        Engine::new(settings, Variance::default(), 100).unwrap()
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_generated_sql_executes() {
        let engine = engine();
        let generated = engine.generate_sql("total revenue", None).unwrap();
        let result = engine.execute(&generated.sql).unwrap();
        assert_eq!(result.summary.table, "sales");
        assert!(result.summary.aggregate.is_some());
    }

    #[test]
    fn test_master_seed_changes_variance() {
        let settings = *engine().settings();
        let other = Engine::new(
            GeneratorSettings {
                master_seed: 43,
                ..settings
            },
            Variance::default(),
            100,
        )
        .unwrap();
        assert_ne!(
            engine().analytics("month", "revenue").unwrap(),
            other.analytics("month", "revenue").unwrap()
        );
    }

    #[test]
    fn test_from_config_rejects_zero_window() {
        let mut config = Config::default();
        config.data.window_days = 0;
        assert!(Engine::from_config(&config).is_err());
    }
}
