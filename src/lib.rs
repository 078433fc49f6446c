//! # erpsim: ERP Data and Query Simulation Engine
//!
//! A self-contained stand-in for a schema-aware ERP analytics backend. It
//! answers schema lookups, natural-language-to-SQL requests, SQL execution
//! and dashboard analytics from deterministic synthetic data, with seeded
//! variance so repeated identical requests return identical results.
//!
//! ## Pipeline Architecture
//!
//! ```text
//! Config (figment)
//!     ↓
//! [Generator]            → seeded rows for six ERP tables
//!     ↓
//! [RowStore]             → read-only, validated against the SchemaCatalog
//!     ↓
//! [Engine] ──┬─ describe_schema → QuerySimulator (keyword tiers)
//!            ├─ generate_sql    → Nl2Sql (intent table)
//!            ├─ execute         → QuerySimulator (pattern extraction + variance)
//!            └─ analytics       → Analytics (calendar buckets + variance)
//!     ↓
//! [protocol::rest]       → axum HTTP API
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use erpsim::{Config, Engine};
//!
//! let engine = Engine::from_config(&Config::load()?)?;
//!
//! let sql = engine.generate_sql("total revenue by region", None)?;
//! let result = engine.execute(&sql.sql)?;
//! println!("{} rows from {}", result.summary.returned, result.summary.table);
//!
//! let dashboard = engine.analytics("week", "revenue")?;
//! println!("top region: {}", dashboard.summary.top_region);
//! ```
//!
//! ## Module Organization
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `schema` | Table definitions, DDL rendering, catalog lookups |
//! | `storage` | Synthetic row generation and the read-only row store |
//! | `variance` | Seed derivation and bounded perturbation |
//! | `query` | Schema description and simulated SQL execution |
//! | `nl2sql` | Keyword intent classification and SQL templates |
//! | `analytics` | Time-bucketed KPIs |
//! | `protocol` | Document store, request handler, REST API |

pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod nl2sql;
pub mod protocol;
pub mod query;
pub mod schema;
pub mod storage;
pub mod value;
pub mod variance;

pub use analytics::{AnalyticsResult, AnalyticsSummary, Metric, Period, SeriesPoint};
pub use config::Config;
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use nl2sql::{Intent, Nl2SqlResult, SqlStatus};
pub use query::{DescribeResult, ExecuteResult, ExecutionSummary, SchemaMatch};
pub use schema::{Column, ColumnType, SchemaCatalog, TableSchema};
pub use storage::{GenerationError, GeneratorSettings, Row, RowStore};
pub use value::Value;
pub use variance::{request_seed, Variance};
