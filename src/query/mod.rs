//! # Query Simulator
//!
//! Two entry points:
//! - [`QuerySimulator::describe_schema`] maps free text to schema snippets
//! - [`QuerySimulator::execute`] "runs" pseudo-SQL against the row store
//!
//! ## Describe tiers
//!
//! | Tier | Trigger | Content | Score |
//! |------|---------|---------|-------|
//! | exact table | a table name appears in the text | that table's DDL | 0.95 |
//! | keyword | "tables", "columns", "schema", ... | table list / column summary / DDL | 0.85 |
//! | column | a known column name appears | DDL of every table carrying it | 0.75 |
//! | fallback | nothing matched | full DDL | 0.50 |
//!
//! ## Execute pipeline
//!
//! ```text
//! SQL ─► resolve table (first known token) ─► WHERE filter (best-effort)
//!     ─► aggregate?  yes ─► SUM/COUNT/AVG [+ GROUP BY] ─► variance(hash(sql))
//!                    no  ─► raw rows, capped by LIMIT and max_rows
//! ```

pub mod sql;

use std::sync::Arc;

use serde::Serialize;

use crate::error::{require_text, EngineError, EngineResult};
use crate::schema::{SchemaCatalog, TableSchema};
use crate::storage::{Row, RowStore};
use crate::value::{round_cents, Value};
use crate::variance::{request_seed, Variance};

pub use sql::{tokenize, AggregateCall, AggregateFunction, CompareOp, Filter};

/// Default cap on raw rows returned by `execute`
pub const DEFAULT_MAX_ROWS: usize = 100;

/// Relevance tier of a schema lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    ExactTable,
    Keyword,
    Column,
    Fallback,
}

impl MatchTier {
    /// Fixed heuristic score per tier
    pub fn score(self) -> f64 {
        match self {
            MatchTier::ExactTable => 0.95,
            MatchTier::Keyword => 0.85,
            MatchTier::Column => 0.75,
            MatchTier::Fallback => 0.50,
        }
    }
}

/// One schema lookup hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaMatch {
    pub content: String,
    pub score: f64,
}

impl SchemaMatch {
    fn new(content: String, tier: MatchTier) -> Self {
        SchemaMatch {
            content,
            score: tier.score(),
        }
    }
}

/// Lookup-mode response: `{results, count}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescribeResult {
    pub results: Vec<SchemaMatch>,
    pub count: usize,
}

impl DescribeResult {
    fn from_matches(results: Vec<SchemaMatch>) -> Self {
        let count = results.len();
        DescribeResult { results, count }
    }
}

/// The aggregate computed by an execute call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub function: AggregateFunction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub value: Value,
}

/// Execute-mode summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionSummary {
    pub table: String,
    /// Rows left after filtering
    pub matched: usize,
    /// Rows in the response
    pub returned: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateResult>,
}

/// Execute-mode response: `{rows, summary}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecuteResult {
    pub rows: Vec<Row>,
    pub summary: ExecutionSummary,
}

const TABLE_LIST_KEYWORDS: [&str; 2] = ["tables", "list"];
const COLUMN_KEYWORDS: [&str; 4] = ["columns", "column", "fields", "field"];
const SCHEMA_KEYWORDS: [&str; 3] = ["schema", "ddl", "structure"];

/// Maps query strings to schema snippets and pseudo-SQL to rows.
#[derive(Debug, Clone)]
pub struct QuerySimulator {
    store: Arc<RowStore>,
    variance: Variance,
    max_rows: usize,
    seed_salt: u64,
}

impl QuerySimulator {
    pub fn new(store: Arc<RowStore>, variance: Variance, max_rows: usize, seed_salt: u64) -> Self {
        QuerySimulator {
            store,
            variance,
            max_rows: max_rows.max(1),
            seed_salt,
        }
    }

    fn catalog(&self) -> &SchemaCatalog {
        self.store.catalog()
    }

    fn seed(&self, parts: &[&str]) -> u64 {
        let salt = self.seed_salt.to_le_bytes();
        let mut all: Vec<&[u8]> = vec![&salt];
        all.extend(parts.iter().map(|p| p.as_bytes()));
        request_seed(&all)
    }

    /// Resolve free text to schema snippets.
    pub fn describe_schema(&self, query: &str) -> EngineResult<DescribeResult> {
        let text = require_text(query)?.to_lowercase();
        let catalog = self.catalog();

        if let Some(table) = catalog
            .tables()
            .iter()
            .find(|t| text.contains(t.table_name.as_str()))
        {
            return Ok(DescribeResult::from_matches(vec![SchemaMatch::new(
                table.to_ddl(),
                MatchTier::ExactTable,
            )]));
        }

        let tokens = tokenize(&text);
        let has = |words: &[&str]| tokens.iter().any(|t| words.contains(&t.as_str()));

        let wants_table_list = has(&TABLE_LIST_KEYWORDS)
            || (has(&["what", "which"]) && tokens.iter().any(|t| t.starts_with("table")));
        if wants_table_list {
            let listing = catalog
                .table_names()
                .iter()
                .map(|t| format!("- {t}"))
                .collect::<Vec<_>>()
                .join("\n");
            return Ok(DescribeResult::from_matches(vec![SchemaMatch::new(
                listing,
                MatchTier::Keyword,
            )]));
        }
        if has(&COLUMN_KEYWORDS) {
            return Ok(DescribeResult::from_matches(vec![SchemaMatch::new(
                catalog.column_summary(),
                MatchTier::Keyword,
            )]));
        }
        if has(&SCHEMA_KEYWORDS) {
            return Ok(DescribeResult::from_matches(vec![SchemaMatch::new(
                catalog.schema_text(),
                MatchTier::Keyword,
            )]));
        }

        let mut hits: Vec<&TableSchema> = Vec::new();
        for token in &tokens {
            for table in catalog.tables_with_column(token) {
                if !hits.iter().any(|h| h.table_name == table.table_name) {
                    hits.push(table);
                }
            }
        }
        if !hits.is_empty() {
            return Ok(DescribeResult::from_matches(
                hits.into_iter()
                    .map(|t| SchemaMatch::new(t.to_ddl(), MatchTier::Column))
                    .collect(),
            ));
        }

        Ok(DescribeResult::from_matches(vec![SchemaMatch::new(
            catalog.schema_text(),
            MatchTier::Fallback,
        )]))
    }

    /// First token of the SQL that names a known table
    pub fn resolve_table(&self, sql: &str) -> EngineResult<&TableSchema> {
        tokenize(sql)
            .iter()
            .find_map(|t| self.catalog().get(t))
            .ok_or_else(|| EngineError::UnresolvedTable {
                sql: sql.to_string(),
            })
    }

    /// "Execute" pseudo-SQL against the synthetic rows.
    pub fn execute(&self, sql: &str) -> EngineResult<ExecuteResult> {
        let sql = require_text(sql)?;
        let table = self.resolve_table(sql)?;
        let all_rows = self.store.rows_for(&table.table_name)?;

        let filter = sql::parse_filter(sql, table);
        let matched: Vec<&Row> = match &filter {
            Some(f) => all_rows
                .iter()
                .filter(|r| f.matches(r.get(&f.column)))
                .collect(),
            None => all_rows.iter().collect(),
        };
        let cap = sql::parse_limit(sql).map_or(self.max_rows, |l| l.min(self.max_rows));

        let mut summary = ExecutionSummary {
            table: table.table_name.clone(),
            matched: matched.len(),
            returned: 0,
            filter: filter.as_ref().map(ToString::to_string),
            aggregate: None,
        };

        let rows = match sql::parse_aggregate(sql) {
            Some(call) => {
                let (function, column) = self.aggregate_target(&call, table);
                let alias = call
                    .alias
                    .clone()
                    .unwrap_or_else(|| function.default_alias().to_string());
                let total = self.aggregate(function, column.as_deref(), &matched, &[sql]);

                let rows = match sql::parse_group_by(sql, table) {
                    Some(group_column) => self
                        .grouped(function, column.as_deref(), &group_column, &alias, &matched, sql)
                        .into_iter()
                        .take(cap)
                        .collect(),
                    None => vec![Row::new().with(&alias, total.clone())],
                };
                summary.aggregate = Some(AggregateResult {
                    function,
                    column,
                    value: total,
                });
                rows
            }
            None => matched.into_iter().take(cap).cloned().collect(),
        };

        summary.returned = rows.len();
        tracing::debug!(
            table = %summary.table,
            matched = summary.matched,
            returned = summary.returned,
            aggregate = summary.aggregate.is_some(),
            "sql_simulated"
        );
        Ok(ExecuteResult { rows, summary })
    }

    /// Pick the column an aggregate runs over.
    ///
    /// SUM/AVG fall back to the table's measure column when the argument is
    /// missing or not numeric, and degrade to COUNT when there is none.
    fn aggregate_target(
        &self,
        call: &AggregateCall,
        table: &TableSchema,
    ) -> (AggregateFunction, Option<String>) {
        if call.function == AggregateFunction::Count {
            return (AggregateFunction::Count, None);
        }
        let named = call
            .argument
            .as_deref()
            .and_then(|a| table.column(a))
            .filter(|c| c.column_type.is_numeric());
        match named.or_else(|| table.measure_column()) {
            Some(column) => (call.function, Some(column.name.clone())),
            None => (AggregateFunction::Count, None),
        }
    }

    fn aggregate(
        &self,
        function: AggregateFunction,
        column: Option<&str>,
        rows: &[&Row],
        seed_parts: &[&str],
    ) -> Value {
        let seed = self.seed(seed_parts);
        let values: Vec<f64> = match column {
            Some(c) => rows.iter().filter_map(|r| r.get_f64(c)).collect(),
            None => Vec::new(),
        };
        match function {
            AggregateFunction::Count => {
                Value::Integer(self.variance.perturb_count(rows.len(), seed) as i64)
            }
            AggregateFunction::Sum => {
                Value::Decimal(round_cents(self.variance.perturb(values.iter().sum(), seed)))
            }
            AggregateFunction::Avg => {
                let mean = if values.is_empty() {
                    0.0
                } else {
                    values.iter().sum::<f64>() / values.len() as f64
                };
                Value::Decimal(round_cents(self.variance.perturb(mean, seed)))
            }
        }
    }

    /// One aggregated row per group, groups in first-seen order
    fn grouped(
        &self,
        function: AggregateFunction,
        column: Option<&str>,
        group_column: &str,
        alias: &str,
        rows: &[&Row],
        sql: &str,
    ) -> Vec<Row> {
        let mut groups: Vec<(Value, Vec<&Row>)> = Vec::new();
        for &row in rows {
            let Some(key) = row.get(group_column) else {
                continue;
            };
            match groups.iter_mut().find(|(k, _)| k == key) {
                Some((_, members)) => members.push(row),
                None => groups.push((key.clone(), vec![row])),
            }
        }

        groups
            .into_iter()
            .map(|(key, members)| {
                let label = key.to_string();
                let value = self.aggregate(function, column, &members, &[sql, label.as_str()]);
                Row::new().with(group_column, key).with(alias, value)
            })
            .collect()
    }
}
