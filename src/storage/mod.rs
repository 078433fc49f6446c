//! # Row Store
//!
//! In-memory synthetic rows per table, generated once at startup from a
//! fixed master seed and never mutated afterwards.
//!
//! ```text
//! SchemaCatalog ──► generator (seeded, parents before children) ──► RowStore
//!                                                                     │
//!                                     rows_for("orders") ◄────────────┘
//! ```

pub mod error;
pub mod generator;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{EngineError, EngineResult};
use crate::schema::SchemaCatalog;
use crate::value::Value;

pub use error::{GenerationError, GenerationResult};
pub use generator::{generate, GeneratorSettings};

/// One synthetic row: column values in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<(Arc<str>, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Row { values: Vec::new() }
    }

    /// Builder-style column append
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.values.push((Arc::from(column), value.into()));
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, v)| v)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_f64)
    }

    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn get_date(&self, column: &str) -> Option<NaiveDate> {
        self.get(column).and_then(Value::as_date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, v)| (name.as_ref(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// Serialized as a JSON object with keys in column order
impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name.as_ref(), value)?;
        }
        map.end()
    }
}

/// Read-only synthetic rows keyed by table name.
#[derive(Debug, Clone)]
pub struct RowStore {
    catalog: Arc<SchemaCatalog>,
    rows: HashMap<String, Vec<Row>>,
}

impl RowStore {
    /// Generate the baseline data set and validate it against the catalog.
    pub fn generate(
        catalog: Arc<SchemaCatalog>,
        settings: &GeneratorSettings,
    ) -> GenerationResult<Self> {
        let rows = generator::generate(settings)?;
        Self::from_rows(catalog, rows)
    }

    /// Wrap pre-built rows, checking every row against its table schema.
    pub fn from_rows(
        catalog: Arc<SchemaCatalog>,
        rows: HashMap<String, Vec<Row>>,
    ) -> GenerationResult<Self> {
        for (table_name, table_rows) in &rows {
            let table = catalog
                .get(table_name)
                .ok_or_else(|| GenerationError::UnknownTable(table_name.clone()))?;
            for (index, row) in table_rows.iter().enumerate() {
                for column in &table.columns {
                    let value =
                        row.get(&column.name)
                            .ok_or_else(|| GenerationError::MissingColumn {
                                table: table_name.clone(),
                                index,
                                column: column.name.clone(),
                            })?;
                    if value.column_type() != column.column_type {
                        return Err(GenerationError::TypeMismatch {
                            table: table_name.clone(),
                            index,
                            column: column.name.clone(),
                            expected: column.column_type.to_string(),
                            got: value.column_type().to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            tables = rows.len(),
            rows = rows.values().map(Vec::len).sum::<usize>(),
            "row_store_ready"
        );

        Ok(RowStore { catalog, rows })
    }

    /// Rows of a table in generation order.
    ///
    /// A known table without rows yields an empty slice.
    pub fn rows_for(&self, table_name: &str) -> EngineResult<&[Row]> {
        let table = self
            .catalog
            .get(table_name)
            .ok_or_else(|| EngineError::SchemaNotFound {
                table: table_name.to_string(),
            })?;
        Ok(self
            .rows
            .get(&table.table_name)
            .map_or(&[][..], Vec::as_slice))
    }

    /// Row count per table in declaration order
    pub fn row_counts(&self) -> Vec<(String, usize)> {
        self.catalog
            .table_names()
            .into_iter()
            .map(|name| {
                let count = self.rows.get(name).map_or(0, Vec::len);
                (name.to_string(), count)
            })
            .collect()
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Arc<SchemaCatalog> {
        Arc::new(SchemaCatalog::erp())
    }

    fn customer(id: i64) -> Row {
        Row::new()
            .with("id", id)
            .with("name", "Customer")
            .with("region", "North")
            .with("created_at", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let json = serde_json::to_string(&customer(1)).unwrap();
        assert_eq!(
            json,
            r#"{"id":1,"name":"Customer","region":"North","created_at":"2025-01-01"}"#
        );
    }

    #[test]
    fn test_known_table_without_rows_is_empty() {
        let mut rows = HashMap::new();
        rows.insert("customers".to_string(), vec![customer(1), customer(2)]);
        let store = RowStore::from_rows(catalog(), rows).unwrap();

        assert_eq!(store.rows_for("customers").unwrap().len(), 2);
        assert!(store.rows_for("inventory").unwrap().is_empty());
        assert!(matches!(
            store.rows_for("invoices"),
            Err(EngineError::SchemaNotFound { .. })
        ));
    }

    #[test]
    fn test_rows_for_is_case_insensitive() {
        let mut rows = HashMap::new();
        rows.insert("customers".to_string(), vec![customer(1)]);
        let store = RowStore::from_rows(catalog(), rows).unwrap();
        assert_eq!(store.rows_for("CUSTOMERS").unwrap().len(), 1);
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let mut rows = HashMap::new();
        rows.insert(
            "customers".to_string(),
            vec![Row::new().with("id", 1).with("name", "x")],
        );
        let err = RowStore::from_rows(catalog(), rows).unwrap_err();
        assert!(matches!(err, GenerationError::MissingColumn { ref column, .. } if column == "region"));
    }

    #[test]
    fn test_type_mismatch_is_rejected() {
        let mut rows = HashMap::new();
        rows.insert(
            "customers".to_string(),
            vec![Row::new()
                .with("id", "one")
                .with("name", "x")
                .with("region", "North")
                .with("created_at", NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())],
        );
        let err = RowStore::from_rows(catalog(), rows).unwrap_err();
        assert!(matches!(err, GenerationError::TypeMismatch { .. }));
    }

    #[test]
    fn test_unknown_table_is_rejected() {
        let mut rows = HashMap::new();
        rows.insert("invoices".to_string(), vec![]);
        assert_eq!(
            RowStore::from_rows(catalog(), rows).unwrap_err(),
            GenerationError::UnknownTable("invoices".to_string())
        );
    }
}
