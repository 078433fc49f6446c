//! # Schema Catalog
//!
//! Immutable catalog of the six ERP tables. Lookups are case-insensitive,
//! and the DDL text is always rendered from the table definitions.

use super::{Column, ColumnType, TableSchema};
use crate::error::{EngineError, EngineResult};

/// Table names in declaration order
pub const TABLE_NAMES: [&str; 6] = [
    "customers",
    "products",
    "orders",
    "order_items",
    "sales",
    "inventory",
];

/// Catalog of table schemas, kept in declaration order.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    tables: Vec<TableSchema>,
}

impl SchemaCatalog {
    /// Build the fixed ERP catalog
    pub fn erp() -> Self {
        use ColumnType::{Date, Decimal, Integer, Text};

        let tables = vec![
            TableSchema::new(
                "customers",
                vec![
                    Column::primary("id"),
                    Column::new("name", Text),
                    Column::new("region", Text),
                    Column::new("created_at", Date),
                ],
            ),
            TableSchema::new(
                "products",
                vec![
                    Column::primary("id"),
                    Column::new("name", Text),
                    Column::new("category", Text),
                    Column::new("unit_price", Decimal),
                ],
            ),
            TableSchema::new(
                "orders",
                vec![
                    Column::primary("id"),
                    Column::reference("customer_id", "customers", "id"),
                    Column::new("order_date", Date),
                    Column::new("status", Text),
                ],
            ),
            TableSchema::new(
                "order_items",
                vec![
                    Column::primary("id"),
                    Column::reference("order_id", "orders", "id"),
                    Column::reference("product_id", "products", "id"),
                    Column::new("quantity", Integer),
                    Column::new("unit_price", Decimal),
                    Column::new("amount", Decimal),
                ],
            ),
            TableSchema::new(
                "sales",
                vec![
                    Column::primary("id"),
                    Column::reference("order_id", "orders", "id"),
                    Column::reference("product_id", "products", "id"),
                    Column::new("amount", Decimal),
                    Column::new("sale_date", Date),
                    Column::new("region", Text),
                ],
            ),
            TableSchema::new(
                "inventory",
                vec![
                    Column::primary("id"),
                    Column::reference("product_id", "products", "id"),
                    Column::new("quantity", Integer),
                    Column::new("warehouse", Text),
                    Column::new("updated_at", Date),
                ],
            ),
        ];

        SchemaCatalog { tables }
    }

    /// Get a table schema (case-insensitive)
    pub fn get(&self, table_name: &str) -> Option<&TableSchema> {
        self.tables
            .iter()
            .find(|t| t.table_name.eq_ignore_ascii_case(table_name.trim()))
    }

    /// Get a table schema or `SchemaNotFound`
    pub fn table(&self, table_name: &str) -> EngineResult<&TableSchema> {
        self.get(table_name)
            .ok_or_else(|| EngineError::SchemaNotFound {
                table: table_name.to_string(),
            })
    }

    pub fn contains(&self, table_name: &str) -> bool {
        self.get(table_name).is_some()
    }

    /// All tables in declaration order
    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.table_name.as_str()).collect()
    }

    /// Full DDL: every `CREATE TABLE` statement in declaration order
    pub fn schema_text(&self) -> String {
        self.tables
            .iter()
            .map(TableSchema::to_ddl)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// `CREATE TABLE` statement of one table
    pub fn schema_snippet(&self, table_name: &str) -> EngineResult<String> {
        self.table(table_name).map(TableSchema::to_ddl)
    }

    /// One `table(col, ...)` line per table
    pub fn column_summary(&self) -> String {
        self.tables
            .iter()
            .map(TableSchema::summary)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Tables that declare a column with this name, in declaration order
    pub fn tables_with_column(&self, column: &str) -> Vec<&TableSchema> {
        self.tables.iter().filter(|t| t.has_column(column)).collect()
    }

    /// Whether `name` is any table or column name (case-insensitive)
    pub fn is_known_identifier(&self, name: &str) -> bool {
        self.contains(name) || self.tables.iter().any(|t| t.has_column(name))
    }
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::erp()
    }
}
