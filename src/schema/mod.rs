//! # Schema Registry
//!
//! The fixed ERP schema served by the simulator:
//! - typed column definitions with primary-key and soft reference annotations
//! - a [`SchemaCatalog`] that owns the tables in declaration order
//! - DDL text rendered from the catalog on demand
//!
//! ## Rendered DDL
//!
//! ```sql
//! CREATE TABLE orders (
//!   id INTEGER PRIMARY KEY,
//!   customer_id INTEGER REFERENCES customers(id),
//!   order_date DATE,
//!   status VARCHAR(100)
//! );
//! ```

pub mod catalog;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use catalog::SchemaCatalog;

/// Declared column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    Decimal,
    Date,
    DateTime,
    Boolean,
}

impl ColumnType {
    /// SQL type name used when rendering DDL
    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Text => "VARCHAR(100)",
            ColumnType::Integer => "INTEGER",
            ColumnType::Decimal => "DECIMAL(12,2)",
            ColumnType::Date => "DATE",
            ColumnType::DateTime => "TIMESTAMP",
            ColumnType::Boolean => "BOOLEAN",
        }
    }

    /// Integer and decimal columns can be summed and averaged
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Decimal)
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "varchar" | "string" => Some(ColumnType::Text),
            "integer" | "int" | "bigint" => Some(ColumnType::Integer),
            "decimal" | "numeric" | "float" => Some(ColumnType::Decimal),
            "date" => Some(ColumnType::Date),
            "datetime" | "timestamp" => Some(ColumnType::DateTime),
            "boolean" | "bool" => Some(ColumnType::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text => write!(f, "text"),
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Decimal => write!(f, "decimal"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::DateTime => write!(f, "datetime"),
            ColumnType::Boolean => write!(f, "boolean"),
        }
    }
}

/// Column-level annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnAnnotation {
    /// Column is the table's primary key
    Primary,
    /// Advisory reference to a parent table column. Never enforced.
    References { table: String, column: String },
}

impl fmt::Display for ColumnAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnAnnotation::Primary => write!(f, "PRIMARY KEY"),
            ColumnAnnotation::References { table, column } => {
                write!(f, "REFERENCES {table}({column})")
            }
        }
    }
}

/// Column definition with name, type, and annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<ColumnAnnotation>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Column {
            name: name.into(),
            column_type,
            annotations: Vec::new(),
        }
    }

    /// Integer primary key column
    pub fn primary(name: impl Into<String>) -> Self {
        Column::new(name, ColumnType::Integer).with_annotation(ColumnAnnotation::Primary)
    }

    /// Integer column referencing `table.column`
    pub fn reference(name: impl Into<String>, table: &str, column: &str) -> Self {
        Column::new(name, ColumnType::Integer).with_annotation(ColumnAnnotation::References {
            table: table.to_string(),
            column: column.to_string(),
        })
    }

    pub fn with_annotation(mut self, annotation: ColumnAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn is_primary(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| matches!(a, ColumnAnnotation::Primary))
    }

    /// Referenced `(table, column)` if this column is a soft foreign key
    pub fn references(&self) -> Option<(&str, &str)> {
        self.annotations.iter().find_map(|a| match a {
            ColumnAnnotation::References { table, column } => {
                Some((table.as_str(), column.as_str()))
            }
            ColumnAnnotation::Primary => None,
        })
    }

    /// Column line as it appears inside `CREATE TABLE`
    pub fn to_ddl(&self) -> String {
        let mut line = format!("{} {}", self.name, self.column_type.sql_name());
        for annotation in &self.annotations {
            line.push(' ');
            line.push_str(&annotation.to_string());
        }
        line
    }
}

/// A table definition: unique name plus ordered columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_name: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(table_name: impl Into<String>, columns: Vec<Column>) -> Self {
        TableSchema {
            table_name: table_name.into(),
            columns,
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Default column for SUM/AVG: first non-key decimal, else first non-key integer
    pub fn measure_column(&self) -> Option<&Column> {
        let candidates = || {
            self.columns
                .iter()
                .filter(|c| !c.is_primary() && c.references().is_none())
        };
        candidates()
            .find(|c| c.column_type == ColumnType::Decimal)
            .or_else(|| candidates().find(|c| c.column_type == ColumnType::Integer))
    }

    /// `CREATE TABLE` statement for this table
    pub fn to_ddl(&self) -> String {
        let body = self
            .columns
            .iter()
            .map(|c| format!("  {}", c.to_ddl()))
            .collect::<Vec<_>>()
            .join(",\n");
        format!("CREATE TABLE {} (\n{}\n);", self.table_name, body)
    }

    /// Compact `name(col, col, ...)` form
    pub fn summary(&self) -> String {
        format!("{}({})", self.table_name, self.column_names().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> TableSchema {
        TableSchema::new(
            "orders",
            vec![
                Column::primary("id"),
                Column::reference("customer_id", "customers", "id"),
                Column::new("order_date", ColumnType::Date),
                Column::new("status", ColumnType::Text),
            ],
        )
    }

    #[test]
    fn test_column_ddl_annotations() {
        let table = orders();
        assert_eq!(table.columns[0].to_ddl(), "id INTEGER PRIMARY KEY");
        assert_eq!(
            table.columns[1].to_ddl(),
            "customer_id INTEGER REFERENCES customers(id)"
        );
    }

    #[test]
    fn test_table_ddl_shape() {
        let ddl = orders().to_ddl();
        assert!(ddl.starts_with("CREATE TABLE orders (\n"));
        assert!(ddl.ends_with("\n);"));
        assert_eq!(ddl.lines().count(), 6);
    }

    #[test]
    fn test_rendered_ddl_matches_module_docs() {
        let expected = "CREATE TABLE orders (\n  id INTEGER PRIMARY KEY,\n  customer_id INTEGER REFERENCES customers(id),\n  order_date DATE,\n  status VARCHAR(100)\n);";
        assert_eq!(orders().to_ddl(), expected);
        assert_eq!(
            SchemaCatalog::erp().schema_snippet("orders").unwrap(),
            expected
        );
    }

    #[test]
    fn test_column_lookup_case_insensitive() {
        assert!(orders().has_column("ORDER_DATE"));
        assert!(!orders().has_column("amount"));
    }

    #[test]
    fn test_measure_column_skips_keys() {
        // orders has no non-key numeric column
        assert!(orders().measure_column().is_none());

        let inventory = TableSchema::new(
            "inventory",
            vec![
                Column::primary("id"),
                Column::reference("product_id", "products", "id"),
                Column::new("quantity", ColumnType::Integer),
            ],
        );
        assert_eq!(inventory.measure_column().unwrap().name, "quantity");
    }

    #[test]
    fn test_column_type_from_str() {
        assert_eq!(ColumnType::from_str("INT"), Some(ColumnType::Integer));
        assert_eq!(ColumnType::from_str("timestamp"), Some(ColumnType::DateTime));
        assert_eq!(ColumnType::from_str("blob"), None);
    }

    #[test]
    fn test_summary() {
        assert_eq!(orders().summary(), "orders(id, customer_id, order_date, status)");
    }
}
