//! Best-effort pattern extraction from pseudo-SQL.
//!
//! None of this is a parser. Each function looks for one recognizable shape
//! and returns `None` when it is absent or malformed, in which case the
//! simulator simply skips that step.

use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::schema::{ColumnType, TableSchema};
use crate::value::Value;

static FILTER: OnceLock<Regex> = OnceLock::new();
static AGGREGATE: OnceLock<Regex> = OnceLock::new();
static GROUP_BY: OnceLock<Regex> = OnceLock::new();
static LIMIT: OnceLock<Regex> = OnceLock::new();

fn pattern(cell: &'static OnceLock<Regex>, src: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(src).expect("static SQL pattern must compile"))
}

/// Lowercased identifier-ish tokens: runs of letters, digits and `_`
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Comparison operator of a simple filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "=" => Some(CompareOp::Eq),
            "!=" | "<>" => Some(CompareOp::NotEq),
            "<" => Some(CompareOp::Lt),
            "<=" => Some(CompareOp::LtEq),
            ">" => Some(CompareOp::Gt),
            ">=" => Some(CompareOp::GtEq),
            _ => None,
        }
    }

    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::NotEq => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::LtEq => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::GtEq => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Eq => "=",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        };
        write!(f, "{s}")
    }
}

/// `column <op> literal`, with the literal already typed for the column
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub op: CompareOp,
    pub literal: Value,
}

impl Filter {
    pub fn matches(&self, value: Option<&Value>) -> bool {
        value
            .and_then(|v| v.compare(&self.literal))
            .is_some_and(|ordering| self.op.accepts(ordering))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.literal {
            Value::Text(_) | Value::Date(_) | Value::DateTime(_) => {
                write!(f, "{} {} '{}'", self.column, self.op, self.literal)
            }
            _ => write!(f, "{} {} {}", self.column, self.op, self.literal),
        }
    }
}

/// Type a literal for a column. `None` if it does not parse.
fn typed_literal(raw: &str, column_type: ColumnType) -> Option<Value> {
    match column_type {
        ColumnType::Text => Some(Value::text(raw)),
        ColumnType::Integer => raw.parse::<i64>().ok().map(Value::Integer),
        ColumnType::Decimal => raw.parse::<f64>().ok().map(Value::Decimal),
        ColumnType::Date | ColumnType::DateTime => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(Value::Date),
        ColumnType::Boolean => match raw.to_lowercase().as_str() {
            "true" | "1" => Some(Value::Boolean(true)),
            "false" | "0" => Some(Value::Boolean(false)),
            _ => None,
        },
    }
}

/// First `WHERE col <op> literal` whose column exists in `table`
pub fn parse_filter(sql: &str, table: &TableSchema) -> Option<Filter> {
    let re = pattern(
        &FILTER,
        r"(?i)\bwhere\s+(?:\w+\.)?(\w+)\s*(<=|>=|<>|!=|=|<|>)\s*('[^']*'|\d{4}-\d{2}-\d{2}\b|-?\d+(?:\.\d+)?|true|false)",
    );
    let caps = re.captures(sql)?;
    let column = table.column(caps.get(1)?.as_str())?;
    let op = CompareOp::parse(caps.get(2)?.as_str())?;
    let raw = caps.get(3)?.as_str().trim_matches('\'');
    let literal = typed_literal(raw, column.column_type)?;
    Some(Filter {
        column: column.name.clone(),
        op,
        literal,
    })
}

/// Supported aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateFunction {
    Sum,
    Count,
    Avg,
}

impl AggregateFunction {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sum" => Some(AggregateFunction::Sum),
            "count" => Some(AggregateFunction::Count),
            "avg" => Some(AggregateFunction::Avg),
            _ => None,
        }
    }

    /// Output column name when the SQL gives no alias
    pub fn default_alias(self) -> &'static str {
        match self {
            AggregateFunction::Sum => "sum",
            AggregateFunction::Count => "count",
            AggregateFunction::Avg => "avg",
        }
    }
}

/// An aggregate call found in the SQL text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateCall {
    pub function: AggregateFunction,
    /// Argument column, `None` for `*` or an empty argument list
    pub argument: Option<String>,
    pub alias: Option<String>,
}

/// First `SUM(..)`, `COUNT(..)` or `AVG(..)` call, with its alias if any.
///
/// Without call syntax, a bare `sum`/`count`/`avg` token still counts as an
/// aggregate with no argument, so `SUM`/`AVG` fall back to the measure column.
pub fn parse_aggregate(sql: &str) -> Option<AggregateCall> {
    let re = pattern(
        &AGGREGATE,
        r"(?i)\b(sum|count|avg)\s*\(\s*(?:distinct\s+)?(?:\w+\.)?(\*|\w+)?\s*\)(?:\s+as\s+(\w+))?",
    );
    let Some(caps) = re.captures(sql) else {
        return tokenize(sql)
            .iter()
            .find_map(|t| AggregateFunction::parse(t))
            .map(|function| AggregateCall {
                function,
                argument: None,
                alias: None,
            });
    };
    let function = AggregateFunction::parse(caps.get(1)?.as_str())?;
    let argument = caps
        .get(2)
        .map(|m| m.as_str())
        .filter(|a| *a != "*")
        .map(str::to_lowercase);
    let alias = caps.get(3).map(|m| m.as_str().to_string());
    Some(AggregateCall {
        function,
        argument,
        alias,
    })
}

/// `GROUP BY col`, only when `col` exists in `table`
pub fn parse_group_by(sql: &str, table: &TableSchema) -> Option<String> {
    let re = pattern(&GROUP_BY, r"(?i)\bgroup\s+by\s+(?:\w+\.)?(\w+)");
    let caps = re.captures(sql)?;
    table
        .column(caps.get(1)?.as_str())
        .map(|c| c.name.clone())
}

/// `LIMIT n`
pub fn parse_limit(sql: &str) -> Option<usize> {
    let re = pattern(&LIMIT, r"(?i)\blimit\s+(\d+)");
    re.captures(sql)?.get(1)?.as_str().parse().ok()
}
