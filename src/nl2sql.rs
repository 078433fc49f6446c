//! # NL2SQL Synthesizer
//!
//! Keyword classification of natural-language questions into a fixed set of
//! intents, each rendered through one canned SQL template.
//!
//! Rules are evaluated in [`RULES`] order and the first rule whose keyword
//! groups all match wins. A keyword group matches when any of its keywords is
//! present: single words match a whole token or its plural ("order" matches
//! "orders" but "count" does not match "country"), phrases match whole words
//! in the normalized text.
//!
//! ## Status policy
//!
//! | Outcome | Status | can_execute | SQL |
//! |---------|--------|-------------|-----|
//! | intent matched | `OK` | true | rendered template |
//! | no intent, known table/column mentioned | `APPROVAL` | false | `SELECT * FROM t LIMIT 100;` |
//! | nothing recognized | `REJECTED` | false | empty |

use serde::Serialize;

use crate::error::{require_text, EngineResult};
use crate::query::tokenize;
use crate::schema::{SchemaCatalog, TableSchema};

/// Recognized request categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    RevenueByGroup,
    TotalRevenue,
    OrderCount,
    ProductCount,
    ListAll,
}

/// One row of the classification table
#[derive(Debug)]
pub struct IntentRule {
    pub intent: Intent,
    /// Every group must match; within a group any keyword suffices
    pub keyword_groups: &'static [&'static [&'static str]],
    pub default_table: &'static str,
    pub required_columns: &'static [&'static str],
    /// `{t}` is replaced by the chosen table
    pub template: &'static str,
}

/// Classification table, highest precedence first
pub const RULES: [IntentRule; 5] = [
    IntentRule {
        intent: Intent::RevenueByGroup,
        keyword_groups: &[
            &["revenue", "sales", "amount", "total"],
            &["by region", "per region", "each region", "group"],
        ],
        default_table: "sales",
        required_columns: &["region", "amount"],
        template: "SELECT region, SUM(amount) AS total FROM {t} GROUP BY region ORDER BY total DESC;",
    },
    IntentRule {
        intent: Intent::TotalRevenue,
        keyword_groups: &[
            &["revenue", "sales", "income"],
            &["total", "sum", "amount", "how much", "overall"],
        ],
        default_table: "sales",
        required_columns: &["amount"],
        template: "SELECT SUM(amount) AS total FROM {t};",
    },
    IntentRule {
        intent: Intent::OrderCount,
        keyword_groups: &[&["count", "how many", "number of"], &["order"]],
        default_table: "orders",
        required_columns: &[],
        template: "SELECT COUNT(*) AS order_count FROM {t};",
    },
    IntentRule {
        intent: Intent::ProductCount,
        keyword_groups: &[&["count", "how many", "number of"], &["product"]],
        default_table: "products",
        required_columns: &[],
        template: "SELECT COUNT(*) AS product_count FROM {t};",
    },
    IntentRule {
        intent: Intent::ListAll,
        keyword_groups: &[&["list", "show all", "select all", "every"]],
        default_table: "sales",
        required_columns: &[],
        template: "SELECT * FROM {t} LIMIT 100;",
    },
];

/// Row cap of the tentative SQL proposed for approval
const APPROVAL_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlStatus {
    Ok,
    Approval,
    Rejected,
}

/// Synthesized SQL: `{sql, status, can_execute}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Nl2SqlResult {
    pub sql: String,
    pub status: SqlStatus,
    pub can_execute: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
}

/// Question text reduced to lowercase tokens
struct Normalized {
    tokens: Vec<String>,
    /// Tokens joined by single spaces, padded so phrases match whole words
    padded: String,
}

impl Normalized {
    fn new(text: &str) -> Self {
        let tokens = tokenize(text);
        let padded = format!(" {} ", tokens.join(" "));
        Normalized { tokens, padded }
    }

    fn has_keyword(&self, keyword: &str) -> bool {
        if keyword.contains(' ') {
            self.padded.contains(&format!(" {keyword} "))
        } else {
            self.tokens
                .iter()
                .any(|t| t == keyword || t.strip_suffix('s') == Some(keyword))
        }
    }

    fn matches(&self, rule: &IntentRule) -> bool {
        rule.keyword_groups
            .iter()
            .all(|group| group.iter().any(|k| self.has_keyword(k)))
    }
}

/// Tables named by the tokens, in mention order. Singular forms count.
fn mentioned_tables<'c>(catalog: &'c SchemaCatalog, tokens: &[String]) -> Vec<&'c TableSchema> {
    let mut found: Vec<&TableSchema> = Vec::new();
    for token in tokens {
        let table = catalog
            .get(token)
            .or_else(|| catalog.get(&format!("{token}s")));
        if let Some(table) = table {
            if !found.iter().any(|f| f.table_name == table.table_name) {
                found.push(table);
            }
        }
    }
    found
}

/// Turns questions into SQL using the fixed catalog.
#[derive(Debug, Clone, Copy)]
pub struct Nl2Sql<'c> {
    catalog: &'c SchemaCatalog,
}

impl<'c> Nl2Sql<'c> {
    pub fn new(catalog: &'c SchemaCatalog) -> Self {
        Nl2Sql { catalog }
    }

    /// Classify `question` (plus optional `schema_hint`) and render SQL.
    pub fn generate(&self, question: &str, schema_hint: Option<&str>) -> EngineResult<Nl2SqlResult> {
        let question = require_text(question)?;
        let hint = schema_hint.map(str::trim).filter(|h| !h.is_empty());

        let context = match hint {
            Some(h) => Normalized::new(&format!("{question} {h}")),
            None => Normalized::new(question),
        };
        let question_tables = mentioned_tables(self.catalog, &tokenize(question));
        let hint_tables = hint
            .map(|h| mentioned_tables(self.catalog, &tokenize(h)))
            .unwrap_or_default();

        if let Some(rule) = RULES.iter().find(|r| context.matches(r)) {
            let table = self.choose_table(rule, &hint_tables, &question_tables);
            let sql = rule.template.replace("{t}", table);
            tracing::debug!(intent = ?rule.intent, table, "nl2sql_intent_matched");
            return Ok(Nl2SqlResult {
                sql,
                status: SqlStatus::Ok,
                can_execute: true,
                intent: Some(rule.intent),
            });
        }

        if let Some(table) = self.approval_table(&question_tables, &context.tokens) {
            tracing::debug!(table, "nl2sql_needs_approval");
            return Ok(Nl2SqlResult {
                sql: format!("SELECT * FROM {table} LIMIT {APPROVAL_LIMIT};"),
                status: SqlStatus::Approval,
                can_execute: false,
                intent: None,
            });
        }

        tracing::debug!("nl2sql_rejected");
        Ok(Nl2SqlResult {
            sql: String::new(),
            status: SqlStatus::Rejected,
            can_execute: false,
            intent: None,
        })
    }

    /// Hint tables, then question tables, then the rule's default; the first
    /// candidate carrying every required column wins.
    fn choose_table<'a>(
        &self,
        rule: &IntentRule,
        hint_tables: &[&'a TableSchema],
        question_tables: &[&'a TableSchema],
    ) -> &'a str {
        hint_tables
            .iter()
            .chain(question_tables)
            .copied()
            .find(|t| rule.required_columns.iter().all(|c| t.has_column(c)))
            .map_or(rule.default_table, |t| t.table_name.as_str())
    }

    /// Table for a tentative query: the first mentioned table, else the
    /// first table declaring a mentioned column.
    fn approval_table(&self, question_tables: &[&'c TableSchema], tokens: &[String]) -> Option<&'c str> {
        if let Some(table) = question_tables.first() {
            return Some(table.table_name.as_str());
        }
        tokens
            .iter()
            .filter(|t| self.catalog.is_known_identifier(t))
            .find_map(|t| self.catalog.tables_with_column(t).into_iter().next())
            .map(|t| t.table_name.as_str())
    }
}
