//! # Analytics Aggregator
//!
//! Dashboard KPIs plus a zero-filled time series over the trailing window.
//!
//! ```text
//! rows ─► bucket by period ─► sum per bucket ─► variance(hash(period, metric, bucket))
//! ```
//!
//! Totals are perturbed once with their own seeds, so `totalRevenue` is not
//! the sum of the perturbed buckets.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::storage::{Row, RowStore};
use crate::value::{round_cents, Value};
use crate::variance::{request_seed, Variance};

/// Label used when there are no sales to rank
pub const NO_REGION: &str = "N/A";

/// Calendar bucket width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day,
    Week,
    Month,
    Quarter,
}

impl Period {
    pub const NAMES: [&'static str; 4] = ["day", "week", "month", "quarter"];

    /// Parse a period name (case-insensitive)
    pub fn parse(s: &str) -> EngineResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            _ => Err(EngineError::invalid_parameter("period", s, &Self::NAMES)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
        }
    }

    /// First day of the bucket containing `date`
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Day => date,
            Period::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Period::Month => date.with_day(1).unwrap_or(date),
            Period::Quarter => {
                let month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
            }
        }
    }

    /// Start of the bucket after the one starting at `start`
    fn next_bucket(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Day => start.checked_add_signed(Duration::days(1)),
            Period::Week => start.checked_add_signed(Duration::days(7)),
            Period::Month => start.checked_add_months(Months::new(1)),
            Period::Quarter => start.checked_add_months(Months::new(3)),
        }
    }

    /// Every bucket start from the bucket of `from` to the bucket of `to`
    pub fn buckets(self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let last = self.bucket_start(to);
        let mut current = Some(self.bucket_start(from));
        let mut out = Vec::new();
        while let Some(start) = current.filter(|s| *s <= last) {
            out.push(start);
            current = self.next_bucket(start);
        }
        out
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summed quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Revenue,
    Orders,
}

impl Metric {
    pub const NAMES: [&'static str; 2] = ["revenue", "orders"];

    /// Parse a metric name (case-insensitive)
    pub fn parse(s: &str) -> EngineResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "revenue" => Ok(Metric::Revenue),
            "orders" => Ok(Metric::Orders),
            _ => Err(EngineError::invalid_parameter("metric", s, &Self::NAMES)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::Orders => "orders",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_revenue: f64,
    pub total_orders: u64,
    pub top_region: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: Value,
}

/// `{summary, series}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsResult {
    pub summary: AnalyticsSummary,
    pub series: Vec<SeriesPoint>,
}

/// Time-series aggregation over a read-only row store.
#[derive(Debug, Clone, Copy)]
pub struct Analytics<'s> {
    store: &'s RowStore,
    variance: Variance,
    window_start: NaiveDate,
    anchor: NaiveDate,
    seed_salt: u64,
}

impl<'s> Analytics<'s> {
    pub fn new(
        store: &'s RowStore,
        variance: Variance,
        window_start: NaiveDate,
        anchor: NaiveDate,
        seed_salt: u64,
    ) -> Self {
        Analytics {
            store,
            variance,
            window_start,
            anchor,
            seed_salt,
        }
    }

    fn seed(&self, parts: &[&str]) -> u64 {
        let salt = self.seed_salt.to_le_bytes();
        let mut all: Vec<&[u8]> = vec![&salt];
        all.extend(parts.iter().map(|p| p.as_bytes()));
        request_seed(&all)
    }

    /// Parse the parameters and compute summary plus series.
    pub fn compute(&self, period: &str, metric: &str) -> EngineResult<AnalyticsResult> {
        let period = Period::parse(period)?;
        let metric = Metric::parse(metric)?;
        self.compute_for(period, metric)
    }

    pub fn compute_for(&self, period: Period, metric: Metric) -> EngineResult<AnalyticsResult> {
        let sales = self.store.rows_for("sales")?;
        let orders = self.store.rows_for("orders")?;

        let mut buckets: BTreeMap<NaiveDate, f64> = period
            .buckets(self.window_start, self.anchor)
            .into_iter()
            .map(|b| (b, 0.0))
            .collect();
        let (rows, date_column) = match metric {
            Metric::Revenue => (sales, "sale_date"),
            Metric::Orders => (orders, "order_date"),
        };
        for row in rows {
            let Some(date) = row.get_date(date_column) else {
                continue;
            };
            if let Some(total) = buckets.get_mut(&period.bucket_start(date)) {
                *total += match metric {
                    Metric::Revenue => row.get_f64("amount").unwrap_or_default(),
                    Metric::Orders => 1.0,
                };
            }
        }

        let series = buckets
            .into_iter()
            .map(|(date, base)| {
                let label = date.to_string();
                let seed = self.seed(&[period.as_str(), metric.as_str(), &label]);
                let perturbed = self.variance.perturb(base, seed);
                let value = match metric {
                    Metric::Revenue => Value::Decimal(round_cents(perturbed)),
                    Metric::Orders => Value::Integer(perturbed.round() as i64),
                };
                SeriesPoint { date, value }
            })
            .collect::<Vec<_>>();

        let revenue: f64 = sales.iter().filter_map(|r| r.get_f64("amount")).sum();
        let revenue_seed = self.seed(&[period.as_str(), metric.as_str(), "totalRevenue"]);
        let orders_seed = self.seed(&[period.as_str(), metric.as_str(), "totalOrders"]);
        let summary = AnalyticsSummary {
            total_revenue: round_cents(self.variance.perturb(revenue, revenue_seed)),
            total_orders: self.variance.perturb_count(orders.len(), orders_seed),
            top_region: top_region(sales),
        };

        tracing::debug!(
            period = %period,
            metric = %metric,
            buckets = series.len(),
            "analytics_computed"
        );
        Ok(AnalyticsResult { summary, series })
    }
}

/// Region with the largest sales total; the first one seen wins ties.
fn top_region(sales: &[Row]) -> String {
    let mut totals: Vec<(&str, f64)> = Vec::new();
    for sale in sales {
        let Some(region) = sale.get_str("region") else {
            continue;
        };
        let amount = sale.get_f64("amount").unwrap_or_default();
        match totals.iter_mut().find(|(r, _)| *r == region) {
            Some((_, total)) => *total += amount,
            None => totals.push((region, amount)),
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for (region, total) in totals {
        if best.map_or(true, |(_, b)| total > b) {
            best = Some((region, total));
        }
    }
    best.map_or_else(|| NO_REGION.to_string(), |(r, _)| r.to_string())
}
