//! Deterministic synthetic data generation.
//!
//! A single `StdRng` seeded from the master seed drives every draw, and
//! tables are generated parents-first so child rows can sample parent keys.
//! Dates are offsets back from the anchor date, so the same seed and anchor
//! always reproduce the same rows.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::error::{GenerationError, GenerationResult};
use super::Row;
use crate::value::{round_cents, Value};

pub const REGIONS: [&str; 5] = ["North", "South", "East", "West", "Central"];
pub const CATEGORIES: [&str; 5] = ["Electronics", "Office", "Furniture", "Supplies", "Services"];
pub const STATUSES: [&str; 4] = ["pending", "shipped", "delivered", "cancelled"];
pub const WAREHOUSES: [&str; 3] = ["A", "B", "C"];

pub const CUSTOMER_COUNT: i64 = 30;
pub const PRODUCT_COUNT: i64 = 20;
pub const ORDER_COUNT: i64 = 80;
pub const MAX_ITEMS_PER_ORDER: usize = 4;
pub const SALES_COUNT: usize = 120;

const CUSTOMER_HISTORY_DAYS: i64 = 400;
const INVENTORY_HISTORY_DAYS: i64 = 30;

/// Inputs that fully determine the generated data set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub master_seed: u64,
    /// Last day of the trailing window
    pub anchor: NaiveDate,
    /// Orders and sales fall within `[anchor - window_days, anchor]`
    pub window_days: u32,
}

impl GeneratorSettings {
    /// First day of the trailing window, clamped to the earliest
    /// representable date. `generate` rejects windows that would clamp.
    pub fn window_start(&self) -> NaiveDate {
        days_before(self.anchor, i64::from(self.window_days)).unwrap_or(NaiveDate::MIN)
    }
}

fn days_before(anchor: NaiveDate, days: i64) -> Option<NaiveDate> {
    anchor.checked_sub_signed(Duration::try_days(days)?)
}

struct Generator {
    rng: StdRng,
    anchor: NaiveDate,
}

impl Generator {
    fn date_within(&mut self, days_back: i64) -> NaiveDate {
        let offset = self.rng.gen_range(0..=days_back);
        days_before(self.anchor, offset).unwrap_or(self.anchor)
    }

    fn pick(&mut self, choices: &[&'static str]) -> &'static str {
        choices.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn customers(&mut self) -> Vec<Row> {
        (1..=CUSTOMER_COUNT)
            .map(|id| {
                Row::new()
                    .with("id", id)
                    .with("name", format!("Customer {id}").as_str())
                    .with("region", self.pick(&REGIONS))
                    .with("created_at", self.date_within(CUSTOMER_HISTORY_DAYS))
            })
            .collect()
    }

    fn products(&mut self) -> Vec<Row> {
        (1..=PRODUCT_COUNT)
            .map(|id| {
                let price = round_cents(self.rng.gen_range(10.0..=500.0));
                Row::new()
                    .with("id", id)
                    .with("name", format!("Product {id}").as_str())
                    .with("category", self.pick(&CATEGORIES))
                    .with("unit_price", price)
            })
            .collect()
    }

    fn orders(&mut self, window_days: i64) -> Vec<Row> {
        (1..=ORDER_COUNT)
            .map(|id| {
                Row::new()
                    .with("id", id)
                    .with("customer_id", self.rng.gen_range(1..=CUSTOMER_COUNT))
                    .with("order_date", self.date_within(window_days))
                    .with("status", self.pick(&STATUSES))
            })
            .collect()
    }

    fn order_items(&mut self, orders: &[Row], products: &[Row]) -> Vec<Row> {
        let mut items = Vec::new();
        for order in orders {
            let order_id = order.get_i64("id").unwrap_or_default();
            for _ in 0..self.rng.gen_range(1..=MAX_ITEMS_PER_ORDER) {
                let Some(product) = products.choose(&mut self.rng) else {
                    continue;
                };
                let unit_price = product.get_f64("unit_price").unwrap_or_default();
                let quantity = self.rng.gen_range(1..=5_i64);
                items.push(
                    Row::new()
                        .with("id", items.len() as i64 + 1)
                        .with("order_id", order_id)
                        .with("product_id", product.get_i64("id").unwrap_or_default())
                        .with("quantity", quantity)
                        .with("unit_price", unit_price)
                        .with("amount", Value::money(unit_price * quantity as f64)),
                );
            }
        }
        items
    }

    /// Sales mirror the first order items, dated by their order and placed in
    /// the ordering customer's region.
    fn sales(&mut self, items: &[Row], orders: &[Row], customers: &[Row]) -> Vec<Row> {
        let orders_by_id: HashMap<i64, &Row> = orders
            .iter()
            .filter_map(|o| Some((o.get_i64("id")?, o)))
            .collect();
        let region_by_customer: HashMap<i64, &str> = customers
            .iter()
            .filter_map(|c| Some((c.get_i64("id")?, c.get_str("region")?)))
            .collect();

        items
            .iter()
            .take(SALES_COUNT)
            .enumerate()
            .map(|(i, item)| {
                let order_id = item.get_i64("order_id").unwrap_or_default();
                let order = orders_by_id.get(&order_id);
                let region = order
                    .and_then(|o| o.get_i64("customer_id"))
                    .and_then(|c| region_by_customer.get(&c).copied());
                let region = match region {
                    Some(r) => r,
                    None => self.pick(&REGIONS),
                };
                let sale_date = match order.and_then(|o| o.get_date("order_date")) {
                    Some(d) => d,
                    None => self.date_within(90),
                };
                Row::new()
                    .with("id", i as i64 + 1)
                    .with("order_id", order_id)
                    .with("product_id", item.get_i64("product_id").unwrap_or_default())
                    .with("amount", item.get_f64("amount").unwrap_or_default())
                    .with("sale_date", sale_date)
                    .with("region", region)
            })
            .collect()
    }

    fn inventory(&mut self, products: &[Row]) -> Vec<Row> {
        products
            .iter()
            .enumerate()
            .map(|(i, product)| {
                Row::new()
                    .with("id", i as i64 + 1)
                    .with("product_id", product.get_i64("id").unwrap_or_default())
                    .with("quantity", self.rng.gen_range(0..=200_i64))
                    .with("warehouse", self.pick(&WAREHOUSES))
                    .with("updated_at", self.date_within(INVENTORY_HISTORY_DAYS))
            })
            .collect()
    }
}

/// Generate rows for every table, parents before children.
pub fn generate(settings: &GeneratorSettings) -> GenerationResult<HashMap<String, Vec<Row>>> {
    if settings.window_days == 0 {
        return Err(GenerationError::InvalidWindow(
            "window_days must be at least 1".to_string(),
        ));
    }
    let deepest = i64::from(settings.window_days).max(CUSTOMER_HISTORY_DAYS);
    if days_before(settings.anchor, deepest).is_none() {
        return Err(GenerationError::InvalidWindow(format!(
            "{deepest} days before {} is outside the supported date range",
            settings.anchor
        )));
    }

    let mut builder = Generator {
        rng: StdRng::seed_from_u64(settings.master_seed),
        anchor: settings.anchor,
    };

    let customers = builder.customers();
    let products = builder.products();
    let orders = builder.orders(i64::from(settings.window_days));
    let order_items = builder.order_items(&orders, &products);
    let sales = builder.sales(&order_items, &orders, &customers);
    let inventory = builder.inventory(&products);

    tracing::debug!(
        seed = settings.master_seed,
        anchor = %settings.anchor,
        order_items = order_items.len(),
        sales = sales.len(),
        "synthetic_rows_generated"
    );

    Ok(HashMap::from([
        ("customers".to_string(), customers),
        ("products".to_string(), products),
        ("orders".to_string(), orders),
        ("order_items".to_string(), order_items),
        ("sales".to_string(), sales),
        ("inventory".to_string(), inventory),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn settings() -> GeneratorSettings {
        GeneratorSettings {
            master_seed: 42,
            anchor: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            window_days: 365,
        }
    }

    fn ids(rows: &[Row]) -> HashSet<i64> {
        rows.iter().filter_map(|r| r.get_i64("id")).collect()
    }

    #[test]
    fn test_cardinalities() {
        let rows = generate(&settings()).unwrap();
        assert_eq!(rows["customers"].len(), 30);
        assert_eq!(rows["products"].len(), 20);
        assert_eq!(rows["orders"].len(), 80);
        assert!((80..=320).contains(&rows["order_items"].len()));
        assert_eq!(rows["sales"].len(), rows["order_items"].len().min(SALES_COUNT));
        assert_eq!(rows["inventory"].len(), 20);
    }

    #[test]
    fn test_same_seed_same_rows() {
        assert_eq!(generate(&settings()).unwrap(), generate(&settings()).unwrap());
    }

    #[test]
    fn test_different_seed_different_rows() {
        let other = GeneratorSettings {
            master_seed: 7,
            ..settings()
        };
        assert_ne!(
            generate(&settings()).unwrap()["orders"],
            generate(&other).unwrap()["orders"]
        );
    }

    #[test]
    fn test_foreign_keys_point_at_parents() {
        let rows = generate(&settings()).unwrap();
        let customers = ids(&rows["customers"]);
        let products = ids(&rows["products"]);
        let orders = ids(&rows["orders"]);

        for order in &rows["orders"] {
            assert!(customers.contains(&order.get_i64("customer_id").unwrap()));
        }
        for table in ["order_items", "sales"] {
            for row in &rows[table] {
                assert!(orders.contains(&row.get_i64("order_id").unwrap()));
                assert!(products.contains(&row.get_i64("product_id").unwrap()));
            }
        }
    }

    #[test]
    fn test_dates_within_window() {
        let s = settings();
        let rows = generate(&s).unwrap();
        for order in &rows["orders"] {
            let d = order.get_date("order_date").unwrap();
            assert!(d >= s.window_start() && d <= s.anchor);
        }
    }

    #[test]
    fn test_amount_is_price_times_quantity() {
        let rows = generate(&settings()).unwrap();
        for item in &rows["order_items"] {
            let expected =
                item.get_f64("unit_price").unwrap() * item.get_i64("quantity").unwrap() as f64;
            assert!((item.get_f64("amount").unwrap() - expected).abs() < 0.01);
        }
    }

    #[test]
    fn test_sales_take_customer_region() {
        let rows = generate(&settings()).unwrap();
        let sale = &rows["sales"][0];
        let order = rows["orders"]
            .iter()
            .find(|o| o.get_i64("id") == sale.get_i64("order_id"))
            .unwrap();
        let customer = rows["customers"]
            .iter()
            .find(|c| c.get_i64("id") == order.get_i64("customer_id"))
            .unwrap();
        assert_eq!(sale.get_str("region"), customer.get_str("region"));
        assert_eq!(sale.get_date("sale_date"), order.get_date("order_date"));
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let s = GeneratorSettings {
            window_days: 0,
            ..settings()
        };
        assert!(matches!(generate(&s), Err(GenerationError::InvalidWindow(_))));
    }

    #[test]
    fn test_window_past_earliest_date_is_rejected() {
        let s = GeneratorSettings {
            window_days: u32::MAX,
            ..settings()
        };
        assert!(matches!(generate(&s), Err(GenerationError::InvalidWindow(_))));
        assert_eq!(s.window_start(), NaiveDate::MIN);
    }

    #[test]
    fn test_anchor_near_earliest_date_is_rejected() {
        let s = GeneratorSettings {
            anchor: NaiveDate::MIN + Duration::days(10),
            ..settings()
        };
        assert!(matches!(generate(&s), Err(GenerationError::InvalidWindow(_))));
    }
}
