use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column names as they appear in the source header
// ---------------------------------------------------------------------------

pub mod columns {
    pub const ORDER_ID: &str = "Order ID";
    pub const ORDER_DATE: &str = "Order Date";
    pub const SHIP_DATE: &str = "Ship Date";
    pub const SHIP_MODE: &str = "Ship Mode";
    pub const CUSTOMER_ID: &str = "Customer ID";
    pub const CUSTOMER_NAME: &str = "Customer Name";
    pub const SEGMENT: &str = "Segment";
    pub const COUNTRY: &str = "Country";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const REGION: &str = "Region";
    pub const PRODUCT_ID: &str = "Product ID";
    pub const CATEGORY: &str = "Category";
    pub const SUB_CATEGORY: &str = "Sub-Category";
    pub const PRODUCT_NAME: &str = "Product Name";
    pub const SALES: &str = "Sales";
    pub const QUANTITY: &str = "Quantity";
    pub const DISCOUNT: &str = "Discount";
    pub const PROFIT: &str = "Profit";
}

/// The fixed schema, in canonical order.
pub const SCHEMA: [&str; 19] = [
    columns::ORDER_ID,
    columns::ORDER_DATE,
    columns::SHIP_DATE,
    columns::SHIP_MODE,
    columns::CUSTOMER_ID,
    columns::CUSTOMER_NAME,
    columns::SEGMENT,
    columns::COUNTRY,
    columns::CITY,
    columns::STATE,
    columns::REGION,
    columns::PRODUCT_ID,
    columns::CATEGORY,
    columns::SUB_CATEGORY,
    columns::PRODUCT_NAME,
    columns::SALES,
    columns::QUANTITY,
    columns::DISCOUNT,
    columns::PROFIT,
];

// ---------------------------------------------------------------------------
// RawSalesRecord – one row exactly as the source spells it
// ---------------------------------------------------------------------------

/// A source row before date parsing. Field names follow the header
/// (`"Order ID"`, `"Sub-Category"`, ...); unknown extra columns are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSalesRecord {
    #[serde(rename = "Order ID")]
    pub order_id: String,
    #[serde(rename = "Order Date")]
    pub order_date: String,
    #[serde(rename = "Ship Date")]
    pub ship_date: String,
    #[serde(rename = "Ship Mode")]
    pub ship_mode: String,
    #[serde(rename = "Customer ID")]
    pub customer_id: String,
    #[serde(rename = "Customer Name")]
    pub customer_name: String,
    #[serde(rename = "Segment")]
    pub segment: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Product ID")]
    pub product_id: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Sub-Category")]
    pub sub_category: String,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Sales")]
    pub sales: Option<f64>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<i64>,
    #[serde(rename = "Discount")]
    pub discount: Option<f64>,
    #[serde(rename = "Profit")]
    pub profit: Option<f64>,
}

impl RawSalesRecord {
    /// Attach parsed dates, producing the typed row.
    pub fn with_dates(self, order_date: NaiveDate, ship_date: NaiveDate) -> SalesRecord {
        SalesRecord {
            order_id: self.order_id,
            order_date,
            ship_date,
            ship_mode: self.ship_mode,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            segment: self.segment,
            country: self.country,
            city: self.city,
            state: self.state,
            region: self.region,
            product_id: self.product_id,
            category: self.category,
            sub_category: self.sub_category,
            product_name: self.product_name,
            sales: self.sales,
            quantity: self.quantity,
            discount: self.discount,
            profit: self.profit,
        }
    }
}

// ---------------------------------------------------------------------------
// SalesRecord – one transaction line item
// ---------------------------------------------------------------------------

/// A single sales line item with dates parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub ship_date: NaiveDate,
    pub ship_mode: String,
    pub customer_id: String,
    pub customer_name: String,
    pub segment: String,
    pub country: String,
    pub city: String,
    pub state: String,
    pub region: String,
    pub product_id: String,
    pub category: String,
    pub sub_category: String,
    pub product_name: String,
    /// Numeric cells are `None` when the source cell is empty or null;
    /// aggregations skip them.
    pub sales: Option<f64>,
    pub quantity: Option<i64>,
    pub discount: Option<f64>,
    /// May be negative.
    pub profit: Option<f64>,
}

impl SalesRecord {
    /// Look up a text column by its header name.
    pub fn text(&self, column: &str) -> Option<&str> {
        let value = match column {
            columns::ORDER_ID => &self.order_id,
            columns::SHIP_MODE => &self.ship_mode,
            columns::CUSTOMER_ID => &self.customer_id,
            columns::CUSTOMER_NAME => &self.customer_name,
            columns::SEGMENT => &self.segment,
            columns::COUNTRY => &self.country,
            columns::CITY => &self.city,
            columns::STATE => &self.state,
            columns::REGION => &self.region,
            columns::PRODUCT_ID => &self.product_id,
            columns::CATEGORY => &self.category,
            columns::SUB_CATEGORY => &self.sub_category,
            columns::PRODUCT_NAME => &self.product_name,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Whether the cell in `column` is missing: blank text or an absent
    /// number. Dates are always present once a row has loaded.
    pub fn is_missing(&self, column: &str) -> bool {
        match column {
            columns::SALES => self.sales.is_none(),
            columns::QUANTITY => self.quantity.is_none(),
            columns::DISCOUNT => self.discount.is_none(),
            columns::PROFIT => self.profit.is_none(),
            other => self.text(other).is_some_and(|v| v.trim().is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// SalesTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed table. Treated as immutable once built; derived views
/// (filters, period keys) never write back into it.
#[derive(Debug, Clone, Default)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
    /// Column names in source order, including columns outside the schema.
    column_names: Vec<String>,
    /// Missing-cell counts for every schema column.
    missing_values: BTreeMap<String, usize>,
}

impl SalesTable {
    /// Build a table whose source columns are exactly the schema.
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        let column_names = SCHEMA.iter().map(|c| c.to_string()).collect();
        Self::with_columns(records, column_names)
    }

    /// Build a table and its missing-value index.
    pub fn with_columns(records: Vec<SalesRecord>, column_names: Vec<String>) -> Self {
        let mut missing_values: BTreeMap<String, usize> =
            SCHEMA.iter().map(|c| (c.to_string(), 0)).collect();

        for record in &records {
            for (col, count) in missing_values.iter_mut() {
                if record.is_missing(col) {
                    *count += 1;
                }
            }
        }

        SalesTable {
            records,
            column_names,
            missing_values,
        }
    }

    /// A new table holding only the records at `indices`.
    pub fn select(&self, indices: &[usize]) -> Self {
        let records = indices
            .iter()
            .filter_map(|&i| self.records.get(i).cloned())
            .collect();
        Self::with_columns(records, self.column_names.clone())
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SalesRecord> {
        self.records.iter()
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn missing_values(&self) -> &BTreeMap<String, usize> {
        &self.missing_values
    }

    /// Sum of all missing text cells.
    pub fn total_missing(&self) -> usize {
        self.missing_values.values().sum()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a SalesTable {
    type Item = &'a SalesRecord;
    type IntoIter = std::slice::Iter<'a, SalesRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::record;
    use super::*;

    #[test]
    fn counts_empty_text_cells() {
        let mut blank_city = record("Technology", 10.0, 1.0);
        blank_city.city = "  ".into();
        let table = SalesTable::from_records(vec![record("Furniture", 5.0, 1.0), blank_city]);

        assert_eq!(table.missing_values()[columns::CITY], 1);
        assert_eq!(table.missing_values()[columns::CATEGORY], 0);
        assert_eq!(table.total_missing(), 1);
        assert_eq!(table.column_names().len(), SCHEMA.len());
    }

    #[test]
    fn counts_absent_numbers_per_column() {
        let mut no_discount = record("Technology", 10.0, 1.0);
        no_discount.discount = None;
        let mut no_sales = record("Furniture", 5.0, 1.0);
        no_sales.sales = None;
        no_sales.discount = None;
        let table = SalesTable::from_records(vec![no_discount, no_sales]);

        assert_eq!(table.missing_values()[columns::DISCOUNT], 2);
        assert_eq!(table.missing_values()[columns::SALES], 1);
        assert_eq!(table.missing_values()[columns::PROFIT], 0);
        assert_eq!(table.missing_values()[columns::ORDER_DATE], 0);
        assert_eq!(table.missing_values().len(), SCHEMA.len());
        assert_eq!(table.total_missing(), 3);
    }

    #[test]
    fn select_keeps_requested_rows() {
        let table = SalesTable::from_records(vec![
            record("A", 1.0, 0.0),
            record("B", 2.0, 0.0),
            record("C", 3.0, 0.0),
        ]);
        let subset = table.select(&[0, 2, 99]);
        let categories: Vec<&str> = subset.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, ["A", "C"]);
    }

    #[test]
    fn text_lookup_ignores_numeric_columns() {
        let row = record("Technology", 1.0, 0.0);
        assert_eq!(row.text(columns::SUB_CATEGORY), Some("Bookcases"));
        assert_eq!(row.text(columns::SALES), None);
        assert_eq!(row.text(columns::ORDER_DATE), None);
    }
}
