/// Camila Product API - Product model.
///
/// Products are serialized in camelCase to match the wire contract of the
/// original dataset.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A catalog product.
///
/// `stock` maps a size label ("S", "M", "L") to the number of units held.
/// A `BTreeMap` keeps serialization order deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub internal_id: i64,
    pub category: String,
    pub name: String,
    pub sales_units: i64,
    pub stock: BTreeMap<String, i64>,
}

impl Product {
    /// Total units across all sizes. Used as the stock term of the
    /// weighted sort score.
    pub fn total_stock(&self) -> i64 {
        self.stock.values().sum()
    }

    fn shirt(internal_id: i64, name: &str, sales_units: i64, sml: [i64; 3]) -> Self {
        Self {
            id: internal_id.to_string(),
            internal_id,
            category: "SHIRT".to_string(),
            name: name.to_string(),
            sales_units,
            stock: BTreeMap::from([
                ("S".to_string(), sml[0]),
                ("M".to_string(), sml[1]),
                ("L".to_string(), sml[2]),
            ]),
        }
    }
}

/// Built-in seed catalog.
///
/// This is the dataset the original service shipped with; it backs the
/// default in-memory store when no catalog data file is configured.
pub fn seed_products() -> Vec<Product> {
    vec![
        Product::shirt(1, "V-NECH BASIC SHIRT", 100, [4, 9, 0]),
        Product::shirt(2, "CONTRASTING FABRIC T-SHIRT", 50, [35, 9, 9]),
        Product::shirt(3, "RAISED PRINT T-SHIRT", 80, [20, 2, 20]),
        Product::shirt(4, "PLEATED T-SHIRT", 3, [25, 30, 10]),
        Product::shirt(5, "CONTRASTING LACE T-SHIRT", 650, [0, 1, 0]),
        Product::shirt(6, "SLEEVELESS SHIRT", 20, [9, 2, 5]),
    ]
}
