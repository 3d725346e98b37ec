/// Camila Product API - Product catalog service.
///
/// In-memory catalog with point lookup and weighted sort. The catalog is
/// immutable after startup; clones share the underlying product list.
use std::cmp::Ordering;
use std::io::BufReader;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::error::AppError;
use crate::models::product::{Product, seed_products};

/// Weights applied to a product's sales units and total stock when
/// computing its sort score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortWeights {
    pub sales_units: f64,
    pub stock: f64,
}

impl SortWeights {
    /// Weighted score of a product. Higher scores sort first.
    pub fn score(&self, product: &Product) -> f64 {
        product.sales_units as f64 * self.sales_units
            + product.total_stock() as f64 * self.stock
    }
}

/// Product catalog service.
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<Vec<Product>>,
}

impl CatalogService {
    /// Create a catalog over a fixed product list.
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(products),
        }
    }

    /// Create a catalog backed by the built-in seed data.
    pub fn with_seed_products() -> Self {
        Self::new(seed_products())
    }

    /// Create a catalog from configuration.
    ///
    /// Loads the JSON data file from `catalog.data_path` when configured,
    /// otherwise falls back to the built-in seed catalog.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        match config.catalog_data_path() {
            Some(path) => {
                let file = std::fs::File::open(&path).map_err(|e| {
                    AppError::Catalog(format!("failed to open {}: {}", path.display(), e))
                })?;
                let products: Vec<Product> = serde_json::from_reader(BufReader::new(file))
                    .map_err(|e| {
                        AppError::Catalog(format!("failed to parse {}: {}", path.display(), e))
                    })?;
                if products.is_empty() {
                    return Err(AppError::Catalog(format!(
                        "catalog data file is empty: {}",
                        path.display()
                    )));
                }
                info!(path = %path.display(), products = products.len(), "Catalog loaded from data file");
                Ok(Self::new(products))
            }
            None => Ok(Self::with_seed_products()),
        }
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Point lookup by internal id.
    pub fn find_by_internal_id(&self, internal_id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.internal_id == internal_id)
    }

    /// Rank the catalog by weighted score (descending) and return the
    /// requested page.
    ///
    /// Ties are broken by internal id (ascending) so the ordering is
    /// deterministic. A page past the end of the catalog is empty.
    pub fn sort_products(&self, weights: &SortWeights, page: usize, size: usize) -> Vec<Product> {
        let mut scored: Vec<(f64, &Product)> = self
            .products
            .iter()
            .map(|p| (weights.score(p), p))
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.internal_id.cmp(&b.1.internal_id))
        });

        scored
            .into_iter()
            .skip(page.saturating_mul(size))
            .take(size)
            .map(|(_, p)| p.clone())
            .collect()
    }
}
