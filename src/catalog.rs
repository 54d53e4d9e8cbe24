//! Laptop catalog loaded from the source CSV.
//!
//! The dataset is the single source of truth for both the vector index and
//! the deterministic fallback filter. A price that does not parse as a
//! finite, non-negative number is a fatal load error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("dataset not found: {0}. Please ensure the file exists.")]
    NotFound(PathBuf),
    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: non-numeric price {value:?}. Please ensure all prices are numeric (e.g. 50000.00).")]
    InvalidPrice { row: usize, value: String },
    #[error("row {row}: price {value} is out of range (must be finite and non-negative)")]
    PriceOutOfRange { row: usize, value: f64 },
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogRow {
    pub name: String,
    pub specification: String,
    pub price: f64,
}

impl CatalogRow {
    /// Canonical one-line rendering used for chunking and recommendations.
    pub fn format(&self) -> String {
        format!("{} | {} | ₹{:.2}", self.name, self.specification, self.price)
    }
}

/// CSV column subset the loader cares about; extra columns are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Product Name")]
    product_name: String,
    #[serde(rename = "Specification")]
    specification: String,
    #[serde(rename = "Price")]
    price: String,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    rows: Vec<CatalogRow>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }

        let mut reader = csv::Reader::from_path(path)?;
        let mut rows = Vec::new();

        for (idx, record) in reader.deserialize::<RawRecord>().enumerate() {
            // 1-based data row, accounting for the header line.
            let row = idx + 2;
            let record = record?;

            let raw_price = record.price.trim();
            let price: f64 = raw_price.parse().map_err(|_| CatalogError::InvalidPrice {
                row,
                value: raw_price.to_string(),
            })?;
            if !price.is_finite() || price < 0.0 {
                return Err(CatalogError::PriceOutOfRange { row, value: price });
            }

            rows.push(CatalogRow {
                name: record.product_name.trim().to_string(),
                specification: record.specification.trim().to_string(),
                price,
            });
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[cfg(test)]
    pub fn from_rows(rows: Vec<CatalogRow>) -> Self {
        Self { rows }
    }
}
