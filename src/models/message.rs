/// Camila Product API - WebSocket message types.
///
/// Requests are JSON text frames forming a tagged union discriminated by
/// the `method` field. All parameter values arrive as strings, exactly as
/// the original clients send them, and are parsed into typed commands
/// before dispatch.
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;
use crate::services::catalog::SortWeights;

/// Raw request frame, string-typed as on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "method")]
pub enum ProductRequest {
    /// Point lookup of a product by internal id.
    #[serde(rename = "FIND_BY_INTERNAL_ID", rename_all = "camelCase")]
    FindByInternalId { internal_id: String },

    /// Weighted sort of the catalog with pagination.
    #[serde(rename = "SORT_PRODUCTS", rename_all = "camelCase")]
    SortProducts {
        sales_units: String,
        stock: String,
        page: String,
        size: String,
    },
}

impl ProductRequest {
    /// Parse a raw text frame.
    ///
    /// Unknown methods and structurally invalid JSON both surface here as
    /// `AppError::InvalidRequest` with the serde reason.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        serde_json::from_str(text).map_err(|e| AppError::InvalidRequest(e.to_string()))
    }

    /// Convert the string-typed wire form into a typed command.
    pub fn into_command(self) -> Result<ProductCommand, AppError> {
        match self {
            Self::FindByInternalId { internal_id } => Ok(ProductCommand::FindByInternalId {
                internal_id: parse_field(&internal_id, "internalId", "an integer")?,
            }),
            Self::SortProducts {
                sales_units,
                stock,
                page,
                size,
            } => Ok(ProductCommand::SortProducts(SortQuery {
                weights: SortWeights {
                    sales_units: parse_field(&sales_units, "salesUnits", "a number")?,
                    stock: parse_field(&stock, "stock", "a number")?,
                },
                page: parse_field(&page, "page", "a non-negative integer")?,
                size: parse_field(&size, "size", "a non-negative integer")?,
            })),
        }
    }
}

/// A fully typed product operation, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductCommand {
    FindByInternalId { internal_id: i64 },
    SortProducts(SortQuery),
}

/// Typed parameters of a SORT_PRODUCTS request.
#[derive(Debug, Clone, PartialEq)]
pub struct SortQuery {
    pub weights: SortWeights,
    pub page: usize,
    pub size: usize,
}

fn parse_field<T: FromStr>(value: &str, field: &str, expected: &str) -> Result<T, AppError> {
    value.trim().parse().map_err(|_| {
        AppError::InvalidRequest(format!("{} must be {}, got {:?}", field, expected, value))
    })
}

/// Error frame sent back on the open socket for rejected requests.
#[derive(Debug, Serialize)]
pub struct ErrorFrame {
    pub error: String,
}

impl ErrorFrame {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Serialize to the wire form. Serialization of a plain string field
    /// cannot fail, but we still avoid unwrap.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string())
    }
}

impl From<&AppError> for ErrorFrame {
    fn from(err: &AppError) -> Self {
        Self::new(err.to_string())
    }
}
