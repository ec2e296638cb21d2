//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Unit price; non-negative, 2 decimal places
    pub price: f64,
    pub units_in_stock: i64,
    /// 0–100
    pub discount_percentage: f64,
    /// Owning category (nullable back-reference)
    pub category_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub units_in_stock: Option<i64>,
    pub discount_percentage: Option<f64>,
    pub category_id: Option<i64>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub units_in_stock: Option<i64>,
    pub discount_percentage: Option<f64>,
    pub category_id: Option<i64>,
}

/// Product with its category name resolved (for list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductWithCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub units_in_stock: i64,
    pub discount_percentage: f64,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Stored image metadata for a product
///
/// The bytes themselves live with the external image store; this backend
/// only tracks the reference so product deletion can cascade it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,
    pub file_name: String,
    pub content_type: String,
    pub created_at: i64,
}
