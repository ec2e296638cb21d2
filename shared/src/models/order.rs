//! Order Model
//!
//! An order doubles as the shopping basket while its status is ACTIVE.
//! Status progression is handled by the server's state machine; this module
//! only defines the states and the canonical forward sequence.

use serde::{Deserialize, Serialize};

/// Order status
///
/// Canonical forward sequence: ACTIVE → CHECKOUT → PLACED → SHIPPED →
/// DELIVERED. ACTIVE is the only initial state; DELIVERED is terminal.
/// CANCELLED exists on the wire but no transition currently reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    Active,
    Checkout,
    Placed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All states in canonical order (CANCELLED excluded — it sits outside
    /// the forward progression)
    pub const CANONICAL: [OrderStatus; 5] = [
        OrderStatus::Active,
        OrderStatus::Checkout,
        OrderStatus::Placed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Checkout => "CHECKOUT",
            Self::Placed => "PLACED",
            Self::Shipped => "SHIPPED",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Case-insensitive status name lookup
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "CHECKOUT" => Some(Self::Checkout),
            "PLACED" => Some(Self::Placed),
            "SHIPPED" => Some(Self::Shipped),
            "DELIVERED" => Some(Self::Delivered),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Position in the canonical forward sequence, None for CANCELLED
    pub fn progression_index(&self) -> Option<usize> {
        Self::CANONICAL.iter().position(|s| s == self)
    }

    /// DELIVERED accepts no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    /// Aggregate price: Σ(unit price × quantity) over attached items
    pub delivery_price: f64,
    pub start_date: i64,
    /// Null until the order reaches DELIVERED
    pub delivery_date: Option<i64>,
}

/// Order item entity
///
/// `order_id` is nullable: an item can momentarily sit unattached (e.g.
/// between detach and delete); converters must tolerate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: Option<i64>,
    pub product_id: i64,
    /// >= 1; an item reduced to 0 is deleted, never persisted at zero
    pub quantity: i64,
}

// =============================================================================
// API Request Types
// =============================================================================

/// Add item to basket payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToBasket {
    pub product_id: i64,
    pub quantity: i64,
}

/// Modify order item quantity payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModifyQuantity {
    pub quantity: i64,
}

/// Decrease quantity payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecreaseQuantity {
    pub amount: i64,
}

/// Update order status payload (name matched case-insensitively)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: String,
}

// =============================================================================
// API Response Types
// =============================================================================

/// Order item for detail view (product fields resolved)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemDetail {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
    pub line_total: f64,
}

/// Order row with the owning user's name (list/search views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub status: OrderStatus,
    pub delivery_price: f64,
    pub start_date: i64,
    pub delivery_date: Option<i64>,
}

/// Full order detail (for API clients)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub status: OrderStatus,
    pub delivery_price: f64,
    pub start_date: i64,
    pub delivery_date: Option<i64>,
    pub items: Vec<OrderItemDetail>,
}

/// One row of the product-quantity report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductQuantity {
    pub product_id: i64,
    pub total_quantity: i64,
}
