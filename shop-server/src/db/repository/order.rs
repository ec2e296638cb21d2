//! Order Repository
//!
//! Orders and their line items. The single-query functions take any
//! executor so the basket/status services can run them inside one
//! transaction; the list/report queries take the pool directly.

use super::RepoResult;
use shared::models::{Order, OrderItem, OrderStatus, OrderSummary, PageRequest, ProductQuantity};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteExecutor, SqlitePool};

const ORDER_SELECT: &str =
    "SELECT id, user_id, status, delivery_price, start_date, delivery_date FROM shop_order";

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{} WHERE id = ?", ORDER_SELECT);
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

/// The user's basket, if they have one
pub async fn find_active_by_user(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
) -> RepoResult<Option<Order>> {
    let sql = format!("{} WHERE user_id = ? AND status = 'ACTIVE'", ORDER_SELECT);
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("{} WHERE user_id = ? ORDER BY start_date DESC", ORDER_SELECT);
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_all(pool: &SqlitePool, page: PageRequest) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "{} ORDER BY start_date DESC LIMIT ? OFFSET ?",
        ORDER_SELECT
    );
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(page.page_size())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Create a fresh basket for the user.
///
/// The partial unique index on (user_id) WHERE status = 'ACTIVE' rejects a
/// second basket for the same user; callers treat that as a retry signal.
pub async fn create_active(ex: impl SqliteExecutor<'_>, user_id: i64) -> RepoResult<Order> {
    let id = snowflake_id();
    let start_date = now_millis();
    sqlx::query(
        "INSERT INTO shop_order (id, user_id, status, delivery_price, start_date, delivery_date) \
         VALUES (?, ?, 'ACTIVE', 0, ?, NULL)",
    )
    .bind(id)
    .bind(user_id)
    .bind(start_date)
    .execute(ex)
    .await?;
    Ok(Order {
        id,
        user_id,
        status: OrderStatus::Active,
        delivery_price: 0.0,
        start_date,
        delivery_date: None,
    })
}

pub async fn set_status(
    ex: impl SqliteExecutor<'_>,
    order_id: i64,
    status: OrderStatus,
    delivery_date: Option<i64>,
) -> RepoResult<()> {
    sqlx::query("UPDATE shop_order SET status = ?, delivery_date = ? WHERE id = ?")
        .bind(status)
        .bind(delivery_date)
        .bind(order_id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn set_delivery_price(
    ex: impl SqliteExecutor<'_>,
    order_id: i64,
    delivery_price: f64,
) -> RepoResult<()> {
    sqlx::query("UPDATE shop_order SET delivery_price = ? WHERE id = ?")
        .bind(delivery_price)
        .bind(order_id)
        .execute(ex)
        .await?;
    Ok(())
}

// =============================================================================
// Order items
// =============================================================================

const ITEM_SELECT: &str = "SELECT id, order_id, product_id, quantity FROM order_item";

pub async fn find_item(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<OrderItem>> {
    let sql = format!("{} WHERE id = ?", ITEM_SELECT);
    let row = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn find_item_by_order_and_product(
    ex: impl SqliteExecutor<'_>,
    order_id: i64,
    product_id: i64,
) -> RepoResult<Option<OrderItem>> {
    let sql = format!("{} WHERE order_id = ? AND product_id = ?", ITEM_SELECT);
    let row = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .bind(product_id)
        .fetch_optional(ex)
        .await?;
    Ok(row)
}

pub async fn items_for_order(
    ex: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Vec<OrderItem>> {
    let sql = format!("{} WHERE order_id = ? ORDER BY id", ITEM_SELECT);
    let rows = sqlx::query_as::<_, OrderItem>(&sql)
        .bind(order_id)
        .fetch_all(ex)
        .await?;
    Ok(rows)
}

pub async fn insert_item(
    ex: impl SqliteExecutor<'_>,
    order_id: i64,
    product_id: i64,
    quantity: i64,
) -> RepoResult<OrderItem> {
    let id = snowflake_id();
    sqlx::query("INSERT INTO order_item (id, order_id, product_id, quantity) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .execute(ex)
        .await?;
    Ok(OrderItem {
        id,
        order_id: Some(order_id),
        product_id,
        quantity,
    })
}

pub async fn update_item_quantity(
    ex: impl SqliteExecutor<'_>,
    item_id: i64,
    quantity: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE order_item SET quantity = ? WHERE id = ?")
        .bind(quantity)
        .bind(item_id)
        .execute(ex)
        .await?;
    Ok(())
}

/// Sever the order back-reference; the item sits unattached until deleted
pub async fn detach_item(ex: impl SqliteExecutor<'_>, item_id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE order_item SET order_id = NULL WHERE id = ?")
        .bind(item_id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn delete_item(ex: impl SqliteExecutor<'_>, item_id: i64) -> RepoResult<()> {
    sqlx::query("DELETE FROM order_item WHERE id = ?")
        .bind(item_id)
        .execute(ex)
        .await?;
    Ok(())
}

// =============================================================================
// Joined views
// =============================================================================

/// Raw item row with the product's current unit price (for the aggregate
/// recompute; monetary math happens in the service with Decimal)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemPriceRow {
    pub unit_price: f64,
    pub quantity: i64,
}

pub async fn item_price_rows(
    ex: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Vec<ItemPriceRow>> {
    let rows = sqlx::query_as::<_, ItemPriceRow>(
        "SELECT p.price AS unit_price, oi.quantity \
         FROM order_item oi JOIN product p ON oi.product_id = p.id \
         WHERE oi.order_id = ?",
    )
    .bind(order_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

/// Raw detail row; line_total is computed by the service
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ItemDetailRow {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: f64,
    pub quantity: i64,
}

pub async fn item_detail_rows(
    ex: impl SqliteExecutor<'_>,
    order_id: i64,
) -> RepoResult<Vec<ItemDetailRow>> {
    let rows = sqlx::query_as::<_, ItemDetailRow>(
        "SELECT oi.id, oi.product_id, p.name AS product_name, p.price AS unit_price, oi.quantity \
         FROM order_item oi JOIN product p ON oi.product_id = p.id \
         WHERE oi.order_id = ? ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn search_by_username(
    pool: &SqlitePool,
    username_query: &str,
    page: PageRequest,
) -> RepoResult<Vec<OrderSummary>> {
    let pattern = format!("%{username_query}%");
    let rows = sqlx::query_as::<_, OrderSummary>(
        "SELECT o.id, o.user_id, u.username, o.status, o.delivery_price, \
         o.start_date, o.delivery_date \
         FROM shop_order o JOIN app_user u ON o.user_id = u.id \
         WHERE u.username LIKE ? \
         ORDER BY o.start_date DESC LIMIT ? OFFSET ?",
    )
    .bind(&pattern)
    .bind(page.page_size())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Quantity of each product summed across ALL orders regardless of status.
/// Items sitting unattached (order_id IS NULL, mid-delete) do not count.
pub async fn product_quantities(pool: &SqlitePool) -> RepoResult<Vec<ProductQuantity>> {
    let rows = sqlx::query_as::<_, ProductQuantity>(
        "SELECT product_id, SUM(quantity) AS total_quantity \
         FROM order_item WHERE order_id IS NOT NULL \
         GROUP BY product_id ORDER BY total_quantity DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
