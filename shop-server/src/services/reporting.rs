//! Query/reporting surface
//!
//! Aggregate views composed from the order and catalog stores: order
//! detail assembly, per-user listings, the admin username search, and the
//! product-quantity report.

use sqlx::SqlitePool;

use crate::db::repository::{order, user};
use crate::services::money;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    Order, OrderDetail, OrderItemDetail, OrderSummary, PageRequest, ProductQuantity,
};

/// Assemble the full detail view of one order.
pub async fn order_detail(pool: &SqlitePool, order_id: i64) -> AppResult<OrderDetail> {
    let order_row = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    let owner = user::find_by_id(pool, order_row.user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let items = order::item_detail_rows(pool, order_id)
        .await?
        .into_iter()
        .map(|row| OrderItemDetail {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            unit_price: row.unit_price,
            quantity: row.quantity,
            line_total: money::to_f64(money::line_total(row.unit_price, row.quantity)),
        })
        .collect();

    Ok(OrderDetail {
        id: order_row.id,
        user_id: order_row.user_id,
        username: owner.username,
        status: order_row.status,
        delivery_price: order_row.delivery_price,
        start_date: order_row.start_date,
        delivery_date: order_row.delivery_date,
        items,
    })
}

/// The caller's basket as a detail view, if they have one.
pub async fn basket_detail(pool: &SqlitePool, user_id: i64) -> AppResult<Option<OrderDetail>> {
    match order::find_active_by_user(pool, user_id).await? {
        Some(basket) => Ok(Some(order_detail(pool, basket.id).await?)),
        None => Ok(None),
    }
}

/// All orders of one user, newest first.
pub async fn orders_for_user(pool: &SqlitePool, user_id: i64) -> AppResult<Vec<Order>> {
    Ok(order::find_by_user(pool, user_id).await?)
}

/// Paginated listing across all users (admin view).
pub async fn all_orders(pool: &SqlitePool, page: PageRequest) -> AppResult<Vec<Order>> {
    Ok(order::find_all(pool, page).await?)
}

/// Filter orders by (partial) owner username, newest first, paginated.
pub async fn search_orders_by_username(
    pool: &SqlitePool,
    username_query: &str,
    page: PageRequest,
) -> AppResult<Vec<OrderSummary>> {
    Ok(order::search_by_username(pool, username_query, page).await?)
}

/// Quantity of each product summed across all orders.
///
/// Status-blind: items still sitting in open baskets count alongside
/// placed and delivered orders. Pinned by a test; a status filter here
/// changes what the popularity report means.
pub async fn products_quantity(pool: &SqlitePool) -> AppResult<Vec<ProductQuantity>> {
    Ok(order::product_quantities(pool).await?)
}
