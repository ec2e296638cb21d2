//! Basket accumulator
//!
//! A user's basket is their single ACTIVE order. Adding a product merges
//! into the existing line item for that product or creates a new one, and
//! the order's aggregate price is recomputed before commit, so it always
//! equals Σ(unit price × quantity) over the attached items.
//!
//! Every operation runs inside one transaction: the order, its items and
//! the aggregate either all change or none do. The partial unique index on
//! shop_order(user_id) WHERE status = 'ACTIVE' backstops the one-basket-
//! per-user invariant against concurrent creates.

use sqlx::{SqliteConnection, SqlitePool};

use crate::db::repository::{order, product, user};
use crate::services::{db_err, money};
use crate::utils::validation::validate_quantity;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::Order;

/// Add `quantity` of a product to the user's basket, creating the basket
/// if none exists. Returns the updated order.
pub async fn add_to_basket(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    quantity: i64,
) -> AppResult<Order> {
    validate_quantity(quantity)?;

    let mut tx = pool.begin().await.map_err(db_err)?;

    user::find_by_id(&mut *tx, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    product::find_by_id(&mut *tx, product_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    let mut basket = match order::find_active_by_user(&mut *tx, user_id).await? {
        Some(existing) => existing,
        None => order::create_active(&mut *tx, user_id).await?,
    };

    match order::find_item_by_order_and_product(&mut *tx, basket.id, product_id).await? {
        Some(item) => {
            order::update_item_quantity(&mut *tx, item.id, item.quantity + quantity).await?;
        }
        None => {
            order::insert_item(&mut *tx, basket.id, product_id, quantity).await?;
        }
    }

    basket.delivery_price = recompute_delivery_price(&mut tx, basket.id).await?;

    tx.commit().await.map_err(db_err)?;

    tracing::debug!(
        user_id,
        product_id,
        quantity,
        order_id = basket.id,
        total = basket.delivery_price,
        "added to basket"
    );

    Ok(basket)
}

/// Set an item's quantity directly. A target of zero or less removes the
/// item entirely; it is never persisted at quantity <= 0.
pub async fn modify_quantity(
    pool: &SqlitePool,
    order_item_id: i64,
    new_quantity: i64,
) -> AppResult<()> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let item = order::find_item(&mut *tx, order_item_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderItemNotFound))?;

    if new_quantity >= 1 {
        order::update_item_quantity(&mut *tx, item.id, new_quantity).await?;
    } else {
        remove_item(&mut tx, item.id).await?;
    }

    if let Some(order_id) = item.order_id {
        recompute_delivery_price(&mut tx, order_id).await?;
    }

    tx.commit().await.map_err(db_err)?;
    Ok(())
}

/// Decrease the quantity of a product in the user's basket; reaching zero
/// removes the line item.
pub async fn decrease_quantity(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    amount: i64,
) -> AppResult<()> {
    validate_quantity(amount)?;

    let mut tx = pool.begin().await.map_err(db_err)?;

    let basket = order::find_active_by_user(&mut *tx, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    let item = order::find_item_by_order_and_product(&mut *tx, basket.id, product_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderItemNotFound))?;

    let remaining = item.quantity - amount;
    if remaining >= 1 {
        order::update_item_quantity(&mut *tx, item.id, remaining).await?;
    } else {
        remove_item(&mut tx, item.id).await?;
    }

    recompute_delivery_price(&mut tx, basket.id).await?;

    tx.commit().await.map_err(db_err)?;
    Ok(())
}

/// Remove an order item outright and refresh the owning order's aggregate.
pub async fn remove_order_item(pool: &SqlitePool, order_item_id: i64) -> AppResult<()> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let item = order::find_item(&mut *tx, order_item_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderItemNotFound))?;

    remove_item(&mut tx, item.id).await?;

    if let Some(order_id) = item.order_id {
        recompute_delivery_price(&mut tx, order_id).await?;
    }

    tx.commit().await.map_err(db_err)?;
    Ok(())
}

/// Sever the order/product links first, then delete the orphaned row.
async fn remove_item(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    item_id: i64,
) -> AppResult<()> {
    order::detach_item(&mut **tx, item_id).await?;
    order::delete_item(&mut **tx, item_id).await?;
    Ok(())
}

/// Recompute Σ(unit price × quantity) over the order's items and store it.
async fn recompute_delivery_price(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    order_id: i64,
) -> AppResult<f64> {
    let conn: &mut SqliteConnection = &mut *tx;
    let rows = order::item_price_rows(&mut *conn, order_id).await?;
    let total = money::order_total(rows.iter().map(|r| (r.unit_price, r.quantity)));
    order::set_delivery_price(&mut *conn, order_id, total).await?;
    Ok(total)
}
