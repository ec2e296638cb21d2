//! Order status state machine
//!
//! Transitions follow the canonical forward sequence
//! ACTIVE → CHECKOUT → PLACED → SHIPPED → DELIVERED, gated by caller role:
//!
//! - ADMIN may move any order strictly forward along the sequence.
//! - A regular user may only move their own order from ACTIVE to CHECKOUT.
//!
//! An unknown status name is a different failure class
//! ([`ErrorCode::InvalidOrderStatus`]) than a known-but-not-permitted
//! transition ([`ErrorCode::OrderStatusTransitionDenied`]); callers need the
//! distinction to respond correctly.
//!
//! Updating the status performs no further side effects — no stock
//! decrement, no notifications. Reaching DELIVERED stamps delivery_date.

use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db::repository::order;
use crate::services::db_err;
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderStatus, UserRole};
use shared::util::now_millis;

/// Parse and apply a status change for the given caller.
pub async fn update_order_status(
    pool: &SqlitePool,
    caller: &CurrentUser,
    order_id: i64,
    status_name: &str,
) -> AppResult<Order> {
    let target = OrderStatus::from_name(status_name).ok_or_else(|| {
        AppError::new(ErrorCode::InvalidOrderStatus).with_detail("status", status_name)
    })?;

    let mut tx = pool.begin().await.map_err(db_err)?;

    let mut current = order::find_by_id(&mut *tx, order_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let is_owner = caller.id == current.user_id;
    check_transition(caller.role, is_owner, current.status, target)?;

    let delivery_date = if target == OrderStatus::Delivered {
        Some(now_millis())
    } else {
        current.delivery_date
    };

    order::set_status(&mut *tx, order_id, target, delivery_date).await?;
    tx.commit().await.map_err(db_err)?;

    tracing::info!(
        order_id,
        from = %current.status,
        to = %target,
        caller = caller.id,
        role = caller.role.as_str(),
        "order status updated"
    );

    current.status = target;
    current.delivery_date = delivery_date;
    Ok(current)
}

/// Pure transition check, separated from persistence for direct testing.
fn check_transition(
    role: UserRole,
    is_owner: bool,
    current: OrderStatus,
    target: OrderStatus,
) -> AppResult<()> {
    let denied = |reason: &str| {
        Err(AppError::new(ErrorCode::OrderStatusTransitionDenied)
            .with_detail("from", current.as_str())
            .with_detail("to", target.as_str())
            .with_detail("reason", reason))
    };

    match role {
        UserRole::Admin => {
            let (Some(from), Some(to)) = (current.progression_index(), target.progression_index())
            else {
                // CANCELLED sits outside the forward progression
                return denied("status outside the forward progression");
            };
            if current.is_terminal() {
                return denied("order already delivered");
            }
            if to <= from {
                return denied("only forward progression is allowed");
            }
            Ok(())
        }
        UserRole::User => {
            if !is_owner {
                return denied("not the order owner");
            }
            if current == OrderStatus::Active && target == OrderStatus::Checkout {
                Ok(())
            } else {
                denied("users may only move their basket to checkout")
            }
        }
    }
}
