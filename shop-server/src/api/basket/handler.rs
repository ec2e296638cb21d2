//! Basket API Handlers
//!
//! All routes operate on the calling user's own basket. Item routes verify
//! ownership before touching the item — the services themselves take bare
//! ids, the boundary owns the access check.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::services::{basket, reporting};
use crate::utils::{ok, ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{AddToBasket, DecreaseQuantity, ModifyQuantity, Order, OrderDetail};

/// GET /api/basket - 当前用户的购物篮
pub async fn get_basket(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Option<OrderDetail>>>> {
    let detail = reporting::basket_detail(state.pool(), user.id).await?;
    Ok(ok(detail))
}

/// POST /api/basket/items - 加入购物篮
pub async fn add_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AddToBasket>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let updated =
        basket::add_to_basket(state.pool(), user.id, payload.product_id, payload.quantity).await?;
    Ok(ok(updated))
}

/// PUT /api/basket/items/{item_id} - 修改数量 (0 即删除)
pub async fn modify_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(item_id): Path<i64>,
    Json(payload): Json<ModifyQuantity>,
) -> AppResult<Json<ApiResponse<bool>>> {
    check_item_ownership(&state, &user, item_id).await?;
    basket::modify_quantity(state.pool(), item_id, payload.quantity).await?;
    Ok(ok(true))
}

/// DELETE /api/basket/items/{item_id} - 移除条目
pub async fn remove_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(item_id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    check_item_ownership(&state, &user, item_id).await?;
    basket::remove_order_item(state.pool(), item_id).await?;
    Ok(ok(true))
}

/// POST /api/basket/items/{product_id}/decrease - 减少数量
pub async fn decrease_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<i64>,
    Json(payload): Json<DecreaseQuantity>,
) -> AppResult<Json<ApiResponse<bool>>> {
    basket::decrease_quantity(state.pool(), user.id, product_id, payload.amount).await?;
    Ok(ok(true))
}

/// Only the owner (or an admin) may touch an order item
async fn check_item_ownership(
    state: &ServerState,
    user: &CurrentUser,
    item_id: i64,
) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }
    let item = order::find_item(state.pool(), item_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderItemNotFound))?;
    if let Some(order_id) = item.order_id {
        let owner = order::find_by_id(state.pool(), order_id)
            .await?
            .map(|o| o.user_id);
        if owner != Some(user.id) {
            return Err(AppError::permission_denied("not your order item"));
        }
    }
    Ok(())
}
