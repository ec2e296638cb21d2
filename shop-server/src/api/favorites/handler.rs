//! Favorites API Handlers
//!
//! The favorite set always belongs to the calling user; there is no
//! cross-user surface.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::favorites;
use crate::utils::{ok, ApiResponse, AppResult};
use shared::models::Product;

/// GET /api/favorites - 当前用户的收藏商品
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    let products = favorites::favorite_products(state.pool(), user.id).await?;
    Ok(ok(products))
}

/// PUT /api/favorites/{product_id} - 收藏商品 (幂等)
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    favorites::add_to_favorites(state.pool(), user.id, product_id).await?;
    Ok(ok(true))
}

/// DELETE /api/favorites/{product_id} - 取消收藏 (不存在时视为无操作)
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    favorites::remove_from_favorites(state.pool(), user.id, product_id).await?;
    Ok(ok(true))
}
