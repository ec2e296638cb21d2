//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::{order_status, reporting};
use crate::utils::{ok, ApiResponse, AppError, AppResult};
use shared::models::{
    Order, OrderDetail, OrderSummary, PageRequest, ProductQuantity, UpdateOrderStatus,
};

/// GET /api/orders - 订单列表 (普通用户仅见自己的订单)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(page): Query<PageRequest>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let orders = if user.is_admin() {
        reporting::all_orders(state.pool(), page).await?
    } else {
        reporting::orders_for_user(state.pool(), user.id).await?
    };
    Ok(ok(orders))
}

/// GET /api/orders/{id} - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let detail = reporting::order_detail(state.pool(), id).await?;
    if !user.is_admin() && detail.user_id != user.id {
        return Err(AppError::permission_denied("not your order"));
    }
    Ok(ok(detail))
}

/// PUT /api/orders/{id}/status - 更新订单状态
///
/// 状态名大小写不敏感；转移规则见 services::order_status
pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOrderStatus>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let updated = order_status::update_order_status(state.pool(), &user, id, &payload.status).await?;
    Ok(ok(updated))
}

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub username: String,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// GET /api/orders/search?username= - 按用户名检索订单 (仅管理员)
pub async fn search(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<Vec<OrderSummary>>>> {
    user.require_admin()?;
    let page = PageRequest {
        page: query.page,
        page_size: query.page_size,
    };
    let hits = reporting::search_orders_by_username(state.pool(), &query.username, page).await?;
    Ok(ok(hits))
}

/// GET /api/orders/reports/product-quantities - 商品销量汇总 (仅管理员)
pub async fn product_quantities(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<Vec<ProductQuantity>>>> {
    user.require_admin()?;
    let report = reporting::products_quantity(state.pool()).await?;
    Ok(ok(report))
}
