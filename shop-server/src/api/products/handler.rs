//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{category, product, review, user};
use crate::services::catalog;
use crate::utils::validation::{
    validate_product_create, validate_product_update, validate_review,
};
use crate::utils::{ok, ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{
    PageRequest, Paginated, Product, ProductCreate, ProductUpdate, ProductWithCategory, Review,
    ReviewCreate,
};

/// GET /api/products - 获取商品列表 (分页)
pub async fn list(
    State(state): State<ServerState>,
    Query(page): Query<PageRequest>,
) -> AppResult<Json<ApiResponse<Paginated<ProductWithCategory>>>> {
    let items = product::find_all(state.pool(), page).await?;
    let total = product::count_all(state.pool()).await?;
    Ok(ok(Paginated {
        items,
        page: page.page(),
        page_size: page.page_size(),
        total,
    }))
}

/// GET /api/products/{id} - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let found = product::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(ok(found))
}

/// POST /api/products - 创建商品 (仅管理员)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    user.require_admin()?;
    validate_product_create(&payload)?;

    if let Some(category_id) = payload.category_id {
        category::find_by_id(state.pool(), category_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    }

    let created = product::create(state.pool(), payload).await?;
    Ok(ok(created))
}

/// PUT /api/products/{id} - 更新商品 (仅管理员)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    user.require_admin()?;
    validate_product_update(&payload)?;

    product::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    if let Some(category_id) = payload.category_id {
        category::find_by_id(state.pool(), category_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    }

    let updated = product::update(state.pool(), id, payload).await?;
    Ok(ok(updated))
}

/// DELETE /api/products/{id} - 删除商品 (仅管理员)
///
/// 被订单引用的商品拒绝删除，详见 services::catalog
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    user.require_admin()?;
    catalog::delete_product(state.pool(), id).await?;
    Ok(ok(true))
}

// =============================================================================
// Reviews
// =============================================================================

/// GET /api/products/{id}/reviews - 获取商品评价
pub async fn list_reviews(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<Review>>>> {
    product::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    let reviews = review::find_by_product(state.pool(), id).await?;
    Ok(ok(reviews))
}

/// POST /api/products/{id}/reviews - 发表评价
pub async fn create_review(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<ApiResponse<Review>>> {
    validate_review(&payload)?;
    product::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    user::find_by_id(state.pool(), user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    let created = review::create(state.pool(), id, user.id, payload).await?;
    Ok(ok(created))
}
