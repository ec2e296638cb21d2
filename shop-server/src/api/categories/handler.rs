//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{category, product};
use crate::utils::validation::{validate_category_create, validate_category_update};
use crate::utils::{ok, ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{Category, CategoryCreate, CategoryUpdate, Product};

/// GET /api/categories - 获取所有分类
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let categories = category::find_all(state.pool()).await?;
    Ok(ok(categories))
}

/// GET /api/categories/{id} - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let found = category::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    Ok(ok(found))
}

/// GET /api/categories/{id}/products - 按分类获取商品
pub async fn list_products(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<Product>>>> {
    category::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    let products = product::find_by_category(state.pool(), id).await?;
    Ok(ok(products))
}

/// POST /api/categories - 创建分类 (仅管理员)
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<ApiResponse<Category>>> {
    user.require_admin()?;
    validate_category_create(&payload)?;

    if category::find_by_name(state.pool(), &payload.name)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::CategoryNameExists));
    }

    let created = category::create(state.pool(), payload).await?;
    Ok(ok(created))
}

/// PUT /api/categories/{id} - 更新分类 (仅管理员)
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<ApiResponse<Category>>> {
    user.require_admin()?;
    validate_category_update(&payload)?;

    category::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;

    if let Some(name) = &payload.name
        && let Some(existing) = category::find_by_name(state.pool(), name).await?
        && existing.id != id
    {
        return Err(AppError::new(ErrorCode::CategoryNameExists));
    }

    let updated = category::update(state.pool(), id, payload).await?;
    Ok(ok(updated))
}

/// DELETE /api/categories/{id} - 删除分类 (仅管理员)
///
/// 分类下的商品保留，仅解除归属关系
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    user.require_admin()?;
    category::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    category::delete(state.pool(), id).await?;
    Ok(ok(true))
}
