//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::{ok, ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{User, UserCreate};

/// POST /api/users - 登记用户 (仅管理员；由身份系统同步调用)
pub async fn create(
    State(state): State<ServerState>,
    caller: CurrentUser,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<ApiResponse<User>>> {
    caller.require_admin()?;
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("username must not be blank"));
    }
    if user::find_by_username(state.pool(), &payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::new(ErrorCode::UsernameExists));
    }
    let created = user::create(state.pool(), payload).await?;
    Ok(ok(created))
}

/// GET /api/users/{id} - 查询用户 (仅管理员)
pub async fn get_by_id(
    State(state): State<ServerState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<User>>> {
    caller.require_admin()?;
    let found = user::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ok(found))
}
