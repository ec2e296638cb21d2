//! Caller identity
//!
//! This backend never authenticates. Identity is resolved by the upstream
//! identity provider (reverse proxy / gateway) and arrives as trusted
//! `x-user-*` headers; the extractor turns them into a [`CurrentUser`]
//! that is passed explicitly into every service operation.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::core::ServerState;
use crate::utils::AppError;
use shared::models::UserRole;

/// Resolved caller identity
///
/// # 使用示例
///
/// ```ignore
/// async fn handler(user: CurrentUser) -> AppResult<Json<...>> {
///     if user.is_admin() {
///         // 管理员操作
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID
    pub id: i64,
    /// 用户名
    pub username: String,
    /// 角色
    pub role: UserRole,
}

impl CurrentUser {
    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Fail unless the caller is an admin
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::admin_required())
        }
    }
}

const HEADER_USER_ID: &str = "x-user-id";
const HEADER_USER_NAME: &str = "x-user-name";
const HEADER_USER_ROLE: &str = "x-user-role";

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Check if already extracted (from middleware)
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(str::to_string)
        };

        let id = header(HEADER_USER_ID)
            .and_then(|v| v.parse::<i64>().ok())
            .ok_or_else(AppError::not_authenticated)?;
        let username = header(HEADER_USER_NAME).ok_or_else(AppError::not_authenticated)?;
        let role = header(HEADER_USER_ROLE)
            .and_then(|v| UserRole::from_name(&v))
            .ok_or_else(AppError::not_authenticated)?;

        let user = CurrentUser { id, username, role };

        // Store in extensions for potential reuse
        parts.extensions.insert(user.clone());

        Ok(user)
    }
}
