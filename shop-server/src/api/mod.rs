//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`categories`] - 分类管理接口
//! - [`products`] - 商品管理接口 (含评价)
//! - [`basket`] - 购物篮接口
//! - [`orders`] - 订单查询与状态接口
//! - [`favorites`] - 收藏夹接口
//! - [`users`] - 用户登记接口

pub mod basket;
pub mod categories;
pub mod favorites;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{ApiResponse, AppResult};

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(basket::router())
        .merge(orders::router())
        .merge(favorites::router())
        .merge(users::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
