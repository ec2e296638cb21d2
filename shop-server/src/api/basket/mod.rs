//! Basket API 模块
//!
//! 购物篮即调用者的 ACTIVE 订单

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/basket", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_basket))
        .route("/items", post(handler::add_item))
        .route(
            "/items/{item_id}",
            put(handler::modify_item).delete(handler::remove_item),
        )
        .route("/items/{product_id}/decrease", post(handler::decrease_item))
}
