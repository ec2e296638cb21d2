//! Domain services
//!
//! The order/basket lifecycle engine and its collaborators:
//!
//! - [`basket`] - 购物篮累加器 (find-or-create ACTIVE order, merge items)
//! - [`order_status`] - 订单状态机 (role-gated forward progression)
//! - [`catalog`] - 商品删除守卫 (refuse while referenced, ordered cascade)
//! - [`favorites`] - 收藏夹 (idempotent add/remove)
//! - [`reporting`] - 查询/报表 (quantities, search, detail views)
//! - [`money`] - Decimal 金额计算

pub mod basket;
pub mod catalog;
pub mod favorites;
pub mod money;
pub mod order_status;
pub mod reporting;

use crate::utils::AppError;

/// Pool/transaction plumbing errors (begin/commit) surfaced as database errors
pub(crate) fn db_err(err: sqlx::Error) -> AppError {
    AppError::database(err.to_string())
}
