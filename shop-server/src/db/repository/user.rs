//! User Repository
//!
//! Users plus the user-owned favorites relation.

use super::{RepoError, RepoResult};
use shared::models::{Product, User, UserCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>(
        "SELECT id, username, role, created_at FROM app_user WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_username(
    ex: impl SqliteExecutor<'_>,
    username: &str,
) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>(
        "SELECT id, username, role, created_at FROM app_user WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    let id = snowflake_id();
    sqlx::query("INSERT INTO app_user (id, username, role, created_at) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(&data.username)
        .bind(data.role)
        .bind(now_millis())
        .execute(pool)
        .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

// =============================================================================
// Favorites (owned from the user side)
// =============================================================================

/// Idempotent: adding an already-favorited product is a no-op
pub async fn add_favorite(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    product_id: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO favorite (user_id, product_id, created_at) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(now_millis())
    .execute(ex)
    .await?;
    Ok(())
}

/// Removing an absent favorite is a no-op; returns whether a row was removed
pub async fn remove_favorite(
    ex: impl SqliteExecutor<'_>,
    user_id: i64,
    product_id: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM favorite WHERE user_id = ? AND product_id = ?")
        .bind(user_id)
        .bind(product_id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn favorite_products(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(
        "SELECT p.id, p.name, p.description, p.price, p.units_in_stock, \
         p.discount_percentage, p.category_id, p.created_at, p.updated_at \
         FROM favorite f JOIN product p ON f.product_id = p.id \
         WHERE f.user_id = ? ORDER BY f.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Sever all favorite links to a product (product deletion cascade)
pub async fn remove_favorites_for_product(
    ex: impl SqliteExecutor<'_>,
    product_id: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM favorite WHERE product_id = ?")
        .bind(product_id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected())
}
