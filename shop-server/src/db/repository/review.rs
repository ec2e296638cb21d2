//! Review Repository

use super::{RepoError, RepoResult};
use shared::models::{Review, ReviewCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Review>> {
    let row = sqlx::query_as::<_, Review>(
        "SELECT id, product_id, user_id, rating, comment, created_at FROM review WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_product(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<Review>> {
    let rows = sqlx::query_as::<_, Review>(
        "SELECT id, product_id, user_id, rating, comment, created_at \
         FROM review WHERE product_id = ? ORDER BY created_at DESC",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    product_id: i64,
    user_id: i64,
    data: ReviewCreate,
) -> RepoResult<Review> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO review (id, product_id, user_id, rating, comment, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(product_id)
    .bind(user_id)
    .bind(data.rating)
    .bind(&data.comment)
    .bind(now_millis())
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create review".into()))
}

/// Bulk-delete all reviews of a product (product deletion cascade)
pub async fn delete_by_product(ex: impl SqliteExecutor<'_>, product_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM review WHERE product_id = ?")
        .bind(product_id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected())
}
