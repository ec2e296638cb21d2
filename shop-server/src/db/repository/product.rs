//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{
    PageRequest, Product, ProductCreate, ProductImage, ProductUpdate, ProductWithCategory,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteExecutor, SqlitePool};

const PRODUCT_WITH_CATEGORY_SELECT: &str = "SELECT p.id, p.name, p.description, p.price, \
     p.units_in_stock, p.discount_percentage, p.category_id, c.name AS category_name, \
     p.created_at, p.updated_at \
     FROM product p LEFT JOIN category c ON p.category_id = c.id";

pub async fn find_all(pool: &SqlitePool, page: PageRequest) -> RepoResult<Vec<ProductWithCategory>> {
    let sql = format!(
        "{} ORDER BY p.name LIMIT ? OFFSET ?",
        PRODUCT_WITH_CATEGORY_SELECT
    );
    let rows = sqlx::query_as::<_, ProductWithCategory>(&sql)
        .bind(page.page_size())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn count_all(ex: impl SqliteExecutor<'_>) -> RepoResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM product")
        .fetch_one(ex)
        .await?;
    Ok(count)
}

pub async fn find_by_id(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, price, units_in_stock, discount_percentage, category_id, \
         created_at, updated_at FROM product WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;
    Ok(row)
}

pub async fn find_by_category(pool: &SqlitePool, category_id: i64) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, price, units_in_stock, discount_percentage, category_id, \
         created_at, updated_at FROM product WHERE category_id = ? ORDER BY name",
    )
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    let now = now_millis();
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO product (id, name, description, price, units_in_stock, \
         discount_percentage, category_id, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.units_in_stock.unwrap_or(0))
    .bind(data.discount_percentage.unwrap_or(0.0))
    .bind(data.category_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE product SET \
         name = COALESCE(?, name), \
         description = COALESCE(?, description), \
         price = COALESCE(?, price), \
         units_in_stock = COALESCE(?, units_in_stock), \
         discount_percentage = COALESCE(?, discount_percentage), \
         category_id = COALESCE(?, category_id), \
         updated_at = ? \
         WHERE id = ?",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.units_in_stock)
    .bind(data.discount_percentage)
    .bind(data.category_id)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Number of order items (any order, any status) referencing this product
pub async fn order_item_ref_count(ex: impl SqliteExecutor<'_>, product_id: i64) -> RepoResult<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_item WHERE product_id = ?")
        .bind(product_id)
        .fetch_one(ex)
        .await?;
    Ok(count)
}

/// Sever the category back-reference before deletion
pub async fn detach_from_category(ex: impl SqliteExecutor<'_>, product_id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE product SET category_id = NULL WHERE id = ?")
        .bind(product_id)
        .execute(ex)
        .await?;
    Ok(())
}

pub async fn delete(ex: impl SqliteExecutor<'_>, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}

// =============================================================================
// Product images (metadata only; bytes live with the external image store)
// =============================================================================

pub async fn insert_image(
    ex: impl SqliteExecutor<'_>,
    product_id: i64,
    file_name: &str,
    content_type: &str,
) -> RepoResult<i64> {
    let id = snowflake_id();
    sqlx::query(
        "INSERT INTO product_image (id, product_id, file_name, content_type, created_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(product_id)
    .bind(file_name)
    .bind(content_type)
    .bind(now_millis())
    .execute(ex)
    .await?;
    Ok(id)
}

pub async fn find_images(
    ex: impl SqliteExecutor<'_>,
    product_id: i64,
) -> RepoResult<Vec<ProductImage>> {
    let rows = sqlx::query_as::<_, ProductImage>(
        "SELECT id, product_id, file_name, content_type, created_at \
         FROM product_image WHERE product_id = ? ORDER BY created_at",
    )
    .bind(product_id)
    .fetch_all(ex)
    .await?;
    Ok(rows)
}

pub async fn delete_images(ex: impl SqliteExecutor<'_>, product_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM product_image WHERE product_id = ?")
        .bind(product_id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected())
}
