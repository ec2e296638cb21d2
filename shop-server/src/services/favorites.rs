//! Favorites ledger
//!
//! A user-curated set of product bookmarks, independent of ordering. Both
//! operations are idempotent: re-adding a favorite changes nothing and
//! removing an absent one is a no-op, not an error.

use sqlx::SqlitePool;

use crate::db::repository::{product, user};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::Product;

pub async fn add_to_favorites(pool: &SqlitePool, user_id: i64, product_id: i64) -> AppResult<()> {
    user::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    product::find_by_id(pool, product_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    user::add_favorite(pool, user_id, product_id).await?;
    Ok(())
}

pub async fn remove_from_favorites(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
) -> AppResult<()> {
    // A missing row is fine; removal is idempotent by design
    user::remove_favorite(pool, user_id, product_id).await?;
    Ok(())
}

/// The caller's favorite products
pub async fn favorite_products(pool: &SqlitePool, user_id: i64) -> AppResult<Vec<Product>> {
    user::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(user::favorite_products(pool, user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::{ProductCreate, UserCreate, UserRole};

    async fn seed(pool: &SqlitePool) -> (i64, i64) {
        let uid = user::create(
            pool,
            UserCreate {
                username: "alice".to_string(),
                role: UserRole::User,
            },
        )
        .await
        .unwrap()
        .id;
        let pid = product::create(
            pool,
            ProductCreate {
                name: "Mug".to_string(),
                description: None,
                price: 10.0,
                units_in_stock: Some(5),
                discount_percentage: None,
                category_id: None,
            },
        )
        .await
        .unwrap()
        .id;
        (uid, pid)
    }

    #[tokio::test]
    async fn double_add_keeps_one_entry() {
        let db = DbService::new_in_memory().await.unwrap();
        let (uid, pid) = seed(&db.pool).await;

        add_to_favorites(&db.pool, uid, pid).await.unwrap();
        add_to_favorites(&db.pool, uid, pid).await.unwrap();

        let favs = favorite_products(&db.pool, uid).await.unwrap();
        assert_eq!(favs.len(), 1);
        assert_eq!(favs[0].id, pid);
    }

    #[tokio::test]
    async fn removing_absent_favorite_is_a_noop() {
        let db = DbService::new_in_memory().await.unwrap();
        let (uid, pid) = seed(&db.pool).await;

        remove_from_favorites(&db.pool, uid, pid).await.unwrap();

        add_to_favorites(&db.pool, uid, pid).await.unwrap();
        remove_from_favorites(&db.pool, uid, pid).await.unwrap();
        remove_from_favorites(&db.pool, uid, pid).await.unwrap();

        assert!(favorite_products(&db.pool, uid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_product_is_rejected_on_add() {
        let db = DbService::new_in_memory().await.unwrap();
        let (uid, _) = seed(&db.pool).await;

        let err = add_to_favorites(&db.pool, uid, 999).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }
}
