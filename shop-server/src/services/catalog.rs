//! Catalog deletion guard
//!
//! A product referenced by any order item — basket or historical — must not
//! be deleted; order history would silently corrupt. Deletion is refused
//! outright rather than cascaded into orders.
//!
//! When deletion is allowed, child rows go first (reviews, images,
//! favorite links), after severing the category back-reference, so the
//! final DELETE never trips a foreign key.

use sqlx::SqlitePool;

use crate::db::repository::{product, review, user};
use crate::services::db_err;
use crate::utils::{AppError, AppResult, ErrorCode};

pub async fn delete_product(pool: &SqlitePool, product_id: i64) -> AppResult<()> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    product::find_by_id(&mut *tx, product_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;

    let refs = product::order_item_ref_count(&mut *tx, product_id).await?;
    if refs > 0 {
        return Err(AppError::new(ErrorCode::ProductReferencedByOrders)
            .with_detail("order_item_count", refs));
    }

    product::detach_from_category(&mut *tx, product_id).await?;
    let reviews = review::delete_by_product(&mut *tx, product_id).await?;
    let images = product::delete_images(&mut *tx, product_id).await?;
    let favorites = user::remove_favorites_for_product(&mut *tx, product_id).await?;
    product::delete(&mut *tx, product_id).await?;

    tx.commit().await.map_err(db_err)?;

    tracing::info!(product_id, reviews, images, favorites, "product deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::{category, order};
    use crate::services::basket;
    use shared::models::{CategoryCreate, ProductCreate, ReviewCreate, UserCreate, UserRole};

    async fn seed(pool: &SqlitePool) -> (i64, i64, i64) {
        let cat = category::create(
            pool,
            CategoryCreate {
                name: "Kitchen".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
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
                category_id: Some(cat.id),
            },
        )
        .await
        .unwrap()
        .id;
        review::create(
            pool,
            pid,
            uid,
            ReviewCreate {
                rating: 5,
                comment: Some("solid".to_string()),
            },
        )
        .await
        .unwrap();
        product::insert_image(pool, pid, "mug.webp", "image/webp")
            .await
            .unwrap();
        user::add_favorite(pool, uid, pid).await.unwrap();
        (cat.id, uid, pid)
    }

    #[tokio::test]
    async fn referenced_product_cannot_be_deleted() {
        let db = DbService::new_in_memory().await.unwrap();
        let (cat_id, uid, pid) = seed(&db.pool).await;
        basket::add_to_basket(&db.pool, uid, pid, 1).await.unwrap();

        let err = delete_product(&db.pool, pid).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductReferencedByOrders);

        // No partial mutation: product, category link, reviews, images intact
        let still_there = product::find_by_id(&db.pool, pid).await.unwrap().unwrap();
        assert_eq!(still_there.category_id, Some(cat_id));
        assert_eq!(review::find_by_product(&db.pool, pid).await.unwrap().len(), 1);
        assert_eq!(product::find_images(&db.pool, pid).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn historical_references_also_block_deletion() {
        let db = DbService::new_in_memory().await.unwrap();
        let (_, uid, pid) = seed(&db.pool).await;
        let basket_order = basket::add_to_basket(&db.pool, uid, pid, 1).await.unwrap();

        // Move the order out of ACTIVE; the reference still counts
        order::set_status(
            &db.pool,
            basket_order.id,
            shared::models::OrderStatus::Placed,
            None,
        )
        .await
        .unwrap();

        let err = delete_product(&db.pool, pid).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductReferencedByOrders);
    }

    #[tokio::test]
    async fn unreferenced_product_cascades_cleanly() {
        let db = DbService::new_in_memory().await.unwrap();
        let (cat_id, uid, pid) = seed(&db.pool).await;

        delete_product(&db.pool, pid).await.unwrap();

        assert!(product::find_by_id(&db.pool, pid).await.unwrap().is_none());
        assert!(review::find_by_product(&db.pool, pid).await.unwrap().is_empty());
        assert!(product::find_images(&db.pool, pid).await.unwrap().is_empty());
        assert!(user::favorite_products(&db.pool, uid).await.unwrap().is_empty());
        // The category itself survives
        assert!(category::find_by_id(&db.pool, cat_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_product_reported_as_such() {
        let db = DbService::new_in_memory().await.unwrap();
        let err = delete_product(&db.pool, 31337).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }

    #[tokio::test]
    async fn deletable_again_after_items_removed() {
        let db = DbService::new_in_memory().await.unwrap();
        let (_, uid, pid) = seed(&db.pool).await;
        let basket_order = basket::add_to_basket(&db.pool, uid, pid, 2).await.unwrap();

        let items = order::items_for_order(&db.pool, basket_order.id).await.unwrap();
        basket::remove_order_item(&db.pool, items[0].id).await.unwrap();

        delete_product(&db.pool, pid).await.unwrap();
        assert!(product::find_by_id(&db.pool, pid).await.unwrap().is_none());
    }
}
