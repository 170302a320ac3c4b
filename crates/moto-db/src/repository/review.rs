//! # Review Repository
//!
//! One review per user per listing. Adding a review folds its rating into
//! the listing's running average in the same database transaction.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use moto_core::policy::running_average;
use moto_core::{CoreError, ItemKind, Motorcycle, Rental, Review, ReviewInput, User};

use crate::error::{DbError, DbResult};
use crate::repository::listing::ListingTable;

/// Repository for review database operations.
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    /// Adds `author`'s review of an item and updates its rating.
    ///
    /// The review insert runs first so the rating read below happens
    /// under the write lock.
    ///
    /// ## Errors
    /// * `CoreError::AlreadyReviewed` - author already reviewed this item
    /// * `CoreError::OwnListingReview` - author owns the listing
    /// * `CoreError::ItemNotFound` - no such listing
    pub async fn add(
        &self,
        kind: ItemKind,
        item_id: &str,
        author: &User,
        input: &ReviewInput,
    ) -> DbResult<Review> {
        let review = Review {
            id: Uuid::new_v4().to_string(),
            item_id: item_id.to_string(),
            item_kind: kind,
            user_id: author.id.clone(),
            user_name: author.name.clone(),
            rating: input.rating,
            comment: input
                .comment
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(kind = %kind, item_id = %item_id, user_id = %author.id, "Adding review");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO reviews (id, item_id, item_kind, user_id, user_name, rating, comment, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&review.id)
        .bind(&review.item_id)
        .bind(review.item_kind)
        .bind(&review.user_id)
        .bind(&review.user_name)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::Core(CoreError::AlreadyReviewed { kind }),
            other => other,
        })?;

        let table = kind.table();
        let owner_column = match kind {
            ItemKind::Motorcycle => Motorcycle::OWNER_COLUMN,
            ItemKind::Rental => Rental::OWNER_COLUMN,
        };
        let stats: Option<(f64, i64, String)> = sqlx::query_as(&format!(
            "SELECT rating, review_count, {owner_column} FROM {table} WHERE id = ?1"
        ))
        .bind(item_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (average, count, owner_id) = stats.ok_or_else(|| CoreError::ItemNotFound {
            kind,
            id: item_id.to_string(),
        })?;

        // Dropping `tx` rolls back the insert above.
        if owner_id == author.id {
            return Err(CoreError::OwnListingReview { kind }.into());
        }

        let new_average = running_average(average, count, review.rating);

        sqlx::query(&format!(
            "UPDATE {table} SET rating = ?1, review_count = ?2, updated_at = ?3 WHERE id = ?4"
        ))
        .bind(new_average)
        .bind(count + 1)
        .bind(Utc::now())
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(item_id = %item_id, rating = new_average, reviews = count + 1, "Rating updated");
        Ok(review)
    }

    /// Reviews of one item, newest first.
    pub async fn list_for_item(&self, kind: ItemKind, item_id: &str) -> DbResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, item_id, item_kind, user_id, user_name, rating, comment, created_at
            FROM reviews
            WHERE item_kind = ?1 AND item_id = ?2
            ORDER BY created_at DESC
            "#,
        )
        .bind(kind)
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn stars(rating: i64) -> ReviewInput {
        ReviewInput {
            rating,
            comment: Some("  Muy buena moto  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_reviews_update_running_average() {
        let db = fixtures::test_db().await;
        let seller = fixtures::user(&db, "seller@example.co").await;
        let a = fixtures::user(&db, "a@example.co").await;
        let b = fixtures::user(&db, "b@example.co").await;
        let moto = fixtures::approved_motorcycle(&db, &seller.id, "Yamaha", 1).await;

        let review = db
            .reviews()
            .add(ItemKind::Motorcycle, &moto.id, &a, &stars(4))
            .await
            .unwrap();
        assert_eq!(review.comment.as_deref(), Some("Muy buena moto"));
        assert_eq!(review.user_name, a.name);

        db.reviews()
            .add(ItemKind::Motorcycle, &moto.id, &b, &stars(2))
            .await
            .unwrap();

        let moto = db.motorcycles().require(&moto.id).await.unwrap();
        assert_eq!(moto.review_count, 2);
        assert!((moto.rating - 3.0).abs() < 1e-9);

        let reviews = db
            .reviews()
            .list_for_item(ItemKind::Motorcycle, &moto.id)
            .await
            .unwrap();
        assert_eq!(reviews.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_review_rejected_and_rating_untouched() {
        let db = fixtures::test_db().await;
        let owner = fixtures::user(&db, "owner@example.co").await;
        let a = fixtures::user(&db, "a@example.co").await;
        let rental = fixtures::approved_rental(&db, &owner.id, 90_000).await;

        db.reviews()
            .add(ItemKind::Rental, &rental.id, &a, &stars(5))
            .await
            .unwrap();
        let err = db
            .reviews()
            .add(ItemKind::Rental, &rental.id, &a, &stars(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::AlreadyReviewed { .. })));

        let rental = db.rentals().require(&rental.id).await.unwrap();
        assert_eq!(rental.review_count, 1);
        assert!((rental.rating - 5.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_owner_cannot_review_own_listing() {
        let db = fixtures::test_db().await;
        let seller = fixtures::user(&db, "seller@example.co").await;
        let owner = fixtures::user(&db, "owner@example.co").await;
        let moto = fixtures::approved_motorcycle(&db, &seller.id, "Honda", 1).await;
        let rental = fixtures::approved_rental(&db, &owner.id, 90_000).await;

        let err = db
            .reviews()
            .add(ItemKind::Motorcycle, &moto.id, &seller, &stars(5))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::OwnListingReview {
                kind: ItemKind::Motorcycle
            })
        ));

        let err = db
            .reviews()
            .add(ItemKind::Rental, &rental.id, &owner, &stars(5))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::OwnListingReview { .. })));

        let moto = db.motorcycles().require(&moto.id).await.unwrap();
        assert_eq!(moto.review_count, 0);
        assert!(db
            .reviews()
            .list_for_item(ItemKind::Motorcycle, &moto.id)
            .await
            .unwrap()
            .is_empty());

        // The seller may still review someone else's rental.
        db.reviews()
            .add(ItemKind::Rental, &rental.id, &seller, &stars(4))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_review_of_missing_item_leaves_nothing() {
        let db = fixtures::test_db().await;
        let a = fixtures::user(&db, "a@example.co").await;

        let err = db
            .reviews()
            .add(ItemKind::Motorcycle, "missing", &a, &stars(3))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::ItemNotFound { .. })));

        let reviews = db
            .reviews()
            .list_for_item(ItemKind::Motorcycle, "missing")
            .await
            .unwrap();
        assert!(reviews.is_empty());
    }
}
