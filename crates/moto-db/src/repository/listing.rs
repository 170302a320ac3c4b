//! # Listing Repository
//!
//! Motorcycles for sale and motorcycles for rent share one generic
//! repository. Operations that differ only by table (catalogue queries,
//! moderation, availability, deletion) are written once against
//! [`ListingTable`]; create and update are per kind because the columns
//! differ.
//!
//! ## Moderation and Availability
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create() ──► { status: pending, availability: available }             │
//! │                    │                                                    │
//! │     set_status()   │ pending ──► approved ──► visible in catalogue     │
//! │                    │         └─► rejected                              │
//! │                    │                                                    │
//! │  set_availability()│ available ◄──► maintenance / reserved             │
//! │                    │ (sold / rented only via the transaction workflow) │
//! │                                                                         │
//! │  Both setters are compare-and-swap on the value read:                  │
//! │    UPDATE ... SET x = next WHERE id = ? AND x = current                │
//! │  0 rows → CoreError::ConcurrentUpdate                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::marker::PhantomData;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use moto_core::{
    Availability, CoreError, Listing, ListingFilter, ModerationStatus, Motorcycle, MotorcycleInput,
    Rental, RentalInput, TransactionStatus,
};

use crate::error::DbResult;

// =============================================================================
// Table Mapping
// =============================================================================

/// Where a listing type lives in SQLite.
pub trait ListingTable:
    Listing + for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static
{
    /// Column holding the owning user's id.
    const OWNER_COLUMN: &'static str;
    /// Column the price filters apply to.
    const PRICE_COLUMN: &'static str;
    /// Full select list, in struct order.
    const COLUMNS: &'static str;
}

impl ListingTable for Motorcycle {
    const OWNER_COLUMN: &'static str = "seller_id";
    const PRICE_COLUMN: &'static str = "price";
    const COLUMNS: &'static str = "id, seller_id, name, brand, model, year, price, mileage_km, \
         description, image_url, availability, status, rating, review_count, \
         created_at, updated_at";
}

impl ListingTable for Rental {
    const OWNER_COLUMN: &'static str = "owner_id";
    const PRICE_COLUMN: &'static str = "price_per_day";
    const COLUMNS: &'static str = "id, owner_id, name, brand, model, year, price_per_day, \
         description, image_url, availability, status, rating, review_count, \
         created_at, updated_at";
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for one listing collection.
#[derive(Debug, Clone)]
pub struct ListingRepository<L> {
    pool: SqlitePool,
    _listing: PhantomData<fn() -> L>,
}

impl<L: ListingTable> ListingRepository<L> {
    pub fn new(pool: SqlitePool) -> Self {
        ListingRepository {
            pool,
            _listing: PhantomData,
        }
    }

    fn table() -> &'static str {
        L::KIND.table()
    }

    fn not_found(id: &str) -> CoreError {
        CoreError::ItemNotFound {
            kind: L::KIND,
            id: id.to_string(),
        }
    }

    /// Gets a listing by ID regardless of moderation status.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<L>> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?1", L::COLUMNS, Self::table());
        let listing = sqlx::query_as::<_, L>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(listing)
    }

    /// Like [`get_by_id`](Self::get_by_id) but absent is an error.
    pub async fn require(&self, id: &str) -> DbResult<L> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| Self::not_found(id).into())
    }

    /// Public catalogue: approved listings matching `filter`, newest first.
    pub async fn list_approved(&self, filter: &ListingFilter) -> DbResult<Vec<L>> {
        debug!(kind = %L::KIND, ?filter, "Listing catalogue");

        let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM {} WHERE status = ",
            L::COLUMNS,
            Self::table()
        ));
        query.push_bind(ModerationStatus::Approved);

        if let Some(availability) = filter.availability {
            query.push(" AND availability = ").push_bind(availability);
        }
        if let Some(brand) = filter.brand() {
            query
                .push(" AND instr(lower(brand), lower(")
                .push_bind(brand.to_string())
                .push(")) > 0");
        }
        if let Some(min) = filter.min_price {
            query
                .push(format!(" AND {} >= ", L::PRICE_COLUMN))
                .push_bind(min);
        }
        if let Some(max) = filter.max_price {
            query
                .push(format!(" AND {} <= ", L::PRICE_COLUMN))
                .push_bind(max);
        }

        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(i64::from(filter.limit()))
            .push(" OFFSET ")
            .push_bind(i64::from(filter.offset()));

        let listings = query.build_query_as::<L>().fetch_all(&self.pool).await?;
        Ok(listings)
    }

    /// Everything a user has listed, any status, newest first.
    pub async fn list_by_owner(&self, owner_id: &str) -> DbResult<Vec<L>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 ORDER BY created_at DESC",
            L::COLUMNS,
            Self::table(),
            L::OWNER_COLUMN
        );
        let listings = sqlx::query_as::<_, L>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(listings)
    }

    /// Moderation queue, oldest first.
    pub async fn list_pending(&self) -> DbResult<Vec<L>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE status = ?1 ORDER BY created_at ASC",
            L::COLUMNS,
            Self::table()
        );
        let listings = sqlx::query_as::<_, L>(&sql)
            .bind(ModerationStatus::Pending)
            .fetch_all(&self.pool)
            .await?;
        Ok(listings)
    }

    /// Applies a moderation transition.
    ///
    /// ## Errors
    /// * `ItemNotFound` - no such listing
    /// * `InvalidModerationTransition` - edge not in the moderation graph
    /// * `ConcurrentUpdate` - status changed between read and write
    pub async fn set_status(&self, id: &str, next: ModerationStatus) -> DbResult<L> {
        let current = self.require(id).await?.moderation_status();

        if !current.can_transition_to(next) {
            return Err(CoreError::InvalidModerationTransition {
                from: current,
                to: next,
            }
            .into());
        }

        debug!(kind = %L::KIND, id = %id, from = %current, to = %next, "Moderating listing");

        let sql = format!(
            "UPDATE {} SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
            Self::table()
        );
        let result = sqlx::query(&sql)
            .bind(next)
            .bind(Utc::now())
            .bind(id)
            .bind(current)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ConcurrentUpdate {
                kind: L::KIND,
                id: id.to_string(),
            }
            .into());
        }

        self.require(id).await
    }

    /// Applies a manual availability change (maintenance, holds).
    ///
    /// Transitions into or out of `sold`/`rented` are refused here; the
    /// transaction workflow owns them.
    pub async fn set_availability(&self, id: &str, next: Availability) -> DbResult<L> {
        let current = self.require(id).await?.availability();

        if !current.is_manual_transition(next) {
            return Err(CoreError::InvalidAvailabilityTransition {
                from: current,
                to: next,
            }
            .into());
        }

        debug!(kind = %L::KIND, id = %id, from = %current, to = %next, "Changing availability");

        let sql = format!(
            "UPDATE {} SET availability = ?1, updated_at = ?2 WHERE id = ?3 AND availability = ?4",
            Self::table()
        );
        let result = sqlx::query(&sql)
            .bind(next)
            .bind(Utc::now())
            .bind(id)
            .bind(current)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::ConcurrentUpdate {
                kind: L::KIND,
                id: id.to_string(),
            }
            .into());
        }

        self.require(id).await
    }

    /// Deletes a listing and its reviews.
    ///
    /// Refused while a transaction on the item awaits validation. The
    /// first statement is a write so the pending-transaction check runs
    /// under the write lock.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(kind = %L::KIND, id = %id, "Deleting listing");

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM reviews WHERE item_kind = ?1 AND item_id = ?2")
            .bind(L::KIND)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let open: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM transactions WHERE item_kind = ?1 AND item_id = ?2 AND status = ?3",
        )
        .bind(L::KIND)
        .bind(id)
        .bind(TransactionStatus::PendingValidation)
        .fetch_one(&mut *tx)
        .await?;

        if open > 0 {
            return Err(CoreError::HasOpenTransactions {
                kind: L::KIND,
                id: id.to_string(),
            }
            .into());
        }

        let sql = format!("DELETE FROM {} WHERE id = ?1", Self::table());
        let result = sqlx::query(&sql).bind(id).execute(&mut *tx).await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id).into());
        }

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Motorcycles
// =============================================================================

impl ListingRepository<Motorcycle> {
    /// Lists a motorcycle for sale. Starts `pending` and `available`.
    pub async fn create(&self, seller_id: &str, input: &MotorcycleInput) -> DbResult<Motorcycle> {
        let now = Utc::now();
        let moto = Motorcycle {
            id: Uuid::new_v4().to_string(),
            seller_id: seller_id.to_string(),
            name: input.name.trim().to_string(),
            brand: input.brand.trim().to_string(),
            model: input.model.trim().to_string(),
            year: input.year,
            price: input.price,
            mileage_km: input.mileage_km,
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            availability: Availability::Available,
            status: ModerationStatus::Pending,
            rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %moto.id, seller_id = %seller_id, "Creating motorcycle");

        sqlx::query(
            r#"
            INSERT INTO motorcycles (
                id, seller_id, name, brand, model, year, price, mileage_km,
                description, image_url, availability, status, rating, review_count,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&moto.id)
        .bind(&moto.seller_id)
        .bind(&moto.name)
        .bind(&moto.brand)
        .bind(&moto.model)
        .bind(moto.year)
        .bind(moto.price)
        .bind(moto.mileage_km)
        .bind(&moto.description)
        .bind(&moto.image_url)
        .bind(moto.availability)
        .bind(moto.status)
        .bind(moto.rating)
        .bind(moto.review_count)
        .bind(moto.created_at)
        .bind(moto.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(moto)
    }

    /// Replaces the descriptive fields. Availability, moderation and
    /// rating are untouched.
    pub async fn update(&self, id: &str, input: &MotorcycleInput) -> DbResult<Motorcycle> {
        debug!(id = %id, "Updating motorcycle");

        let result = sqlx::query(
            r#"
            UPDATE motorcycles SET
                name = ?1, brand = ?2, model = ?3, year = ?4, price = ?5,
                mileage_km = ?6, description = ?7, image_url = ?8, updated_at = ?9
            WHERE id = ?10
            "#,
        )
        .bind(input.name.trim())
        .bind(input.brand.trim())
        .bind(input.model.trim())
        .bind(input.year)
        .bind(input.price)
        .bind(input.mileage_km)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id).into());
        }

        self.require(id).await
    }
}

// =============================================================================
// Rentals
// =============================================================================

impl ListingRepository<Rental> {
    /// Offers a motorcycle for rent. Starts `pending` and `available`.
    pub async fn create(&self, owner_id: &str, input: &RentalInput) -> DbResult<Rental> {
        let now = Utc::now();
        let rental = Rental {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: input.name.trim().to_string(),
            brand: input.brand.trim().to_string(),
            model: input.model.trim().to_string(),
            year: input.year,
            price_per_day: input.price_per_day,
            description: input.description.clone(),
            image_url: input.image_url.clone(),
            availability: Availability::Available,
            status: ModerationStatus::Pending,
            rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %rental.id, owner_id = %owner_id, "Creating rental");

        sqlx::query(
            r#"
            INSERT INTO rentals (
                id, owner_id, name, brand, model, year, price_per_day,
                description, image_url, availability, status, rating, review_count,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&rental.id)
        .bind(&rental.owner_id)
        .bind(&rental.name)
        .bind(&rental.brand)
        .bind(&rental.model)
        .bind(rental.year)
        .bind(rental.price_per_day)
        .bind(&rental.description)
        .bind(&rental.image_url)
        .bind(rental.availability)
        .bind(rental.status)
        .bind(rental.rating)
        .bind(rental.review_count)
        .bind(rental.created_at)
        .bind(rental.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(rental)
    }

    pub async fn update(&self, id: &str, input: &RentalInput) -> DbResult<Rental> {
        debug!(id = %id, "Updating rental");

        let result = sqlx::query(
            r#"
            UPDATE rentals SET
                name = ?1, brand = ?2, model = ?3, year = ?4, price_per_day = ?5,
                description = ?6, image_url = ?7, updated_at = ?8
            WHERE id = ?9
            "#,
        )
        .bind(input.name.trim())
        .bind(input.brand.trim())
        .bind(input.model.trim())
        .bind(input.year)
        .bind(input.price_per_day)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id).into());
        }

        self.require(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::fixtures;
    use moto_core::{ItemKind, Money, ReviewInput};

    #[tokio::test]
    async fn test_new_listing_is_pending_and_available() {
        let db = fixtures::test_db().await;
        let seller = fixtures::user(&db, "seller@example.co").await;
        let moto = db
            .motorcycles()
            .create(&seller.id, &fixtures::moto_input("Yamaha", 8_500_000))
            .await
            .unwrap();

        assert_eq!(moto.status, ModerationStatus::Pending);
        assert_eq!(moto.availability, Availability::Available);

        let fetched = db.motorcycles().require(&moto.id).await.unwrap();
        assert_eq!(fetched.price, Money::from_pesos(8_500_000));
        assert_eq!(fetched.seller_id, seller.id);
    }

    #[tokio::test]
    async fn test_catalogue_shows_only_approved_and_filters() {
        let db = fixtures::test_db().await;
        let seller = fixtures::user(&db, "seller@example.co").await;
        let repo = db.motorcycles();

        let yamaha = fixtures::approved_motorcycle(&db, &seller.id, "Yamaha", 8_000_000).await;
        let honda = fixtures::approved_motorcycle(&db, &seller.id, "Honda", 5_000_000).await;
        repo.create(&seller.id, &fixtures::moto_input("Suzuki", 4_000_000))
            .await
            .unwrap();

        let all = repo.list_approved(&ListingFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let by_brand = repo
            .list_approved(&ListingFilter {
                brand: Some("yam".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_brand.len(), 1);
        assert_eq!(by_brand[0].id, yamaha.id);

        let cheap = repo
            .list_approved(&ListingFilter {
                max_price: Some(6_000_000),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(cheap.len(), 1);
        assert_eq!(cheap[0].id, honda.id);

        let pricey = repo
            .list_approved(&ListingFilter {
                min_price: Some(6_000_000),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(pricey.len(), 1);
        assert_eq!(pricey[0].id, yamaha.id);

        let band = repo
            .list_approved(&ListingFilter {
                min_price: Some(5_000_000),
                max_price: Some(5_000_000),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(band.len(), 1);
        assert_eq!(band[0].id, honda.id);

        repo.set_availability(&honda.id, Availability::Maintenance)
            .await
            .unwrap();
        let in_shop = repo
            .list_approved(&ListingFilter {
                availability: Some(Availability::Maintenance),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(in_shop.len(), 1);
        assert_eq!(in_shop[0].id, honda.id);

        let ready = repo
            .list_approved(&ListingFilter {
                availability: Some(Availability::Available),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].id, yamaha.id);

        let page = repo
            .list_approved(&ListingFilter {
                limit: Some(1),
                offset: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_moderation_transitions() {
        let db = fixtures::test_db().await;
        let owner = fixtures::user(&db, "owner@example.co").await;
        let rental = db
            .rentals()
            .create(&owner.id, &fixtures::rental_input(90_000))
            .await
            .unwrap();

        assert_eq!(db.rentals().list_pending().await.unwrap().len(), 1);

        let approved = db
            .rentals()
            .set_status(&rental.id, ModerationStatus::Approved)
            .await
            .unwrap();
        assert_eq!(approved.status, ModerationStatus::Approved);
        assert!(db.rentals().list_pending().await.unwrap().is_empty());

        let err = db
            .rentals()
            .set_status(&rental.id, ModerationStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidModerationTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_manual_availability() {
        let db = fixtures::test_db().await;
        let seller = fixtures::user(&db, "seller@example.co").await;
        let moto = fixtures::approved_motorcycle(&db, &seller.id, "KTM", 12_000_000).await;

        let repo = db.motorcycles();
        let moto = repo
            .set_availability(&moto.id, Availability::Maintenance)
            .await
            .unwrap();
        assert_eq!(moto.availability, Availability::Maintenance);

        let err = repo
            .set_availability(&moto.id, Availability::Sold)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Core(CoreError::InvalidAvailabilityTransition { .. })
        ));

        let err = repo
            .set_availability("missing", Availability::Available)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::ItemNotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_keeps_state() {
        let db = fixtures::test_db().await;
        let seller = fixtures::user(&db, "seller@example.co").await;
        let moto = fixtures::approved_motorcycle(&db, &seller.id, "Bajaj", 6_000_000).await;

        let mut input = fixtures::moto_input("Bajaj", 5_500_000);
        input.name = "Bajaj Pulsar NS200".to_string();
        let updated = db.motorcycles().update(&moto.id, &input).await.unwrap();

        assert_eq!(updated.name, "Bajaj Pulsar NS200");
        assert_eq!(updated.price.pesos(), 5_500_000);
        assert_eq!(updated.status, ModerationStatus::Approved);
    }

    #[tokio::test]
    async fn test_delete_listing() {
        let db = fixtures::test_db().await;
        let owner = fixtures::user(&db, "owner@example.co").await;
        let rental = db
            .rentals()
            .create(&owner.id, &fixtures::rental_input(80_000))
            .await
            .unwrap();

        db.rentals().delete(&rental.id).await.unwrap();
        assert!(db.rentals().get_by_id(&rental.id).await.unwrap().is_none());

        let err = db.rentals().delete(&rental.id).await.unwrap_err();
        assert!(matches!(err, DbError::Core(CoreError::ItemNotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_listing_removes_its_reviews() {
        let db = fixtures::test_db().await;
        let seller = fixtures::user(&db, "seller@example.co").await;
        let buyer = fixtures::user(&db, "buyer@example.co").await;
        let moto = fixtures::approved_motorcycle(&db, &seller.id, "Yamaha", 7_000_000).await;
        let other = fixtures::approved_motorcycle(&db, &seller.id, "Honda", 5_000_000).await;

        let review = ReviewInput {
            rating: 4,
            comment: None,
        };
        db.reviews()
            .add(ItemKind::Motorcycle, &moto.id, &buyer, &review)
            .await
            .unwrap();
        db.reviews()
            .add(ItemKind::Motorcycle, &other.id, &buyer, &review)
            .await
            .unwrap();

        db.motorcycles().delete(&moto.id).await.unwrap();

        let gone = db
            .reviews()
            .list_for_item(ItemKind::Motorcycle, &moto.id)
            .await
            .unwrap();
        assert!(gone.is_empty());

        let kept = db
            .reviews()
            .list_for_item(ItemKind::Motorcycle, &other.id)
            .await
            .unwrap();
        assert_eq!(kept.len(), 1);
    }

    #[tokio::test]
    async fn test_list_by_owner() {
        let db = fixtures::test_db().await;
        let a = fixtures::user(&db, "a@example.co").await;
        let b = fixtures::user(&db, "b@example.co").await;
        fixtures::approved_motorcycle(&db, &a.id, "Yamaha", 1).await;
        db.motorcycles()
            .create(&a.id, &fixtures::moto_input("Honda", 2))
            .await
            .unwrap();
        fixtures::approved_motorcycle(&db, &b.id, "AKT", 3).await;

        assert_eq!(db.motorcycles().list_by_owner(&a.id).await.unwrap().len(), 2);
        assert_eq!(db.motorcycles().list_by_owner(&b.id).await.unwrap().len(), 1);
    }
}
