//! # Transaction Repository
//!
//! The reservation workflow and the transaction lifecycle.
//!
//! ## Reservation (one database transaction)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  UPDATE <table> SET availability = 'sold' | 'rented'                    │
//! │   WHERE id = ? AND availability = 'available'    ← takes write lock    │
//! │    │                                                                    │
//! │    ├── 0 rows ─► SELECT availability  ─► absent  → ItemNotFound        │
//! │    │                                 └► present → ItemUnavailable      │
//! │    │             (dropped tx = ROLLBACK)                               │
//! │    ▼                                                                    │
//! │  SELECT name FROM <table>          (item_name snapshot)                 │
//! │  SELECT phone FROM users           (contact_phone snapshot)             │
//! │  INSERT INTO transactions (... 'pending_validation' ...)               │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  COMMIT  ── both writes persist, or neither does                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why the UPDATE goes first
//! SQLite admits one writer. A second reservation on the same item blocks
//! on its own UPDATE (up to `busy_timeout`) until the first commits, then
//! matches zero rows because the item is no longer `available`. The item
//! can never be double booked and there is no automatic retry.
//!
//! ## Lifecycle
//! ```text
//! pending_validation ──► validated
//!          │
//!          └──────────► cancelled  (item: sold/rented → available, same tx)
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use moto_core::reservation::check_available;
use moto_core::{
    Availability, CoreError, Transaction, TransactionStatus, TransactionType,
    ValidReservation,
};

use crate::error::{DbError, DbResult};

const COLUMNS: &str = "id, user_id, item_id, item_kind, item_name, transaction_type, \
     amount_paid, status, contact_phone, created_at, updated_at";

/// Repository for transaction database operations.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    /// Reserves an item for `user_id` and records the transaction.
    ///
    /// ## Errors
    /// * `CoreError::ItemNotFound` - no listing with that id in that collection
    /// * `CoreError::ItemUnavailable` - listing exists but is not `available`
    /// * `CoreError::UserNotFound` - the buyer's account vanished
    /// * anything from SQLite, after a full rollback
    pub async fn reserve(
        &self,
        user_id: &str,
        request: &ValidReservation,
    ) -> DbResult<Transaction> {
        let kind = request.item_kind;
        let table = kind.table();
        let target = request.target_availability();
        let now = Utc::now();

        debug!(
            user_id = %user_id,
            item_id = %request.item_id,
            kind = %kind,
            target = %target,
            "Reserving item"
        );

        let mut tx = self.pool.begin().await?;

        let flip = format!(
            "UPDATE {table} SET availability = ?1, updated_at = ?2 WHERE id = ?3 AND availability = ?4"
        );
        let flipped = sqlx::query(&flip)
            .bind(target)
            .bind(now)
            .bind(&request.item_id)
            .bind(Availability::Available)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if flipped == 0 {
            let current: Option<Availability> =
                sqlx::query_scalar(&format!("SELECT availability FROM {table} WHERE id = ?1"))
                    .bind(&request.item_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            let current = current.ok_or_else(|| CoreError::ItemNotFound {
                kind,
                id: request.item_id.clone(),
            })?;
            check_available(kind, &request.item_id, current)?;

            // Unreachable while this transaction holds the write lock.
            return Err(DbError::TransactionFailed(format!(
                "{kind} {} stayed available but could not be reserved",
                request.item_id
            )));
        }

        let item_name: String = sqlx::query_scalar(&format!("SELECT name FROM {table} WHERE id = ?1"))
            .bind(&request.item_id)
            .fetch_one(&mut *tx)
            .await?;

        let contact_phone: Option<String> =
            sqlx::query_scalar::<_, Option<String>>("SELECT phone FROM users WHERE id = ?1")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| CoreError::UserNotFound(user_id.to_string()))?;

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            item_id: request.item_id.clone(),
            item_kind: kind,
            item_name,
            transaction_type: request.transaction_type,
            amount_paid: request.amount_paid,
            status: TransactionStatus::PendingValidation,
            contact_phone,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, user_id, item_id, item_kind, item_name, transaction_type,
                amount_paid, status, contact_phone, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.user_id)
        .bind(&transaction.item_id)
        .bind(transaction.item_kind)
        .bind(&transaction.item_name)
        .bind(transaction.transaction_type)
        .bind(transaction.amount_paid)
        .bind(transaction.status)
        .bind(&transaction.contact_phone)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            id = %transaction.id,
            item_id = %transaction.item_id,
            kind = %kind,
            availability = %target,
            "Item reserved"
        );

        Ok(transaction)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Transaction>> {
        let sql = format!("SELECT {COLUMNS} FROM transactions WHERE id = ?1");
        let transaction = sqlx::query_as::<_, Transaction>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(transaction)
    }

    /// A user's transactions, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<Transaction>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM transactions WHERE user_id = ?1 ORDER BY created_at DESC"
        );
        let transactions = sqlx::query_as::<_, Transaction>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(transactions)
    }

    /// All transactions, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<Transaction>> {
        let sql = format!("SELECT {COLUMNS} FROM transactions ORDER BY created_at DESC");
        let transactions = sqlx::query_as::<_, Transaction>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(transactions)
    }

    /// Validates or cancels a pending transaction.
    ///
    /// Cancelling puts the item back to `available`, but only if it still
    /// holds the state this transaction gave it. Both writes share one
    /// database transaction.
    ///
    /// ## Errors
    /// * `CoreError::TransactionNotFound`
    /// * `CoreError::InvalidTransactionStatus` - not pending, or `next` is
    ///   not a valid target
    pub async fn update_status(&self, id: &str, next: TransactionStatus) -> DbResult<Transaction> {
        debug!(id = %id, next = %next, "Updating transaction status");

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let changed = if TransactionStatus::PendingValidation.can_transition_to(next) {
            sqlx::query(
                "UPDATE transactions SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
            )
            .bind(next)
            .bind(now)
            .bind(id)
            .bind(TransactionStatus::PendingValidation)
            .execute(&mut *tx)
            .await?
            .rows_affected()
        } else {
            0
        };

        if changed == 0 {
            let current: Option<TransactionStatus> =
                sqlx::query_scalar("SELECT status FROM transactions WHERE id = ?1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;

            return Err(match current {
                None => CoreError::TransactionNotFound(id.to_string()),
                Some(current) => CoreError::InvalidTransactionStatus {
                    id: id.to_string(),
                    current,
                    requested: next,
                },
            }
            .into());
        }

        let sql = format!("SELECT {COLUMNS} FROM transactions WHERE id = ?1");
        let transaction = sqlx::query_as::<_, Transaction>(&sql)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if next == TransactionStatus::Cancelled {
            let restored = release_item(&mut tx, &transaction).await?;
            debug!(id = %id, restored, "Cancelled transaction released its item");
        }

        tx.commit().await?;

        info!(id = %id, status = %next, "Transaction status updated");
        Ok(transaction)
    }

    #[cfg(any(test, feature = "test-utils"))]
    pub async fn count_for_item(&self, kind: moto_core::ItemKind, item_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE item_kind = ?1 AND item_id = ?2")
                .bind(kind)
                .bind(item_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

/// Returns the item to `available` if it still holds the state the
/// transaction set. `false` when the item was deleted or changed since.
async fn release_item(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    transaction: &Transaction,
) -> DbResult<bool> {
    let held: Availability = match transaction.transaction_type {
        TransactionType::Sale => Availability::Sold,
        TransactionType::Rental => Availability::Rented,
    };

    let sql = format!(
        "UPDATE {} SET availability = ?1, updated_at = ?2 WHERE id = ?3 AND availability = ?4",
        transaction.item_kind.table()
    );
    let result = sqlx::query(&sql)
        .bind(Availability::Available)
        .bind(Utc::now())
        .bind(&transaction.item_id)
        .bind(held)
        .execute(&mut **tx)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Unit Tests
// =============================================================================
