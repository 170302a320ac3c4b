//! # Reservation Rules
//!
//! The pure half of the reservation workflow: request validation and the
//! availability precondition. The database half (compare-and-swap on the
//! item row plus the transaction insert) lives in
//! `moto_db::repository::transaction`.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ReservationRequest (raw JSON, every field optional)                    │
//! │        │                                                                │
//! │        │ validate()         missing / unknown / non-positive → 400     │
//! │        ▼                                                                │
//! │  ValidReservation { item_id, item_kind, amount_paid, transaction_type } │
//! │        │                                                                │
//! │        │ BEGIN                                                          │
//! │        │ UPDATE item SET availability = target                          │
//! │        │   WHERE id = ? AND availability = 'available'                  │
//! │        │                                                                │
//! │        ├── 1 row  ──► INSERT transaction ──► COMMIT ──► 201             │
//! │        │                                                                │
//! │        └── 0 rows ──► check_available(current)                          │
//! │                          ├── item absent   → 404 ItemNotFound           │
//! │                          └── item present  → 409 ItemUnavailable        │
//! │                                               ROLLBACK                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::status::{Availability, ItemKind, TransactionType};

// =============================================================================
// Request
// =============================================================================

/// Body of `POST /api/transactions` as the client sent it.
///
/// Every field is optional so a missing or unknown value surfaces as a
/// field-level validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    pub item_id: Option<String>,
    pub item_type_model: Option<String>,
    pub amount_paid: Option<i64>,
    pub transaction_type: Option<String>,
}

/// A reservation request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidReservation {
    pub item_id: String,
    pub item_kind: ItemKind,
    pub amount_paid: Money,
    pub transaction_type: TransactionType,
}

impl ValidReservation {
    /// Availability the item takes when this reservation commits.
    #[inline]
    pub fn target_availability(&self) -> Availability {
        self.transaction_type.target_availability()
    }
}

impl ReservationRequest {
    /// Checks all four fields and converts them to domain types.
    ///
    /// ## Example
    /// ```rust
    /// use moto_core::{ItemKind, ReservationRequest, TransactionType};
    ///
    /// let req = ReservationRequest {
    ///     item_id: Some("moto-1".into()),
    ///     item_type_model: Some("Motorcycle".into()),
    ///     amount_paid: Some(100),
    ///     transaction_type: Some("sale".into()),
    /// };
    /// let valid = req.validate().unwrap();
    /// assert_eq!(valid.item_kind, ItemKind::Motorcycle);
    /// assert_eq!(valid.transaction_type, TransactionType::Sale);
    /// ```
    pub fn validate(&self) -> Result<ValidReservation, ValidationError> {
        let item_id = self
            .item_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ValidationError::required("itemId"))?;

        let item_kind: ItemKind = self
            .item_type_model
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ValidationError::required("itemTypeModel"))?
            .parse()?;

        let amount = self
            .amount_paid
            .ok_or_else(|| ValidationError::required("amountPaid"))?;
        if amount <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "amountPaid".to_string(),
            });
        }

        let transaction_type: TransactionType = self
            .transaction_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ValidationError::required("transactionType"))?
            .parse()?;

        Ok(ValidReservation {
            item_id: item_id.to_string(),
            item_kind,
            amount_paid: Money::from_pesos(amount),
            transaction_type,
        })
    }
}

// =============================================================================
// Precondition
// =============================================================================

/// Fails with [`CoreError::ItemUnavailable`] unless `current` is `available`.
pub fn check_available(kind: ItemKind, id: &str, current: Availability) -> CoreResult<()> {
    if current.is_available() {
        Ok(())
    } else {
        Err(CoreError::ItemUnavailable {
            kind,
            id: id.to_string(),
            current,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
