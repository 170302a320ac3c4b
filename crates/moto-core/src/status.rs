//! # Status Enumerations
//!
//! Every closed vocabulary in MotoMarket lives here, together with the
//! transitions it allows. One canonical set per entity.
//!
//! ## Availability State Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                         ┌─────────────┐                                 │
//! │          ┌─────────────►│  reserved   │──────────┐                      │
//! │          │              └──────┬──────┘          │                      │
//! │          │                     │ release         │ close                │
//! │          │                     ▼                 ▼                      │
//! │   ┌──────┴──────┐  sale   ┌─────────┐      ┌───────────┐               │
//! │   │  available  │────────►│  sold   │      │  rented   │               │
//! │   └──┬───▲───▲──┘         └────┬────┘      └─────┬─────┘               │
//! │      │   │   │   cancel        │                 │                      │
//! │      │   │   └─────────────────┘                 │                      │
//! │      │   └───────────────────────────────────────┘  rental / cancel     │
//! │      ▼   │                                                              │
//! │   ┌──────┴──────┐                                                       │
//! │   │ maintenance │                                                       │
//! │   └─────────────┘                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Builds the `NotAllowed` error for a failed enum parse.
fn not_allowed(field: &str, allowed: &[&str]) -> ValidationError {
    ValidationError::NotAllowed {
        field: field.to_string(),
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
    }
}

// =============================================================================
// Availability
// =============================================================================

/// Whether a listing can currently be bought or rented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Open for reservation.
    Available,
    /// Held by an administrator for a buyer.
    Reserved,
    /// Sale transaction recorded.
    Sold,
    /// Rental transaction recorded.
    Rented,
    /// Temporarily withdrawn.
    Maintenance,
}

impl Availability {
    pub const ALL: [Availability; 5] = [
        Availability::Available,
        Availability::Reserved,
        Availability::Sold,
        Availability::Rented,
        Availability::Maintenance,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Reserved => "reserved",
            Availability::Sold => "sold",
            Availability::Rented => "rented",
            Availability::Maintenance => "maintenance",
        }
    }

    /// Whether the state graph has an edge `self → next`.
    ///
    /// Self-loops are not transitions.
    pub const fn can_transition_to(&self, next: Availability) -> bool {
        use Availability::*;
        matches!(
            (*self, next),
            (Available, Reserved)
                | (Available, Sold)
                | (Available, Rented)
                | (Available, Maintenance)
                | (Reserved, Available)
                | (Sold, Available)
                | (Rented, Available)
                | (Maintenance, Available)
        )
    }

    /// Edges an administrator may apply by hand.
    ///
    /// `sold` and `rented` belong to the transaction workflow: only a
    /// reservation enters them and only a cancellation leaves them.
    pub const fn is_manual_transition(&self, next: Availability) -> bool {
        use Availability::*;
        self.can_transition_to(next)
            && !matches!(*self, Sold | Rented)
            && !matches!(next, Sold | Rented)
    }

    #[inline]
    pub const fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

impl Default for Availability {
    fn default() -> Self {
        Availability::Available
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Availability::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                not_allowed(
                    "availability",
                    &["available", "reserved", "sold", "rented", "maintenance"],
                )
            })
    }
}

// =============================================================================
// Moderation Status
// =============================================================================

/// Administrator review state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    /// Waiting for an administrator. New listings start here.
    Pending,
    /// Publicly listed.
    Approved,
    /// Hidden from the public catalogue.
    Rejected,
}

impl ModerationStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }

    /// Nothing moves back to `pending`; approved and rejected can swap.
    pub const fn can_transition_to(&self, next: ModerationStatus) -> bool {
        use ModerationStatus::*;
        matches!(
            (*self, next),
            (Pending, Approved) | (Pending, Rejected) | (Rejected, Approved) | (Approved, Rejected)
        )
    }
}

impl Default for ModerationStatus {
    fn default() -> Self {
        ModerationStatus::Pending
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Item Kind
// =============================================================================

/// Which listing collection an item belongs to.
///
/// On the wire this is the `itemTypeModel` discriminator and uses the
/// collection's model name (`"Motorcycle"`, `"Rental"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
pub enum ItemKind {
    Motorcycle,
    Rental,
}

impl ItemKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Motorcycle => "Motorcycle",
            ItemKind::Rental => "Rental",
        }
    }

    /// Table holding this kind of listing.
    pub const fn table(&self) -> &'static str {
        match self {
            ItemKind::Motorcycle => "motorcycles",
            ItemKind::Rental => "rentals",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Motorcycle" => Ok(ItemKind::Motorcycle),
            "Rental" => Ok(ItemKind::Rental),
            _ => Err(not_allowed("itemTypeModel", &["Motorcycle", "Rental"])),
        }
    }
}

// =============================================================================
// Transaction Type
// =============================================================================

/// Sale or rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Sale,
    Rental,
}

impl TransactionType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "sale",
            TransactionType::Rental => "rental",
        }
    }

    /// Availability an item takes once a transaction of this type is recorded.
    pub const fn target_availability(&self) -> Availability {
        match self {
            TransactionType::Sale => Availability::Sold,
            TransactionType::Rental => Availability::Rented,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(TransactionType::Sale),
            "rental" => Ok(TransactionType::Rental),
            _ => Err(not_allowed("transactionType", &["sale", "rental"])),
        }
    }
}

// =============================================================================
// Transaction Status
// =============================================================================

/// Lifecycle of a recorded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Recorded, awaiting an administrator.
    PendingValidation,
    /// Confirmed by an administrator.
    Validated,
    /// Voided; the item went back to `available`.
    Cancelled,
}

impl TransactionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::PendingValidation => "pending_validation",
            TransactionStatus::Validated => "validated",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    /// Only a pending transaction can be validated or cancelled.
    pub const fn can_transition_to(&self, next: TransactionStatus) -> bool {
        matches!(
            (*self, next),
            (TransactionStatus::PendingValidation, TransactionStatus::Validated)
                | (TransactionStatus::PendingValidation, TransactionStatus::Cancelled)
        )
    }
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::PendingValidation
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Role
// =============================================================================

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_available_can_be_sold_or_rented_directly() {
        for from in Availability::ALL {
            let allowed = from.can_transition_to(Availability::Sold);
            assert_eq!(
                allowed,
                matches!(from, Availability::Available),
                "unexpected edge {from} -> sold"
            );
        }
        assert!(!Availability::Reserved.can_transition_to(Availability::Rented));
        assert!(!Availability::Sold.can_transition_to(Availability::Rented));
        assert!(!Availability::Maintenance.can_transition_to(Availability::Sold));
    }

    #[test]
    fn test_no_self_loops() {
        for state in Availability::ALL {
            assert!(!state.can_transition_to(state));
        }
    }

    #[test]
    fn test_every_state_can_return_to_available() {
        for state in Availability::ALL {
            if state != Availability::Available {
                assert!(state.can_transition_to(Availability::Available));
            }
        }
    }

    #[test]
    fn test_manual_transitions_avoid_transaction_states() {
        use Availability::*;
        assert!(Available.is_manual_transition(Maintenance));
        assert!(Maintenance.is_manual_transition(Available));
        assert!(Available.is_manual_transition(Reserved));
        assert!(Reserved.is_manual_transition(Available));
        assert!(!Available.is_manual_transition(Sold));
        assert!(!Sold.is_manual_transition(Available));
        assert!(!Rented.is_manual_transition(Available));
        assert!(!Reserved.is_manual_transition(Rented));
    }

    #[test]
    fn test_transaction_type_targets() {
        assert_eq!(TransactionType::Sale.target_availability(), Availability::Sold);
        assert_eq!(TransactionType::Rental.target_availability(), Availability::Rented);
    }

    #[test]
    fn test_item_kind_wire_names() {
        assert_eq!(serde_json::to_string(&ItemKind::Motorcycle).unwrap(), "\"Motorcycle\"");
        assert_eq!("Rental".parse::<ItemKind>().unwrap(), ItemKind::Rental);
        assert!("rental".parse::<ItemKind>().is_err());
        assert_eq!(ItemKind::Rental.table(), "rentals");
    }

    #[test]
    fn test_transaction_status_default_and_wire() {
        assert_eq!(TransactionStatus::default(), TransactionStatus::PendingValidation);
        assert_eq!(
            serde_json::to_string(&TransactionStatus::PendingValidation).unwrap(),
            "\"pending_validation\""
        );
    }

    #[test]
    fn test_transaction_status_transitions() {
        use TransactionStatus::*;
        assert!(PendingValidation.can_transition_to(Validated));
        assert!(PendingValidation.can_transition_to(Cancelled));
        assert!(!Validated.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Validated));
    }

    #[test]
    fn test_moderation_transitions() {
        use ModerationStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Rejected.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Approved.can_transition_to(Approved));
    }

    #[test]
    fn test_availability_parse() {
        assert_eq!("maintenance".parse::<Availability>().unwrap(), Availability::Maintenance);
        let err = "Disponible".parse::<Availability>().unwrap_err();
        assert_eq!(err.field(), "availability");
    }
}
