//! # Domain Types
//!
//! Entities persisted by moto-db and served by moto-api.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Motorcycle    │   │     Rental      │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, seller_id  │   │  id, owner_id   │   │  id, email      │       │
//! │  │  price          │   │  price_per_day  │   │  phone, role    │       │
//! │  │  availability   │   │  availability   │   │  password_hash  │       │
//! │  │  status, rating │   │  status, rating │   └─────────────────┘       │
//! │  └────────┬────────┘   └────────┬────────┘                             │
//! │           │  item_kind + item_id │                                      │
//! │           └──────────┬───────────┘                                      │
//! │                      ▼                                                  │
//! │            ┌─────────────────┐          ┌─────────────────┐            │
//! │            │   Transaction   │          │     Review      │            │
//! │            │  ─────────────  │          │  ─────────────  │            │
//! │            │  item_name  (snapshot)     │  rating 1..=5   │            │
//! │            │  contact_phone (snapshot)  │  one per user   │            │
//! │            │  amount_paid, status       └─────────────────┘            │
//! │            └─────────────────┘                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All ids are UUID v4 strings. Wire names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::status::{Availability, ItemKind, ModerationStatus, Role, TransactionStatus, TransactionType};
use crate::validation;
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// User
// =============================================================================

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Normalized (trimmed, lower-cased).
    pub email: String,
    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip)]
    #[ts(skip)]
    pub password_hash: String,
    /// Contact number, copied into transactions.
    pub phone: Option<String>,
    pub role: Role,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Owners and administrators may modify a resource.
    pub fn can_manage(&self, owner_id: &str) -> bool {
        self.is_admin() || self.id == owner_id
    }
}

// =============================================================================
// Listings
// =============================================================================

/// Common view over both listing collections.
///
/// Lets handlers and the reservation workflow treat motorcycles and
/// rentals alike.
pub trait Listing {
    /// Collection this listing type lives in.
    const KIND: ItemKind;

    fn owner_id(&self) -> &str;
    fn availability(&self) -> Availability;
    fn moderation_status(&self) -> ModerationStatus;
}

/// A motorcycle listed for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Motorcycle {
    pub id: String,
    pub seller_id: String,
    /// Display name shown in the catalogue.
    pub name: String,
    pub brand: String,
    pub model: String,
    pub year: i64,
    /// Asking price in pesos.
    pub price: Money,
    pub mileage_km: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub availability: Availability,
    pub status: ModerationStatus,
    /// Running average of review ratings.
    pub rating: f64,
    pub review_count: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Listing for Motorcycle {
    const KIND: ItemKind = ItemKind::Motorcycle;

    fn owner_id(&self) -> &str {
        &self.seller_id
    }
    fn availability(&self) -> Availability {
        self.availability
    }
    fn moderation_status(&self) -> ModerationStatus {
        self.status
    }
}

/// A motorcycle offered for rent by the day.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub year: i64,
    /// Daily price in pesos.
    pub price_per_day: Money,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub availability: Availability,
    pub status: ModerationStatus,
    pub rating: f64,
    pub review_count: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Listing for Rental {
    const KIND: ItemKind = ItemKind::Rental;

    fn owner_id(&self) -> &str {
        &self.owner_id
    }
    fn availability(&self) -> Availability {
        self.availability
    }
    fn moderation_status(&self) -> ModerationStatus {
        self.status
    }
}

// =============================================================================
// Listing Inputs
// =============================================================================

/// Body of create/update requests for a motorcycle listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MotorcycleInput {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub price: Money,
    #[serde(default)]
    pub mileage_km: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl MotorcycleInput {
    /// Checks every field. `current_year` bounds the model year.
    pub fn validate(&self, current_year: i64) -> Result<(), ValidationError> {
        validation::validate_listing_name(&self.name)?;
        validation::validate_short_text("brand", &self.brand)?;
        validation::validate_short_text("model", &self.model)?;
        validation::validate_model_year(self.year, current_year)?;
        validation::validate_price("price", self.price)?;
        validation::validate_non_negative("mileageKm", self.mileage_km)?;
        validation::validate_description(self.description.as_deref())?;
        Ok(())
    }
}

/// Body of create/update requests for a rental listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RentalInput {
    pub name: String,
    pub brand: String,
    pub model: String,
    pub year: i64,
    pub price_per_day: Money,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl RentalInput {
    /// Checks every field. A rental must cost something per day.
    pub fn validate(&self, current_year: i64) -> Result<(), ValidationError> {
        validation::validate_listing_name(&self.name)?;
        validation::validate_short_text("brand", &self.brand)?;
        validation::validate_short_text("model", &self.model)?;
        validation::validate_model_year(self.year, current_year)?;
        if !self.price_per_day.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "pricePerDay".to_string(),
            });
        }
        validation::validate_description(self.description.as_deref())?;
        Ok(())
    }
}

/// Catalogue query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilter {
    pub availability: Option<Availability>,
    /// Case-insensitive substring match on brand.
    pub brand: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListingFilter {
    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    /// Trimmed brand filter, `None` when blank.
    pub fn brand(&self) -> Option<&str> {
        self.brand
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A recorded sale or rental against one listing.
///
/// Uses the snapshot pattern: the item's display name and the buyer's
/// phone are frozen at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub item_id: String,
    /// Discriminator naming the listing collection.
    #[serde(rename = "itemTypeModel")]
    pub item_kind: ItemKind,
    /// Item display name at time of reservation (frozen).
    pub item_name: String,
    pub transaction_type: TransactionType,
    pub amount_paid: Money,
    pub status: TransactionStatus,
    /// Buyer's phone at time of reservation (frozen).
    pub contact_phone: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Review
// =============================================================================

/// A user's rating of one listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub item_id: String,
    #[serde(rename = "itemTypeModel")]
    pub item_kind: ItemKind,
    pub user_id: String,
    /// Reviewer name (frozen).
    pub user_name: String,
    pub rating: i64,
    pub comment: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Body of a review submission.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub rating: i64,
    pub comment: Option<String>,
}

impl ReviewInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_rating(self.rating)?;
        validation::validate_comment(self.comment.as_deref())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn moto_input() -> MotorcycleInput {
        MotorcycleInput {
            name: "Yamaha FZ 2.0".to_string(),
            brand: "Yamaha".to_string(),
            model: "FZ".to_string(),
            year: 2021,
            price: Money::from_pesos(8_500_000),
            mileage_km: 12_000,
            description: None,
            image_url: None,
        }
    }

    #[test]
    fn test_motorcycle_input_validation() {
        assert!(moto_input().validate(2026).is_ok());

        let mut bad = moto_input();
        bad.year = 2030;
        assert!(bad.validate(2026).is_err());

        let mut bad = moto_input();
        bad.mileage_km = -1;
        assert_eq!(bad.validate(2026).unwrap_err().field(), "mileageKm");
    }

    #[test]
    fn test_rental_requires_positive_daily_price() {
        let input = RentalInput {
            name: "Honda XR150".to_string(),
            brand: "Honda".to_string(),
            model: "XR150L".to_string(),
            year: 2022,
            price_per_day: Money::zero(),
            description: None,
            image_url: None,
        };
        assert_eq!(input.validate(2026).unwrap_err().field(), "pricePerDay");
    }

    #[test]
    fn test_listing_filter_clamps_page() {
        let filter = ListingFilter {
            limit: Some(10_000),
            brand: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.limit(), MAX_PAGE_SIZE);
        assert_eq!(filter.brand(), None);
        assert_eq!(ListingFilter::default().limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let user = User {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.co".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            phone: Some("3001234567".to_string()),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"phone\""));
        assert!(user.can_manage("u1"));
        assert!(!user.can_manage("u2"));
    }

    #[test]
    fn test_transaction_wire_names() {
        let tx = Transaction {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            item_id: "m1".to_string(),
            item_kind: ItemKind::Motorcycle,
            item_name: "Yamaha FZ".to_string(),
            transaction_type: TransactionType::Sale,
            amount_paid: Money::from_pesos(100),
            status: TransactionStatus::PendingValidation,
            contact_phone: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["itemTypeModel"], "Motorcycle");
        assert_eq!(value["amountPaid"], 100);
        assert_eq!(value["transactionType"], "sale");
        assert_eq!(value["status"], "pending_validation");
    }
}
