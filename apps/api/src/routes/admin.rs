//! Moderation and back-office endpoints. Every handler requires an admin.

use axum::extract::{Path, State};
use axum::Json;
use moto_core::{
    Availability, Listing, ModerationStatus, Motorcycle, Rental, Role, Transaction,
    TransactionStatus, User,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::routes::listings::ListingRoutes;
use crate::state::AppState;

/// Listings waiting for moderation, oldest first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingListings {
    pub motorcycles: Vec<Motorcycle>,
    pub rentals: Vec<Rental>,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: ModerationStatus,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityBody {
    pub availability: Availability,
}

#[derive(Debug, Deserialize)]
pub struct RoleBody {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct TransactionStatusBody {
    pub status: TransactionStatus,
}

// =============================================================================
// Listings
// =============================================================================

pub async fn pending(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<PendingListings>, ApiError> {
    Ok(Json(PendingListings {
        motorcycles: state.db.motorcycles().list_pending().await?,
        rentals: state.db.rentals().list_pending().await?,
    }))
}

/// Approve or reject a listing.
pub async fn set_status<L: ListingRoutes>(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<L>, ApiError> {
    let listing = L::repo(&state.db).set_status(&id, body.status).await?;

    info!(kind = %L::KIND, id = %id, status = %body.status, admin_id = %admin.id, "Listing moderated");
    Ok(Json(listing))
}

/// Manual availability change, e.g. taking a bike into maintenance.
pub async fn set_availability<L: ListingRoutes>(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AvailabilityBody>,
) -> Result<Json<L>, ApiError> {
    let listing = L::repo(&state.db)
        .set_availability(&id, body.availability)
        .await?;

    info!(
        kind = %L::KIND,
        id = %id,
        availability = %listing.availability(),
        admin_id = %admin.id,
        "Availability changed"
    );
    Ok(Json(listing))
}

// =============================================================================
// Users
// =============================================================================

pub async fn users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.db.users().list().await?))
}

pub async fn set_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<RoleBody>,
) -> Result<Json<User>, ApiError> {
    let user = state.db.users().set_role(&id, body.role).await?;

    info!(user_id = %id, role = %body.role, admin_id = %admin.id, "Role changed");
    Ok(Json(user))
}

// =============================================================================
// Transactions
// =============================================================================

pub async fn transactions(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    Ok(Json(state.db.transactions().list_all().await?))
}

/// Validate or cancel a pending transaction.
pub async fn set_transaction_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<TransactionStatusBody>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = state.db.transactions().update_status(&id, body.status).await?;

    info!(id = %id, status = %body.status, admin_id = %admin.id, "Transaction reviewed");
    Ok(Json(transaction))
}
