//! Reservation endpoint and the buyer's view of their transactions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use moto_core::{CoreError, ReservationRequest, Transaction};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Reserves an item for the caller.
///
/// Validation runs before any database work. The availability flip and
/// the transaction insert then commit together or not at all.
///
/// ## Responses
/// * `201` - the created transaction, status `pending_validation`
/// * `400` - missing or malformed field
/// * `404` - no such item in that collection
/// * `409` - item is not `available`
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<ReservationRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let reservation = req.validate()?;

    let transaction = state.db.transactions().reserve(&user.id, &reservation).await?;

    info!(
        id = %transaction.id,
        user_id = %user.id,
        item_id = %transaction.item_id,
        kind = %transaction.item_kind,
        "Reservation created"
    );
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// The caller's transactions, newest first.
pub async fn mine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    Ok(Json(state.db.transactions().list_by_user(&user.id).await?))
}

/// One transaction. Visible to its buyer and to admins.
pub async fn get(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = state
        .db
        .transactions()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| CoreError::TransactionNotFound(id.clone()))?;

    if !user.can_manage(&transaction.user_id) {
        let reason = "this transaction belongs to another user".to_string();
        return Err(CoreError::Forbidden(reason).into());
    }

    Ok(Json(transaction))
}
