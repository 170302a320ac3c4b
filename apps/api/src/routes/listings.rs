//! Listing endpoints, shared by motorcycles for sale and rentals.
//!
//! Every handler except create/update is generic over the listing type;
//! the two collections differ only in their input bodies.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, MethodRouter};
use axum::{Json, Router};
use chrono::{Datelike, Utc};
use moto_core::{
    Availability, CoreError, Listing, ListingFilter, Motorcycle, MotorcycleInput, Rental,
    RentalInput, Review, ReviewInput,
};
use moto_db::{Database, ListingRepository, ListingTable};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

/// A listing collection reachable over HTTP.
pub trait ListingRoutes: ListingTable + Serialize + Sync {
    fn repo(db: &Database) -> ListingRepository<Self>;
}

impl ListingRoutes for Motorcycle {
    fn repo(db: &Database) -> ListingRepository<Self> {
        db.motorcycles()
    }
}

impl ListingRoutes for Rental {
    fn repo(db: &Database) -> ListingRepository<Self> {
        db.rentals()
    }
}

/// Routes for one collection under `base`.
///
/// `create` and `update` are mounted on `base` and `base/{id}`.
pub fn routes<L: ListingRoutes>(
    base: &str,
    create: MethodRouter<AppState>,
    update: MethodRouter<AppState>,
) -> Router<AppState> {
    Router::new()
        .route(base, get(list::<L>).merge(create))
        .route(&format!("{base}/mine"), get(mine::<L>))
        .route(
            &format!("{base}/{{id}}"),
            get(get_one::<L>).delete(delete::<L>).merge(update),
        )
        .route(
            &format!("{base}/{{id}}/reviews"),
            get(list_reviews::<L>).post(add_review::<L>),
        )
}

/// Catalogue query string.
///
/// Price bounds are accepted as `minPrice`/`maxPrice` or
/// `min_price`/`max_price`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueQuery {
    pub availability: Option<Availability>,
    pub brand: Option<String>,
    #[serde(alias = "min_price")]
    pub min_price: Option<i64>,
    #[serde(alias = "max_price")]
    pub max_price: Option<i64>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl From<CatalogueQuery> for ListingFilter {
    fn from(query: CatalogueQuery) -> Self {
        ListingFilter {
            availability: query.availability,
            brand: query.brand,
            min_price: query.min_price,
            max_price: query.max_price,
            limit: query.limit,
            offset: query.offset,
        }
    }
}

fn current_year() -> i64 {
    i64::from(Utc::now().year())
}

/// Loads a listing and checks the caller may modify it.
async fn require_managed<L: ListingRoutes>(
    state: &AppState,
    user: &moto_core::User,
    id: &str,
) -> Result<L, ApiError> {
    let listing = L::repo(&state.db).require(id).await?;
    if !user.can_manage(listing.owner_id()) {
        let reason = format!("only the owner can modify this {}", L::KIND);
        return Err(CoreError::Forbidden(reason).into());
    }
    Ok(listing)
}

// =============================================================================
// Shared Handlers
// =============================================================================

/// Public catalogue of approved listings.
pub async fn list<L: ListingRoutes>(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CatalogueQuery>,
) -> Result<Json<Vec<L>>, ApiError> {
    let filter = ListingFilter::from(query);
    Ok(Json(L::repo(&state.db).list_approved(&filter).await?))
}

pub async fn get_one<L: ListingRoutes>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<L>, ApiError> {
    Ok(Json(L::repo(&state.db).require(&id).await?))
}

/// The caller's own listings in any moderation state.
pub async fn mine<L: ListingRoutes>(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<L>>, ApiError> {
    Ok(Json(L::repo(&state.db).list_by_owner(&user.id).await?))
}

pub async fn delete<L: ListingRoutes>(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_managed::<L>(&state, &user, &id).await?;
    L::repo(&state.db).delete(&id).await?;

    info!(kind = %L::KIND, id = %id, user_id = %user.id, "Listing deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_reviews<L: ListingRoutes>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    L::repo(&state.db).require(&id).await?;
    Ok(Json(state.db.reviews().list_for_item(L::KIND, &id).await?))
}

pub async fn add_review<L: ListingRoutes>(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<ReviewInput>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    input.validate()?;
    let review = state.db.reviews().add(L::KIND, &id, &user, &input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

// =============================================================================
// Motorcycles
// =============================================================================

pub async fn create_motorcycle(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(input): ApiJson<MotorcycleInput>,
) -> Result<(StatusCode, Json<Motorcycle>), ApiError> {
    input.validate(current_year())?;
    let moto = state.db.motorcycles().create(&user.id, &input).await?;

    info!(id = %moto.id, seller_id = %user.id, "Motorcycle submitted for review");
    Ok((StatusCode::CREATED, Json(moto)))
}

pub async fn update_motorcycle(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<MotorcycleInput>,
) -> Result<Json<Motorcycle>, ApiError> {
    require_managed::<Motorcycle>(&state, &user, &id).await?;
    input.validate(current_year())?;
    Ok(Json(state.db.motorcycles().update(&id, &input).await?))
}

// =============================================================================
// Rentals
// =============================================================================

pub async fn create_rental(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ApiJson(input): ApiJson<RentalInput>,
) -> Result<(StatusCode, Json<Rental>), ApiError> {
    input.validate(current_year())?;
    let rental = state.db.rentals().create(&user.id, &input).await?;

    info!(id = %rental.id, owner_id = %user.id, "Rental submitted for review");
    Ok((StatusCode::CREATED, Json(rental)))
}

pub async fn update_rental(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<RentalInput>,
) -> Result<Json<Rental>, ApiError> {
    require_managed::<Rental>(&state, &user, &id).await?;
    input.validate(current_year())?;
    Ok(Json(state.db.rentals().update(&id, &input).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;

    fn parse(uri: &str) -> ListingFilter {
        let uri: Uri = uri.parse().unwrap();
        let Query(query) = Query::<CatalogueQuery>::try_from_uri(&uri).unwrap();
        query.into()
    }

    #[test]
    fn test_price_bounds_accept_both_spellings() {
        let camel = parse("/api/motorcycles?minPrice=5000&maxPrice=9000");
        assert_eq!(camel.min_price, Some(5000));
        assert_eq!(camel.max_price, Some(9000));

        let snake = parse("/api/motorcycles?min_price=5000&max_price=9000");
        assert_eq!(snake.min_price, Some(5000));
        assert_eq!(snake.max_price, Some(9000));
    }

    #[test]
    fn test_catalogue_query_fields() {
        let filter = parse("/api/rentals?availability=maintenance&brand=%20Honda%20&limit=5");
        assert_eq!(filter.availability, Some(Availability::Maintenance));
        assert_eq!(filter.brand(), Some("Honda"));
        assert_eq!(filter.limit(), 5);
        assert_eq!(filter.offset(), 0);

        let empty = parse("/api/rentals");
        assert!(empty.availability.is_none());
        assert!(empty.min_price.is_none());
    }
}
