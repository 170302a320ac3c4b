//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Route Table                                    │
//! │                                                                         │
//! │  /health                                   GET    public               │
//! │                                                                         │
//! │  /api/auth/register | login                POST   public               │
//! │  /api/auth/me                              GET    user                 │
//! │                                                                         │
//! │  /api/{motorcycles|rentals}                GET    public (approved)    │
//! │                                            POST   user                 │
//! │  /api/{..}/mine                            GET    user                 │
//! │  /api/{..}/{id}                            GET    public               │
//! │                                            PUT    owner | admin        │
//! │                                            DELETE owner | admin        │
//! │  /api/{..}/{id}/reviews                    GET    public               │
//! │                                            POST   user                 │
//! │                                                                         │
//! │  /api/transactions                         POST   user  (reservation)  │
//! │  /api/transactions/mine                    GET    user                 │
//! │  /api/transactions/{id}                    GET    owner | admin        │
//! │                                                                         │
//! │  /api/admin/pending                        GET    admin                │
//! │  /api/admin/{..}/{id}/status               PATCH  admin                │
//! │  /api/admin/{..}/{id}/availability         PATCH  admin                │
//! │  /api/admin/users                          GET    admin                │
//! │  /api/admin/users/{id}/role                PATCH  admin                │
//! │  /api/admin/transactions                   GET    admin                │
//! │  /api/admin/transactions/{id}/status       PATCH  admin                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod admin;
pub mod auth;
pub mod health;
pub mod listings;
pub mod transactions;

use axum::routing::{get, patch, post, put};
use axum::Router;
use moto_core::{Motorcycle, Rental};

use crate::state::AppState;

/// All API routes, without middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .merge(listings::routes::<Motorcycle>(
            "/api/motorcycles",
            post(listings::create_motorcycle),
            put(listings::update_motorcycle),
        ))
        .merge(listings::routes::<Rental>(
            "/api/rentals",
            post(listings::create_rental),
            put(listings::update_rental),
        ))
        .route("/api/transactions", post(transactions::create))
        .route("/api/transactions/mine", get(transactions::mine))
        .route("/api/transactions/{id}", get(transactions::get))
        .route("/api/admin/pending", get(admin::pending))
        .route(
            "/api/admin/motorcycles/{id}/status",
            patch(admin::set_status::<Motorcycle>),
        )
        .route(
            "/api/admin/motorcycles/{id}/availability",
            patch(admin::set_availability::<Motorcycle>),
        )
        .route(
            "/api/admin/rentals/{id}/status",
            patch(admin::set_status::<Rental>),
        )
        .route(
            "/api/admin/rentals/{id}/availability",
            patch(admin::set_availability::<Rental>),
        )
        .route("/api/admin/users", get(admin::users))
        .route("/api/admin/users/{id}/role", patch(admin::set_role))
        .route("/api/admin/transactions", get(admin::transactions))
        .route(
            "/api/admin/transactions/{id}/status",
            patch(admin::set_transaction_status),
        )
}
