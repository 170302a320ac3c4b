//! # MotoMarket API
//!
//! REST server for buying, selling and renting motorcycles.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         API Server                                      │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  auth          │  │  listings      │  │  transactions              ││
//! │  │                │  │                │  │                            ││
//! │  │ • register     │  │ • catalogue    │  │ • reserve (atomic flip +   ││
//! │  │ • login        │  │ • CRUD         │  │   insert)                  ││
//! │  │ • me           │  │ • reviews      │  │ • mine / get               ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐                                │
//! │  │  admin         │  │  health        │                                │
//! │  │                │  │                │                                │
//! │  │ • moderation   │  │ • db ping      │                                │
//! │  │ • users, roles │  │                │                                │
//! │  │ • tx review    │  │                │                                │
//! │  └────────────────┘  └────────────────┘                                │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │  moto-db     │  │ JwtManager   │  │ AdminPolicy              ││  │
//! │  │  │  (SQLite)    │  │ (HS256)      │  │ (config allow-list)      ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`]. Environment variables use the `MOTO_` prefix:
//! - `MOTO_PORT` - HTTP port (default: 8080)
//! - `MOTO_DATABASE_PATH` - SQLite file (default: ./motomarket.db)
//! - `MOTO_JWT_SECRET` - Secret for JWT signing
//! - `MOTO_JWT_LIFETIME_SECS` - Token lifetime (default: 86400)
//! - `MOTO_ADMIN_EMAILS` - Comma separated admin allow-list

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

// Re-exports
pub use crate::config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

/// Complete application with request tracing.
///
/// CORS is added by the binary since it depends on deployment config.
pub fn app(state: AppState) -> Router {
    routes::api_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
