//! # moto-db: Database Layer for MotoMarket
//!
//! Database access for the marketplace. SQLite storage with sqlx for
//! async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MotoMarket Data Flow                             │
//! │                                                                         │
//! │  axum handler (POST /api/transactions)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     moto-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │    Repositories    │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │    │                    │  │ (embedded) │  │   │
//! │  │   │               │    │ UserRepository     │  │            │  │   │
//! │  │   │ SqlitePool    │◄───│ ListingRepository  │  │ 001_init   │  │   │
//! │  │   │ WAL + FKs     │    │ TransactionRepo.   │  │            │  │   │
//! │  │   │ busy_timeout  │    │ ReviewRepository   │  │            │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (motomarket.db)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use moto_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("motomarket.db")).await?;
//!
//! let request = body.validate()?;
//! let tx = db.transactions().reserve(&user.id, &request).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

#[cfg(test)]
pub(crate) mod fixtures;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::listing::{ListingRepository, ListingTable};
pub use repository::review::ReviewRepository;
pub use repository::transaction::TransactionRepository;
pub use repository::user::{NewUser, UserRepository};
