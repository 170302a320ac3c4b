//! # Repository Module
//!
//! Database repository implementations for MotoMarket.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  db.transactions().reserve(&user.id, &request)                 │
//! │       ▼                                                                 │
//! │  TransactionRepository                                                 │
//! │  ├── reserve(&self, user_id, request)     ← atomic CAS + insert        │
//! │  ├── get_by_id(&self, id)                                              │
//! │  └── update_status(&self, id, status)     ← cancel restores item       │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts and roles
//! - [`ListingRepository`](listing::ListingRepository) - Motorcycles and rentals
//! - [`TransactionRepository`](transaction::TransactionRepository) - Reservations
//! - [`ReviewRepository`](review::ReviewRepository) - Ratings and comments

pub mod listing;
pub mod review;
pub mod transaction;
pub mod user;
