//! # moto-core: Domain Logic for MotoMarket
//!
//! Types and business rules for a local marketplace where people buy,
//! sell and rent motorcycles. Everything here is pure: no database, no
//! network, no file system.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MotoMarket Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React SPA)                         │   │
//! │  │    Listings ──► Detail ──► Reserve ──► My Transactions         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    moto-api (axum)                              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ moto-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  status   │  │reservation│  │ validation│  │   │
//! │  │   │ Motorcycle│  │Availabil. │  │  request  │  │   rules   │  │   │
//! │  │   │ Rental    │  │Moderation │  │  checks   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    moto-db (Database Layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (User, Motorcycle, Rental, Transaction, Review)
//! - [`status`] - Closed enumerations and their allowed transitions
//! - [`money`] - Integer Colombian pesos
//! - [`reservation`] - Validation and state rules of the reservation workflow
//! - [`policy`] - Admin allow-list and rating math
//! - [`validation`] - Field validators
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use moto_core::{Availability, TransactionType};
//!
//! let target = TransactionType::Sale.target_availability();
//! assert_eq!(target, Availability::Sold);
//! assert!(Availability::Available.can_transition_to(target));
//! assert!(!Availability::Sold.can_transition_to(Availability::Rented));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod policy;
pub mod reservation;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use policy::AdminPolicy;
pub use reservation::{ReservationRequest, ValidReservation};
pub use status::*;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default page size for listing endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Oldest model year accepted for a listing.
pub const MIN_MODEL_YEAR: i64 = 1950;
