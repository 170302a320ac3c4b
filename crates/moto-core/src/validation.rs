//! # Validation Module
//!
//! Field validators shared by the listing, review and account flows.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: SPA forms (TypeScript)                                       │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: axum handler (Rust)                                          │
//! │  ├── JSON deserialization                                              │
//! │  └── THIS MODULE: field rules                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── CHECK constraints on enum columns                                 │
//! │  └── UNIQUE (email), UNIQUE (item, user) on reviews                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes, so "Pereira Centro"
//! and "Bogotá" are measured the way a user would count them.

use crate::error::ValidationError;
use crate::money::Money;
use crate::MIN_MODEL_YEAR;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Shortest accepted password.
pub const MIN_PASSWORD_LEN: usize = 8;

const MAX_PASSWORD_LEN: usize = 128;
const MAX_LISTING_NAME_LEN: usize = 120;
const MAX_SHORT_TEXT_LEN: usize = 60;
const MAX_DESCRIPTION_LEN: usize = 2000;
const MAX_COMMENT_LEN: usize = 1000;
const MAX_PERSON_NAME_LEN: usize = 80;
const MAX_EMAIL_LEN: usize = 254;

/// Required, trimmed, at most `max` characters.
fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

fn optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Listing Validators
// =============================================================================

/// Validates a listing's display name (1..=120 characters).
///
/// ## Example
/// ```rust
/// use moto_core::validation::validate_listing_name;
///
/// assert!(validate_listing_name("Yamaha FZ 2.0 2021").is_ok());
/// assert!(validate_listing_name("  ").is_err());
/// ```
pub fn validate_listing_name(name: &str) -> ValidationResult<()> {
    required_text("name", name, MAX_LISTING_NAME_LEN)
}

/// Validates short required text such as brand or model.
pub fn validate_short_text(field: &str, value: &str) -> ValidationResult<()> {
    required_text(field, value, MAX_SHORT_TEXT_LEN)
}

/// Model year must fall in `MIN_MODEL_YEAR..=current_year + 1`.
pub fn validate_model_year(year: i64, current_year: i64) -> ValidationResult<()> {
    let max = current_year + 1;
    if !(MIN_MODEL_YEAR..=max).contains(&year) {
        return Err(ValidationError::OutOfRange {
            field: "year".to_string(),
            min: MIN_MODEL_YEAR,
            max,
        });
    }
    Ok(())
}

/// Prices may be zero (giveaways) but never negative.
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    validate_non_negative(field, price.pesos())
}

pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

pub fn validate_description(description: Option<&str>) -> ValidationResult<()> {
    optional_text("description", description, MAX_DESCRIPTION_LEN)
}

// =============================================================================
// Review Validators
// =============================================================================

/// Ratings are whole stars from 1 to 5.
pub fn validate_rating(rating: i64) -> ValidationResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1,
            max: 5,
        });
    }
    Ok(())
}

pub fn validate_comment(comment: Option<&str>) -> ValidationResult<()> {
    optional_text("comment", comment, MAX_COMMENT_LEN)
}

// =============================================================================
// Account Validators
// =============================================================================

/// Trimmed and lower-cased. Stored and compared in this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates an email address and returns its normalized form.
///
/// Deliberately loose: one `@`, a non-empty local part, a domain with a
/// dot, and no whitespace.
///
/// ## Example
/// ```rust
/// use moto_core::validation::validate_email;
///
/// assert_eq!(validate_email(" Ana@Example.CO ").unwrap(), "ana@example.co");
/// assert!(validate_email("ana@localhost").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = normalize_email(email);

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("missing @"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@domain"));
    }

    let domain_ok = domain
        .split('.')
        .all(|label| !label.is_empty())
        && domain.contains('.');
    if !domain_ok {
        return Err(invalid("domain must contain a dot"));
    }

    Ok(email)
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    let len = password.chars().count();

    if len < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    if len > MAX_PASSWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a contact phone and returns it without spaces or dashes.
///
/// ## Rules
/// - Optional leading `+`
/// - 7 to 15 digits after removing spaces and dashes
///
/// ## Example
/// ```rust
/// use moto_core::validation::validate_phone;
///
/// assert_eq!(validate_phone("+57 300-123-4567").unwrap(), "+573001234567");
/// assert!(validate_phone("12345").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let compact: String = phone
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    if compact.is_empty() {
        return Err(ValidationError::required("phone"));
    }

    let digits = compact.strip_prefix('+').unwrap_or(&compact);

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits and an optional leading +".to_string(),
        });
    }

    if !(7..=15).contains(&digits.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must have between 7 and 15 digits".to_string(),
        });
    }

    Ok(compact)
}

pub fn validate_person_name(name: &str) -> ValidationResult<()> {
    required_text("name", name, MAX_PERSON_NAME_LEN)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_name_limits() {
        assert!(validate_listing_name("Honda CB190R").is_ok());
        assert!(validate_listing_name("").is_err());
        assert!(validate_listing_name(&"x".repeat(121)).is_err());
        // 120 multi-byte characters are still 120 characters
        assert!(validate_listing_name(&"á".repeat(120)).is_ok());
    }

    #[test]
    fn test_model_year_bounds() {
        assert!(validate_model_year(1950, 2026).is_ok());
        assert!(validate_model_year(2027, 2026).is_ok());
        assert!(validate_model_year(1949, 2026).is_err());
        assert!(validate_model_year(2028, 2026).is_err());
    }

    #[test]
    fn test_price_non_negative() {
        assert!(validate_price("price", Money::zero()).is_ok());
        assert!(validate_price("price", Money::from_pesos(-1)).is_err());
    }

    #[test]
    fn test_rating_range() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_email_validation() {
        assert_eq!(validate_email("Juan@Moto.co").unwrap(), "juan@moto.co");
        assert!(matches!(
            validate_email("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_email("juan").is_err());
        assert!(validate_email("@moto.co").is_err());
        assert!(validate_email("juan@moto").is_err());
        assert!(validate_email("juan@@moto.co").is_err());
        assert!(validate_email("juan perez@moto.co").is_err());
        assert!(validate_email("juan@moto..co").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("12345678").is_ok());
        assert!(matches!(
            validate_password("1234567"),
            Err(ValidationError::TooShort { min: 8, .. })
        ));
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn test_phone_validation() {
        assert_eq!(validate_phone("3001234567").unwrap(), "3001234567");
        assert_eq!(validate_phone("+57 300 123 4567").unwrap(), "+573001234567");
        assert!(validate_phone("").is_err());
        assert!(validate_phone("123456").is_err());
        assert!(validate_phone("1234567890123456").is_err());
        assert!(validate_phone("300-ABC-4567").is_err());
        assert!(validate_phone("++573001234567").is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_description(None).is_ok());
        assert!(validate_description(Some(&"d".repeat(2000))).is_ok());
        assert!(validate_description(Some(&"d".repeat(2001))).is_err());
        assert!(validate_comment(Some(&"c".repeat(1001))).is_err());
    }
}
