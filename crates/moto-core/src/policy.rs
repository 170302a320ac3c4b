//! # Policies
//!
//! Configuration-driven rules that are not tied to a single entity:
//! the administrator allow-list and review rating math.

use std::collections::HashSet;

use crate::status::Role;
use crate::validation::normalize_email;

// =============================================================================
// Admin Policy
// =============================================================================

/// Emails whose accounts are promoted to [`Role::Admin`] on login.
///
/// Built from configuration (`MOTO_ADMIN_EMAILS`). Comparison uses the
/// normalized form, so `" Admin@Example.CO "` matches `admin@example.co`.
#[derive(Debug, Clone, Default)]
pub struct AdminPolicy {
    emails: HashSet<String>,
}

impl AdminPolicy {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| normalize_email(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        AdminPolicy { emails }
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.emails.contains(&normalize_email(email))
    }

    /// Role a user with `email` should hold after logging in.
    ///
    /// Never demotes: an existing admin stays admin even if removed from
    /// the list.
    pub fn resolve_role(&self, email: &str, current: Role) -> Role {
        if current.is_admin() || self.is_admin_email(email) {
            Role::Admin
        } else {
            current
        }
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

// =============================================================================
// Rating
// =============================================================================

/// Folds one more rating into a running average.
///
/// `new = (avg * n + rating) / (n + 1)`
pub fn running_average(average: f64, count: i64, rating: i64) -> f64 {
    let n = count.max(0) as f64;
    (average * n + rating as f64) / (n + 1.0)
}
