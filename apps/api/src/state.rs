//! Shared application state.

use std::sync::Arc;

use moto_core::AdminPolicy;
use moto_db::Database;

use crate::auth::JwtManager;

/// State handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub admins: Arc<AdminPolicy>,
}

impl AppState {
    pub fn new(db: Database, jwt: JwtManager, admins: AdminPolicy) -> Self {
        AppState {
            db,
            jwt: Arc::new(jwt),
            admins: Arc::new(admins),
        }
    }
}
