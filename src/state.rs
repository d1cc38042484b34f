//! Shared application state for all routes.

use sqlx::PgPool;

/// The pool is the only shared resource; handlers pass it to every store call.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}
