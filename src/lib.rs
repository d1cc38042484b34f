//! Car dealership back office: CRUD REST API for roles, users, vehicles, sales and
//! test-drive appointments on PostgreSQL.

pub mod config;
pub mod database;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;

pub use config::Settings;
pub use database::{connect, ensure_database_exists};
pub use error::{AppError, ConfigError};
pub use migration::sync_schema;
pub use model::{validate_model, Appointment, Entity, Role, Sale, User, Vehicle, MODEL};
pub use routes::{app, common_routes, entity_routes, API_BASE};
pub use service::CrudService;
pub use state::AppState;
