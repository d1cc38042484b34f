//! HTTP handlers for entity CRUD, health and API docs.

pub mod common;
pub mod docs;
pub mod entity;
pub use entity::*;
