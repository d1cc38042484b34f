//! CrudService: generic CRUD using the safe SQL builder, plus request validation and pre-write checks.

mod checks;
mod crud;
mod validation;
pub use checks::{ensure_no_duplicate, ensure_references};
pub use crud::CrudService;
pub use validation::RequestValidator;
