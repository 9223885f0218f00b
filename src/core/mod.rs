//! Core module containing fundamental traits and types for the crate

pub mod error;
pub mod field;
pub mod macros;
pub mod model;

pub use error::{ConfigError, CrudKitError, EntityError, ErrorResponse, QueryError, StorageError};
pub use field::FieldValue;
pub use model::Model;
