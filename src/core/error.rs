//! Typed error handling for the crud-kit pipeline
//!
//! This module provides the error hierarchy shared by the query layer, the
//! CRUD orchestrator and the execution manager. Each category keeps enough
//! structure for clients to handle errors specifically instead of matching
//! on strings.
//!
//! # Error Categories
//!
//! - [`QueryError`]: request-time filter resolution failures (recoverable by
//!   the caller, map to 400)
//! - [`ConfigError`]: construction-time policy misconfiguration (fatal)
//! - [`EntityError`]: CRUD failures — missing entities, invalid payloads
//! - [`StorageError`]: session/backend failures, including strategy mismatch
//!
//! # Example
//!
//! ```rust,ignore
//! match crud.get(&session, id, None).await {
//!     Ok(category) => ...,
//!     Err(CrudKitError::Entity(EntityError::NotFound { id, .. })) => {
//!         println!("category {} not found", id);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// The main error type for the crud-kit pipeline
#[derive(Debug, Error)]
pub enum CrudKitError {
    /// Filter resolution errors (request-time)
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Policy configuration errors (construction-time)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Entity CRUD errors
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Storage/session errors
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors raised while resolving raw filters against a policy
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// The requested filter key is not in the allow-list
    #[error("Filter '{filter}' is not allowed. Allowed filters: {}", .allowed.join(", "))]
    FilterNotAllowed { filter: String, allowed: Vec<String> },

    /// The requested operator is not permitted for the matched filter
    #[error(
        "Operator '{operator}' is not allowed for filter '{filter}'. Allowed operators: {}",
        .allowed.join(", ")
    )]
    OperatorNotAllowed {
        filter: String,
        operator: String,
        allowed: Vec<String>,
    },

    /// The operator token does not name any supported operator
    #[error("Invalid operator '{operator}'. Supported operators: {}", .supported.join(", "))]
    UnknownOperator {
        operator: String,
        supported: Vec<String>,
    },
}

/// Errors raised while declaring allowed filters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The declared default operator is missing from the allowed set
    #[error(
        "Filter '{field}': default operator '{default}' must be in allowed operators: {}",
        .allowed.join(", ")
    )]
    DefaultOperatorNotAllowed {
        field: String,
        default: String,
        allowed: Vec<String>,
    },
}

/// Errors related to entity CRUD operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntityError {
    /// No entity matches the resolved identifier filter
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: String },

    /// A creation or update payload could not be applied to the entity type
    #[error("Validation failed for {entity_type}: {message}")]
    Validation {
        entity_type: String,
        message: String,
    },
}

/// Errors related to storage sessions and execution strategies
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    /// Wrong session kind handed to an execution strategy
    #[error("{strategy} execution requires a {expected} session, got a {actual} session")]
    SessionMismatch {
        strategy: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Transaction lifecycle violation
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Backend failure (lock poisoning, task join, missing rows on refresh)
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl CrudKitError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CrudKitError::Query(_) => StatusCode::BAD_REQUEST,
            CrudKitError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CrudKitError::Entity(EntityError::NotFound { .. }) => StatusCode::NOT_FOUND,
            CrudKitError::Entity(EntityError::Validation { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            CrudKitError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CrudKitError::Query(QueryError::FilterNotAllowed { .. }) => "FILTER_NOT_ALLOWED",
            CrudKitError::Query(QueryError::OperatorNotAllowed { .. }) => "OPERATOR_NOT_ALLOWED",
            CrudKitError::Query(QueryError::UnknownOperator { .. }) => "UNKNOWN_OPERATOR",
            CrudKitError::Config(_) => "CONFIG_ERROR",
            CrudKitError::Entity(EntityError::NotFound { .. }) => "NOT_FOUND",
            CrudKitError::Entity(EntityError::Validation { .. }) => "VALIDATION_ERROR",
            CrudKitError::Storage(StorageError::SessionMismatch { .. }) => "SESSION_MISMATCH",
            CrudKitError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            CrudKitError::Query(QueryError::FilterNotAllowed { filter, allowed }) => {
                Some(serde_json::json!({
                    "filter": filter,
                    "allowed_filters": allowed,
                }))
            }
            CrudKitError::Query(QueryError::OperatorNotAllowed {
                filter,
                operator,
                allowed,
            }) => Some(serde_json::json!({
                "filter": filter,
                "operator": operator,
                "allowed_operators": allowed,
            })),
            CrudKitError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id,
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for CrudKitError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}
