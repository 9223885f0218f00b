//! # crud-kit
//!
//! Declarative query filtering and CRUD orchestration for building REST APIs
//! in Rust.
//!
//! ## Features
//!
//! - **Bracketed filter grammar**: `filter[name]=Tech`,
//!   `filter[age][gte]=18`, with repeated keys, comma lists, sort, includes
//!   and field selection
//! - **Allow-list policies**: per-field aliases, default operators and
//!   permitted operator sets, validated at startup
//! - **Composable query building**: filters → sort → projection →
//!   eager-load includes, producing an executable statement object
//! - **CRUD orchestration**: list/get/create/update/delete with primary-key
//!   discovery and typed not-found/validation errors
//! - **Dual execution strategies**: direct-await for async sessions,
//!   blocking-pool offload for synchronous ones, both with
//!   commit-or-rollback transaction scopes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crud_kit::prelude::*;
//!
//! #[derive(Clone, Debug, Serialize, Deserialize)]
//! struct Category {
//!     id: i64,
//!     name: String,
//!     description: String,
//!     created_at: DateTime<Utc>,
//! }
//!
//! impl_model!(Category, "category", "categories",
//!     relationships: ["articles"],
//!     fields: [id, name, description, created_at],
//! );
//!
//! let config = Arc::new(QueryBuilderConfig::new([
//!     AllowedFilter::exact("name"),
//!     AllowedFilter::partial("description"),
//!     AllowedFilter::operator("created_at", FilterOperator::Gte,
//!         vec![FilterOperator::Gte, FilterOperator::Lte,
//!              FilterOperator::Gt, FilterOperator::Lt])?,
//! ]));
//!
//! // filter[name]=Tech&filter[description][icontains]=innov&sort=-created_at
//! let params = QueryParams::from_query(query, Some(&config))?;
//! let crud = Crud::<Category>::new(ExecutionStrategy::Direct)
//!     .with_config(config.clone());
//! let categories = crud.list(&session, &params).await?;
//! ```

pub mod core;
pub mod crud;
pub mod query;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ConfigError, CrudKitError, EntityError, ErrorResponse, QueryError, StorageError},
        field::FieldValue,
        model::Model,
    };

    // === Macros ===
    pub use crate::impl_model;

    // === Query pipeline ===
    pub use crate::query::{
        allowed::{AllowedFilter, FilterCallback},
        builder::QueryBuilder,
        config::QueryBuilderConfig,
        operator::FilterOperator,
        params::{Filter, FilterValue, QueryParams, RawFilter},
        statement::{Predicate, SelectStatement, SortOrder},
    };

    // === CRUD ===
    pub use crate::crud::{Crud, EntityInput, ExecutionManager, ExecutionStrategy};

    // === Storage ===
    pub use crate::storage::{AsyncSession, BlockingSession, InMemoryStore, SessionHandle};
}
