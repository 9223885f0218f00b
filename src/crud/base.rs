//! CRUD orchestration over the query pipeline
//!
//! [`Crud`] glues the pieces together: it builds statements from
//! [`QueryParams`], injects primary-key filters for single-entity
//! operations, turns payload maps into entities, and delegates execution to
//! the [`ExecutionManager`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::core::error::{CrudKitError, EntityError};
use crate::core::model::Model;
use crate::crud::manager::{ExecutionManager, ExecutionStrategy};
use crate::query::builder::QueryBuilder;
use crate::query::config::QueryBuilderConfig;
use crate::query::operator::FilterOperator;
use crate::query::params::{Filter, FilterValue, QueryParams};
use crate::query::statement::SelectStatement;
use crate::storage::SessionHandle;

/// Payload for create/update: either a mapping of attributes or a pre-built
/// entity
#[derive(Debug, Clone)]
pub enum EntityInput<M> {
    Attributes(Map<String, Value>),
    Entity(M),
}

impl<M> EntityInput<M> {
    /// Build from a JSON object; non-object values become an empty
    /// attribute map (and fail entity validation downstream)
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => EntityInput::Attributes(map),
            _ => EntityInput::Attributes(Map::new()),
        }
    }
}

/// CRUD operations for one entity type.
///
/// # Example
/// ```rust,ignore
/// let crud = Crud::<Category>::new(ExecutionStrategy::Direct);
/// let categories = crud.list(&session, &params).await?;
/// let one = crud.get(&session, 42, None).await?;
/// ```
pub struct Crud<M: Model> {
    manager: ExecutionManager,
    config: Option<Arc<QueryBuilderConfig>>,
    _model: PhantomData<M>,
}

impl<M: Model> Crud<M> {
    pub fn new(strategy: ExecutionStrategy) -> Self {
        Self {
            manager: ExecutionManager::new(strategy),
            config: None,
            _model: PhantomData,
        }
    }

    /// Attach an allow-list config so statement building resolves custom
    /// filter callbacks
    pub fn with_config(mut self, config: Arc<QueryBuilderConfig>) -> Self {
        self.config = Some(config);
        self
    }

    fn build_statement(&self, params: &QueryParams) -> SelectStatement {
        let builder = match &self.config {
            Some(config) => QueryBuilder::<M>::with_config(Arc::clone(config)),
            None => QueryBuilder::<M>::new(),
        };
        builder.apply(params)
    }

    /// Equality filter on the model's primary-key field
    fn primary_key_filter(id: &str) -> Filter {
        Filter {
            field: M::primary_key().to_string(),
            operator: FilterOperator::Eq,
            value: FilterValue::Single(id.to_string()),
        }
    }

    /// List all entities matching the query parameters
    pub async fn list(
        &self,
        session: &SessionHandle<M>,
        params: &QueryParams,
    ) -> Result<Vec<M>, CrudKitError> {
        let statement = self.build_statement(params);
        self.manager.list(session, statement).await
    }

    /// Get a single entity by identifier.
    ///
    /// The primary-key filter is injected ahead of any caller-supplied
    /// filters; extra params are useful for includes and field selection.
    pub async fn get(
        &self,
        session: &SessionHandle<M>,
        id: impl ToString,
        params: Option<&QueryParams>,
    ) -> Result<M, CrudKitError> {
        let id = id.to_string();

        let mut merged = params.cloned().unwrap_or_default();
        let mut filters = vec![Self::primary_key_filter(&id)];
        filters.append(&mut merged.filters);
        merged.filters = filters;

        let statement = self.build_statement(&merged);
        self.manager
            .get(session, statement)
            .await?
            .ok_or_else(|| {
                EntityError::NotFound {
                    entity_type: M::entity_name().to_string(),
                    id,
                }
                .into()
            })
    }

    /// Create a new entity from a payload or a pre-built instance
    pub async fn create(
        &self,
        session: &SessionHandle<M>,
        input: EntityInput<M>,
    ) -> Result<M, CrudKitError> {
        let entity = match input {
            EntityInput::Entity(entity) => entity,
            EntityInput::Attributes(attrs) => {
                M::from_attributes(attrs).map_err(|err| EntityError::Validation {
                    entity_type: M::entity_name().to_string(),
                    message: err.to_string(),
                })?
            }
        };
        self.manager.create(session, entity).await
    }

    /// Update an existing entity; fails with not-found when the identifier
    /// matches nothing
    pub async fn update(
        &self,
        session: &SessionHandle<M>,
        id: impl ToString,
        input: EntityInput<M>,
    ) -> Result<M, CrudKitError> {
        let existing = self.get(session, id, None).await?;

        let updated = match input {
            EntityInput::Entity(entity) => entity,
            EntityInput::Attributes(attrs) => {
                existing
                    .merge_attributes(&attrs)
                    .map_err(|err| EntityError::Validation {
                        entity_type: M::entity_name().to_string(),
                        message: err.to_string(),
                    })?
            }
        };
        self.manager.update(session, updated).await
    }

    /// Delete an entity by identifier, returning the deleted entity
    pub async fn delete(
        &self,
        session: &SessionHandle<M>,
        id: impl ToString,
    ) -> Result<M, CrudKitError> {
        let existing = self.get(session, id, None).await?;
        self.manager.delete(session, existing).await
    }
}
