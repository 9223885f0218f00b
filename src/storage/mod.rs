//! Session abstractions over the data-access layer
//!
//! The CRUD layer talks to storage through two trait seams: [`AsyncSession`]
//! for backends that are natively awaitable, and [`BlockingSession`] for
//! synchronous backends the execution manager offloads to the blocking
//! pool. Both expose the same unit-of-work verbs: execute a select, stage an
//! entity, flush, refresh, delete, and the transaction lifecycle.
//!
//! [`SessionHandle`] tags which kind a session is, so the manager can fail
//! fast on a strategy/session mismatch instead of silently misbehaving.

pub mod in_memory;

pub use in_memory::InMemoryStore;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::error::StorageError;
use crate::core::model::Model;
use crate::query::statement::SelectStatement;

/// An awaitable storage session scoped to one unit of work
#[async_trait]
pub trait AsyncSession<M: Model>: Send + Sync {
    /// Execute a select statement, returning matching entities in order
    async fn execute(&self, statement: &SelectStatement) -> Result<Vec<M>, StorageError>;

    /// Stage a new or modified entity for write
    async fn add(&self, entity: &M) -> Result<(), StorageError>;

    /// Push staged changes to the backend
    async fn flush(&self) -> Result<(), StorageError>;

    /// Reload an entity's state from the backend
    async fn refresh(&self, entity: &mut M) -> Result<(), StorageError>;

    /// Remove an entity
    async fn delete(&self, entity: &M) -> Result<(), StorageError>;

    /// Begin a transaction scope
    async fn begin(&self) -> Result<(), StorageError>;

    /// Commit the active transaction
    async fn commit(&self) -> Result<(), StorageError>;

    /// Roll back the active transaction
    async fn rollback(&self) -> Result<(), StorageError>;
}

/// A synchronous storage session; the execution manager runs these on the
/// blocking pool so a cooperative scheduler never stalls
pub trait BlockingSession<M: Model>: Send + Sync {
    fn execute(&self, statement: &SelectStatement) -> Result<Vec<M>, StorageError>;
    fn add(&self, entity: &M) -> Result<(), StorageError>;
    fn flush(&self) -> Result<(), StorageError>;
    fn refresh(&self, entity: &mut M) -> Result<(), StorageError>;
    fn delete(&self, entity: &M) -> Result<(), StorageError>;
    fn begin(&self) -> Result<(), StorageError>;
    fn commit(&self) -> Result<(), StorageError>;
    fn rollback(&self) -> Result<(), StorageError>;
}

/// A session tagged with its execution kind.
///
/// One session per request/unit-of-work; handles are cheap to clone and
/// must not be shared across concurrent requests.
pub enum SessionHandle<M: Model> {
    Async(Arc<dyn AsyncSession<M>>),
    Blocking(Arc<dyn BlockingSession<M>>),
}

impl<M: Model> SessionHandle<M> {
    /// The session kind, for mismatch diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            SessionHandle::Async(_) => "async",
            SessionHandle::Blocking(_) => "blocking",
        }
    }
}

impl<M: Model> Clone for SessionHandle<M> {
    fn clone(&self) -> Self {
        match self {
            SessionHandle::Async(s) => SessionHandle::Async(Arc::clone(s)),
            SessionHandle::Blocking(s) => SessionHandle::Blocking(Arc::clone(s)),
        }
    }
}
