//! In-memory session implementation for testing and development
//!
//! Executes [`SelectStatement`]s structurally against cloned rows and backs
//! the transaction verbs with a snapshot of the row map, so rollback
//! behavior is observable without a database. Implements both session
//! traits; one store can hand out async and blocking handles sharing the
//! same state.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::error::StorageError;
use crate::core::model::Model;
use crate::query::statement::SelectStatement;
use crate::storage::{AsyncSession, BlockingSession, SessionHandle};

struct StoreState<M> {
    /// Rows keyed by primary-key string, in insertion order
    rows: IndexMap<String, M>,
    /// Copy of `rows` taken at `begin`, restored on `rollback`
    snapshot: Option<IndexMap<String, M>>,
}

/// In-memory store, thread-safe behind an `RwLock`
pub struct InMemoryStore<M: Model> {
    state: Arc<RwLock<StoreState<M>>>,
}

impl<M: Model> Clone for InMemoryStore<M> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<M: Model> Default for InMemoryStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> InMemoryStore<M> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState {
                rows: IndexMap::new(),
                snapshot: None,
            })),
        }
    }

    /// Create a store pre-populated with rows (insertion order preserved)
    pub fn seeded(rows: impl IntoIterator<Item = M>) -> Result<Self, StorageError> {
        let store = Self::new();
        {
            let mut state = store.write()?;
            for row in rows {
                let key = Self::key_of(&row)?;
                state.rows.insert(key, row);
            }
        }
        Ok(store)
    }

    /// Wrap this store in an async session handle
    pub fn async_handle(&self) -> SessionHandle<M> {
        SessionHandle::Async(Arc::new(self.clone()))
    }

    /// Wrap this store in a blocking session handle
    pub fn blocking_handle(&self) -> SessionHandle<M> {
        SessionHandle::Blocking(Arc::new(self.clone()))
    }

    /// Number of rows currently stored
    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key_of(entity: &M) -> Result<String, StorageError> {
        entity
            .primary_key_value()
            .filter(|value| !value.is_null())
            .map(|value| value.to_string())
            .ok_or_else(|| {
                StorageError::Backend(format!(
                    "{} has no value for primary key '{}'",
                    M::entity_name(),
                    M::primary_key()
                ))
            })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState<M>>, StorageError> {
        self.state
            .read()
            .map_err(|e| StorageError::Backend(format!("failed to acquire read lock: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState<M>>, StorageError> {
        self.state
            .write()
            .map_err(|e| StorageError::Backend(format!("failed to acquire write lock: {e}")))
    }

    fn execute_inner(&self, statement: &SelectStatement) -> Result<Vec<M>, StorageError> {
        let state = self.read()?;
        let mut rows: Vec<M> = state
            .rows
            .values()
            .filter(|row| statement.matches(*row))
            .cloned()
            .collect();
        statement.sort_rows(&mut rows);
        Ok(rows)
    }

    fn add_inner(&self, entity: &M) -> Result<(), StorageError> {
        let key = Self::key_of(entity)?;
        let mut state = self.write()?;
        state.rows.insert(key, entity.clone());
        Ok(())
    }

    fn refresh_inner(&self, entity: &mut M) -> Result<(), StorageError> {
        let key = Self::key_of(entity)?;
        let state = self.read()?;
        let stored = state.rows.get(&key).ok_or_else(|| {
            StorageError::Backend(format!(
                "cannot refresh {} '{}': row is gone",
                M::entity_name(),
                key
            ))
        })?;
        *entity = stored.clone();
        Ok(())
    }

    fn delete_inner(&self, entity: &M) -> Result<(), StorageError> {
        let key = Self::key_of(entity)?;
        let mut state = self.write()?;
        state.rows.shift_remove(&key);
        Ok(())
    }

    fn begin_inner(&self) -> Result<(), StorageError> {
        let mut state = self.write()?;
        if state.snapshot.is_some() {
            return Err(StorageError::Transaction(
                "nested transactions are not supported".to_string(),
            ));
        }
        state.snapshot = Some(state.rows.clone());
        Ok(())
    }

    fn commit_inner(&self) -> Result<(), StorageError> {
        let mut state = self.write()?;
        state
            .snapshot
            .take()
            .ok_or_else(|| StorageError::Transaction("no active transaction".to_string()))?;
        Ok(())
    }

    fn rollback_inner(&self) -> Result<(), StorageError> {
        let mut state = self.write()?;
        let snapshot = state
            .snapshot
            .take()
            .ok_or_else(|| StorageError::Transaction("no active transaction".to_string()))?;
        state.rows = snapshot;
        Ok(())
    }
}

impl<M: Model> BlockingSession<M> for InMemoryStore<M> {
    fn execute(&self, statement: &SelectStatement) -> Result<Vec<M>, StorageError> {
        self.execute_inner(statement)
    }

    fn add(&self, entity: &M) -> Result<(), StorageError> {
        self.add_inner(entity)
    }

    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }

    fn refresh(&self, entity: &mut M) -> Result<(), StorageError> {
        self.refresh_inner(entity)
    }

    fn delete(&self, entity: &M) -> Result<(), StorageError> {
        self.delete_inner(entity)
    }

    fn begin(&self) -> Result<(), StorageError> {
        self.begin_inner()
    }

    fn commit(&self) -> Result<(), StorageError> {
        self.commit_inner()
    }

    fn rollback(&self) -> Result<(), StorageError> {
        self.rollback_inner()
    }
}

#[async_trait]
impl<M: Model> AsyncSession<M> for InMemoryStore<M> {
    async fn execute(&self, statement: &SelectStatement) -> Result<Vec<M>, StorageError> {
        self.execute_inner(statement)
    }

    async fn add(&self, entity: &M) -> Result<(), StorageError> {
        self.add_inner(entity)
    }

    async fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn refresh(&self, entity: &mut M) -> Result<(), StorageError> {
        self.refresh_inner(entity)
    }

    async fn delete(&self, entity: &M) -> Result<(), StorageError> {
        self.delete_inner(entity)
    }

    async fn begin(&self) -> Result<(), StorageError> {
        self.begin_inner()
    }

    async fn commit(&self) -> Result<(), StorageError> {
        self.commit_inner()
    }

    async fn rollback(&self) -> Result<(), StorageError> {
        self.rollback_inner()
    }
}
