//! Execution manager: runs statements and writes against a session
//!
//! Two strategies over the same contract, chosen once at construction:
//!
//! - [`ExecutionStrategy::Direct`] awaits an [`AsyncSession`] at each
//!   data-access call site.
//! - [`ExecutionStrategy::Offload`] runs a [`BlockingSession`] on the
//!   runtime's blocking pool, one independent unit per call, so a
//!   synchronous backend never stalls the cooperative scheduler.
//!
//! Every write is wrapped in a transaction scope — commit on clean
//! completion, rollback on any error, with the error propagating after the
//! rollback. Reads execute prepared select statements, which are read-only
//! by construction, so they need no extra guard.
//!
//! Handing the wrong session kind to a strategy is a wiring bug; it fails
//! fast with [`StorageError::SessionMismatch`].

use std::sync::Arc;

use crate::core::error::{CrudKitError, StorageError};
use crate::core::model::Model;
use crate::query::statement::SelectStatement;
use crate::storage::{AsyncSession, BlockingSession, SessionHandle};

/// How data-access calls are executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Await an async session directly
    Direct,
    /// Offload a blocking session to the blocking pool
    Offload,
}

impl ExecutionStrategy {
    fn name(&self) -> &'static str {
        match self {
            ExecutionStrategy::Direct => "Direct",
            ExecutionStrategy::Offload => "Offload",
        }
    }

    fn expected_session(&self) -> &'static str {
        match self {
            ExecutionStrategy::Direct => "async",
            ExecutionStrategy::Offload => "blocking",
        }
    }
}

/// Executes statements and write operations against a tagged session
#[derive(Debug, Clone)]
pub struct ExecutionManager {
    strategy: ExecutionStrategy,
}

impl ExecutionManager {
    pub fn new(strategy: ExecutionStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Execute a select and return all matching entities
    pub async fn list<M: Model>(
        &self,
        session: &SessionHandle<M>,
        statement: SelectStatement,
    ) -> Result<Vec<M>, CrudKitError> {
        match (self.strategy, session) {
            (ExecutionStrategy::Direct, SessionHandle::Async(s)) => {
                Ok(s.execute(&statement).await?)
            }
            (ExecutionStrategy::Offload, SessionHandle::Blocking(s)) => {
                let s = Arc::clone(s);
                run_blocking(move || s.execute(&statement)).await
            }
            _ => Err(self.mismatch(session)),
        }
    }

    /// Execute a select and return the first match, if any
    pub async fn get<M: Model>(
        &self,
        session: &SessionHandle<M>,
        statement: SelectStatement,
    ) -> Result<Option<M>, CrudKitError> {
        let rows = self.list(session, statement).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert an entity within a transaction scope and return it refreshed
    pub async fn create<M: Model>(
        &self,
        session: &SessionHandle<M>,
        entity: M,
    ) -> Result<M, CrudKitError> {
        tracing::debug!(entity = M::entity_name(), "create");
        self.write(session, entity).await
    }

    /// Persist a modified entity within a transaction scope
    pub async fn update<M: Model>(
        &self,
        session: &SessionHandle<M>,
        entity: M,
    ) -> Result<M, CrudKitError> {
        tracing::debug!(entity = M::entity_name(), "update");
        self.write(session, entity).await
    }

    // Create and update share the staged-write shape: stage, flush,
    // refresh, commit
    async fn write<M: Model>(
        &self,
        session: &SessionHandle<M>,
        entity: M,
    ) -> Result<M, CrudKitError> {
        match (self.strategy, session) {
            (ExecutionStrategy::Direct, SessionHandle::Async(s)) => {
                s.begin().await?;
                let result = async {
                    s.add(&entity).await?;
                    s.flush().await?;
                    let mut refreshed = entity.clone();
                    s.refresh(&mut refreshed).await?;
                    Ok(refreshed)
                }
                .await;
                finish_async(s.as_ref(), result).await
            }
            (ExecutionStrategy::Offload, SessionHandle::Blocking(s)) => {
                let s = Arc::clone(s);
                run_blocking(move || {
                    s.begin()?;
                    let result = (|| {
                        s.add(&entity)?;
                        s.flush()?;
                        let mut refreshed = entity.clone();
                        s.refresh(&mut refreshed)?;
                        Ok(refreshed)
                    })();
                    finish_blocking(s.as_ref(), result)
                })
                .await
            }
            _ => Err(self.mismatch(session)),
        }
    }

    /// Delete an entity within a transaction scope, returning the deleted
    /// entity
    pub async fn delete<M: Model>(
        &self,
        session: &SessionHandle<M>,
        entity: M,
    ) -> Result<M, CrudKitError> {
        tracing::debug!(entity = M::entity_name(), "delete");
        match (self.strategy, session) {
            (ExecutionStrategy::Direct, SessionHandle::Async(s)) => {
                s.begin().await?;
                let result = match s.delete(&entity).await {
                    Ok(()) => Ok(entity),
                    Err(err) => Err(err),
                };
                finish_async(s.as_ref(), result).await
            }
            (ExecutionStrategy::Offload, SessionHandle::Blocking(s)) => {
                let s = Arc::clone(s);
                run_blocking(move || {
                    s.begin()?;
                    let result = s.delete(&entity).map(|()| entity);
                    finish_blocking(s.as_ref(), result)
                })
                .await
            }
            _ => Err(self.mismatch(session)),
        }
    }

    fn mismatch<M: Model>(&self, session: &SessionHandle<M>) -> CrudKitError {
        StorageError::SessionMismatch {
            strategy: self.strategy.name(),
            expected: self.strategy.expected_session(),
            actual: session.kind(),
        }
        .into()
    }
}

/// Commit on success, roll back (and propagate the original error) on
/// failure
async fn finish_async<M: Model>(
    session: &dyn AsyncSession<M>,
    result: Result<M, StorageError>,
) -> Result<M, CrudKitError> {
    match result {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = session.rollback().await {
                tracing::debug!(error = %rollback_err, "rollback failed");
            }
            Err(err.into())
        }
    }
}

fn finish_blocking<M: Model>(
    session: &dyn BlockingSession<M>,
    result: Result<M, StorageError>,
) -> Result<M, StorageError> {
    match result {
        Ok(value) => {
            session.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = session.rollback() {
                tracing::debug!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, CrudKitError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(result) => result.map_err(CrudKitError::from),
        Err(join_err) => {
            Err(StorageError::Backend(format!("blocking task failed: {join_err}")).into())
        }
    }
}
