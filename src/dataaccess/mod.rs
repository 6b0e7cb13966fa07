//! Read-side access to the entity store.
//!
//! The matching core never owns persistence; it reads snapshots through this
//! trait and hands regenerated embeddings back for best-effort storage. The
//! in-memory implementation in [`memory`] backs tests and offline use.

#[cfg(any(test, feature = "mock"))]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Course, EntityId, EntityKind, Person, Project};

/// Errors from the backing store. Only lookups that fail outright surface
/// them; embedding persistence is fire-and-forget.
#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("data store error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait DataAccess: Send + Sync {
    /// Fetches one person by id; `None` when the id is unknown.
    async fn person(&self, id: EntityId) -> Result<Option<Person>, DataAccessError>;

    /// Fetches one project by id; `None` when the id is unknown.
    async fn project(&self, id: EntityId) -> Result<Option<Project>, DataAccessError>;

    /// The full person candidate pool.
    async fn people(&self) -> Result<Vec<Person>, DataAccessError>;

    /// The full project candidate pool.
    async fn projects(&self) -> Result<Vec<Project>, DataAccessError>;

    /// The full course candidate pool.
    async fn courses(&self) -> Result<Vec<Course>, DataAccessError>;

    /// Stores a regenerated embedding. Best effort: callers log failures and
    /// move on.
    async fn persist_embedding(
        &self,
        kind: EntityKind,
        id: EntityId,
        vector: &[f32],
    ) -> Result<(), DataAccessError>;
}
