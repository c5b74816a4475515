//! Document store abstraction.
//!
//! Every resource is a [`Document`] kept in a [`Collection`]. Two backends
//! exist: Postgres via sqlx and an in-memory one used by tests and local runs
//! without a database.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemCollection;
pub use postgres::{PgCollection, PgDocument};

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    Conflict,

    /// Rejected by the document's own pre-save checks.
    #[error("{0}")]
    Invalid(String),

    #[error("document {0} not found")]
    Missing(Uuid),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Like `AppError::from`, with a resource-specific message for conflicts.
    pub fn or_conflict(self, message: &str) -> AppError {
        match self {
            Self::Conflict => AppError::Conflict(message.to_string()),
            other => other.into(),
        }
    }
}

pub trait Document: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    /// `(created_at, updated_at)`.
    fn timestamps(&self) -> (OffsetDateTime, OffsetDateTime);

    fn touch(&mut self, now: OffsetDateTime);

    /// Runs before every insert and update.
    fn normalize(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Whether two distinct documents clash on a unique key. Only the memory
    /// backend consults this; Postgres relies on its unique indexes.
    fn collides_with(&self, _other: &Self) -> bool {
        false
    }

    /// Public path of the attached media file, if any.
    fn image(&self) -> Option<&str> {
        None
    }
}

#[async_trait]
pub trait Collection<T: Document>: Send + Sync {
    async fn insert(&self, doc: T) -> Result<T, StoreError>;
    async fn find_all(&self) -> Result<Vec<T>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError>;
    /// Replaces the stored document with the same id, bumping `updated_at`.
    async fn update(&self, doc: T) -> Result<T, StoreError>;
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
