//! Steps shared by the resource handlers.

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::AppError,
    media::{remove_quietly, MediaStore},
    response::ApiResponse,
    store::{Collection, Document, StoreError},
};

/// Fetches a document or answers 404 with `missing`.
pub async fn load<T: Document>(
    store: &dyn Collection<T>,
    id: Uuid,
    missing: &str,
) -> Result<T, AppError> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(missing))
}

/// An empty list is still a success, only with a different message.
pub fn listing<T: Serialize>(items: Vec<T>, empty: &str, found: &str) -> ApiResponse<Vec<T>> {
    let message = if items.is_empty() { empty } else { found };
    ApiResponse::ok(message, items)
}

/// Deletes a loaded document, then the file attached to it.
pub async fn destroy<T: Document>(
    store: &dyn Collection<T>,
    media: &dyn MediaStore,
    doc: &T,
) -> Result<(), AppError> {
    if !store.delete(doc.id()).await? {
        return Err(StoreError::Missing(doc.id()).into());
    }
    if let Some(path) = doc.image() {
        remove_quietly(media, path).await;
    }
    debug!(id = %doc.id(), "document destroyed");
    Ok(())
}
