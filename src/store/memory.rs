use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Collection, Document, StoreError};

/// Insertion-ordered collection behind a lock. Unique keys are checked while
/// the write lock is held, so concurrent inserts cannot both pass.
pub struct MemCollection<T> {
    docs: RwLock<Vec<T>>,
}

impl<T> Default for MemCollection<T> {
    fn default() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Document> MemCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<T>>, StoreError> {
        self.docs
            .read()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("memory store lock poisoned")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<T>>, StoreError> {
        self.docs
            .write()
            .map_err(|_| StoreError::Backend(anyhow::anyhow!("memory store lock poisoned")))
    }

    pub fn find_first(&self, pred: impl Fn(&T) -> bool) -> Result<Option<T>, StoreError> {
        Ok(self.read()?.iter().find(|d| pred(d)).cloned())
    }

    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Result<Vec<T>, StoreError> {
        Ok(self.read()?.iter().filter(|d| pred(d)).cloned().collect())
    }

    fn insert_now(&self, mut doc: T) -> Result<T, StoreError> {
        doc.normalize()?;
        let mut docs = self.write()?;
        if docs.iter().any(|d| d.id() == doc.id() || d.collides_with(&doc)) {
            return Err(StoreError::Conflict);
        }
        docs.push(doc.clone());
        Ok(doc)
    }

    fn update_now(&self, mut doc: T) -> Result<T, StoreError> {
        doc.normalize()?;
        doc.touch(OffsetDateTime::now_utc());
        let mut docs = self.write()?;
        if docs
            .iter()
            .any(|d| d.id() != doc.id() && d.collides_with(&doc))
        {
            return Err(StoreError::Conflict);
        }
        let slot = docs
            .iter_mut()
            .find(|d| d.id() == doc.id())
            .ok_or(StoreError::Missing(doc.id()))?;
        *slot = doc.clone();
        Ok(doc)
    }

    fn delete_now(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut docs = self.write()?;
        let before = docs.len();
        docs.retain(|d| d.id() != id);
        Ok(docs.len() != before)
    }
}

#[async_trait]
impl<T: Document> Collection<T> for MemCollection<T> {
    async fn insert(&self, doc: T) -> Result<T, StoreError> {
        self.insert_now(doc)
    }

    async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.read()?.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        self.find_first(|d| d.id() == id)
    }

    async fn update(&self, doc: T) -> Result<T, StoreError> {
        self.update_now(doc)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.delete_now(id)
    }
}
