use std::marker::PhantomData;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, PgPool, Postgres,
};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{Collection, Document, StoreError};

pub type PgQueryAs<'q, T> = QueryAs<'q, Postgres, T, PgArguments>;

/// A document that maps onto one Postgres table.
///
/// Every table has `id`, `created_at` and `updated_at` alongside the
/// document-specific `COLUMNS`, which `bind_columns` binds in order.
pub trait PgDocument: Document + for<'r> FromRow<'r, PgRow> + Unpin {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self>;
}

pub struct PgCollection<T> {
    pool: PgPool,
    _doc: PhantomData<fn() -> T>,
}

impl<T> PgCollection<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _doc: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) fn map_sqlx(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
        _ => StoreError::Backend(anyhow::Error::new(e)),
    }
}

fn placeholders(n: usize) -> String {
    (1..=n).map(|i| format!("${i}")).collect::<Vec<_>>().join(", ")
}

fn insert_sql<T: PgDocument>() -> String {
    format!(
        "INSERT INTO {} (id, {}, created_at, updated_at) VALUES ({}) RETURNING *",
        T::TABLE,
        T::COLUMNS.join(", "),
        placeholders(T::COLUMNS.len() + 3)
    )
}

fn update_sql<T: PgDocument>() -> String {
    let assignments = T::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{c} = ${}", i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {}, updated_at = ${} WHERE id = $1 RETURNING *",
        T::TABLE,
        assignments,
        T::COLUMNS.len() + 2
    )
}

#[async_trait]
impl<T: PgDocument> Collection<T> for PgCollection<T> {
    async fn insert(&self, mut doc: T) -> Result<T, StoreError> {
        doc.normalize()?;
        let sql = insert_sql::<T>();
        let (created_at, updated_at) = doc.timestamps();
        let query = sqlx::query_as::<_, T>(&sql).bind(doc.id());
        doc.bind_columns(query)
            .bind(created_at)
            .bind(updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)
    }

    async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        let sql = format!("SELECT * FROM {} ORDER BY created_at ASC", T::TABLE);
        let rows = sqlx::query_as::<_, T>(&sql)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("list {}", T::TABLE))?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", T::TABLE);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("get {} {}", T::TABLE, id))?;
        Ok(row)
    }

    async fn update(&self, mut doc: T) -> Result<T, StoreError> {
        doc.normalize()?;
        doc.touch(OffsetDateTime::now_utc());
        let sql = update_sql::<T>();
        let (_, updated_at) = doc.timestamps();
        let query = sqlx::query_as::<_, T>(&sql).bind(doc.id());
        doc.bind_columns(query)
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?
            .ok_or(StoreError::Missing(doc.id()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", T::TABLE);
        let done = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("delete {} {}", T::TABLE, id))?;
        Ok(done.rows_affected() > 0)
    }
}
