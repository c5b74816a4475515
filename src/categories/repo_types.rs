use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{status::Status, store::Document};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub category_name: String,
    pub category_image: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: Status,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Category {
    pub fn new(category_name: String, status: Status, category_image: Option<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            category_name,
            category_image,
            status,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Category {
    fn id(&self) -> Uuid {
        self.id
    }

    fn timestamps(&self) -> (OffsetDateTime, OffsetDateTime) {
        (self.created_at, self.updated_at)
    }

    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }

    fn collides_with(&self, other: &Self) -> bool {
        self.category_name == other.category_name
    }

    fn image(&self) -> Option<&str> {
        self.category_image.as_deref()
    }
}
