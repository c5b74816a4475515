use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{status::Status, store::Document};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Unit {
    pub id: Uuid,
    pub unit_name: String,
    pub short_name: String,
    #[sqlx(try_from = "String")]
    pub status: Status,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Unit {
    pub fn new(unit_name: String, short_name: String, status: Status) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            unit_name,
            short_name,
            status,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Unit {
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
        self.unit_name == other.unit_name || self.short_name == other.short_name
    }
}
