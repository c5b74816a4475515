use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::Document;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PrivacyPolicy {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PrivacyPolicy {
    pub fn new(title: String, description: String) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for PrivacyPolicy {
    fn id(&self) -> Uuid {
        self.id
    }

    fn timestamps(&self) -> (OffsetDateTime, OffsetDateTime) {
        (self.created_at, self.updated_at)
    }

    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }
}
