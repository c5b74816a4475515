use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{status::Status, store::Document};

/// A subcategory points at its parent by id. The parent is checked when the
/// link is written; nothing stops the parent being deleted later.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SubCategory {
    pub id: Uuid,
    #[serde(rename = "categoryId")]
    pub category_id: Uuid,
    #[serde(rename = "subCategory_name")]
    pub sub_category_name: String,
    #[serde(rename = "subCategory_image")]
    pub sub_category_image: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: Status,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl SubCategory {
    pub fn new(
        category_id: Uuid,
        sub_category_name: String,
        status: Status,
        sub_category_image: Option<String>,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            category_id,
            sub_category_name,
            sub_category_image,
            status,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for SubCategory {
    fn id(&self) -> Uuid {
        self.id
    }

    fn timestamps(&self) -> (OffsetDateTime, OffsetDateTime) {
        (self.created_at, self.updated_at)
    }

    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }

    // Names are unique per parent category only.
    fn collides_with(&self, other: &Self) -> bool {
        self.category_id == other.category_id && self.sub_category_name == other.sub_category_name
    }

    fn image(&self) -> Option<&str> {
        self.sub_category_image.as_deref()
    }
}
