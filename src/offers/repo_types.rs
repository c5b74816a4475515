use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{status::Status, store::Document, validate::iso_date};

/// A discount scoped to one category and subcategory.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Offer {
    pub id: Uuid,
    #[serde(rename = "categoryId")]
    pub category_id: Uuid,
    #[serde(rename = "subCategoryId")]
    pub sub_category_id: Uuid,
    pub offer_name: String,
    pub code: String,
    pub discount: f64,
    pub price: f64,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    pub minimum_purchase: f64,
    pub maximum_discount: f64,
    pub offer_type: String,
    pub description: String,
    pub offer_image: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: Status,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub struct NewOffer {
    pub category_id: Uuid,
    pub sub_category_id: Uuid,
    pub offer_name: String,
    pub code: String,
    pub discount: f64,
    pub price: f64,
    pub start_date: Date,
    pub end_date: Date,
    pub minimum_purchase: f64,
    pub maximum_discount: f64,
    pub offer_type: String,
    pub description: String,
    pub status: Status,
    pub offer_image: Option<String>,
}

impl Offer {
    pub fn new(new: NewOffer) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            category_id: new.category_id,
            sub_category_id: new.sub_category_id,
            offer_name: new.offer_name,
            code: new.code,
            discount: new.discount,
            price: new.price,
            start_date: new.start_date,
            end_date: new.end_date,
            minimum_purchase: new.minimum_purchase,
            maximum_discount: new.maximum_discount,
            offer_type: new.offer_type,
            description: new.description,
            offer_image: new.offer_image,
            status: new.status,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Offer {
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
        self.category_id == other.category_id && self.offer_name == other.offer_name
    }

    fn image(&self) -> Option<&str> {
        self.offer_image.as_deref()
    }
}
