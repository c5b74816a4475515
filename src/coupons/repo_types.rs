use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{status::Status, store::Document, validate::iso_date};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Coupon {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub price: f64,
    pub coupon_image: Option<String>,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    #[sqlx(try_from = "String")]
    pub status: Status,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub struct NewCoupon {
    pub name: String,
    pub code: String,
    pub price: f64,
    pub start_date: Date,
    pub end_date: Date,
    pub status: Status,
    pub coupon_image: Option<String>,
}

impl Coupon {
    pub fn new(new: NewCoupon) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            code: new.code,
            price: new.price,
            coupon_image: new.coupon_image,
            start_date: new.start_date,
            end_date: new.end_date,
            status: new.status,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Coupon {
    fn id(&self) -> Uuid {
        self.id
    }

    fn timestamps(&self) -> (OffsetDateTime, OffsetDateTime) {
        (self.created_at, self.updated_at)
    }

    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }

    // Name and code are each unique on their own.
    fn collides_with(&self, other: &Self) -> bool {
        self.name == other.name || self.code == other.code
    }

    fn image(&self) -> Option<&str> {
        self.coupon_image.as_deref()
    }
}
