use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::store::Document;

/// A delivery/billing address owned by one user account.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BillingAddress {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub owner_id: Uuid,
    pub name: String,
    #[serde(rename = "contactNo")]
    pub contact_no: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

pub struct NewBillingAddress {
    pub name: String,
    pub contact_no: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
}

impl BillingAddress {
    pub fn new(owner_id: Uuid, new: NewBillingAddress) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: new.name,
            contact_no: new.contact_no,
            address: new.address,
            city: new.city,
            state: new.state,
            country: new.country,
            pincode: new.pincode,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for BillingAddress {
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
