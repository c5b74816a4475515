use super::repo_types::BillingAddress;
use crate::store::{postgres::PgQueryAs, PgDocument};

impl PgDocument for BillingAddress {
    const TABLE: &'static str = "billing_addresses";
    const COLUMNS: &'static [&'static str] = &[
        "owner_id",
        "name",
        "contact_no",
        "address",
        "city",
        "state",
        "country",
        "pincode",
    ];

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.owner_id)
            .bind(&self.name)
            .bind(&self.contact_no)
            .bind(&self.address)
            .bind(&self.city)
            .bind(&self.state)
            .bind(&self.country)
            .bind(&self.pincode)
    }
}
