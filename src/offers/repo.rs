use super::repo_types::Offer;
use crate::store::{postgres::PgQueryAs, PgDocument};

impl PgDocument for Offer {
    const TABLE: &'static str = "offers";
    const COLUMNS: &'static [&'static str] = &[
        "category_id",
        "sub_category_id",
        "offer_name",
        "code",
        "discount",
        "price",
        "start_date",
        "end_date",
        "minimum_purchase",
        "maximum_discount",
        "offer_type",
        "description",
        "offer_image",
        "status",
    ];

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.category_id)
            .bind(self.sub_category_id)
            .bind(&self.offer_name)
            .bind(&self.code)
            .bind(self.discount)
            .bind(self.price)
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.minimum_purchase)
            .bind(self.maximum_discount)
            .bind(&self.offer_type)
            .bind(&self.description)
            .bind(&self.offer_image)
            .bind(self.status.as_str())
    }
}
