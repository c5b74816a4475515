use super::repo_types::Coupon;
use crate::store::{postgres::PgQueryAs, PgDocument};

impl PgDocument for Coupon {
    const TABLE: &'static str = "coupons";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "code",
        "price",
        "coupon_image",
        "start_date",
        "end_date",
        "status",
    ];

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(&self.name)
            .bind(&self.code)
            .bind(self.price)
            .bind(&self.coupon_image)
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.status.as_str())
    }
}
