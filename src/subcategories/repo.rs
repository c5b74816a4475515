use super::repo_types::SubCategory;
use crate::store::{postgres::PgQueryAs, PgDocument};

impl PgDocument for SubCategory {
    const TABLE: &'static str = "sub_categories";
    const COLUMNS: &'static [&'static str] = &[
        "category_id",
        "sub_category_name",
        "sub_category_image",
        "status",
    ];

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(self.category_id)
            .bind(&self.sub_category_name)
            .bind(&self.sub_category_image)
            .bind(self.status.as_str())
    }
}
