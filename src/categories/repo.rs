use super::repo_types::Category;
use crate::store::{postgres::PgQueryAs, PgDocument};

impl PgDocument for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static [&'static str] = &["category_name", "category_image", "status"];

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(&self.category_name)
            .bind(&self.category_image)
            .bind(self.status.as_str())
    }
}
