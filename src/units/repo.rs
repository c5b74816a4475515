use super::repo_types::Unit;
use crate::store::{postgres::PgQueryAs, PgDocument};

impl PgDocument for Unit {
    const TABLE: &'static str = "units";
    const COLUMNS: &'static [&'static str] = &["unit_name", "short_name", "status"];

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query
            .bind(&self.unit_name)
            .bind(&self.short_name)
            .bind(self.status.as_str())
    }
}
