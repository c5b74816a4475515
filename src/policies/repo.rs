use super::repo_types::PrivacyPolicy;
use crate::store::{postgres::PgQueryAs, PgDocument};

impl PgDocument for PrivacyPolicy {
    const TABLE: &'static str = "privacy_policies";
    const COLUMNS: &'static [&'static str] = &["title", "description"];

    fn bind_columns<'q>(&'q self, query: PgQueryAs<'q, Self>) -> PgQueryAs<'q, Self> {
        query.bind(&self.title).bind(&self.description)
    }
}
