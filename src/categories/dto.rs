use serde::Deserialize;

use crate::{status::{opt_status, Status}, upload::ImageKind, validate::opt_text};

pub enum CategoryImage {}

impl ImageKind for CategoryImage {
    const FIELD: &'static str = "category_image";
    const DIR: &'static str = "category_image";
}

/// Create and update body; every field is optional at this level.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryPayload {
    #[serde(default, deserialize_with = "opt_text")]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "opt_status")]
    pub status: Option<Status>,
}
