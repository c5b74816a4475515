use serde::Deserialize;

use crate::{
    status::{opt_status, Status},
    upload::ImageKind,
    validate::opt_text,
};

pub enum SubCategoryImage {}

impl ImageKind for SubCategoryImage {
    const FIELD: &'static str = "subCategory_image";
    const DIR: &'static str = "subcategory_image";
}

#[derive(Debug, Default, Deserialize)]
pub struct SubCategoryPayload {
    #[serde(rename = "categoryId", default, deserialize_with = "opt_text")]
    pub category_id: Option<String>,
    #[serde(rename = "subCategory_name", default, deserialize_with = "opt_text")]
    pub sub_category_name: Option<String>,
    #[serde(default, deserialize_with = "opt_status")]
    pub status: Option<Status>,
}
