use serde::Deserialize;

use crate::{
    status::{opt_status, Status},
    upload::ImageKind,
    validate::{opt_number, opt_price, opt_text},
};

pub enum OfferImage {}

impl ImageKind for OfferImage {
    const FIELD: &'static str = "offer_image";
    const DIR: &'static str = "offer_image";
}

#[derive(Debug, Default, Deserialize)]
pub struct OfferPayload {
    #[serde(rename = "categoryId", default, deserialize_with = "opt_text")]
    pub category_id: Option<String>,
    #[serde(rename = "subCategoryId", default, deserialize_with = "opt_text")]
    pub sub_category_id: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub offer_name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "opt_number")]
    pub discount: Option<f64>,
    #[serde(default, deserialize_with = "opt_price")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "opt_text")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "opt_number")]
    pub minimum_purchase: Option<f64>,
    #[serde(default, deserialize_with = "opt_number")]
    pub maximum_discount: Option<f64>,
    #[serde(default, deserialize_with = "opt_text")]
    pub offer_type: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "opt_status")]
    pub status: Option<Status>,
}
