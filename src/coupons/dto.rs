use serde::Deserialize;

use crate::{
    status::{opt_status, Status},
    upload::ImageKind,
    validate::{opt_number, opt_price, opt_text},
};

pub enum CouponImage {}

impl ImageKind for CouponImage {
    const FIELD: &'static str = "coupon_image";
    const DIR: &'static str = "coupon_image";
}

#[derive(Debug, Default, Deserialize)]
pub struct CouponPayload {
    #[serde(default, deserialize_with = "opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "opt_price")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "opt_text")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "opt_status")]
    pub status: Option<Status>,
}
