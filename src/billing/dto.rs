use serde::Deserialize;

use crate::validate::opt_text;

#[derive(Debug, Default, Deserialize)]
pub struct BillingPayload {
    #[serde(default, deserialize_with = "opt_text")]
    pub name: Option<String>,
    #[serde(rename = "contactNo", default, deserialize_with = "opt_text")]
    pub contact_no: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub pincode: Option<String>,
}
