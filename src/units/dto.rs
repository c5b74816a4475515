use serde::Deserialize;

use crate::{
    status::{opt_status, Status},
    validate::opt_text,
};

#[derive(Debug, Default, Deserialize)]
pub struct UnitPayload {
    #[serde(default, deserialize_with = "opt_text")]
    pub unit_name: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub short_name: Option<String>,
    #[serde(default, deserialize_with = "opt_status")]
    pub status: Option<Status>,
}
