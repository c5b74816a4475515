use serde::Deserialize;

use crate::validate::opt_text;

#[derive(Debug, Default, Deserialize)]
pub struct PolicyPayload {
    #[serde(default, deserialize_with = "opt_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    pub description: Option<String>,
}
