mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

pub use repo_types::PrivacyPolicy;

/// Policies are readable without a token; writes are admin-only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/createPrivacyPolicy", post(handlers::create_policy))
        .route("/getAllPrivacyPolicy", get(handlers::list_policies))
        .route("/getPrivacyPolicyById/:id", get(handlers::get_policy))
        .route("/updatePrivacyPolicy/:id", put(handlers::update_policy))
        .route("/deletePrivacyPolicy/:id", delete(handlers::delete_policy))
}
