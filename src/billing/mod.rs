mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

pub use repo_types::BillingAddress;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/createbilling", post(handlers::create_billing))
        .route("/getAllBillingAddress", get(handlers::list_billing_addresses))
        .route("/getBillingAddressById/:id", get(handlers::get_billing_address))
        .route("/updateBillingAddress/:id", put(handlers::update_billing_address))
        .route("/deleteBillingAddress/:id", delete(handlers::delete_billing_address))
}
