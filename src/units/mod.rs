mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

pub use repo_types::Unit;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/createUnit", post(handlers::create_unit))
        .route("/getAllUnit", get(handlers::list_units))
        .route("/getUnitById/:id", get(handlers::get_unit))
        .route("/updateUnit/:id", put(handlers::update_unit))
        .route("/deleteUnit/:id", delete(handlers::delete_unit))
}
