mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::{state::AppState, upload::IMAGE_BODY_LIMIT};

pub use repo_types::SubCategory;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(read_routes())
        .merge(write_routes())
}

fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/getAllSubCategories", get(handlers::list_sub_categories))
        .route("/getSubCategoryById/:id", get(handlers::get_sub_category))
}

fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/createSubCategory", post(handlers::create_sub_category))
        .route("/updateSubCategory/:id", put(handlers::update_sub_category))
        .route("/deleteSubCategory/:id", delete(handlers::delete_sub_category))
        .layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT))
}
