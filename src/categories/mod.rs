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

pub use repo_types::Category;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(read_routes())
        .merge(write_routes())
}

fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/getAllCategories", get(handlers::list_categories))
        .route("/getCategoryById/:id", get(handlers::get_category))
}

fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/createCategory", post(handlers::create_category))
        .route("/updateCategory/:id", put(handlers::update_category))
        .route("/deleteCategory/:id", delete(handlers::delete_category))
        .layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT))
}
