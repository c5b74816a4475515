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

pub use repo_types::Offer;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(read_routes())
        .merge(write_routes())
}

fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/getAllOffer", get(handlers::list_offers))
        .route("/getOfferById/:id", get(handlers::get_offer))
}

fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/addOffer", post(handlers::add_offer))
        .route("/updateOffer/:id", put(handlers::update_offer))
        .route("/deleteOffer/:id", delete(handlers::delete_offer))
        .layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT))
}
