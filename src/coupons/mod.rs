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

pub use repo_types::Coupon;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(read_routes())
        .merge(write_routes())
}

fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/getAllCoupon", get(handlers::list_coupons))
        .route("/getCouponById/:id", get(handlers::get_coupon))
}

fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/addCoupon", post(handlers::add_coupon))
        .route("/updateCoupon/:id", put(handlers::update_coupon))
        .route("/deleteCoupon/:id", delete(handlers::delete_coupon))
        .layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT))
}
