use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::{state::AppState, upload::IMAGE_BODY_LIMIT};

mod claims;
mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
pub mod otp;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod sms;

pub use extractors::{AdminUser, AuthUser, MemberUser};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(register_routes())
        .merge(login_routes())
}

fn register_routes() -> Router<AppState> {
    Router::new()
        .route("/registerAdmin", post(handlers::register_admin))
        .route("/registerUser", post(handlers::register_user))
        .route("/verifyPhone", post(handlers::verify_phone))
        .route("/getRegisterById/:id", get(handlers::get_register_by_id))
        .route("/getAllUsers", get(handlers::get_all_users))
        .route(
            "/updateProfileAdmin/:id",
            put(handlers::update_profile_admin).layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
        .route(
            "/updateProfileUser/:id",
            put(handlers::update_profile_user).layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT)),
        )
}

fn login_routes() -> Router<AppState> {
    Router::new()
        .route("/adminLogin", post(handlers::admin_login))
        .route("/changePassword", post(handlers::change_password))
}
