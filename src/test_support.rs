//! Helpers for driving the real router in handler tests.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::FromRef,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use time::{macros::format_description, Duration, OffsetDateTime};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    app::build_app,
    auth::{
        jwt::JwtKeys,
        otp::{contact_candidates, generate_otp, otp_expiry},
        password::hash_password,
        repo::AccountStore,
        repo_types::{Account, NewAdmin},
    },
    categories::Category,
    media::MemoryMediaStore,
    state::AppState,
    status::Status,
    store::Collection,
    subcategories::SubCategory,
    validate::today,
};

const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestApp {
    pub state: AppState,
    pub media: Arc<MemoryMediaStore>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let media = Arc::new(MemoryMediaStore::new());
        let state = AppState::fake(media.clone());
        let router = build_app(state.clone());
        Self {
            state,
            media,
            router,
        }
    }

    /// Sends a request and returns the status with the parsed JSON body
    /// (`Value::Null` for an empty body).
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("router is infallible");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }

    pub fn token_for(&self, account: &Account) -> String {
        JwtKeys::from_ref(&self.state)
            .sign(account)
            .expect("sign test token")
    }

    pub async fn seed_admin(&self) -> (Account, String) {
        let admin = self
            .state
            .accounts
            .insert(Account::admin(NewAdmin {
                name: "Admin".into(),
                gender: "female".into(),
                email: "admin@shop.test".into(),
                contact_no: "9000000000".into(),
                password_hash: hash_password(ADMIN_PASSWORD).expect("hash"),
            }))
            .await
            .expect("seed admin");
        let token = self.token_for(&admin);
        (admin, token)
    }

    /// A verified user account.
    pub async fn seed_user(&self, contact_no: &str) -> (Account, String) {
        let mut user = Account::pending_user(
            contact_no.to_string(),
            generate_otp(),
            otp_expiry(OffsetDateTime::now_utc()),
        );
        user.clear_otp();
        let user = self.state.accounts.insert(user).await.expect("seed user");
        let token = self.token_for(&user);
        (user, token)
    }

    async fn account_by_contact(&self, contact_no: &str) -> Account {
        self.state
            .accounts
            .find_by_contact(&contact_candidates(contact_no))
            .await
            .expect("lookup")
            .expect("account exists")
    }

    /// The OTP currently waiting on the account for `contact_no`.
    pub async fn pending_otp(&self, contact_no: &str) -> String {
        self.account_by_contact(contact_no)
            .await
            .otp
            .expect("otp pending")
    }

    /// Moves the pending OTP's expiry into the past.
    pub async fn expire_otp(&self, contact_no: &str) {
        let mut account = self.account_by_contact(contact_no).await;
        account.otp_expires_at = Some(OffsetDateTime::now_utc() - Duration::minutes(1));
        self.state.accounts.update(account).await.expect("expire otp");
    }

    pub async fn seed_category(&self, name: &str) -> Category {
        self.state
            .categories
            .insert(Category::new(name.to_string(), Status::Active, None))
            .await
            .expect("seed category")
    }

    pub async fn seed_sub_category(&self, category_id: Uuid, name: &str) -> SubCategory {
        self.state
            .sub_categories
            .insert(SubCategory::new(category_id, name.to_string(), Status::Active, None))
            .await
            .expect("seed subcategory")
    }
}

/// `YYYY-MM-DD` for today plus `offset` days.
pub fn day(offset: i64) -> String {
    (today() + Duration::days(offset))
        .format(format_description!("[year]-[month]-[day]"))
        .expect("format date")
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request(Method::GET, uri, token)
        .body(Body::empty())
        .expect("request")
}

pub fn delete(uri: &str, token: Option<&str>) -> Request<Body> {
    request(Method::DELETE, uri, token)
        .body(Body::empty())
        .expect("request")
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request(method, uri, token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

/// A file part for [`multipart_request`].
pub struct Upload {
    field: String,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl Upload {
    pub fn new(field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        Self {
            field: field.to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    pub fn png(field: &str) -> Self {
        Self::new(field, "picture.png", "image/png", b"\x89PNG\r\n\x1a\nfake")
    }
}

pub fn multipart_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    fields: &[(&str, &str)],
    upload: Option<Upload>,
) -> Request<Body> {
    const BOUNDARY: &str = "shop-admin-test-boundary";
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(up) = upload {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                up.field, up.file_name, up.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&up.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    request(method, uri, token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}
