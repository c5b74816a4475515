use axum::extract::{Path, State};
use tracing::{info, instrument, warn};

use super::{
    dto::{CouponImage, CouponPayload},
    repo_types::{Coupon, NewCoupon},
};
use crate::{
    auth::{AdminUser, AuthUser},
    crud::{destroy, listing, load},
    error::{ApiResult, AppError},
    response::ApiResponse,
    state::AppState,
    store::Collection,
    upload::{commit, commit_replacing, ImageForm},
    validate::{new_validity_window, parse_id, revised_window, today},
};

const DUPLICATE: &str = "Coupon name or code already exists";
const MISSING: &str = "Coupon not found";

#[instrument(skip(state, form))]
pub async fn add_coupon(
    State(state): State<AppState>,
    _admin: AdminUser,
    form: ImageForm<CouponImage>,
) -> ApiResult<Coupon> {
    let (payload, image) = form.into_parts::<CouponPayload>()?;
    let (Some(name), Some(code), Some(price), Some(start), Some(end)) = (
        payload.name,
        payload.code,
        payload.price,
        payload.start_date,
        payload.end_date,
    ) else {
        warn!("coupon create with missing fields");
        return Err(AppError::bad_request(
            "name, code, price, start_date and end_date are required",
        ));
    };
    let (start_date, end_date) = new_validity_window(&start, &end, today())?;

    let coupon = Coupon::new(NewCoupon {
        name,
        code,
        price,
        start_date,
        end_date,
        status: payload.status.unwrap_or_default(),
        coupon_image: image.as_ref().map(|i| i.path().to_string()),
    });
    let coupon = state
        .coupons
        .insert(coupon)
        .await
        .map_err(|e| e.or_conflict(DUPLICATE))?;
    commit(image);

    info!(coupon_id = %coupon.id, "coupon created");
    Ok(ApiResponse::created("Coupon created successfully", coupon))
}

#[instrument(skip(state))]
pub async fn list_coupons(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Vec<Coupon>> {
    let coupons = state.coupons.find_all().await?;
    Ok(listing(coupons, "No coupons found", "Coupons fetched successfully"))
}

#[instrument(skip(state))]
pub async fn get_coupon(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Coupon> {
    let id = parse_id(&id, "coupon")?;
    let coupon = load(state.coupons.as_ref(), id, MISSING).await?;
    Ok(ApiResponse::ok("Coupon fetched successfully", coupon))
}

#[instrument(skip(state, form))]
pub async fn update_coupon(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    form: ImageForm<CouponImage>,
) -> ApiResult<Coupon> {
    let id = parse_id(&id, "coupon")?;
    let (payload, image) = form.into_parts::<CouponPayload>()?;
    let mut coupon = load(state.coupons.as_ref(), id, MISSING).await?;

    (coupon.start_date, coupon.end_date) = revised_window(
        (coupon.start_date, coupon.end_date),
        payload.start_date.as_deref(),
        payload.end_date.as_deref(),
    )?;
    if let Some(name) = payload.name {
        coupon.name = name;
    }
    if let Some(code) = payload.code {
        coupon.code = code;
    }
    if let Some(price) = payload.price {
        coupon.price = price;
    }
    if let Some(status) = payload.status {
        coupon.status = status;
    }
    let previous = image
        .as_ref()
        .and_then(|i| i.swap_into(&mut coupon.coupon_image));

    let coupon = state
        .coupons
        .update(coupon)
        .await
        .map_err(|e| e.or_conflict(DUPLICATE))?;
    commit_replacing(state.media.as_ref(), image, previous).await;

    info!(coupon_id = %coupon.id, "coupon updated");
    Ok(ApiResponse::ok("Coupon updated successfully", coupon))
}

#[instrument(skip(state))]
pub async fn delete_coupon(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult {
    let id = parse_id(&id, "coupon")?;
    let coupon = load(state.coupons.as_ref(), id, MISSING).await?;
    destroy(state.coupons.as_ref(), state.media.as_ref(), &coupon).await?;

    info!(coupon_id = %id, "coupon deleted");
    Ok(ApiResponse::message("Coupon deleted successfully"))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::test_support::{day, delete, get, json_request, multipart_request, TestApp, Upload};

    fn coupon_body(name: &str, code: &str) -> serde_json::Value {
        json!({
            "name": name,
            "code": code,
            "price": 150,
            "start_date": day(1),
            "end_date": day(30),
        })
    }

    #[tokio::test]
    async fn create_defaults_status_and_reads_need_a_token() {
        let app = TestApp::new();
        let (_, admin) = app.seed_admin().await;
        let (_, user) = app.seed_user("9000002001").await;

        let (status, body) = app
            .send(json_request(Method::POST, "/api/addCoupon", Some(&admin), coupon_body("Diwali", "DIWALI10")))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["data"]["status"], "Active");
        assert_eq!(body["data"]["start_date"], day(1));
        assert_eq!(body["data"]["price"], 150.0);
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = app
            .send(get(&format!("/api/getCouponById/{id}"), Some(&user)))
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.send(get("/api/getAllCoupon", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .send(json_request(Method::POST, "/api/addCoupon", Some(&user), coupon_body("X", "X")))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn date_window_rules_on_create() {
        let app = TestApp::new();
        let (_, token) = app.seed_admin().await;
        let cases = [
            (json!({"start_date": "2020-01-01", "end_date": day(10)}), "Start date cannot be in the past"),
            (json!({"start_date": day(0), "end_date": day(10)}), "Start date cannot be in the past"),
            (json!({"start_date": day(5), "end_date": day(5)}), "End date must be after start date"),
            (json!({"start_date": "2030/01/01", "end_date": day(5)}), "Date format should be YYYY-MM-DD"),
        ];
        for (dates, message) in cases {
            let mut body = coupon_body("Summer", "SUMMER");
            body["start_date"] = dates["start_date"].clone();
            body["end_date"] = dates["end_date"].clone();
            let (status, resp) = app
                .send(json_request(Method::POST, "/api/addCoupon", Some(&token), body))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{dates}");
            assert_eq!(resp["message"], message);
        }
    }

    #[tokio::test]
    async fn price_must_be_a_positive_finite_number() {
        let app = TestApp::new();
        let (_, token) = app.seed_admin().await;

        for price in [json!("NaN"), json!("inf"), json!(-5), json!("-5"), json!(0), json!("0")] {
            let mut body = coupon_body("Festive", "FEST");
            body["price"] = price.clone();
            let (status, resp) = app
                .send(json_request(Method::POST, "/api/addCoupon", Some(&token), body))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{price}");
            assert!(
                resp["message"].as_str().unwrap().starts_with("Invalid request body"),
                "{resp}"
            );
        }
        let (_, body) = app.send(get("/api/getAllCoupon", Some(&token))).await;
        assert_eq!(body["data"], json!([]));

        let (status, body) = app
            .send(json_request(Method::POST, "/api/addCoupon", Some(&token), coupon_body("Festive", "FEST")))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/api/updateCoupon/{}", body["data"]["id"].as_str().unwrap());
        let (status, _) = app
            .send(json_request(Method::PUT, &uri, Some(&token), json!({"price": "NaN"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (_, body) = app.send(get(&uri.replace("updateCoupon", "getCouponById"), Some(&token))).await;
        assert_eq!(body["data"]["price"], 150.0);
    }

    #[tokio::test]
    async fn name_and_code_are_each_unique() {
        let app = TestApp::new();
        let (_, token) = app.seed_admin().await;
        let add = |name: &str, code: &str| {
            json_request(Method::POST, "/api/addCoupon", Some(&token), coupon_body(name, code))
        };

        assert_eq!(app.send(add("Holi", "HOLI")).await.0, StatusCode::CREATED);
        let (status, body) = app.send(add("Holi", "OTHER")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Coupon name or code already exists");
        assert_eq!(app.send(add("Other", "HOLI")).await.0, StatusCode::BAD_REQUEST);

        let (_, body) = app.send(get("/api/getAllCoupon", Some(&token))).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_checks_moved_end_against_kept_start() {
        let app = TestApp::new();
        let (_, token) = app.seed_admin().await;
        let (_, body) = app
            .send(json_request(Method::POST, "/api/addCoupon", Some(&token), coupon_body("Eid", "EID")))
            .await;
        let uri = format!("/api/updateCoupon/{}", body["data"]["id"].as_str().unwrap());

        let (status, body) = app
            .send(json_request(Method::PUT, &uri, Some(&token), json!({"end_date": day(1)})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "End date must be after start date");

        let (status, body) = app
            .send(json_request(
                Method::PUT,
                &uri,
                Some(&token),
                json!({"end_date": day(60), "price": "99.5", "status": "Inactive"}),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["end_date"], day(60));
        assert_eq!(body["data"]["price"], 99.5);
        assert_eq!(body["data"]["status"], "Inactive");
        assert_eq!(body["data"]["name"], "Eid");
    }

    #[tokio::test]
    async fn multipart_create_and_delete_with_image() {
        let app = TestApp::new();
        let (_, token) = app.seed_admin().await;
        let (start, end) = (day(2), day(9));
        let (status, body) = app
            .send(multipart_request(
                Method::POST,
                "/api/addCoupon",
                Some(&token),
                &[
                    ("name", "Monsoon"),
                    ("code", "RAIN"),
                    ("price", "49"),
                    ("start_date", start.as_str()),
                    ("end_date", end.as_str()),
                ],
                Some(Upload::png("coupon_image")),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        let image = body["data"]["coupon_image"].as_str().unwrap().to_string();
        assert!(app.media.contains(&image));

        let id = body["data"]["id"].as_str().unwrap();
        let (status, _) = app
            .send(delete(&format!("/api/deleteCoupon/{id}"), Some(&token)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!app.media.contains(&image));

        let (status, body) = app
            .send(get(&format!("/api/getCouponById/{id}"), Some(&token)))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Coupon not found");
    }

    #[tokio::test]
    async fn rejected_dates_discard_the_upload() {
        let app = TestApp::new();
        let (_, token) = app.seed_admin().await;
        let end = day(9);
        let (status, _) = app
            .send(multipart_request(
                Method::POST,
                "/api/addCoupon",
                Some(&token),
                &[
                    ("name", "Old"),
                    ("code", "OLD"),
                    ("price", "1"),
                    ("start_date", "2020-01-01"),
                    ("end_date", end.as_str()),
                ],
                Some(Upload::png("coupon_image")),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.media.is_empty());
    }
}
