use axum::extract::{Path, State};
use tracing::{info, instrument, warn};

use super::{
    dto::BillingPayload,
    repo_types::{BillingAddress, NewBillingAddress},
};
use crate::{
    auth::{AdminUser, AuthUser, MemberUser},
    crud::{destroy, listing, load},
    error::{ApiResult, AppError},
    response::ApiResponse,
    state::AppState,
    store::Collection,
    upload::JsonBody,
    validate::parse_id,
};

const MISSING: &str = "Billing address not found";
const NOT_OWNER: &str = "You can only access your own billing address";

fn all_fields_required() -> AppError {
    warn!("billing address create with missing fields");
    AppError::bad_request(
        "name, contactNo, address, city, state, country and pincode are required",
    )
}

#[instrument(skip(state, payload))]
pub async fn create_billing(
    State(state): State<AppState>,
    MemberUser(caller): MemberUser,
    JsonBody(payload): JsonBody<BillingPayload>,
) -> ApiResult<BillingAddress> {
    let new = NewBillingAddress {
        name: payload.name.ok_or_else(all_fields_required)?,
        contact_no: payload.contact_no.ok_or_else(all_fields_required)?,
        address: payload.address.ok_or_else(all_fields_required)?,
        city: payload.city.ok_or_else(all_fields_required)?,
        state: payload.state.ok_or_else(all_fields_required)?,
        country: payload.country.ok_or_else(all_fields_required)?,
        pincode: payload.pincode.ok_or_else(all_fields_required)?,
    };

    let billing = state.billing.insert(BillingAddress::new(caller.id, new)).await?;

    info!(billing_id = %billing.id, owner_id = %caller.id, "billing address created");
    Ok(ApiResponse::created("Billing address created successfully", billing))
}

#[instrument(skip(state))]
pub async fn list_billing_addresses(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Vec<BillingAddress>> {
    let addresses = state.billing.find_all().await?;
    Ok(listing(
        addresses,
        "No billing addresses found",
        "Billing addresses fetched successfully",
    ))
}

#[instrument(skip(state))]
pub async fn get_billing_address(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<BillingAddress> {
    let id = parse_id(&id, "billing address")?;
    let billing = load(state.billing.as_ref(), id, MISSING).await?;
    caller.ensure_self_or_admin(billing.owner_id, NOT_OWNER)?;
    Ok(ApiResponse::ok("Billing address fetched successfully", billing))
}

#[instrument(skip(state, payload))]
pub async fn update_billing_address(
    State(state): State<AppState>,
    MemberUser(caller): MemberUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<BillingPayload>,
) -> ApiResult<BillingAddress> {
    let id = parse_id(&id, "billing address")?;
    let mut billing = load(state.billing.as_ref(), id, MISSING).await?;
    caller.ensure_self(billing.owner_id, NOT_OWNER)?;

    let BillingPayload {
        name,
        contact_no,
        address,
        city,
        state: region,
        country,
        pincode,
    } = payload;
    for (slot, value) in [
        (&mut billing.name, name),
        (&mut billing.contact_no, contact_no),
        (&mut billing.address, address),
        (&mut billing.city, city),
        (&mut billing.state, region),
        (&mut billing.country, country),
        (&mut billing.pincode, pincode),
    ] {
        if let Some(value) = value {
            *slot = value;
        }
    }
    let billing = state.billing.update(billing).await?;

    info!(billing_id = %billing.id, "billing address updated");
    Ok(ApiResponse::ok("Billing address updated successfully", billing))
}

#[instrument(skip(state))]
pub async fn delete_billing_address(
    State(state): State<AppState>,
    MemberUser(caller): MemberUser,
    Path(id): Path<String>,
) -> ApiResult {
    let id = parse_id(&id, "billing address")?;
    let billing = load(state.billing.as_ref(), id, MISSING).await?;
    caller.ensure_self(billing.owner_id, NOT_OWNER)?;
    destroy(state.billing.as_ref(), state.media.as_ref(), &billing).await?;

    info!(billing_id = %id, "billing address deleted");
    Ok(ApiResponse::message("Billing address deleted successfully"))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::test_support::{delete, get, json_request, TestApp};

    fn address() -> Value {
        json!({
            "name": "Asha",
            "contactNo": 9876500001u64,
            "address": "12 MG Road",
            "city": "Pune",
            "state": "Maharashtra",
            "country": "India",
            "pincode": "411001",
        })
    }

    async fn create(app: &TestApp, token: &str) -> String {
        let (status, body) = app
            .send(json_request(Method::POST, "/api/createbilling", Some(token), address()))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn owner_is_the_caller() {
        let app = TestApp::new();
        let (user, token) = app.seed_user("9000006001").await;
        let (status, body) = app
            .send(json_request(Method::POST, "/api/createbilling", Some(&token), address()))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["userId"], user.id.to_string());
        assert_eq!(body["data"]["contactNo"], "9876500001");
    }

    #[tokio::test]
    async fn admins_cannot_create_and_fields_are_required() {
        let app = TestApp::new();
        let (_, admin) = app.seed_admin().await;
        let (_, user) = app.seed_user("9000006002").await;

        let (status, _) = app
            .send(json_request(Method::POST, "/api/createbilling", Some(&admin), address()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let mut partial = address();
        partial["pincode"] = json!("");
        let (status, body) = app
            .send(json_request(Method::POST, "/api/createbilling", Some(&user), partial))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("pincode"));
    }

    #[tokio::test]
    async fn reads_are_owner_or_admin() {
        let app = TestApp::new();
        let (_, admin) = app.seed_admin().await;
        let (_, owner) = app.seed_user("9000006003").await;
        let (_, stranger) = app.seed_user("9000006004").await;
        let id = create(&app, &owner).await;
        let uri = format!("/api/getBillingAddressById/{id}");

        assert_eq!(app.send(get(&uri, Some(&owner))).await.0, StatusCode::OK);
        assert_eq!(app.send(get(&uri, Some(&admin))).await.0, StatusCode::OK);
        assert_eq!(app.send(get(&uri, Some(&stranger))).await.0, StatusCode::FORBIDDEN);

        assert_eq!(
            app.send(get("/api/getAllBillingAddress", Some(&owner))).await.0,
            StatusCode::FORBIDDEN
        );
        let (status, body) = app.send(get("/api/getAllBillingAddress", Some(&admin))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn only_the_owner_updates_or_deletes() {
        let app = TestApp::new();
        let (_, owner) = app.seed_user("9000006005").await;
        let (_, stranger) = app.seed_user("9000006006").await;
        let id = create(&app, &owner).await;
        let update_uri = format!("/api/updateBillingAddress/{id}");
        let delete_uri = format!("/api/deleteBillingAddress/{id}");

        let (status, _) = app
            .send(json_request(Method::PUT, &update_uri, Some(&stranger), json!({"city": "Goa"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(app.send(delete(&delete_uri, Some(&stranger))).await.0, StatusCode::FORBIDDEN);

        let (status, body) = app
            .send(json_request(Method::PUT, &update_uri, Some(&owner), json!({"city": "Mumbai"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["city"], "Mumbai");
        assert_eq!(body["data"]["pincode"], "411001");

        assert_eq!(app.send(delete(&delete_uri, Some(&owner))).await.0, StatusCode::OK);
        assert_eq!(app.send(delete(&delete_uri, Some(&owner))).await.0, StatusCode::NOT_FOUND);
    }
}
