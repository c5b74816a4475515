use axum::extract::{Path, State};
use tracing::{info, instrument, warn};

use super::{dto::PolicyPayload, repo_types::PrivacyPolicy};
use crate::{
    auth::AdminUser,
    crud::{destroy, listing, load},
    error::{ApiResult, AppError},
    response::ApiResponse,
    state::AppState,
    store::Collection,
    upload::JsonBody,
    validate::parse_id,
};

const MISSING: &str = "Privacy policy not found";

#[instrument(skip(state, payload))]
pub async fn create_policy(
    State(state): State<AppState>,
    _admin: AdminUser,
    JsonBody(payload): JsonBody<PolicyPayload>,
) -> ApiResult<PrivacyPolicy> {
    let (Some(title), Some(description)) = (payload.title, payload.description) else {
        warn!("privacy policy create with missing fields");
        return Err(AppError::bad_request("title and description are required"));
    };

    let policy = state
        .policies
        .insert(PrivacyPolicy::new(title, description))
        .await?;

    info!(policy_id = %policy.id, "privacy policy created");
    Ok(ApiResponse::created("Privacy policy created successfully", policy))
}

#[instrument(skip(state))]
pub async fn list_policies(State(state): State<AppState>) -> ApiResult<Vec<PrivacyPolicy>> {
    let policies = state.policies.find_all().await?;
    Ok(listing(
        policies,
        "No privacy policies found",
        "Privacy policies fetched successfully",
    ))
}

#[instrument(skip(state))]
pub async fn get_policy(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<PrivacyPolicy> {
    let id = parse_id(&id, "privacy policy")?;
    let policy = load(state.policies.as_ref(), id, MISSING).await?;
    Ok(ApiResponse::ok("Privacy policy fetched successfully", policy))
}

#[instrument(skip(state, payload))]
pub async fn update_policy(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<PolicyPayload>,
) -> ApiResult<PrivacyPolicy> {
    let id = parse_id(&id, "privacy policy")?;
    let mut policy = load(state.policies.as_ref(), id, MISSING).await?;

    if let Some(title) = payload.title {
        policy.title = title;
    }
    if let Some(description) = payload.description {
        policy.description = description;
    }
    let policy = state.policies.update(policy).await?;

    info!(policy_id = %policy.id, "privacy policy updated");
    Ok(ApiResponse::ok("Privacy policy updated successfully", policy))
}

#[instrument(skip(state))]
pub async fn delete_policy(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult {
    let id = parse_id(&id, "privacy policy")?;
    let policy = load(state.policies.as_ref(), id, MISSING).await?;
    destroy(state.policies.as_ref(), state.media.as_ref(), &policy).await?;

    info!(policy_id = %id, "privacy policy deleted");
    Ok(ApiResponse::message("Privacy policy deleted successfully"))
}
