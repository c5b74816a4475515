use axum::extract::{Path, State};
use tracing::{info, instrument, warn};

use super::{dto::UnitPayload, repo_types::Unit};
use crate::{
    auth::{AdminUser, AuthUser},
    crud::{destroy, listing, load},
    error::{ApiResult, AppError},
    response::ApiResponse,
    state::AppState,
    store::Collection,
    upload::JsonBody,
    validate::parse_id,
};

const DUPLICATE: &str = "This unit already exists";
const MISSING: &str = "Unit not found";

#[instrument(skip(state, payload))]
pub async fn create_unit(
    State(state): State<AppState>,
    _admin: AdminUser,
    JsonBody(payload): JsonBody<UnitPayload>,
) -> ApiResult<Unit> {
    let (Some(unit_name), Some(short_name), Some(status)) =
        (payload.unit_name, payload.short_name, payload.status)
    else {
        warn!("unit create with missing fields");
        return Err(AppError::bad_request(
            "unit_name, short_name and status are required",
        ));
    };

    let unit = state
        .units
        .insert(Unit::new(unit_name, short_name, status))
        .await
        .map_err(|e| e.or_conflict(DUPLICATE))?;

    info!(unit_id = %unit.id, "unit created");
    Ok(ApiResponse::created("Unit created successfully", unit))
}

#[instrument(skip(state))]
pub async fn list_units(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Vec<Unit>> {
    let units = state.units.find_all().await?;
    Ok(listing(units, "No units found", "Units fetched successfully"))
}

#[instrument(skip(state))]
pub async fn get_unit(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Unit> {
    let id = parse_id(&id, "unit")?;
    let unit = load(state.units.as_ref(), id, MISSING).await?;
    Ok(ApiResponse::ok("Unit fetched successfully", unit))
}

#[instrument(skip(state, payload))]
pub async fn update_unit(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UnitPayload>,
) -> ApiResult<Unit> {
    let id = parse_id(&id, "unit")?;
    let mut unit = load(state.units.as_ref(), id, MISSING).await?;

    if let Some(name) = payload.unit_name {
        unit.unit_name = name;
    }
    if let Some(short) = payload.short_name {
        unit.short_name = short;
    }
    if let Some(status) = payload.status {
        unit.status = status;
    }

    let unit = state
        .units
        .update(unit)
        .await
        .map_err(|e| e.or_conflict(DUPLICATE))?;

    info!(unit_id = %unit.id, "unit updated");
    Ok(ApiResponse::ok("Unit updated successfully", unit))
}

#[instrument(skip(state))]
pub async fn delete_unit(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult {
    let id = parse_id(&id, "unit")?;
    let unit = load(state.units.as_ref(), id, MISSING).await?;
    destroy(state.units.as_ref(), state.media.as_ref(), &unit).await?;

    info!(unit_id = %id, "unit deleted");
    Ok(ApiResponse::message("Unit deleted successfully"))
}
