use axum::extract::{Path, State};
use tracing::{info, instrument, warn};

use super::{
    dto::{CategoryImage, CategoryPayload},
    repo_types::Category,
};
use crate::{
    auth::AdminUser,
    crud::{destroy, listing, load},
    error::{ApiResult, AppError},
    response::ApiResponse,
    state::AppState,
    store::Collection,
    upload::{commit, commit_replacing, ImageForm},
    validate::parse_id,
};

const DUPLICATE: &str = "Category already exists";
const MISSING: &str = "Category not found";

#[instrument(skip(state, form))]
pub async fn create_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    form: ImageForm<CategoryImage>,
) -> ApiResult<Category> {
    let (payload, image) = form.into_parts::<CategoryPayload>()?;
    let (Some(name), Some(status)) = (payload.category_name, payload.status) else {
        warn!("category create with missing fields");
        return Err(AppError::bad_request("category_name and status are required"));
    };

    let category = Category::new(name, status, image.as_ref().map(|i| i.path().to_string()));
    let category = state
        .categories
        .insert(category)
        .await
        .map_err(|e| e.or_conflict(DUPLICATE))?;
    commit(image);

    info!(category_id = %category.id, "category created");
    Ok(ApiResponse::created("Category created successfully", category))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Vec<Category>> {
    let categories = state.categories.find_all().await?;
    Ok(listing(
        categories,
        "No categories found",
        "Categories fetched successfully",
    ))
}

#[instrument(skip(state))]
pub async fn get_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<Category> {
    let id = parse_id(&id, "category")?;
    let category = load(state.categories.as_ref(), id, MISSING).await?;
    Ok(ApiResponse::ok("Category fetched successfully", category))
}

#[instrument(skip(state, form))]
pub async fn update_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    form: ImageForm<CategoryImage>,
) -> ApiResult<Category> {
    let id = parse_id(&id, "category")?;
    let (payload, image) = form.into_parts::<CategoryPayload>()?;
    let mut category = load(state.categories.as_ref(), id, MISSING).await?;

    if let Some(name) = payload.category_name {
        category.category_name = name;
    }
    if let Some(status) = payload.status {
        category.status = status;
    }
    let previous = image
        .as_ref()
        .and_then(|i| i.swap_into(&mut category.category_image));

    let category = state
        .categories
        .update(category)
        .await
        .map_err(|e| e.or_conflict(DUPLICATE))?;
    commit_replacing(state.media.as_ref(), image, previous).await;

    info!(category_id = %category.id, "category updated");
    Ok(ApiResponse::ok("Category updated successfully", category))
}

#[instrument(skip(state))]
pub async fn delete_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult {
    let id = parse_id(&id, "category")?;
    let category = load(state.categories.as_ref(), id, MISSING).await?;
    destroy(state.categories.as_ref(), state.media.as_ref(), &category).await?;

    info!(category_id = %id, "category deleted");
    Ok(ApiResponse::message("Category deleted successfully"))
}
