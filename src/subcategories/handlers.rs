use axum::extract::{Path, State};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{SubCategoryImage, SubCategoryPayload},
    repo_types::SubCategory,
};
use crate::{
    auth::AdminUser,
    crud::{destroy, listing, load},
    error::{ApiResult, AppError},
    response::ApiResponse,
    state::AppState,
    store::Collection,
    upload::{commit, commit_replacing, ImageForm},
    validate::{parse_id, parse_ref},
};

const DUPLICATE: &str = "SubCategory already exists for this category.";
const MISSING: &str = "SubCategory not found";

/// Parses `categoryId` and confirms the category exists.
async fn existing_category(state: &AppState, raw: &str) -> Result<Uuid, AppError> {
    let id = parse_ref(raw, "categoryId")?;
    load(state.categories.as_ref(), id, "Category not found").await?;
    Ok(id)
}

#[instrument(skip(state, form))]
pub async fn create_sub_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    form: ImageForm<SubCategoryImage>,
) -> ApiResult<SubCategory> {
    let (payload, image) = form.into_parts::<SubCategoryPayload>()?;
    let (Some(name), Some(status), Some(category_id)) =
        (payload.sub_category_name, payload.status, payload.category_id)
    else {
        warn!("subcategory create with missing fields");
        return Err(AppError::bad_request(
            "subCategory_name, status, and categoryId are required",
        ));
    };
    let category_id = existing_category(&state, &category_id).await?;

    let sub_category = SubCategory::new(
        category_id,
        name,
        status,
        image.as_ref().map(|i| i.path().to_string()),
    );
    let sub_category = state
        .sub_categories
        .insert(sub_category)
        .await
        .map_err(|e| e.or_conflict(DUPLICATE))?;
    commit(image);

    info!(sub_category_id = %sub_category.id, %category_id, "subcategory created");
    Ok(ApiResponse::created("SubCategory created successfully", sub_category))
}

#[instrument(skip(state))]
pub async fn list_sub_categories(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> ApiResult<Vec<SubCategory>> {
    let items = state.sub_categories.find_all().await?;
    Ok(listing(
        items,
        "No subcategories found",
        "Subcategories fetched successfully",
    ))
}

#[instrument(skip(state))]
pub async fn get_sub_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult<SubCategory> {
    let id = parse_id(&id, "subcategory")?;
    let sub_category = load(state.sub_categories.as_ref(), id, MISSING).await?;
    Ok(ApiResponse::ok("SubCategory fetched successfully", sub_category))
}

#[instrument(skip(state, form))]
pub async fn update_sub_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    form: ImageForm<SubCategoryImage>,
) -> ApiResult<SubCategory> {
    let id = parse_id(&id, "subcategory")?;
    let (payload, image) = form.into_parts::<SubCategoryPayload>()?;
    let mut sub_category = load(state.sub_categories.as_ref(), id, MISSING).await?;

    if let Some(raw) = payload.category_id {
        sub_category.category_id = existing_category(&state, &raw).await?;
    }
    if let Some(name) = payload.sub_category_name {
        sub_category.sub_category_name = name;
    }
    if let Some(status) = payload.status {
        sub_category.status = status;
    }
    let previous = image
        .as_ref()
        .and_then(|i| i.swap_into(&mut sub_category.sub_category_image));

    let sub_category = state
        .sub_categories
        .update(sub_category)
        .await
        .map_err(|e| e.or_conflict(DUPLICATE))?;
    commit_replacing(state.media.as_ref(), image, previous).await;

    info!(sub_category_id = %sub_category.id, "subcategory updated");
    Ok(ApiResponse::ok("SubCategory updated successfully", sub_category))
}

#[instrument(skip(state))]
pub async fn delete_sub_category(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult {
    let id = parse_id(&id, "subcategory")?;
    let sub_category = load(state.sub_categories.as_ref(), id, MISSING).await?;
    destroy(state.sub_categories.as_ref(), state.media.as_ref(), &sub_category).await?;

    info!(sub_category_id = %id, "subcategory deleted");
    Ok(ApiResponse::message("SubCategory deleted successfully"))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use uuid::Uuid;

    use crate::test_support::{delete, get, json_request, multipart_request, TestApp, Upload};

    #[tokio::test]
    async fn create_requires_an_existing_category() {
        let app = TestApp::new();
        let (_, token) = app.seed_admin().await;
        let category = app.seed_category("Fruits").await;
        let create = |category_id: String| {
            json_request(
                Method::POST,
                "/api/createSubCategory",
                Some(&token),
                json!({"categoryId": category_id, "subCategory_name": "Citrus", "status": "Active"}),
            )
        };

        let (status, body) = app.send(create("bogus".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid categoryId format");

        let (status, body) = app.send(create(Uuid::new_v4().to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Category not found");

        let (status, body) = app.send(create(category.id.to_string())).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["data"]["categoryId"], category.id.to_string());
        assert_eq!(body["data"]["subCategory_name"], "Citrus");
    }

    #[tokio::test]
    async fn same_name_allowed_under_another_category() {
        let app = TestApp::new();
        let (_, token) = app.seed_admin().await;
        let fruits = app.seed_category("Fruits").await;
        let veg = app.seed_category("Vegetables").await;
        let create = |category_id: Uuid| {
            json_request(
                Method::POST,
                "/api/createSubCategory",
                Some(&token),
                json!({"categoryId": category_id, "subCategory_name": "Organic", "status": "Active"}),
            )
        };

        assert_eq!(app.send(create(fruits.id)).await.0, StatusCode::CREATED);
        assert_eq!(app.send(create(veg.id)).await.0, StatusCode::CREATED);

        let (status, body) = app.send(create(fruits.id)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "SubCategory already exists for this category.");
    }

    #[tokio::test]
    async fn bad_parent_on_create_discards_image() {
        let app = TestApp::new();
        let (_, token) = app.seed_admin().await;
        let unknown = Uuid::new_v4().to_string();
        let (status, _) = app
            .send(multipart_request(
                Method::POST,
                "/api/createSubCategory",
                Some(&token),
                &[
                    ("categoryId", unknown.as_str()),
                    ("subCategory_name", "Citrus"),
                    ("status", "Active"),
                ],
                Some(Upload::png("subCategory_image")),
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(app.media.is_empty());
    }

    #[tokio::test]
    async fn update_moves_to_another_category_and_deletes_cleanly() {
        let app = TestApp::new();
        let (_, token) = app.seed_admin().await;
        let fruits = app.seed_category("Fruits").await;
        let veg = app.seed_category("Vegetables").await;
        let fruits_id = fruits.id.to_string();

        let (_, body) = app
            .send(multipart_request(
                Method::POST,
                "/api/createSubCategory",
                Some(&token),
                &[
                    ("categoryId", fruits_id.as_str()),
                    ("subCategory_name", "Leafy"),
                    ("status", "Active"),
                ],
                Some(Upload::png("subCategory_image")),
            ))
            .await;
        let id = body["data"]["id"].as_str().unwrap().to_string();
        let image = body["data"]["subCategory_image"].as_str().unwrap().to_string();
        assert!(image.starts_with("/public/subcategory_image/"));

        let (status, body) = app
            .send(json_request(
                Method::PUT,
                &format!("/api/updateSubCategory/{id}"),
                Some(&token),
                json!({"categoryId": veg.id}),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["categoryId"], veg.id.to_string());
        assert_eq!(body["data"]["subCategory_name"], "Leafy");
        assert_eq!(body["data"]["subCategory_image"], image.as_str());

        let (status, _) = app
            .send(delete(&format!("/api/deleteSubCategory/{id}"), Some(&token)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!app.media.contains(&image));

        let (status, body) = app.send(get("/api/getAllSubCategories", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "No subcategories found");
    }

    #[tokio::test]
    async fn malformed_id_is_not_a_not_found() {
        let app = TestApp::new();
        let (_, token) = app.seed_admin().await;
        let (status, body) = app
            .send(get("/api/getSubCategoryById/not-an-id", Some(&token)))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid subcategory id format");
    }
}
