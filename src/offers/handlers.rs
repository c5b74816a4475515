use axum::extract::{Path, State};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{OfferImage, OfferPayload},
    repo_types::{NewOffer, Offer},
};
use crate::{
    auth::{AdminUser, AuthUser},
    crud::{destroy, listing, load},
    error::{ApiResult, AppError},
    response::ApiResponse,
    state::AppState,
    store::Collection,
    upload::{commit, commit_replacing, ImageForm},
    validate::{new_validity_window, parse_id, parse_ref, revised_window, today},
};

const DUPLICATE: &str = "Offer already exists.";
const MISSING: &str = "Offer not found";

fn all_fields_required() -> AppError {
    warn!("offer create with missing fields");
    AppError::bad_request("All fields are required")
}

async fn existing_category(state: &AppState, raw: &str) -> Result<Uuid, AppError> {
    let id = parse_ref(raw, "categoryId")?;
    load(state.categories.as_ref(), id, "Category not found").await?;
    Ok(id)
}

async fn existing_sub_category(state: &AppState, raw: &str) -> Result<Uuid, AppError> {
    let id = parse_ref(raw, "subCategoryId")?;
    load(state.sub_categories.as_ref(), id, "SubCategory not found").await?;
    Ok(id)
}

#[instrument(skip(state, form))]
pub async fn add_offer(
    State(state): State<AppState>,
    _admin: AdminUser,
    form: ImageForm<OfferImage>,
) -> ApiResult<Offer> {
    let (p, image) = form.into_parts::<OfferPayload>()?;
    let category_id = p.category_id.ok_or_else(all_fields_required)?;
    let sub_category_id = p.sub_category_id.ok_or_else(all_fields_required)?;
    let offer_name = p.offer_name.ok_or_else(all_fields_required)?;
    let code = p.code.ok_or_else(all_fields_required)?;
    let discount = p.discount.ok_or_else(all_fields_required)?;
    let price = p.price.ok_or_else(all_fields_required)?;
    let start = p.start_date.ok_or_else(all_fields_required)?;
    let end = p.end_date.ok_or_else(all_fields_required)?;
    let minimum_purchase = p.minimum_purchase.ok_or_else(all_fields_required)?;
    let maximum_discount = p.maximum_discount.ok_or_else(all_fields_required)?;
    let offer_type = p.offer_type.ok_or_else(all_fields_required)?;
    let description = p.description.ok_or_else(all_fields_required)?;
    let status = p.status.ok_or_else(all_fields_required)?;

    let category_id = existing_category(&state, &category_id).await?;
    let sub_category_id = existing_sub_category(&state, &sub_category_id).await?;
    let (start_date, end_date) = new_validity_window(&start, &end, today())?;

    let offer = Offer::new(NewOffer {
        category_id,
        sub_category_id,
        offer_name,
        code,
        discount,
        price,
        start_date,
        end_date,
        minimum_purchase,
        maximum_discount,
        offer_type,
        description,
        status,
        offer_image: image.as_ref().map(|i| i.path().to_string()),
    });
    let offer = state
        .offers
        .insert(offer)
        .await
        .map_err(|e| e.or_conflict(DUPLICATE))?;
    commit(image);

    info!(offer_id = %offer.id, %category_id, "offer created");
    Ok(ApiResponse::created("Offer created successfully", offer))
}

#[instrument(skip(state))]
pub async fn list_offers(State(state): State<AppState>, _user: AuthUser) -> ApiResult<Vec<Offer>> {
    let offers = state.offers.find_all().await?;
    Ok(listing(offers, "No offers found", "Offers fetched successfully"))
}

#[instrument(skip(state))]
pub async fn get_offer(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Offer> {
    let id = parse_id(&id, "offer")?;
    let offer = load(state.offers.as_ref(), id, MISSING).await?;
    Ok(ApiResponse::ok("Offer fetched successfully", offer))
}

#[instrument(skip(state, form))]
pub async fn update_offer(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    form: ImageForm<OfferImage>,
) -> ApiResult<Offer> {
    let id = parse_id(&id, "offer")?;
    let (p, image) = form.into_parts::<OfferPayload>()?;
    let mut offer = load(state.offers.as_ref(), id, MISSING).await?;

    if let Some(raw) = p.category_id {
        offer.category_id = existing_category(&state, &raw).await?;
    }
    if let Some(raw) = p.sub_category_id {
        offer.sub_category_id = existing_sub_category(&state, &raw).await?;
    }
    (offer.start_date, offer.end_date) = revised_window(
        (offer.start_date, offer.end_date),
        p.start_date.as_deref(),
        p.end_date.as_deref(),
    )?;

    if let Some(v) = p.offer_name {
        offer.offer_name = v;
    }
    if let Some(v) = p.code {
        offer.code = v;
    }
    if let Some(v) = p.discount {
        offer.discount = v;
    }
    if let Some(v) = p.price {
        offer.price = v;
    }
    if let Some(v) = p.minimum_purchase {
        offer.minimum_purchase = v;
    }
    if let Some(v) = p.maximum_discount {
        offer.maximum_discount = v;
    }
    if let Some(v) = p.offer_type {
        offer.offer_type = v;
    }
    if let Some(v) = p.description {
        offer.description = v;
    }
    if let Some(v) = p.status {
        offer.status = v;
    }
    let previous = image
        .as_ref()
        .and_then(|i| i.swap_into(&mut offer.offer_image));

    let offer = state
        .offers
        .update(offer)
        .await
        .map_err(|e| e.or_conflict(DUPLICATE))?;
    commit_replacing(state.media.as_ref(), image, previous).await;

    info!(offer_id = %offer.id, "offer updated");
    Ok(ApiResponse::ok("Offer updated successfully", offer))
}

#[instrument(skip(state))]
pub async fn delete_offer(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> ApiResult {
    let id = parse_id(&id, "offer")?;
    let offer = load(state.offers.as_ref(), id, MISSING).await?;
    destroy(state.offers.as_ref(), state.media.as_ref(), &offer).await?;

    info!(offer_id = %id, "offer deleted");
    Ok(ApiResponse::message("Offer deleted successfully"))
}
