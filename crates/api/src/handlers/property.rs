//! Handlers for the `/properties` resource.
//!
//! Create and update take `multipart/form-data`: listing fields as text parts
//! plus one image in the `image` part. The image is written to disk before the
//! text fields are validated, so every failure after that point removes it
//! again.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use realty_core::error::CoreError;
use realty_core::interest;
use realty_core::listing::{current_year, validate_listing_patch, validate_new_listing, ListingForm};
use realty_core::search::{current_page, parse_property_filter, total_pages, DEFAULT_PAGE_SIZE};
use realty_core::types::DbId;
use realty_core::upload::{image_extension, validate_image, IMAGE_FIELD};
use realty_db::models::property::{CreateProperty, Property};
use realty_db::repositories::PropertyRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{Json, Multipart, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{Page, PropertyListParams, SearchParams};
use crate::response::Success;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Body for endpoints returning a single listing.
#[derive(Debug, Serialize)]
pub struct PropertyBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub property: Property,
}

/// Body for `GET /properties`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPageBody {
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub properties: Vec<Property>,
}

/// Body for `GET /properties/search`.
#[derive(Debug, Serialize)]
pub struct PropertyListBody {
    pub properties: Vec<Property>,
}

/// Body for `DELETE /properties/{id}`.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

/// Body for `PUT /properties/{id}/interested`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestBody {
    pub message: &'static str,
    pub interested_users: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Multipart intake
// ---------------------------------------------------------------------------

/// An image part as received, before it is checked or stored.
struct ImageUpload {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

/// Drain a listing form: every text part into a [`ListingForm`], the
/// `image` part (if any) aside.
async fn read_listing_form(
    Multipart(mut multipart): Multipart,
) -> AppResult<(ListingForm, Option<ImageUpload>)> {
    let mut form = ListingForm::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == IMAGE_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            image = Some(ImageUpload {
                file_name,
                content_type,
                data,
            });
        } else if !name.is_empty() {
            let text = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            form.insert(name, text);
        }
    }

    Ok((form, image))
}

/// Check an image against the upload policy and write it to disk.
async fn store_image(state: &AppState, upload: &ImageUpload) -> AppResult<String> {
    let content_type = upload.content_type.as_deref();
    validate_image(content_type, upload.data.len(), state.config.max_upload_bytes)?;

    let extension = image_extension(upload.file_name.as_deref(), content_type.unwrap_or(""));
    state
        .images
        .save(&extension, &upload.data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store image: {e}")))
}

fn log_warnings(warnings: &[String], property_id: Option<DbId>) {
    for warning in warnings {
        tracing::warn!(?property_id, %warning, "Listing field coerced");
    }
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Property",
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/properties/createProperty
pub async fn create_property(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Success<PropertyBody>>)> {
    let (form, upload) = read_listing_form(multipart).await?;
    let upload = upload.ok_or_else(|| CoreError::Validation("Image is required.".into()))?;
    let image = store_image(&state, &upload).await?;

    let validated = match validate_new_listing(&form, current_year()) {
        Ok(v) => v,
        Err(e) => {
            state.images.remove(&image).await;
            return Err(e.into());
        }
    };
    log_warnings(&validated.warnings, None);

    let input = CreateProperty::from_listing(validated.value, image.clone());
    let property = match PropertyRepo::create(&state.pool, &input).await {
        Ok(p) => p,
        Err(e) => {
            state.images.remove(&image).await;
            return Err(e.into());
        }
    };
    tracing::info!(property_id = property.id, user_id = user.user_id, "Property created");

    Ok((
        StatusCode::CREATED,
        Json(Success::new(PropertyBody {
            message: Some("Property created successfully"),
            property,
        })),
    ))
}

/// GET /api/properties
pub async fn list_properties(
    State(state): State<AppState>,
    Query(params): Query<PropertyListParams>,
) -> AppResult<Json<Success<PropertyPageBody>>> {
    let filter = parse_property_filter(params.raw_filter())?;
    let page = Page::resolve(
        params.limit.as_deref(),
        params.offset.as_deref(),
        DEFAULT_PAGE_SIZE,
    )?;

    let result = PropertyRepo::list(&state.pool, &filter, page.limit, page.offset).await?;

    Ok(Json(Success::new(PropertyPageBody {
        total: result.total,
        current_page: current_page(page.offset, page.limit),
        total_pages: total_pages(result.total, page.limit),
        properties: result.rows,
    })))
}

/// GET /api/properties/search
pub async fn search_properties(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Success<PropertyListBody>>> {
    let term = params
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| CoreError::Validation("Search query is required.".into()))?;

    let properties = PropertyRepo::search(&state.pool, term).await?;
    Ok(Json(Success::new(PropertyListBody { properties })))
}

/// GET /api/properties/{id}
pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Success<PropertyBody>>> {
    let property = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(Success::new(PropertyBody {
        message: None,
        property,
    })))
}

/// PUT /api/properties/{id}
///
/// Partial update; a new `image` part replaces the stored image, and the old
/// file is deleted only once the row points at the new one.
pub async fn update_property(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<Success<PropertyBody>>> {
    let existing = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let (form, upload) = read_listing_form(multipart).await?;
    let new_image = match &upload {
        Some(upload) => Some(store_image(&state, upload).await?),
        None => None,
    };

    let result = apply_update(&state, &existing, &form, new_image.clone()).await;
    let updated = match result {
        Ok(p) => p,
        Err(e) => {
            if let Some(name) = &new_image {
                state.images.remove(name).await;
            }
            return Err(e);
        }
    };

    if new_image.is_some() && existing.image != updated.image {
        state.images.remove(&existing.image).await;
    }
    tracing::info!(property_id = id, user_id = admin.user_id, "Property updated");

    Ok(Json(Success::new(PropertyBody {
        message: Some("Property updated successfully"),
        property: updated,
    })))
}

async fn apply_update(
    state: &AppState,
    existing: &Property,
    form: &ListingForm,
    new_image: Option<String>,
) -> AppResult<Property> {
    let validated = validate_listing_patch(form, current_year())?;
    log_warnings(&validated.warnings, Some(existing.id));

    let merged = existing.merge_patch(validated.value, new_image);
    PropertyRepo::update(&state.pool, existing.id, &merged)
        .await?
        .ok_or_else(|| not_found(existing.id))
}

/// DELETE /api/properties/{id}
pub async fn delete_property(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<Success<MessageBody>>> {
    let property = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !PropertyRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    state.images.remove(&property.image).await;
    tracing::info!(property_id = id, user_id = admin.user_id, "Property deleted");

    Ok(Json(Success::new(MessageBody {
        message: "Property deleted successfully",
    })))
}

/// PUT /api/properties/{id}/interested
///
/// Add the caller to the listing's interested-user set. Idempotent.
pub async fn mark_interested(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Success<InterestBody>>> {
    let property = PropertyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let mut set = interest::normalize(&property.interested_users);
    if set.was_repaired() {
        tracing::warn!(
            property_id = id,
            stored = %property.interested_users,
            "Interested-user set was malformed; normalised"
        );
    }

    let message = if set.insert(user.user_id) {
        if !PropertyRepo::set_interested_users(&state.pool, id, &set.to_json()).await? {
            return Err(not_found(id));
        }
        tracing::info!(property_id = id, user_id = user.user_id, "User marked interest");
        "Marked as interested"
    } else {
        "Already marked as interested"
    };

    Ok(Json(Success::new(InterestBody {
        message,
        interested_users: set.ids().to_vec(),
    })))
}
