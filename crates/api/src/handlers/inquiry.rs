//! Handlers for the `/inquiries` resource.

use axum::extract::State;
use axum::http::StatusCode;
use realty_core::error::CoreError;
use realty_core::inquiry::{inquiry_type_for, require_fields, validate_email, validate_inquiry_type};
use realty_core::limits::{check_lengths, INQUIRY_EMAIL_MAX, INQUIRY_NAME_MAX, INQUIRY_PHONE_MAX};
use realty_core::types::DbId;
use realty_db::models::inquiry::{CreateInquiry, Inquiry, InquiryDetail};
use realty_db::repositories::{InquiryRepo, PropertyRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::{Json, Path, Query};
use crate::middleware::auth::AuthUser;
use crate::query::{InquiryListParams, Page};
use crate::response::Success;
use crate::state::AppState;

/// Default page size for `GET /inquiries`.
const DEFAULT_INQUIRY_PAGE_SIZE: i64 = 10;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /inquiries/submit`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitInquiryRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub property_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct SubmittedBody {
    pub message: &'static str,
    pub inquiry: Inquiry,
}

#[derive(Debug, Serialize)]
pub struct InquiryPageBody {
    pub total: i64,
    pub inquiries: Vec<InquiryDetail>,
}

#[derive(Debug, Serialize)]
pub struct InquiryListBody {
    pub inquiries: Vec<InquiryDetail>,
}

#[derive(Debug, Serialize)]
pub struct InquiryBody {
    pub inquiry: InquiryDetail,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/inquiries/submit
///
/// With `propertyId` the inquiry is about that listing and a phone number is
/// required; without it the inquiry is general.
pub async fn submit_inquiry(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SubmitInquiryRequest>,
) -> AppResult<(StatusCode, Json<Success<SubmittedBody>>)> {
    let name = trimmed(input.name);
    let email = trimmed(input.email);
    let phone = trimmed(input.phone);
    let message = trimmed(input.message);

    let mut required = vec![("name", name.as_deref()), ("email", email.as_deref())];
    if input.property_id.is_some() {
        required.push(("phone", phone.as_deref()));
    }
    required.push(("message", message.as_deref()));
    require_fields(&required)?;

    check_lengths(&[
        ("name", name.as_deref(), INQUIRY_NAME_MAX),
        ("email", email.as_deref(), INQUIRY_EMAIL_MAX),
        ("phone", phone.as_deref(), INQUIRY_PHONE_MAX),
    ])?;
    let email = email.unwrap_or_default();
    validate_email(&email)?;

    if let Some(property_id) = input.property_id {
        if PropertyRepo::find_by_id(&state.pool, property_id)
            .await?
            .is_none()
        {
            return Err(CoreError::NotFound {
                entity: "Property",
                id: property_id,
            }
            .into());
        }
    }

    let inquiry = InquiryRepo::create(
        &state.pool,
        &CreateInquiry {
            name: name.unwrap_or_default(),
            email,
            phone,
            message: message.unwrap_or_default(),
            inquiry_type: inquiry_type_for(input.property_id).to_string(),
            user_id: Some(user.user_id),
            property_id: input.property_id,
        },
    )
    .await?;
    tracing::info!(
        inquiry_id = inquiry.id,
        user_id = user.user_id,
        property_id = ?inquiry.property_id,
        inquiry_type = %inquiry.inquiry_type,
        "Inquiry submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(Success::new(SubmittedBody {
            message: "Inquiry submitted successfully",
            inquiry,
        })),
    ))
}

/// GET /api/inquiries
pub async fn list_inquiries(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<InquiryListParams>,
) -> AppResult<Json<Success<InquiryPageBody>>> {
    let inquiry_type = params
        .inquiry_type
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(validate_inquiry_type)
        .transpose()?;
    let page = Page::resolve(
        params.limit.as_deref(),
        params.offset.as_deref(),
        DEFAULT_INQUIRY_PAGE_SIZE,
    )?;

    let (total, inquiries) =
        InquiryRepo::list(&state.pool, inquiry_type, page.limit, page.offset).await?;
    Ok(Json(Success::new(InquiryPageBody { total, inquiries })))
}

/// GET /api/inquiries/byUser
pub async fn list_my_inquiries(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Success<InquiryListBody>>> {
    let inquiries = InquiryRepo::list_by_user(&state.pool, user.user_id).await?;
    Ok(Json(Success::new(InquiryListBody { inquiries })))
}

/// GET /api/inquiries/byProperty/{id}
pub async fn list_property_inquiries(
    State(state): State<AppState>,
    Path(property_id): Path<DbId>,
) -> AppResult<Json<Success<InquiryListBody>>> {
    let inquiries = InquiryRepo::list_by_property(&state.pool, property_id).await?;
    Ok(Json(Success::new(InquiryListBody { inquiries })))
}

/// GET /api/inquiries/{id}
pub async fn get_inquiry(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Success<InquiryBody>>> {
    let inquiry = InquiryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Inquiry",
            id,
        })?;
    Ok(Json(Success::new(InquiryBody { inquiry })))
}
