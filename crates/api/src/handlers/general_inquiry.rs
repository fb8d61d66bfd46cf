//! Handlers for the public contact form (`/general-inquiries`).

use axum::extract::State;
use axum::http::StatusCode;
use realty_core::inquiry::{require_fields, validate_email, validate_general_category};
use realty_db::models::general_inquiry::{CreateGeneralInquiry, GeneralInquiry};
use realty_db::repositories::GeneralInquiryRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::Json;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, Success};
use crate::state::AppState;

/// Request body for `POST /general-inquiries`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralInquiryRequest {
    pub inquiry_type: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeneralSubmittedBody {
    pub message: &'static str,
    pub inquiry: GeneralInquiry,
}

/// POST /api/general-inquiries
pub async fn create_general_inquiry(
    State(state): State<AppState>,
    Json(input): Json<GeneralInquiryRequest>,
) -> AppResult<(StatusCode, Json<Success<GeneralSubmittedBody>>)> {
    require_fields(&[
        ("inquiryType", input.inquiry_type.as_deref()),
        ("name", input.name.as_deref()),
        ("email", input.email.as_deref()),
        ("message", input.message.as_deref()),
    ])?;

    let category = validate_general_category(input.inquiry_type.as_deref().unwrap_or_default())?;
    let email = input.email.unwrap_or_default().trim().to_string();
    validate_email(&email)?;

    let inquiry = GeneralInquiryRepo::create(
        &state.pool,
        &CreateGeneralInquiry {
            inquiry_type: category.to_string(),
            name: input.name.unwrap_or_default().trim().to_string(),
            email,
            phone: input
                .phone
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            message: input.message.unwrap_or_default().trim().to_string(),
        },
    )
    .await?;
    tracing::info!(inquiry_id = inquiry.id, category, "General inquiry received");

    Ok((
        StatusCode::CREATED,
        Json(Success::new(GeneralSubmittedBody {
            message: "Inquiry submitted successfully",
            inquiry,
        })),
    ))
}

/// GET /api/general-inquiries (admin only)
pub async fn list_general_inquiries(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<GeneralInquiry>>>> {
    let inquiries = GeneralInquiryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(inquiries)))
}
