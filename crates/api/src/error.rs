//! Error type returned by every handler and extractor, and its JSON shape.
//!
//! Every failure leaves the server as
//! `{ "success": false, "message": ..., "code": ... }`; 500s add a
//! `details` string with the underlying cause.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use realty_core::error::CoreError;
use serde::Serialize;

/// Message shown for every 500.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

// Postgres SQLSTATE codes with a client-facing meaning.
const PG_STRING_TOO_LONG: &str = "22001";
const PG_NUMERIC_OUT_OF_RANGE: &str = "22003";
const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_CHECK_VIOLATION: &str = "23514";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `realty_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request: unparseable body, path or query, broken multipart.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No route matches the request path.
    #[error("Route not found")]
    RouteNotFound,

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Status plus body for one error.
struct Rendered {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<String>,
}

impl Rendered {
    fn client(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    fn internal(details: String) -> Self {
        tracing::error!(error = %details, "Request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: INTERNAL_MESSAGE.to_string(),
            details: Some(details),
        }
    }
}

impl AppError {
    fn render(&self) -> Rendered {
        match self {
            AppError::Core(core) => render_core(core),
            AppError::Database(err) => render_sqlx(err),
            AppError::BadRequest(msg) => {
                Rendered::client(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::RouteNotFound => {
                Rendered::client(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found")
            }
            AppError::InternalError(msg) => Rendered::internal(msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let rendered = self.render();
        let body = ErrorBody {
            success: false,
            message: rendered.message,
            code: rendered.code,
            details: rendered.details,
        };
        (rendered.status, axum::Json(body)).into_response()
    }
}

fn render_core(err: &CoreError) -> Rendered {
    match err {
        CoreError::NotFound { entity, id } => {
            tracing::debug!(entity, id, "Entity not found");
            Rendered::client(StatusCode::NOT_FOUND, "NOT_FOUND", format!("{entity} not found"))
        }
        CoreError::Validation(msg) => {
            Rendered::client(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        CoreError::Conflict(msg) => Rendered::client(StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => {
            Rendered::client(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
        }
        CoreError::Forbidden(msg) => {
            Rendered::client(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
        }
        CoreError::Internal(msg) => Rendered::internal(msg.clone()),
    }
}

/// Constraint and data errors the client caused become 4xx; the rest are 500s.
fn render_sqlx(err: &sqlx::Error) -> Rendered {
    let sqlx::Error::Database(db_err) = err else {
        if matches!(err, sqlx::Error::RowNotFound) {
            return Rendered::client(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found");
        }
        return Rendered::internal(err.to_string());
    };

    let constraint = db_err.constraint().unwrap_or("unknown");
    match db_err.code().as_deref() {
        Some(PG_UNIQUE_VIOLATION) if constraint.starts_with("uq_") => Rendered::client(
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        Some(PG_CHECK_VIOLATION) => Rendered::client(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Value violates check constraint: {constraint}"),
        ),
        Some(PG_STRING_TOO_LONG) | Some(PG_NUMERIC_OUT_OF_RANGE) => Rendered::client(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "A field value is too long or out of range.",
        ),
        _ => Rendered::internal(db_err.to_string()),
    }
}
