//! Route definitions for the `/inquiries` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::inquiry;
use crate::state::AppState;

/// Routes mounted at `/inquiries`.
///
/// ```text
/// GET  /                  -> list_inquiries (auth)
/// POST /submit            -> submit_inquiry (auth)
/// GET  /byUser            -> list_my_inquiries (auth)
/// GET  /byProperty/{id}   -> list_property_inquiries
/// GET  /{id}              -> get_inquiry
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(inquiry::list_inquiries))
        .route("/submit", post(inquiry::submit_inquiry))
        .route("/byUser", get(inquiry::list_my_inquiries))
        .route("/byProperty/{id}", get(inquiry::list_property_inquiries))
        .route("/{id}", get(inquiry::get_inquiry))
}
