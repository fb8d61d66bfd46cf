//! Route definitions for the public contact form.

use axum::routing::post;
use axum::Router;

use crate::handlers::general_inquiry;
use crate::state::AppState;

/// Routes mounted at `/general-inquiries`.
///
/// ```text
/// POST /  -> create_general_inquiry
/// GET  /  -> list_general_inquiries (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        post(general_inquiry::create_general_inquiry).get(general_inquiry::list_general_inquiries),
    )
}
