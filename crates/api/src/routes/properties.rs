//! Route definitions for the `/properties` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::property;
use crate::state::AppState;

/// Routes mounted at `/properties`.
///
/// ```text
/// GET    /                  -> list_properties
/// GET    /search            -> search_properties
/// POST   /createProperty    -> create_property (multipart, auth)
/// GET    /{id}              -> get_property
/// PUT    /{id}              -> update_property (multipart, admin)
/// DELETE /{id}              -> delete_property (admin)
/// PUT    /{id}/interested   -> mark_interested (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(property::list_properties))
        .route("/search", get(property::search_properties))
        .route("/createProperty", post(property::create_property))
        .route(
            "/{id}",
            get(property::get_property)
                .put(property::update_property)
                .delete(property::delete_property),
        )
        .route("/{id}/interested", put(property::mark_interested))
}
