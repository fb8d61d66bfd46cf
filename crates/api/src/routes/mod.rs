pub mod general_inquiries;
pub mod health;
pub mod inquiries;
pub mod properties;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/register                      register (public)
/// /users/login                         login (public)
/// /users/me                            current user (auth)
/// /auth/...                            same three routes as /users
///
/// /properties                          list with filters + pagination (public)
/// /properties/search                   free-text search (public)
/// /properties/createProperty           create, multipart (auth)
/// /properties/{id}                     get (public), update (admin), delete (admin)
/// /properties/{id}/interested          mark interest (auth, PUT)
///
/// /inquiries                           list (auth)
/// /inquiries/submit                    submit (auth, POST)
/// /inquiries/byUser                    caller's inquiries (auth)
/// /inquiries/byProperty/{id}           inquiries for one listing
/// /inquiries/{id}                      get
///
/// /general-inquiries                   submit (public, POST), list (admin, GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/auth", users::router())
        .nest("/properties", properties::router())
        .nest("/inquiries", inquiries::router())
        .nest("/general-inquiries", general_inquiries::router())
}
