//! Shared response envelope types for API handlers.
//!
//! Every success body carries `success: true`. Handlers flatten a
//! resource-specific payload struct into [`Success`] rather than building
//! ad-hoc `json!` values, so the wire shape is checked at compile time.

use serde::Serialize;

/// `{ "success": true, ...T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(Success::new(PropertyBody { property })))
/// ```
#[derive(Debug, Serialize)]
pub struct Success<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Success<T> {
    pub fn new(body: T) -> Self {
        Self {
            success: true,
            body,
        }
    }
}

/// `{ "success": true, "data": T }`, used by the admin listing endpoints.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
