use serde_json::{json, Value};

use crate::response::ApiResponse;

/// GET /api/v1/health
/// Liveness probe; no authentication.
pub async fn health_handler() -> ApiResponse<Value> {
    ApiResponse::ok(json!({
        "message": "ATS Buddy backend is running"
    }))
}
