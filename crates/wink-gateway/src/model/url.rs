use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    pub url: String,
    /// Lifetime of the link in seconds. Falls back to the server default;
    /// without either the link is permanent.
    #[serde(default)]
    pub ttl_secs: Option<u64>,
}

/// Response to a create request.
///
/// `id` carries the short code, not the numeric sequence id. Existing
/// clients read the code from this field, so the name must not change.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUrlResponse {
    pub id: String,
}

/// Query form of a resolve request: `GET /wink?id={code}`.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
